//! Horizontal glyph layout: advances, pair kerning and letter spacing.

use crate::font::Typeface;
use crate::metrics::TextOptions;

/// The glyph id used for characters the font cannot map (`.notdef`).
pub const NOTDEF_GLYPH: u16 = 0;

/// A glyph positioned on the pen line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
  pub glyph_id: u16,
  /// Pen x position, in user units.
  pub x: f64,
}

/// Scale from design units to user units at `font_size`.
#[inline]
pub fn scale(face: &dyn Typeface, font_size: f64) -> f64 {
  1.0 / f64::from(face.units_per_em()) * font_size
}

/// Maps every character of `text` to a glyph, falling back to `.notdef`.
pub fn glyphs(face: &dyn Typeface, text: &str) -> Vec<u16> {
  text
    .chars()
    .map(|ch| face.glyph_id(ch).unwrap_or(NOTDEF_GLYPH))
    .collect()
}

/// Places the glyphs of `text` starting at pen position `origin_x`.
///
/// Returns the placed glyphs and the pen position after the last one.
/// After each glyph the pen moves by its advance, by the kerning with the
/// next glyph (when enabled) and by the configured spacing, which is also
/// applied after the last glyph.
pub fn place(face: &dyn Typeface, text: &str, options: &TextOptions, origin_x: f64) -> (Vec<PlacedGlyph>, f64) {
  let scale = scale(face, options.font_size);
  let spacing = options.spacing();
  let ids = glyphs(face, text);

  let mut placed = Vec::with_capacity(ids.len());
  let mut x = origin_x;
  for (i, &glyph_id) in ids.iter().enumerate() {
    placed.push(PlacedGlyph { glyph_id, x });

    if let Some(advance) = face.advance_width(glyph_id) {
      x += f64::from(advance) * scale;
    }
    if options.kerning {
      if let Some(&next) = ids.get(i + 1) {
        x += f64::from(face.kern(glyph_id, next)) * scale;
      }
    }
    x += spacing;
  }

  (placed, x)
}

/// The advance width of `text`, in user units.
pub fn advance_width(face: &dyn Typeface, text: &str, options: &TextOptions) -> f64 {
  place(face, text, options, 0.0).1
}
