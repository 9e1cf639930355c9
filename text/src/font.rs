//! Font data wrapper around `ttf-parser`.

use std::fmt;
use std::sync::Arc;

use crate::error::FontError;
use crate::outline::OutlineSink;

/// The glyph queries layout needs from a font. All values are in design
/// units.
pub trait Typeface: Send + Sync {
  fn units_per_em(&self) -> u16;

  /// Global ascender (positive, above the baseline).
  fn ascender(&self) -> i16;

  /// Global descender (negative, below the baseline).
  fn descender(&self) -> i16;

  /// Map a character to its glyph id. `None` if the font has no glyph.
  fn glyph_id(&self, ch: char) -> Option<u16>;

  fn advance_width(&self, glyph_id: u16) -> Option<u16>;

  /// Kerning adjustment between two glyphs. Negative tightens.
  fn kern(&self, left: u16, right: u16) -> i16;

  /// Feed the glyph outline to `sink`. Returns `false` if the glyph has none.
  fn outline(&self, glyph_id: u16, sink: &mut dyn OutlineSink) -> bool;
}

/// A parsed TrueType/OpenType font.
///
/// Owns the font bytes and caches global metrics. A `ttf_parser::Face` is
/// created on demand for each query; parsing only validates headers and
/// builds the table directory.
#[derive(Clone)]
pub struct Font {
  bytes: Arc<[u8]>,
  units_per_em: u16,
  ascender: i16,
  descender: i16,
  glyph_count: u16,
  family_name: Option<String>,
}

impl Font {
  /// Parse font data from an owned byte buffer.
  pub fn from_bytes(bytes: Arc<[u8]>) -> Result<Self, FontError> {
    let face = ttf_parser::Face::parse(&bytes, 0).map_err(|e| FontError::Parse(e.to_string()))?;
    if face.units_per_em() == 0 {
      return Err(FontError::Parse("units per em is zero".to_string()));
    }

    let family_name = face
      .names()
      .into_iter()
      .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
      .find_map(|name| name.to_string());

    Ok(Self {
      units_per_em: face.units_per_em(),
      ascender: face.ascender(),
      descender: face.descender(),
      glyph_count: face.number_of_glyphs(),
      family_name,
      bytes,
    })
  }

  pub fn from_vec(bytes: Vec<u8>) -> Result<Self, FontError> {
    Self::from_bytes(Arc::from(bytes))
  }

  /// The family name from the `name` table, when it has a Unicode entry.
  pub fn family_name(&self) -> Option<&str> {
    self.family_name.as_deref()
  }

  pub fn glyph_count(&self) -> u16 {
    self.glyph_count
  }

  /// Runs `query` against a freshly parsed face.
  ///
  /// The bytes were validated in `from_bytes`, so the fallback is only a
  /// guard against the impossible.
  fn with_face<R>(&self, fallback: R, query: impl FnOnce(&ttf_parser::Face<'_>) -> R) -> R {
    match ttf_parser::Face::parse(&self.bytes, 0) {
      Ok(face) => query(&face),
      Err(_) => fallback,
    }
  }
}

impl Typeface for Font {
  fn units_per_em(&self) -> u16 {
    self.units_per_em
  }

  fn ascender(&self) -> i16 {
    self.ascender
  }

  fn descender(&self) -> i16 {
    self.descender
  }

  fn glyph_id(&self, ch: char) -> Option<u16> {
    self.with_face(None, |face| face.glyph_index(ch).map(|g| g.0))
  }

  fn advance_width(&self, glyph_id: u16) -> Option<u16> {
    self.with_face(None, |face| {
      face.glyph_hor_advance(ttf_parser::GlyphId(glyph_id))
    })
  }

  fn kern(&self, left: u16, right: u16) -> i16 {
    self.with_face(0, |face| {
      face
        .tables()
        .kern
        .and_then(|kern| {
          kern
            .subtables
            .into_iter()
            .filter(|st| st.horizontal && !st.variable)
            .find_map(|st| {
              st.glyphs_kerning(ttf_parser::GlyphId(left), ttf_parser::GlyphId(right))
            })
        })
        .unwrap_or(0)
    })
  }

  fn outline(&self, glyph_id: u16, sink: &mut dyn OutlineSink) -> bool {
    self.with_face(false, |face| {
      let mut adapter = OutlineAdapter { sink };
      face
        .outline_glyph(ttf_parser::GlyphId(glyph_id), &mut adapter)
        .is_some()
    })
  }
}

/// Adapter from [`OutlineSink`] to `ttf_parser::OutlineBuilder`.
struct OutlineAdapter<'a> {
  sink: &'a mut dyn OutlineSink,
}

impl ttf_parser::OutlineBuilder for OutlineAdapter<'_> {
  fn move_to(&mut self, x: f32, y: f32) {
    self.sink.move_to(f64::from(x), f64::from(y));
  }

  fn line_to(&mut self, x: f32, y: f32) {
    self.sink.line_to(f64::from(x), f64::from(y));
  }

  fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
    self
      .sink
      .quad_to(f64::from(x1), f64::from(y1), f64::from(x), f64::from(y));
  }

  fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
    self.sink.curve_to(
      f64::from(x1),
      f64::from(y1),
      f64::from(x2),
      f64::from(y2),
      f64::from(x),
      f64::from(y),
    );
  }

  fn close(&mut self) {
    self.sink.close();
  }
}

impl fmt::Debug for Font {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Font")
      .field("family_name", &self.family_name)
      .field("units_per_em", &self.units_per_em)
      .field("ascender", &self.ascender)
      .field("descender", &self.descender)
      .field("glyph_count", &self.glyph_count)
      .field("bytes_len", &self.bytes.len())
      .finish()
  }
}
