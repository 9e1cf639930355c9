//! Layout against a real TrueType file (DejaVu Serif, see
//! `tests/fonts/LICENSE-DejaVu.txt`).

use glyphport_text::{Font, FontDirectory, TextMetrics, TextOptions, TextToSvg, Typeface};
use pretty_assertions::assert_eq;

/// At this size one design unit is one user unit.
const UNITS_PER_EM: f64 = 2048.0;

fn fonts() -> FontDirectory {
  FontDirectory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts"))
}

fn serif() -> Font {
  fonts().load("DejaVuSerif").unwrap()
}

fn at_em() -> TextOptions {
  TextOptions::default().with_font_size(UNITS_PER_EM)
}

#[test]
fn reads_global_metrics() {
  let font = serif();
  assert_eq!(font.units_per_em(), 2048);
  assert_eq!(font.ascender(), 1901);
  assert_eq!(font.descender(), -483);
  assert_eq!(font.glyph_count(), 3528);
  assert_eq!(font.family_name(), Some("DejaVu Serif"));
}

#[test]
fn maps_characters_to_glyphs_and_advances() {
  let font = serif();
  let a = font.glyph_id('A').unwrap();
  let v = font.glyph_id('V').unwrap();
  assert_eq!((a, v), (36, 57));
  assert_eq!(font.advance_width(a), Some(1479));
  assert_eq!(font.advance_width(v), Some(1479));
  assert_eq!(font.glyph_id(' ').and_then(|g| font.advance_width(g)), Some(651));
}

#[test]
fn kern_pairs_are_ordered() {
  let font = serif();
  let a = font.glyph_id('A').unwrap();
  let v = font.glyph_id('V').unwrap();
  assert_eq!(font.kern(a, v), -102);
  assert_eq!(font.kern(v, a), -139);
  assert_eq!(font.kern(a, a), 0);
}

#[test]
fn kerning_tightens_the_width() {
  let svg = TextToSvg::new(serif());
  assert_eq!(svg.width("AV", &at_em()), 2856.0);
  assert_eq!(svg.width("AV", &at_em().with_kerning(false)), 2958.0);
  assert_eq!(svg.width("AV", &TextOptions::default()), 100.40625);
}

#[test]
fn metrics_use_the_font_ascender() {
  let svg = TextToSvg::new(serif());
  assert_eq!(
    svg.metrics("AV", &at_em()),
    TextMetrics {
      x: 0.0,
      y: -1901.0,
      baseline: 0.0,
      width: 2856.0,
      height: 2384.0,
      ascender: 1901.0,
      descender: -483.0,
    }
  );
}

#[test]
fn path_data_traces_the_glyph_outline() {
  let svg = TextToSvg::new(serif());
  assert_eq!(
    svg.path_data("I", &at_em()),
    "M506-106L696-106L696 0L113 0L113-106L303-106L303-1386L113-1386L113-1493L696-1493L696-1386L506-1386L506-106Z"
  );

  // Two contours: the counter first, then the outer shape.
  let a = svg.path_data("A", &at_em());
  assert!(
    a.starts_with("M410-541L958-541L684-1251L410-541ZM-12 0L-12-106L119-106"),
    "{}",
    a
  );

  let small = svg.path_data("I", &TextOptions::default());
  assert!(small.starts_with("M17.79-3.73L24.47-3.73"), "{}", small);
}

#[test]
fn lists_the_fixture_directory() {
  assert_eq!(fonts().available().unwrap(), vec!["DejaVuSerif".to_string()]);
}
