mod common;

use common::box_renderer;
use glyphport_text::{Anchor, HorizontalAnchor, TextMetrics, TextOptions, VerticalAnchor};
use pretty_assertions::assert_eq;

fn at_64() -> TextOptions {
  TextOptions::default().with_font_size(64.0)
}

#[test]
fn width_applies_pair_kerning() {
  let svg = box_renderer();
  assert_eq!(svg.width("AV", &at_64()), 76.0);
  assert_eq!(svg.width("AV", &at_64().with_kerning(false)), 80.0);
  // No kerning pair in the other order.
  assert_eq!(svg.width("VA", &at_64()), 80.0);
}

#[test]
fn letter_spacing_follows_every_glyph() {
  let svg = box_renderer();
  let spaced = at_64().with_letter_spacing(0.125);
  assert_eq!(svg.width("AV", &spaced), 76.0 + 2.0 * 8.0);

  // 250/1000 of an em, only used without letter spacing.
  let tracked = at_64().with_tracking(250.0);
  assert_eq!(svg.width("AV", &tracked), 76.0 + 2.0 * 16.0);
  assert_eq!(svg.width("AV", &tracked.with_letter_spacing(0.125)), 92.0);
}

#[test]
fn empty_text_has_no_width_or_path() {
  let svg = box_renderer();
  assert_eq!(svg.width("", &at_64()), 0.0);
  assert_eq!(svg.path_data("", &at_64()), "");
  assert_eq!(svg.metrics("", &at_64()).height, 64.0);
}

#[test]
fn baseline_anchor_puts_the_box_above_y() {
  let svg = box_renderer();
  assert_eq!(
    svg.metrics("AV", &at_64()),
    TextMetrics {
      x: 0.0,
      y: -52.0,
      baseline: 0.0,
      width: 76.0,
      height: 64.0,
      ascender: 52.0,
      descender: -12.0,
    }
  );
}

#[test]
fn anchors_shift_the_box() {
  let svg = box_renderer();
  let centered = at_64().at(100.0, 100.0).with_anchor(Anchor::parse("center middle"));
  let metrics = svg.metrics("AV", &centered);
  assert_eq!((metrics.x, metrics.y, metrics.baseline), (62.0, 68.0, 120.0));

  let bottom_right = at_64().at(100.0, 100.0).with_anchor(Anchor {
    horizontal: HorizontalAnchor::Right,
    vertical: VerticalAnchor::Bottom,
  });
  let metrics = svg.metrics("AV", &bottom_right);
  assert_eq!((metrics.x, metrics.y, metrics.baseline), (24.0, 36.0, 88.0));

  let top_left = at_64().at(10.0, 20.0).with_anchor(Anchor::parse("top"));
  let metrics = svg.metrics("AV", &top_left);
  assert_eq!((metrics.x, metrics.y, metrics.baseline), (10.0, 20.0, 72.0));
}

#[test]
fn path_data_places_each_glyph_on_the_baseline() {
  let svg = box_renderer();
  assert_eq!(
    svg.path_data("AV", &at_64()),
    "M0 0L32 0L32-44L0-44ZM36-44L56 0L76-44Z"
  );
}

#[test]
fn path_data_follows_the_anchor() {
  let svg = box_renderer();
  let options = at_64().at(10.0, 0.0).with_anchor(Anchor::parse("left top"));
  // Top anchor moves the baseline down by the ascender.
  assert_eq!(svg.path_data("A", &options), "M10 52L42 52L42 8L10 8Z");
}

#[test]
fn unmapped_characters_render_as_notdef() {
  let svg = box_renderer();
  assert_eq!(svg.width("Z", &at_64()), 32.0);
  assert_eq!(svg.path_data("Z", &at_64()), "M0 0L28 0L28-44L0-44Z");
  // Spaces advance without drawing.
  assert_eq!(svg.width("A A", &at_64()), 96.0);
  assert_eq!(svg.path_data("A A", &at_64()), "M0 0L32 0L32-44L0-44ZM56 0L88 0L88-44L56-44Z");
}

#[test]
fn fractional_coordinates_keep_two_decimals() {
  let svg = box_renderer();
  let metrics = svg.metrics("A", &TextOptions::default().with_font_size(10.0));
  assert_eq!(metrics.width, 6.25);
  assert_eq!(
    svg.path_data("A", &TextOptions::default().with_font_size(10.0)),
    "M0 0L5 0L5-6.88L0-6.88Z"
  );
}

#[test]
fn render_matches_separate_calls() {
  let svg = box_renderer();
  let options = at_64().with_anchor(Anchor::parse("center bottom"));
  let rendered = svg.render("AV", &options);
  assert_eq!(rendered.metrics, svg.metrics("AV", &options));
  assert_eq!(rendered.path_data, svg.path_data("AV", &options));
}

#[test]
fn svg_document_wraps_an_escaped_path_element() {
  let svg = box_renderer();
  let element = svg.path_element("A", &at_64(), &[("fill", "red"), ("data-text", "\"A\" & <b>")]);
  assert_eq!(
    element,
    "<path fill=\"red\" data-text=\"&quot;A&quot; &amp; &lt;b&gt;\" d=\"M0 0L32 0L32-44L0-44Z\"/>"
  );

  let document = svg.svg("AV", &at_64(), &[]);
  assert!(document.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
  assert!(document.contains("width=\"76\" height=\"64\""));
  assert!(document.ends_with("<path d=\"M0 0L32 0L32-44L0-44ZM36-44L56 0L76-44Z\"/></svg>"));
}
