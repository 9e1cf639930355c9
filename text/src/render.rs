//! Metrics and path data for a run of text.

use std::fmt;
use std::sync::Arc;

use crate::font::Typeface;
use crate::layout;
use crate::metrics::{HorizontalAnchor, TextMetrics, TextOptions, VerticalAnchor};
use crate::path::PathData;

/// Metrics and path data for one run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedText {
  pub metrics: TextMetrics,
  pub path_data: String,
}

/// Converts text in a given typeface to SVG path data.
///
/// Cheap to clone; the typeface is shared.
#[derive(Clone)]
pub struct TextToSvg {
  face: Arc<dyn Typeface>,
}

impl TextToSvg {
  pub fn new(face: impl Typeface + 'static) -> Self {
    Self {
      face: Arc::new(face),
    }
  }

  pub fn from_shared(face: Arc<dyn Typeface>) -> Self {
    Self { face }
  }

  pub fn typeface(&self) -> &dyn Typeface {
    &*self.face
  }

  /// Total advance width of `text`.
  pub fn width(&self, text: &str, options: &TextOptions) -> f64 {
    layout::advance_width(&*self.face, text, options)
  }

  /// Line height (ascender to descender) at `font_size`.
  pub fn height(&self, font_size: f64) -> f64 {
    let face = &*self.face;
    (f64::from(face.ascender()) - f64::from(face.descender())) * layout::scale(face, font_size)
  }

  /// Placement metrics of `text` with the anchor applied.
  pub fn metrics(&self, text: &str, options: &TextOptions) -> TextMetrics {
    let face = &*self.face;
    let scale = layout::scale(face, options.font_size);
    let width = self.width(text, options);
    let height = self.height(options.font_size);
    let ascender = f64::from(face.ascender()) * scale;
    let descender = f64::from(face.descender()) * scale;

    let x = match options.anchor.horizontal {
      HorizontalAnchor::Left => options.x,
      HorizontalAnchor::Center => options.x - width / 2.0,
      HorizontalAnchor::Right => options.x - width,
    };
    let y = match options.anchor.vertical {
      VerticalAnchor::Baseline => options.y - ascender,
      VerticalAnchor::Top => options.y,
      VerticalAnchor::Middle => options.y - height / 2.0,
      VerticalAnchor::Bottom => options.y - height,
    };

    TextMetrics {
      x,
      y,
      baseline: y + ascender,
      width,
      height,
      ascender,
      descender,
    }
  }

  /// SVG path data for the outlines of `text`, placed per `metrics`.
  fn path_at(&self, text: &str, options: &TextOptions, metrics: &TextMetrics) -> String {
    let face = &*self.face;
    let scale = layout::scale(face, options.font_size);
    let (placed, _) = layout::place(face, text, options, metrics.x);

    let mut path = PathData::new();
    for glyph in placed {
      path.place(glyph.x, metrics.baseline, scale);
      face.outline(glyph.glyph_id, &mut path);
    }
    path.into_string()
  }

  /// SVG path data (`d` attribute) for `text`.
  pub fn path_data(&self, text: &str, options: &TextOptions) -> String {
    let metrics = self.metrics(text, options);
    self.path_at(text, options, &metrics)
  }

  /// Metrics and path data in one pass over the layout.
  pub fn render(&self, text: &str, options: &TextOptions) -> RenderedText {
    let metrics = self.metrics(text, options);
    let path_data = self.path_at(text, options, &metrics);
    RenderedText { metrics, path_data }
  }

  /// A `<path>` element for `text` with extra attributes.
  pub fn path_element(&self, text: &str, options: &TextOptions, attributes: &[(&str, &str)]) -> String {
    let mut element = String::from("<path");
    for (name, value) in attributes {
      element.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
    }
    element.push_str(&format!(" d=\"{}\"/>", self.path_data(text, options)));
    element
  }

  /// A standalone SVG document, sized to the text box, holding the path.
  pub fn svg(&self, text: &str, options: &TextOptions, attributes: &[(&str, &str)]) -> String {
    let metrics = self.metrics(text, options);
    format!(
      "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\">{}</svg>",
      metrics.width,
      metrics.height,
      self.path_element(text, options, attributes)
    )
  }
}

impl fmt::Debug for TextToSvg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TextToSvg")
      .field("units_per_em", &self.face.units_per_em())
      .finish_non_exhaustive()
  }
}

fn escape_attribute(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(ch),
    }
  }
  out
}
