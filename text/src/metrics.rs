//! Layout options and text metric types.

use std::fmt;
use std::str::FromStr;

/// Default font size when none is given.
pub const DEFAULT_FONT_SIZE: f64 = 72.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HorizontalAnchor {
  #[default]
  Left,
  Center,
  Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VerticalAnchor {
  #[default]
  Baseline,
  Top,
  Middle,
  Bottom,
}

/// Which point of the text box `(x, y)` refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
  pub horizontal: HorizontalAnchor,
  pub vertical: VerticalAnchor,
}

impl Anchor {
  /// Parses a free-form anchor such as `"center middle"` or `"top right"`.
  ///
  /// Matching is case-insensitive and takes the first keyword of each axis;
  /// a missing axis falls back to `left` / `baseline`.
  pub fn parse(value: &str) -> Self {
    let lower = value.to_ascii_lowercase();

    let first_of = |words: &[&'static str]| -> Option<&'static str> {
      words
        .iter()
        .filter_map(|word| lower.find(word).map(|at| (at, *word)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, word)| word)
    };

    let horizontal = match first_of(&["left", "center", "right"]) {
      Some("center") => HorizontalAnchor::Center,
      Some("right") => HorizontalAnchor::Right,
      _ => HorizontalAnchor::Left,
    };
    let vertical = match first_of(&["baseline", "top", "middle", "bottom"]) {
      Some("top") => VerticalAnchor::Top,
      Some("middle") => VerticalAnchor::Middle,
      Some("bottom") => VerticalAnchor::Bottom,
      _ => VerticalAnchor::Baseline,
    };

    Self {
      horizontal,
      vertical,
    }
  }
}

impl FromStr for Anchor {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::parse(s))
  }
}

impl fmt::Display for Anchor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let horizontal = match self.horizontal {
      HorizontalAnchor::Left => "left",
      HorizontalAnchor::Center => "center",
      HorizontalAnchor::Right => "right",
    };
    let vertical = match self.vertical {
      VerticalAnchor::Baseline => "baseline",
      VerticalAnchor::Top => "top",
      VerticalAnchor::Middle => "middle",
      VerticalAnchor::Bottom => "bottom",
    };
    write!(f, "{} {}", horizontal, vertical)
  }
}

/// How a run of text is sized and placed.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
  pub x: f64,
  pub y: f64,
  pub font_size: f64,
  /// Apply pair kerning from the font.
  pub kerning: bool,
  /// Extra advance after every glyph, in ems. Takes precedence over
  /// `tracking` when non-zero.
  pub letter_spacing: f64,
  /// Extra advance after every glyph, in thousandths of an em.
  pub tracking: f64,
  pub anchor: Anchor,
}

impl Default for TextOptions {
  fn default() -> Self {
    Self {
      x: 0.0,
      y: 0.0,
      font_size: DEFAULT_FONT_SIZE,
      kerning: true,
      letter_spacing: 0.0,
      tracking: 0.0,
      anchor: Anchor::default(),
    }
  }
}

impl TextOptions {
  pub fn with_font_size(mut self, font_size: f64) -> Self {
    self.font_size = font_size;
    self
  }

  pub fn with_kerning(mut self, kerning: bool) -> Self {
    self.kerning = kerning;
    self
  }

  pub fn with_letter_spacing(mut self, letter_spacing: f64) -> Self {
    self.letter_spacing = letter_spacing;
    self
  }

  pub fn with_tracking(mut self, tracking: f64) -> Self {
    self.tracking = tracking;
    self
  }

  pub fn with_anchor(mut self, anchor: Anchor) -> Self {
    self.anchor = anchor;
    self
  }

  pub fn at(mut self, x: f64, y: f64) -> Self {
    self.x = x;
    self.y = y;
    self
  }

  /// Extra advance added after each glyph, in user units.
  pub(crate) fn spacing(&self) -> f64 {
    if self.letter_spacing != 0.0 {
      self.letter_spacing * self.font_size
    } else if self.tracking != 0.0 {
      (self.tracking / 1000.0) * self.font_size
    } else {
      0.0
    }
  }
}

/// Placement metrics of a run of text.
///
/// `(x, y)` is the top-left corner of the text box after applying the anchor,
/// `baseline` the y of the baseline. `descender` is negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextMetrics {
  pub x: f64,
  pub y: f64,
  pub baseline: f64,
  pub width: f64,
  pub height: f64,
  pub ascender: f64,
  pub descender: f64,
}
