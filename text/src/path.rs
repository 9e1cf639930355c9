//! SVG path data generation.

use std::fmt::Write;

use crate::outline::OutlineSink;

/// Decimal places printed for non-integral coordinates.
const DECIMAL_PLACES: usize = 2;

/// Builds an SVG `d` attribute from glyph outlines.
///
/// Outline coordinates arrive in design units, y-up. Each is scaled and
/// placed relative to an origin on the baseline, with y flipped for SVG.
#[derive(Debug, Clone, Default)]
pub struct PathData {
  d: String,
  origin_x: f64,
  origin_y: f64,
  scale: f64,
}

impl PathData {
  pub fn new() -> Self {
    Self {
      scale: 1.0,
      ..Self::default()
    }
  }

  /// Sets the baseline origin and scale used for the next outline.
  pub fn place(&mut self, origin_x: f64, origin_y: f64, scale: f64) {
    self.origin_x = origin_x;
    self.origin_y = origin_y;
    self.scale = scale;
  }

  #[inline]
  fn x(&self, x: f64) -> f64 {
    self.origin_x + x * self.scale
  }

  #[inline]
  fn y(&self, y: f64) -> f64 {
    self.origin_y - y * self.scale
  }

  fn command(&mut self, op: char, values: &[f64]) {
    self.d.push(op);
    for (i, &v) in values.iter().enumerate() {
      // Negative values carry their own separator.
      if v >= 0.0 && i > 0 {
        self.d.push(' ');
      }
      push_number(&mut self.d, v);
    }
  }

  pub fn is_empty(&self) -> bool {
    self.d.is_empty()
  }

  pub fn as_str(&self) -> &str {
    &self.d
  }

  pub fn into_string(self) -> String {
    self.d
  }
}

impl OutlineSink for PathData {
  fn move_to(&mut self, x: f64, y: f64) {
    let values = [self.x(x), self.y(y)];
    self.command('M', &values);
  }

  fn line_to(&mut self, x: f64, y: f64) {
    let values = [self.x(x), self.y(y)];
    self.command('L', &values);
  }

  fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
    let values = [self.x(x1), self.y(y1), self.x(x), self.y(y)];
    self.command('Q', &values);
  }

  fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
    let values = [
      self.x(x1),
      self.y(y1),
      self.x(x2),
      self.y(y2),
      self.x(x),
      self.y(y),
    ];
    self.command('C', &values);
  }

  fn close(&mut self) {
    self.d.push('Z');
  }
}

/// Integers print without a fraction, everything else with two decimals.
fn push_number(out: &mut String, v: f64) {
  if v.round() == v {
    if v == 0.0 {
      out.push('0');
    } else {
      let _ = write!(out, "{}", v as i64);
    }
  } else {
    let _ = write!(out, "{:.*}", DECIMAL_PLACES, v);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn number(v: f64) -> String {
    let mut s = String::new();
    push_number(&mut s, v);
    s
  }

  #[test]
  fn numbers_print_like_svg_tooling() {
    assert_eq!(number(3.0), "3");
    assert_eq!(number(-0.0), "0");
    assert_eq!(number(1.005), "1.00");
    assert_eq!(number(2.5), "2.50");
    assert_eq!(number(-7.126), "-7.13");
  }

  #[test]
  fn negative_values_need_no_separator() {
    let mut path = PathData::new();
    path.move_to(10.0, 20.0);
    path.line_to(30.0, -5.0);
    path.close();
    // y is flipped: design y 20 becomes -20.
    assert_eq!(path.as_str(), "M10-20L30 5Z");
  }

  #[test]
  fn curves_are_scaled_and_offset() {
    let mut path = PathData::new();
    path.place(100.0, 50.0, 0.5);
    path.quad_to(0.0, 0.0, 20.0, 40.0);
    path.curve_to(2.0, 2.0, 4.0, 4.0, 6.0, 6.0);
    assert_eq!(path.as_str(), "Q100 50 110 30C101 49 102 48 103 47");
  }
}
