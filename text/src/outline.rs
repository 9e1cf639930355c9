//! Glyph outline extraction.

/// Receiver for glyph outline commands.
///
/// Coordinates are in font design units, y-up. Scaling and flipping into SVG
/// space is done by the consumer.
pub trait OutlineSink {
  /// Start a new contour at the given point.
  fn move_to(&mut self, x: f64, y: f64);
  /// Draw a straight line to the given point.
  fn line_to(&mut self, x: f64, y: f64);
  /// Draw a quadratic Bezier curve (TrueType-style).
  fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);
  /// Draw a cubic Bezier curve (CFF-style).
  fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);
  /// Close the current contour.
  fn close(&mut self);
}
