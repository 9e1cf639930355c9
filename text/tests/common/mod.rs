#![allow(dead_code)]

use glyphport_text::{OutlineSink, TextToSvg, Typeface};

pub const GLYPH_A: u16 = 1;
pub const GLYPH_V: u16 = 2;
pub const GLYPH_SPACE: u16 = 3;

/// A hand-built face with round numbers. At font size 64 one design unit is
/// 1/16 of a user unit.
///
/// | glyph   | advance | outline                       |
/// |---------|---------|-------------------------------|
/// | .notdef | 512     | box (0,0)-(448,704)           |
/// | `A`     | 640     | box (0,0)-(512,704)           |
/// | `V`     | 640     | triangle (0,704) (320,0) (640,704) |
/// | space   | 256     | none                          |
///
/// `A` followed by `V` kerns by -64.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxFace;

impl Typeface for BoxFace {
  fn units_per_em(&self) -> u16 {
    1024
  }

  fn ascender(&self) -> i16 {
    832
  }

  fn descender(&self) -> i16 {
    -192
  }

  fn glyph_id(&self, ch: char) -> Option<u16> {
    match ch {
      'A' => Some(GLYPH_A),
      'V' => Some(GLYPH_V),
      ' ' => Some(GLYPH_SPACE),
      _ => None,
    }
  }

  fn advance_width(&self, glyph_id: u16) -> Option<u16> {
    match glyph_id {
      0 => Some(512),
      GLYPH_A | GLYPH_V => Some(640),
      GLYPH_SPACE => Some(256),
      _ => None,
    }
  }

  fn kern(&self, left: u16, right: u16) -> i16 {
    if left == GLYPH_A && right == GLYPH_V {
      -64
    } else {
      0
    }
  }

  fn outline(&self, glyph_id: u16, sink: &mut dyn OutlineSink) -> bool {
    let rect = |sink: &mut dyn OutlineSink, w: f64, h: f64| {
      sink.move_to(0.0, 0.0);
      sink.line_to(w, 0.0);
      sink.line_to(w, h);
      sink.line_to(0.0, h);
      sink.close();
    };
    match glyph_id {
      0 => rect(sink, 448.0, 704.0),
      GLYPH_A => rect(sink, 512.0, 704.0),
      GLYPH_V => {
        sink.move_to(0.0, 704.0);
        sink.line_to(320.0, 0.0);
        sink.line_to(640.0, 704.0);
        sink.close();
      }
      _ => return false,
    }
    true
  }
}

pub fn box_renderer() -> TextToSvg {
  TextToSvg::new(BoxFace)
}
