#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use glyphport::ports::{self, AppPorts, BridgePorts};
use glyphport::text_service::{font_cache, FontSource, TextService};
use glyphport::messages::TextToSvgRequest;
use glyphport_text::{FontError, OutlineSink, TextToSvg, Typeface};

/// Every character is a 512 unit square with a 512 unit advance, on a
/// 1024 unit em. At font size 64 each glyph is 32 wide.
#[derive(Debug, Default, Clone, Copy)]
pub struct SquareFace;

impl Typeface for SquareFace {
  fn units_per_em(&self) -> u16 {
    1024
  }

  fn ascender(&self) -> i16 {
    832
  }

  fn descender(&self) -> i16 {
    -192
  }

  fn glyph_id(&self, _ch: char) -> Option<u16> {
    Some(1)
  }

  fn advance_width(&self, _glyph_id: u16) -> Option<u16> {
    Some(512)
  }

  fn kern(&self, _left: u16, _right: u16) -> i16 {
    0
  }

  fn outline(&self, _glyph_id: u16, sink: &mut dyn OutlineSink) -> bool {
    sink.move_to(0.0, 0.0);
    sink.line_to(512.0, 0.0);
    sink.line_to(512.0, 512.0);
    sink.line_to(0.0, 512.0);
    sink.close();
    true
  }
}

/// Blocks loads until opened.
#[derive(Default)]
pub struct Gate {
  open: Mutex<bool>,
  changed: Condvar,
}

impl Gate {
  pub fn closed() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn open(&self) {
    *self.open.lock() = true;
    self.changed.notify_all();
  }

  fn wait(&self) {
    let mut open = self.open.lock();
    while !*open {
      self.changed.wait(&mut open);
    }
  }
}

/// A font source that serves [`SquareFace`] for every name except those
/// registered as failing, and counts how often each name is opened.
#[derive(Clone, Default)]
pub struct FakeFonts {
  opens: Arc<Mutex<HashMap<String, usize>>>,
  failing: Arc<Mutex<Vec<String>>>,
  gate: Option<Arc<Gate>>,
}

impl FakeFonts {
  pub fn gated(gate: Arc<Gate>) -> Self {
    Self {
      gate: Some(gate),
      ..Self::default()
    }
  }

  pub fn fail(&self, name: &str) {
    self.failing.lock().push(name.to_string());
  }

  pub fn heal(&self, name: &str) {
    self.failing.lock().retain(|n| n != name);
  }

  pub fn opens(&self, name: &str) -> usize {
    self.opens.lock().get(name).copied().unwrap_or(0)
  }
}

impl FontSource for FakeFonts {
  fn open(&self, name: &str) -> Result<TextToSvg, FontError> {
    *self.opens.lock().entry(name.to_string()).or_default() += 1;
    if let Some(gate) = &self.gate {
      gate.wait();
    }
    if self.failing.lock().iter().any(|n| n == name) {
      return Err(FontError::Parse(format!("{} is broken", name)));
    }
    Ok(TextToSvg::new(SquareFace))
  }
}

pub fn text_service(fonts: &FakeFonts, runtime: Option<tokio::runtime::Handle>) -> (TextService, AppPorts, BridgePorts) {
  let (app, bridge) = ports::open(64);
  let service = TextService::new(font_cache().unwrap(), Arc::new(fonts.clone()), bridge.outbox.clone(), runtime);
  (service, app, bridge)
}

pub fn request(id: &str, font: &str, text: &str) -> TextToSvgRequest {
  TextToSvgRequest::try_from(serde_json::json!({
    "id": id,
    "text": text,
    "font": font,
    "fontSize": 64.0,
  }))
  .unwrap()
}
