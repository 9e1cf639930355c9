//! Input event interception and element resize relay.
//!
//! The platform is reached only through [`EventSource`]: an adapter registers
//! handlers for key presses, wheel events and resize notifications and honours
//! the [`Disposition`] they return.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::messages::{Outbound, ResizeEvent};
use crate::ports::Outbox;

/// Key code of the numpad `+` key.
pub const KEY_CODE_ADD: u32 = 107;
/// Key code of the numpad `-` key.
pub const KEY_CODE_SUBTRACT: u32 = 109;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEvent {
  pub key_code: u32,
  pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
  pub delta_x: f64,
  pub delta_y: f64,
  pub ctrl: bool,
}

/// The size of one element, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSize {
  pub id: String,
  pub width: u32,
  pub height: u32,
}

/// Whether the platform should run its default action for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
  #[default]
  Default,
  PreventDefault,
}

impl Disposition {
  /// `PreventDefault` if either side prevents.
  pub fn merge(self, other: Disposition) -> Disposition {
    if self == Disposition::PreventDefault || other == Disposition::PreventDefault {
      Disposition::PreventDefault
    } else {
      Disposition::Default
    }
  }
}

pub type KeyHandler = Box<dyn Fn(&KeyEvent) -> Disposition + Send + Sync>;
pub type WheelHandler = Box<dyn Fn(&WheelEvent) -> Disposition + Send + Sync>;
pub type ResizeHandler = Box<dyn Fn(&[ElementSize]) + Send + Sync>;

/// The event capabilities a platform adapter provides.
pub trait EventSource {
  fn on_key_down(&self, handler: KeyHandler);

  fn on_wheel(&self, handler: WheelHandler);

  /// `handler` receives the current size of every observed element each time
  /// the observed subtree changes.
  fn on_resize(&self, handler: ResizeHandler);
}

/// Suppresses the browser-style zoom gestures: ctrl with numpad `+`/`-`, and
/// ctrl with the mouse wheel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoomGuard;

impl ZoomGuard {
  pub fn key_down(event: &KeyEvent) -> Disposition {
    if event.ctrl && matches!(event.key_code, KEY_CODE_ADD | KEY_CODE_SUBTRACT) {
      tracing::trace!(key_code = event.key_code, "zoom key suppressed");
      Disposition::PreventDefault
    } else {
      Disposition::Default
    }
  }

  pub fn wheel(event: &WheelEvent) -> Disposition {
    if event.ctrl {
      Disposition::PreventDefault
    } else {
      Disposition::Default
    }
  }

  pub fn install(source: &dyn EventSource) {
    source.on_key_down(Box::new(Self::key_down));
    source.on_wheel(Box::new(Self::wheel));
  }
}

/// Forwards element sizes to the `resize` port.
#[derive(Debug, Clone)]
pub struct ResizeRelay {
  watch: HashSet<String>,
  outbox: Outbox,
}

impl ResizeRelay {
  /// With an empty `watch` list every reported element is forwarded.
  pub fn new(watch: impl IntoIterator<Item = String>, outbox: Outbox) -> Self {
    Self {
      watch: watch.into_iter().collect(),
      outbox,
    }
  }

  fn is_watched(&self, id: &str) -> bool {
    self.watch.is_empty() || self.watch.contains(id)
  }

  /// Sends one `resize` message per watched element.
  pub fn relay(&self, sizes: &[ElementSize]) {
    for size in sizes.iter().filter(|size| self.is_watched(&size.id)) {
      let event = ResizeEvent {
        id: size.id.clone(),
        height: size.height,
        width: size.width,
      };
      if let Err(e) = self.outbox.send(Outbound::Resize(event)) {
        tracing::warn!(error = %e, "dropping resize notifications");
        return;
      }
    }
  }

  pub fn install(self, source: &dyn EventSource) {
    source.on_resize(Box::new(move |sizes| self.relay(sizes)));
  }
}

/// An in-process [`EventSource`]: events are fed by calling its methods.
#[derive(Clone, Default)]
pub struct ManualEventSource {
  handlers: Arc<RwLock<Handlers>>,
}

#[derive(Default)]
struct Handlers {
  key_down: Vec<KeyHandler>,
  wheel: Vec<WheelHandler>,
  resize: Vec<ResizeHandler>,
}

impl ManualEventSource {
  pub fn new() -> Self {
    Self::default()
  }

  /// Runs every key handler; `PreventDefault` if any of them prevents.
  pub fn key_down(&self, event: KeyEvent) -> Disposition {
    self
      .handlers
      .read()
      .key_down
      .iter()
      .fold(Disposition::Default, |acc, handler| acc.merge(handler(&event)))
  }

  pub fn wheel(&self, event: WheelEvent) -> Disposition {
    self
      .handlers
      .read()
      .wheel
      .iter()
      .fold(Disposition::Default, |acc, handler| acc.merge(handler(&event)))
  }

  pub fn resize(&self, sizes: &[ElementSize]) {
    for handler in self.handlers.read().resize.iter() {
      handler(sizes);
    }
  }
}

impl EventSource for ManualEventSource {
  fn on_key_down(&self, handler: KeyHandler) {
    self.handlers.write().key_down.push(handler);
  }

  fn on_wheel(&self, handler: WheelHandler) {
    self.handlers.write().wheel.push(handler);
  }

  fn on_resize(&self, handler: ResizeHandler) {
    self.handlers.write().resize.push(handler);
  }
}

impl std::fmt::Debug for ManualEventSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let handlers = self.handlers.read();
    f.debug_struct("ManualEventSource")
      .field("key_down", &handlers.key_down.len())
      .field("wheel", &handlers.wheel.len())
      .field("resize", &handlers.resize.len())
      .finish()
  }
}
