//! The dispatcher that routes inbound port messages to the services.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use glyphport_text::FontDirectory;
use tokio::runtime::Handle;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{EventSource, ResizeRelay, ZoomGuard};
use crate::messages::Inbound;
use crate::ports::{BridgePorts, Outbox};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageSync};
use crate::text_service::{font_cache, FontSource, TextService};

pub struct Bridge {
  text: TextService,
  storage: StorageSync,
}

impl Bridge {
  pub fn new(text: TextService, storage: StorageSync) -> Self {
    Self { text, storage }
  }

  /// Wires every service from `config`, installs the event handlers on
  /// `events` and answers on `outbox`.
  pub fn from_config(
    config: &Config,
    outbox: Outbox,
    runtime: Option<Handle>,
    events: &dyn EventSource,
  ) -> Result<Self> {
    let fonts = FontDirectory::new(&config.fonts.directory).with_extension(config.fonts.extension.clone());
    let source: Arc<dyn FontSource> = Arc::new(fonts);
    let text = TextService::new(font_cache()?, source, outbox.clone(), runtime);

    let store: Box<dyn KeyValueStore> = match &config.storage.path {
      Some(path) => Box::new(FileStore::open(path)?),
      None => Box::new(MemoryStore::new()),
    };
    let storage = StorageSync::new(store, outbox.clone());

    ZoomGuard::install(events);
    if config.resize.enabled {
      ResizeRelay::new(config.resize.watch.iter().cloned(), outbox).install(events);
    }

    tracing::info!(
      fonts = %config.fonts.directory.display(),
      storage = ?config.storage.path,
      resize = config.resize.enabled,
      "bridge configured"
    );
    Ok(Self::new(text, storage))
  }

  pub fn text(&self) -> &TextService {
    &self.text
  }

  /// Routes one message. Storage failures are returned; text requests
  /// always answer on the outbound port.
  pub fn dispatch(&mut self, message: Inbound) -> Result<()> {
    tracing::trace!(port = message.port(), "dispatching");
    match message {
      Inbound::TextToSvg(request) => {
        self.text.handle(request);
        Ok(())
      }
      Inbound::StorageGet(request) => self.storage.get(request.key),
      Inbound::StorageSet(entry) => self.storage.set(entry.key, entry.value),
      Inbound::StorageRemove(request) => self.storage.remove(request.key),
      Inbound::StorageClear => self.storage.clear(),
      Inbound::StorageKeys(query) => self.storage.keys(query.prefix),
    }
  }

  /// Sends the stored state, then serves inbound messages until the
  /// application closes its end. Only a closed outbound port stops it early.
  pub fn run(mut self, ports: BridgePorts) -> Result<()> {
    let BridgePorts { inbound, outbox } = ports;
    // The services hold their own senders.
    drop(outbox);

    self.storage.subscribe()?;
    while let Ok(message) = inbound.recv() {
      let port = message.port();
      match self.dispatch(message) {
        Ok(()) => {}
        Err(e @ Error::PortClosed(_)) => return Err(e),
        Err(e) => tracing::error!(port, error = %e, "request failed"),
      }
    }
    tracing::info!("inbound port closed, dispatcher stopping");
    Ok(())
  }

  /// Runs the dispatcher on its own thread.
  pub fn spawn(self, ports: BridgePorts) -> JoinHandle<Result<()>> {
    thread::spawn(move || self.run(ports))
  }
}

impl std::fmt::Debug for Bridge {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Bridge")
      .field("text", &self.text)
      .finish_non_exhaustive()
  }
}
