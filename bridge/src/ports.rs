//! The two bounded channels between the application and the bridge.

use fibre::mpsc;

use crate::error::{Error, Result};
use crate::messages::{Inbound, Outbound};

/// Sending half of the outbound port. Cheap to clone; every service that
/// answers the application holds one.
#[derive(Clone)]
pub struct Outbox {
  tx: mpsc::BoundedSender<Outbound>,
}

impl Outbox {
  /// Blocks while the outbound port is full.
  pub fn send(&self, message: Outbound) -> Result<()> {
    let port = message.port();
    tracing::trace!(port, "sending");
    self.tx.send(message).map_err(|_| Error::PortClosed(port))
  }
}

impl std::fmt::Debug for Outbox {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Outbox").finish_non_exhaustive()
  }
}

/// The application's ends: it sends requests and receives answers.
pub struct AppPorts {
  pub inbound: mpsc::BoundedSender<Inbound>,
  pub outbound: mpsc::BoundedReceiver<Outbound>,
}

impl AppPorts {
  pub fn send(&self, message: Inbound) -> Result<()> {
    let port = message.port();
    self.inbound.send(message).map_err(|_| Error::PortClosed(port))
  }

  /// Blocks until the bridge answers. Fails once every outbound sender is
  /// gone and the port is drained.
  pub fn recv(&self) -> Result<Outbound> {
    self.outbound.recv().map_err(|_| Error::PortClosed("outbound"))
  }

  pub fn try_recv(&self) -> Option<Outbound> {
    self.outbound.try_recv().ok()
  }
}

/// The bridge's ends.
pub struct BridgePorts {
  pub inbound: mpsc::BoundedReceiver<Inbound>,
  pub outbox: Outbox,
}

/// Opens both ports with `capacity` slots each.
pub fn open(capacity: usize) -> (AppPorts, BridgePorts) {
  let (inbound_tx, inbound_rx): (mpsc::BoundedSender<Inbound>, mpsc::BoundedReceiver<Inbound>) =
    mpsc::bounded(capacity);
  let (outbound_tx, outbound_rx): (
    mpsc::BoundedSender<Outbound>,
    mpsc::BoundedReceiver<Outbound>,
  ) = mpsc::bounded(capacity);

  (
    AppPorts {
      inbound: inbound_tx,
      outbound: outbound_rx,
    },
    BridgePorts {
      inbound: inbound_rx,
      outbox: Outbox { tx: outbound_tx },
    },
  )
}
