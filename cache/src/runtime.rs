use std::{future::Future, pin::Pin};

/// A boxed loader task, as handed to a [`TaskSpawner`].
pub type LoadTask = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A trait for spawning a loader future onto an asynchronous runtime.
///
/// Spawned loads run to completion even if every caller of `fetch` stops
/// waiting for them.
pub trait TaskSpawner: Send + Sync + 'static {
  /// Spawns a type-erased future.
  fn spawn(&self, future: LoadTask);
}

#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioSpawner(tokio::runtime::Handle);

#[cfg(feature = "tokio")]
impl TokioSpawner {
  /// Creates a spawner for the given runtime.
  pub fn new(handle: tokio::runtime::Handle) -> Self {
    Self(handle)
  }

  /// Creates a spawner that uses the current Tokio runtime context, if any.
  pub fn try_current() -> Option<Self> {
    tokio::runtime::Handle::try_current().ok().map(Self)
  }
}

#[cfg(feature = "tokio")]
impl TaskSpawner for TokioSpawner {
  fn spawn(&self, future: LoadTask) {
    self.0.spawn(future);
  }
}
