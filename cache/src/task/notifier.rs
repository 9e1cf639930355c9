use crate::listener::{LoadEvent, LoadListener};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use fibre::mpsc;

/// Capacity of the channel between completions and the listener thread.
const NOTIFICATION_CHANNEL_CAPACITY: usize = 128;

/// The background task responsible for calling a user-provided load listener.
pub(crate) struct Notifier {
  handle: JoinHandle<()>,
}

impl Notifier {
  /// Spawns a new notifier thread and returns the sender feeding it.
  pub(crate) fn spawn<K, V, E>(
    listener: Arc<dyn LoadListener<K, V, E>>,
  ) -> (Self, mpsc::BoundedSender<LoadEvent<K, V, E>>)
  where
    K: Send + 'static,
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
  {
    let (tx, rx): (
      mpsc::BoundedSender<LoadEvent<K, V, E>>,
      mpsc::BoundedReceiver<LoadEvent<K, V, E>>,
    ) = mpsc::bounded(NOTIFICATION_CHANNEL_CAPACITY);

    let handle = thread::spawn(move || {
      // Ends once the cache drops the last sender.
      while let Ok(event) = rx.recv() {
        match event {
          LoadEvent::Loaded(key, value) => listener.on_loaded(key, value),
          LoadEvent::Failed(key, error) => listener.on_failed(key, error),
        }
      }
    });

    (Self { handle }, tx)
  }

  /// Waits for queued notifications to be delivered.
  ///
  /// Must be called after the sender has been dropped. When invoked from the
  /// notifier thread itself (a listener dropping the last cache handle) the
  /// thread is detached instead.
  pub(crate) fn stop(self) {
    if self.handle.thread().id() == thread::current().id() {
      return;
    }
    if self.handle.join().is_err() {
      tracing::error!("cache load listener panicked");
    }
  }
}
