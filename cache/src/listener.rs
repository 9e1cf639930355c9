use std::fmt;
use std::sync::Arc;

/// A load result forwarded to the registered [`LoadListener`].
pub enum LoadEvent<K, V, E> {
  /// The key was loaded and is now served from the cache.
  Loaded(K, Arc<V>),
  /// The load failed; the key will be retried on its next request.
  Failed(K, Arc<E>),
}

impl<K: fmt::Debug, V, E: fmt::Display> fmt::Debug for LoadEvent<K, V, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LoadEvent::Loaded(key, _) => f.debug_tuple("Loaded").field(key).finish(),
      LoadEvent::Failed(key, error) => f
        .debug_tuple("Failed")
        .field(key)
        .field(&format_args!("{}", error))
        .finish(),
    }
  }
}

/// A listener that can be registered with the cache to observe load results.
///
/// Methods are called on a dedicated background thread, after the waiters of
/// the load have been served, so a slow listener never delays a requester.
pub trait LoadListener<K, V, E>: Send + Sync {
  fn on_loaded(&self, key: K, value: Arc<V>);

  fn on_failed(&self, key: K, error: Arc<E>) {
    let _ = (key, error);
  }
}
