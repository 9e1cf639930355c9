use crate::error::BuildError;
use crate::handles::ResourceCache;
use crate::shared::CacheShared;
use crate::task::notifier::Notifier;
use crate::{LoadListener, TaskSpawner};

use core::fmt;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;

/// A builder for creating [`ResourceCache`] instances.
pub struct CacheBuilder<K, V, E, H = ahash::RandomState> {
  initial_capacity: usize,
  hasher: H,
  listener: Option<Arc<dyn LoadListener<K, V, E>>>,
  spawner: Option<Arc<dyn TaskSpawner>>,
  use_tokio_spawner: bool,
  _marker: PhantomData<fn() -> (K, V, E)>,
}

// Manual Debug implementation for CacheBuilder.
impl<K, V, E, H> fmt::Debug for CacheBuilder<K, V, E, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("initial_capacity", &self.initial_capacity)
      .field("has_listener", &self.listener.is_some())
      .field("has_spawner", &self.spawner.is_some())
      .field("use_tokio_spawner", &self.use_tokio_spawner)
      .finish_non_exhaustive()
  }
}

// --- General Configuration Methods ---
impl<K, V, E, H> CacheBuilder<K, V, E, H> {
  /// Pre-sizes the entry map for the expected number of distinct keys.
  pub fn initial_capacity(mut self, capacity: usize) -> Self {
    self.initial_capacity = capacity;
    self
  }

  /// Sets the load listener for the cache.
  pub fn listener<Listener>(mut self, listener: Listener) -> Self
  where
    Listener: LoadListener<K, V, E> + 'static,
  {
    self.listener = Some(Arc::new(listener));
    self
  }

  /// Sets the spawner that drives loader futures passed to `fetch`.
  ///
  /// Without a spawner, the first caller of `fetch` drives the loader inline.
  pub fn spawner(mut self, spawner: Arc<dyn TaskSpawner>) -> Self {
    self.spawner = Some(spawner);
    self.use_tokio_spawner = false;
    self
  }

  /// Uses the Tokio runtime current at `build()` time as the spawner.
  pub fn tokio_spawner(mut self) -> Self {
    self.use_tokio_spawner = true;
    self
  }
}

// --- Default Constructor ---
impl<K, V, E, H: BuildHasher + Default> CacheBuilder<K, V, E, H> {
  /// Creates a new `CacheBuilder` with default settings.
  pub fn new() -> Self {
    Self {
      initial_capacity: 0,
      hasher: H::default(),
      listener: None,
      spawner: None,
      use_tokio_spawner: false,
      _marker: PhantomData,
    }
  }
}

impl<K, V, E> Default for CacheBuilder<K, V, E, ahash::RandomState> {
  fn default() -> Self {
    Self::new()
  }
}

// --- Build Methods ---
impl<K, V, E, H> CacheBuilder<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  /// Sets the hasher for the cache.
  pub fn hasher<H2: BuildHasher>(self, hasher: H2) -> CacheBuilder<K, V, E, H2> {
    CacheBuilder {
      initial_capacity: self.initial_capacity,
      hasher,
      listener: self.listener,
      spawner: self.spawner,
      use_tokio_spawner: self.use_tokio_spawner,
      _marker: PhantomData,
    }
  }

  /// Builds the cache.
  pub fn build(self) -> Result<ResourceCache<K, V, E, H>, BuildError> {
    let spawner = match (self.spawner, self.use_tokio_spawner) {
      (_, true) => Some(Self::tokio_spawner_for_build()?),
      (spawner, false) => spawner,
    };

    let (notifier, notification_sender) = match self.listener {
      Some(listener) => {
        let (notifier, sender) = Notifier::spawn(listener);
        (Some(notifier), Some(sender))
      }
      None => (None, None),
    };

    let entries = HashMap::with_capacity_and_hasher(self.initial_capacity, self.hasher);
    let shared = CacheShared::new(entries, spawner, notification_sender, notifier);

    Ok(ResourceCache {
      shared: Arc::new(shared),
    })
  }

  #[cfg(feature = "tokio")]
  fn tokio_spawner_for_build() -> Result<Arc<dyn TaskSpawner>, BuildError> {
    crate::runtime::TokioSpawner::try_current()
      .map(|spawner| Arc::new(spawner) as Arc<dyn TaskSpawner>)
      .ok_or(BuildError::NoTokioRuntime)
  }

  #[cfg(not(feature = "tokio"))]
  fn tokio_spawner_for_build() -> Result<Arc<dyn TaskSpawner>, BuildError> {
    Err(BuildError::TokioFeatureDisabled)
  }
}
