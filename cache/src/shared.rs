use crate::entry::{EntryState, Waiter};
use crate::listener::LoadEvent;
use crate::loader::CompletionOutcome;
use crate::metrics::Metrics;
use crate::task::notifier::Notifier;
use crate::{Outcome, TaskSpawner};

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use fibre::mpsc;
use parking_lot::Mutex;

/// The internal, thread-safe core of the cache.
pub(crate) struct CacheShared<K, V, E, H>
where
  K: Send,
  V: Send + Sync,
  E: Send + Sync,
{
  pub(crate) entries: Mutex<HashMap<K, EntryState<V, E>, H>>,
  pub(crate) metrics: Metrics,
  pub(crate) spawner: Option<Arc<dyn TaskSpawner>>,
  pub(crate) notification_sender: Option<mpsc::BoundedSender<LoadEvent<K, V, E>>>,
  pub(crate) notifier: Option<Notifier>,
  next_attempt: AtomicU64,
}

impl<K, V, E, H> fmt::Debug for CacheShared<K, V, E, H>
where
  K: Send,
  V: Send + Sync,
  E: Send + Sync,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheShared")
      .field("entries", &self.entries.lock().len())
      .field("has_spawner", &self.spawner.is_some())
      .field("metrics", &self.metrics.snapshot())
      .finish_non_exhaustive()
  }
}

impl<K, V, E, H> Drop for CacheShared<K, V, E, H>
where
  K: Send,
  V: Send + Sync,
  E: Send + Sync,
{
  fn drop(&mut self) {
    // The notifier thread exits once every sender is gone.
    self.notification_sender.take();
    if let Some(notifier) = self.notifier.take() {
      notifier.stop();
    }
  }
}

impl<K, V, E, H> CacheShared<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  pub(crate) fn new(
    entries: HashMap<K, EntryState<V, E>, H>,
    spawner: Option<Arc<dyn TaskSpawner>>,
    notification_sender: Option<mpsc::BoundedSender<LoadEvent<K, V, E>>>,
    notifier: Option<Notifier>,
  ) -> Self {
    Self {
      entries: Mutex::new(entries),
      metrics: Metrics::new(),
      spawner,
      notification_sender,
      notifier,
      next_attempt: AtomicU64::new(1),
    }
  }

  #[inline]
  pub(crate) fn next_attempt(&self) -> u64 {
    self.next_attempt.fetch_add(1, Ordering::Relaxed)
  }

  /// Applies a loader result to the pending entry for `key`.
  ///
  /// The entry moves to `Draining` and its consumers are invoked one at a
  /// time, each with the lock released, so a consumer may call back into the
  /// cache. The entry settles into `Ready` or `Failed` as its last consumer is taken.
  pub(crate) fn resolve(&self, key: &K, attempt: u64, result: Result<V, E>) -> CompletionOutcome {
    let outcome: Outcome<V, E> = result.map(Arc::new).map_err(Arc::new);

    let queued = {
      let mut entries = self.entries.lock();
      let state = match entries.get_mut(key) {
        Some(state) if state.is_pending_attempt(attempt) => state,
        _ => {
          self
            .metrics
            .rejected_completions
            .fetch_add(1, Ordering::Relaxed);
          tracing::warn!(attempt, "ignoring completion for a load that is no longer pending");
          return CompletionOutcome::Rejected;
        }
      };

      let waiters = match state {
        EntryState::Pending { waiters, .. } => std::mem::take(waiters),
        _ => VecDeque::new(),
      };
      let queued = waiters.len();
      *state = EntryState::Draining {
        attempt,
        outcome: outcome.clone(),
        waiters,
        drainer: thread::current().id(),
      };
      queued
    };

    match &outcome {
      Ok(_) => {
        self.metrics.loads_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(attempt, waiters = queued, "load completed");
      }
      Err(_) => {
        self.metrics.loads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(attempt, waiters = queued, "load failed");
      }
    }

    let mut delivered = 0;
    while let Some(waiter) = self.next_drained(key) {
      waiter(outcome.clone());
      delivered += 1;
    }

    self
      .metrics
      .waiters_notified
      .fetch_add(delivered as u64, Ordering::Relaxed);
    let event = match outcome {
      Ok(value) => LoadEvent::Loaded(key.clone(), value),
      Err(error) => LoadEvent::Failed(key.clone(), error),
    };
    self.notify(event);

    CompletionOutcome::Delivered { waiters: delivered }
  }

  /// Fails the in-flight load of `key`, if any, with `error`.
  ///
  /// The original loader's completion is rejected when it eventually fires.
  pub(crate) fn fail_pending(&self, key: &K, error: E) -> Option<CompletionOutcome> {
    let attempt = match self.entries.lock().get(key) {
      Some(EntryState::Pending { attempt, .. }) => *attempt,
      _ => return None,
    };
    tracing::info!(attempt, "failing in-flight load on request");
    Some(self.resolve(key, attempt, Err(error)))
  }

  fn next_drained(&self, key: &K) -> Option<Waiter<V, E>> {
    self.entries.lock().get_mut(key)?.next_drained()
  }

  fn notify(&self, event: LoadEvent<K, V, E>) {
    if let Some(sender) = &self.notification_sender {
      if sender.try_send(event).is_err() {
        tracing::debug!("load listener is saturated; dropping notification");
      }
    }
  }
}
