use crate::entry::{EntryState, EntryStatus, Waiter};
use crate::loader::{Completion, CompletionOutcome, Handoff};
use crate::runtime::LoadTask;
use crate::shared::CacheShared;
use crate::{MetricsSnapshot, Outcome};

use std::fmt;
use std::future::Future;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

/// A keyed cache of asynchronously loaded resources.
///
/// Cloning is cheap and every clone shares the same entries, so the cache is
/// created once by the owner of the process and handed to whatever needs it.
pub struct ResourceCache<K, V, E, H = ahash::RandomState>
where
  K: Send,
  V: Send + Sync,
  E: Send + Sync,
{
  pub(crate) shared: Arc<CacheShared<K, V, E, H>>,
}

impl<K, V, E, H> Clone for ResourceCache<K, V, E, H>
where
  K: Send,
  V: Send + Sync,
  E: Send + Sync,
{
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<K, V, E, H> fmt::Debug for ResourceCache<K, V, E, H>
where
  K: Send,
  V: Send + Sync,
  E: Send + Sync,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResourceCache")
      .field("shared", &self.shared)
      .finish()
  }
}

/// What `request` decided to do under the lock.
enum Step<V, E> {
  Serve(Outcome<V, E>, Waiter<V, E>),
  Wait,
  Load(u64),
}

impl<K, V, E, H> ResourceCache<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  pub fn metrics(&self) -> MetricsSnapshot {
    return self.shared.metrics.snapshot();
  }

  /// Requests the resource for `key`.
  ///
  /// - Ready: `on_ready` runs immediately, on this thread, before `request`
  ///   returns.
  /// - Pending: `on_ready` is queued behind the earlier requesters.
  /// - Being delivered on another thread: `on_ready` is queued behind the
  ///   consumers still waiting for that delivery. A consumer that requests the
  ///   same key from inside its callback is served immediately with the
  ///   outcome being delivered.
  /// - Absent or failed: an entry is created in the pending state with
  ///   `on_ready` as its first waiter, then `load` is called with the key and
  ///   the [`Completion`] it must eventually report through.
  ///
  /// `load` may complete synchronously, before returning, or later from any
  /// thread. No lock is held while `load` or `on_ready` run.
  pub fn request<L, U>(&self, key: K, load: L, on_ready: U)
  where
    L: FnOnce(K, Completion<K, V, E, H>),
    U: FnOnce(Outcome<V, E>) + Send + 'static,
  {
    let waiter: Waiter<V, E> = Box::new(on_ready);
    let metrics = &self.shared.metrics;

    let step = {
      let mut entries = self.shared.entries.lock();
      match entries.get_mut(&key) {
        Some(state) => match state {
          EntryState::Ready(value) => {
            metrics.hits.fetch_add(1, Ordering::Relaxed);
            Step::Serve(Ok(value.clone()), waiter)
          }
          EntryState::Draining {
            outcome,
            waiters,
            drainer,
            ..
          } => {
            if *drainer == thread::current().id() {
              // Re-entered from a consumer of this very delivery.
              metrics.hits.fetch_add(1, Ordering::Relaxed);
              Step::Serve(outcome.clone(), waiter)
            } else {
              metrics.coalesced.fetch_add(1, Ordering::Relaxed);
              waiters.push_back(waiter);
              Step::Wait
            }
          }
          EntryState::Pending { waiters, .. } => {
            metrics.coalesced.fetch_add(1, Ordering::Relaxed);
            waiters.push_back(waiter);
            Step::Wait
          }
          EntryState::Failed { .. } => {
            metrics.misses.fetch_add(1, Ordering::Relaxed);
            metrics.retries.fetch_add(1, Ordering::Relaxed);
            let attempt = self.shared.next_attempt();
            *state = EntryState::pending(attempt, waiter);
            Step::Load(attempt)
          }
        },
        None => {
          metrics.misses.fetch_add(1, Ordering::Relaxed);
          let attempt = self.shared.next_attempt();
          entries.insert(key.clone(), EntryState::pending(attempt, waiter));
          Step::Load(attempt)
        }
      }
    };

    match step {
      Step::Serve(outcome, waiter) => waiter(outcome),
      Step::Wait => {}
      Step::Load(attempt) => {
        tracing::debug!(attempt, "starting load");
        let completion = Completion::new(Arc::downgrade(&self.shared), key.clone(), attempt);
        load(key, completion);
      }
    }
  }

  /// Resolves the resource for `key`, loading it with `loader` if no load
  /// has succeeded yet.
  ///
  /// `loader` is only called when this call starts a load. The returned
  /// future is spawned on the configured [`TaskSpawner`](crate::TaskSpawner);
  /// without one it is driven inline by this call.
  pub async fn fetch<F, Fut>(&self, key: K, loader: F) -> Outcome<V, E>
  where
    F: FnOnce(K) -> Fut,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
  {
    let handoff = Arc::new(Handoff::new());
    let mut inline: Option<LoadTask> = None;

    {
      let handoff = handoff.clone();
      let spawner = self.shared.spawner.clone();
      let inline = &mut inline;
      self.request(
        key,
        move |key, completion| {
          let load = loader(key);
          let task: LoadTask = Box::pin(async move {
            let _ = completion.complete(load.await);
          });
          match spawner {
            Some(spawner) => spawner.spawn(task),
            None => *inline = Some(task),
          }
        },
        move |outcome| handoff.complete(outcome),
      );
    }

    if let Some(task) = inline {
      task.await;
    }
    (&*handoff).await
  }

  /// Fails the in-flight load of `key` with `error`, delivering it to every
  /// queued requester. The next request retries, and the original loader's
  /// completion is ignored when it fires.
  ///
  /// Returns `None` if `key` has no load in flight.
  pub fn fail_pending(&self, key: &K, error: E) -> Option<CompletionOutcome> {
    self.shared.fail_pending(key, error)
  }

  /// Returns the cached value for `key` if it is ready. Never loads.
  pub fn get(&self, key: &K) -> Option<Arc<V>> {
    self.shared.entries.lock().get(key)?.value().cloned()
  }

  /// Returns the error of the last load of `key` if that load failed.
  pub fn last_error(&self, key: &K) -> Option<Arc<E>> {
    self.shared.entries.lock().get(key)?.error().cloned()
  }

  /// Returns the state of `key`, or `None` if it was never requested.
  pub fn status(&self, key: &K) -> Option<EntryStatus> {
    self.shared.entries.lock().get(key).map(EntryState::status)
  }

  /// Returns `true` if `key` is ready.
  pub fn contains_key(&self, key: &K) -> bool {
    matches!(self.status(key), Some(EntryStatus::Ready))
  }

  /// Returns the number of entries in any state.
  pub fn len(&self) -> usize {
    self.shared.entries.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns every known key. Order is unspecified.
  pub fn keys(&self) -> Vec<K> {
    self.shared.entries.lock().keys().cloned().collect()
  }

  /// Returns every known key with its state. Order is unspecified.
  pub fn entries(&self) -> Vec<(K, EntryStatus)> {
    self
      .shared
      .entries
      .lock()
      .iter()
      .map(|(key, state)| (key.clone(), state.status()))
      .collect()
  }
}
