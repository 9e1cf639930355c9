use crate::shared::CacheShared;

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::hash::{BuildHasher, Hash};
use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

/// What happened to a result handed to [`Completion::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
  /// The entry was resolved and `waiters` queued consumers were invoked.
  Delivered { waiters: usize },
  /// The entry was no longer waiting for this load attempt. Nothing changed.
  Rejected,
  /// The cache was dropped before the load finished.
  Detached,
}

/// The single-use handle a loader reports its result through.
///
/// `complete` consumes the handle, so a loader cannot report twice. Dropping
/// the handle without completing leaves every waiter of the key pending; there
/// is no timeout.
#[must_use = "waiters stay pending until the completion is invoked"]
pub struct Completion<K, V, E, H = ahash::RandomState>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  shared: Weak<CacheShared<K, V, E, H>>,
  key: K,
  attempt: u64,
  done: bool,
}

impl<K, V, E, H> Completion<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  pub(crate) fn new(shared: Weak<CacheShared<K, V, E, H>>, key: K, attempt: u64) -> Self {
    Self {
      shared,
      key,
      attempt,
      done: false,
    }
  }

  /// The key being loaded.
  pub fn key(&self) -> &K {
    &self.key
  }

  /// Resolves the load, storing the value (or failure) and invoking every
  /// queued consumer in the order it was queued.
  pub fn complete(mut self, result: Result<V, E>) -> CompletionOutcome {
    self.done = true;
    match self.shared.upgrade() {
      Some(shared) => shared.resolve(&self.key, self.attempt, result),
      None => CompletionOutcome::Detached,
    }
  }
}

impl<K, V, E, H> Drop for Completion<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  fn drop(&mut self) {
    if !self.done && self.shared.strong_count() > 0 {
      tracing::warn!(
        attempt = self.attempt,
        "load completion dropped without a result; queued requests stay pending"
      );
    }
  }
}

impl<K, V, E, H> fmt::Debug for Completion<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + fmt::Debug + 'static,
  V: Send + Sync + 'static,
  E: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Completion")
      .field("key", &self.key)
      .field("attempt", &self.attempt)
      .finish_non_exhaustive()
  }
}

/// The internal state of a value being handed to an async waiter.
enum State<T> {
  Waiting,
  Complete(T),
}

struct Inner<T> {
  state: State<T>,
  wakers: VecDeque<Waker>,
}

/// A future that resolves once a queued consumer receives its outcome.
///
/// It bridges the callback queue to `async` callers of `fetch`.
pub(crate) struct Handoff<T> {
  inner: Mutex<Inner<T>>,
}

impl<T> Handoff<T> {
  /// Creates a new `Handoff` in the "Waiting" state.
  pub(crate) fn new() -> Self {
    Self {
      inner: Mutex::new(Inner {
        state: State::Waiting,
        wakers: VecDeque::new(),
      }),
    }
  }

  /// Completes the handoff with a value, waking all pollers.
  pub(crate) fn complete(&self, value: T) {
    let wakers = {
      let mut inner = self.inner.lock();
      inner.state = State::Complete(value);
      std::mem::take(&mut inner.wakers)
    };
    for waker in wakers {
      waker.wake();
    }
  }
}

impl<T: Clone> Future for &Handoff<T> {
  type Output = T;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut inner = self.inner.lock();
    match &inner.state {
      State::Complete(value) => Poll::Ready(value.clone()),
      State::Waiting => {
        if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
          inner.wakers.push_back(cx.waker().clone());
        }
        Poll::Pending
      }
    }
  }
}
