use crate::Outcome;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::ThreadId;

/// A consumer queued on a pending entry.
pub(crate) type Waiter<V, E> = Box<dyn FnOnce(Outcome<V, E>) + Send>;

/// The state of a single key.
///
/// `attempt` identifies one loader invocation. A completion is only accepted
/// by the `Pending` entry carrying the same attempt number.
///
/// `Draining` sits between `Pending` and `Ready`/`Failed` while the completing
/// thread hands the outcome to the queued consumers one at a time. Requests
/// from other threads join the back of the queue, so they never overtake a
/// consumer queued before them. The entry settles as the last consumer is
/// taken.
pub(crate) enum EntryState<V, E> {
  Pending {
    attempt: u64,
    waiters: VecDeque<Waiter<V, E>>,
  },
  Draining {
    attempt: u64,
    outcome: Outcome<V, E>,
    waiters: VecDeque<Waiter<V, E>>,
    drainer: ThreadId,
  },
  Ready(Arc<V>),
  Failed {
    attempt: u64,
    error: Arc<E>,
  },
}

impl<V, E> EntryState<V, E> {
  /// Creates a pending entry with a single queued consumer.
  pub(crate) fn pending(attempt: u64, first: Waiter<V, E>) -> Self {
    let mut waiters = VecDeque::with_capacity(1);
    waiters.push_back(first);
    EntryState::Pending { attempt, waiters }
  }

  #[inline]
  pub(crate) fn is_pending_attempt(&self, expected: u64) -> bool {
    matches!(self, EntryState::Pending { attempt, .. } if *attempt == expected)
  }

  /// Takes the next consumer of a draining entry. Taking the last one
  /// settles the entry into `Ready` or `Failed` before that consumer runs.
  pub(crate) fn next_drained(&mut self) -> Option<Waiter<V, E>> {
    let (next, settled) = match self {
      EntryState::Draining {
        attempt,
        outcome,
        waiters,
        ..
      } => {
        let next = waiters.pop_front();
        if !waiters.is_empty() {
          return next;
        }
        let settled = match outcome {
          Ok(value) => EntryState::Ready(value.clone()),
          Err(error) => EntryState::Failed {
            attempt: *attempt,
            error: error.clone(),
          },
        };
        (next, settled)
      }
      _ => return None,
    };
    *self = settled;
    next
  }

  /// The value, if the entry holds one.
  pub(crate) fn value(&self) -> Option<&Arc<V>> {
    match self {
      EntryState::Ready(value) => Some(value),
      EntryState::Draining {
        outcome: Ok(value), ..
      } => Some(value),
      _ => None,
    }
  }

  /// The error of the last attempt, if it failed.
  pub(crate) fn error(&self) -> Option<&Arc<E>> {
    match self {
      EntryState::Failed { error, .. } => Some(error),
      EntryState::Draining {
        outcome: Err(error), ..
      } => Some(error),
      _ => None,
    }
  }

  pub(crate) fn status(&self) -> EntryStatus {
    match self {
      EntryState::Pending { waiters, .. } => EntryStatus::Pending {
        waiters: waiters.len(),
      },
      EntryState::Draining { outcome: Ok(_), .. } | EntryState::Ready(_) => EntryStatus::Ready,
      EntryState::Draining { outcome: Err(_), .. } | EntryState::Failed { .. } => {
        EntryStatus::Failed
      }
    }
  }
}

impl<V, E> fmt::Debug for EntryState<V, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EntryState::Pending { attempt, waiters } => f
        .debug_struct("Pending")
        .field("attempt", attempt)
        .field("waiters", &waiters.len())
        .finish(),
      EntryState::Draining {
        attempt, waiters, ..
      } => f
        .debug_struct("Draining")
        .field("attempt", attempt)
        .field("waiters", &waiters.len())
        .finish(),
      EntryState::Ready(_) => f.write_str("Ready"),
      EntryState::Failed { attempt, .. } => {
        f.debug_struct("Failed").field("attempt", attempt).finish()
      }
    }
  }
}

/// A public, value-free view of an entry's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryStatus {
  /// A loader is in flight; `waiters` consumers are queued.
  Pending { waiters: usize },
  /// The value is cached and served synchronously.
  Ready,
  /// The last load failed. The next request retries.
  Failed,
}

impl fmt::Display for EntryStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EntryStatus::Pending { waiters } => write!(f, "pending ({} waiting)", waiters),
      EntryStatus::Ready => write!(f, "ready"),
      EntryStatus::Failed => write!(f, "failed"),
    }
  }
}
