use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;

/// A thread-safe, internal metrics collector for the cache.
/// All fields are atomic to allow for lock-free updates.
#[derive(Debug)]
pub struct Metrics {
  // --- Request outcomes ---
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) coalesced: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,
  pub(crate) retries: CachePadded<AtomicU64>,

  // --- Loader outcomes ---
  pub(crate) loads_succeeded: CachePadded<AtomicU64>,
  pub(crate) loads_failed: CachePadded<AtomicU64>,
  pub(crate) rejected_completions: CachePadded<AtomicU64>,
  pub(crate) waiters_notified: CachePadded<AtomicU64>,

  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      hits: CachePadded::new(AtomicU64::new(0)),
      coalesced: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
      retries: CachePadded::new(AtomicU64::new(0)),
      loads_succeeded: CachePadded::new(AtomicU64::new(0)),
      loads_failed: CachePadded::new(AtomicU64::new(0)),
      rejected_completions: CachePadded::new(AtomicU64::new(0)),
      waiters_notified: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Creates a point-in-time snapshot of the current metrics.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let coalesced = self.coalesced.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let total_requests = hits + coalesced + misses;

    MetricsSnapshot {
      hits,
      coalesced,
      misses,
      hit_ratio: if total_requests == 0 {
        0.0
      } else {
        hits as f64 / total_requests as f64
      },
      retries: self.retries.load(Ordering::Relaxed),
      loads_succeeded: self.loads_succeeded.load(Ordering::Relaxed),
      loads_failed: self.loads_failed.load(Ordering::Relaxed),
      rejected_completions: self.rejected_completions.load(Ordering::Relaxed),
      waiters_notified: self.waiters_notified.load(Ordering::Relaxed),
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time, public-facing snapshot of the cache's metrics.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
  /// Requests served synchronously from a ready entry.
  pub hits: u64,
  /// Requests queued behind a load that was already in flight.
  pub coalesced: u64,
  /// Requests that started a load (first request or retry).
  pub misses: u64,
  /// The share of requests answered without waiting: hits / all requests.
  pub hit_ratio: f64,
  /// Loads started for a key whose previous load failed.
  pub retries: u64,
  /// Loads that completed with a value.
  pub loads_succeeded: u64,
  /// Loads that completed with an error.
  pub loads_failed: u64,
  /// Completions ignored because their load was no longer pending.
  pub rejected_completions: u64,
  /// Queued consumers invoked by completions.
  pub waiters_notified: u64,
  /// The number of seconds the cache has been running.
  pub uptime_secs: u64,
}

impl MetricsSnapshot {
  /// Loads currently in flight.
  pub fn loads_in_flight(&self) -> u64 {
    self
      .misses
      .saturating_sub(self.loads_succeeded + self.loads_failed)
  }
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("coalesced", &self.coalesced)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("retries", &self.retries)
      .field("loads_succeeded", &self.loads_succeeded)
      .field("loads_failed", &self.loads_failed)
      .field("rejected_completions", &self.rejected_completions)
      .field("waiters_notified", &self.waiters_notified)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
