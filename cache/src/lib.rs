//! A keyed, de-duplicating asynchronous resource cache.
//!
//! Each key is loaded at most once. Requests that arrive while a load is in
//! flight are queued on the pending entry and served, in the order they were
//! made, when the loader reports its result.
//!
//! # Features
//! - **Single flight**: exactly one loader invocation per key and attempt.
//! - **Callback & async APIs**: `request` takes a completion-style loader and a
//!   consumer callback, `fetch` wraps the same machinery in a future.
//! - **Explicit failure**: a failed load is delivered to every waiter and the
//!   next request for that key retries the loader.
//! - **Observability**: load listeners and a metrics snapshot.

pub mod builder;
pub mod error;
pub mod handles;
pub mod listener;
pub mod metrics;
pub mod runtime;

// Internal, crate-only modules
mod entry;
mod loader;
mod shared;
mod task;

pub use builder::CacheBuilder;
pub use entry::EntryStatus;
pub use error::BuildError;
pub use handles::ResourceCache;
pub use listener::{LoadEvent, LoadListener};
pub use loader::{Completion, CompletionOutcome};
pub use metrics::MetricsSnapshot;
pub use runtime::{LoadTask, TaskSpawner};
#[cfg(feature = "tokio")]
pub use runtime::TokioSpawner;

use std::sync::Arc;

/// The result delivered to every requester of a key.
///
/// Values and errors are shared, so every waiter of one load observes the
/// same allocation.
pub type Outcome<V, E> = Result<Arc<V>, Arc<E>>;
