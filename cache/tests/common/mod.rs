#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glyphport_cache::{CacheBuilder, Completion, Outcome, ResourceCache};

pub type TestCache = ResourceCache<String, String, String>;
pub type TestCompletion = Completion<String, String, String>;

pub fn build_test_cache() -> TestCache {
  CacheBuilder::default().build().unwrap()
}

/// A loader that never completes on its own. Completions are parked so the
/// test decides when (and with what) each load finishes.
#[derive(Clone, Default)]
pub struct ManualLoader {
  parked: Arc<Mutex<Vec<TestCompletion>>>,
  calls: Arc<AtomicUsize>,
}

impl ManualLoader {
  pub fn load(&self) -> impl FnOnce(String, TestCompletion) {
    let this = self.clone();
    move |_key, completion| {
      this.calls.fetch_add(1, Ordering::SeqCst);
      this.parked.lock().unwrap().push(completion);
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn parked(&self) -> usize {
    self.parked.lock().unwrap().len()
  }

  /// Removes the oldest parked completion for `key`.
  pub fn take(&self, key: &str) -> TestCompletion {
    let mut parked = self.parked.lock().unwrap();
    let index = parked
      .iter()
      .position(|c| c.key() == key)
      .unwrap_or_else(|| panic!("no parked completion for {}", key));
    parked.remove(index)
  }
}

/// Records delivered outcomes, tagged with the requester that received them.
#[derive(Clone, Default)]
pub struct Recorder {
  seen: Arc<Mutex<Vec<(usize, Result<String, String>)>>>,
}

impl Recorder {
  pub fn consumer(&self, tag: usize) -> impl FnOnce(Outcome<String, String>) + Send + 'static {
    let seen = self.seen.clone();
    move |outcome| {
      let plain = outcome.map(|v| (*v).clone()).map_err(|e| (*e).clone());
      seen.lock().unwrap().push((tag, plain));
    }
  }

  pub fn seen(&self) -> Vec<(usize, Result<String, String>)> {
    self.seen.lock().unwrap().clone()
  }

  pub fn tags(&self) -> Vec<usize> {
    self.seen().into_iter().map(|(tag, _)| tag).collect()
  }
}

pub fn never_load(_key: String, _completion: TestCompletion) {
  panic!("loader must not be invoked");
}
