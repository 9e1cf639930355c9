use glyphport_cache::{CacheBuilder, LoadListener};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

struct PrintListener;

impl LoadListener<String, String, String> for PrintListener {
  fn on_loaded(&self, key: String, _value: Arc<String>) {
    println!("[listener] '{}' is ready", key);
  }

  fn on_failed(&self, key: String, error: Arc<String>) {
    println!("[listener] '{}' failed: {}", key, error);
  }
}

fn main() {
  let cache = CacheBuilder::<String, String, String>::default()
    .listener(PrintListener)
    .build()
    .expect("Failed to build cache");

  let (done_tx, done_rx) = mpsc::channel();

  // Three requests before the load finishes: one loader call, three answers.
  for requester in 1..=3 {
    let done_tx = done_tx.clone();
    cache.request(
      "courier".to_string(),
      |key, completion| {
        println!("Starting the only load of '{}'", key);
        thread::spawn(move || {
          thread::sleep(Duration::from_millis(200));
          completion.complete(Ok(format!("glyphs of {}", key)));
        });
      },
      move |outcome| {
        println!("Requester {} got {:?}", requester, outcome);
        done_tx.send(requester).unwrap();
      },
    );
  }

  let order: Vec<i32> = done_rx.iter().take(3).collect();
  println!("Answered in order {:?}", order);

  // Ready entries answer before `request` returns.
  cache.request(
    "courier".to_string(),
    |_, _| unreachable!("already loaded"),
    |outcome| println!("Immediate answer: {:?}", outcome),
  );

  println!("Metrics: {:#?}", cache.metrics());
}
