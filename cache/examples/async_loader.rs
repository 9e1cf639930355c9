use glyphport_cache::CacheBuilder;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tokio::time::{sleep, Duration};

// A simulated slow font parse.
async fn parse_font(name: String, load_count: Arc<AtomicUsize>) -> Result<String, String> {
  println!("--- Loader: parsing font '{}'. Simulating slow read...", name);
  load_count.fetch_add(1, Ordering::SeqCst);
  sleep(Duration::from_millis(500)).await;
  Ok(format!("glyphs of {}", name))
}

#[tokio::main]
async fn main() {
  let load_counter = Arc::new(AtomicUsize::new(0));

  let cache = CacheBuilder::<String, String, String>::default()
    .tokio_spawner()
    .build()
    .expect("Failed to build cache");

  println!("--- Thundering Herd Demonstration ---");
  println!("Spawning 10 tasks to request the font 'arial' at once.\n");

  let mut tasks = Vec::new();
  for i in 0..10 {
    let cache = cache.clone();
    let counter = load_counter.clone();
    tasks.push(tokio::spawn(async move {
      println!("[Task {}] Requesting 'arial'...", i);
      let value = cache
        .fetch("arial".to_string(), |name| parse_font(name, counter))
        .await
        .expect("load failed");
      println!("[Task {}] Received: {}", i, value);
      assert_eq!(*value, "glyphs of arial");
    }));
  }

  for task in tasks {
    task.await.unwrap();
  }

  println!("\n--- Verification ---");
  println!(
    "Loader was called {} time(s).",
    load_counter.load(Ordering::SeqCst)
  );
  assert_eq!(load_counter.load(Ordering::SeqCst), 1);

  println!("\n--- Second Request ---");
  let counter = load_counter.clone();
  let value = cache
    .fetch("arial".to_string(), |name| parse_font(name, counter))
    .await
    .expect("load failed");
  println!("Received: {} (served from cache)", value);
  assert_eq!(load_counter.load(Ordering::SeqCst), 1);

  println!("\nCache metrics: {:#?}", cache.metrics());
}
