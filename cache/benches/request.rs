use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glyphport_cache::{CacheBuilder, ResourceCache};

type BenchCache = ResourceCache<u64, u64, ()>;

fn ready_cache(num_items: u64) -> BenchCache {
  let cache: BenchCache = CacheBuilder::default()
    .initial_capacity(num_items as usize)
    .build()
    .unwrap();
  for key in 0..num_items {
    cache.request(
      key,
      |key, completion| {
        let _ = completion.complete(Ok(key * 2));
      },
      |_| {},
    );
  }
  cache
}

fn bench_ready_hits(c: &mut Criterion) {
  let mut group = c.benchmark_group("request_ready");
  for num_items in [16u64, 1_024, 65_536] {
    let cache = ready_cache(num_items);
    group.throughput(Throughput::Elements(1));
    group.bench_with_input(BenchmarkId::from_parameter(num_items), &num_items, |b, &n| {
      let mut key = 0u64;
      b.iter(|| {
        key = (key + 1) % n;
        cache.request(
          black_box(key),
          |_, _| unreachable!("bench keys are ready"),
          |outcome| {
            black_box(outcome.ok());
          },
        );
      });
    });
  }
  group.finish();
}

fn bench_coalesced_waiters(c: &mut Criterion) {
  let mut group = c.benchmark_group("request_coalesced");
  for waiters in [1usize, 8, 64] {
    group.throughput(Throughput::Elements(waiters as u64));
    group.bench_with_input(BenchmarkId::from_parameter(waiters), &waiters, |b, &waiters| {
      b.iter(|| {
        let cache: BenchCache = CacheBuilder::default().build().unwrap();
        let mut parked = None;
        for _ in 0..waiters {
          cache.request(
            7,
            |_, completion| parked = Some(completion),
            |outcome| {
              black_box(outcome.ok());
            },
          );
        }
        if let Some(completion) = parked {
          black_box(completion.complete(Ok(14)));
        }
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_ready_hits, bench_coalesced_waiters);
criterion_main!(benches);
