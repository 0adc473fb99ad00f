use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use lru_tree::TreeCache;
use std::hint::black_box;
use std::thread;
use std::time::{Duration, Instant};

const CHAINS: usize = 1_000;
const DEPTHS: [usize; 3] = [5, 10, 50];
const THREADS: [usize; 3] = [4, 16, 64];

/// Builds `CHAINS` linear chains of `depth - 1` nodes under a common root and
/// returns the cache with the leaf keys. Capacity 0 sizes the cache exactly.
fn chained_tree(depth: usize, capacity: usize) -> (TreeCache<String, usize>, Vec<String>) {
    let capacity = if capacity == 0 { depth * CHAINS + 1 } else { capacity };
    let cache = TreeCache::new(capacity);
    cache.add_root("root".to_string(), 0).unwrap();

    let mut leaves = Vec::with_capacity(CHAINS);
    for chain in 1..=CHAINS {
        let mut parent = "root".to_string();
        for level in 1..depth {
            let key = format!("node-{chain}-{level}");
            cache.add(key.clone(), chain * depth + level, &parent).unwrap();
            parent = key;
        }
        leaves.push(parent);
    }
    (cache, leaves)
}

fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_cache_lookup");
    group.throughput(Throughput::Elements(1));

    for depth in DEPTHS {
        let (cache, leaves) = chained_tree(depth, 0);
        let mut i = 0;

        group.bench_with_input(BenchmarkId::new("get", depth), &depth, |b, _| {
            b.iter(|| {
                i = (i + 1) % leaves.len();
                black_box(cache.get(&leaves[i]).expect("leaf is cached"))
            })
        });
        group.bench_with_input(BenchmarkId::new("peek", depth), &depth, |b, _| {
            b.iter(|| {
                i = (i + 1) % leaves.len();
                black_box(cache.peek(&leaves[i]).expect("leaf is cached"))
            })
        });
        group.bench_with_input(BenchmarkId::new("get_branch", depth), &depth, |b, &depth| {
            b.iter(|| {
                i = (i + 1) % leaves.len();
                let branch = cache.get_branch(&leaves[i]);
                assert_eq!(branch.len(), depth);
                black_box(branch)
            })
        });
        group.bench_with_input(BenchmarkId::new("peek_branch", depth), &depth, |b, &depth| {
            b.iter(|| {
                i = (i + 1) % leaves.len();
                let branch = cache.peek_branch(&leaves[i]);
                assert_eq!(branch.len(), depth);
                black_box(branch)
            })
        });
    }
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_cache_add");
    let per_iter = CHAINS;
    group.throughput(Throughput::Elements(per_iter as u64));
    group.sample_size(10);

    for depth in DEPTHS {
        group.bench_with_input(BenchmarkId::new("leaf_under_chain", depth), &depth, |b, &depth| {
            b.iter_batched(
                // Room for every new leaf, so nothing is evicted
                || chained_tree(depth, depth * CHAINS + 1 + per_iter),
                |(cache, leaves)| {
                    let before = cache.len();
                    for (i, parent) in leaves.iter().enumerate() {
                        cache.add(format!("bench-node-{i}"), i, parent).unwrap();
                    }
                    assert_eq!(cache.len(), before + per_iter);
                    cache
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Splits `iters` lookups across `threads` threads and times the whole batch.
fn run_concurrent<F>(threads: usize, iters: u64, leaves: &[String], lookup: F) -> Duration
where
    F: Fn(&String) -> bool + Sync,
{
    let per_thread = (iters as usize / threads).max(1);
    let start = Instant::now();
    thread::scope(|scope| {
        for t in 0..threads {
            let lookup = &lookup;
            scope.spawn(move || {
                for i in 0..per_thread {
                    let key = &leaves[(t * per_thread + i) % leaves.len()];
                    assert!(lookup(key), "{key} not cached");
                }
            });
        }
    });
    start.elapsed()
}

fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_cache_concurrent");
    group.throughput(Throughput::Elements(1));

    for depth in DEPTHS {
        let (cache, leaves) = chained_tree(depth, 0);
        for threads in THREADS {
            let id = format!("depth={depth}/threads={threads}");
            group.bench_function(BenchmarkId::new("get", &id), |b| {
                b.iter_custom(|iters| {
                    run_concurrent(threads, iters, &leaves, |key| cache.get(key).is_some())
                })
            });
            group.bench_function(BenchmarkId::new("peek", &id), |b| {
                b.iter_custom(|iters| {
                    run_concurrent(threads, iters, &leaves, |key| cache.peek(key).is_some())
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_lookups, bench_add, bench_concurrent);
criterion_main!(benches);
