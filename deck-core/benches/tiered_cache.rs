//! Tiered Cache Performance Benchmarks
//!
//! Measures key performance metrics for the card cache:
//! - Warm-tier insertion with and without LRU eviction
//! - Hot / warm / cold hit paths
//! - Miss path across all three tiers
//! - Repository lookups over an in-memory store
//!
//! Uses criterion.rs for statistical analysis with warm-up runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use deck_core::cache::{CacheConfig, TieredCache};
use deck_core::{CacheTier, CardRecord, LookupRepository};
use deck_store::InMemoryCardStore;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Setup Helpers
// ============================================================================

fn card(i: usize) -> CardRecord {
    CardRecord::new(format!("Card {}", i), "Creature").with_mana_cost("{2}", 2.0)
}

fn filled_cache(count: usize, tier: CacheTier) -> TieredCache<CardRecord> {
    let cache = TieredCache::new(CacheConfig::default().with_promotion_threshold(u64::MAX));
    for i in 0..count {
        cache.put_in_tier(format!("card {}", i), card(i), tier, None);
    }
    cache
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiered_cache_put");

    for size in [100usize, 1_000, 5_000] {
        group.throughput(Throughput::Elements(size as u64));
        // 超过 warm 容量 (1000) 时会触发淘汰
        group.bench_with_input(BenchmarkId::new("warm", size), &size, |b, &size| {
            b.iter(|| {
                let cache = TieredCache::new(CacheConfig::default());
                for i in 0..size {
                    cache.put(format!("card {}", i), card(i));
                }
                black_box(cache.get_stats());
            });
        });
    }

    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiered_cache_get_hit");

    for tier in CacheTier::ALL {
        let cache = filled_cache(100, tier);
        group.bench_function(BenchmarkId::new("tier", tier.name()), |b| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % 100;
                black_box(cache.get(&format!("card {}", i)));
            });
        });
    }

    group.finish();
}

fn bench_get_miss(c: &mut Criterion) {
    let cache = filled_cache(1_000, CacheTier::Warm);
    c.bench_function("tiered_cache_get_miss", |b| {
        b.iter(|| black_box(cache.get("not a card")));
    });
}

fn bench_repository_lookup(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = Arc::new(InMemoryCardStore::with_cards((0..1_000).map(card)));
    let cache = Arc::new(TieredCache::new(CacheConfig::default()));
    let repo = LookupRepository::new(cache, store);

    let mut group = c.benchmark_group("repository_lookup");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("cache_aside", |b| {
        let mut i = 0usize;
        b.to_async(&rt).iter(|| {
            i = (i + 7) % 1_000;
            let name = format!("Card {}", i);
            let repo = &repo;
            async move { black_box(repo.get_by_name(&name).await.unwrap()) }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_put,
    bench_get_hit,
    bench_get_miss,
    bench_repository_lookup
);
criterion_main!(benches);
