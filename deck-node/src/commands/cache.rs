//! # Cache Commands
//!
//! stats / clear

use anyhow::Result;
use deck_core::{CacheHealth, CacheStats, CacheTier, TierSizes};
use serde::Serialize;

use super::Session;

#[derive(Debug, Serialize)]
struct StatsReport {
    store: String,
    store_healthy: bool,
    stats: CacheStats,
    hit_rate: f64,
    tiers: TierSizes,
    health: CacheHealth,
}

pub async fn stats(session: &Session) -> Result<()> {
    let stats = session.cache.get_stats();
    let report = StatsReport {
        store: session.config.store.database_path.display().to_string(),
        store_healthy: session.repo.store().health_check().await,
        hit_rate: stats.hit_rate(),
        stats,
        tiers: session.cache.tier_sizes(),
        health: session.cache.health_check(),
    };

    session.emit(&report, || {
        println!("Card database: {} ({})", report.store, if report.store_healthy { "ok" } else { "unavailable" });
        println!(
            "Requests: {} hits, {} misses ({:.1}% hit rate)",
            report.stats.hits,
            report.stats.misses,
            report.hit_rate * 100.0
        );
        println!(
            "Entries:  {} total, {} evictions, {} expirations, {} promotions",
            report.stats.size, report.stats.evictions, report.stats.expirations, report.stats.promotions
        );
        for (tier, health) in [
            (CacheTier::Hot, &report.health.hot),
            (CacheTier::Warm, &report.health.warm),
            (CacheTier::Cold, &report.health.cold),
        ] {
            println!(
                "  L{} {:<5} {:>6} / {:<6} ({:.1}%)",
                tier.level(),
                tier.name(),
                health.size,
                health.capacity,
                health.utilization * 100.0
            );
        }
    })
}

#[derive(Debug, Serialize)]
struct ClearReport {
    tier: Option<CacheTier>,
    removed: usize,
}

pub fn clear(session: &Session, tier: Option<CacheTier>) -> Result<()> {
    let removed = match tier {
        Some(tier) => session.repo.clear_tier(tier),
        None => session.repo.clear_cache(),
    };
    let report = ClearReport { tier, removed };

    session.emit(&report, || match report.tier {
        Some(tier) => println!("Cleared {} entries from the {} tier", report.removed, tier),
        None => println!("Cleared {} entries, statistics reset", report.removed),
    })
}
