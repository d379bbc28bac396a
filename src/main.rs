//! LRU TTL - demonstration driver
//!
//! Runs the reference scenario against a cache backed by the monotonic clock
//! and prints each lookup and the final statistics as JSON.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lru_ttl::models::{LookupReport, StatsReport};
use lru_ttl::{CacheEngine, Config};

/// Main entry point for the demo driver.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Fill the cache, read back, pause past the first TTL, read again
/// 4. Insert one more key and print the resulting statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lru_ttl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, pause={}s",
        config.capacity, config.pause_secs
    );

    let mut cache: CacheEngine<&str, &str> =
        CacheEngine::from_config(&config).context("failed to build cache")?;

    cache.put("a", "apple", Duration::from_secs(2));
    cache.put("b", "banana", Duration::from_secs(4));
    print_lookup("a", cache.get("a"))?;

    info!("Sleeping {}s", config.pause_secs);
    tokio::time::sleep(config.pause()).await;
    print_lookup("a", cache.get("a"))?;

    cache.put("c", "cherry", Duration::from_secs(3));
    info!("Keys by recency: {:?}", cache.keys());

    let report = StatsReport::new(&cache.stats(), cache.capacity());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn print_lookup(key: &str, value: Option<&str>) -> anyhow::Result<()> {
    let report = LookupReport::new(key, value);
    if !report.hit {
        info!("Key '{}' not found", key);
    }
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
