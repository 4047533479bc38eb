mod api;
mod config;
mod db;
mod detector;
mod error;
mod stats;
mod types;

use std::sync::Arc;

use sqlx::sqlite::SqliteConnectOptions;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::detector::PlatformConfig;
use crate::error::Result;
use crate::stats::PlayerStats;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let options = SqliteConnectOptions::new()
        .filename(&cfg.db_path)
        .create_if_missing(true);
    let pool = sqlx::SqlitePool::connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready at {}", cfg.db_path);

    // --- Hand-history detection ---
    let platform = PlatformConfig::from_host(cfg.platform_override);
    let detections = detector::detect_all(&platform);
    let health = Arc::new(HealthState::new());
    health.set_sites_detected(detections.iter().filter(|d| d.detected).count() as u64);

    let mut heroes = cfg.heroes.clone();
    for d in detections.iter().filter(|d| d.detected) {
        info!(
            site = %d.site,
            hero = %d.heroname,
            "Hand histories found at {}",
            d.hhpath
        );
        heroes.entry(d.site).or_insert_with(|| d.heroname.clone());
    }
    if heroes.is_empty() {
        warn!("No hero configured or detected. Set HEROES, e.g. HEROES=PokerStars=Alice");
    }
    info!(platform = %platform.platform, heroes = heroes.len(), "Detection complete");

    // --- Stats builder ---
    let latency = Arc::new(LatencyStats::new());
    let stats = PlayerStats::new(pool, &cfg, Arc::clone(&latency), Arc::clone(&health))?;

    // HTTP API server
    let api_state = ApiState {
        stats: Arc::new(stats),
        platform: Arc::new(platform),
        latency,
        health,
        heroes: Arc::new(heroes),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
