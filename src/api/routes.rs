use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::detector::{self, PlatformConfig};
use crate::error::AppError;
use crate::stats::filters::{detail_catalog, DetailFilterInfo, FilterSelection};
use crate::stats::{PlayerStats, StatsOutcome, StatsPage};
use crate::types::{DetectionResult, Platform, Site};

#[derive(Clone)]
pub struct ApiState {
    pub stats: Arc<PlayerStats>,
    pub platform: Arc<PlatformConfig>,
    pub latency: Arc<LatencyStats>,
    pub health: Arc<HealthState>,
    /// Configured or detected hero per site, used when a request omits one.
    pub heroes: Arc<BTreeMap<Site, String>>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/sites", get(get_sites))
        .route("/sites/:name", get(get_site))
        .route("/stats", post(post_stats))
        .route("/stats/latency", get(get_stats_latency))
        .route("/filters/details", get(get_detail_filters))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct StatsResponse {
    pub page: Option<StatsPage>,
    /// Why no page was built.
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub platform: Platform,
    pub sites_detected: u64,
    pub pages_built: u64,
    pub empty_pages: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_sites(State(state): State<ApiState>) -> Json<Vec<DetectionResult>> {
    Json(detector::detect_all(&state.platform))
}

async fn get_site(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<DetectionResult>, AppError> {
    let site = name.parse::<Site>()?;
    Ok(Json(detector::detect(site, &state.platform)))
}

async fn post_stats(
    State(state): State<ApiState>,
    Json(mut filters): Json<FilterSelection>,
) -> Result<Json<StatsResponse>, AppError> {
    for (site, hero) in state.heroes.iter() {
        filters.heroes.entry(*site).or_insert_with(|| hero.clone());
    }
    let response = match state.stats.fill_stats(&filters).await? {
        StatsOutcome::Page(page) => StatsResponse {
            page: Some(page),
            message: None,
        },
        StatsOutcome::NoPlayers => StatsResponse {
            page: None,
            message: Some("No player ids found".to_string()),
        },
        StatsOutcome::NoStakes => StatsResponse {
            page: None,
            message: Some("No limits found".to_string()),
        },
    };
    Ok(Json(response))
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let percentiles = state.latency.percentiles_ms();
    Json(LatencyResponse {
        p50_ms: percentiles.map(|p| p.0),
        p95_ms: percentiles.map(|p| p.1),
        p99_ms: percentiles.map(|p| p.2),
        sample_count: state.latency.len(),
    })
}

async fn get_detail_filters() -> Json<Vec<DetailFilterInfo>> {
    Json(detail_catalog())
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        platform: state.platform.platform,
        sites_detected: state.health.sites_detected(),
        pages_built: state.health.pages_built(),
        empty_pages: state.health.empty_pages(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn state(root: &std::path::Path) -> ApiState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        sqlx::query("INSERT INTO Players (id, name, siteId) VALUES (1, 'Alice', 2)")
            .execute(&pool)
            .await
            .unwrap();

        let cfg = Config {
            log_level: "info".to_string(),
            db_path: ":memory:".to_string(),
            api_port: 0,
            default_site_id: 2,
            platform_override: None,
            heroes: Default::default(),
        };
        let latency = Arc::new(LatencyStats::new());
        let health = Arc::new(HealthState::new());
        let stats = PlayerStats::new(pool, &cfg, latency.clone(), health.clone()).unwrap();
        ApiState {
            stats: Arc::new(stats),
            platform: Arc::new(PlatformConfig::rooted_at(Platform::Linux, root)),
            latency,
            health,
            heroes: Arc::new(BTreeMap::from([(Site::PokerStars, "Alice".to_string())])),
        }
    }

    #[tokio::test]
    async fn site_lookup_by_display_name() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(
            tmp.path()
                .join(".wine/drive_c/Program Files/Full Tilt Poker/HandHistory/Eve"),
        )
        .unwrap();
        let state = state(tmp.path()).await;

        let Json(result) = get_site(State(state.clone()), Path("Full Tilt Poker".to_string()))
            .await
            .unwrap();
        assert!(result.detected);
        assert_eq!(result.heroname, "Eve");

        let err = get_site(State(state), Path("Nowhere".to_string())).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownSite(_)));
    }

    #[tokio::test]
    async fn empty_selection_explains_itself() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state(tmp.path()).await;

        let Json(response) = post_stats(State(state.clone()), Json(FilterSelection::default()))
            .await
            .unwrap();
        assert!(response.page.is_none());
        assert_eq!(response.message.as_deref(), Some("No player ids found"));

        let Json(health) = get_health(State(state)).await;
        assert_eq!(health.empty_pages, 1);
        assert_eq!(health.pages_built, 0);
    }

    #[tokio::test]
    async fn known_heroes_fill_the_request() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state(tmp.path()).await;

        let mut filters = FilterSelection::default();
        filters.sites.insert(Site::PokerStars, true);
        let Json(response) = post_stats(State(state), Json(filters)).await.unwrap();
        assert!(response.page.is_none());
        assert_eq!(response.message.as_deref(), Some("No limits found"));
    }

    #[tokio::test]
    async fn latency_is_empty_before_any_page() {
        let tmp = tempfile::tempdir().unwrap();
        let Json(latency) = get_stats_latency(State(state(tmp.path()).await)).await;
        assert_eq!(latency.sample_count, 0);
        assert!(latency.p50_ms.is_none());
    }

    #[tokio::test]
    async fn detail_catalog_is_served() {
        let Json(catalog) = get_detail_filters().await;
        assert_eq!(catalog.len(), 12);
    }
}
