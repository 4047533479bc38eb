use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stake levels (big blind in cents) ticked when no filter file is given.
pub const DEFAULT_BIG_BLINDS: [i64; 13] = [2, 4, 5, 10, 20, 25, 50, 100, 200, 400, 500, 1000, 2000];

// ---------------------------------------------------------------------------
// API request / response types (mirror routes.rs shapes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub sites: BTreeMap<String, bool>,
    #[serde(default)]
    pub heroes: BTreeMap<String, String>,
    #[serde(default)]
    pub seats: Option<SeatRequest>,
    #[serde(default)]
    pub stakes: StakeRequest,
    #[serde(default)]
    pub details: Vec<DetailRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatRequest {
    pub from: i64,
    pub to: i64,
    #[serde(default)]
    pub show: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StakeRequest {
    #[serde(default)]
    pub big_blinds: Vec<i64>,
    #[serde(default)]
    pub show_levels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRequest {
    pub column: String,
    pub lo: i64,
    pub hi: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct DetectionResponse {
    pub site: String,
    pub detected: bool,
    pub hhpath: String,
    pub heroname: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableResponse {
    pub headings: Vec<String>,
    pub alignments: Vec<f32>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageResponse {
    pub summary: TableResponse,
    pub hand_heading: String,
    pub hands: TableResponse,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsResponse {
    pub page: Option<PageResponse>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct HealthResponse {
    pub platform: Option<String>,
    pub sites_detected: Option<u64>,
    pub pages_built: Option<u64>,
    pub empty_pages: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub filters: FilterRequest,
    /// Filters came from FILTERS_PATH and must not be adjusted to detections.
    pub filters_pinned: bool,
    pub sites: Vec<DetectionResponse>,
    pub stats: StatsResponse,
    pub health: HealthResponse,
    pub latency: LatencyResponse,
    pub last_refresh: std::time::Instant,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String, filters: Option<FilterRequest>) -> Self {
        let filters_pinned = filters.is_some();
        Self {
            status: ConnectionStatus::Connecting,
            filters: filters.unwrap_or_else(default_filters),
            filters_pinned,
            sites: Vec::new(),
            stats: StatsResponse::default(),
            health: HealthResponse::default(),
            latency: LatencyResponse::default(),
            last_refresh: std::time::Instant::now(),
            base_url,
        }
    }

    /// Breaks results down by seat count; the first press adds the full seat range.
    pub fn toggle_seats(&mut self) {
        match &mut self.filters.seats {
            Some(seats) => seats.show = !seats.show,
            None => {
                self.filters.seats = Some(SeatRequest {
                    from: 0,
                    to: 100,
                    show: true,
                })
            }
        }
    }

    pub fn toggle_levels(&mut self) {
        self.filters.stakes.show_levels = !self.filters.stakes.show_levels;
    }

    pub fn showing_seats(&self) -> bool {
        self.filters.seats.is_some_and(|s| s.show)
    }

    /// Ticks every detected site and takes its hero unless one is already set.
    pub fn apply_detections(&mut self) {
        if self.filters_pinned {
            return;
        }
        for d in self.sites.iter().filter(|d| d.detected) {
            self.filters.sites.insert(d.site.clone(), true);
            self.filters
                .heroes
                .entry(d.site.clone())
                .or_insert_with(|| d.heroname.clone());
        }
    }

    pub fn summary_len(&self) -> usize {
        self.stats.page.as_ref().map_or(0, |p| p.summary.rows.len())
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let sites_url = format!("{}/sites", self.base_url);
        let health_url = format!("{}/health", self.base_url);
        let latency_url = format!("{}/stats/latency", self.base_url);

        match client.get(&sites_url).send().await {
            Ok(resp) => match resp.json::<Vec<DetectionResponse>>().await {
                Ok(sites) => {
                    self.sites = sites;
                    self.apply_detections();
                }
                Err(e) => {
                    self.status = ConnectionStatus::Error(format!("parse error: {e}"));
                    return;
                }
            },
            Err(e) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        }

        let stats_url = format!("{}/stats", self.base_url);
        let (stats_res, health_res, latency_res) = tokio::join!(
            client.post(&stats_url).json(&self.filters).send(),
            client.get(&health_url).send(),
            client.get(&latency_url).send(),
        );

        let stats = match stats_res {
            Ok(resp) if resp.status().is_success() => resp.json::<StatsResponse>().await,
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                self.status = ConnectionStatus::Error(format!("{status}: {body}"));
                return;
            }
            Err(e) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        };

        match stats {
            Ok(s) => {
                self.stats = s;
                self.status = ConnectionStatus::Connected;
                self.last_refresh = std::time::Instant::now();

                if let Ok(h) = health_res {
                    if let Ok(health) = h.json::<HealthResponse>().await {
                        self.health = health;
                    }
                }
                if let Ok(l) = latency_res {
                    if let Ok(latency) = l.json::<LatencyResponse>().await {
                        self.latency = latency;
                    }
                }
            }
            Err(e) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
            }
        }
    }
}

/// Filters used without FILTERS_PATH: heroes from HEROES, common stake levels.
pub fn default_filters() -> FilterRequest {
    let heroes = std::env::var("HEROES").unwrap_or_default();
    filters_with_heroes(&heroes)
}

pub fn filters_with_heroes(raw: &str) -> FilterRequest {
    let mut filters = FilterRequest {
        stakes: StakeRequest {
            big_blinds: DEFAULT_BIG_BLINDS.to_vec(),
            show_levels: false,
        },
        ..FilterRequest::default()
    };
    for pair in raw.split(',') {
        if let Some((site, hero)) = pair.split_once('=') {
            let (site, hero) = (site.trim(), hero.trim());
            if site.is_empty() || hero.is_empty() {
                continue;
            }
            filters.sites.insert(site.to_string(), true);
            filters.heroes.insert(site.to_string(), hero.to_string());
        }
    }
    filters
}

pub fn load_filters(path: &str) -> Result<FilterRequest, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("{path}: {e}"))
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Widest cell (heading included) per column.
pub fn column_widths(table: &TableResponse) -> Vec<u16> {
    table
        .headings
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0);
            widest as u16
        })
        .collect()
}

pub fn format_ms(v: Option<f64>) -> String {
    v.map_or("—".to_string(), |ms| format!("{ms:.1}ms"))
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
