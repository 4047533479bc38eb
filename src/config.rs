use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::types::{Platform, Site};

/// Site id used when the filter selection has no site ticked (PokerStars).
pub const DEFAULT_SITE_ID: i64 = 2;

/// Seat range applied when the seats filter is absent.
pub const SEATS_MIN: i64 = 0;
pub const SEATS_MAX: i64 = 100;

/// Sentinel written by the importer for "no value"; rendered as a blank cell.
pub const NO_VALUE_SENTINEL: i64 = -999;

/// Page build latency histogram bounds, in microseconds (1us to 100s).
pub const LATENCY_MIN_US: u64 = 1;
pub const LATENCY_MAX_US: u64 = 100_000_000;

/// Heading shown above the per-hand breakdown table.
pub const HAND_BREAKDOWN_HEADING: &str = "Hand Breakdown for all levels listed above";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// Fallback site id when no site is selected (DEFAULT_SITE_ID)
    pub default_site_id: i64,
    /// Forces the detector's platform instead of probing the host (HH_PLATFORM)
    pub platform_override: Option<Platform>,
    /// Hero screen names per site (HEROES, comma-separated `Site=Name` pairs).
    /// Example: "PokerStars=Alice,Full Tilt Poker=Bob"
    pub heroes: BTreeMap<Site, String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "hhstats.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            default_site_id: std::env::var("DEFAULT_SITE_ID")
                .unwrap_or_else(|_| DEFAULT_SITE_ID.to_string())
                .parse::<i64>()
                .unwrap_or(DEFAULT_SITE_ID),
            platform_override: match std::env::var("HH_PLATFORM") {
                Ok(p) if !p.trim().is_empty() => Some(p.parse::<Platform>()?),
                _ => None,
            },
            heroes: parse_heroes(&std::env::var("HEROES").unwrap_or_default())?,
        })
    }
}

/// Parses `Site=Name` pairs separated by commas. Blank entries are skipped.
pub fn parse_heroes(raw: &str) -> Result<BTreeMap<Site, String>> {
    let mut heroes = BTreeMap::new();
    for pair in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (site, name) = pair
            .split_once('=')
            .ok_or_else(|| AppError::Config(format!("HEROES entry '{pair}' must be Site=Name")))?;
        let site = site
            .trim()
            .parse::<Site>()
            .map_err(|_| AppError::Config(format!("HEROES names unknown site '{}'", site.trim())))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Config(format!("HEROES entry for {site} has no name")));
        }
        heroes.insert(site, name.to_string());
    }
    Ok(heroes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hero_pairs() {
        let heroes = parse_heroes("PokerStars=Alice, Full Tilt Poker = Bob ,").unwrap();
        assert_eq!(heroes.len(), 2);
        assert_eq!(heroes[&Site::PokerStars], "Alice");
        assert_eq!(heroes[&Site::FullTiltPoker], "Bob");
    }

    #[test]
    fn empty_heroes_is_empty_map() {
        assert!(parse_heroes("").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_site_and_missing_name() {
        assert!(matches!(parse_heroes("Nowhere=Alice"), Err(AppError::Config(_))));
        assert!(matches!(parse_heroes("PokerStars="), Err(AppError::Config(_))));
        assert!(matches!(parse_heroes("PokerStars"), Err(AppError::Config(_))));
    }
}
