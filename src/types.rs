use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

/// Poker clients the detector and the stats filters know by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "Full Tilt Poker")]
    FullTiltPoker,
    PokerStars,
    Everleaf,
    Win2day,
    OnGame,
    UltimateBet,
    Betfair,
    Absolute,
    PartyPoker,
    PacificPoker,
    Partouche,
    Carbon,
    #[serde(rename = "PKR")]
    Pkr,
    #[serde(rename = "iPoker")]
    IPoker,
    Winamax,
    Everest,
}

impl Site {
    pub const ALL: [Site; 16] = [
        Site::FullTiltPoker,
        Site::PokerStars,
        Site::Everleaf,
        Site::Win2day,
        Site::OnGame,
        Site::UltimateBet,
        Site::Betfair,
        Site::Absolute,
        Site::PartyPoker,
        Site::PacificPoker,
        Site::Partouche,
        Site::Carbon,
        Site::Pkr,
        Site::IPoker,
        Site::Winamax,
        Site::Everest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Site::FullTiltPoker => "Full Tilt Poker",
            Site::PokerStars => "PokerStars",
            Site::Everleaf => "Everleaf",
            Site::Win2day => "Win2day",
            Site::OnGame => "OnGame",
            Site::UltimateBet => "UltimateBet",
            Site::Betfair => "Betfair",
            Site::Absolute => "Absolute",
            Site::PartyPoker => "PartyPoker",
            Site::PacificPoker => "PacificPoker",
            Site::Partouche => "Partouche",
            Site::Carbon => "Carbon",
            Site::Pkr => "PKR",
            Site::IPoker => "iPoker",
            Site::Winamax => "Winamax",
            Site::Everest => "Everest",
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Site {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Site::ALL
            .into_iter()
            .find(|site| site.name() == s)
            .ok_or_else(|| AppError::UnknownSite(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Operating system families with distinct default install locations.
/// Vista and every later Windows release share the Win7 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Xp,
    Win7,
    Other,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Platform::Linux => "linux",
            Platform::Xp => "xp",
            Platform::Win7 => "win7",
            Platform::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "xp" => Ok(Platform::Xp),
            "win7" | "vista" | "windows" => Ok(Platform::Win7),
            "other" => Ok(Platform::Other),
            other => Err(AppError::Config(format!(
                "HH_PLATFORM must be linux, xp or win7 (got '{other}')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SQL backend
// ---------------------------------------------------------------------------

/// SQL dialect a query is rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    MySql,
    Postgres,
    #[default]
    Sqlite,
}

impl Backend {
    /// MySQL spells a signed integer cast `CAST(x AS SIGNED INTEGER)`.
    pub fn requires_signed_cast(self) -> bool {
        self == Backend::MySql
    }
}

// ---------------------------------------------------------------------------
// Detection result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub site: Site,
    pub detected: bool,
    /// Hero's hand-history folder; empty when not detected.
    pub hhpath: String,
    /// Empty when not detected.
    pub heroname: String,
}

impl DetectionResult {
    pub fn not_detected(site: Site) -> Self {
        Self {
            site,
            detected: false,
            hhpath: String::new(),
            heroname: String::new(),
        }
    }
}
