use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::types::Site;

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// Everything the filter panel hands to the stats builder.
/// Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Site → ticked in the site list.
    #[serde(default)]
    pub sites: BTreeMap<Site, bool>,
    /// Site → id in the Sites table. Missing entries are looked up by name.
    #[serde(default)]
    pub site_ids: BTreeMap<Site, i64>,
    /// Site → hero screen name.
    #[serde(default)]
    pub heroes: BTreeMap<Site, String>,
    #[serde(default)]
    pub seats: Option<SeatRange>,
    #[serde(default)]
    pub stakes: StakeSelection,
    #[serde(default)]
    pub details: Vec<DetailFilter>,
}

impl FilterSelection {
    pub fn selected_sites(&self) -> impl Iterator<Item = Site> + '_ {
        self.sites
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(site, _)| *site)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(seats) = &self.seats {
            if seats.from > seats.to {
                return Err(AppError::Filter(format!(
                    "seat range {} to {} is reversed",
                    seats.from, seats.to
                )));
            }
        }
        for f in &self.details {
            if f.lo > f.hi {
                return Err(AppError::Filter(format!(
                    "{} between {} and {} is reversed",
                    f.column.description(),
                    f.lo,
                    f.hi
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRange {
    pub from: i64,
    pub to: i64,
    /// Break the results down by number of seats.
    #[serde(default)]
    pub show: bool,
}

/// Stake levels ticked in the limits list, as big blinds in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeSelection {
    #[serde(default)]
    pub big_blinds: Vec<i64>,
    /// One row per stake level instead of one row spanning all levels.
    #[serde(default)]
    pub show_levels: bool,
}

impl StakeSelection {
    pub fn is_empty(&self) -> bool {
        self.big_blinds.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Detail filters
// ---------------------------------------------------------------------------

/// `column BETWEEN lo AND hi` on top of the primary filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFilter {
    pub column: DetailColumn,
    pub lo: i64,
    pub hi: i64,
}

/// Hand columns a detail filter may constrain. Closed set: the SQL column
/// text only ever comes from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailColumn {
    MaxSeats,
    PlayersVpi,
    PlayersAtFlop,
    PlayersAtTurn,
    PlayersAtRiver,
    PlayersAtStreet7,
    PlayersAtShowdown,
    BetsToSeeFlop,
    BetsToSeeTurn,
    BetsToSeeRiver,
    BetsToSeeStreet7,
    BetsToSeeShowdown,
}

impl DetailColumn {
    pub const ALL: [DetailColumn; 12] = [
        DetailColumn::MaxSeats,
        DetailColumn::PlayersVpi,
        DetailColumn::PlayersAtFlop,
        DetailColumn::PlayersAtTurn,
        DetailColumn::PlayersAtRiver,
        DetailColumn::PlayersAtStreet7,
        DetailColumn::PlayersAtShowdown,
        DetailColumn::BetsToSeeFlop,
        DetailColumn::BetsToSeeTurn,
        DetailColumn::BetsToSeeRiver,
        DetailColumn::BetsToSeeStreet7,
        DetailColumn::BetsToSeeShowdown,
    ];

    pub fn sql(self) -> &'static str {
        match self {
            DetailColumn::MaxSeats => "h.maxSeats",
            DetailColumn::PlayersVpi => "h.playersVpi",
            DetailColumn::PlayersAtFlop => "h.playersAtStreet1",
            DetailColumn::PlayersAtTurn => "h.playersAtStreet2",
            DetailColumn::PlayersAtRiver => "h.playersAtStreet3",
            DetailColumn::PlayersAtStreet7 => "h.playersAtStreet4",
            DetailColumn::PlayersAtShowdown => "h.playersAtShowdown",
            DetailColumn::BetsToSeeFlop => "h.street0Raises",
            DetailColumn::BetsToSeeTurn => "h.street1Raises",
            DetailColumn::BetsToSeeRiver => "h.street2Raises",
            DetailColumn::BetsToSeeStreet7 => "h.street3Raises",
            DetailColumn::BetsToSeeShowdown => "h.street4Raises",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DetailColumn::MaxSeats => "Size of Table",
            DetailColumn::PlayersVpi => "Players who VPI",
            DetailColumn::PlayersAtFlop => "Players at Flop",
            DetailColumn::PlayersAtTurn => "Players at Turn",
            DetailColumn::PlayersAtRiver => "Players at River",
            DetailColumn::PlayersAtStreet7 => "Players at Street7",
            DetailColumn::PlayersAtShowdown => "Players at Showdown",
            DetailColumn::BetsToSeeFlop => "Bets to See Flop",
            DetailColumn::BetsToSeeTurn => "Bets to See Turn",
            DetailColumn::BetsToSeeRiver => "Bets to See River",
            DetailColumn::BetsToSeeStreet7 => "Bets to See Street7",
            DetailColumn::BetsToSeeShowdown => "Bets to See Showdown",
        }
    }

    /// Initial (lo, hi) offered by the detail dialog.
    pub fn default_range(self) -> (i64, i64) {
        match self {
            DetailColumn::MaxSeats => (2, 10),
            DetailColumn::PlayersVpi
            | DetailColumn::PlayersAtFlop
            | DetailColumn::PlayersAtTurn
            | DetailColumn::PlayersAtRiver
            | DetailColumn::PlayersAtStreet7
            | DetailColumn::PlayersAtShowdown => (0, 10),
            DetailColumn::BetsToSeeFlop
            | DetailColumn::BetsToSeeTurn
            | DetailColumn::BetsToSeeRiver
            | DetailColumn::BetsToSeeStreet7
            | DetailColumn::BetsToSeeShowdown => (0, 5),
        }
    }
}

/// One entry of the detail filter catalog served to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct DetailFilterInfo {
    pub column: DetailColumn,
    pub description: &'static str,
    pub min: i64,
    pub max: i64,
}

pub fn detail_catalog() -> Vec<DetailFilterInfo> {
    DetailColumn::ALL
        .into_iter()
        .map(|column| {
            let (min, max) = column.default_range();
            DetailFilterInfo {
                column,
                description: column.description(),
                min,
                max,
            }
        })
        .collect()
}
