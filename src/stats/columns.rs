use serde::Serialize;

use super::cards::two_start_card_string;
use super::format::{format_cell, format_dollars, title_case};
use crate::db::models::{RawRow, Value};

/// Per-render flags a computed column may depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub hole_cards: bool,
}

pub type Derive = fn(&RawRow, RenderContext) -> Value;

/// Where a column's value comes from.
#[derive(Clone, Copy)]
pub enum ColumnSource {
    /// The result column with the same key.
    Direct,
    /// Synthesised from several result columns.
    Computed(Derive),
}

impl std::fmt::Debug for ColumnSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSource::Direct => write!(f, "Direct"),
            ColumnSource::Computed(_) => write!(f, "Computed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub visible: bool,
    pub heading: &'static str,
    /// 0.0 left, 1.0 right.
    pub xalign: f32,
    /// printf-style, see [`format_cell`].
    pub format: &'static str,
    pub source: ColumnSource,
}

impl ColumnSpec {
    const fn direct(key: &'static str, visible: bool, heading: &'static str, format: &'static str) -> Self {
        Self {
            key,
            visible,
            heading,
            xalign: 1.0,
            format,
            source: ColumnSource::Direct,
        }
    }

    pub fn value(&self, row: &RawRow, ctx: RenderContext) -> Value {
        match self.source {
            ColumnSource::Direct => row.get(self.key).clone(),
            ColumnSource::Computed(derive) => derive(row, ctx),
        }
    }
}

/// The player stats column table. `hand` stays hidden: its heading is
/// borrowed by `game` when results are broken down by start cards.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec {
            key: "game",
            visible: true,
            heading: "Game",
            xalign: 0.0,
            format: "%s",
            source: ColumnSource::Computed(game_value),
        },
        ColumnSpec {
            key: "hand",
            visible: false,
            heading: "Hand",
            xalign: 0.0,
            format: "%s",
            source: ColumnSource::Direct,
        },
        ColumnSpec::direct("n", true, "Hds", "%d"),
        ColumnSpec::direct("avgseats", true, "Seats", "%3.1f"),
        ColumnSpec::direct("vpip", true, "VPIP", "%3.1f"),
        ColumnSpec::direct("pfr", true, "PFR", "%3.1f"),
        ColumnSpec::direct("pf3", true, "PF3", "%3.1f"),
        ColumnSpec::direct("steals", true, "Steals", "%3.1f"),
        ColumnSpec::direct("saw_f", true, "Saw_F", "%3.1f"),
        ColumnSpec::direct("sawsd", true, "SawSD", "%3.1f"),
        ColumnSpec::direct("wtsdwsf", true, "WtSDwsF", "%3.1f"),
        ColumnSpec::direct("wmsd", true, "W$SD", "%3.1f"),
        ColumnSpec::direct("flafq", true, "FlAFq", "%3.1f"),
        ColumnSpec::direct("tuafq", true, "TuAFq", "%3.1f"),
        ColumnSpec::direct("rvafq", true, "RvAFq", "%3.1f"),
        ColumnSpec::direct("pofafq", false, "PoFAFq", "%3.1f"),
        ColumnSpec::direct("net", true, "Net($)", "%6.2f"),
        ColumnSpec::direct("bbper100", true, "BB/100", "%4.2f"),
        ColumnSpec::direct("rake", true, "Rake($)", "%6.2f"),
        ColumnSpec::direct("variance", true, "Variance", "%5.2f"),
    ]
}

/// Start-card string in hole-card mode, otherwise
/// `<limit> <Category> <site> $<min bb>[ - $<max bb>]`.
fn game_value(row: &RawRow, ctx: RenderContext) -> Value {
    if ctx.hole_cards {
        let code = row.get("hgametypeid").as_i64().unwrap_or_default();
        return Value::Text(two_start_card_string(code));
    }

    let text = |col: &str| row.get(col).as_str().unwrap_or_default().to_string();
    let min_bb = row.get("minbigblind").as_i64().unwrap_or_default();
    let max_bb = row.get("maxbigblind").as_i64().unwrap_or_default();

    let mut game = format!(
        "{} {} {} {}",
        text("limittype"),
        title_case(&text("category")),
        text("name"),
        format_dollars(min_bb)
    );
    if min_bb != max_bb {
        game.push_str(" - ");
        game.push_str(&format_dollars(max_bb));
    }
    Value::Text(game)
}

/// A rendered table: one heading and alignment per visible column, rows of
/// pre-formatted cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsTable {
    pub headings: Vec<String>,
    pub alignments: Vec<f32>,
    pub rows: Vec<Vec<String>>,
}

pub fn render_table(columns: &[ColumnSpec], rows: &[RawRow], ctx: RenderContext) -> StatsTable {
    let visible: Vec<&ColumnSpec> = columns.iter().filter(|c| c.visible).collect();
    let hand_heading = columns
        .iter()
        .find(|c| c.key == "hand")
        .map_or("Hand", |c| c.heading);

    let headings = visible
        .iter()
        .map(|c| {
            if c.key == "game" && ctx.hole_cards {
                hand_heading.to_string()
            } else {
                c.heading.to_string()
            }
        })
        .collect();

    let rows = rows
        .iter()
        .map(|row| {
            visible
                .iter()
                .map(|c| format_cell(c.format, &c.value(row, ctx)))
                .collect()
        })
        .collect();

    StatsTable {
        headings,
        alignments: visible.iter().map(|c| c.xalign).collect(),
        rows,
    }
}
