//! Turns a stats query template into concrete SQL.
//!
//! A template is plain SQL with `<name>` placeholder tokens. Parsing splits it
//! into literal segments and typed [`Placeholder`]s, so an unknown token is an
//! error up front instead of a syntax error from the database. Building
//! substitutes every placeholder with a SQL fragment computed from
//! [`QueryFilters`]; numbers from the filters are always bind parameters and
//! column names only ever come from [`DetailColumn`](super::filters::DetailColumn).

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

use super::filters::{DetailFilter, SeatRange, StakeSelection};
use crate::config::{SEATS_MAX, SEATS_MIN};
use crate::error::{AppError, Result};
use crate::types::Backend;

// ---------------------------------------------------------------------------
// Placeholders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Player predicate: `hp.playerId IN (...)`, or always false.
    PlayerTest,
    /// Seat count range, follows `h.seats`.
    SeatsTest,
    GroupBySeats,
    OrderBySeats,
    /// `AND gt.bigBlind IN (...)` when stakes are selected.
    BigBlindTest,
    /// Conjunction of detail filter ranges.
    DetailTest,
    /// Expression selected as `hgametypeid`: start cards, game type, or a constant.
    HandGroup,
    OrderByHandGroup,
    /// Dialect keyword inside `CAST(x AS <signed>INTEGER)`.
    Signed,
}

impl Placeholder {
    pub const ALL: [Placeholder; 9] = [
        Placeholder::PlayerTest,
        Placeholder::SeatsTest,
        Placeholder::GroupBySeats,
        Placeholder::OrderBySeats,
        Placeholder::BigBlindTest,
        Placeholder::DetailTest,
        Placeholder::HandGroup,
        Placeholder::OrderByHandGroup,
        Placeholder::Signed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::PlayerTest => "player_test",
            Placeholder::SeatsTest => "seats_test",
            Placeholder::GroupBySeats => "group_by_seats",
            Placeholder::OrderBySeats => "order_by_seats",
            Placeholder::BigBlindTest => "big_blind_test",
            Placeholder::DetailTest => "detail_test",
            Placeholder::HandGroup => "hand_group",
            Placeholder::OrderByHandGroup => "order_by_hand_group",
            Placeholder::Signed => "signed",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Placeholder::ALL.into_iter().find(|p| p.name() == name)
    }

    fn render(self, filters: &QueryFilters, out: &mut BuiltQuery) {
        match self {
            Placeholder::PlayerTest => {
                if filters.player_ids.is_empty() {
                    out.sql.push_str("1 = 2");
                } else {
                    out.sql.push_str("hp.playerId IN ");
                    out.push_list(&filters.player_ids);
                }
            }
            Placeholder::SeatsTest => {
                let (from, to) = filters
                    .seats
                    .map_or((SEATS_MIN, SEATS_MAX), |s| (s.from, s.to));
                out.sql.push_str("BETWEEN ");
                out.push_bind(from);
                out.sql.push_str(" AND ");
                out.push_bind(to);
            }
            Placeholder::GroupBySeats | Placeholder::OrderBySeats => {
                if filters.seats.is_some_and(|s| s.show) {
                    out.sql.push_str(", h.seats");
                }
            }
            Placeholder::BigBlindTest => {
                if !filters.stakes.big_blinds.is_empty() {
                    out.sql.push_str("AND gt.bigBlind IN ");
                    out.push_list(&filters.stakes.big_blinds);
                }
            }
            Placeholder::DetailTest => {
                for f in &filters.details {
                    let _ = write!(out.sql, " AND {} BETWEEN ", f.column.sql());
                    out.push_bind(f.lo);
                    out.sql.push_str(" AND ");
                    out.push_bind(f.hi);
                }
            }
            Placeholder::HandGroup => {
                let expr = if filters.hole_cards {
                    "hp.startCards"
                } else if filters.stakes.show_levels {
                    "h.gametypeId"
                } else {
                    "-1"
                };
                out.sql.push_str(expr);
            }
            Placeholder::OrderByHandGroup => {
                if filters.hole_cards {
                    out.sql.push_str(", hgametypeid DESC");
                }
            }
            Placeholder::Signed => {
                if filters.backend.requires_signed_cast() {
                    out.sql.push_str("SIGNED ");
                }
            }
        }
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

// ---------------------------------------------------------------------------
// Filters resolved for one query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    pub player_ids: Vec<i64>,
    pub seats: Option<SeatRange>,
    pub stakes: StakeSelection,
    pub details: Vec<DetailFilter>,
    /// Break results down by start cards instead of stake level.
    pub hole_cards: bool,
    pub backend: Backend,
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone)]
pub struct QueryTemplate {
    segments: Vec<Segment>,
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([A-Za-z_][A-Za-z0-9_]*)>").expect("valid placeholder regex"))
}

impl QueryTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in placeholder_re().captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let placeholder = Placeholder::from_name(name.as_str()).ok_or_else(|| {
                AppError::Template(format!("unknown placeholder <{}>", name.as_str()))
            })?;
            if whole.start() > last {
                segments.push(Segment::Literal(template[last..whole.start()].to_string()));
            }
            segments.push(Segment::Placeholder(placeholder));
            last = whole.end();
        }
        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_string()));
        }

        Ok(Self { segments })
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| *s == Segment::Placeholder(placeholder))
    }

    /// Every placeholder is replaced, possibly by an empty string.
    pub fn build(&self, filters: &QueryFilters) -> BuiltQuery {
        let mut out = BuiltQuery::default();
        for segment in &self.segments {
            match segment {
                Segment::Literal(sql) => out.sql.push_str(sql),
                Segment::Placeholder(p) => p.render(filters, &mut out),
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Built query
// ---------------------------------------------------------------------------

/// SQL with `?` markers and the values to bind to them, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<i64>,
}

impl BuiltQuery {
    fn push_bind(&mut self, value: i64) {
        self.sql.push('?');
        self.params.push(value);
    }

    fn push_list(&mut self, values: &[i64]) {
        self.sql.push('(');
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(*v);
        }
        self.sql.push(')');
    }

    /// The query with every parameter written in place. For logs only.
    pub fn inline_sql(&self) -> String {
        let mut params = self.params.iter();
        let mut out = String::with_capacity(self.sql.len());
        for c in self.sql.chars() {
            if c == '?' {
                if let Some(v) = params.next() {
                    let _ = write!(out, "{v}");
                    continue;
                }
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::filters::DetailColumn;

    const TEMPLATE: &str = "SELECT <hand_group> AS hgametypeid, CAST(x AS <signed>INTEGER) \
        FROM t WHERE <player_test> AND h.seats <seats_test> <big_blind_test><detail_test> \
        GROUP BY hgametypeid<group_by_seats> ORDER BY n<order_by_hand_group><order_by_seats>";

    fn filters() -> QueryFilters {
        QueryFilters {
            player_ids: vec![7],
            stakes: StakeSelection {
                big_blinds: vec![10, 20],
                show_levels: false,
            },
            ..Default::default()
        }
    }

    fn build(filters: &QueryFilters) -> BuiltQuery {
        QueryTemplate::parse(TEMPLATE).unwrap().build(filters)
    }

    #[test]
    fn no_placeholder_survives_any_branch() {
        let mut f = filters();
        for hole_cards in [false, true] {
            for seats in [None, Some(SeatRange { from: 2, to: 6, show: true })] {
                f.hole_cards = hole_cards;
                f.seats = seats;
                let sql = build(&f).sql;
                for p in Placeholder::ALL {
                    assert!(!sql.contains(&p.to_string()), "{p} left in {sql}");
                }
            }
        }
    }

    #[test]
    fn empty_player_set_is_always_false() {
        let mut f = filters();
        f.player_ids.clear();
        let q = build(&f);
        assert!(q.sql.contains("WHERE 1 = 2 AND"), "{}", q.sql);
        assert!(!q.sql.contains("playerId"));
    }

    #[test]
    fn player_ids_are_bound() {
        let mut f = filters();
        f.player_ids = vec![3, 9];
        let q = build(&f);
        assert!(q.sql.contains("hp.playerId IN (?, ?)"));
        assert_eq!(&q.params[..2], &[3, 9]);
    }

    #[test]
    fn shown_seats_add_range_and_grouping() {
        let mut f = filters();
        f.seats = Some(SeatRange { from: 2, to: 6, show: true });
        let inline = build(&f).inline_sql();
        assert!(inline.contains("h.seats BETWEEN 2 AND 6"), "{inline}");
        assert!(inline.contains("GROUP BY hgametypeid, h.seats"));
        assert!(inline.ends_with("ORDER BY n, h.seats"));
    }

    #[test]
    fn hidden_seats_keep_range_without_grouping() {
        let mut f = filters();
        f.seats = Some(SeatRange { from: 2, to: 6, show: false });
        let inline = build(&f).inline_sql();
        assert!(inline.contains("BETWEEN 2 AND 6"));
        assert!(!inline.contains(", h.seats"));
    }

    #[test]
    fn missing_seats_filter_spans_all_tables() {
        let inline = build(&filters()).inline_sql();
        assert!(inline.contains("h.seats BETWEEN 0 AND 100"), "{inline}");
    }

    #[test]
    fn stakes_restrict_big_blind() {
        let inline = build(&filters()).inline_sql();
        assert!(inline.contains("AND gt.bigBlind IN (10, 20)"), "{inline}");

        let mut f = filters();
        f.stakes.big_blinds.clear();
        assert!(!build(&f).sql.contains("bigBlind"));
    }

    #[test]
    fn detail_filters_are_anded() {
        let mut f = filters();
        f.details = vec![
            DetailFilter { column: DetailColumn::PlayersAtShowdown, lo: 2, hi: 6 },
            DetailFilter { column: DetailColumn::BetsToSeeFlop, lo: 0, hi: 1 },
        ];
        let inline = build(&f).inline_sql();
        assert!(inline.contains(
            " AND h.playersAtShowdown BETWEEN 2 AND 6 AND h.street0Raises BETWEEN 0 AND 1"
        ), "{inline}");
    }

    #[test]
    fn hand_group_follows_hole_cards_and_levels() {
        let mut f = filters();
        assert!(build(&f).sql.starts_with("SELECT -1 AS hgametypeid"));
        assert!(!build(&f).sql.contains("DESC"));

        f.stakes.show_levels = true;
        assert!(build(&f).sql.starts_with("SELECT h.gametypeId AS hgametypeid"));

        f.hole_cards = true;
        let sql = build(&f).sql;
        assert!(sql.starts_with("SELECT hp.startCards AS hgametypeid"));
        assert!(sql.ends_with("ORDER BY n, hgametypeid DESC"));
    }

    #[test]
    fn signed_cast_is_mysql_only() {
        let mut f = filters();
        assert!(build(&f).sql.contains("CAST(x AS INTEGER)"));
        f.backend = Backend::MySql;
        assert!(build(&f).sql.contains("CAST(x AS SIGNED INTEGER)"));
    }

    #[test]
    fn params_follow_sql_order() {
        let mut f = filters();
        f.seats = Some(SeatRange { from: 3, to: 9, show: false });
        f.details = vec![DetailFilter { column: DetailColumn::MaxSeats, lo: 6, hi: 6 }];
        assert_eq!(build(&f).params, vec![7, 3, 9, 10, 20, 6, 6]);
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = QueryTemplate::parse("SELECT 1 WHERE <site_test>").unwrap_err();
        assert!(matches!(err, AppError::Template(ref m) if m.contains("<site_test>")));
    }

    #[test]
    fn comparison_operators_are_not_placeholders() {
        let t = QueryTemplate::parse("SELECT 1 WHERE a < b AND c <> d AND e<f").unwrap();
        let q = t.build(&QueryFilters::default());
        assert_eq!(q.sql, "SELECT 1 WHERE a < b AND c <> d AND e<f");
        assert!(q.params.is_empty());
    }

    #[test]
    fn contains_reports_parsed_placeholders() {
        let t = QueryTemplate::parse(TEMPLATE).unwrap();
        assert!(Placeholder::ALL.into_iter().all(|p| t.contains(p)));
        let bare = QueryTemplate::parse("SELECT 1").unwrap();
        assert!(!bare.contains(Placeholder::Signed));
    }
}
