pub mod cards;
pub mod columns;
pub mod filters;
pub mod format;
pub mod query;
pub mod template;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::config::{Config, HAND_BREAKDOWN_HEADING};
use crate::db::models::{decode_row, PlayerRow};
use crate::error::{AppError, Result};
use crate::types::{Backend, Site};

use columns::{default_columns, render_table, ColumnSpec, RenderContext, StatsTable};
use filters::FilterSelection;
use query::{Placeholder, QueryFilters, QueryTemplate};

/// Summary table plus the per-start-cards breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct StatsPage {
    pub summary: StatsTable,
    pub hand_heading: String,
    pub hands: StatsTable,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone)]
pub enum StatsOutcome {
    Page(StatsPage),
    /// No selected site has a known hero.
    NoPlayers,
    /// No stake level ticked.
    NoStakes,
}

/// Builds the player stats page from a filter selection.
/// Each call runs in its own read-only transaction on one pooled connection.
pub struct PlayerStats {
    pool: sqlx::SqlitePool,
    template: QueryTemplate,
    columns: Vec<ColumnSpec>,
    default_site_id: i64,
    latency: Arc<LatencyStats>,
    health: Arc<HealthState>,
}

impl PlayerStats {
    pub fn new(
        pool: sqlx::SqlitePool,
        cfg: &Config,
        latency: Arc<LatencyStats>,
        health: Arc<HealthState>,
    ) -> Result<Self> {
        let template = QueryTemplate::parse(template::PLAYER_DETAILED_STATS)?;
        if !template.contains(Placeholder::PlayerTest) {
            return Err(AppError::Template("stats query must filter on <player_test>".to_string()));
        }
        Ok(Self {
            pool,
            template,
            columns: default_columns(),
            default_site_id: cfg.default_site_id,
            latency,
            health,
        })
    }

    pub async fn fill_stats(&self, filters: &FilterSelection) -> Result<StatsOutcome> {
        filters.validate()?;
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let mut site_ids = Vec::new();
        let mut player_ids = Vec::new();
        for site in filters.selected_sites() {
            let site_id = match filters.site_ids.get(&site) {
                Some(id) => *id,
                None => match site_id_by_name(&mut tx, site).await? {
                    Some(id) => id,
                    None => {
                        warn!(site = %site, "site missing from Sites table");
                        continue;
                    }
                },
            };
            site_ids.push(site_id);

            let Some(hero) = filters.heroes.get(&site) else {
                warn!(site = %site, "no hero name for selected site");
                continue;
            };
            let players: Vec<PlayerRow> = sqlx::query_as(template::PLAYER_BY_NAME)
                .bind(hero)
                .bind(site_id)
                .fetch_all(&mut *tx)
                .await?;
            match players.as_slice() {
                [player] => {
                    debug!(site_id = player.site_id, hero = %player.name, player_id = player.id, "resolved hero");
                    player_ids.push(player.id);
                }
                [] => debug!(site = %site, hero = %hero, "hero not in Players table"),
                _ => warn!(site = %site, hero = %hero, "hero name is ambiguous, skipped"),
            }
        }

        // Site ids only scope the player lookup and the log; players already
        // carry their site, so the stats query filters on player ids alone.
        if site_ids.is_empty() {
            warn!("No sites selected - defaulting to site id {}", self.default_site_id);
            site_ids.push(self.default_site_id);
        }
        if player_ids.is_empty() {
            warn!("No player ids found");
            self.health.inc_empty_pages();
            return Ok(StatsOutcome::NoPlayers);
        }
        if filters.stakes.is_empty() {
            warn!("No limits found");
            self.health.inc_empty_pages();
            return Ok(StatsOutcome::NoStakes);
        }
        debug!(?site_ids, ?player_ids, "building stats page");

        let mut query_filters = QueryFilters {
            player_ids,
            seats: filters.seats,
            stakes: filters.stakes.clone(),
            details: filters.details.clone(),
            hole_cards: false,
            backend: Backend::Sqlite,
        };
        let summary = self.add_table(&mut tx, &query_filters).await?;
        query_filters.hole_cards = true;
        let hands = self.add_table(&mut tx, &query_filters).await?;
        tx.commit().await?;

        let elapsed = started.elapsed();
        self.latency.record(elapsed);
        self.health.inc_pages_built();
        info!(
            summary_rows = summary.rows.len(),
            hand_rows = hands.rows.len(),
            "Stats page built in {:.2} seconds",
            elapsed.as_secs_f64()
        );

        Ok(StatsOutcome::Page(StatsPage {
            summary,
            hand_heading: HAND_BREAKDOWN_HEADING.to_string(),
            hands,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }))
    }

    async fn add_table(&self, conn: &mut SqliteConnection, filters: &QueryFilters) -> Result<StatsTable> {
        let built = self.template.build(filters);
        debug!(sql = %built.inline_sql(), "stats query");

        let mut query = sqlx::query(&built.sql);
        for param in &built.params {
            query = query.bind(*param);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        let raw = rows.iter().map(decode_row).collect::<Result<Vec<_>>>()?;

        let ctx = RenderContext {
            hole_cards: filters.hole_cards,
        };
        Ok(render_table(&self.columns, &raw, ctx))
    }
}

async fn site_id_by_name(conn: &mut SqliteConnection, site: Site) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(template::SITE_ID_BY_NAME)
        .bind(site.name())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::cards::two_start_cards;
    use crate::stats::filters::{DetailColumn, DetailFilter, SeatRange, StakeSelection};
    use sqlx::sqlite::SqlitePoolOptions;

    struct HandSpec {
        player: i64,
        gametype: i64,
        seats: i64,
        start_cards: i64,
        vpip: bool,
        profit: i64,
        showdown_players: i64,
    }

    async fn fixture_pool() -> sqlx::SqlitePool {
        // One connection: every in-memory connection is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO Players (id, name, siteId) VALUES
                (1, 'Alice', 2), (2, 'Bob', 2), (3, 'Alice', 1)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO Gametypes (id, siteId, type, base, category, limitType, smallBlind, bigBlind) VALUES
                (1, 2, 'ring', 'hold', 'holdem', 'nl', 5, 10),
                (2, 2, 'ring', 'hold', 'holdem', 'nl', 25, 50)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let aa = two_start_cards(14, 's', 14, 'h');
        let aks = two_start_cards(14, 's', 13, 's');
        let hands = [
            HandSpec { player: 1, gametype: 1, seats: 6, start_cards: aa, vpip: true, profit: 550, showdown_players: 2 },
            HandSpec { player: 1, gametype: 1, seats: 6, start_cards: aks, vpip: true, profit: -100, showdown_players: 0 },
            HandSpec { player: 1, gametype: 2, seats: 9, start_cards: aa, vpip: false, profit: -50, showdown_players: 3 },
            HandSpec { player: 2, gametype: 1, seats: 6, start_cards: aks, vpip: true, profit: 300, showdown_players: 2 },
        ];
        for (i, hand) in hands.iter().enumerate() {
            let hand_id = i as i64 + 1;
            sqlx::query(
                "INSERT INTO Hands (id, gametypeId, startTime, seats, maxSeats, playersAtShowdown)
                 VALUES (?, ?, '2011-01-01 00:00:00', ?, ?, ?)",
            )
            .bind(hand_id)
            .bind(hand.gametype)
            .bind(hand.seats)
            .bind(hand.seats)
            .bind(hand.showdown_players)
            .execute(&pool)
            .await
            .unwrap();
            sqlx::query(
                "INSERT INTO HandsPlayers (handId, playerId, startCards, street0VPI, totalProfit, rake)
                 VALUES (?, ?, ?, ?, ?, 5)",
            )
            .bind(hand_id)
            .bind(hand.player)
            .bind(hand.start_cards)
            .bind(i64::from(hand.vpip))
            .bind(hand.profit)
            .execute(&pool)
            .await
            .unwrap();
        }
        pool
    }

    fn service(pool: sqlx::SqlitePool) -> PlayerStats {
        let cfg = Config {
            log_level: "info".to_string(),
            db_path: ":memory:".to_string(),
            api_port: 0,
            default_site_id: 2,
            platform_override: None,
            heroes: Default::default(),
        };
        PlayerStats::new(pool, &cfg, Arc::new(LatencyStats::new()), Arc::new(HealthState::new())).unwrap()
    }

    fn alice_filters() -> FilterSelection {
        let mut filters = FilterSelection::default();
        filters.sites.insert(Site::PokerStars, true);
        filters.heroes.insert(Site::PokerStars, "Alice".to_string());
        filters.stakes = StakeSelection {
            big_blinds: vec![10, 50],
            show_levels: false,
        };
        filters
    }

    fn page(outcome: StatsOutcome) -> StatsPage {
        match outcome {
            StatsOutcome::Page(p) => p,
            other => panic!("expected a page, got {other:?}"),
        }
    }

    fn column(table: &StatsTable, heading: &str) -> usize {
        table.headings.iter().position(|h| h == heading).unwrap()
    }

    #[tokio::test]
    async fn summary_spans_all_levels() {
        let stats = service(fixture_pool().await);
        let page = page(stats.fill_stats(&alice_filters()).await.unwrap());

        assert_eq!(page.summary.rows.len(), 1);
        let row = &page.summary.rows[0];
        assert_eq!(row[0], "nl Holdem PokerStars $0.10 - $0.50");
        assert_eq!(row[column(&page.summary, "Hds")], "3");
        assert_eq!(row[column(&page.summary, "Net($)")], "  4.00");
        assert_eq!(row[column(&page.summary, "VPIP")], "66.7");
        assert_eq!(page.hand_heading, HAND_BREAKDOWN_HEADING);
    }

    #[tokio::test]
    async fn shown_levels_split_rows() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.stakes.show_levels = true;
        let page = page(stats.fill_stats(&filters).await.unwrap());

        assert_eq!(page.summary.rows.len(), 2);
        assert_eq!(page.summary.rows[0][0], "nl Holdem PokerStars $0.50");
        assert_eq!(page.summary.rows[1][0], "nl Holdem PokerStars $0.10");
    }

    #[tokio::test]
    async fn hand_breakdown_groups_by_start_cards() {
        let stats = service(fixture_pool().await);
        let page = page(stats.fill_stats(&alice_filters()).await.unwrap());

        assert_eq!(page.hands.headings[0], "Hand");
        let hands: Vec<&str> = page.hands.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(hands, vec!["AA", "AKs"]);
        assert_eq!(page.hands.rows[0][column(&page.hands, "Hds")], "2");
    }

    #[tokio::test]
    async fn stake_and_detail_filters_narrow_results() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.stakes.big_blinds = vec![10];
        filters.details.push(DetailFilter {
            column: DetailColumn::PlayersAtShowdown,
            lo: 2,
            hi: 6,
        });
        let page = page(stats.fill_stats(&filters).await.unwrap());

        assert_eq!(page.summary.rows.len(), 1);
        assert_eq!(page.summary.rows[0][0], "nl Holdem PokerStars $0.10");
        assert_eq!(page.summary.rows[0][column(&page.summary, "Hds")], "1");
    }

    #[tokio::test]
    async fn shown_seats_split_rows() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.seats = Some(SeatRange { from: 2, to: 10, show: true });
        let page = page(stats.fill_stats(&filters).await.unwrap());
        assert_eq!(page.summary.rows.len(), 2);

        filters.seats = Some(SeatRange { from: 7, to: 10, show: false });
        let page2 = match stats.fill_stats(&filters).await.unwrap() {
            StatsOutcome::Page(p) => p,
            other => panic!("expected a page, got {other:?}"),
        };
        assert_eq!(page2.summary.rows.len(), 1);
        assert_eq!(page2.summary.rows[0][column(&page2.summary, "Hds")], "1");
    }

    #[tokio::test]
    async fn unknown_hero_yields_no_players() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.heroes.insert(Site::PokerStars, "Nobody".to_string());
        assert!(matches!(stats.fill_stats(&filters).await.unwrap(), StatsOutcome::NoPlayers));
    }

    #[tokio::test]
    async fn no_site_selected_yields_no_players() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.sites.clear();
        assert!(matches!(stats.fill_stats(&filters).await.unwrap(), StatsOutcome::NoPlayers));
    }

    #[tokio::test]
    async fn no_stakes_yields_no_stakes() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.stakes.big_blinds.clear();
        assert!(matches!(stats.fill_stats(&filters).await.unwrap(), StatsOutcome::NoStakes));
    }

    #[tokio::test]
    async fn explicit_site_id_overrides_lookup() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        // Alice on site 1 has no hands.
        filters.site_ids.insert(Site::PokerStars, 1);
        let page = page(stats.fill_stats(&filters).await.unwrap());
        assert!(page.summary.rows.is_empty());
    }

    #[tokio::test]
    async fn site_scopes_the_hero_not_the_hands() {
        let stats = service(fixture_pool().await);
        let mut filters = alice_filters();
        filters.heroes.insert(Site::PokerStars, "Bob".to_string());
        let page = page(stats.fill_stats(&filters).await.unwrap());

        // Alice's hands share Bob's site and game type but stay out.
        assert_eq!(page.summary.rows.len(), 1);
        assert_eq!(page.summary.rows[0][column(&page.summary, "Hds")], "1");
        assert_eq!(page.summary.rows[0][column(&page.summary, "Net($)")], "  3.00");
    }

    #[tokio::test]
    async fn records_latency_and_health() {
        let latency = Arc::new(LatencyStats::new());
        let health = Arc::new(HealthState::new());
        let cfg = Config {
            log_level: "info".to_string(),
            db_path: ":memory:".to_string(),
            api_port: 0,
            default_site_id: 2,
            platform_override: None,
            heroes: Default::default(),
        };
        let stats = PlayerStats::new(fixture_pool().await, &cfg, latency.clone(), health.clone()).unwrap();

        stats.fill_stats(&alice_filters()).await.unwrap();
        let mut empty = alice_filters();
        empty.stakes.big_blinds.clear();
        stats.fill_stats(&empty).await.unwrap();

        assert_eq!(latency.len(), 1);
        assert_eq!(health.pages_built(), 1);
        assert_eq!(health.empty_pages(), 1);
    }
}
