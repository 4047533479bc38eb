/// Per-player stats, grouped by game and by `hgametypeid` (start cards,
/// game type or a constant, depending on `<hand_group>`). Money is in cents
/// in the tables and dollars in the result.
pub const PLAYER_DETAILED_STATS: &str = r#"
SELECT
    p.name AS playername,
    <hand_group> AS hgametypeid,
    s.name AS name,
    gt.base AS base,
    gt.category AS category,
    gt.limitType AS limittype,
    MIN(gt.bigBlind) AS minbigblind,
    MAX(gt.bigBlind) AS maxbigblind,
    COUNT(1) AS n,
    AVG(h.seats) AS avgseats,
    100.0 * SUM(hp.street0VPI) / COUNT(1) AS vpip,
    100.0 * SUM(hp.street0Aggr) / COUNT(1) AS pfr,
    100.0 * SUM(hp.street0_3BDone) / NULLIF(SUM(hp.street0_3BChance), 0) AS pf3,
    100.0 * SUM(hp.stealAttempted) / NULLIF(SUM(hp.stealAttemptChance), 0) AS steals,
    100.0 * SUM(hp.street1Seen) / COUNT(1) AS saw_f,
    100.0 * SUM(hp.sawShowdown) / COUNT(1) AS sawsd,
    100.0 * SUM(hp.sawShowdown) / NULLIF(SUM(hp.street1Seen), 0) AS wtsdwsf,
    100.0 * SUM(hp.wonAtSD) / NULLIF(SUM(hp.sawShowdown), 0) AS wmsd,
    100.0 * SUM(hp.street1Aggr) / NULLIF(SUM(hp.street1Seen), 0) AS flafq,
    100.0 * SUM(hp.street2Aggr) / NULLIF(SUM(hp.street2Seen), 0) AS tuafq,
    100.0 * SUM(hp.street3Aggr) / NULLIF(SUM(hp.street3Seen), 0) AS rvafq,
    100.0 * (SUM(hp.street1Aggr) + SUM(hp.street2Aggr) + SUM(hp.street3Aggr))
        / NULLIF(SUM(hp.street1Seen) + SUM(hp.street2Seen) + SUM(hp.street3Seen), 0) AS pofafq,
    SUM(hp.totalProfit) / 100.0 AS net,
    100.0 * AVG(CAST(hp.totalProfit AS <signed>INTEGER) * 1.0 / gt.bigBlind) AS bbper100,
    SUM(hp.rake) / 100.0 AS rake,
    AVG((CAST(hp.totalProfit AS <signed>INTEGER) / 100.0) * (CAST(hp.totalProfit AS <signed>INTEGER) / 100.0))
        - AVG(CAST(hp.totalProfit AS <signed>INTEGER) / 100.0) * AVG(CAST(hp.totalProfit AS <signed>INTEGER) / 100.0)
        AS variance
FROM HandsPlayers hp
JOIN Hands h ON h.id = hp.handId
JOIN Gametypes gt ON gt.id = h.gametypeId
JOIN Sites s ON s.id = gt.siteId
JOIN Players p ON p.id = hp.playerId
WHERE <player_test>
  AND h.seats <seats_test>
  <big_blind_test>
  <detail_test>
GROUP BY hp.playerId, p.name, s.name, gt.base, gt.category, gt.limitType, hgametypeid<group_by_seats>
ORDER BY p.name, s.name, gt.base, gt.limitType, maxbigblind DESC<order_by_hand_group><order_by_seats>
"#;

pub const SITE_ID_BY_NAME: &str = "SELECT id FROM Sites WHERE name = ?";

pub const PLAYER_BY_NAME: &str = "SELECT id, name, siteId FROM Players WHERE name = ? AND siteId = ?";
