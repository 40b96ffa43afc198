//! Full pipeline test: raw snapshot → normalized pool → ranked report.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use propedge::config::AppConfig;
use propedge::engine::parlay::ParlayKind;
use propedge::engine::Engine;
use propedge::types::{PropQuotes, RawQuote, Side, Snapshot, Sport};

fn quotes(
    player: &str,
    market: &str,
    line: Decimal,
    home: &str,
    away: &str,
    team: &str,
    prices: &[(i64, Side)],
) -> PropQuotes {
    PropQuotes {
        player_name: player.to_string(),
        normalized_name: player.to_lowercase().replace(' ', "_"),
        market: market.to_string(),
        line,
        home: home.to_string(),
        away: away.to_string(),
        sport: Sport::Mlb,
        team: Some(team.to_string()),
        position: None,
        quotes: prices
            .iter()
            .enumerate()
            .map(|(i, (price, side))| RawQuote {
                book: format!("book{}", i / 2),
                price: Some(*price),
                side: *side,
            })
            .collect(),
    }
}

/// A game-day snapshot: a strikeout anchor with an opposing batter
/// hedge, a positively correlated teammate prop in the same game, a
/// diversification candidate in another game, and a one-sided market
/// nothing should build on.
fn fixture() -> Snapshot {
    Snapshot::new(vec![
        // Yankees vs Red Sox: pitcher strikeouts, over favored
        quotes(
            "Gerrit Cole",
            "strikeouts",
            dec!(7.5),
            "Yankees",
            "Red Sox",
            "Yankees",
            &[(-165, Side::Over), (135, Side::Under)],
        ),
        // Opposing batter hits, under favored: the classic hedge
        quotes(
            "Rafael Devers",
            "hits",
            dec!(1.5),
            "Yankees",
            "Red Sox",
            "Red Sox",
            &[(120, Side::Over), (-150, Side::Under)],
        ),
        // Teammate total bases, over favored: positively correlated
        // with the batter-hits leg, must not survive the correlated pass
        quotes(
            "Aaron Judge",
            "total_bases",
            dec!(1.5),
            "Yankees",
            "Red Sox",
            "Yankees",
            &[(-150, Side::Over), (120, Side::Under)],
        ),
        // Tigers vs Twins: independent-game candidate
        quotes(
            "Tarik Skubal",
            "strikeouts",
            dec!(8.5),
            "Tigers",
            "Twins",
            "Tigers",
            &[(-140, Side::Over), (115, Side::Under)],
        ),
        // One-sided market: overs only, no book quotes the under
        quotes(
            "Bobby Witt Jr",
            "total_bases",
            dec!(1.5),
            "Royals",
            "Guardians",
            "Royals",
            &[(-130, Side::Over), (-125, Side::Over)],
        ),
    ])
}

#[test]
fn test_full_run_produces_hedged_correlated_parlay() {
    let engine = Engine::new(&AppConfig::default());
    let report = engine.run(&fixture()).unwrap();

    let correlated: Vec<_> = report
        .parlays
        .iter()
        .filter(|p| p.kind == ParlayKind::Correlated)
        .collect();
    assert_eq!(correlated.len(), 1);

    let parlay = correlated[0];
    let names: Vec<&str> = parlay
        .legs
        .iter()
        .map(|leg| leg.player_name.as_str())
        .collect();
    assert!(names.contains(&"Gerrit Cole"));
    assert!(names.contains(&"Rafael Devers"));
    assert!(parlay.avg_correlation < Decimal::ZERO);
    assert!(parlay.variance_multiplier < Decimal::ONE);
    assert!(parlay.game.is_some());

    // The positively correlated Judge combo never appears in the
    // correlated output
    for parlay in &correlated {
        assert!(!parlay
            .legs
            .iter()
            .any(|leg| leg.player_name == "Aaron Judge"));
    }
}

#[test]
fn test_full_run_independent_parlays_span_games() {
    let engine = Engine::new(&AppConfig::default());
    let report = engine.run(&fixture()).unwrap();

    let independent: Vec<_> = report
        .parlays
        .iter()
        .filter(|p| p.kind == ParlayKind::Independent)
        .collect();
    assert!(!independent.is_empty());
    for parlay in independent {
        assert!(!parlay.legs[0].same_game(&parlay.legs[1]));
        assert_eq!(parlay.avg_correlation, Decimal::ZERO);
    }
}

#[test]
fn test_full_run_never_duplicates_players_and_sorts_output() {
    let engine = Engine::new(&AppConfig::default());
    let report = engine.run(&fixture()).unwrap();

    for parlay in &report.parlays {
        let mut names: Vec<&str> = parlay
            .legs
            .iter()
            .map(|leg| leg.normalized_name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), parlay.legs.len());
    }
    for pair in report.parlays.windows(2) {
        assert!(pair[0].risk_adjusted_score >= pair[1].risk_adjusted_score);
    }
    for pair in report.opportunities.windows(2) {
        assert!(pair[0].prop.ev_percent >= pair[1].prop.ev_percent);
    }
}

#[test]
fn test_full_run_isolates_one_sided_markets() {
    let engine = Engine::new(&AppConfig::default());
    let report = engine.run(&fixture()).unwrap();

    assert_eq!(report.one_sided.len(), 1);
    assert_eq!(report.one_sided[0].player_name, "Bobby Witt Jr");
    assert_eq!(report.one_sided[0].book_count, 2);

    // One-sided markets never reach opportunities or parlays
    assert!(!report
        .opportunities
        .iter()
        .any(|o| o.prop.player_name == "Bobby Witt Jr"));
    assert!(!report
        .parlays
        .iter()
        .flat_map(|p| &p.legs)
        .any(|leg| leg.player_name == "Bobby Witt Jr"));
}

#[test]
fn test_snapshot_json_roundtrip_through_engine() {
    let json = serde_json::to_string(&fixture()).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
    let engine = Engine::new(&AppConfig::default());
    let report = engine.run(&snapshot).unwrap();
    assert!(!report.parlays.is_empty());
    assert_eq!(report.sport, Sport::Mlb);
}
