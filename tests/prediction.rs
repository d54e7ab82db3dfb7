use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use value_scout::odds::{Bookmaker, Market, MarketKind, Match, Outcome};
use value_scout::prediction::{
    HANDICAP_CONFIDENCE, MATCH_WINNER_MARKET, MAX_PROB, MIN_PROB, PredictionResult,
    RandomOffsets, TOTALS_CONFIDENCE, generate_prediction, generate_prediction_with,
};

fn outcome(name: &str, price: f64, point: Option<f64>) -> Outcome {
    Outcome {
        name: name.to_string(),
        price,
        point,
    }
}

fn market(key: MarketKind, outcomes: Vec<Outcome>) -> Market {
    Market {
        key,
        last_update: None,
        outcomes,
    }
}

fn bookmaker(title: &str, markets: Vec<Market>) -> Bookmaker {
    Bookmaker {
        key: title.to_ascii_lowercase(),
        title: title.to_string(),
        last_update: None,
        markets,
    }
}

fn h2h(home: f64, away: f64, draw: f64) -> Market {
    market(
        MarketKind::H2h,
        vec![
            outcome("Arsenal", home, None),
            outcome("Chelsea", away, None),
            outcome("Draw", draw, None),
        ],
    )
}

fn fixture(bookmakers: Vec<Bookmaker>) -> Match {
    Match {
        id: "m1".to_string(),
        sport_key: "soccer_epl".to_string(),
        sport_title: "Premier League".to_string(),
        commence_time: Utc.with_ymd_and_hms(2026, 10, 24, 14, 0, 0).unwrap(),
        home_team: "Arsenal".to_string(),
        away_team: "Chelsea".to_string(),
        bookmakers,
    }
}

fn zero() -> impl FnMut() -> f64 {
    || 0.0
}

fn assert_well_formed(p: &PredictionResult) {
    assert!((p.total() - 1.0).abs() < 1e-9, "sum {}", p.total());
    for prob in [
        p.home_win_probability,
        p.draw_probability,
        p.away_win_probability,
    ] {
        assert!(
            (MIN_PROB - 1e-12..=MAX_PROB + 1e-12).contains(&prob),
            "probability {prob} out of bounds"
        );
    }
}

#[test]
fn missing_match_winner_market_gives_uniform_prediction() {
    let totals_only = fixture(vec![bookmaker(
        "Betfair",
        vec![market(
            MarketKind::Totals,
            vec![outcome("Over", 1.9, Some(2.5)), outcome("Under", 1.9, Some(2.5))],
        )],
    )]);
    for m in [totals_only, fixture(Vec::new())] {
        let p = generate_prediction(&m);
        assert_eq!(p.home_win_probability, 1.0 / 3.0);
        assert_eq!(p.draw_probability, 1.0 / 3.0);
        assert_eq!(p.away_win_probability, 1.0 / 3.0);
        assert!(p.recommended_bets.is_empty());
    }
}

#[test]
fn only_the_first_bookmaker_feeds_the_model() {
    let m = fixture(vec![
        bookmaker("Pinnacle", Vec::new()),
        bookmaker("Betfair", vec![h2h(2.0, 3.6, 3.25)]),
    ]);
    let p = generate_prediction_with(&m, &mut zero());
    assert_eq!(p, PredictionResult::uniform());
}

#[test]
fn zero_offsets_remove_the_overround() {
    let m = fixture(vec![bookmaker("William Hill", vec![h2h(2.0, 3.6, 3.25)])]);
    let p = generate_prediction_with(&m, &mut zero());

    let total = 1.0 / 2.0 + 1.0 / 3.6 + 1.0 / 3.25;
    assert!((p.home_win_probability - 0.5 / total).abs() < 1e-12);
    assert!((p.away_win_probability - (1.0 / 3.6) / total).abs() < 1e-12);
    assert!((p.draw_probability - (1.0 / 3.25) / total).abs() < 1e-12);
    assert_well_formed(&p);
}

#[test]
fn missing_outcomes_use_placeholder_odds() {
    let m = fixture(vec![bookmaker(
        "Betfair",
        vec![market(MarketKind::H2h, vec![outcome("Arsenal", 1.5, None)])],
    )]);
    let p = generate_prediction_with(&m, &mut zero());

    // 1/1.5 + 1/2.0 + 1/3.0 = 1.5
    assert!((p.home_win_probability - (1.0 / 1.5) / 1.5).abs() < 1e-12);
    assert!((p.away_win_probability - 0.5 / 1.5).abs() < 1e-12);
    assert_well_formed(&p);
}

#[test]
fn offsets_apply_to_home_then_away() {
    let m = fixture(vec![bookmaker("William Hill", vec![h2h(2.0, 3.6, 3.25)])]);
    let mut script = [0.05, -0.05].into_iter();
    let p = generate_prediction_with(&m, &mut || script.next().unwrap_or(0.0));

    let total = 1.0 / 2.0 + 1.0 / 3.6 + 1.0 / 3.25;
    assert!((p.home_win_probability - (0.5 / total + 0.05)).abs() < 1e-12);
    assert!((p.away_win_probability - ((1.0 / 3.6) / total - 0.05)).abs() < 1e-12);
    assert_well_formed(&p);
}

#[test]
fn lopsided_odds_are_rebalanced_within_bounds() {
    let m = fixture(vec![bookmaker("Betfair", vec![h2h(1.01, 30.0, 15.0)])]);
    let p = generate_prediction_with(&m, &mut || 0.05);

    assert_eq!(p.draw_probability, MIN_PROB);
    assert!((p.away_win_probability - MIN_PROB).abs() < 1e-12);
    assert!((p.home_win_probability - 0.90).abs() < 1e-12);
    assert_well_formed(&p);
}

#[test]
fn random_predictions_always_sum_to_one_within_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut offsets = RandomOffsets::seeded(1337);
    for _ in 0..2_000 {
        let home = rng.gen_range(1.01..12.0);
        let away = rng.gen_range(1.01..12.0);
        let draw = rng.gen_range(1.5..9.0);
        let m = fixture(vec![bookmaker("Betfair", vec![h2h(home, away, draw)])]);
        let p = generate_prediction_with(&m, &mut offsets);
        assert_well_formed(&p);
    }
}

#[test]
fn recommendations_cover_match_winner_totals_and_handicap() {
    let m = fixture(vec![bookmaker(
        "William Hill",
        vec![
            h2h(2.0, 3.6, 3.25),
            market(
                MarketKind::Spreads,
                vec![
                    outcome("Arsenal", 1.85, Some(-0.5)),
                    outcome("Chelsea", 1.95, Some(0.5)),
                ],
            ),
            market(
                MarketKind::Totals,
                vec![outcome("Over", 1.9, Some(2.5)), outcome("Under", 1.9, Some(2.5))],
            ),
        ],
    )]);
    let p = generate_prediction_with(&m, &mut zero());
    assert_eq!(p.recommended_bets.len(), 3);

    let winner = &p.recommended_bets[0];
    assert_eq!(winner.market, MATCH_WINNER_MARKET);
    assert_eq!(winner.selection, "Chelsea");
    assert_eq!(winner.odds, 3.6);
    assert!((winner.confidence - p.away_win_probability * 100.0).abs() < 1e-9);

    let totals = &p.recommended_bets[1];
    assert_eq!(totals.market, "Totals");
    assert_eq!(totals.selection, "Over 2.5");
    assert_eq!(totals.odds, 1.9);
    assert_eq!(totals.confidence, TOTALS_CONFIDENCE);

    let handicap = &p.recommended_bets[2];
    assert_eq!(handicap.market, "Handicap");
    assert_eq!(handicap.selection, "Arsenal -0.5");
    assert_eq!(handicap.odds, 1.85);
    assert_eq!(handicap.confidence, HANDICAP_CONFIDENCE);
}

#[test]
fn match_winner_pick_follows_highest_price_not_model() {
    let draw_longest = fixture(vec![bookmaker("Betfair", vec![h2h(1.6, 3.0, 4.0)])]);
    let p = generate_prediction_with(&draw_longest, &mut zero());
    assert_eq!(p.recommended_bets.len(), 1);
    assert_eq!(p.recommended_bets[0].selection, "Draw");
    assert!((p.recommended_bets[0].confidence - p.draw_probability * 100.0).abs() < 1e-9);

    // Tied prices resolve to the home side first.
    let tied = fixture(vec![bookmaker("Betfair", vec![h2h(3.0, 3.0, 2.5)])]);
    let p = generate_prediction_with(&tied, &mut zero());
    assert_eq!(p.recommended_bets[0].selection, "Arsenal");
}
