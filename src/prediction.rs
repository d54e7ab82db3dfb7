use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::odds::{DRAW_LABEL, MarketKind, Match, OVER_LABEL, implied_probability};

pub const MATCH_WINNER_MARKET: &str = "Match Winner";
pub const TOTALS_MARKET: &str = "Totals";
pub const HANDICAP_MARKET: &str = "Handicap";

const DEFAULT_SIDE_ODDS: f64 = 2.0;
const DEFAULT_DRAW_ODDS: f64 = 3.0;

pub const MAX_OFFSET: f64 = 0.05;
pub const MIN_PROB: f64 = 0.05;
pub const MAX_PROB: f64 = 0.95;

// Fixed heuristics, not model output.
pub const TOTALS_CONFIDENCE: f64 = 65.0;
pub const HANDICAP_CONFIDENCE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBet {
    pub market: String,
    pub selection: String,
    pub odds: f64,
    /// Percentage in 0..=100.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home_win_probability: f64,
    pub draw_probability: f64,
    pub away_win_probability: f64,
    pub recommended_bets: Vec<RecommendedBet>,
}

impl PredictionResult {
    pub fn uniform() -> Self {
        Self {
            home_win_probability: 1.0 / 3.0,
            draw_probability: 1.0 / 3.0,
            away_win_probability: 1.0 / 3.0,
            recommended_bets: Vec::new(),
        }
    }

    pub fn total(&self) -> f64 {
        self.home_win_probability + self.draw_probability + self.away_win_probability
    }
}

/// Supplies the perturbation added to each de-margined side probability.
///
/// This is the only source of non-determinism in the pipeline. Production code
/// draws from an RNG; tests pin it with a closure such as `|| 0.0`.
pub trait OffsetSource {
    fn next_offset(&mut self) -> f64;
}

impl<F> OffsetSource for F
where
    F: FnMut() -> f64,
{
    fn next_offset(&mut self) -> f64 {
        self()
    }
}

/// Uniform offsets in `[-MAX_OFFSET, MAX_OFFSET]`.
#[derive(Debug, Clone)]
pub struct RandomOffsets<R> {
    rng: R,
}

impl<R: Rng> RandomOffsets<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomOffsets<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomOffsets<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OffsetSource for RandomOffsets<R> {
    fn next_offset(&mut self) -> f64 {
        self.rng.gen_range(-MAX_OFFSET..=MAX_OFFSET)
    }
}

pub fn generate_prediction(m: &Match) -> PredictionResult {
    generate_prediction_with(m, &mut RandomOffsets::thread())
}

pub fn generate_prediction_with<S>(m: &Match, offsets: &mut S) -> PredictionResult
where
    S: OffsetSource + ?Sized,
{
    let Some(h2h) = m.reference_market(MarketKind::H2h) else {
        return PredictionResult::uniform();
    };

    let home_odds = h2h.price_of(&m.home_team).unwrap_or(DEFAULT_SIDE_ODDS);
    let away_odds = h2h.price_of(&m.away_team).unwrap_or(DEFAULT_SIDE_ODDS);
    let draw_odds = h2h.price_of(DRAW_LABEL).unwrap_or(DEFAULT_DRAW_ODDS);

    let total_implied = implied_probability(home_odds)
        + implied_probability(away_odds)
        + implied_probability(draw_odds);

    let home = perturbed_share(home_odds, total_implied, offsets);
    let away = perturbed_share(away_odds, total_implied, offsets);
    let (home, draw, away) = settle_draw(home, away);

    tracing::trace!(
        match_id = %m.id,
        home,
        draw,
        away,
        "prediction generated"
    );

    let mut recommended_bets = Vec::with_capacity(3);
    recommended_bets.push(match_winner_pick(
        m,
        (home_odds, home),
        (away_odds, away),
        (draw_odds, draw),
    ));

    if let Some(over) = m
        .reference_market(MarketKind::Totals)
        .and_then(|totals| totals.outcome(OVER_LABEL))
    {
        recommended_bets.push(RecommendedBet {
            market: TOTALS_MARKET.to_string(),
            selection: with_point(OVER_LABEL, over.point),
            odds: over.price,
            confidence: TOTALS_CONFIDENCE,
        });
    }

    if let Some(spread) = m
        .reference_market(MarketKind::Spreads)
        .and_then(|spreads| spreads.outcome(&m.home_team))
    {
        recommended_bets.push(RecommendedBet {
            market: HANDICAP_MARKET.to_string(),
            selection: with_point(&m.home_team, spread.point),
            odds: spread.price,
            confidence: HANDICAP_CONFIDENCE,
        });
    }

    PredictionResult {
        home_win_probability: home,
        draw_probability: draw,
        away_win_probability: away,
        recommended_bets,
    }
}

fn perturbed_share<S>(odds: f64, total_implied: f64, offsets: &mut S) -> f64
where
    S: OffsetSource + ?Sized,
{
    let fair = implied_probability(odds) / total_implied;
    (fair + offsets.next_offset()).clamp(MIN_PROB, MAX_PROB)
}

// Draw takes the remainder. When that falls under the floor, the floor is
// restored and the excess is split evenly across both sides; if that pushes a
// side under the floor too, the other side absorbs the shortfall.
fn settle_draw(mut home: f64, mut away: f64) -> (f64, f64, f64) {
    let mut draw = 1.0 - home - away;
    if draw < MIN_PROB {
        draw = MIN_PROB;
        let excess = home + away + draw - 1.0;
        home -= excess / 2.0;
        away -= excess / 2.0;
        if home < MIN_PROB {
            away -= MIN_PROB - home;
            home = MIN_PROB;
        } else if away < MIN_PROB {
            home -= MIN_PROB - away;
            away = MIN_PROB;
        }
    }
    (home, draw, away)
}

fn match_winner_pick(
    m: &Match,
    home: (f64, f64),
    away: (f64, f64),
    draw: (f64, f64),
) -> RecommendedBet {
    let best = home.0.max(away.0).max(draw.0);
    let (selection, (odds, prob)) = if best == home.0 {
        (m.home_team.as_str(), home)
    } else if best == away.0 {
        (m.away_team.as_str(), away)
    } else {
        (DRAW_LABEL, draw)
    };
    RecommendedBet {
        market: MATCH_WINNER_MARKET.to_string(),
        selection: selection.to_string(),
        odds,
        confidence: prob * 100.0,
    }
}

fn with_point(label: &str, point: Option<f64>) -> String {
    match point {
        Some(p) => format!("{label} {p}"),
        None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_draw_keeps_remainder_when_above_floor() {
        let (h, d, a) = settle_draw(0.45, 0.25);
        assert!((d - 0.30).abs() < 1e-12);
        assert!((h + d + a - 1.0).abs() < 1e-12);
    }

    #[test]
    fn settle_draw_splits_excess_evenly() {
        let (h, d, a) = settle_draw(0.60, 0.45);
        assert_eq!(d, MIN_PROB);
        assert!((h - 0.55).abs() < 1e-12);
        assert!((a - 0.40).abs() < 1e-12);
    }

    #[test]
    fn settle_draw_never_drops_a_side_under_floor() {
        let (h, d, a) = settle_draw(MAX_PROB, MIN_PROB);
        assert_eq!(d, MIN_PROB);
        assert_eq!(a, MIN_PROB);
        assert!((h - 0.90).abs() < 1e-12);
        assert!((h + d + a - 1.0).abs() < 1e-12);
    }

    #[test]
    fn seeded_offsets_stay_in_range_and_repeat() {
        let mut a = RandomOffsets::seeded(7);
        let mut b = RandomOffsets::seeded(7);
        for _ in 0..500 {
            let x = a.next_offset();
            assert!((-MAX_OFFSET..=MAX_OFFSET).contains(&x));
            assert_eq!(x, b.next_offset());
        }
    }

    #[test]
    fn point_formatting_matches_display_labels() {
        assert_eq!(with_point("Over", Some(2.5)), "Over 2.5");
        assert_eq!(with_point("Bayern Munich", Some(-1.0)), "Bayern Munich -1");
        assert_eq!(with_point("Over", None), "Over");
    }
}
