use rayon::prelude::*;
use serde::Serialize;

use crate::odds::Match;
use crate::prediction::{self, OffsetSource, PredictionResult, RandomOffsets};
use crate::value_bets::{self, ValueBet};

#[derive(Debug, Clone, Serialize)]
pub struct MatchAnalysis {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub prediction: PredictionResult,
    pub value_bets: Vec<ValueBet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueBoard {
    pub threshold_percent: f64,
    pub matches: Vec<MatchAnalysis>,
    /// Every value bet on the board, highest value first.
    pub ranked_value_bets: Vec<ValueBet>,
}

impl LeagueBoard {
    pub fn analysis_for(&self, match_id: &str) -> Option<&MatchAnalysis> {
        self.matches.iter().find(|a| a.fixture.id == match_id)
    }

    pub fn best_value_for(&self, match_id: &str) -> Option<&ValueBet> {
        self.ranked_value_bets
            .iter()
            .find(|b| b.match_id == match_id)
    }
}

/// Runs prediction and value detection for each match in parallel.
///
/// With a seed, each match draws from its own generator derived from the seed and
/// the match's position, so results do not depend on thread scheduling.
pub fn analyze_matches(matches: Vec<Match>, threshold_percent: f64, seed: Option<u64>) -> LeagueBoard {
    match seed {
        Some(seed) => analyze_matches_with(matches, threshold_percent, |idx, _| {
            RandomOffsets::seeded(seed.wrapping_add(idx as u64))
        }),
        None => analyze_matches_with(matches, threshold_percent, |_, _| RandomOffsets::thread()),
    }
}

pub fn analyze_matches_with<F, S>(
    matches: Vec<Match>,
    threshold_percent: f64,
    make_offsets: F,
) -> LeagueBoard
where
    F: Fn(usize, &Match) -> S + Sync,
    S: OffsetSource,
{
    let analyses: Vec<MatchAnalysis> = matches
        .into_par_iter()
        .enumerate()
        .map(|(idx, fixture)| {
            let mut offsets = make_offsets(idx, &fixture);
            let prediction = prediction::generate_prediction_with(&fixture, &mut offsets);
            let value_bets = value_bets::find_value_bets(&fixture, &prediction, threshold_percent);
            MatchAnalysis {
                fixture,
                prediction,
                value_bets,
            }
        })
        .collect();

    let mut ranked_value_bets: Vec<ValueBet> = analyses
        .iter()
        .flat_map(|a| a.value_bets.iter().cloned())
        .collect();
    value_bets::rank_value_bets(&mut ranked_value_bets);

    tracing::debug!(
        matches = analyses.len(),
        value_bets = ranked_value_bets.len(),
        threshold_percent,
        "board analyzed"
    );

    LeagueBoard {
        threshold_percent,
        matches: analyses,
        ranked_value_bets,
    }
}
