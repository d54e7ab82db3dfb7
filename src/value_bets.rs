use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::odds::{DRAW_LABEL, MarketKind, Match, fair_odds, implied_probability};
use crate::prediction::{MATCH_WINNER_MARKET, PredictionResult};

pub const DEFAULT_THRESHOLD_PERCENT: f64 = 10.0;
pub const THRESHOLD_PRESETS: [f64; 4] = [5.0, 10.0, 15.0, 20.0];

/// Parses a threshold such as `10`, `7.5` or `15%`. Non-finite values are rejected.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|pct| pct.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub match_id: String,
    pub market: String,
    pub selection: String,
    pub bookmaker_name: String,
    pub bookmaker_odds: f64,
    pub implied_probability: f64,
    pub fair_probability: f64,
    pub fair_odds: f64,
    pub value_percentage: f64,
}

/// Scans every bookmaker's match-winner market for prices above the model's fair odds.
///
/// Output follows bookmaker order, then home/away/draw. Use [`rank_value_bets`]
/// for the descending-value ordering shown to users. Totals and spreads are not
/// evaluated.
pub fn find_value_bets(
    m: &Match,
    prediction: &PredictionResult,
    threshold_percent: f64,
) -> Vec<ValueBet> {
    let selections = [
        (m.home_team.as_str(), prediction.home_win_probability),
        (m.away_team.as_str(), prediction.away_win_probability),
        (DRAW_LABEL, prediction.draw_probability),
    ];

    let mut out = Vec::new();
    for bookmaker in &m.bookmakers {
        let Some(h2h) = bookmaker.market(MarketKind::H2h) else {
            continue;
        };
        for (selection, model_prob) in selections {
            let Some(odds) = h2h.price_of(selection) else {
                continue;
            };
            let implied = implied_probability(odds);
            // Comparisons stay positive so NaN never passes either gate.
            let has_edge = model_prob > implied;
            if !has_edge {
                continue;
            }
            let fair = fair_odds(model_prob);
            let value_percentage = (odds / fair - 1.0) * 100.0;
            let clears_threshold = value_percentage >= threshold_percent;
            if !clears_threshold {
                continue;
            }
            out.push(ValueBet {
                match_id: m.id.clone(),
                market: MATCH_WINNER_MARKET.to_string(),
                selection: selection.to_string(),
                bookmaker_name: bookmaker.title.clone(),
                bookmaker_odds: odds,
                implied_probability: implied,
                fair_probability: model_prob,
                fair_odds: fair,
                value_percentage,
            });
        }
    }
    out
}

/// Sorts by descending value percentage. Stable, so equal values keep scan order.
pub fn rank_value_bets(bets: &mut [ValueBet]) {
    bets.sort_by(|a, b| {
        b.value_percentage
            .partial_cmp(&a.value_percentage)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_parsing_accepts_percent_suffix() {
        assert_eq!(parse_threshold("10"), Some(10.0));
        assert_eq!(parse_threshold(" 7.5% "), Some(7.5));
        assert_eq!(parse_threshold("0"), Some(0.0));
    }

    #[test]
    fn threshold_parsing_rejects_non_finite_and_garbage() {
        assert_eq!(parse_threshold("NaN"), None);
        assert_eq!(parse_threshold("inf"), None);
        assert_eq!(parse_threshold("-infinity%"), None);
        assert_eq!(parse_threshold("ten"), None);
        assert_eq!(parse_threshold(""), None);
    }

    #[test]
    fn presets_include_the_default() {
        assert!(THRESHOLD_PRESETS.contains(&DEFAULT_THRESHOLD_PERCENT));
    }
}
