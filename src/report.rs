use std::fmt::Write;

use crate::board::{LeagueBoard, MatchAnalysis};
use crate::value_bets::THRESHOLD_PRESETS;

pub struct ReportOptions<'a> {
    pub title: &'a str,
    pub favorites: &'a [String],
    pub favorites_only: bool,
    pub max_value_bets: usize,
}

impl Default for ReportOptions<'_> {
    fn default() -> Self {
        Self {
            title: "",
            favorites: &[],
            favorites_only: false,
            max_value_bets: 20,
        }
    }
}

pub fn render_board(board: &LeagueBoard, opts: &ReportOptions<'_>) -> String {
    let is_fav = |id: &str| opts.favorites.iter().any(|f| f == id);
    let mut out = String::new();

    if !opts.title.is_empty() {
        let _ = writeln!(out, "{}", opts.title);
        let _ = writeln!(out, "{}", "=".repeat(opts.title.chars().count()));
    }

    let shown: Vec<&MatchAnalysis> = board
        .matches
        .iter()
        .filter(|a| !opts.favorites_only || is_fav(&a.fixture.id))
        .collect();
    if shown.is_empty() {
        let _ = writeln!(out, "No matches available.");
        return out;
    }

    for analysis in &shown {
        let m = &analysis.fixture;
        let p = &analysis.prediction;
        let star = if is_fav(&m.id) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{star} [{}] {} ({})",
            m.id,
            m.label(),
            m.commence_time.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(
            out,
            "    home {:>5.1}%  draw {:>5.1}%  away {:>5.1}%",
            p.home_win_probability * 100.0,
            p.draw_probability * 100.0,
            p.away_win_probability * 100.0
        );
        for bet in &p.recommended_bets {
            let _ = writeln!(
                out,
                "    {:<12} {:<28} @ {:>5.2}  conf {:>3.0}%",
                bet.market, bet.selection, bet.odds, bet.confidence
            );
        }
    }

    let ranked: Vec<_> = board
        .ranked_value_bets
        .iter()
        .filter(|b| !opts.favorites_only || is_fav(&b.match_id))
        .take(opts.max_value_bets)
        .collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "Value bets (threshold {:.0}%)", board.threshold_percent);
    if ranked.is_empty() {
        let lower: Vec<String> = THRESHOLD_PRESETS
            .iter()
            .filter(|p| **p < board.threshold_percent)
            .map(|p| format!("{p:.0}%"))
            .collect();
        if lower.is_empty() {
            let _ = writeln!(out, "  none found; try selecting a different league");
        } else {
            let _ = writeln!(
                out,
                "  none found; try a lower threshold ({}) or a different league",
                lower.join(", ")
            );
        }
        return out;
    }
    for bet in ranked {
        let label = board
            .analysis_for(&bet.match_id)
            .map(|a| a.fixture.label())
            .unwrap_or_else(|| bet.match_id.clone());
        let _ = writeln!(
            out,
            "  +{:>5.1}%  {:<28} {:<20} {:<14} @ {:>5.2} (fair {:.2}, model {:.1}% vs book {:.1}%)",
            bet.value_percentage,
            label,
            bet.selection,
            bet.bookmaker_name,
            bet.bookmaker_odds,
            bet.fair_odds,
            bet.fair_probability * 100.0,
            bet.implied_probability * 100.0
        );
    }
    out
}
