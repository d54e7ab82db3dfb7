use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use value_scout::board;
use value_scout::logging;
use value_scout::odds_fetch::parse_odds_json;
use value_scout::report::{self, ReportOptions};
use value_scout::value_bets::{DEFAULT_THRESHOLD_PERCENT, parse_threshold};

// Usage: snapshot_report [odds.json] [threshold%] [seed]
// Reads a saved odds API response and prints the board without touching the network.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/odds_epl.json"));
    let threshold = match args.next() {
        Some(raw) => {
            parse_threshold(&raw).ok_or_else(|| anyhow!("invalid threshold {raw:?}"))?
        }
        None => DEFAULT_THRESHOLD_PERCENT,
    };
    let seed = match args.next() {
        Some(raw) => Some(
            raw.parse::<u64>()
                .with_context(|| format!("invalid seed {raw:?}"))?,
        ),
        None => None,
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let matches = parse_odds_json(&raw)?;
    let board = board::analyze_matches(matches, threshold, seed);

    let title = format!("Snapshot {}", path.display());
    print!(
        "{}",
        report::render_board(
            &board,
            &ReportOptions {
                title: &title,
                ..ReportOptions::default()
            }
        )
    );
    Ok(())
}
