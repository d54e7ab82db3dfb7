use std::env;

use anyhow::{Context, Result, anyhow};
use chrono::{Duration, Utc};

use value_scout::board;
use value_scout::leagues::{self, SOCCER_LEAGUES};
use value_scout::logging;
use value_scout::odds::Match;
use value_scout::odds_fetch::{self, OddsFetchConfig, OddsSource};
use value_scout::persist::{self, Settings};
use value_scout::refresh::{DEFAULT_REFRESH_HOURS, RefreshTracker};
use value_scout::report::{self, ReportOptions};
use value_scout::value_bets::{self, DEFAULT_THRESHOLD_PERCENT};

#[derive(Debug, Default)]
struct Args {
    league: Option<String>,
    threshold: Option<f64>,
    seed: Option<u64>,
    force_refresh: bool,
    favorites_only: bool,
    list_leagues: bool,
    list_sports: bool,
    add_favorites: Vec<String>,
    remove_favorites: Vec<String>,
    set_key: Option<String>,
    clear_key: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let args = parse_args(env::args().skip(1))?;

    if args.list_leagues {
        for league in &SOCCER_LEAGUES {
            println!("{:<36} {:<18} {}", league.key, league.title, league.country);
        }
        return Ok(());
    }

    let mut settings = persist::load_settings();
    if apply_settings_args(&mut settings, &args)? {
        persist::save_settings(&settings).context("failed to save settings")?;
    }

    let mut cfg = OddsFetchConfig::from_env();
    if cfg.api_key.is_none() {
        cfg = cfg.with_api_key(settings.api_key.clone());
    }

    if args.list_sports {
        let sports = odds_fetch::fetch_sports(&cfg)?;
        for sport in sports.iter().filter(|s| s.active && s.group == "Soccer") {
            println!("{:<36} {}", sport.key, sport.title);
        }
        return Ok(());
    }

    let league = settings.selected_league.clone();
    let threshold = args.threshold.unwrap_or_else(|| {
        env::var("VALUE_THRESHOLD")
            .ok()
            .and_then(|v| value_bets::parse_threshold(&v))
            .unwrap_or(DEFAULT_THRESHOLD_PERCENT)
    });
    let refresh_hours = env::var("REFRESH_INTERVAL_HOURS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_REFRESH_HOURS)
        .clamp(1, 24 * 7);

    let mut tracker = RefreshTracker::with_timestamps(
        settings.refreshed_at.clone(),
        Duration::hours(refresh_hours),
    );
    let matches = load_matches(&cfg, &league, &mut tracker, args.force_refresh)?;
    if tracker.timestamps() != &settings.refreshed_at {
        settings.refreshed_at = tracker.timestamps().clone();
        persist::save_settings(&settings).context("failed to save refresh timestamps")?;
    }

    let board = board::analyze_matches(matches, threshold, args.seed);
    let title = format!("{} value board", leagues::league_title(&league));
    print!(
        "{}",
        report::render_board(
            &board,
            &ReportOptions {
                title: &title,
                favorites: &settings.favorites,
                favorites_only: args.favorites_only,
                ..ReportOptions::default()
            }
        )
    );
    Ok(())
}

fn load_matches(
    cfg: &OddsFetchConfig,
    league: &str,
    tracker: &mut RefreshTracker,
    force_refresh: bool,
) -> Result<Vec<Match>> {
    let now = Utc::now();
    let mut cache = persist::load_odds_cache();

    if !force_refresh && !tracker.needs_refresh(league, now) {
        if let Some(cached) = cache.league(league) {
            tracing::info!(
                league,
                fetched_at = %cached.fetched_at,
                "odds still fresh, using cached snapshot"
            );
            return Ok(cached.matches.clone());
        }
    }

    let resp = odds_fetch::fetch_odds(cfg, league);
    if let Some(reason) = resp.fallback_reason.as_deref() {
        eprintln!("warning: live odds unavailable ({reason}); showing demo matches");
    }
    if resp.source == OddsSource::Live {
        tracker.mark_updated(league, resp.fetched_at);
        cache.store(league, resp.fetched_at, resp.matches.clone());
        persist::save_odds_cache(&cache).context("failed to save odds cache")?;
    }
    Ok(resp.matches)
}

fn apply_settings_args(settings: &mut Settings, args: &Args) -> Result<bool> {
    let mut changed = false;
    if args.clear_key {
        settings.clear_api_key();
        changed = true;
    }
    if let Some(key) = args.set_key.as_deref() {
        settings.set_api_key(key);
        changed = true;
    }
    if let Some(league) = args.league.as_deref() {
        settings.set_selected_league(league)?;
        changed = true;
    }
    for id in &args.add_favorites {
        settings.add_favorite(id);
        changed = true;
    }
    for id in &args.remove_favorites {
        settings.remove_favorite(id);
        changed = true;
    }
    Ok(changed)
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    while let Some(arg) = raw.next() {
        let mut value = |flag: &str| {
            raw.next()
                .ok_or_else(|| anyhow!("{flag} expects a value"))
        };
        match arg.as_str() {
            "--league" | "-l" => args.league = Some(value(&arg)?),
            "--threshold" | "-t" => {
                let raw = value(&arg)?;
                let pct = value_bets::parse_threshold(&raw)
                    .ok_or_else(|| anyhow!("invalid threshold {raw:?}"))?;
                args.threshold = Some(pct);
            }
            "--seed" => {
                let raw = value(&arg)?;
                let seed = raw
                    .parse::<u64>()
                    .with_context(|| format!("invalid seed {raw:?}"))?;
                args.seed = Some(seed);
            }
            "--fav" => args.add_favorites.push(value(&arg)?),
            "--unfav" => args.remove_favorites.push(value(&arg)?),
            "--set-key" => args.set_key = Some(value(&arg)?),
            "--clear-key" => args.clear_key = true,
            "--refresh" | "-r" => args.force_refresh = true,
            "--favorites-only" => args.favorites_only = true,
            "--leagues" => args.list_leagues = true,
            "--sports" => args.list_sports = true,
            other => return Err(anyhow!("unknown argument {other:?}")),
        }
    }
    Ok(args)
}
