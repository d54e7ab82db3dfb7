use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::demo_feed;
use crate::odds::Match;

const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const DEFAULT_MARKETS: &str = "h2h,spreads,totals";
const DEMO_API_KEY: &str = "demo";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const CLIENT_AGENT: &str = "value-scout/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct OddsFetchConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub regions: String,
    pub markets: String,
}

impl OddsFetchConfig {
    pub fn from_env() -> Self {
        let enabled = env_bool("ODDS_ENABLED", true);
        let base_url = env::var("ODDS_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = env::var("ODDS_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let regions = env::var("ODDS_REGIONS")
            .unwrap_or_else(|_| "us".to_string())
            .trim()
            .to_ascii_lowercase();
        let markets = env::var("ODDS_MARKETS")
            .unwrap_or_else(|_| DEFAULT_MARKETS.to_string())
            .trim()
            .to_ascii_lowercase();

        Self {
            enabled,
            base_url,
            api_key,
            regions,
            markets,
        }
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    fn live_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_deref()
            .filter(|k| !k.eq_ignore_ascii_case(DEMO_API_KEY))
    }
}

impl Default for OddsFetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            regions: "us".to_string(),
            markets: DEFAULT_MARKETS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OddsSource {
    Live,
    Demo,
}

#[derive(Debug, Clone)]
pub struct OddsResponse {
    pub source: OddsSource,
    pub matches: Vec<Match>,
    pub fetched_at: DateTime<Utc>,
    pub fallback_reason: Option<String>,
}

impl OddsResponse {
    fn demo(sport_key: &str, now: DateTime<Utc>, reason: Option<String>) -> Self {
        Self {
            source: OddsSource::Demo,
            matches: demo_feed::demo_matches_for(sport_key, now),
            fetched_at: now,
            fallback_reason: reason,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sport {
    pub key: String,
    #[serde(default)]
    pub group: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub has_outrights: bool,
}

/// Fetches decimal odds for one league.
///
/// Never leaves the caller empty-handed: a missing key, an unauthorized key, or any
/// transport/parse failure yields the demo fixtures for that league instead.
pub fn fetch_odds(cfg: &OddsFetchConfig, sport_key: &str) -> OddsResponse {
    let now = Utc::now();
    let Some(api_key) = cfg.live_key() else {
        tracing::info!(sport_key, "no odds api key configured, using demo matches");
        return OddsResponse::demo(sport_key, now, None);
    };

    match fetch_live_odds(cfg, api_key, sport_key) {
        Ok(matches) => {
            tracing::info!(sport_key, matches = matches.len(), "odds fetched");
            OddsResponse {
                source: OddsSource::Live,
                matches,
                fetched_at: now,
                fallback_reason: None,
            }
        }
        Err(err) => {
            tracing::warn!(sport_key, error = %err, "odds fetch failed, using demo matches");
            OddsResponse::demo(sport_key, now, Some(format!("{err:#}")))
        }
    }
}

fn fetch_live_odds(cfg: &OddsFetchConfig, api_key: &str, sport_key: &str) -> Result<Vec<Match>> {
    let url = format!("{}/sports/{sport_key}/odds", cfg.base_url);
    let body = get_text(
        &url,
        &[
            ("apiKey", api_key),
            ("regions", cfg.regions.as_str()),
            ("markets", cfg.markets.as_str()),
            ("oddsFormat", "decimal"),
            ("dateFormat", "iso"),
        ],
    )?;
    parse_odds_json(&body)
}

pub fn fetch_sports(cfg: &OddsFetchConfig) -> Result<Vec<Sport>> {
    let Some(api_key) = cfg.live_key() else {
        return Err(anyhow::anyhow!("ODDS_API_KEY missing"));
    };
    let url = format!("{}/sports", cfg.base_url);
    let body = get_text(&url, &[("apiKey", api_key)])?;
    let sports: Option<Vec<Sport>> = serde_json::from_str(&body).context("invalid sports json")?;
    Ok(sports.unwrap_or_default())
}

pub fn parse_odds_json(raw: &str) -> Result<Vec<Match>> {
    let parsed: Option<Vec<Match>> = serde_json::from_str(raw).context("invalid odds json")?;
    Ok(parsed.unwrap_or_default())
}

fn get_text(url: &str, query: &[(&str, &str)]) -> Result<String> {
    let client = http_client()?;
    let resp = client
        .get(url)
        .query(query)
        .header(USER_AGENT, CLIENT_AGENT)
        .send()
        .context("odds request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading odds body")?;
    if status == StatusCode::UNAUTHORIZED {
        return Err(anyhow::anyhow!("odds api key unauthorized"));
    }
    if !status.is_success() {
        return Err(anyhow::anyhow!("odds http {}: {}", status, snippet(&body)));
    }
    Ok(body)
}

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

fn snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(220)
        .collect()
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
