use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::leagues::{self, DEFAULT_LEAGUE};
use crate::odds::Match;

const APP_DIR: &str = "value_scout";
const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_VERSION: u32 = 1;
const ODDS_CACHE_FILE: &str = "odds_cache.json";
const ODDS_CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    version: u32,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_league")]
    pub selected_league: String,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub refreshed_at: HashMap<String, DateTime<Utc>>,
}

fn default_league() -> String {
    DEFAULT_LEAGUE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            api_key: None,
            selected_league: default_league(),
            favorites: Vec::new(),
            refreshed_at: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.api_key = (!key.is_empty()).then(|| key.to_string());
    }

    pub fn clear_api_key(&mut self) {
        self.api_key = None;
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn set_selected_league(&mut self, key: &str) -> Result<()> {
        let league = leagues::find_league(key)
            .ok_or_else(|| anyhow::anyhow!("unknown league key {key:?}"))?;
        self.selected_league = league.key.to_string();
        Ok(())
    }

    pub fn selected_league_title(&self) -> &'static str {
        leagues::league_title(&self.selected_league)
    }

    pub fn add_favorite(&mut self, match_id: &str) {
        if !self.is_favorite(match_id) {
            self.favorites.push(match_id.to_string());
        }
    }

    pub fn remove_favorite(&mut self, match_id: &str) {
        self.favorites.retain(|id| id != match_id);
    }

    pub fn is_favorite(&self, match_id: &str) -> bool {
        self.favorites.iter().any(|id| id == match_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OddsCache {
    version: u32,
    leagues: HashMap<String, CachedLeague>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedLeague {
    pub fetched_at: DateTime<Utc>,
    pub matches: Vec<Match>,
}

impl OddsCache {
    pub fn league(&self, key: &str) -> Option<&CachedLeague> {
        self.leagues.get(key)
    }

    pub fn store(&mut self, key: &str, fetched_at: DateTime<Utc>, matches: Vec<Match>) {
        self.version = ODDS_CACHE_VERSION;
        self.leagues.insert(
            key.to_string(),
            CachedLeague {
                fetched_at,
                matches,
            },
        );
    }
}

pub fn load_settings() -> Settings {
    settings_path()
        .map(|p| load_settings_from(&p))
        .unwrap_or_default()
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let Some(path) = settings_path() else {
        return Ok(());
    };
    save_settings_to(&path, settings)
}

pub fn load_settings_from(path: &Path) -> Settings {
    read_versioned::<Settings>(path, |s| s.version == SETTINGS_VERSION).unwrap_or_default()
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    let mut settings = settings.clone();
    settings.version = SETTINGS_VERSION;
    write_json_atomic(path, &settings)?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

pub fn load_odds_cache() -> OddsCache {
    odds_cache_path()
        .map(|p| load_odds_cache_from(&p))
        .unwrap_or_default()
}

pub fn save_odds_cache(cache: &OddsCache) -> Result<()> {
    let Some(path) = odds_cache_path() else {
        return Ok(());
    };
    save_odds_cache_to(&path, cache)
}

pub fn load_odds_cache_from(path: &Path) -> OddsCache {
    read_versioned::<OddsCache>(path, |c| c.version == ODDS_CACHE_VERSION).unwrap_or_default()
}

pub fn save_odds_cache_to(path: &Path, cache: &OddsCache) -> Result<()> {
    let mut cache = cache.clone();
    cache.version = ODDS_CACHE_VERSION;
    write_json_atomic(path, &cache)
}

fn read_versioned<T: DeserializeOwned>(path: &Path, current: impl Fn(&T) -> bool) -> Option<T> {
    let raw = fs::read_to_string(path).ok()?;
    let value = match serde_json::from_str::<T>(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable file");
            return None;
        }
    };
    current(&value).then_some(value)
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn settings_path() -> Option<PathBuf> {
    app_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join(SETTINGS_FILE))
}

pub fn odds_cache_path() -> Option<PathBuf> {
    app_dir("XDG_CACHE_HOME", ".cache").map(|d| d.join(ODDS_CACHE_FILE))
}

fn app_dir(xdg_var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Ok(base) = std::env::var(xdg_var) {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(home_fallback).join(APP_DIR))
}
