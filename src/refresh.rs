use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_REFRESH_HOURS: i64 = 24;

/// Decides when a league's odds are stale enough to fetch again.
#[derive(Debug, Clone)]
pub struct RefreshTracker {
    last_updated: HashMap<String, DateTime<Utc>>,
    interval: Duration,
}

impl RefreshTracker {
    pub fn new(interval: Duration) -> Self {
        Self::with_timestamps(HashMap::new(), interval)
    }

    pub fn with_timestamps(last_updated: HashMap<String, DateTime<Utc>>, interval: Duration) -> Self {
        Self {
            last_updated,
            interval,
        }
    }

    pub fn needs_refresh(&self, league: &str, now: DateTime<Utc>) -> bool {
        match self.last_updated.get(league) {
            Some(last) => now.signed_duration_since(*last) >= self.interval,
            None => true,
        }
    }

    pub fn mark_updated(&mut self, league: &str, now: DateTime<Utc>) {
        self.last_updated.insert(league.to_string(), now);
    }

    pub fn last_updated(&self, league: &str) -> Option<DateTime<Utc>> {
        self.last_updated.get(league).copied()
    }

    pub fn timestamps(&self) -> &HashMap<String, DateTime<Utc>> {
        &self.last_updated
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RefreshTracker {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_REFRESH_HOURS))
    }
}
