use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DRAW_LABEL: &str = "Draw";
pub const OVER_LABEL: &str = "Over";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    H2h,
    Spreads,
    Totals,
    // Lay markets, outrights and anything else the provider adds later.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
}

impl Outcome {
    /// Decimal odds at or below 1.0 pay nothing back and are treated as absent.
    pub fn usable_price(&self) -> Option<f64> {
        (self.price.is_finite() && self.price > 1.0).then_some(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub key: MarketKind,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

impl Market {
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        let wanted = name.trim();
        self.outcomes
            .iter()
            .find(|o| o.name.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn price_of(&self, name: &str) -> Option<f64> {
        self.outcome(name).and_then(Outcome::usable_price)
    }

    pub fn overround(&self) -> f64 {
        self.outcomes
            .iter()
            .filter_map(Outcome::usable_price)
            .map(implied_probability)
            .sum::<f64>()
            - 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

impl Bookmaker {
    pub fn market(&self, kind: MarketKind) -> Option<&Market> {
        self.markets.iter().find(|m| m.key == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl Match {
    /// The bookmaker the prediction model reads from: always the first one listed.
    pub fn reference_bookmaker(&self) -> Option<&Bookmaker> {
        self.bookmakers.first()
    }

    pub fn reference_market(&self, kind: MarketKind) -> Option<&Market> {
        self.reference_bookmaker().and_then(|b| b.market(kind))
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

pub fn implied_probability(odds: f64) -> f64 {
    1.0 / odds
}

pub fn fair_odds(probability: f64) -> f64 {
    1.0 / probability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2h(outcomes: &[(&str, f64)]) -> Market {
        Market {
            key: MarketKind::H2h,
            last_update: None,
            outcomes: outcomes
                .iter()
                .map(|(name, price)| Outcome {
                    name: name.to_string(),
                    price: *price,
                    point: None,
                })
                .collect(),
        }
    }

    #[test]
    fn overround_reflects_bookmaker_margin() {
        let market = h2h(&[("Arsenal", 2.0), ("Chelsea", 3.6), ("Draw", 3.25)]);
        let margin = market.overround();
        assert!((margin - 0.0854).abs() < 1e-3, "margin {margin}");
    }

    #[test]
    fn outcome_lookup_ignores_case_and_padding() {
        let market = h2h(&[("Arsenal", 2.0), ("draw", 3.25)]);
        assert_eq!(market.price_of(" Arsenal "), Some(2.0));
        assert_eq!(market.price_of(DRAW_LABEL), Some(3.25));
        assert_eq!(market.price_of("Chelsea"), None);
    }

    #[test]
    fn sub_unit_prices_are_unusable() {
        let market = h2h(&[("Arsenal", 1.0), ("Chelsea", 0.0)]);
        assert_eq!(market.price_of("Arsenal"), None);
        assert_eq!(market.price_of("Chelsea"), None);
    }

    #[test]
    fn unknown_market_keys_deserialize_as_other() {
        let market: Market =
            serde_json::from_str(r#"{"key":"h2h_lay","outcomes":[]}"#).expect("valid market");
        assert_eq!(market.key, MarketKind::Other);
    }
}
