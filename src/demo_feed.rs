use chrono::{DateTime, Duration, Utc};

use crate::odds::{Bookmaker, DRAW_LABEL, Market, MarketKind, Match, OVER_LABEL, Outcome};

struct DemoQuote {
    key: &'static str,
    title: &'static str,
    // home, away, draw
    h2h: (f64, f64, f64),
    // home price, home line, away price
    spread: (f64, f64, f64),
    // over price, under price, line
    totals: (f64, f64, f64),
}

struct DemoFixture {
    id: &'static str,
    sport_key: &'static str,
    sport_title: &'static str,
    days_ahead: i64,
    home: &'static str,
    away: &'static str,
    quotes: &'static [DemoQuote],
}

const BETFAIR: &str = "betfair";
const BETFAIR_TITLE: &str = "Betfair";

static FIXTURES: &[DemoFixture] = &[
    DemoFixture {
        id: "1",
        sport_key: "soccer_epl",
        sport_title: "Premier League",
        days_ahead: 1,
        home: "Arsenal",
        away: "Chelsea",
        quotes: &[
            DemoQuote {
                key: BETFAIR,
                title: BETFAIR_TITLE,
                h2h: (2.1, 3.5, 3.2),
                spread: (1.9, -0.5, 1.9),
                totals: (1.85, 1.95, 2.5),
            },
            DemoQuote {
                key: "williamhill",
                title: "William Hill",
                h2h: (2.0, 3.6, 3.25),
                spread: (1.85, -0.5, 1.95),
                totals: (1.9, 1.9, 2.5),
            },
        ],
    },
    DemoFixture {
        id: "2",
        sport_key: "soccer_epl",
        sport_title: "Premier League",
        days_ahead: 2,
        home: "Manchester City",
        away: "Liverpool",
        quotes: &[DemoQuote {
            key: BETFAIR,
            title: BETFAIR_TITLE,
            h2h: (1.8, 4.0, 3.5),
            spread: (1.9, -1.0, 1.9),
            totals: (1.75, 2.05, 2.5),
        }],
    },
    DemoFixture {
        id: "3",
        sport_key: "soccer_epl",
        sport_title: "Premier League",
        days_ahead: 3,
        home: "Tottenham",
        away: "Manchester United",
        quotes: &[DemoQuote {
            key: BETFAIR,
            title: BETFAIR_TITLE,
            h2h: (2.4, 2.9, 3.3),
            spread: (1.9, -0.25, 1.9),
            totals: (1.8, 2.0, 2.5),
        }],
    },
    DemoFixture {
        id: "4",
        sport_key: "soccer_spain_la_liga",
        sport_title: "La Liga",
        days_ahead: 1,
        home: "Barcelona",
        away: "Real Madrid",
        quotes: &[DemoQuote {
            key: BETFAIR,
            title: BETFAIR_TITLE,
            h2h: (2.2, 3.1, 3.4),
            spread: (1.9, -0.5, 1.9),
            totals: (1.8, 2.0, 2.5),
        }],
    },
    DemoFixture {
        id: "5",
        sport_key: "soccer_germany_bundesliga",
        sport_title: "Bundesliga",
        days_ahead: 2,
        home: "Bayern Munich",
        away: "Borussia Dortmund",
        quotes: &[DemoQuote {
            key: BETFAIR,
            title: BETFAIR_TITLE,
            h2h: (1.7, 4.5, 3.8),
            spread: (1.9, -1.0, 1.9),
            totals: (1.7, 2.1, 3.5),
        }],
    },
    DemoFixture {
        id: "6",
        sport_key: "soccer_italy_serie_a",
        sport_title: "Serie A",
        days_ahead: 3,
        home: "Juventus",
        away: "AC Milan",
        quotes: &[DemoQuote {
            key: BETFAIR,
            title: BETFAIR_TITLE,
            h2h: (2.3, 3.0, 3.2),
            spread: (1.9, -0.5, 1.9),
            totals: (1.85, 1.95, 2.5),
        }],
    },
    DemoFixture {
        id: "7",
        sport_key: "soccer_france_ligue_one",
        sport_title: "Ligue 1",
        days_ahead: 1,
        home: "PSG",
        away: "Marseille",
        quotes: &[DemoQuote {
            key: BETFAIR,
            title: BETFAIR_TITLE,
            h2h: (1.6, 5.0, 4.0),
            spread: (1.9, -1.5, 1.9),
            totals: (1.75, 2.05, 2.5),
        }],
    },
];

/// Fixed sample fixtures used when no API key is configured or the provider is unreachable.
pub fn demo_matches(now: DateTime<Utc>) -> Vec<Match> {
    FIXTURES.iter().map(|f| build_match(f, now)).collect()
}

pub fn demo_matches_for(sport_key: &str, now: DateTime<Utc>) -> Vec<Match> {
    FIXTURES
        .iter()
        .filter(|f| f.sport_key.eq_ignore_ascii_case(sport_key.trim()))
        .map(|f| build_match(f, now))
        .collect()
}

fn build_match(fixture: &DemoFixture, now: DateTime<Utc>) -> Match {
    Match {
        id: fixture.id.to_string(),
        sport_key: fixture.sport_key.to_string(),
        sport_title: fixture.sport_title.to_string(),
        commence_time: now + Duration::days(fixture.days_ahead),
        home_team: fixture.home.to_string(),
        away_team: fixture.away.to_string(),
        bookmakers: fixture
            .quotes
            .iter()
            .map(|q| build_bookmaker(q, fixture, now))
            .collect(),
    }
}

fn build_bookmaker(quote: &DemoQuote, fixture: &DemoFixture, now: DateTime<Utc>) -> Bookmaker {
    let (home, away, draw) = quote.h2h;
    let (home_spread, line, away_spread) = quote.spread;
    let (over, under, total) = quote.totals;

    let market = |key: MarketKind, outcomes: Vec<Outcome>| Market {
        key,
        last_update: Some(now),
        outcomes,
    };

    Bookmaker {
        key: quote.key.to_string(),
        title: quote.title.to_string(),
        last_update: Some(now),
        markets: vec![
            market(
                MarketKind::H2h,
                vec![
                    outcome(fixture.home, home, None),
                    outcome(fixture.away, away, None),
                    outcome(DRAW_LABEL, draw, None),
                ],
            ),
            market(
                MarketKind::Spreads,
                vec![
                    outcome(fixture.home, home_spread, Some(line)),
                    outcome(fixture.away, away_spread, Some(-line)),
                ],
            ),
            market(
                MarketKind::Totals,
                vec![
                    outcome(OVER_LABEL, over, Some(total)),
                    outcome("Under", under, Some(total)),
                ],
            ),
        ],
    }
}

fn outcome(name: &str, price: f64, point: Option<f64>) -> Outcome {
    Outcome {
        name: name.to_string(),
        price,
        point,
    }
}
