use serde::Serialize;

pub const DEFAULT_LEAGUE: &str = "soccer_epl";
const DEFAULT_LEAGUE_TITLE: &str = "Premier League";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct League {
    pub key: &'static str,
    pub title: &'static str,
    pub country: &'static str,
}

const fn league(key: &'static str, title: &'static str, country: &'static str) -> League {
    League {
        key,
        title,
        country,
    }
}

pub static SOCCER_LEAGUES: [League; 14] = [
    league("soccer_epl", "Premier League", "England"),
    league("soccer_spain_la_liga", "La Liga", "Spain"),
    league("soccer_germany_bundesliga", "Bundesliga", "Germany"),
    league("soccer_italy_serie_a", "Serie A", "Italy"),
    league("soccer_france_ligue_one", "Ligue 1", "France"),
    league("soccer_uefa_champs_league", "Champions League", "Europe"),
    league("soccer_uefa_europa_league", "Europa League", "Europe"),
    league("soccer_netherlands_eredivisie", "Eredivisie", "Netherlands"),
    league("soccer_portugal_primeira_liga", "Primeira Liga", "Portugal"),
    league("soccer_brazil_campeonato", "Brasileirão", "Brazil"),
    league("soccer_argentina_primera_division", "Primera División", "Argentina"),
    league("soccer_mexico_ligamx", "Liga MX", "Mexico"),
    league("soccer_usa_mls", "MLS", "USA"),
    league("soccer_poland_ekstraklasa", "Ekstraklasa", "Poland"),
];

pub fn find_league(key: &str) -> Option<&'static League> {
    let key = key.trim();
    SOCCER_LEAGUES
        .iter()
        .find(|l| l.key.eq_ignore_ascii_case(key))
}

pub fn league_title(key: &str) -> &'static str {
    find_league(key).map_or(DEFAULT_LEAGUE_TITLE, |l| l.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_league_falls_back_to_premier_league_title() {
        assert_eq!(league_title("soccer_spain_la_liga"), "La Liga");
        assert_eq!(league_title("basketball_nba"), "Premier League");
    }

    #[test]
    fn league_keys_are_unique() {
        for (i, a) in SOCCER_LEAGUES.iter().enumerate() {
            for b in &SOCCER_LEAGUES[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
