use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const TEAM_COUNT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conference {
    Afc,
    Nfc,
}

struct Franchise {
    code: &'static str,
    name: &'static str,
    conference: Conference,
}

const FRANCHISES: [Franchise; TEAM_COUNT] = [
    Franchise { code: "ARZ", name: "Arizona Cardinals", conference: Conference::Nfc },
    Franchise { code: "ATL", name: "Atlanta Falcons", conference: Conference::Nfc },
    Franchise { code: "BAL", name: "Baltimore Ravens", conference: Conference::Afc },
    Franchise { code: "BUF", name: "Buffalo Bills", conference: Conference::Afc },
    Franchise { code: "CAR", name: "Carolina Panthers", conference: Conference::Nfc },
    Franchise { code: "CHI", name: "Chicago Bears", conference: Conference::Nfc },
    Franchise { code: "CIN", name: "Cincinnati Bengals", conference: Conference::Afc },
    Franchise { code: "CLE", name: "Cleveland Browns", conference: Conference::Afc },
    Franchise { code: "DAL", name: "Dallas Cowboys", conference: Conference::Nfc },
    Franchise { code: "DEN", name: "Denver Broncos", conference: Conference::Afc },
    Franchise { code: "DET", name: "Detroit Lions", conference: Conference::Nfc },
    Franchise { code: "GB", name: "Green Bay Packers", conference: Conference::Nfc },
    Franchise { code: "HOU", name: "Houston Texans", conference: Conference::Afc },
    Franchise { code: "IND", name: "Indianapolis Colts", conference: Conference::Afc },
    Franchise { code: "JAX", name: "Jacksonville Jaguars", conference: Conference::Afc },
    Franchise { code: "KC", name: "Kansas City Chiefs", conference: Conference::Afc },
    Franchise { code: "LV", name: "Las Vegas Raiders", conference: Conference::Afc },
    Franchise { code: "LAC", name: "Los Angeles Chargers", conference: Conference::Afc },
    Franchise { code: "LAR", name: "Los Angeles Rams", conference: Conference::Nfc },
    Franchise { code: "MIA", name: "Miami Dolphins", conference: Conference::Afc },
    Franchise { code: "MIN", name: "Minnesota Vikings", conference: Conference::Nfc },
    Franchise { code: "NE", name: "New England Patriots", conference: Conference::Afc },
    Franchise { code: "NO", name: "New Orleans Saints", conference: Conference::Nfc },
    Franchise { code: "NYG", name: "New York Giants", conference: Conference::Nfc },
    Franchise { code: "NYJ", name: "New York Jets", conference: Conference::Afc },
    Franchise { code: "PHI", name: "Philadelphia Eagles", conference: Conference::Nfc },
    Franchise { code: "PIT", name: "Pittsburgh Steelers", conference: Conference::Afc },
    Franchise { code: "SF", name: "San Francisco 49ers", conference: Conference::Nfc },
    Franchise { code: "SEA", name: "Seattle Seahawks", conference: Conference::Nfc },
    Franchise { code: "TB", name: "Tampa Bay Buccaneers", conference: Conference::Nfc },
    Franchise { code: "TEN", name: "Tennessee Titans", conference: Conference::Afc },
    Franchise { code: "WAS", name: "Washington Commanders", conference: Conference::Nfc },
];

static ABBREVIATION_CORRECTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("RAM", "LAR"),
        ("KAN", "KC"),
        ("SFO", "SF"),
        ("TAM", "TB"),
        ("CRD", "ARZ"),
        ("NWE", "NE"),
        ("GNB", "GB"),
        ("HTX", "HOU"),
        ("OTI", "TEN"),
        ("RAI", "LV"),
        ("NOR", "NO"),
        ("SDG", "LAC"),
        ("CLT", "IND"),
        ("RAV", "BAL"),
    ])
});

static FRANCHISE_RENAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Washington Redskins", "Washington Commanders"),
        ("Washington Football Team", "Washington Commanders"),
        ("Oakland Raiders", "Las Vegas Raiders"),
        ("Los Angeles Raiders", "Las Vegas Raiders"),
        ("Houston Oilers", "Tennessee Titans"),
        ("Tennessee Oilers", "Tennessee Titans"),
        ("San Diego Chargers", "Los Angeles Chargers"),
        ("St. Louis Rams", "Los Angeles Rams"),
    ])
});

static NAME_BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| FRANCHISES.iter().map(|f| (f.code, f.name)).collect());

static CONFERENCE_BY_NAME: Lazy<HashMap<&'static str, Conference>> =
    Lazy::new(|| FRANCHISES.iter().map(|f| (f.name, f.conference)).collect());

static MONTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("January", 1),
        ("February", 2),
        ("March", 3),
        ("April", 4),
        ("May", 5),
        ("June", 6),
        ("July", 7),
        ("August", 8),
        ("September", 9),
        ("October", 10),
        ("November", 11),
        ("December", 12),
    ])
});

pub fn corrected_abbreviation(raw: &str) -> &str {
    ABBREVIATION_CORRECTIONS.get(raw).copied().unwrap_or(raw)
}

pub fn current_franchise_name(name: &str) -> &str {
    FRANCHISE_RENAMES.get(name).copied().unwrap_or(name)
}

pub fn team_name_for_code(code: &str) -> Option<&'static str> {
    NAME_BY_CODE.get(code).copied()
}

pub fn conference_of(team_name: &str) -> Option<Conference> {
    CONFERENCE_BY_NAME.get(team_name).copied()
}

pub fn month_number(month_name: &str) -> Option<u32> {
    MONTHS.get(month_name).copied()
}

pub fn is_canonical_team_name(name: &str) -> bool {
    CONFERENCE_BY_NAME.contains_key(name)
}

pub fn franchise_codes() -> impl Iterator<Item = (&'static str, &'static str)> {
    FRANCHISES.iter().map(|f| (f.code, f.name))
}
