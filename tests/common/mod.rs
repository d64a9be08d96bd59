#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use nfl_game_features::franchises::franchise_codes;
use nfl_game_features::game::ScrapedGame;

pub const DATES: [&str; 5] = [
    "September 8",
    "September 15",
    "September 22",
    "September 29",
    "January 5",
];

pub fn game(team: &str, season: i32, date: &str, result: &str) -> ScrapedGame {
    ScrapedGame {
        season,
        team: team.to_string(),
        date: date.to_string(),
        time: "1:00PM".to_string(),
        result: result.to_string(),
        ..ScrapedGame::default()
    }
}

/// Five games for every franchise; each team meets the next five teams in the table.
pub fn league_season(season: i32) -> Vec<ScrapedGame> {
    let teams = franchise_codes().collect::<Vec<_>>();
    let mut games = Vec::new();
    for (i, (code, _)) in teams.iter().enumerate() {
        for (w, date) in DATES.iter().enumerate() {
            let week = w + 1;
            let (_, opp) = teams[(i + week) % teams.len()];
            let won = (i + week) % 2 == 0;
            let mut g = game(code, season, date, if won { "W" } else { "L" });
            g.week = week.to_string();
            g.day = "Sun".to_string();
            g.venue = if week % 2 == 1 { "@" } else { "" }.to_string();
            g.opp = opp.to_string();
            g.ot = if week == 3 { "OT" } else { "" }.to_string();
            g.points_scored = Some(20.0 + week as f64);
            g.points_allowed = Some(17.0);
            g.first_downs = Some(18.0 + week as f64);
            g.first_downs_allowed = Some(19.0);
            g.totyd = Some(350.0);
            g.passyd = Some(200.0 + 10.0 * week as f64);
            g.rushyd = Some(150.0 - 10.0 * week as f64);
            g.to = if week == 2 { None } else { Some(1.0) };
            g.totyd_allowed = Some(330.0);
            g.passyd_allowed = Some(220.0);
            g.rushyd_allowed = Some(110.0);
            g.to_forced = Some(week as f64 % 2.0);
            games.push(g);
        }
    }
    games
}

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn scratch_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!(
        "nfl_game_features_{label}_{}_{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}
