use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field order is the CSV column order: `season` and `team` lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedGame {
    pub season: i32,
    pub team: String,
    #[serde(default)]
    pub week: String,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub ot: String,
    #[serde(default)]
    pub record: String,
    /// Venue marker: `@` away, `N` neutral site, blank at home.
    #[serde(rename = "home_team", alias = "@", default)]
    pub venue: String,
    #[serde(default)]
    pub opp: String,
    pub points_scored: Option<f64>,
    pub points_allowed: Option<f64>,
    #[serde(rename = "1st_downs")]
    pub first_downs: Option<f64>,
    pub totyd: Option<f64>,
    pub passyd: Option<f64>,
    pub rushyd: Option<f64>,
    pub to: Option<f64>,
    #[serde(rename = "1st_downs_allowed")]
    pub first_downs_allowed: Option<f64>,
    pub totyd_allowed: Option<f64>,
    pub passyd_allowed: Option<f64>,
    pub rushyd_allowed: Option<f64>,
    pub to_forced: Option<f64>,
    pub off_exp_pts: Option<f64>,
    pub def_exp_pts: Option<f64>,
    pub sts_exp_pts: Option<f64>,
}

impl ScrapedGame {
    pub fn has_result(&self) -> bool {
        !self.result.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeOrAway {
    Home,
    Away,
}

impl HomeOrAway {
    pub fn as_str(self) -> &'static str {
        match self {
            HomeOrAway::Home => "HOME",
            HomeOrAway::Away => "AWAY",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRow {
    pub game: ScrapedGame,
    pub home_or_away: Option<HomeOrAway>,
    pub month: Option<u32>,
    pub day_of_month: Option<u32>,
    pub year: Option<i32>,
    pub hour: Option<u32>,
    pub date_time: Option<NaiveDateTime>,
    pub win: Option<u8>,
    pub rates: Vec<Option<f64>>,
}

impl From<ScrapedGame> for GameRow {
    fn from(game: ScrapedGame) -> Self {
        GameRow {
            game,
            ..GameRow::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTable {
    pub rows: Vec<GameRow>,
    pub rate_columns: Vec<String>,
}

impl GameTable {
    pub fn from_games(games: Vec<ScrapedGame>) -> Self {
        GameTable {
            rows: games.into_iter().map(GameRow::from).collect(),
            rate_columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rate_index(&self, column: &str) -> Option<usize> {
        self.rate_columns.iter().position(|c| c == column)
    }

    pub fn rate_column(&self, column: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.rate_index(column)?;
        Some(self.rows.iter().map(|row| row.rates[idx]).collect())
    }

    pub fn set_rate_column(&mut self, column: String, values: Vec<Option<f64>>) {
        assert_eq!(
            values.len(),
            self.rows.len(),
            "rate column `{column}` has {} values for {} rows",
            values.len(),
            self.rows.len()
        );
        match self.rate_index(&column) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.rates[idx] = value;
                }
            }
            None => {
                self.rate_columns.push(column);
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.rates.push(value);
                }
            }
        }
    }
}
