use crate::error::{PipelineError, Result};
use crate::game::ScrapedGame;
use crate::html_table::RawTable;

pub const SCHEDULE_TITLE: &str = "Schedule & Game Results";

pub const BOXSCORE_POSITION: usize = 4;

/// Expected raw label (lower-cased) at each position once the boxscore column is gone,
/// and the name the column is published under.
pub const SCHEDULE_COLUMNS: [(&str, &str); 24] = [
    ("week", "week"),
    ("day", "day"),
    ("date", "date"),
    ("", "time"),
    ("", "result"),
    ("ot", "ot"),
    ("rec", "record"),
    ("", "home_team"),
    ("opp", "opp"),
    ("tm", "points_scored"),
    ("opp", "points_allowed"),
    ("1std", "1st_downs"),
    ("totyd", "totyd"),
    ("passy", "passyd"),
    ("rushy", "rushyd"),
    ("to", "to"),
    ("1std", "1st_downs_allowed"),
    ("totyd", "totyd_allowed"),
    ("passy", "passyd_allowed"),
    ("rushy", "rushyd_allowed"),
    ("to", "to_forced"),
    ("offense", "off_exp_pts"),
    ("defense", "def_exp_pts"),
    ("sp. tms", "sts_exp_pts"),
];

pub fn conform(mut table: RawTable) -> Result<RawTable> {
    table.lowercase_columns();
    let expected_raw = SCHEDULE_COLUMNS.len() + 1;
    if table.columns.len() != expected_raw {
        return Err(PipelineError::Schema {
            position: table.columns.len(),
            expected: format!("{expected_raw} columns"),
            found: format!("{} columns", table.columns.len()),
        });
    }

    table.columns.remove(BOXSCORE_POSITION);
    for row in &mut table.rows {
        if row.len() > BOXSCORE_POSITION {
            row.remove(BOXSCORE_POSITION);
        }
    }

    for (position, (found, (expected, _))) in
        table.columns.iter().zip(SCHEDULE_COLUMNS.iter()).enumerate()
    {
        if found.trim() != *expected {
            return Err(PipelineError::Schema {
                position,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }

    table.columns = SCHEDULE_COLUMNS
        .iter()
        .map(|(_, name)| name.to_string())
        .collect();
    Ok(table)
}

pub fn games_from_table(table: &RawTable, season: i32, team: &str) -> Result<Vec<ScrapedGame>> {
    table
        .rows
        .iter()
        .map(|row| -> Result<ScrapedGame> {
            let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");
            let num = |idx: usize| parse_number(cell(idx), SCHEDULE_COLUMNS[idx].1);
            Ok(ScrapedGame {
                season,
                team: team.to_string(),
                week: cell(0).to_string(),
                day: cell(1).to_string(),
                date: cell(2).to_string(),
                time: compact_time(cell(3)),
                result: cell(4).to_string(),
                ot: cell(5).to_string(),
                record: cell(6).to_string(),
                venue: cell(7).to_string(),
                opp: cell(8).to_string(),
                points_scored: num(9)?,
                points_allowed: num(10)?,
                first_downs: num(11)?,
                totyd: num(12)?,
                passyd: num(13)?,
                rushyd: num(14)?,
                to: num(15)?,
                first_downs_allowed: num(16)?,
                totyd_allowed: num(17)?,
                passyd_allowed: num(18)?,
                rushyd_allowed: num(19)?,
                to_forced: num(20)?,
                off_exp_pts: num(21)?,
                def_exp_pts: num(22)?,
                sts_exp_pts: num(23)?,
            })
        })
        .collect()
}

fn parse_number(raw: &str, field: &'static str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.replace(',', "")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| PipelineError::parse(field, raw))
}

fn compact_time(raw: &str) -> String {
    raw.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}
