use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::franchises::{
    Conference, TEAM_COUNT, conference_of, current_franchise_name, is_canonical_team_name,
    month_number, team_name_for_code,
};
use crate::game::{GameTable, HomeOrAway};

pub fn fix_opponent_names(mut table: GameTable) -> Result<GameTable> {
    let mut renamed = 0usize;
    for row in &mut table.rows {
        let current = current_franchise_name(&row.game.opp);
        if current != row.game.opp {
            row.game.opp = current.to_string();
            renamed += 1;
        }
    }
    debug!(renamed, "opponent names fixed");

    if let Some(row) = table
        .rows
        .iter()
        .find(|r| !is_canonical_team_name(&r.game.opp))
    {
        return Err(PipelineError::Validation(format!(
            "unknown opponent `{}` ({} {})",
            row.game.opp, row.game.season, row.game.team
        )));
    }

    let distinct = distinct_count(table.rows.iter().map(|r| r.game.opp.as_str()));
    if distinct != TEAM_COUNT {
        return Err(PipelineError::Validation(format!(
            "there should be {TEAM_COUNT} teams in the `opp` column, found {distinct}"
        )));
    }
    Ok(table)
}

pub fn map_team_abbreviations_to_names(mut table: GameTable) -> Result<GameTable> {
    for row in &mut table.rows {
        let name = team_name_for_code(&row.game.team).ok_or_else(|| {
            PipelineError::Validation(format!(
                "no franchise for team code `{}` ({})",
                row.game.team, row.game.season
            ))
        })?;
        row.game.team = name.to_string();
    }

    let distinct = distinct_count(table.rows.iter().map(|r| r.game.team.as_str()));
    if distinct != TEAM_COUNT {
        return Err(PipelineError::Validation(format!(
            "there should be {TEAM_COUNT} teams in the `team` column, found {distinct}"
        )));
    }
    Ok(table)
}

/// Adds `home_or_away`. Neutral-site games (the championship) alternate the
/// designated home conference by season: NFC in odd seasons, AFC in even ones.
pub fn add_home_or_away_column(mut table: GameTable) -> GameTable {
    for row in &mut table.rows {
        let venue = row.game.venue.trim();
        let side = match venue {
            "@" => HomeOrAway::Away,
            "N" => neutral_site_side(row.game.season, conference_of(&row.game.team)),
            _ => HomeOrAway::Home,
        };
        row.home_or_away = Some(side);
    }
    table
}

fn neutral_site_side(season: i32, conference: Option<Conference>) -> HomeOrAway {
    let odd = season.rem_euclid(2) == 1;
    match (odd, conference) {
        (true, Some(Conference::Nfc)) | (false, Some(Conference::Afc)) => HomeOrAway::Home,
        (true, Some(Conference::Afc)) | (false, Some(Conference::Nfc)) => HomeOrAway::Away,
        (_, None) => HomeOrAway::Home,
    }
}

/// January and February games belong to the season that started the previous
/// calendar year.
pub fn add_datetime_column(mut table: GameTable) -> Result<GameTable> {
    for row in &mut table.rows {
        let (month, day) = parse_month_day(&row.game.date)?;
        let year = if month <= 2 {
            row.game.season + 1
        } else {
            row.game.season
        };
        let hour = parse_hour(&row.game.time)?;

        let date_time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| {
                PipelineError::parse("date_time", &format!("{year}-{month}-{day} {hour}:00"))
            })?;

        row.month = Some(month);
        row.day_of_month = Some(day);
        row.year = Some(year);
        row.hour = Some(hour);
        row.date_time = Some(date_time);
    }
    Ok(table)
}

pub fn parse_month_day(raw: &str) -> Result<(u32, u32)> {
    let mut parts = raw.split_whitespace();
    let (Some(month), Some(day), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PipelineError::parse("date", raw));
    };
    let month = month_number(month).ok_or_else(|| PipelineError::parse("date", raw))?;
    let day = day
        .parse::<u32>()
        .ok()
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| PipelineError::parse("date", raw))?;
    Ok((month, day))
}

pub fn parse_hour(raw: &str) -> Result<u32> {
    let bad = || PipelineError::parse("time", raw);
    let trimmed = raw.trim();
    let (clock, pm) = if let Some(clock) = trimmed.strip_suffix("PM") {
        (clock, true)
    } else if let Some(clock) = trimmed.strip_suffix("AM") {
        (clock, false)
    } else {
        return Err(bad());
    };
    let (hour, minute) = clock.split_once(':').ok_or_else(bad)?;
    let hour = hour.parse::<u32>().ok().filter(|h| (1..=12).contains(h)).ok_or_else(bad)?;
    minute
        .parse::<u32>()
        .ok()
        .filter(|m| minute.len() == 2 && *m < 60)
        .ok_or_else(bad)?;
    Ok(match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    })
}

pub fn sort_data_by_team_and_datetime(mut table: GameTable) -> GameTable {
    table
        .rows
        .sort_by(|a, b| (&a.game.team, a.date_time).cmp(&(&b.game.team, b.date_time)));
    table
}

pub fn format_date_time(dt: &NaiveDateTime) -> String {
    dt.format(crate::game::DATE_TIME_FORMAT).to_string()
}

fn distinct_count<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<HashSet<_>>().len()
}
