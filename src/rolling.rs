use std::collections::HashMap;

use crate::cleaning::sort_data_by_team_and_datetime;
use crate::game::{GameRow, GameTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// All `n` prior games must be present (`min_periods = n`).
    #[default]
    Full,
    /// Any non-empty prefix of the window is averaged.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    #[default]
    TeamSeason,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollingOptions {
    pub window: WindowPolicy,
    pub grouping: Grouping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Win,
    Passing,
    Rushing,
    PassingAllowed,
    RushingAllowed,
    Overtime,
    Turnovers,
    TurnoversForced,
    PointsScored,
    PointsAllowed,
    FirstDowns,
    FirstDownsAllowed,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Win,
        Metric::Passing,
        Metric::Rushing,
        Metric::PassingAllowed,
        Metric::RushingAllowed,
        Metric::Overtime,
        Metric::Turnovers,
        Metric::TurnoversForced,
        Metric::PointsScored,
        Metric::PointsAllowed,
        Metric::FirstDowns,
        Metric::FirstDownsAllowed,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Metric::Win => "win",
            Metric::Passing => "pass",
            Metric::Rushing => "rush",
            Metric::PassingAllowed => "pass_allowed",
            Metric::RushingAllowed => "rush_allowed",
            Metric::Overtime => "ot",
            Metric::Turnovers => "to",
            Metric::TurnoversForced => "to_forced",
            Metric::PointsScored => "points_scored",
            Metric::PointsAllowed => "points_allowed",
            Metric::FirstDowns => "1st_downs",
            Metric::FirstDownsAllowed => "1st_downs_allowed",
        }
    }

    pub fn column_name(self, n: usize) -> String {
        format!("{}_rate_last_{n}_games", self.prefix())
    }

    fn value(self, row: &GameRow) -> Option<f64> {
        let g = &row.game;
        match self {
            Metric::Win => Some(if g.result.trim() == "W" { 1.0 } else { 0.0 }),
            Metric::Passing => g.passyd,
            Metric::Rushing => g.rushyd,
            Metric::PassingAllowed => g.passyd_allowed,
            Metric::RushingAllowed => g.rushyd_allowed,
            Metric::Overtime => Some(if g.ot.trim() == "OT" { 1.0 } else { 0.0 }),
            Metric::Turnovers => Some(g.to.unwrap_or(0.0)),
            Metric::TurnoversForced => Some(g.to_forced.unwrap_or(0.0)),
            Metric::PointsScored => g.points_scored,
            Metric::PointsAllowed => g.points_allowed,
            Metric::FirstDowns => g.first_downs,
            Metric::FirstDownsAllowed => g.first_downs_allowed,
        }
    }
}

pub fn add_rates_last_n_games(
    table: GameTable,
    metric: Metric,
    n_games: &[usize],
    options: RollingOptions,
) -> GameTable {
    let mut table = sort_data_by_team_and_datetime(table);
    if metric == Metric::Win {
        for row in &mut table.rows {
            row.win = Some(u8::from(row.game.result.trim() == "W"));
        }
    }

    let values: Vec<Option<f64>> = table.rows.iter().map(|row| metric.value(row)).collect();
    let groups = group_positions(&table, options.grouping);

    for &n in n_games {
        let mut column = vec![None; table.rows.len()];
        for positions in &groups {
            let series: Vec<Option<f64>> = positions.iter().map(|&i| values[i]).collect();
            for (k, rate) in shifted_rolling_mean(&series, n, options.window)
                .into_iter()
                .enumerate()
            {
                column[positions[k]] = rate;
            }
        }
        table.set_rate_column(metric.column_name(n), column);
    }
    table
}

fn group_positions(table: &GameTable, grouping: Grouping) -> Vec<Vec<usize>> {
    let mut index: HashMap<(&str, Option<i32>), usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (pos, row) in table.rows.iter().enumerate() {
        let season = match grouping {
            Grouping::TeamSeason => Some(row.game.season),
            Grouping::Team => None,
        };
        let slot = *index.entry((row.game.team.as_str(), season)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(pos);
    }
    groups
}

/// Mean of the `n` values before each position. Missing values do not count
/// towards a full window.
pub fn shifted_rolling_mean(
    series: &[Option<f64>],
    n: usize,
    policy: WindowPolicy,
) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|k| {
            if n == 0 || k == 0 {
                return None;
            }
            let window = &series[k.saturating_sub(n)..k];
            let present: Vec<f64> = window.iter().flatten().copied().collect();
            let enough = match policy {
                WindowPolicy::Full => window.len() == n && present.len() == n,
                WindowPolicy::Partial => !present.is_empty(),
            };
            enough.then(|| present.iter().sum::<f64>() / present.len() as f64)
        })
        .collect()
}

macro_rules! rate_adders {
    ($($(#[$doc:meta])* $name:ident => $metric:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(table: GameTable, n_games: &[usize], options: RollingOptions) -> GameTable {
                add_rates_last_n_games(table, $metric, n_games, options)
            }
        )*
    };
}

rate_adders! {
    add_win_rates_last_n_games => Metric::Win;
    add_passing_rates_last_n_games => Metric::Passing;
    add_rushing_rates_last_n_games => Metric::Rushing;
    add_passing_allowed_rates_last_n_games => Metric::PassingAllowed;
    add_rushing_allowed_rates_last_n_games => Metric::RushingAllowed;
    add_ot_rates_last_n_games => Metric::Overtime;
    add_to_rates_last_n_games => Metric::Turnovers;
    add_to_forced_rates_last_n_games => Metric::TurnoversForced;
    add_points_scored_rates_last_n_games => Metric::PointsScored;
    add_points_allowed_rates_last_n_games => Metric::PointsAllowed;
    add_1st_down_rates_last_n_games => Metric::FirstDowns;
    add_1st_down_allowed_rates_last_n_games => Metric::FirstDownsAllowed;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn full_window_needs_n_prior_values() {
        let series = [Some(1.0), Some(0.0), Some(1.0), Some(1.0), Some(0.0), Some(1.0)];
        let out = shifted_rolling_mean(&series, 3, WindowPolicy::Full);
        assert_eq!(&out[..3], &[None, None, None]);
        assert!(approx(out[3], 2.0 / 3.0));
        assert!(approx(out[4], 2.0 / 3.0));
        assert!(approx(out[5], 2.0 / 3.0));
    }

    #[test]
    fn partial_window_starts_at_second_game() {
        let series = [Some(2.0), Some(4.0), Some(6.0)];
        let out = shifted_rolling_mean(&series, 5, WindowPolicy::Partial);
        assert_eq!(out[0], None);
        assert!(approx(out[1], 2.0));
        assert!(approx(out[2], 3.0));
    }

    #[test]
    fn gaps_break_full_windows_only() {
        let series = [Some(2.0), None, Some(6.0), Some(8.0)];
        let full = shifted_rolling_mean(&series, 2, WindowPolicy::Full);
        assert_eq!(full[2], None);
        assert_eq!(full[3], None);
        let partial = shifted_rolling_mean(&series, 2, WindowPolicy::Partial);
        assert!(approx(partial[2], 2.0));
        assert!(approx(partial[3], 6.0));
    }

    #[test]
    fn column_names_follow_prefixes() {
        assert_eq!(Metric::Win.column_name(3), "win_rate_last_3_games");
        assert_eq!(
            Metric::FirstDownsAllowed.column_name(5),
            "1st_downs_allowed_rate_last_5_games"
        );
        assert_eq!(Metric::Passing.column_name(1), "pass_rate_last_1_games");
    }
}
