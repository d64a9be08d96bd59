use std::path::Path;

use tracing::info;

use crate::cleaning::{
    add_datetime_column, add_home_or_away_column, fix_opponent_names,
    map_team_abbreviations_to_names, sort_data_by_team_and_datetime,
};
use crate::collector;
use crate::config::PipelineConfig;
use crate::dataset::{export_transformed_csv, load_scraped_csv, write_scraped_csv};
use crate::error::Result;
use crate::game::GameTable;
use crate::rolling::{Metric, RollingOptions, add_rates_last_n_games};

pub fn prepare(table: GameTable, options: RollingOptions, n_games: &[usize]) -> Result<GameTable> {
    let table = fix_opponent_names(table)?;
    let table = map_team_abbreviations_to_names(table)?;
    let table = add_home_or_away_column(table);
    let table = add_datetime_column(table)?;
    let mut table = sort_data_by_team_and_datetime(table);
    for metric in Metric::ALL {
        table = add_rates_last_n_games(table, metric, n_games, options);
    }
    Ok(table)
}

pub fn run_collect(cfg: &PipelineConfig, out: &Path) -> Result<usize> {
    let (games, summary) = collector::collect(cfg)?;
    info!(
        seasons = summary.seasons,
        team_pages = summary.team_pages,
        scraped = summary.rows_scraped,
        kept = summary.rows_kept,
        "collection finished"
    );
    write_scraped_csv(out, &games)?;
    info!(path = %out.display(), rows = games.len(), "wrote scraped data");
    Ok(games.len())
}

pub fn run_prepare(cfg: &PipelineConfig, input: &Path, out: &Path) -> Result<GameTable> {
    let games = load_scraped_csv(input)?;
    info!(path = %input.display(), rows = games.len(), "loaded scraped data");
    let table = prepare(GameTable::from_games(games), cfg.rolling, &cfg.n_games)?;
    export_transformed_csv(out, &table)?;
    info!(
        path = %out.display(),
        rows = table.len(),
        rate_columns = table.rate_columns.len(),
        "wrote transformed data"
    );
    Ok(table)
}
