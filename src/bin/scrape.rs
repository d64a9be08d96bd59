use anyhow::{Context, Result};

use nfl_game_features::{cli, pipeline};

fn main() -> Result<()> {
    cli::init();

    let cfg = cli::config_from_env_and_args().context("unable to resolve pipeline config")?;
    let out = cli::path_arg("--out").unwrap_or_else(|| cfg.scraped_path());

    let rows = pipeline::run_collect(&cfg, &out)?;

    println!("Scrape complete");
    println!("Seasons: {}..={}", cfg.first_season, cfg.last_season);
    println!("Rows: {rows}");
    println!("CSV: {}", out.display());
    Ok(())
}
