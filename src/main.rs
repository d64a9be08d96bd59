use anyhow::{Context, Result};

use nfl_game_features::{cli, pipeline};

fn main() -> Result<()> {
    cli::init();

    let cfg = cli::config_from_env_and_args().context("unable to resolve pipeline config")?;
    let scraped = cli::path_arg("--scraped").unwrap_or_else(|| cfg.scraped_path());
    let out = cli::path_arg("--out").unwrap_or_else(|| cfg.transformed_path());

    let rows = pipeline::run_collect(&cfg, &scraped)
        .with_context(|| format!("collecting seasons {}..={}", cfg.first_season, cfg.last_season))?;
    let table = pipeline::run_prepare(&cfg, &scraped, &out)
        .with_context(|| format!("preparing {}", scraped.display()))?;

    println!("NFL game features complete");
    println!("Scraped: {} ({rows} rows)", scraped.display());
    println!(
        "Transformed: {} ({} rows, {} rate columns)",
        out.display(),
        table.len(),
        table.rate_columns.len()
    );
    Ok(())
}
