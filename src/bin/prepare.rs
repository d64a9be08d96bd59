use anyhow::{Context, Result};

use nfl_game_features::{cli, pipeline};

fn main() -> Result<()> {
    cli::init();

    let cfg = cli::config_from_env_and_args().context("unable to resolve pipeline config")?;
    let input = cli::path_arg("--in").unwrap_or_else(|| cfg.scraped_path());
    let out = cli::path_arg("--out").unwrap_or_else(|| cfg.transformed_path());

    let table = pipeline::run_prepare(&cfg, &input, &out)
        .with_context(|| format!("preparing {}", input.display()))?;

    println!("Prepare complete");
    println!("Input: {}", input.display());
    println!("Rows: {}", table.len());
    println!("Rate columns: {}", table.rate_columns.join(", "));
    println!("CSV: {}", out.display());
    Ok(())
}
