use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::config::{PipelineConfig, parse_season_range};
use crate::error::Result;

pub fn init() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn config_from_env_and_args() -> Result<PipelineConfig> {
    let mut cfg = PipelineConfig::from_env()?;
    if let Some(raw) = arg_value("--seasons") {
        let (first, last) = parse_season_range(&raw)?;
        cfg.first_season = first;
        cfg.last_season = last;
        if std::env::var("NFL_SEED_URL").is_err() {
            cfg.seed_url = crate::config::season_index_url(first);
        }
        cfg.validate()?;
    }
    Ok(cfg)
}

pub fn path_arg(flag: &str) -> Option<PathBuf> {
    arg_value(flag).map(PathBuf::from)
}

pub fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    find_arg(&args, flag)
}

fn find_arg(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
