use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PipelineError, Result};
use crate::rolling::{Grouping, RollingOptions, WindowPolicy};

pub const SITE_ROOT: &str = "https://www.pro-football-reference.com";
pub const DEFAULT_FIRST_SEASON: i32 = 2022;
pub const DEFAULT_LAST_SEASON: i32 = 1994;
pub const DEFAULT_N_GAMES: &[usize] = &[1, 3, 5];

pub const SCRAPED_FILE: &str = "scraped_data.csv";
pub const TRANSFORMED_FILE: &str = "transformed.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Prefer,
    Revalidate,
    Offline,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub politeness_delay: Duration,
    pub parallelism: usize,
    pub max_attempts: u32,
    pub cache_dir: Option<PathBuf>,
    pub cache_mode: CacheMode,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            politeness_delay: Duration::from_millis(3100),
            parallelism: 2,
            max_attempts: 3,
            cache_dir: None,
            cache_mode: CacheMode::Prefer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub first_season: i32,
    pub last_season: i32,
    pub seed_url: String,
    pub data_dir: PathBuf,
    pub fetch: FetchConfig,
    pub rolling: RollingOptions,
    pub n_games: Vec<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            first_season: DEFAULT_FIRST_SEASON,
            last_season: DEFAULT_LAST_SEASON,
            seed_url: season_index_url(DEFAULT_FIRST_SEASON),
            data_dir: PathBuf::from("Data"),
            fetch: FetchConfig::default(),
            rolling: RollingOptions::default(),
            n_games: DEFAULT_N_GAMES.to_vec(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(first) = env_parse::<i32>("NFL_FIRST_SEASON")? {
            cfg.first_season = first;
            cfg.seed_url = season_index_url(first);
        }
        if let Some(last) = env_parse::<i32>("NFL_LAST_SEASON")? {
            cfg.last_season = last;
        }
        if let Some(url) = env_string("NFL_SEED_URL") {
            cfg.seed_url = url;
        }
        if let Some(dir) = env_string("NFL_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }

        if let Some(secs) = env_parse::<u64>("REQUEST_TIMEOUT_SECS")? {
            cfg.fetch.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = env_parse::<u64>("POLITENESS_DELAY_MS")? {
            cfg.fetch.politeness_delay = Duration::from_millis(ms);
        }
        if let Some(threads) = env_parse::<usize>("FETCH_PARALLELISM")? {
            cfg.fetch.parallelism = threads.clamp(1, 8);
        }
        if let Some(attempts) = env_parse::<u32>("FETCH_MAX_ATTEMPTS")? {
            cfg.fetch.max_attempts = attempts.clamp(1, 10);
        }
        cfg.fetch.cache_dir = env_string("HTTP_CACHE_DIR").map(PathBuf::from);
        if let Some(mode) = env_string("HTTP_CACHE_MODE") {
            cfg.fetch.cache_mode = parse_cache_mode(&mode)?;
        }

        if let Some(raw) = env_string("ROLLING_N_GAMES") {
            cfg.n_games = parse_n_games(&raw)?;
        }
        if let Some(raw) = env_string("ROLLING_WINDOW") {
            cfg.rolling.window = parse_window_policy(&raw)?;
        }
        if let Some(raw) = env_string("ROLLING_GROUPING") {
            cfg.rolling.grouping = parse_grouping(&raw)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.last_season > self.first_season {
            return Err(PipelineError::Config(format!(
                "last season {} is after first season {}",
                self.last_season, self.first_season
            )));
        }
        if self.n_games.is_empty() {
            return Err(PipelineError::Config("no rolling window sizes".to_string()));
        }
        Ok(())
    }

    pub fn seasons(&self) -> Vec<i32> {
        (self.last_season..=self.first_season).rev().collect()
    }

    pub fn scraped_path(&self) -> PathBuf {
        self.data_dir.join(SCRAPED_FILE)
    }

    pub fn transformed_path(&self) -> PathBuf {
        self.data_dir.join(TRANSFORMED_FILE)
    }
}

pub fn season_index_url(season: i32) -> String {
    format!("{SITE_ROOT}/years/{season}/")
}

pub fn parse_season_range(raw: &str) -> Result<(i32, i32)> {
    let bad = || PipelineError::Config(format!("bad season range `{raw}`"));
    let (a, b) = raw.split_once("..").ok_or_else(bad)?;
    let b = b.strip_prefix('=').unwrap_or(b);
    let a = a.trim().parse::<i32>().map_err(|_| bad())?;
    let b = b.trim().parse::<i32>().map_err(|_| bad())?;
    Ok((a.max(b), a.min(b)))
}

pub fn parse_n_games(raw: &str) -> Result<Vec<usize>> {
    let mut out = Vec::new();
    for part in raw.split([',', ';', ' ']).filter(|p| !p.trim().is_empty()) {
        let n = part
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| PipelineError::Config(format!("bad window size `{part}`")))?;
        if !out.contains(&n) {
            out.push(n);
        }
    }
    Ok(out)
}

fn parse_cache_mode(raw: &str) -> Result<CacheMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "prefer" => Ok(CacheMode::Prefer),
        "revalidate" => Ok(CacheMode::Revalidate),
        "offline" => Ok(CacheMode::Offline),
        other => Err(PipelineError::Config(format!("unknown cache mode `{other}`"))),
    }
}

fn parse_window_policy(raw: &str) -> Result<WindowPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "full" => Ok(WindowPolicy::Full),
        "partial" => Ok(WindowPolicy::Partial),
        other => Err(PipelineError::Config(format!("unknown window policy `{other}`"))),
    }
}

fn parse_grouping(raw: &str) -> Result<Grouping> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "team_season" => Ok(Grouping::TeamSeason),
        "team" => Ok(Grouping::Team),
        other => Err(PipelineError::Config(format!("unknown grouping `{other}`"))),
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env_string(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| PipelineError::Config(format!("{key}={raw} is not valid"))),
    }
}
