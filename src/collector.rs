use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::{FetchConfig, PipelineConfig, SITE_ROOT};
use crate::error::{PipelineError, Result};
use crate::franchises::corrected_abbreviation;
use crate::game::ScrapedGame;
use crate::http_cache as fetch;
use crate::html_table::{find_table_by_title, links_within};
use crate::http_client::{Throttle, http_client};
use crate::schedule::{SCHEDULE_TITLE, conform, games_from_table};

static TEAM_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://[^/]+)?/teams/([a-z]{2,3})/(\d{4})\.htm$").expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLink {
    pub url: String,
    pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct CollectSummary {
    pub seasons: usize,
    pub team_pages: usize,
    pub rows_scraped: usize,
    pub rows_kept: usize,
}

pub fn collect(cfg: &PipelineConfig) -> Result<(Vec<ScrapedGame>, CollectSummary)> {
    let client = http_client(&cfg.fetch)?;
    let throttle = Throttle::new(cfg.fetch.politeness_delay);
    let pool = build_fetch_pool(cfg.fetch.parallelism);

    let mut summary = CollectSummary::default();
    let mut all_games = Vec::new();
    let mut url = cfg.seed_url.clone();

    for season in cfg.seasons() {
        info!(season, url = %url, "collecting season");
        let index_html = fetch::fetch_page(client, &throttle, &cfg.fetch, &url)?;
        let teams = parse_team_links(&index_html, &url)?;
        url = previous_season_url(&url, season)?;

        let per_team = with_fetch_pool(&pool, || {
            teams
                .par_iter()
                .map(|team| scrape_team_season(client, &throttle, &cfg.fetch, team, season))
                .collect::<Result<Vec<_>>>()
        })?;

        summary.seasons += 1;
        summary.team_pages += teams.len();
        for games in per_team {
            all_games.extend(games);
        }
        info!(season, teams = teams.len(), rows = all_games.len(), "season done");
    }

    summary.rows_scraped = all_games.len();
    let games = finalize_games(all_games);
    summary.rows_kept = games.len();
    Ok((games, summary))
}

pub fn finalize_games(games: Vec<ScrapedGame>) -> Vec<ScrapedGame> {
    games
        .into_iter()
        .filter(ScrapedGame::has_result)
        .map(|mut game| {
            game.team = corrected_abbreviation(&game.team).to_string();
            game
        })
        .collect()
}

fn scrape_team_season(
    client: &Client,
    throttle: &Throttle,
    fetch_cfg: &FetchConfig,
    team: &TeamLink,
    season: i32,
) -> Result<Vec<ScrapedGame>> {
    debug!(team = %team.code, season, "fetching team page");
    let html = fetch::fetch_page(client, throttle, fetch_cfg, &team.url)?;
    parse_team_schedule(&html, &team.url, season, &team.code)
}

pub fn parse_team_schedule(
    html: &str,
    url: &str,
    season: i32,
    team_code: &str,
) -> Result<Vec<ScrapedGame>> {
    let raw = find_table_by_title(html, SCHEDULE_TITLE)
        .ok_or_else(|| PipelineError::markup(url, "no schedule & game results table"))?;
    let table = conform(raw)?;
    games_from_table(&table, season, team_code)
}

pub fn parse_team_links(html: &str, page_url: &str) -> Result<Vec<TeamLink>> {
    let mut out: Vec<TeamLink> = Vec::new();
    for href in links_within(html, "div.content_grid") {
        let Some(caps) = TEAM_LINK.captures(&href) else {
            continue;
        };
        let code = caps[1].to_uppercase();
        let url = if href.starts_with("http") {
            href.clone()
        } else {
            format!("{SITE_ROOT}{href}")
        };
        if !out.iter().any(|t| t.url == url) {
            out.push(TeamLink { url, code });
        }
    }
    if out.is_empty() {
        return Err(PipelineError::markup(page_url, "no team links in div.content_grid"));
    }
    Ok(out)
}

pub fn previous_season_url(url: &str, season: i32) -> Result<String> {
    let token = format!("/{season}/");
    if !url.contains(&token) {
        return Err(PipelineError::markup(
            url,
            format!("season token {season} not found in url"),
        ));
    }
    Ok(url.replacen(&token, &format!("/{}/", season - 1), 1))
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
