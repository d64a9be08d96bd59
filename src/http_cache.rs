use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CacheMode, FetchConfig};
use crate::error::{PipelineError, Result};
use crate::http_client::{Throttle, send_with_retry};

const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    version: u32,
    url: String,
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

pub fn fetch_page(
    client: &Client,
    throttle: &Throttle,
    cfg: &FetchConfig,
    url: &str,
) -> Result<String> {
    let path = cfg.cache_dir.as_deref().map(|dir| cache_path(dir, url));
    let cached = path.as_deref().and_then(load_entry);

    match (cfg.cache_mode, cached.as_ref()) {
        (CacheMode::Prefer, Some(entry)) | (CacheMode::Offline, Some(entry)) => {
            debug!(url, "cache hit");
            return Ok(entry.body.clone());
        }
        (CacheMode::Offline, None) => {
            return Err(PipelineError::fetch(url, "offline and not cached"));
        }
        _ => {}
    }

    let resp = send_with_retry(url, throttle, cfg.max_attempts, || {
        let mut req = client.get(url);
        if cfg.cache_mode == CacheMode::Revalidate
            && let Some(entry) = cached.as_ref()
        {
            if let Some(etag) = entry.etag.as_ref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_ref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }
        req
    })?;

    if resp.status() == StatusCode::NOT_MODIFIED {
        return match cached {
            Some(entry) => {
                debug!(url, "not modified");
                Ok(entry.body)
            }
            None => Err(PipelineError::fetch(url, "received 304 without cache body")),
        };
    }

    let headers = resp.headers().clone();
    let body = resp
        .text()
        .map_err(|err| PipelineError::fetch(url, format!("failed reading body: {err}")))?;

    if let Some(path) = path {
        let entry = CacheEntry {
            version: CACHE_VERSION,
            url: url.to_string(),
            body: body.clone(),
            etag: header_string(&headers, ETAG),
            last_modified: header_string(&headers, LAST_MODIFIED),
            fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
        };
        save_entry(&path, &entry)?;
    }
    Ok(body)
}

fn header_string(
    headers: &reqwest::header::HeaderMap,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn load_entry(path: &Path) -> Option<CacheEntry> {
    let raw = fs::read_to_string(path).ok()?;
    let entry = serde_json::from_str::<CacheEntry>(&raw).ok()?;
    (entry.version == CACHE_VERSION).then_some(entry)
}

fn save_entry(path: &Path, entry: &CacheEntry) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(entry)
        .map_err(|err| PipelineError::fetch(&entry.url, format!("serialize cache entry: {err}")))?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn cache_path(dir: &Path, url: &str) -> PathBuf {
    let stem: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    dir.join(format!("{stem}.json"))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
