use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use rand::Rng;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::{PipelineError, Result};

const USER_AGENT: &str = "nfl_game_features/0.1 (+historical schedule research)";
const BACKOFF_BASE_MS: u64 = 500;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The first caller's timeout wins.
pub fn http_client(cfg: &FetchConfig) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(cfg.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PipelineError::from)
    })
}

#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(None),
        }
    }

    pub fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        let sleep_for = {
            let mut guard = match self.next_slot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = Instant::now();
            let slot = guard.map_or(now, |next| next.max(now));
            *guard = Some(slot + self.delay);
            slot.saturating_duration_since(now)
        };
        if !sleep_for.is_zero() {
            thread::sleep(sleep_for);
        }
    }
}

/// Sends the request built by `build`, retrying transport errors, 429 and 5xx with
/// exponential backoff. Any other non-success status fails at once.
pub fn send_with_retry(
    url: &str,
    throttle: &Throttle,
    max_attempts: u32,
    build: impl Fn() -> RequestBuilder,
) -> Result<Response> {
    let attempts = max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 0..attempts {
        throttle.wait();
        debug!(url, attempt = attempt + 1, "GET");
        match build().send() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() || status == StatusCode::NOT_MODIFIED {
                    return Ok(resp);
                }
                if !is_retryable(status) {
                    return Err(PipelineError::fetch(url, format!("http {status}")));
                }
                last_error = format!("http {status}");
            }
            Err(err) => {
                last_error = err.to_string();
            }
        }

        if attempt + 1 < attempts {
            let delay = backoff_delay(attempt);
            warn!(
                url,
                attempt = attempt + 1,
                error = %last_error,
                "request failed, retrying in {}ms",
                delay.as_millis()
            );
            thread::sleep(delay);
        }
    }

    Err(PipelineError::fetch(
        url,
        format!("gave up after {attempts} attempts: {last_error}"),
    ))
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = BACKOFF_BASE_MS.saturating_mul(1u64 << attempt.min(10));
    let jitter = rand::thread_rng().gen_range(0..=base / 4);
    Duration::from_millis(base + jitter)
}
