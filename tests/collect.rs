mod common;

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use nfl_game_features::PipelineError;
use nfl_game_features::collector::collect;
use nfl_game_features::config::{CacheMode, FetchConfig, PipelineConfig};
use nfl_game_features::http_cache::fetch_page;
use nfl_game_features::http_client::{Throttle, http_client, send_with_retry};

use common::{read_fixture, scratch_dir};

struct Reply {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl Reply {
    fn ok(body: impl Into<String>) -> Self {
        Reply {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    fn status(status: u16) -> Self {
        Reply {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

struct LocalSite {
    base: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl LocalSite {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

/// Serves one connection at a time; every response closes its connection.
fn serve<F>(handler: F) -> LocalSite
where
    F: Fn(&str, &str, &str) -> Reply + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let site = LocalSite {
        base: base.clone(),
        hits: hits.clone(),
        requests: requests.clone(),
    };
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else {
                continue;
            };
            let request = read_request(&mut stream);
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
            hits.fetch_add(1, Ordering::SeqCst);
            requests.lock().expect("request log").push(request.clone());
            let reply = handler(&base, &path, &request);
            write_reply(&mut stream, &reply);
        }
    });
    site
}

fn read_request(stream: &mut TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => raw.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

fn write_reply(stream: &mut TcpStream, reply: &Reply) {
    let reason = match reply.status {
        200 => "OK",
        304 => "Not Modified",
        404 => "Not Found",
        429 => "Too Many Requests",
        503 => "Service Unavailable",
        _ => "Unknown",
    };
    let mut head = format!(
        "HTTP/1.1 {} {reason}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(reply.body.as_bytes());
    let _ = stream.flush();
}

fn index_page(base: &str, season: &str) -> String {
    format!(
        r#"<html><body><div class="content_grid">
        <a href="{base}/teams/kan/{season}.htm">Kansas City Chiefs</a>
        <a href="{base}/teams/buf/{season}.htm">Buffalo Bills</a>
        </div></body></html>"#
    )
}

fn quick_fetch() -> FetchConfig {
    FetchConfig {
        politeness_delay: Duration::ZERO,
        parallelism: 2,
        max_attempts: 3,
        ..FetchConfig::default()
    }
}

#[test]
fn collects_seasons_newest_first_and_retries_a_server_error() {
    let schedule = read_fixture("team_schedule.html");
    let failed_once = AtomicBool::new(false);
    let site = serve(move |base, path, _| {
        if path == "/teams/kan/2022.htm" && !failed_once.swap(true, Ordering::SeqCst) {
            return Reply::status(503);
        }
        match path.split('/').collect::<Vec<_>>().as_slice() {
            ["", "years", season, ""] => Reply::ok(index_page(base, season)),
            ["", "teams", _, _] => Reply::ok(schedule.clone()),
            _ => Reply::status(404),
        }
    });

    let cfg = PipelineConfig {
        first_season: 2022,
        last_season: 2021,
        seed_url: site.url("/years/2022/"),
        fetch: quick_fetch(),
        ..PipelineConfig::default()
    };
    let (games, summary) = collect(&cfg).expect("collect should succeed");

    assert_eq!(summary.seasons, 2);
    assert_eq!(summary.team_pages, 4);
    assert_eq!(summary.rows_scraped, 4 * 7);
    assert_eq!(summary.rows_kept, 4 * 5);
    assert_eq!(games.len(), 20);

    let blocks = games
        .chunks(5)
        .map(|chunk| {
            assert!(chunk.iter().all(|g| g.season == chunk[0].season && g.team == chunk[0].team));
            (chunk[0].season, chunk[0].team.as_str())
        })
        .collect::<Vec<_>>();
    assert_eq!(
        blocks,
        vec![(2022, "KC"), (2022, "BUF"), (2021, "KC"), (2021, "BUF")]
    );

    // Two index pages, four team pages and one retried 503.
    assert_eq!(site.hits(), 7);
    let requests = site.requests.lock().expect("request log");
    assert!(requests.iter().any(|r| r.starts_with("GET /years/2021/ ")));
}

#[test]
fn throttling_response_is_retried_until_success() {
    let calls = AtomicUsize::new(0);
    let site = serve(move |_, _, _| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Reply::status(429)
        } else {
            Reply::ok("fine")
        }
    });
    let client = http_client(&quick_fetch()).expect("client");
    let url = site.url("/page");
    let resp = send_with_retry(&url, &Throttle::new(Duration::ZERO), 3, || client.get(&url))
        .expect("second attempt should succeed");
    assert!(resp.status().is_success());
    assert_eq!(site.hits(), 2);
}

#[test]
fn not_found_fails_without_retrying() {
    let site = serve(|_, _, _| Reply::status(404));
    let client = http_client(&quick_fetch()).expect("client");
    let url = site.url("/missing");
    let err = send_with_retry(&url, &Throttle::new(Duration::ZERO), 3, || client.get(&url))
        .unwrap_err();
    match err {
        PipelineError::Fetch { message, .. } => assert!(message.contains("404"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(site.hits(), 1);
}

#[test]
fn persistent_server_errors_exhaust_the_attempts() {
    let site = serve(|_, _, _| Reply::status(503));
    let client = http_client(&quick_fetch()).expect("client");
    let url = site.url("/down");
    let err = send_with_retry(&url, &Throttle::new(Duration::ZERO), 2, || client.get(&url))
        .unwrap_err();
    match err {
        PipelineError::Fetch { message, .. } => {
            assert!(message.contains("gave up after 2 attempts"), "{message}")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(site.hits(), 2);
}

#[test]
fn prefer_mode_serves_repeat_fetches_from_disk() {
    let site = serve(|_, _, _| Reply::ok("<html>cached page</html>"));
    let dir = scratch_dir("cache_prefer");
    let cfg = FetchConfig {
        cache_dir: Some(dir.clone()),
        cache_mode: CacheMode::Prefer,
        ..quick_fetch()
    };
    let client = http_client(&cfg).expect("client");
    let throttle = Throttle::new(Duration::ZERO);
    let url = site.url("/years/2022/");

    let first = fetch_page(client, &throttle, &cfg, &url).expect("first fetch");
    let second = fetch_page(client, &throttle, &cfg, &url).expect("cached fetch");
    assert_eq!(first, "<html>cached page</html>");
    assert_eq!(second, first);
    assert_eq!(site.hits(), 1);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn revalidate_mode_reuses_the_cached_body_on_not_modified() {
    let site = serve(|_, _, request| {
        if request.to_ascii_lowercase().contains("if-none-match: \"v1\"") {
            return Reply::status(304);
        }
        Reply {
            status: 200,
            headers: vec![("ETag", "\"v1\"".to_string())],
            body: "<html>season index</html>".to_string(),
        }
    });
    let dir = scratch_dir("cache_revalidate");
    let cfg = FetchConfig {
        cache_dir: Some(dir.clone()),
        cache_mode: CacheMode::Revalidate,
        ..quick_fetch()
    };
    let client = http_client(&cfg).expect("client");
    let throttle = Throttle::new(Duration::ZERO);
    let url = site.url("/years/2021/");

    let first = fetch_page(client, &throttle, &cfg, &url).expect("first fetch");
    let second = fetch_page(client, &throttle, &cfg, &url).expect("revalidated fetch");
    assert_eq!(second, first);
    assert_eq!(site.hits(), 2);

    let requests = site.requests.lock().expect("request log");
    assert!(!requests[0].to_ascii_lowercase().contains("if-none-match"));
    assert!(requests[1].to_ascii_lowercase().contains("if-none-match: \"v1\""));
    let _ = std::fs::remove_dir_all(dir);
}
