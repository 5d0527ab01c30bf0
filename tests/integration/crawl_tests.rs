//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, plus an in-memory fetcher where the
//! order of fetches matters.

use reqwest::header::HeaderMap;
use sitewalk::crawler::{FetchError, FetchedPage};
use sitewalk::output::records::ErrorKind;
use sitewalk::{Config, CrawlObserver, CrawlOutcome, CrawlRecord, Crawler, PageFetcher};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn test_config(max_depth: u32, max_pages: usize, concurrent: bool) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_pages = max_pages;
    config.crawler.delay_seconds = 0.0;
    config.crawler.concurrent = concurrent;
    config.crawler.workers = 3;
    config.http.timeout_seconds = 5.0;
    config
}

/// Builds an HTML page linking to `links`
fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1>{}</body></html>",
        title, title, anchors
    )
}

/// Mounts an HTML page that must be requested exactly `times` times
async fn mount_html(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .expect(times)
        .mount(server)
        .await;
}

fn page_urls(records: &sitewalk::ResultStore) -> Vec<String> {
    records.pages().map(|p| p.url.clone()).collect()
}

async fn scenario_a(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/one", "/two", "/three"]), 1).await;
    for route in ["/one", "/two", "/three"] {
        mount_html(&server, route, page(route, &["/"]), 1).await;
    }

    let crawler = Crawler::new(test_config(1, 10, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 4);
    assert_eq!(report.records.page_count(), 4);
    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_claimed, 4);

    let seed = report.records.get(&format!("{}/", base)).expect("seed recorded");
    assert_eq!(seed.depth(), 0);
    for route in ["/one", "/two", "/three"] {
        let record = report
            .records
            .get(&format!("{}{}", base, route))
            .expect("child recorded");
        assert_eq!(record.depth(), 1);
        assert_eq!(record.as_page().map(|p| p.title.as_str()), Some(route));
    }
}

#[tokio::test]
async fn test_scenario_a_sequential() {
    scenario_a(false).await;
}

#[tokio::test]
async fn test_scenario_a_concurrent() {
    scenario_a(true).await;
}

async fn scenario_b(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/report.pdf", "/logo.PNG", "/about"]), 1).await;
    mount_html(&server, "/about", page("About", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = Crawler::new(test_config(1, 10, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert!(!report.records.contains(&format!("{}/report.pdf", base)));
    assert!(!report.records.contains(&format!("{}/logo.PNG", base)));
    assert_eq!(report.records.len(), 2);
}

#[tokio::test]
async fn test_scenario_b_sequential() {
    scenario_b(false).await;
}

#[tokio::test]
async fn test_scenario_b_concurrent() {
    scenario_b(true).await;
}

async fn scenario_c(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/a", "/b", "/c", "/d"]), 1).await;
    for route in ["/a", "/b", "/c", "/d"] {
        mount_html(&server, route, page(route, &[]), 0).await;
    }

    let crawler = Crawler::new(test_config(3, 1, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    assert!(report.records.contains(&format!("{}/", base)));
    assert_eq!(report.outcome, CrawlOutcome::BudgetExhausted);
}

#[tokio::test]
async fn test_scenario_c_sequential() {
    scenario_c(false).await;
}

#[tokio::test]
async fn test_scenario_c_concurrent() {
    scenario_c(true).await;
}

async fn scenario_d(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok": true}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(test_config(2, 10, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    let error = report
        .records
        .get(&format!("{}/", base))
        .and_then(CrawlRecord::as_error)
        .expect("error record");
    assert!(matches!(error.kind, ErrorKind::NonHtml { .. }));
    assert_eq!(report.outcome, CrawlOutcome::Completed);
}

#[tokio::test]
async fn test_scenario_d_sequential() {
    scenario_d(false).await;
}

#[tokio::test]
async fn test_scenario_d_concurrent() {
    scenario_d(true).await;
}

async fn visited_once(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    // Every page links to every other page, some twice and with fragments
    let all = ["/", "/a", "/b", "/c", "/a#top", "/b?utm_source=feed"];
    for route in ["/", "/a", "/b", "/c"] {
        mount_html(&server, route, page(route, &all), 1).await;
    }

    let crawler = Crawler::new(test_config(4, 50, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 4);
    assert_eq!(report.pages_claimed, 4);
    assert_eq!(report.outcome, CrawlOutcome::Completed);
}

#[tokio::test]
async fn test_each_url_fetched_once_sequential() {
    visited_once(false).await;
}

#[tokio::test]
async fn test_each_url_fetched_once_concurrent() {
    visited_once(true).await;
}

async fn depth_bound(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Root", &["/1"]), 1).await;
    mount_html(&server, "/1", page("One", &["/2"]), 1).await;
    mount_html(&server, "/2", page("Two", &["/3"]), 1).await;
    mount_html(&server, "/3", page("Three", &[]), 0).await;

    let crawler = Crawler::new(test_config(2, 10, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 3);
    assert!(report.records.iter().all(|(_, record)| record.depth() <= 2));
    assert!(!report.records.contains(&format!("{}/3", base)));
}

#[tokio::test]
async fn test_depth_bound_sequential() {
    depth_bound(false).await;
}

#[tokio::test]
async fn test_depth_bound_concurrent() {
    depth_bound(true).await;
}

async fn budget_respected(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    let children = ["/a", "/b", "/c", "/d", "/e"];
    mount_html(&server, "/", page("Home", &children), 1).await;
    for route in children {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(page(route, &[]), "text/html"))
            .mount(&server)
            .await;
    }

    let crawler = Crawler::new(test_config(1, 3, concurrent)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.pages_claimed, 3);
    assert!(report.budget_exhausted());

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_budget_respected_sequential() {
    budget_respected(false).await;
}

#[tokio::test]
async fn test_budget_respected_concurrent() {
    budget_respected(true).await;
}

async fn timeout_isolated(concurrent: bool) {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/slow", "/fast"]), 1).await;
    mount_html(&server, "/fast", page("Fast", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(page("Slow", &[]), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(1, 10, concurrent);
    config.http.timeout_seconds = 0.5;
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.records.page_count(), 2);

    let slow = report
        .records
        .get(&format!("{}/slow", base))
        .and_then(CrawlRecord::as_error)
        .expect("slow page recorded as error");
    assert_eq!(slow.kind, ErrorKind::Timeout);
    assert_eq!(slow.depth, 1);
    assert!(report.records.get(&format!("{}/fast", base)).unwrap().is_page());
}

#[tokio::test]
async fn test_timeout_is_isolated_sequential() {
    timeout_isolated(false).await;
}

#[tokio::test]
async fn test_timeout_is_isolated_concurrent() {
    timeout_isolated(true).await;
}

#[tokio::test]
async fn test_http_error_status_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/missing"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(page("Not Found", &["/x"]), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(test_config(2, 10, false)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    let missing = report.records.get(&format!("{}/missing", base)).unwrap();
    assert_eq!(missing.status_code(), None);
    assert_eq!(
        missing.as_error().map(|e| e.kind.clone()),
        Some(ErrorKind::HttpStatus { status: 404 })
    );
    // Error pages contribute no links
    assert_eq!(report.records.len(), 2);
}

#[tokio::test]
async fn test_redirect_followed_keeps_claimed_key() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/old"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base).as_str()),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/new", page("New", &[]), 1).await;

    let crawler = Crawler::new(test_config(1, 10, false)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    let moved = report
        .records
        .get(&format!("{}/old", base))
        .and_then(CrawlRecord::as_page)
        .expect("redirected page recorded under claimed URL");
    assert_eq!(moved.final_url, format!("{}/new", base));
    assert_eq!(moved.title, "New");
    assert!(!report.records.contains(&format!("{}/new", base)));
}

#[tokio::test]
async fn test_redirect_not_followed_when_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/elsewhere"))
        .mount(&server)
        .await;

    let mut config = test_config(1, 10, false);
    config.http.follow_redirects = false;
    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    let error = report
        .records
        .get(&format!("{}/", base))
        .and_then(CrawlRecord::as_error)
        .expect("redirect recorded as error");
    assert_eq!(
        error.kind,
        ErrorKind::Redirect {
            status: 302,
            location: Some("/elsewhere".to_string()),
        }
    );
}

#[tokio::test]
async fn test_client_identity_headers_sent() {
    let server = MockServer::start().await;
    let base = server.uri();

    let mut config = test_config(0, 10, false);
    config.http.client_identity = "SitewalkTest/1.0".to_string();
    config.http.accept_language = "de-CH".to_string();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "SitewalkTest/1.0"))
        .and(header("accept-language", "de-CH"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page("Home", &[]), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(report.records.page_count(), 1);
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        page("Home", &["https://elsewhere.invalid/", "mailto:me@example.com", "/local"]),
        1,
    )
    .await;
    mount_html(&server, "/local", page("Local", &[]), 1).await;

    let crawler = Crawler::new(test_config(1, 10, true)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    assert_eq!(
        page_urls(&report.records),
        vec![format!("{}/", base), format!("{}/local", base)]
    );
    // Ineligible links are still listed on the page itself
    let home = report.records.get(&format!("{}/", base)).unwrap().as_page().unwrap();
    assert_eq!(home.links.len(), 3);
}

#[tokio::test]
async fn test_file_seed_crawls_only_the_seed() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let index = dir.path().join("index.html");
    std::fs::write(&index, page("Local", &["other.html"])).expect("Failed to write page");
    std::fs::write(dir.path().join("other.html"), page("Other", &[])).expect("Failed to write page");

    let seed = Url::from_file_path(&index).expect("absolute path");
    let crawler = Crawler::new(test_config(2, 10, false)).expect("Failed to create crawler");
    let report = crawler.run(seed.as_str()).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    let record = report.records.get(seed.as_str()).and_then(CrawlRecord::as_page).unwrap();
    assert_eq!(record.title, "Local");
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let crawler = Crawler::new(test_config(1, 10, false)).expect("Failed to create crawler");

    assert!(crawler.run("not a url").await.is_err());
    assert!(crawler.run("ftp://example.com/").await.is_err());
}

/// Fetch starts seen by a [`RecordingFetcher`], in order
#[derive(Default)]
struct FetchTrace {
    starts: Mutex<Vec<(String, Instant)>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FetchTrace {
    fn routes(&self) -> Vec<String> {
        self.starts.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    fn started(&self, route: &str) -> Instant {
        self.starts
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| r == route)
            .map(|(_, at)| *at)
            .unwrap_or_else(|| panic!("{} never fetched", route))
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// In-memory site that traces when and how many pages are fetched
struct RecordingFetcher {
    pages: HashMap<String, String>,
    trace: Arc<FetchTrace>,
    panic_on: Option<String>,
}

impl RecordingFetcher {
    fn new(pages: &[(&str, &[&str])], trace: Arc<FetchTrace>) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(route, links)| (route.to_string(), page(route, links)))
                .collect(),
            trace,
            panic_on: None,
        }
    }
}

impl PageFetcher for RecordingFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let route = url.path().to_string();
        self.trace
            .starts
            .lock()
            .unwrap()
            .push((route.clone(), Instant::now()));
        let running = self.trace.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.trace.peak.fetch_max(running, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(5)).await;
        self.trace.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.as_deref() == Some(route.as_str()) {
            panic!("fetcher blew up on {}", route);
        }

        let body = self
            .pages
            .get(&route)
            .cloned()
            .ok_or_else(|| FetchError::Connect(format!("no page at {}", route)))?;
        Ok(FetchedPage {
            final_url: url.clone(),
            status: 200,
            headers: HeaderMap::new(),
            content_type: "text/html".to_string(),
            body,
            elapsed: Duration::from_millis(5),
        })
    }
}

const TREE: &[(&str, &[&str])] = &[
    ("/", &["/a", "/b"]),
    ("/a", &["/a1", "/a2"]),
    ("/b", &["/b1"]),
    ("/a1", &[]),
    ("/a2", &[]),
    ("/b1", &[]),
];

#[tokio::test]
async fn test_sequential_order_is_depth_first() {
    let trace = Arc::new(FetchTrace::default());
    let fetcher = RecordingFetcher::new(TREE, Arc::clone(&trace));
    let crawler = Crawler::with_fetcher(test_config(2, 10, false), fetcher).unwrap();

    let report = crawler.run("https://site.test/").await.unwrap();

    assert_eq!(report.records.len(), 6);
    assert_eq!(trace.routes(), vec!["/", "/a", "/a1", "/a2", "/b", "/b1"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_levels_are_barriers() {
    let trace = Arc::new(FetchTrace::default());
    let fetcher = RecordingFetcher::new(TREE, Arc::clone(&trace));
    let crawler = Crawler::with_fetcher(test_config(2, 10, true), fetcher).unwrap();

    let report = crawler.run("https://site.test/").await.unwrap();
    assert_eq!(report.records.len(), 6);

    let log = trace.routes();
    let position = |route: &str| log.iter().position(|r| r == route).unwrap();
    assert_eq!(position("/"), 0);
    let last_level_one = position("/a").max(position("/b"));
    for deep in ["/a1", "/a2", "/b1"] {
        assert!(position(deep) > last_level_one, "{} fetched before level 1 finished", deep);
    }
    assert_eq!(log.len(), 6);
}

#[tokio::test]
async fn test_worker_panic_recorded_as_error() {
    let mut fetcher = RecordingFetcher::new(TREE, Arc::default());
    fetcher.panic_on = Some("/a".to_string());
    let crawler = Crawler::with_fetcher(test_config(2, 10, true), fetcher).unwrap();

    let report = crawler.run("https://site.test/").await.unwrap();

    let failed = report
        .records
        .get("https://site.test/a")
        .and_then(CrawlRecord::as_error)
        .expect("panicked worker recorded");
    assert_eq!(failed.kind, ErrorKind::Worker);
    assert!(report.records.get("https://site.test/b1").unwrap().is_page());
    assert!(!report.records.contains("https://site.test/a1"));
    assert_eq!(report.records.len(), report.pages_claimed);
}

#[derive(Default)]
struct CountingObserver {
    claimed: Mutex<Vec<usize>>,
    recorded: Mutex<usize>,
    finished: Mutex<Option<(CrawlOutcome, usize)>>,
}

impl CrawlObserver for CountingObserver {
    fn page_claimed(&self, _url: &Url, _depth: u32, claimed: usize) {
        self.claimed.lock().unwrap().push(claimed);
    }

    fn page_recorded(&self, _record: &CrawlRecord) {
        *self.recorded.lock().unwrap() += 1;
    }

    fn crawl_finished(&self, outcome: CrawlOutcome, records: usize) {
        *self.finished.lock().unwrap() = Some((outcome, records));
    }
}

#[tokio::test]
async fn test_observer_receives_progress() {
    let observer = Arc::new(CountingObserver::default());
    let fetcher = RecordingFetcher::new(TREE, Arc::default());
    let crawler = Crawler::with_fetcher(test_config(2, 4, false), fetcher)
        .unwrap()
        .with_observer(observer.clone());

    let report = crawler.run("https://site.test/").await.unwrap();

    assert_eq!(*observer.claimed.lock().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(*observer.recorded.lock().unwrap(), 4);
    assert_eq!(
        *observer.finished.lock().unwrap(),
        Some((CrawlOutcome::BudgetExhausted, 4))
    );
    assert!(report.budget_exhausted());
}

#[tokio::test]
async fn test_crawler_reusable_across_runs() {
    let fetcher = RecordingFetcher::new(TREE, Arc::default());
    let crawler = Crawler::with_fetcher(test_config(1, 10, false), fetcher).unwrap();

    let first = crawler.run("https://site.test/").await.unwrap();
    let second = crawler.run("https://site.test/").await.unwrap();

    assert_eq!(first.records.len(), 3);
    assert_eq!(second.records.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_delay_precedes_each_descent() {
    let trace = Arc::new(FetchTrace::default());
    let fetcher = RecordingFetcher::new(TREE, Arc::clone(&trace));
    let mut config = test_config(2, 10, false);
    config.crawler.delay_seconds = 1.0;
    let crawler = Crawler::with_fetcher(config, fetcher).unwrap();

    crawler.run("https://site.test/").await.unwrap();

    let gap = |from: &str, to: &str| trace.started(to) - trace.started(from);
    let second = Duration::from_secs(1);
    assert!(gap("/", "/a") >= second);
    assert!(gap("/a", "/a1") >= second);
    assert!(gap("/b", "/b1") >= second);
    // Leaves have no children, so nothing is waited for after them
    assert!(gap("/a1", "/a2") < second);
    assert!(gap("/a2", "/b") < second);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_delay_only_between_levels() {
    let trace = Arc::new(FetchTrace::default());
    let fetcher = RecordingFetcher::new(TREE, Arc::clone(&trace));
    let mut config = test_config(2, 10, true);
    config.crawler.delay_seconds = 1.0;
    let crawler = Crawler::with_fetcher(config, fetcher).unwrap();

    crawler.run("https://site.test/").await.unwrap();

    let second = Duration::from_secs(1);
    let seed = trace.started("/");
    let level_one = ["/a", "/b"].map(|r| trace.started(r));
    let level_two = ["/a1", "/a2", "/b1"].map(|r| trace.started(r));
    let first = |level: &[Instant]| *level.iter().min().unwrap();
    let last = |level: &[Instant]| *level.iter().max().unwrap();

    assert!(last(&level_one[..]) - seed < second);
    assert!(last(&level_one[..]) - first(&level_one[..]) < second);
    assert!(last(&level_two[..]) - first(&level_two[..]) < second);
    assert!(first(&level_two[..]) - last(&level_one[..]) >= second);
    assert!(last(&level_two[..]) - seed < 2 * second);
}

#[tokio::test]
async fn test_concurrent_fetches_bounded_by_workers() {
    let site: &[(&str, &[&str])] = &[
        ("/", &["/c1", "/c2", "/c3", "/c4", "/c5", "/c6"]),
        ("/c1", &[]),
        ("/c2", &[]),
        ("/c3", &[]),
        ("/c4", &[]),
        ("/c5", &[]),
        ("/c6", &[]),
    ];
    let trace = Arc::new(FetchTrace::default());
    let fetcher = RecordingFetcher::new(site, Arc::clone(&trace));
    let mut config = test_config(1, 10, true);
    config.crawler.workers = 2;
    let crawler = Crawler::with_fetcher(config, fetcher).unwrap();

    let report = crawler.run("https://site.test/").await.unwrap();

    assert_eq!(report.records.len(), 7);
    assert_eq!(trace.routes().len(), 7);
    assert_eq!(trace.peak(), 2);
}

#[tokio::test]
async fn test_links_fetched_as_written_and_keyed_canonically() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", &["/view?b=2&flag&a=x%2Fy"]), 1).await;
    mount_html(&server, "/view", page("View", &[]), 1).await;

    let crawler = Crawler::new(test_config(1, 10, false)).expect("Failed to create crawler");
    let report = crawler.run(&format!("{}/", base)).await.expect("Crawl failed");

    let requests = server.received_requests().await.expect("requests recorded");
    let view = requests
        .iter()
        .find(|r| r.url.path() == "/view")
        .expect("view requested");
    assert_eq!(view.url.query(), Some("b=2&flag&a=x%2Fy"));

    let record = report
        .records
        .get(&format!("{}/view?a=x%2Fy&b=2&flag=", base))
        .and_then(CrawlRecord::as_page)
        .expect("recorded under canonical key");
    assert_eq!(record.title, "View");
}
