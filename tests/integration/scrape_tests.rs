//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full fetch-retry-rate-limit pipeline end-to-end, including output
//! persistence.

use pagehaul::config::{Config, OutputConfig, ScraperConfig};
use pagehaul::output::write_report;
use pagehaul::report::ErrorKind;
use pagehaul::scraper::Scraper;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration with fast retry/rate-limit timings
fn create_test_config(concurrency: u32, max_attempts: u32) -> Config {
    Config {
        scraper: ScraperConfig {
            concurrency,
            max_attempts,
            base_delay_ms: 50,
            max_delay_ms: 400,
            min_request_interval_ms: 0,
            request_timeout_secs: 5,
            dedup_targets: false,
        },
        output: OutputConfig::default(),
        urls: vec![],
    }
}

/// Mounts a page that answers 200 with the given body
async fn mount_ok(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_report_has_one_terminal_entry_per_target() {
    let server = MockServer::start().await;
    mount_ok(&server, "/a", "<html><title>A</title></html>").await;
    mount_ok(&server, "/b", "<html><title>B</title></html>").await;
    mount_ok(&server, "/c", "<html><title>C</title></html>").await;

    let targets = vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        format!("{}/c", server.uri()),
    ];

    let scraper = Scraper::new(create_test_config(2, 3)).unwrap();
    let report = scraper.run(targets).await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded + report.failed, 3);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.results.len(), 3);

    // Identity preserved regardless of completion order
    let mut urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    urls.sort();
    assert!(urls[0].ends_with("/a"));
    assert!(urls[1].ends_with("/b"));
    assert!(urls[2].ends_with("/c"));
}

#[tokio::test]
async fn test_scenario_ok_fail_once_always_fail() {
    let server = MockServer::start().await;

    // ok: 200 immediately
    mount_ok(&server, "/ok", "<html><title>Ok</title></html>").await;

    // fail-once: 500 on the first request, then 200
    Mock::given(method("GET"))
        .and(path("/fail-once"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_ok(&server, "/fail-once", "<html><title>Recovered</title></html>").await;

    // always-fail: 500 forever
    Mock::given(method("GET"))
        .and(path("/always-fail"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let targets = vec![
        format!("{}/ok", server.uri()),
        format!("{}/fail-once", server.uri()),
        format!("{}/always-fail", server.uri()),
    ];

    let scraper = Scraper::new(create_test_config(3, 3)).unwrap();
    let report = scraper.run(targets).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);

    let fail_once = report
        .results
        .iter()
        .find(|r| r.url.ends_with("/fail-once"))
        .expect("fail-once should succeed");
    assert_eq!(fail_once.total_attempts, 2);

    let ok = report
        .results
        .iter()
        .find(|r| r.url.ends_with("/ok"))
        .expect("ok should succeed");
    assert_eq!(ok.total_attempts, 1);

    let always_fail = &report.failures[0];
    assert!(always_fail.url.ends_with("/always-fail"));
    assert_eq!(always_fail.total_attempts, 3);
    assert_eq!(always_fail.kind, ErrorKind::Http { status: 500 });
}

/// Records the arrival time of every request it answers
struct TimestampingResponder {
    status: u16,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for TimestampingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals
            .lock()
            .expect("arrival log lock poisoned")
            .push(Instant::now());
        ResponseTemplate::new(self.status)
    }
}

#[tokio::test]
async fn test_always_failing_target_backs_off_exponentially() {
    let server = MockServer::start().await;
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(TimestampingResponder {
            status: 500,
            arrivals: Arc::clone(&arrivals),
        })
        .expect(3)
        .mount(&server)
        .await;

    let scraper = Scraper::new(create_test_config(1, 3)).unwrap();
    let report = scraper
        .run(vec![format!("{}/down", server.uri())])
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].total_attempts, 3);

    // Each gap between consecutive attempts respects the doubling lower
    // bound: 50ms after attempt 1, 100ms after attempt 2
    let arrivals = arrivals.lock().unwrap();
    assert_eq!(arrivals.len(), 3);
    for (i, pair) in arrivals.windows(2).enumerate() {
        let gap = pair[1] - pair[0];
        let expected = Duration::from_millis(50 * 2u64.pow(i as u32));
        assert!(
            gap >= expected,
            "gap after attempt {} was {:?}, expected at least {:?}",
            i + 1,
            gap,
            expected
        );
    }
}

#[tokio::test]
async fn test_global_rate_limit_spaces_request_starts() {
    let server = MockServer::start().await;
    mount_ok(&server, "/a", "<html></html>").await;
    mount_ok(&server, "/b", "<html></html>").await;
    mount_ok(&server, "/c", "<html></html>").await;

    let mut config = create_test_config(3, 1);
    config.scraper.min_request_interval_ms = 100;

    let targets = vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        format!("{}/c", server.uri()),
    ];

    let scraper = Scraper::new(config).unwrap();
    let start = Instant::now();
    let report = scraper.run(targets).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(report.succeeded, 3);
    // Three request starts through one 100ms slot: at least 200ms total,
    // even with three workers running concurrently
    assert!(
        elapsed >= Duration::from_millis(200),
        "requests were not rate limited: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_duplicate_targets_processed_independently_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/dup", server.uri());
    let scraper = Scraper::new(create_test_config(2, 3)).unwrap();
    let report = scraper.run(vec![url.clone(), url]).await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.results.len(), 2);
}

#[tokio::test]
async fn test_dedup_targets_collapses_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(2, 3);
    config.scraper.dedup_targets = true;

    let url = format!("{}/dup", server.uri());
    let scraper = Scraper::new(config).unwrap();
    let report = scraper.run(vec![url.clone(), url]).await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.succeeded, 1);
}

#[tokio::test]
async fn test_classification_is_deterministic_across_runs() {
    let server = MockServer::start().await;
    mount_ok(&server, "/stable", "<html><title>S</title></html>").await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let targets = vec![
        format!("{}/stable", server.uri()),
        format!("{}/broken", server.uri()),
    ];

    let scraper = Scraper::new(create_test_config(2, 2)).unwrap();
    let first = scraper.run(targets.clone()).await.unwrap();
    let second = scraper.run(targets).await.unwrap();

    assert_eq!(first.succeeded, second.succeeded);
    assert_eq!(first.failed, second.failed);
    assert_eq!(first.failures[0].url, second.failures[0].url);
    assert_eq!(first.failures[0].kind, second.failures[0].kind);
}

#[tokio::test]
async fn test_mixed_error_kinds_all_reach_terminal_state() {
    let server = MockServer::start().await;
    mount_ok(&server, "/ok", "<html></html>").await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let targets = vec![
        format!("{}/ok", server.uri()),
        format!("{}/gone", server.uri()),
        // Nothing listens here: network error
        "http://127.0.0.1:1/unreachable".to_string(),
    ];

    let scraper = Scraper::new(create_test_config(3, 2)).unwrap();
    let report = scraper.run(targets).await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 2);

    let kinds: Vec<ErrorKind> = report.failures.iter().map(|f| f.kind).collect();
    assert!(kinds.contains(&ErrorKind::Http { status: 404 }));
    assert!(kinds.contains(&ErrorKind::Network));
}

#[tokio::test]
async fn test_extraction_fields_flow_into_report() {
    let server = MockServer::start().await;
    let body = r#"<html>
        <head>
            <title>Landing</title>
            <meta name="description" content="A landing page">
            <meta property="og:type" content="website">
        </head>
        <body>
            <h1>Welcome</h1>
            <a href="/docs">Docs</a>
            <a href="mailto:hi@example.com">Mail</a>
        </body>
    </html>"#;
    mount_ok(&server, "/landing", body).await;

    let scraper = Scraper::new(create_test_config(1, 3)).unwrap();
    let report = scraper
        .run(vec![format!("{}/landing", server.uri())])
        .await
        .unwrap();

    let result = &report.results[0];
    assert_eq!(result.title, Some("Landing".to_string()));
    assert_eq!(
        result.meta_tags.get("description"),
        Some(&"A landing page".to_string())
    );
    assert_eq!(
        result.meta_tags.get("og:type"),
        Some(&"website".to_string())
    );
    assert_eq!(result.links.len(), 1);
    assert!(result.links[0].ends_with("/docs"));
    assert!(result.text.contains("Welcome"));
    assert!(result.raw_html.contains("<h1>Welcome</h1>"));
}

#[tokio::test]
async fn test_end_to_end_report_written_to_disk() {
    let server = MockServer::start().await;
    mount_ok(&server, "/page", "<html><title>Page</title><body>text</body></html>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let targets = vec![
        format!("{}/page", server.uri()),
        format!("{}/missing", server.uri()),
    ];

    let scraper = Scraper::new(create_test_config(2, 2)).unwrap();
    let report = scraper.run(targets).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_report(&report, dir.path()).unwrap();

    assert!(dir.path().join("data/results.json").exists());
    assert!(dir.path().join("data/results.csv").exists());
    assert!(dir.path().join("data/failed_urls.json").exists());
    assert!(dir.path().join("data/report.json").exists());

    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data/report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["total_urls"], 2);
    assert_eq!(summary["successful"], 1);
    assert_eq!(summary["failed"], 1);
}
