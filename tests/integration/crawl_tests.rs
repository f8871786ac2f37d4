//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full protocol end-to-end: robots.txt, sitemap short-circuit and the
//! timed frontier crawl.

use std::collections::HashSet;
use std::time::{Duration, Instant};
use sumi_sweep::config::{Config, Overrides};
use sumi_sweep::{crawl, ConfigError, CrawlOutcome, SweepError};
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given target
fn create_test_config(target: &str, duration: u64, concurrency: usize) -> Config {
    Config::default().apply_overrides(Overrides {
        target: Some(target.to_string()),
        duration: Some(duration),
        concurrency: Some(concurrency),
        fetch_delay_ms: None,
    })
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn printed_lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_seed_printed_and_crawl_stops_at_deadline() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "").await;
    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{base_url}/page1">Page 1</a>"#),
    )
    .await;
    mount_page(&mock_server, "/page1", "no links here".to_string()).await;

    let config = create_test_config(&base_url, 1, 2);
    let mut out = Vec::new();

    let started = Instant::now();
    let outcome = crawl(config, &mut out).await.expect("crawl should succeed");
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(950), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "overran deadline: {elapsed:?}");

    let lines = printed_lines(&out);
    assert_eq!(lines[0], base_url);
    assert!(lines.contains(&format!("{base_url}/page1")));

    let CrawlOutcome::Crawled(stats) = outcome else {
        panic!("expected a timed crawl");
    };
    assert_eq!(stats.urls_seen, 2);
    assert!(stats.peak_in_flight <= 2);
}

#[tokio::test]
async fn test_every_url_printed_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // Every page links to every page, including itself, several times over
    let links: String = (0..5)
        .map(|i| format!(r#"<a href="{base_url}/p{i}">{i}</a> <a href="{base_url}">home</a> "#))
        .collect();
    let body = format!("{links}{links}");
    mount_page(&mock_server, "/", body.clone()).await;
    for i in 0..5 {
        mount_page(&mock_server, &format!("/p{i}"), body.clone()).await;
    }

    let config = create_test_config(&base_url, 1, 4);
    let mut out = Vec::new();
    let outcome = crawl(config, &mut out).await.unwrap();

    let lines = printed_lines(&out);
    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(lines.len(), unique.len(), "duplicate lines in {lines:?}");
    assert_eq!(lines.len(), 6);

    let CrawlOutcome::Crawled(stats) = outcome else {
        panic!("expected a timed crawl");
    };
    assert_eq!(stats.fetches_spawned, 6);
    assert!(stats.duplicates_skipped > 0);
}

#[tokio::test]
async fn test_disallowed_path_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        "User-agent: *\nDisallow: /private\n\nUser-agent: OtherBot\nDisallow: /public",
    )
    .await;
    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{base_url}/private">secret</a>
               <a href="{base_url}/private/deeper">deeper</a>
               <a href="{base_url}/public">public</a>"#
        ),
    )
    .await;
    mount_page(&mock_server, "/public", "public page".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 1, 2);
    let mut out = Vec::new();
    let outcome = crawl(config, &mut out).await.unwrap();

    let lines = printed_lines(&out);
    assert!(lines.contains(&format!("{base_url}/public")));
    assert!(!lines.iter().any(|line| line.contains("/private")));

    let CrawlOutcome::Crawled(stats) = outcome else {
        panic!("expected a timed crawl");
    };
    assert_eq!(stats.disallowed_skipped, 2);
}

#[tokio::test]
async fn test_blanket_disallow_aborts_before_fetching() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /").await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 1, 2);
    let mut out = Vec::new();
    let err = crawl(config, &mut out).await.unwrap_err();

    assert!(matches!(err, SweepError::ExplicitDisallow { .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_unreachable_robots_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 1, 2);
    let mut out = Vec::new();
    let err = crawl(config, &mut out).await.unwrap_err();

    assert!(matches!(err, SweepError::RobotsFetch { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("robots.txt"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_sitemap_short_circuits_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        &format!("User-agent: *\nDisallow: /tmp\nSitemap: {base_url}/sitemap.xml\n"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base_url}/a</loc><lastmod>2024-03-01</lastmod></url>
  <url><loc>{base_url}/b</loc></url>
</urlset>"#
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 1, 2);
    let mut out = Vec::new();
    let outcome = crawl(config, &mut out).await.unwrap();

    assert_eq!(
        printed_lines(&out),
        vec![format!("{base_url}/a"), format!("{base_url}/b")]
    );
    let CrawlOutcome::Sitemap { entries } = outcome else {
        panic!("expected a site map short-circuit");
    };
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_sitemap_failure_exits_with_usage_code() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, &format!("Sitemap: {base_url}/missing.xml")).await;

    let config = create_test_config(&base_url, 1, 2);
    let mut out = Vec::new();
    let err = crawl(config, &mut out).await.unwrap_err();

    assert!(matches!(err, SweepError::SitemapFetch { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_failed_fetch_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "").await;
    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{base_url}/broken">x</a> <a href="{base_url}/ok">y</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/ok",
        format!(r#"<a href="{base_url}/after">z</a>"#),
    )
    .await;
    mount_page(&mock_server, "/after", String::new()).await;

    let config = create_test_config(&base_url, 1, 1);
    let mut out = Vec::new();
    let outcome = crawl(config, &mut out).await.unwrap();

    let lines = printed_lines(&out);
    assert!(lines.contains(&format!("{base_url}/broken")));
    assert!(lines.contains(&format!("{base_url}/after")));

    let CrawlOutcome::Crawled(stats) = outcome else {
        panic!("expected a timed crawl");
    };
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header_regex("user-agent", "^SumiSweep/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 0, 1);
    let mut out = Vec::new();
    crawl(config, &mut out).await.unwrap();
}

#[tokio::test]
async fn test_missing_target() {
    let mut out = Vec::new();
    let err = crawl(Config::default(), &mut out).await.unwrap_err();

    assert!(matches!(err, SweepError::Config(ConfigError::MissingTarget)));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.to_string(), "Configuration error: Must declare a target");
}
