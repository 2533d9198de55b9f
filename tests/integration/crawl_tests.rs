//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full check cycle end-to-end.

use link_ripple::config::{CrawlConfig, UserAgentConfig};
use link_ripple::crawler::{crawl, Coordinator, CrawlEvent, HttpFetcher};
use link_ripple::output::{format_csv_report, write_report};
use link_ripple::state::LinkState;
use std::sync::Arc;
use tokio::sync::mpsc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a run configuration over the given seeds
fn create_test_config(seeds: Vec<String>) -> CrawlConfig {
    CrawlConfig {
        seeds,
        timeout_ms: 5_000,
        concurrency_limit: 4,
        ..CrawlConfig::default()
    }
}

fn create_fetcher() -> Arc<HttpFetcher> {
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
    };
    Arc::new(HttpFetcher::new(&user_agent).expect("Failed to build HTTP client"))
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_diamond_child_fetched_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/left">L</a><a href="/right">R</a>"#, 1).await;
    mount_page(&server, "/left", r#"<a href="/shared">S</a>"#, 1).await;
    mount_page(&server, "/right", r#"<a href="shared#frag">S</a>"#, 1).await;
    mount_page(&server, "/shared", "leaf", 1).await;

    let seed = format!("{}/", server.uri());
    let results = crawl(create_test_config(vec![seed.clone()]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results.broken_count(), 0);

    let shared = results
        .records()
        .iter()
        .find(|r| r.url.ends_with("/shared"))
        .expect("shared page should be checked");
    assert_eq!(shared.depth, 2);
    assert_eq!(shared.state, LinkState::Reachable);
    assert_eq!(shared.http_status, Some(200));
}

#[tokio::test]
async fn test_cycle_terminates() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/loop">Loop</a>"#, 1).await;
    mount_page(&server, "/loop", r#"<a href="/">Home</a><a href="/loop">Self</a>"#, 1).await;

    let seed = format!("{}/", server.uri());
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_broken_link_report() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/ok">OK</a><a href="/missing">Gone</a>"#, 1).await;
    mount_page(&server, "/ok", "fine", 1).await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results.broken_count(), 1);

    let broken = results.finalize(true);
    let csv = format_csv_report(&broken).unwrap();
    assert_eq!(
        csv,
        format!(
            "Link,Status,HTTP Code,Parent\n{base}/missing,BROKEN,404,{base}/\n",
            base = base
        )
    );

    let all = results.finalize(false);
    assert_eq!(all.len(), 3);
    assert!(broken.iter().all(|r| all.contains(r)));
}

#[tokio::test]
async fn test_report_written_to_disk() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/missing">Gone</a>"#, 1).await;

    let seed = format!("{}/", server.uri());
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("broken_links.csv");
    write_report(&results.finalize(true), &results.summary(), &report).unwrap();

    let written = std::fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Link,Status,HTTP Code,Parent");
    assert!(lines[1].ends_with(&format!(",BROKEN,404,{}/", server.uri())));
}

#[tokio::test]
async fn test_comma_in_page_link_is_kept() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/docs/a,b">Doc</a>"#, 1).await;
    Mock::given(path("/docs/a,b"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.broken_count(), 0);

    let csv = format_csv_report(&results.finalize(false)).unwrap();
    assert!(csv.contains(&format!("\"{}/docs/a,b\",OK,200,", server.uri())));
}

#[tokio::test]
async fn test_non_html_is_not_scanned() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/manual.txt">Manual</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/manual.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/hidden", "never", 0).await;

    let seed = format!("{}/", server.uri());
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_offsite_link_checked_but_not_expanded() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &site,
        "/",
        &format!(r#"<a href="{}/external">Elsewhere</a>"#, other.uri()),
        1,
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/external"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&other)
        .await;
    mount_page(&other, "/external", r#"<a href="/deeper">Deeper</a>"#, 0).await;
    mount_page(&other, "/deeper", "never", 0).await;

    let seed = format!("{}/", site.uri());
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.broken_count(), 0);
}

#[tokio::test]
async fn test_depth_cap() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/level1">1</a>"#, 1).await;
    Mock::given(path("/level1"))
        .respond_with(html_page(r#"<a href="/level2">2</a>"#))
        .mount(&server)
        .await;
    mount_page(&server, "/level2", "too deep", 0).await;

    let seed = format!("{}/", server.uri());
    let mut config = create_test_config(vec![seed]);
    config.max_depth = Some(1);

    let results = crawl(config, create_fetcher()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.summary().max_depth_reached, Some(1));
}

#[tokio::test]
async fn test_no_recurse_heads_seeds_only() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", r#"<a href="/child">Child</a>"#, 0).await;

    let seed = format!("{}/", server.uri());
    let mut config = create_test_config(vec![seed]);
    config.recurse = false;

    let results = crawl(config, create_fetcher()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.records()[0].state, LinkState::Reachable);
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(html_page("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let results = crawl(create_test_config(vec![seed]), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.broken_count(), 0);
}

#[tokio::test]
async fn test_unreachable_seed_is_recorded_not_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "up", 1).await;

    // Nothing listens on the discard port
    let seeds = vec![
        "http://127.0.0.1:9/".to_string(),
        format!("{}/", server.uri()),
    ];
    let results = crawl(create_test_config(seeds), create_fetcher())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let down = results
        .records()
        .iter()
        .find(|r| r.url == "http://127.0.0.1:9/")
        .unwrap();
    assert_eq!(down.state, LinkState::Error);
    assert_eq!(down.http_status, None);
    assert!(down.is_broken());
}

#[tokio::test]
async fn test_progress_events_match_records() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#, 1).await;
    mount_page(&server, "/a", "a", 1).await;
    mount_page(&server, "/b", "b", 1).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let seed = format!("{}/", server.uri());
    let results = Coordinator::new(create_test_config(vec![seed]), create_fetcher())
        .with_events(tx)
        .run()
        .await
        .unwrap();

    let mut scheduled_total = 0;
    let mut checked = 0;
    while let Some(event) = rx.recv().await {
        match event {
            CrawlEvent::Scheduled { total, .. } => scheduled_total = total,
            CrawlEvent::Checked(_) => checked += 1,
            CrawlEvent::PageScanned { .. } => {}
        }
    }

    assert_eq!(scheduled_total, 3);
    assert_eq!(checked, 3);
    assert_eq!(results.len(), 3);
}
