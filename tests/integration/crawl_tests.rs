//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end against SQLite-backed state.

use burrow::config::Config;
use burrow::crawler::{crawl, CrawlEnd};
use burrow::storage::{FrontierBackend, PageSink, Register, SqliteStore};
use tempfile::TempDir;
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with zero pauses and SQLite state in `dir`
fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.pause_floor_secs = 0;
    config.crawler.pause_ceiling_secs = 0;
    config.storage.database_path = dir
        .path()
        .join("crawl.db")
        .to_string_lossy()
        .to_string();
    config.storage.pages_dir = None;
    config
}

fn shutdown_rx() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    // Keep the sender alive for the whole test process.
    std::mem::forget(tx);
    rx
}

/// Mounts a 200 HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_drains_frontier_and_stores_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B again</a>"#).await;
    mount_page(&mock_server, "/b", "<p>leaf page</p>").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let db_path = config.storage.database_path.clone();

    let summary = crawl(config, &format!("{}/", base), true, shutdown_rx())
        .await
        .unwrap();

    assert_eq!(summary.end, CrawlEnd::Done);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.remaining, 0);

    let store = SqliteStore::new(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count(Register::Pending).unwrap(), 0);
    assert_eq!(store.count(Register::Visited).unwrap(), 3);
    assert!(store.contains(Register::Visited, &format!("{}/a", base)).unwrap());
    assert!(store.contains(Register::Visited, &format!("{}/b", base)).unwrap());
    assert_eq!(store.page_count().unwrap(), 3);
    assert_eq!(
        store.page_body(&format!("{}/b", base)).unwrap().as_deref(),
        Some("<p>leaf page</p>")
    );
}

#[tokio::test]
async fn test_failed_fetch_is_forfeited_not_retried() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let db_path = config.storage.database_path.clone();

    let summary = crawl(config, &format!("{}/", base), true, shutdown_rx())
        .await
        .unwrap();

    // The URL was consumed by the attempt and the crawl ended; the mock's
    // expect(1) verifies no second request went out.
    assert_eq!(summary.end, CrawlEnd::Done);
    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.remaining, 0);

    let store = SqliteStore::new(std::path::Path::new(&db_path)).unwrap();
    assert!(store.contains(Register::Visited, &format!("{}/", base)).unwrap());
    assert_eq!(store.page_count().unwrap(), 0);
}

#[tokio::test]
async fn test_foreign_links_are_never_enqueued() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="https://other.example.org/page">out</a><a href="/local">in</a>"#,
    )
    .await;
    mount_page(&mock_server, "/local", "<p>local</p>").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let db_path = config.storage.database_path.clone();

    let summary = crawl(config, &format!("{}/", base), true, shutdown_rx())
        .await
        .unwrap();

    assert_eq!(summary.end, CrawlEnd::Done);
    assert_eq!(summary.fetched, 2);

    let store = SqliteStore::new(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count(Register::Visited).unwrap(), 2);
    assert!(!store
        .contains(Register::Visited, "https://other.example.org/page")
        .unwrap());
    assert!(!store
        .contains(Register::Pending, "https://other.example.org/page")
        .unwrap());
}

#[tokio::test]
async fn test_page_cap_stops_crawl_with_work_pending() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a><a href="/p4">4</a>"#,
    )
    .await;
    for route in ["/p1", "/p2", "/p3", "/p4"] {
        mount_page(&mock_server, route, "<p>page</p>").await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.crawler.max_pages = 2;

    let summary = crawl(config, &format!("{}/", base), true, shutdown_rx())
        .await
        .unwrap();

    assert_eq!(summary.end, CrawlEnd::PageCapReached);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.remaining, 3);
}

#[tokio::test]
async fn test_resume_does_not_refetch_visited_urls() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", "<p>only page</p>").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let seed = format!("{}/", base);

    let first = crawl(config.clone(), &seed, true, shutdown_rx()).await.unwrap();
    assert_eq!(first.fetched, 1);

    // Resuming with the same state: the seed is already visited, so the
    // frontier stays empty and nothing is fetched again.
    let second = crawl(config, &seed, false, shutdown_rx()).await.unwrap();
    assert_eq!(second.end, CrawlEnd::Done);
    assert_eq!(second.fetched, 0);
    assert_eq!(second.skipped, 0);
}

#[tokio::test]
async fn test_fresh_crawl_clears_previous_state() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", "<p>only page</p>").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let seed = format!("{}/", base);

    let first = crawl(config.clone(), &seed, true, shutdown_rx()).await.unwrap();
    assert_eq!(first.fetched, 1);

    let second = crawl(config, &seed, true, shutdown_rx()).await.unwrap();
    assert_eq!(second.fetched, 1);
}

#[tokio::test]
async fn test_media_links_are_filtered_out() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/photo.jpg">pic</a><a href="/song.mp3">tune</a><a href="/doc">doc</a>"#,
    )
    .await;
    mount_page(&mock_server, "/doc", "<p>doc</p>").await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let db_path = config.storage.database_path.clone();

    let summary = crawl(config, &format!("{}/", base), true, shutdown_rx())
        .await
        .unwrap();

    assert_eq!(summary.end, CrawlEnd::Done);
    assert_eq!(summary.fetched, 2);

    let store = SqliteStore::new(std::path::Path::new(&db_path)).unwrap();
    assert!(!store
        .contains(Register::Visited, &format!("{}/photo.jpg", base))
        .unwrap());
    assert!(!store
        .contains(Register::Pending, &format!("{}/photo.jpg", base))
        .unwrap());
}

#[tokio::test]
async fn test_page_files_mirror_fetched_bodies() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_page(&mock_server, "/", "<p>mirrored</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    let pages_dir = dir.path().join("pages");
    config.storage.pages_dir = Some(pages_dir.to_string_lossy().to_string());

    let summary = crawl(config, &format!("{}/", base), true, shutdown_rx())
        .await
        .unwrap();
    assert_eq!(summary.fetched, 1);

    let files: Vec<_> = std::fs::read_dir(&pages_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(files.len(), 1);

    let contents = std::fs::read_to_string(files[0].path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        json.get(format!("{}/", base)).and_then(|v| v.as_str()),
        Some("<p>mirrored</p>")
    );
}
