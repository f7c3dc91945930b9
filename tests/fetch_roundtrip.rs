//! Asset Fetch Integration Test
//!
//! Downloads a small batch from a local mock server and verifies on-disk
//! results, failure accounting, and progress reporting.

use std::time::Duration;

use sitegrab::capture::AssetEntry;
use sitegrab::fetch::AssetFetcher;
use sitegrab::progress::{self, CloneEvent};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_asset_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"PNGDATA"[..]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

fn entry(url: String, local_path: &str) -> AssetEntry {
    AssetEntry {
        url,
        local_path: local_path.to_string(),
    }
}

#[tokio::test]
async fn test_fetch_batch_writes_files_and_counts_failures() {
    let server = mock_asset_server().await;
    let out = TempDir::new().unwrap();

    let assets = vec![
        entry(format!("{}/img/a.png", server.uri()), "assets/img_0.png"),
        entry(
            format!("{}/img/missing.png", server.uri()),
            "assets/img_1.png",
        ),
    ];

    let fetcher = AssetFetcher::new(Duration::from_secs(5));
    let report = fetcher.fetch_all(&assets, out.path(), 2, &None).await;

    assert_eq!(report.fetched, 1);
    assert_eq!(report.failed, 1);

    let body = std::fs::read(out.path().join("assets/img_0.png")).unwrap();
    assert_eq!(body, b"PNGDATA");
    assert!(!out.path().join("assets/img_1.png").exists());
}

#[tokio::test]
async fn test_fetch_one_creates_parent_directories() {
    let server = mock_asset_server().await;
    let out = TempDir::new().unwrap();

    let fetcher = AssetFetcher::new(Duration::from_secs(5));
    let dest = out.path().join("deep/nested/a.png");
    let bytes = fetcher
        .fetch_one(&format!("{}/img/a.png", server.uri()), &dest)
        .await
        .unwrap();

    assert_eq!(bytes, 7);
    assert!(dest.is_file());
}

#[tokio::test]
async fn test_fetch_progress_carries_batch_indices() {
    let server = mock_asset_server().await;
    let out = TempDir::new().unwrap();

    let assets = vec![
        entry(format!("{}/img/a.png", server.uri()), "assets/img_0.png"),
        entry(
            format!("{}/img/missing.png", server.uri()),
            "assets/media_1.png",
        ),
    ];

    let (tx, mut rx) = progress::channel();
    let fetcher = AssetFetcher::new(Duration::from_secs(5));
    let report = fetcher.fetch_all(&assets, out.path(), 1, &Some(tx)).await;
    assert_eq!(report.fetched + report.failed, 2);

    let mut seen = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            CloneEvent::AssetFetched {
                index,
                total,
                local_path,
                bytes,
            } => {
                assert_eq!(index, 1);
                assert_eq!(total, 2);
                assert_eq!(local_path, "assets/img_0.png");
                assert_eq!(bytes, 7);
                seen += 1;
            }
            CloneEvent::AssetFailed {
                index,
                total,
                url,
                reason,
            } => {
                assert_eq!(index, 2);
                assert_eq!(total, 2);
                assert!(url.ends_with("/img/missing.png"));
                assert!(reason.contains("404"));
                seen += 1;
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert_eq!(seen, 2);
}
