//! Loader scenarios: cache freshness, fetch fallback, startup failure.

use httpmock::prelude::*;
use tarobot_catalog::{CatalogLoader, Error};
use tempfile::TempDir;

const DATASET: &str = r#"{
  "cards": {
    "fool": {
      "name_cn": "愚者",
      "meaning": {"up": "新的开始", "down": "鲁莽行事"},
      "image_url": "see https://example.com/cards/fool.png"
    },
    "moon": {
      "name_cn": "月亮",
      "meaning": {"up": "直觉", "down": "迷惑"}
    }
  },
  "formations": {
    "时间之流": {
      "cards_num": 2,
      "representations": [["过去", "未来"]]
    }
  }
}"#;

#[tokio::test]
async fn fetch_failure_with_stale_cache_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("tarot.json");
    std::fs::write(&cache_path, DATASET).unwrap();
    // let the cache age past the zero-day refresh window
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/tarot.json");
        then.status(500);
    });

    // refresh_days = 0 makes any existing cache stale
    let loader = CatalogLoader::new(server.url("/tarot.json"), &cache_path)
        .unwrap()
        .with_refresh_days(0);

    let catalog = loader.load().await.expect("stale cache is still usable");
    assert_eq!(catalog.card_count(), 2);
    mock.assert();
}

#[tokio::test]
async fn fetch_failure_without_cache_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("tarot.json");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/tarot.json");
        then.status(503);
    });

    let loader = CatalogLoader::new(server.url("/tarot.json"), &cache_path).unwrap();

    let err = loader.load().await.expect_err("no cache, no catalog");
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn successful_fetch_writes_cache() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("data").join("tarot.json");

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/tarot.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(DATASET);
    });

    let loader = CatalogLoader::new(server.url("/tarot.json"), &cache_path).unwrap();

    let catalog = loader.load().await.expect("fetched dataset should load");
    assert_eq!(catalog.card_count(), 2);
    assert!(catalog.formations.contains_key("时间之流"));
    assert!(cache_path.exists());
    mock.assert();
}

#[tokio::test]
async fn fresh_cache_skips_fetch() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("tarot.json");
    std::fs::write(&cache_path, DATASET).unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/tarot.json");
        then.status(200).body(DATASET);
    });

    let loader = CatalogLoader::new(server.url("/tarot.json"), &cache_path)
        .unwrap()
        .with_refresh_days(7);

    let catalog = loader.load().await.expect("fresh cache loads directly");
    assert_eq!(catalog.card_count(), 2);
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn corrupt_cache_surfaces_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("tarot.json");
    std::fs::write(&cache_path, "not json at all").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/tarot.json");
        then.status(500);
    });

    let loader = CatalogLoader::new(server.url("/tarot.json"), &cache_path).unwrap();

    let err = loader.load().await.expect_err("garbage cannot parse");
    assert!(matches!(err, Error::Parse(_)));
}
