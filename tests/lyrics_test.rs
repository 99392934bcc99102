use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use lyricist::lyrics::{LookupError, LrclibClient, LyricsService, LyricsSource};
use lyricist::types::Lyrics;
use reqwest::{StatusCode, Url};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn client(server: &MockServer) -> LrclibClient {
    let base = Url::parse(&server.uri()).unwrap();
    LrclibClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_lrclib_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .and(query_param("artist_name", "Daft Punk"))
        .and(query_param("track_name", "Around the World"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "trackName": "Around the World",
            "artistName": "Daft Punk",
            "instrumental": false,
            "plainLyrics": "Around the world, around the world",
            "syncedLyrics": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lyrics = client(&server)
        .fetch("Daft Punk", "Around the World")
        .await
        .unwrap();
    assert_eq!(
        lyrics,
        Lyrics::Found("Around the world, around the world".to_string())
    );
}

#[tokio::test]
async fn test_lrclib_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "name": "TrackNotFound",
            "message": "Failed to find specified track"
        })))
        .mount(&server)
        .await;

    let lyrics = client(&server).fetch("Nobody", "Nothing").await.unwrap();
    assert_eq!(lyrics, Lyrics::NotFound);
}

#[tokio::test]
async fn test_lrclib_instrumental() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instrumental": true,
            "plainLyrics": null
        })))
        .mount(&server)
        .await;

    let lyrics = client(&server).fetch("Artist", "Interlude").await.unwrap();
    assert_eq!(lyrics, Lyrics::Instrumental);
}

#[tokio::test]
async fn test_lrclib_empty_lyrics_without_instrumental_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "instrumental": false,
            "plainLyrics": "   "
        })))
        .mount(&server)
        .await;

    let lyrics = client(&server).fetch("Artist", "Blank").await.unwrap();
    assert_eq!(lyrics, Lyrics::NotFound);
}

#[tokio::test]
async fn test_lrclib_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client(&server).fetch("Artist", "Title").await;
    assert!(matches!(
        result,
        Err(LookupError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
}

#[tokio::test]
async fn test_lrclib_bad_gateway_is_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let result = client(&server).fetch("Artist", "Title").await;
    assert!(matches!(
        result,
        Err(LookupError::Status(StatusCode::BAD_GATEWAY))
    ));
}

/// Counts lookups and answers from a fixed script.
struct CountingSource {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingSource {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsSource for CountingSource {
    async fn fetch(&self, artist: &str, title: &str) -> Result<Lyrics, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LookupError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        if title == "Instrumental" {
            return Ok(Lyrics::NotFound);
        }
        Ok(Lyrics::Found(format!("{artist} - {title}")))
    }
}

fn service(source: Arc<CountingSource>, capacity: usize) -> LyricsService {
    LyricsService::new(source, NonZeroUsize::new(capacity).unwrap())
}

#[tokio::test]
async fn test_service_hits_upstream_once_per_track() {
    let source = CountingSource::new(false);
    let lyrics = service(source.clone(), 10);

    let first = lyrics.lookup("Daft Punk", "One More Time").await.unwrap();
    let second = lyrics.lookup("daft punk", "one more time").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(source.calls(), 1);
    assert_eq!(lyrics.cache().len(), 1);
}

#[tokio::test]
async fn test_service_caches_not_found() {
    let source = CountingSource::new(false);
    let lyrics = service(source.clone(), 10);

    assert_eq!(
        lyrics.lookup("Artist", "Instrumental").await.unwrap(),
        Lyrics::NotFound
    );
    assert_eq!(
        lyrics.lookup("Artist", "Instrumental").await.unwrap(),
        Lyrics::NotFound
    );
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_service_does_not_cache_failures() {
    let source = CountingSource::new(true);
    let lyrics = service(source.clone(), 10);

    assert!(lyrics.lookup("Artist", "Title").await.is_err());
    assert!(lyrics.lookup("Artist", "Title").await.is_err());
    assert_eq!(source.calls(), 2);
    assert!(lyrics.cache().is_empty());
}

#[tokio::test]
async fn test_service_refetches_evicted_track() {
    let source = CountingSource::new(false);
    let lyrics = service(source.clone(), 1);

    lyrics.lookup("A", "1").await.unwrap();
    lyrics.lookup("B", "2").await.unwrap();
    lyrics.lookup("A", "1").await.unwrap();

    assert_eq!(source.calls(), 3);
    assert_eq!(lyrics.cache().capacity(), 1);
}
