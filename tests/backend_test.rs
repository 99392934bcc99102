//! Backend contract, run against the in-process backend and, when a Redis
//! server is available, against `RedisBackend`.
//!
//! The Redis cases are ignored by default:
//!
//! ```text
//! LYRICIST_TEST_REDIS_URL=redis://127.0.0.1:6379 cargo test --test backend_test -- --ignored
//! ```

use std::{sync::Arc, time::Duration};

use lyricist::management::{Backend, MemoryBackend, RedisBackend, SessionError, SessionStore};
use lyricist::utils::generate_id;

const TTL: Duration = Duration::from_secs(900);
const TIMEOUT: Duration = Duration::from_secs(2);

fn redis_url() -> String {
    std::env::var("LYRICIST_TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

async fn redis() -> RedisBackend {
    RedisBackend::connect(&redis_url(), TIMEOUT).await.unwrap()
}

/// Fresh key per case so runs against a shared server do not collide.
fn key(name: &str) -> String {
    format!("lyricist-test:{name}:{}", generate_id())
}

async fn put_then_fetch(backend: &dyn Backend) {
    let key = key("put");
    assert_eq!(backend.fetch(&key).await.unwrap(), None);

    backend.put(&key, b"first".to_vec(), TTL).await.unwrap();
    assert_eq!(backend.fetch(&key).await.unwrap(), Some(b"first".to_vec()));

    backend.put(&key, b"second".to_vec(), TTL).await.unwrap();
    assert_eq!(backend.fetch(&key).await.unwrap(), Some(b"second".to_vec()));

    backend.remove(&key).await.unwrap();
}

async fn refresh_only_existing(backend: &dyn Backend) {
    let key = key("refresh");
    assert!(!backend.refresh(&key, b"ghost".to_vec(), TTL).await.unwrap());
    assert_eq!(backend.fetch(&key).await.unwrap(), None);

    backend.put(&key, b"old".to_vec(), TTL).await.unwrap();
    assert!(backend.refresh(&key, b"new".to_vec(), TTL).await.unwrap());
    assert_eq!(backend.fetch(&key).await.unwrap(), Some(b"new".to_vec()));

    backend.remove(&key).await.unwrap();
}

async fn remove_reports_existence(backend: &dyn Backend) {
    let key = key("remove");
    backend.put(&key, b"value".to_vec(), TTL).await.unwrap();

    assert!(backend.remove(&key).await.unwrap());
    assert!(!backend.remove(&key).await.unwrap());
    assert_eq!(backend.fetch(&key).await.unwrap(), None);
}

async fn take_is_single_use(backend: &dyn Backend) {
    let key = key("take");
    backend.put(&key, b"state".to_vec(), TTL).await.unwrap();

    assert_eq!(backend.take(&key).await.unwrap(), Some(b"state".to_vec()));
    assert_eq!(backend.take(&key).await.unwrap(), None);
    assert_eq!(backend.fetch(&key).await.unwrap(), None);
}

async fn touch_after_delete_stays_deleted(backend: Arc<dyn Backend>) {
    let store = SessionStore::new(backend, TTL, TIMEOUT);
    let id = store.create(b"credential".to_vec()).await.unwrap();

    store.delete(&id).await.unwrap();
    assert!(matches!(store.touch(&id).await, Err(SessionError::NotFound)));
    assert!(matches!(store.get(&id).await, Err(SessionError::NotFound)));
}

#[tokio::test]
async fn test_memory_put_then_fetch() {
    put_then_fetch(&MemoryBackend::new()).await;
}

#[tokio::test]
async fn test_memory_refresh_only_existing() {
    refresh_only_existing(&MemoryBackend::new()).await;
}

#[tokio::test]
async fn test_memory_remove_reports_existence() {
    remove_reports_existence(&MemoryBackend::new()).await;
}

#[tokio::test]
async fn test_memory_take_is_single_use() {
    take_is_single_use(&MemoryBackend::new()).await;
}

#[tokio::test]
async fn test_memory_touch_after_delete_stays_deleted() {
    touch_after_delete_stays_deleted(Arc::new(MemoryBackend::new())).await;
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_put_then_fetch() {
    put_then_fetch(&redis().await).await;
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_refresh_only_existing() {
    refresh_only_existing(&redis().await).await;
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_remove_reports_existence() {
    remove_reports_existence(&redis().await).await;
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_take_is_single_use() {
    take_is_single_use(&redis().await).await;
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_touch_after_delete_stays_deleted() {
    touch_after_delete_stays_deleted(Arc::new(redis().await)).await;
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_put_and_refresh_set_ttl() {
    let backend = redis().await;
    let mut conn = redis::Client::open(redis_url())
        .unwrap()
        .get_multiplexed_async_connection()
        .await
        .unwrap();
    let key = key("ttl");

    backend.put(&key, b"value".to_vec(), TTL).await.unwrap();
    let ttl: i64 = redis::cmd("TTL").arg(&key).query_async(&mut conn).await.unwrap();
    assert!((890..=900).contains(&ttl), "ttl was {ttl}");

    let _: i64 = redis::cmd("EXPIRE")
        .arg(&key)
        .arg(10)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert!(backend.refresh(&key, b"value".to_vec(), TTL).await.unwrap());
    let ttl: i64 = redis::cmd("TTL").arg(&key).query_async(&mut conn).await.unwrap();
    assert!((890..=900).contains(&ttl), "ttl was {ttl}");

    backend.remove(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_expired_key_is_gone() {
    let backend = redis().await;
    let key = key("expiry");

    backend
        .put(&key, b"short".to_vec(), Duration::from_secs(1))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(backend.fetch(&key).await.unwrap(), None);
    assert!(!backend.refresh(&key, b"late".to_vec(), TTL).await.unwrap());
}

#[tokio::test]
#[ignore = "needs a Redis server, see LYRICIST_TEST_REDIS_URL"]
async fn test_redis_ping() {
    redis().await.ping().await.unwrap();
}
