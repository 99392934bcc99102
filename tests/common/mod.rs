#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use lyricist::management::{Backend, StoreError};

/// Backend whose every call fails, like an unreachable Redis.
pub struct DownBackend;

#[async_trait]
impl Backend for DownBackend {
    async fn put(&self, _: &str, _: Vec<u8>, _: Duration) -> Result<(), StoreError> {
        Err(down())
    }

    async fn fetch(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(down())
    }

    async fn refresh(&self, _: &str, _: Vec<u8>, _: Duration) -> Result<bool, StoreError> {
        Err(down())
    }

    async fn remove(&self, _: &str) -> Result<bool, StoreError> {
        Err(down())
    }

    async fn take(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

/// Backend that never answers.
pub struct StalledBackend;

#[async_trait]
impl Backend for StalledBackend {
    async fn put(&self, _: &str, _: Vec<u8>, _: Duration) -> Result<(), StoreError> {
        stall().await
    }

    async fn fetch(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
        stall().await
    }

    async fn refresh(&self, _: &str, _: Vec<u8>, _: Duration) -> Result<bool, StoreError> {
        stall().await
    }

    async fn remove(&self, _: &str) -> Result<bool, StoreError> {
        stall().await
    }

    async fn take(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
        stall().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        stall().await
    }
}

async fn stall<T>() -> T {
    std::future::pending().await
}
