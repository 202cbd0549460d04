//! In-process revocation store for tests and single-instance deployments

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::DomainResult;

use super::r#trait::RevocationRepository;

/// Revocation records held in a map of key to expiry instant
#[derive(Debug, Default)]
pub struct MemoryRevocationRepository {
    records: Mutex<HashMap<String, Instant>>,
}

impl MemoryRevocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of a record, `None` when absent or expired
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let records = self.records.lock();
        records
            .get(key)
            .and_then(|expires_at| expires_at.checked_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.records.lock().values().filter(|e| **e > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired record so the map only holds live revocations
    fn purge_expired(records: &mut HashMap<String, Instant>, now: Instant) {
        records.retain(|_, expires_at| *expires_at > now);
    }

    fn live(records: &mut HashMap<String, Instant>, key: &str, now: Instant) -> bool {
        match records.get(key) {
            Some(expires_at) if *expires_at > now => true,
            Some(_) => {
                records.remove(key);
                false
            }
            None => false,
        }
    }
}

#[async_trait]
impl RevocationRepository for MemoryRevocationRepository {
    async fn put(&self, key: &str, ttl: Duration) -> DomainResult<()> {
        let now = Instant::now();
        let mut records = self.records.lock();
        Self::purge_expired(&mut records, now);
        records.insert(key.to_string(), now + ttl);
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, ttl: Duration) -> DomainResult<bool> {
        let now = Instant::now();
        let mut records = self.records.lock();
        Self::purge_expired(&mut records, now);
        if records.contains_key(key) {
            return Ok(false);
        }
        records.insert(key.to_string(), now + ttl);
        Ok(true)
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        let mut records = self.records.lock();
        Ok(Self::live(&mut records, key, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_exists() {
        let repo = MemoryRevocationRepository::new();
        assert!(!repo.exists("token:revoked:a").await.unwrap());

        repo.put("token:revoked:a", Duration::from_secs(60)).await.unwrap();
        assert!(repo.exists("token:revoked:a").await.unwrap());
        assert!(repo.ttl("token:revoked:a").unwrap() <= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_records_expire() {
        let repo = MemoryRevocationRepository::new();
        repo.put("k", Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!repo.exists("k").await.unwrap());
        assert!(repo.ttl("k").is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_put_if_absent_only_once() {
        let repo = MemoryRevocationRepository::new();
        assert!(repo.put_if_absent("k", Duration::from_secs(60)).await.unwrap());
        assert!(!repo.put_if_absent("k", Duration::from_secs(60)).await.unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_purge_expired_records() {
        let repo = MemoryRevocationRepository::new();
        for i in 0..10 {
            repo.put(&format!("old:{}", i), Duration::from_millis(20))
                .await
                .unwrap();
        }
        assert_eq!(repo.records.lock().len(), 10);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(repo
            .put_if_absent("fresh", Duration::from_secs(60))
            .await
            .unwrap());

        assert_eq!(repo.records.lock().len(), 1);
        assert_eq!(repo.len(), 1);
    }
}
