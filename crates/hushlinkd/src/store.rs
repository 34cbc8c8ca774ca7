//! In-memory secret store with burn-after-read semantics
//!
//! A record leaves the map on the first fetch whether or not it has expired.
//! The lock is never held across an await.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("secret not found")]
    NotFound,
    #[error("secret expired")]
    Expired,
    #[error("time-to-live is too large")]
    DurationTooLarge,
}

struct Entry {
    data: Vec<u8>,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` for `ttl` and return its freshly minted id.
    ///
    /// Fails with `DurationTooLarge` when the expiry is not representable.
    pub fn create_entry(&self, data: Vec<u8>, ttl: Duration) -> Result<String, StoreError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(StoreError::DurationTooLarge)?;
        let id = new_id();
        self.lock().insert(id.clone(), Entry { data, expires_at });
        Ok(id)
    }

    /// Remove the record and hand back its data if it was still live.
    pub fn get_and_delete(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        self.get_and_delete_at(id, Instant::now())
    }

    fn get_and_delete_at(&self, id: &str, now: Instant) -> Result<Vec<u8>, StoreError> {
        let entry = self.lock().remove(id).ok_or(StoreError::NotFound)?;
        if now > entry.expires_at {
            return Err(StoreError::Expired);
        }
        Ok(entry.data)
    }

    /// Drop every expired record; returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Instant::now())
    }

    fn evict_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw stored bytes, for checking what actually sits in memory.
    #[cfg(test)]
    pub(crate) fn peek(&self, id: &str) -> Option<Vec<u8>> {
        self.lock().get(id).map(|entry| entry.data.clone())
    }

    // A panic while holding the lock leaves the map itself consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Lowercase hex SHA-256 of 32 random bytes.
fn new_id() -> String {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    format!("{:x}", Sha256::digest(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_then_fetch_once() {
        let store = MemoryStore::new();
        let id = store
            .create_entry(b"ciphertext".to_vec(), Duration::from_secs(60))
            .unwrap();

        assert_eq!(store.get_and_delete(&id).unwrap(), b"ciphertext");
        assert_eq!(store.get_and_delete(&id), Err(StoreError::NotFound));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_id() {
        let store = MemoryStore::new();
        assert_eq!(store.get_and_delete("nope"), Err(StoreError::NotFound));
    }

    #[test]
    fn test_expired_fetch_removes_record() {
        let store = MemoryStore::new();
        let id = store.create_entry(b"x".to_vec(), Duration::from_secs(60)).unwrap();
        let later = Instant::now() + Duration::from_secs(61);

        assert_eq!(store.get_and_delete_at(&id, later), Err(StoreError::Expired));
        assert_eq!(store.get_and_delete(&id), Err(StoreError::NotFound));
    }

    #[test]
    fn test_evict_expired_keeps_live_records() {
        let store = MemoryStore::new();
        let short = store.create_entry(b"a".to_vec(), Duration::from_secs(5)).unwrap();
        let long = store.create_entry(b"b".to_vec(), Duration::from_secs(500)).unwrap();
        let later = Instant::now() + Duration::from_secs(60);

        assert_eq!(store.evict_expired_at(later), 1);
        assert_eq!(store.len(), 1);
        assert!(store.peek(&short).is_none());
        assert!(store.peek(&long).is_some());
    }

    #[test]
    fn test_unrepresentable_ttl_is_rejected() {
        let store = MemoryStore::new();
        let result = store.create_entry(b"x".to_vec(), Duration::from_secs(u64::MAX));
        assert_eq!(result, Err(StoreError::DurationTooLarge));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_hex_sha256() {
        let store = MemoryStore::new();
        let id = store.create_entry(Vec::new(), Duration::from_secs(1)).unwrap();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = MemoryStore::new();
        let ids: std::collections::HashSet<_> = (0..500)
            .map(|_| store.create_entry(Vec::new(), Duration::from_secs(60)).unwrap())
            .collect();
        assert_eq!(ids.len(), 500);
        assert_eq!(store.len(), 500);
    }
}
