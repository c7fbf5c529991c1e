//! Device-fingerprint persistence seam.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Per-account opaque fingerprint blobs, read before a worker starts and
/// written back by drivers that negotiate a new device identity.
#[async_trait]
pub trait FingerprintStore: Send + Sync {
    async fn load(&self, account_id: &str) -> Result<Option<String>>;

    async fn store(&self, account_id: &str, fingerprint: &str) -> Result<()>;
}

/// Keeps fingerprints for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryFingerprintStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryFingerprintStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FingerprintStore for MemoryFingerprintStore {
    async fn load(&self, account_id: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(account_id).cloned())
    }

    async fn store(&self, account_id: &str, fingerprint: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(account_id.to_string(), fingerprint.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_load_round_trips() {
        let store = MemoryFingerprintStore::new();
        assert!(store.load("123456").await.unwrap().is_none());

        store.store("123456", "blob-a").await.unwrap();
        assert_eq!(store.load("123456").await.unwrap().as_deref(), Some("blob-a"));

        store.store("123456", "blob-b").await.unwrap();
        assert_eq!(store.load("123456").await.unwrap().as_deref(), Some("blob-b"));
    }
}
