//! Durable state storage trait
//!
//! This trait abstracts the on-device key-value store that state slices
//! are mirrored to, allowing users to swap between device storage, a
//! file, or custom implementations.

use crate::error::Result;
use async_trait::async_trait;

/// Async key-value storage for persisted state slices
///
/// Values are JSON-serialized snapshots. Implementations must tolerate
/// concurrent calls; the store serializes writes per dispatch but
/// detached persistence tasks may overlap.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Load the value stored under `key`
    ///
    /// Returns `Ok(None)` if the key has never been written or was removed.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    ///
    /// Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory storage implementation
///
/// Stores values in a HashMap. Suitable for development and testing,
/// but not for production (state is lost on restart).
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    items: std::sync::Arc<tokio::sync::RwLock<std::collections::HashMap<String, String>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys (for testing)
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether nothing is stored (for testing)
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl StateStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// Test doubles for exercising storage failure paths.
#[cfg(any(test, feature = "test-storage"))]
pub mod test {
    use super::*;
    use crate::error::VerdantError;

    /// Storage that fails every operation, for testing the
    /// swallow-and-log error paths.
    #[derive(Clone, Copy, Default)]
    pub struct FailingStorage;

    #[async_trait]
    impl StateStorage for FailingStorage {
        async fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(VerdantError::storage("read failed"))
        }

        async fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(VerdantError::storage("write failed"))
        }

        async fn remove_item(&self, _key: &str) -> Result<()> {
            Err(VerdantError::storage("remove failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = InMemoryStorage::new();

        assert_eq!(storage.get_item("user").await.unwrap(), None);

        storage.set_item("user", "{\"id\":\"u1\"}").await.unwrap();
        assert_eq!(
            storage.get_item("user").await.unwrap(),
            Some("{\"id\":\"u1\"}".to_string())
        );

        storage.set_item("user", "{\"id\":\"u2\"}").await.unwrap();
        assert_eq!(
            storage.get_item("user").await.unwrap(),
            Some("{\"id\":\"u2\"}".to_string())
        );

        storage.remove_item("user").await.unwrap();
        assert_eq!(storage.get_item("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let storage = InMemoryStorage::new();
        storage.remove_item("nothing-here").await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_failing_storage() {
        use test::FailingStorage;

        let storage = FailingStorage;
        assert!(storage.get_item("k").await.is_err());
        assert!(storage.set_item("k", "v").await.is_err());
        assert!(storage.remove_item("k").await.is_err());
    }
}
