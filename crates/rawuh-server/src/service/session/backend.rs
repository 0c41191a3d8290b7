//! Storage backends for session records.

use async_trait::async_trait;
use rawuh_nats::Result;
use rawuh_nats::kv::{AccessToken, AccessTokenStore};
use uuid::Uuid;

/// Key/value storage for session records.
///
/// Errors are transport failures only. An absent key is `Ok(None)`.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Stores `record` under `token`.
    async fn put(&self, token: Uuid, record: &AccessToken) -> Result<()>;

    /// Returns the record stored under `token`, if any.
    async fn get(&self, token: Uuid) -> Result<Option<AccessToken>>;

    /// Removes the record stored under `token`.
    async fn delete(&self, token: Uuid) -> Result<()>;
}

#[async_trait]
impl SessionBackend for AccessTokenStore {
    async fn put(&self, token: Uuid, record: &AccessToken) -> Result<()> {
        AccessTokenStore::put(self, token, record).await
    }

    async fn get(&self, token: Uuid) -> Result<Option<AccessToken>> {
        AccessTokenStore::get(self, token).await
    }

    async fn delete(&self, token: Uuid) -> Result<()> {
        AccessTokenStore::delete(self, token).await
    }
}

#[cfg(test)]
pub(crate) use memory::{FailingBackend, MemorySessionBackend};

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use rawuh_nats::kv::AccessToken;
    use rawuh_nats::{Error, Result};
    use tokio::sync::RwLock;
    use uuid::Uuid;

    use super::SessionBackend;

    /// Process-local backend for tests. Expiry is left to the caller.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MemorySessionBackend {
        records: Arc<RwLock<HashMap<Uuid, AccessToken>>>,
    }

    impl MemorySessionBackend {
        pub(crate) async fn len(&self) -> usize {
            self.records.read().await.len()
        }
    }

    #[async_trait]
    impl SessionBackend for MemorySessionBackend {
        async fn put(&self, token: Uuid, record: &AccessToken) -> Result<()> {
            self.records.write().await.insert(token, record.clone());
            Ok(())
        }

        async fn get(&self, token: Uuid) -> Result<Option<AccessToken>> {
            Ok(self.records.read().await.get(&token).cloned())
        }

        async fn delete(&self, token: Uuid) -> Result<()> {
            self.records.write().await.remove(&token);
            Ok(())
        }
    }

    /// Backend whose every call fails as if the store were unreachable.
    #[derive(Debug, Clone, Copy, Default)]
    pub(crate) struct FailingBackend;

    #[async_trait]
    impl SessionBackend for FailingBackend {
        async fn put(&self, _token: Uuid, _record: &AccessToken) -> Result<()> {
            Err(Error::operation("kv_put", "connection refused"))
        }

        async fn get(&self, _token: Uuid) -> Result<Option<AccessToken>> {
            Err(Error::operation("kv_get", "connection refused"))
        }

        async fn delete(&self, _token: Uuid) -> Result<()> {
            Err(Error::operation("kv_delete", "connection refused"))
        }
    }
}
