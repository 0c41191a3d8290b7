//! Access token sessions on NATS KV.

use std::time::Duration;

use uuid::Uuid;

use super::{AccessToken, AccessTokenKey, AccessTokensBucket, KvStore};
use crate::{Error, Result, TRACING_TARGET_KV};

/// Session store for bearer access tokens.
///
/// Entries expire through the bucket `max_age`; reads additionally compare
/// `expires_at` with the current time so a record is never honoured past its
/// own expiry.
#[derive(Clone)]
pub struct AccessTokenStore {
    store: KvStore<AccessTokenKey, AccessToken, AccessTokensBucket>,
    ttl: Duration,
}

impl AccessTokenStore {
    pub(crate) fn new(
        store: KvStore<AccessTokenKey, AccessToken, AccessTokensBucket>,
        ttl: Duration,
    ) -> Self {
        tracing::info!(
            target: TRACING_TARGET_KV,
            ttl_secs = ttl.as_secs(),
            bucket = %store.bucket_name(),
            "Access token store ready"
        );

        Self { store, ttl }
    }

    /// Lifetime of newly issued tokens.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores a session record under `token`.
    pub async fn put(&self, token: Uuid, record: &AccessToken) -> Result<()> {
        self.store.put(&AccessTokenKey(token), record).await?;

        tracing::debug!(
            target: TRACING_TARGET_KV,
            expires_at = %record.expires_at,
            "Stored access token"
        );
        Ok(())
    }

    /// Resolves `token` to its session record.
    ///
    /// Absent, expired and undecodable records are all `Ok(None)`; only
    /// transport failures are errors.
    pub async fn get(&self, token: Uuid) -> Result<Option<AccessToken>> {
        let record = match self.store.get(&AccessTokenKey(token)).await {
            Ok(record) => record,
            Err(Error::Serialization(err)) => {
                tracing::warn!(
                    target: TRACING_TARGET_KV,
                    error = %err,
                    "Discarding undecodable access token record"
                );
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        Ok(record.filter(|record| {
            let expired = record.is_expired();
            if expired {
                tracing::debug!(
                    target: TRACING_TARGET_KV,
                    expires_at = %record.expires_at,
                    "Access token has expired"
                );
            }
            !expired
        }))
    }

    /// Deletes the session stored under `token`.
    pub async fn delete(&self, token: Uuid) -> Result<()> {
        self.store.delete(&AccessTokenKey(token)).await
    }
}
