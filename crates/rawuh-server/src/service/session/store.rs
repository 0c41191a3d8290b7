//! Session store: opaque bearer tokens mapped to identity claims.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rawuh_nats::kv::AccessToken;
use rawuh_nats::{Error, Result};
use serde_json::Value;
use uuid::Uuid;

use super::{Clock, SessionBackend, SystemClock};
use crate::TRACING_TARGET_SESSION;
use crate::extract::AuthClaims;

/// Issues, resolves and revokes session tokens.
///
/// Every backend call is bounded by the configured call timeout. A token
/// that is not a UUID, has no record, has expired or holds claims that no
/// longer decode resolves to `None`; only an unreachable backend is an error.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    call_timeout: Duration,
}

impl SessionStore {
    /// Creates a store over `backend` using the system clock.
    pub fn new(backend: impl SessionBackend + 'static, ttl: Duration, call_timeout: Duration) -> Self {
        Self {
            backend: Arc::new(backend),
            clock: Arc::new(SystemClock),
            ttl,
            call_timeout,
        }
    }

    /// Replaces the time source used for issuing and expiry checks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Lifetime of newly issued tokens.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `claims` under a fresh random token and returns the token.
    pub async fn issue(&self, claims: &AuthClaims) -> Result<Uuid> {
        let token = Uuid::new_v4();
        let record = AccessToken::new(serde_json::to_value(claims)?, self.clock.now(), self.ttl);

        self.bounded(self.backend.put(token, &record)).await?;

        tracing::debug!(
            target: TRACING_TARGET_SESSION,
            user_id = claims.user_id,
            expires_at = %record.expires_at,
            "Issued access token"
        );
        Ok(token)
    }

    /// Resolves a bearer value to the claims it was issued for.
    pub async fn resolve(&self, token: &str) -> Result<Option<AuthClaims>> {
        let Some(record) = self.fetch(token).await? else {
            return Ok(None);
        };

        match serde_json::from_value(record.claims) {
            Ok(claims) => Ok(Some(claims)),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_SESSION,
                    error = %err,
                    "Session claims do not decode, treating as unauthenticated"
                );
                Ok(None)
            }
        }
    }

    /// Returns the raw claims payload stored for a bearer value.
    pub async fn lookup(&self, token: &str) -> Result<Option<Value>> {
        Ok(self.fetch(token).await?.map(|record| record.claims))
    }

    /// Deletes the session for `token`. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let Some(token) = parse_token(token) else {
            return Ok(());
        };

        self.bounded(self.backend.delete(token)).await?;
        tracing::debug!(target: TRACING_TARGET_SESSION, "Revoked access token");
        Ok(())
    }

    async fn fetch(&self, token: &str) -> Result<Option<AccessToken>> {
        let Some(token) = parse_token(token) else {
            return Ok(None);
        };

        let record = self.bounded(self.backend.get(token)).await?;
        let now = self.clock.now();

        Ok(record.filter(|record| {
            let expired = record.is_expired_at(now);
            if expired {
                tracing::debug!(
                    target: TRACING_TARGET_SESSION,
                    expires_at = %record.expires_at,
                    "Access token has expired"
                );
            }
            !expired
        }))
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| Error::timeout(self.call_timeout))?
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

/// Parses a bearer value into a token. Tokens are always UUIDs, so anything
/// else cannot exist in the backend.
fn parse_token(token: &str) -> Option<Uuid> {
    Uuid::parse_str(token.trim()).ok()
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::extract::UserType;
    use crate::service::session::{FailingBackend, ManualClock, MemorySessionBackend};

    const DAY: Duration = Duration::from_secs(86_400);
    const CALL_TIMEOUT: Duration = Duration::from_secs(5);

    fn claims() -> AuthClaims {
        AuthClaims {
            username: "ann".into(),
            name: "Ann".into(),
            user_id: 11,
            project_id: 7,
            event_id: 3,
            user_type: UserType::ProjectUser,
        }
    }

    fn store() -> (SessionStore, MemorySessionBackend, ManualClock) {
        let backend = MemorySessionBackend::default();
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
        let store = SessionStore::new(backend.clone(), DAY, CALL_TIMEOUT).with_clock(clock.clone());
        (store, backend, clock)
    }

    #[tokio::test]
    async fn issued_token_resolves_to_same_claims() {
        let (store, _, _) = store();
        let token = store.issue(&claims()).await.unwrap();

        let resolved = store.resolve(&token.to_string()).await.unwrap();
        assert_eq!(resolved, Some(claims()));
    }

    #[tokio::test]
    async fn token_expires_after_ttl() {
        let (store, _, clock) = store();
        let token = store.issue(&claims()).await.unwrap().to_string();

        clock.advance(DAY - Duration::from_secs(1));
        assert!(store.resolve(&token).await.unwrap().is_some());

        clock.advance(Duration::from_secs(2));
        assert!(store.resolve(&token).await.unwrap().is_none());
        assert!(store.lookup(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tokens_are_unique_per_login() {
        let (store, backend, _) = store();
        let first = store.issue(&claims()).await.unwrap();
        let second = store.issue(&claims()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(backend.len().await, 2);
        assert!(store.resolve(&first.to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn non_uuid_token_is_absent() {
        let store = SessionStore::new(FailingBackend, DAY, CALL_TIMEOUT);

        assert!(store.resolve("not-a-real-token").await.unwrap().is_none());
        assert!(store.resolve("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn undecodable_claims_are_absent() {
        let (store, backend, _) = store();
        let token = Uuid::new_v4();
        let record = AccessToken::new(
            serde_json::json!({ "user_id": "not a number" }),
            Timestamp::from_second(1_700_000_000).unwrap(),
            DAY,
        );
        backend.put(token, &record).await.unwrap();

        assert!(store.resolve(&token.to_string()).await.unwrap().is_none());
        assert!(store.lookup(&token.to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn backend_failure_is_an_error() {
        let store = SessionStore::new(FailingBackend, DAY, CALL_TIMEOUT);
        let token = Uuid::new_v4().to_string();

        assert!(store.resolve(&token).await.is_err());
        assert!(store.issue(&claims()).await.is_err());
    }

    #[tokio::test]
    async fn revoke_removes_session() {
        let (store, _, _) = store();
        let token = store.issue(&claims()).await.unwrap().to_string();

        store.revoke(&token).await.unwrap();
        assert!(store.resolve(&token).await.unwrap().is_none());
        store.revoke("garbage").await.unwrap();
    }

    #[tokio::test]
    async fn lookup_returns_raw_payload() {
        let (store, _, _) = store();
        let token = store.issue(&claims()).await.unwrap().to_string();

        let payload = store.lookup(&token).await.unwrap().unwrap();
        assert_eq!(payload["usertype"], "PROJECT_USER");
        assert_eq!(payload["project_id"], 7);
    }
}
