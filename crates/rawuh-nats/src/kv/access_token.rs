//! Access token session record.

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Value stored under an access token key.
///
/// `claims` is opaque to this crate; the server decides its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Serialized identity claims.
    pub claims: serde_json::Value,
    /// When the token was issued.
    pub issued_at: Timestamp,
    /// Absolute expiry. Never extended after issuance.
    pub expires_at: Timestamp,
}

impl AccessToken {
    /// Creates a record that expires `ttl` after `issued_at`.
    pub fn new(claims: serde_json::Value, issued_at: Timestamp, ttl: Duration) -> Self {
        let expires_at = SignedDuration::try_from(ttl)
            .ok()
            .and_then(|ttl| issued_at.checked_add(ttl).ok())
            .unwrap_or(Timestamp::MAX);

        Self {
            claims,
            issued_at,
            expires_at,
        }
    }

    /// Returns whether the token is expired at `now`.
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Returns whether the token is expired now.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }
}
