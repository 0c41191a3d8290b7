//! Service configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use rawuh_nats::{NatsClient, NatsConfig};
use rawuh_postgres::{PgClient, PgConfig, run_pending_migrations};
use serde::{Deserialize, Serialize};

use crate::service::{PasswordCipher, Result, ServiceError, ServiceLimits};

/// Default values for configuration options.
mod defaults {
    pub const CALL_TIMEOUT_MS: u64 = 5_000;
    pub const SESSION_TTL_SECS: u64 = 86_400;
    pub const NAME_MAX_LENGTH: usize = 255;
    pub const REMARK_MAX_LENGTH: usize = 500;
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Postgres connection settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres_config: PgConfig,

    /// NATS connection settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub nats_config: NatsConfig,

    /// Upper bound for a single storage or session store call, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CALL_TIMEOUT_MS", default_value_t = defaults::CALL_TIMEOUT_MS)
    )]
    pub call_timeout_ms: u64,

    /// Lifetime of an access token, in seconds. Not extended on use.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SESSION_TTL_SECS", default_value_t = defaults::SESSION_TTL_SECS)
    )]
    pub session_ttl_secs: u64,

    /// Base64 encoded 32-byte AES key for stored passwords.
    #[cfg_attr(feature = "config", arg(long, env = "ENCRYPTION_KEY"))]
    pub encryption_key: String,

    /// Maximum byte length of names.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "PRODUCT_NAME_LENGTH", default_value_t = defaults::NAME_MAX_LENGTH)
    )]
    pub name_max_length: usize,

    /// Maximum byte length of descriptions and addresses.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REMARK_LENGTH", default_value_t = defaults::REMARK_MAX_LENGTH)
    )]
    pub remark_max_length: usize,
}

impl ServiceConfig {
    /// Creates a configuration with default limits and timeouts.
    pub fn new(
        postgres_config: PgConfig,
        nats_config: NatsConfig,
        encryption_key: impl Into<String>,
    ) -> Self {
        Self {
            postgres_config,
            nats_config,
            call_timeout_ms: defaults::CALL_TIMEOUT_MS,
            session_ttl_secs: defaults::SESSION_TTL_SECS,
            encryption_key: encryption_key.into(),
            name_max_length: defaults::NAME_MAX_LENGTH,
            remark_max_length: defaults::REMARK_MAX_LENGTH,
        }
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        self.postgres_config
            .validate()
            .map_err(|e| ServiceError::config("invalid postgres configuration").with_source(e))?;

        self.nats_config
            .validate()
            .map_err(|e| ServiceError::config("invalid NATS configuration").with_source(e))?;

        if self.call_timeout_ms == 0 {
            return Err(ServiceError::config("call timeout must be positive"));
        }

        if self.session_ttl_secs == 0 {
            return Err(ServiceError::config("session TTL must be positive"));
        }

        if self.name_max_length == 0 || self.remark_max_length == 0 {
            return Err(ServiceError::config("field length limits must be positive"));
        }

        self.password_cipher().map(|_| ())
    }

    /// Per-call timeout for storage and session store calls.
    #[inline]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Lifetime of newly issued access tokens.
    #[inline]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Request validation limits.
    pub fn limits(&self) -> ServiceLimits {
        ServiceLimits {
            name_max_length: self.name_max_length,
            remark_max_length: self.remark_max_length,
            call_timeout: self.call_timeout(),
        }
    }

    /// Builds the password cipher from the configured key.
    pub fn password_cipher(&self) -> Result<PasswordCipher> {
        PasswordCipher::from_base64(&self.encryption_key)
    }

    /// Creates the Postgres client and applies pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = PgClient::new(self.postgres_config.clone()).map_err(|e| {
            ServiceError::internal("postgres", "Failed to create database client").with_source(e)
        })?;

        run_pending_migrations(&pg_client).await.map_err(|e| {
            ServiceError::internal("postgres", "Failed to apply database migrations").with_source(e)
        })?;

        Ok(pg_client)
    }

    /// Connects to the NATS server.
    pub async fn connect_nats(&self) -> Result<NatsClient> {
        NatsClient::connect(self.nats_config.clone())
            .await
            .map_err(|e| ServiceError::external("NATS", "Failed to connect to NATS").with_source(e))
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("postgres_config", &self.postgres_config)
            .field("nats_config", &self.nats_config)
            .field("call_timeout_ms", &self.call_timeout_ms)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("encryption_key", &"****")
            .field("name_max_length", &self.name_max_length)
            .field("remark_max_length", &self.remark_max_length)
            .finish()
    }
}
