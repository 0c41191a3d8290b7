//! Application state and dependency injection.

use rawuh_postgres::PgClient;

use crate::service::{PasswordCipher, Result, ServiceConfig, ServiceLimits, SessionStore};

/// Application state.
///
/// Built once at startup and shared by every request. Used for the
/// [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    session_store: SessionStore,

    password_cipher: PasswordCipher,
    service_limits: ServiceLimits,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres (applying migrations) and NATS, and opens the
    /// access token bucket.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let password_cipher = config.password_cipher()?;
        let pg_client = config.connect_postgres().await?;

        let nats_client = config.connect_nats().await?;
        let access_tokens = nats_client.access_token_store(config.session_ttl()).await?;
        let session_store =
            SessionStore::new(access_tokens, config.session_ttl(), config.call_timeout());

        Ok(Self::from_parts(
            pg_client,
            session_store,
            password_cipher,
            config.limits(),
        ))
    }

    /// Assembles state from already constructed components.
    pub fn from_parts(
        pg_client: PgClient,
        session_store: SessionStore,
        password_cipher: PasswordCipher,
        service_limits: ServiceLimits,
    ) -> Self {
        Self {
            pg_client,
            session_store,
            password_cipher,
            service_limits,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(session_store: SessionStore);

impl_di!(password_cipher: PasswordCipher);
impl_di!(service_limits: ServiceLimits);
