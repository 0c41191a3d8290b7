//! Key-value bucket configuration traits.

/// Marker trait for KV bucket configuration.
pub trait KvBucket: Clone + Send + Sync + 'static {
    /// Bucket name used in NATS KV.
    const NAME: &'static str;

    /// Human-readable description for the bucket.
    const DESCRIPTION: &'static str;
}

/// Bucket for bearer access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessTokensBucket;

impl KvBucket for AccessTokensBucket {
    const NAME: &'static str = "access_tokens";
    const DESCRIPTION: &'static str = "Bearer access token sessions";
}
