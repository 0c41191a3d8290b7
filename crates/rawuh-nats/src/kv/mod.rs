//! NATS Key-Value store operations.
//!
//! - [`KvStore<K, V, B>`]: generic type-safe key-value operations
//! - [`KvKey`]: trait for key types
//! - [`KvBucket`]: trait for bucket configuration
//! - [`AccessTokenStore`]: bearer token sessions on top of [`KvStore`]

mod access_token;
mod access_token_store;
mod kv_bucket;
mod kv_key;
mod kv_store;

pub use access_token::AccessToken;
pub use access_token_store::AccessTokenStore;
pub use kv_bucket::{AccessTokensBucket, KvBucket};
pub use kv_key::{AccessTokenKey, KvKey};
pub use kv_store::KvStore;
