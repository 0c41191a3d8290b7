//! Key-value key types and traits.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::Error;

/// Marker trait for KV key types.
///
/// The [`Display`](fmt::Display) form is the key stored in NATS, so it may
/// only contain characters NATS accepts in keys (`:` is not one of them).
pub trait KvKey: fmt::Debug + fmt::Display + FromStr + Clone + Send + Sync + 'static {}

/// Key of an access token session, stored as `access_token.<uuid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessTokenKey(pub Uuid);

impl AccessTokenKey {
    const PREFIX: &'static str = "access_token.";
}

impl KvKey for AccessTokenKey {}

impl fmt::Display for AccessTokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for AccessTokenKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| Error::operation("parse_access_token_key", "missing key prefix"))?;
        let id = Uuid::parse_str(id)
            .map_err(|e| Error::operation("parse_access_token_key", e.to_string()))?;
        Ok(Self(id))
    }
}

impl From<Uuid> for AccessTokenKey {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefixed_and_nats_safe() {
        let key = AccessTokenKey(Uuid::nil());
        let s = key.to_string();
        assert_eq!(s, "access_token.00000000-0000-0000-0000-000000000000");
        assert!(!s.contains(':'));
        assert_eq!(s.parse::<AccessTokenKey>().unwrap(), key);
    }

    #[test]
    fn foreign_keys_do_not_parse() {
        assert!("00000000-0000-0000-0000-000000000000".parse::<AccessTokenKey>().is_err());
        assert!("access_token.not-a-uuid".parse::<AccessTokenKey>().is_err());
    }
}
