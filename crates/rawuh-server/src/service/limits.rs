//! Configurable request limits.

use std::time::Duration;

use crate::handler::{ErrorKind, Result};

/// Length limits applied to request fields, plus the per-call timeout.
///
/// Pattern checks live on the request types; these limits come from
/// configuration and are checked by the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLimits {
    /// Maximum byte length of names.
    pub name_max_length: usize,
    /// Maximum byte length of descriptions and addresses.
    pub remark_max_length: usize,
    /// Upper bound for a single storage or session store call.
    pub call_timeout: Duration,
}

impl ServiceLimits {
    /// Rejects a name longer than the configured limit.
    pub fn check_name(&self, field: &'static str, value: &str) -> Result<()> {
        Self::check(field, value, self.name_max_length)
    }

    /// Rejects a remark longer than the configured limit.
    pub fn check_remark(&self, field: &'static str, value: &str) -> Result<()> {
        Self::check(field, value, self.remark_max_length)
    }

    fn check(field: &'static str, value: &str, max: usize) -> Result<()> {
        if value.len() > max {
            return Err(ErrorKind::BadRequest
                .with_message(format!("{field} must be at most {max} bytes"))
                .with_resource(field));
        }
        Ok(())
    }
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            name_max_length: 255,
            remark_max_length: 500,
            call_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_are_bytes() {
        let limits = ServiceLimits {
            name_max_length: 4,
            ..ServiceLimits::default()
        };

        assert!(limits.check_name("name", "abcd").is_ok());
        assert!(limits.check_name("name", "abcde").is_err());
        // Two bytes per character.
        assert!(limits.check_name("name", "ééé").is_err());
    }

    #[test]
    fn overlong_remark_is_bad_request() {
        let limits = ServiceLimits {
            remark_max_length: 3,
            ..ServiceLimits::default()
        };

        let error = limits.check_remark("address", "long road").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("address"));
    }
}
