//! Session store error to HTTP error conversion.
//!
//! Every session store failure is an internal error. A store that cannot be
//! reached never degrades into "unauthenticated".

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for session store error conversion.
const TRACING_TARGET: &str = "rawuh_server::nats_errors";

impl<'a> From<rawuh_nats::Error> for HttpError<'a> {
    fn from(nats_error: rawuh_nats::Error) -> Self {
        tracing::error!(
            target: TRACING_TARGET,
            error = %nats_error,
            "session store failure"
        );

        match nats_error {
            rawuh_nats::Error::Connection(_) => ErrorKind::InternalServerError
                .with_message("Session store unavailable")
                .with_context("Unable to reach the session store"),

            rawuh_nats::Error::Timeout { timeout } => ErrorKind::InternalServerError
                .with_message("Session store timed out")
                .with_context(format!("No reply within {timeout:?}")),

            rawuh_nats::Error::Serialization(_) => ErrorKind::InternalServerError
                .with_message("Session record could not be encoded"),

            rawuh_nats::Error::InvalidConfig { reason } => ErrorKind::InternalServerError
                .with_message("Session store misconfigured")
                .with_context(reason),

            rawuh_nats::Error::Operation { operation, details } => ErrorKind::InternalServerError
                .with_message(format!("Session store operation '{}' failed", operation))
                .with_context(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn timeout_is_internal() {
        let nats_err = rawuh_nats::Error::timeout(Duration::from_secs(5));
        let http_err: HttpError = nats_err.into();

        assert_eq!(http_err.kind(), ErrorKind::InternalServerError);
        assert!(http_err.message().unwrap().contains("timed out"));
    }

    #[test]
    fn serialization_is_internal() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let http_err: HttpError = rawuh_nats::Error::Serialization(json_err).into();

        assert_eq!(http_err.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn operation_error_keeps_details_out_of_body() {
        let nats_err = rawuh_nats::Error::operation("kv_get", "bucket access_tokens missing");
        let http_err: HttpError = nats_err.into();

        assert_eq!(http_err.kind(), ErrorKind::InternalServerError);
        assert!(http_err.context().unwrap().contains("access_tokens"));
        assert_eq!(http_err.to_response().message, "Internal Server Error");
    }

    #[test]
    fn invalid_config_is_internal() {
        let nats_err = rawuh_nats::Error::invalid_config("missing server URL");
        let http_err: HttpError = nats_err.into();

        assert_eq!(http_err.kind(), ErrorKind::InternalServerError);
        assert!(http_err.context().unwrap().contains("missing server URL"));
    }
}
