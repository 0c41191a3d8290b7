//! Bearer token and Basic credential parsing.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};

use crate::extract::Json;
use crate::handler::request::LoginRequest;
use crate::handler::{Error, SessionErrorResponse};

const BEARER_PREFIX: &str = "bearer ";

/// Opaque session token taken from the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Reads the token leniently: a `Bearer ` prefix (any case) is optional
    /// and surrounding whitespace is ignored. Returns `None` when there is
    /// no usable token.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
        if value.trim_end().eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) {
            return None;
        }

        let token = strip_bearer(value).unwrap_or(value).trim();

        (!token.is_empty()).then(|| Self(token.to_owned()))
    }

    /// Reads the token strictly: the `Bearer ` prefix is required.
    pub fn from_headers_strict(headers: &HeaderMap) -> Result<Self, SessionErrorResponse> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| strip_bearer(value.trim_start()))
            .ok_or(SessionErrorResponse::MISSING_BEARER_TOKEN)?
            .trim();

        if token.is_empty() {
            return Err(SessionErrorResponse::INVALID_TOKEN);
        }

        Ok(Self(token.to_owned()))
    }

    /// Returns the token.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthHeader").field(&"****").finish()
    }
}

fn strip_bearer(value: &str) -> Option<&str> {
    let prefix = value.get(..BEARER_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(BEARER_PREFIX)
        .then(|| &value[BEARER_PREFIX.len()..])
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync,
{
    type Rejection = SessionErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or(SessionErrorResponse::UNAUTHENTICATED)
    }
}

impl aide::OperationInput for AuthHeader {}

/// [`AuthHeader`] read with [`AuthHeader::from_headers_strict`].
///
/// Used by routes that report token problems themselves instead of going
/// through the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub AuthHeader);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Sync,
{
    type Rejection = SessionErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        AuthHeader::from_headers_strict(&parts.headers).map(Self)
    }
}

impl aide::OperationInput for BearerToken {}

/// Login credentials from HTTP Basic auth or, failing that, a JSON body.
#[derive(Clone)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Returns whether either field is empty.
    pub fn is_incomplete(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
        }
    }
}

impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(basic) = req.headers().typed_get::<Authorization<Basic>>() {
            return Ok(Self {
                username: basic.username().to_owned(),
                password: basic.password().to_owned(),
            });
        }

        let Json(request) = Json::<LoginRequest>::from_request(req, state).await?;
        Ok(request.into())
    }
}

impl aide::OperationInput for Credentials {
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<LoginRequest>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::http::header::CONTENT_TYPE;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn lenient_accepts_bare_and_prefixed() {
        let token = "0b3c1f2a-0000-4000-8000-000000000000";

        for value in [
            token.to_owned(),
            format!("Bearer {token}"),
            format!("bearer {token}"),
            format!("BEARER   {token}  "),
        ] {
            let header = AuthHeader::from_headers(&headers(&value)).unwrap();
            assert_eq!(header.as_str(), token);
        }
    }

    #[test]
    fn lenient_empty_is_none() {
        assert!(AuthHeader::from_headers(&HeaderMap::new()).is_none());
        assert!(AuthHeader::from_headers(&headers("Bearer ")).is_none());
        assert!(AuthHeader::from_headers(&headers("   ")).is_none());
    }

    #[test]
    fn lenient_lone_scheme_is_none() {
        for value in ["Bearer", "bearer   ", "  BEARER\t"] {
            assert!(AuthHeader::from_headers(&headers(value)).is_none());
        }
    }

    #[test]
    fn strict_requires_prefix() {
        let missing = AuthHeader::from_headers_strict(&headers("abc")).unwrap_err();
        assert_eq!(missing.message, "missing bearer token");

        let missing = AuthHeader::from_headers_strict(&HeaderMap::new()).unwrap_err();
        assert_eq!(missing.message, "missing bearer token");

        let empty = AuthHeader::from_headers_strict(&headers("Bearer    ")).unwrap_err();
        assert_eq!(empty.message, "invalid token");

        let token = AuthHeader::from_headers_strict(&headers("bEaReR abc")).unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[test]
    fn short_or_multibyte_values_do_not_panic() {
        assert!(AuthHeader::from_headers_strict(&headers("Be")).is_err());
        assert!(strip_bearer("béarer x").is_none());
    }

    #[test]
    fn debug_hides_secrets() {
        let credentials = Credentials {
            username: "ann".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{credentials:?}").contains("hunter2"));
        assert!(!credentials.is_incomplete());
    }

    fn login_request(authorization: Option<&str>) -> Request {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }

        builder
            .body(Body::from(r#"{"username":"bob","password":"secret"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn basic_auth_wins_over_body() {
        let request = login_request(Some("Basic YW5uOmh1bnRlcjI="));
        let credentials = Credentials::from_request(request, &()).await.unwrap();

        assert_eq!(credentials.username, "ann");
        assert_eq!(credentials.password, "hunter2");
    }

    #[tokio::test]
    async fn body_is_used_without_basic_auth() {
        let credentials = Credentials::from_request(login_request(None), &())
            .await
            .unwrap();

        assert_eq!(credentials.username, "bob");
        assert_eq!(credentials.password, "secret");
    }

    #[tokio::test]
    async fn basic_auth_with_empty_password_is_incomplete() {
        let request = login_request(Some("Basic YW5uOg=="));
        let credentials = Credentials::from_request(request, &()).await.unwrap();

        assert_eq!(credentials.username, "ann");
        assert!(credentials.is_incomplete());
    }
}
