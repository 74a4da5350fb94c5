//! Bearer-token gate in front of every task route.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

/// The shared secret, held as the full `Authorization` value it must match.
#[derive(Debug, Clone)]
pub struct AuthToken {
    expected: Arc<str>,
}

impl AuthToken {
    pub fn new(token: &str) -> Self {
        Self {
            expected: format!("Bearer {token}").into(),
        }
    }

    pub fn accepts(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == &*self.expected)
    }
}

/// Rejects the request with 401 before it reaches any handler unless it
/// carries `Authorization: Bearer <token>` exactly.
pub async fn require_bearer(
    State(token): State<AuthToken>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !token.accepts(request.headers()) {
        tracing::debug!(
            method = %request.method(),
            path = request.uri().path(),
            "rejected request without valid bearer token"
        );
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn exact_match_only() {
        let token = AuthToken::new("s3cret");
        assert!(token.accepts(&headers("Bearer s3cret")));
        assert!(!token.accepts(&headers("Bearer s3cret ")));
        assert!(!token.accepts(&headers("bearer s3cret")));
        assert!(!token.accepts(&headers("s3cret")));
        assert!(!token.accepts(&headers("Bearer other")));
        assert!(!token.accepts(&HeaderMap::new()));
    }
}
