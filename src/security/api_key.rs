//! Static API key authentication.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::http::error::ApiError;

/// Header carrying the caller's credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Outcome of checking a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

/// Compares request credentials against the configured secret.
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    secret: Option<Arc<str>>,
}

impl ApiKeyAuthenticator {
    /// With `None`, every credential is denied.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.map(Arc::from),
        }
    }

    pub fn authenticate(&self, supplied: Option<&str>) -> AuthDecision {
        match (self.secret.as_deref(), supplied) {
            (Some(secret), Some(supplied)) if secret == supplied => AuthDecision::Allow,
            _ => AuthDecision::Deny,
        }
    }

    /// Check the `X-API-Key` header. Non-UTF-8 values are denied.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> AuthDecision {
        let supplied = headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok());
        self.authenticate(supplied)
    }
}

impl fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuthenticator")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

/// Middleware rejecting requests without a valid API key.
///
/// Rejected requests never reach the dispatcher.
pub async fn require_api_key(
    State(auth): State<ApiKeyAuthenticator>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match auth.authenticate_headers(request.headers()) {
        AuthDecision::Allow => Ok(next.run(request).await),
        AuthDecision::Deny => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                key_present = request.headers().contains_key(API_KEY_HEADER),
                "Rejected request with invalid API key"
            );
            Err(ApiError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    #[test]
    fn test_exact_match_only() {
        let auth = ApiKeyAuthenticator::new(Some("s3cret".into()));
        assert_eq!(auth.authenticate(Some("s3cret")), AuthDecision::Allow);
        assert_eq!(auth.authenticate(Some("S3CRET")), AuthDecision::Deny);
        assert_eq!(auth.authenticate(Some("s3cret ")), AuthDecision::Deny);
        assert_eq!(auth.authenticate(None), AuthDecision::Deny);
    }

    #[test]
    fn test_unconfigured_secret_denies_everything() {
        let auth = ApiKeyAuthenticator::new(None);
        assert_eq!(auth.authenticate(None), AuthDecision::Deny);
        assert_eq!(auth.authenticate(Some("")), AuthDecision::Deny);
        assert_eq!(auth.authenticate(Some("anything")), AuthDecision::Deny);
    }

    #[test]
    fn test_debug_hides_secret() {
        let auth = ApiKeyAuthenticator::new(Some("s3cret".into()));
        assert!(!format!("{auth:?}").contains("s3cret"));
    }

    #[tokio::test]
    async fn test_middleware_blocks_before_handler() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let auth = ApiKeyAuthenticator::new(Some("s3cret".into()));
        let app = Router::new()
            .route(
                "/guarded",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(auth, require_api_key));

        let denied = app
            .clone()
            .oneshot(Request::builder().uri("/guarded").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let allowed = app
            .oneshot(
                Request::builder()
                    .uri("/guarded")
                    .header("X-API-Key", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
