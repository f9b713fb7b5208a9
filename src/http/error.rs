//! API error type and its HTTP rendering.
//!
//! Every failure becomes `{ "error": <message> }` with a matching status.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::catalog::ValidationError;
use crate::http::response::ErrorBody;

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong API key.
    #[error("Unauthorized")]
    Unauthorized,

    /// No product with the requested id.
    #[error("Product not found")]
    NotFound,

    /// No route for the requested path.
    #[error("Route not found")]
    RouteNotFound,

    /// Create or update payload rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Path exists under other methods.
    #[error("Method not allowed")]
    MethodNotAllowed(Vec<Method>),

    /// A failure that already knows its status, such as a malformed body.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Status { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else if let Self::Validation(err) = &self {
            tracing::debug!(fields = ?err.fields(), "Payload rejected");
        }

        let message = self.to_string();
        let mut response = (status, Json(ErrorBody { error: &message })).into_response();

        if let Self::MethodNotAllowed(methods) = &self {
            let allow = methods
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation(ValidationError::InvalidFields(vec!["name"])).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Status {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "too big".into()
            }
            .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_bodies() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "Product not found" }));

        let response = ApiError::Unauthorized.into_response();
        assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));

        let response = ApiError::from(ValidationError::InvalidFields(vec!["price"])).into_response();
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing or invalid fields" })
        );

        let response = ApiError::Internal("store unavailable".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "store unavailable" }));
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed(vec![Method::GET, Method::POST]).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST");
    }
}
