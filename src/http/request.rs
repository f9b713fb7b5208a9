//! Request parsing.
//!
//! # Responsibilities
//! - Request ID generation and propagation (`x-request-id`)
//! - Query string decoding for list and search
//! - JSON body decoding under the configured size limit

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Query},
    http::{header, HeaderName, Request, Uri},
};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::error::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Assigns a UUID request ID when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request ID of `request`, or `"unknown"`.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Decoded query string as `(key, value)` pairs, in order.
///
/// Repeated keys are kept so each parameter can decide how to treat them.
#[derive(Debug)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn from_uri(uri: &Uri) -> Result<Self, ApiError> {
        Query::try_from_uri(uri)
            .map(|Query(pairs)| Self(pairs))
            .map_err(|rejection| ApiError::Status {
                status: rejection.status(),
                message: rejection.body_text(),
            })
    }

    fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Category filter parsed from the list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter<'a> {
    /// No `category`, or an empty one.
    All,
    Only(&'a str),
    /// `category` given more than once. Nothing can match.
    Conflicting,
}

/// `GET /api/products` query string.
#[derive(Debug, Default)]
pub struct ListQuery {
    categories: Vec<String>,
    page: Option<String>,
    limit: Option<String>,
}

impl ListQuery {
    pub fn from_uri(uri: &Uri) -> Result<Self, ApiError> {
        let pairs = QueryPairs::from_uri(uri)?;
        Ok(Self {
            categories: pairs.all("category").map(str::to_owned).collect(),
            page: pairs.first("page").map(str::to_owned),
            limit: pairs.first("limit").map(str::to_owned),
        })
    }

    pub fn category(&self) -> CategoryFilter<'_> {
        match self.categories.as_slice() {
            [] => CategoryFilter::All,
            [only] if only.is_empty() => CategoryFilter::All,
            [only] => CategoryFilter::Only(only),
            _ => CategoryFilter::Conflicting,
        }
    }

    /// Requested page, if it starts with a positive integer.
    pub fn page(&self) -> Option<usize> {
        leading_int(self.page.as_deref())
    }

    /// Requested page size, if it starts with a positive integer.
    pub fn limit(&self) -> Option<usize> {
        leading_int(self.limit.as_deref())
    }
}

/// `GET /api/products/search` query string.
#[derive(Debug, Default)]
pub struct SearchQuery {
    pub name: Option<String>,
}

impl SearchQuery {
    pub fn from_uri(uri: &Uri) -> Result<Self, ApiError> {
        let pairs = QueryPairs::from_uri(uri)?;
        Ok(Self {
            name: pairs.first("name").map(str::to_owned),
        })
    }
}

// Reads the leading digits, so "2abc" is 2. Non-numeric, zero and negative
// values fall back to the default.
fn leading_int(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse::<usize>().ok().filter(|&n| n > 0)
}

/// Whether `request` declares a JSON body (`application/json` or `*+json`).
fn has_json_content_type(request: &Request<Body>) -> bool {
    let Some(value) = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Read the request body as JSON.
///
/// Bodies without a JSON content type, and empty ones, read as `{}`. The
/// size limit comes from the `DefaultBodyLimit` layer; exceeding it
/// yields 413.
pub async fn read_json_body(request: Request<Body>) -> Result<Value, ApiError> {
    let is_json = has_json_content_type(&request);
    let bytes = Bytes::from_request(request, &())
        .await
        .map_err(|rejection| ApiError::Status {
            status: rejection.status(),
            message: rejection.body_text(),
        })?;

    if !is_json {
        tracing::debug!(bytes = bytes.len(), "Ignoring body without JSON content type");
        return Ok(Value::Object(Map::new()));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {e}")))
}
