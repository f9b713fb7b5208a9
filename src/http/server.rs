//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the public root and the guarded `/api` tree
//! - Wire up middleware (request ID, tracing, panic recovery, limits, auth)
//! - Dispatch `/api` requests through the route table
//! - Bind server to listener and shut down gracefully

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, HttpBody},
    extract::{DefaultBodyLimit, State},
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

use crate::catalog::ProductStore;
use crate::config::AppConfig;
use crate::http::error::ApiError;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::{Resolution, RouteTable};
use crate::security::{require_api_key, ApiKeyAuthenticator};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProductStore>,
    pub routes: Arc<RouteTable>,
    pub auth: ApiKeyAuthenticator,
}

/// HTTP server for the product catalog.
pub struct ApiServer {
    router: Router,
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a server; the store is seeded unless `catalog.seed` is off.
    pub fn new(config: AppConfig) -> Self {
        let store = if config.catalog.seed {
            ProductStore::seeded()
        } else {
            ProductStore::new()
        };
        Self::with_store(config, store)
    }

    /// Create a server around an existing store.
    pub fn with_store(config: AppConfig, store: ProductStore) -> Self {
        let state = AppState {
            store: Arc::new(store),
            routes: Arc::new(RouteTable::products()),
            auth: ApiKeyAuthenticator::new(config.auth.api_key.clone()),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/api", any(dispatch))
            .route("/api/{*path}", any(dispatch))
            .route_layer(middleware::from_fn_with_state(
                state.auth.clone(),
                require_api_key,
            ))
            .with_state(state);

        let router = Router::new()
            .route("/", get(handlers::root))
            .merge(api)
            .fallback(route_not_found);
        apply_middleware(router, config)
    }

    /// Shared state, for inspection in tests.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The assembled router, without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            products = self.state.store.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve an authenticated `/api` request and run its handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let matched = match state.routes.resolve(&method, &path) {
        Resolution::Matched(m) => m,
        Resolution::MethodNotAllowed(allowed) => {
            return ApiError::MethodNotAllowed(allowed).into_response();
        }
        Resolution::NotFound => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return ApiError::RouteNotFound.into_response();
        }
    };

    let route = matched.route();
    let response = match handlers::handle(&state, matched, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };

    metrics::record_request(method.as_str(), route.name(), response.status().as_u16(), start);
    response
}

/// Wrap `router` in the request ID, tracing, panic, body-limit and timeout layers.
fn apply_middleware(router: Router, config: &AppConfig) -> Router {
    router
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_request_span)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(propagate_request_id_layer())
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(middleware::map_response(fill_empty_error_body))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.limits.request_timeout_secs),
                )),
        )
}

/// Give bodiless error responses, such as timeouts and axum's own 405s,
/// the usual JSON error body. Status and headers are kept.
async fn fill_empty_error_body(response: Response) -> Response {
    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if !is_error || response.body().size_hint().exact() != Some(0) {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Error").to_string();
    let (filled, body) = ApiError::Status { status, message }
        .into_response()
        .into_parts();
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.extend(filled.headers);

    Response::from_parts(parts, body)
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Internal server error".to_string()
    };
    ApiError::Internal(message).into_response()
}
