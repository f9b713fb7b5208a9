//! Product API handlers.
//!
//! Each handler runs to completion against the store without awaiting
//! anything but the request body.

use axum::{
    body::Body,
    http::{Request, Uri},
    response::Response,
};

use crate::catalog::{paginate, validate_create, validate_patch};
use crate::http::error::ApiError;
use crate::http::request::{read_json_body, CategoryFilter, ListQuery, SearchQuery};
use crate::http::response;
use crate::http::server::AppState;
use crate::routing::{RouteId, RouteMatch};

/// Public health route.
pub async fn root() -> &'static str {
    "Hello World"
}

/// Run the handler for a resolved route.
pub async fn handle(
    state: &AppState,
    matched: RouteMatch,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    match matched.route() {
        RouteId::ListProducts => list_products(state, request.uri()),
        RouteId::SearchProducts => search_products(state, request.uri()),
        RouteId::ProductStats => Ok(response::ok(state.store.stats())),
        RouteId::GetProduct => get_product(state, product_id(&matched)?),
        RouteId::CreateProduct => create_product(state, request).await,
        RouteId::UpdateProduct => update_product(state, product_id(&matched)?, request).await,
        RouteId::DeleteProduct => delete_product(state, product_id(&matched)?),
    }
}

fn product_id(matched: &RouteMatch) -> Result<&str, ApiError> {
    matched
        .param("id")
        .ok_or_else(|| ApiError::Internal(format!("route {} has no :id", matched.route().name())))
}

fn list_products(state: &AppState, uri: &Uri) -> Result<Response, ApiError> {
    let query = ListQuery::from_uri(uri)?;
    let products = match query.category() {
        CategoryFilter::All => state.store.list(None),
        CategoryFilter::Only(category) => state.store.list(Some(category)),
        CategoryFilter::Conflicting => Vec::new(),
    };
    Ok(response::ok(paginate(products, query.page(), query.limit())))
}

fn search_products(state: &AppState, uri: &Uri) -> Result<Response, ApiError> {
    let query = SearchQuery::from_uri(uri)?;
    Ok(response::ok(state.store.search(query.name.as_deref())))
}

fn get_product(state: &AppState, id: &str) -> Result<Response, ApiError> {
    state
        .store
        .get(id)
        .map(response::ok)
        .ok_or(ApiError::NotFound)
}

async fn create_product(state: &AppState, request: Request<Body>) -> Result<Response, ApiError> {
    let payload = read_json_body(request).await?;
    let fields = validate_create(&payload)?;
    let product = state.store.create(fields);

    tracing::info!(id = %product.id, category = %product.category, "Product created");
    Ok(response::created(product))
}

async fn update_product(
    state: &AppState,
    id: &str,
    request: Request<Body>,
) -> Result<Response, ApiError> {
    // Unknown ids are reported before the body is looked at.
    if !state.store.contains(id) {
        return Err(ApiError::NotFound);
    }

    let payload = read_json_body(request).await?;
    let patch = validate_patch(&payload)?;
    let product = state.store.update(id, patch).ok_or(ApiError::NotFound)?;

    tracing::info!(id = %id, "Product updated");
    Ok(response::ok(product))
}

fn delete_product(state: &AppState, id: &str) -> Result<Response, ApiError> {
    if !state.store.delete(id) {
        return Err(ApiError::NotFound);
    }

    tracing::info!(id = %id, "Product deleted");
    Ok(response::no_content())
}
