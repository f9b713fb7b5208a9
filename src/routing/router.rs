//! Route lookup and dispatch.
//!
//! # Design Decisions
//! - Routes are filtered by method first, then by path
//! - Among matching patterns the most specific wins; registration order only
//!   breaks exact ties, so `/search` can never be read as an `:id`
//! - A path known under other methods yields `MethodNotAllowed`, not `NotFound`

use axum::http::Method;

use crate::routing::matcher::{Params, RoutePattern};

/// Every operation the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    ListProducts,
    SearchProducts,
    ProductStats,
    GetProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
}

impl RouteId {
    /// Stable label used in logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Self::ListProducts => "list_products",
            Self::SearchProducts => "search_products",
            Self::ProductStats => "product_stats",
            Self::GetProduct => "get_product",
            Self::CreateProduct => "create_product",
            Self::UpdateProduct => "update_product",
            Self::DeleteProduct => "delete_product",
        }
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    pattern: RoutePattern,
    id: RouteId,
}

/// A resolved route with its captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    route: RouteId,
    params: Params,
}

impl RouteMatch {
    pub fn route(&self) -> RouteId {
        self.route
    }

    /// Value of the `:name` path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Result of looking up a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(RouteMatch),
    /// The path exists, but only for these methods.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Immutable table of `(method, pattern) → RouteId`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    pub fn route(mut self, method: Method, pattern: &str, id: RouteId) -> Self {
        self.routes.push(Route {
            method,
            pattern: RoutePattern::parse(pattern),
            id,
        });
        self
    }

    /// The product API.
    pub fn products() -> Self {
        Self::new()
            .route(Method::GET, "/api/products", RouteId::ListProducts)
            .route(Method::POST, "/api/products", RouteId::CreateProduct)
            .route(Method::GET, "/api/products/search", RouteId::SearchProducts)
            .route(Method::GET, "/api/products/stats", RouteId::ProductStats)
            .route(Method::GET, "/api/products/:id", RouteId::GetProduct)
            .route(Method::PUT, "/api/products/:id", RouteId::UpdateProduct)
            .route(Method::DELETE, "/api/products/:id", RouteId::DeleteProduct)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route for `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        let mut best: Option<(&Route, Params)> = None;
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };

            if route.method != *method {
                if !allowed.contains(&route.method) {
                    allowed.push(route.method.clone());
                }
                continue;
            }

            let replace = match &best {
                Some((current, _)) => route.pattern.cmp_specificity(&current.pattern).is_gt(),
                None => true,
            };
            if replace {
                best = Some((route, params));
            }
        }

        match best {
            Some((route, params)) => Resolution::Matched(RouteMatch {
                route: route.id,
                params,
            }),
            None if !allowed.is_empty() => Resolution::MethodNotAllowed(allowed),
            None => Resolution::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(table: &RouteTable, method: Method, path: &str) -> RouteMatch {
        match table.resolve(&method, path) {
            Resolution::Matched(m) => m,
            other => panic!("expected match for {method} {path}, got {other:?}"),
        }
    }

    #[test]
    fn test_product_routes() {
        let table = RouteTable::products();
        assert_eq!(table.len(), 7);

        assert_eq!(matched(&table, Method::GET, "/api/products").route(), RouteId::ListProducts);
        assert_eq!(matched(&table, Method::POST, "/api/products").route(), RouteId::CreateProduct);
        assert_eq!(matched(&table, Method::DELETE, "/api/products/7").route(), RouteId::DeleteProduct);

        let get = matched(&table, Method::GET, "/api/products/42");
        assert_eq!(get.route(), RouteId::GetProduct);
        assert_eq!(get.param("id"), Some("42"));
        assert_eq!(get.param("name"), None);
    }

    #[test]
    fn test_literals_beat_params() {
        let table = RouteTable::products();
        assert_eq!(
            matched(&table, Method::GET, "/api/products/search").route(),
            RouteId::SearchProducts
        );
        assert_eq!(
            matched(&table, Method::GET, "/api/products/stats").route(),
            RouteId::ProductStats
        );
    }

    #[test]
    fn test_precedence_independent_of_registration_order() {
        let table = RouteTable::new()
            .route(Method::GET, "/api/products/:id", RouteId::GetProduct)
            .route(Method::GET, "/api/products/stats", RouteId::ProductStats)
            .route(Method::GET, "/api/products/search", RouteId::SearchProducts);

        assert_eq!(
            matched(&table, Method::GET, "/api/products/stats").route(),
            RouteId::ProductStats
        );
        assert_eq!(
            matched(&table, Method::GET, "/api/products/search").route(),
            RouteId::SearchProducts
        );
        assert_eq!(
            matched(&table, Method::GET, "/api/products/1").route(),
            RouteId::GetProduct
        );
    }

    #[test]
    fn test_literal_only_wins_for_its_method() {
        let table = RouteTable::products();
        let update = matched(&table, Method::PUT, "/api/products/stats");
        assert_eq!(update.route(), RouteId::UpdateProduct);
        assert_eq!(update.param("id"), Some("stats"));
    }

    #[test]
    fn test_method_not_allowed() {
        let table = RouteTable::products();
        assert_eq!(
            table.resolve(&Method::PATCH, "/api/products"),
            Resolution::MethodNotAllowed(vec![Method::GET, Method::POST])
        );
        assert_eq!(
            table.resolve(&Method::POST, "/api/products/1"),
            Resolution::MethodNotAllowed(vec![Method::GET, Method::PUT, Method::DELETE])
        );
    }

    #[test]
    fn test_not_found() {
        let table = RouteTable::products();
        assert_eq!(table.resolve(&Method::GET, "/api/orders"), Resolution::NotFound);
        assert_eq!(table.resolve(&Method::GET, "/api/products/1/reviews"), Resolution::NotFound);
        assert!(RouteTable::new().is_empty());
    }
}
