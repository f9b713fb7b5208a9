//! Path pattern matching.
//!
//! # Design Decisions
//! - Patterns are `/`-separated segments; `:name` marks a parameter
//! - Empty segments are ignored, so a trailing slash still matches
//! - Matching is case-sensitive and never uses regex
//! - Specificity is a per-segment score; literals outrank parameters

use std::cmp::Ordering;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Matches any single non-empty segment and captures it under this name.
    Param(String),
}

/// A compiled route pattern such as `/api/products/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Captured path parameters, in pattern order.
pub type Params = Vec<(String, String)>;

impl RoutePattern {
    /// Compile a pattern.
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match `path`, returning captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Vec::new();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }

        // Every path segment must be consumed.
        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Order two patterns by specificity.
    ///
    /// Walking both from the left, the first position where one has a literal
    /// and the other a parameter decides: the literal side is `Greater`.
    pub fn cmp_specificity(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a, b) {
                (Segment::Literal(_), Segment::Param(_)) => return Ordering::Greater,
                (Segment::Param(_), Segment::Literal(_)) => return Ordering::Less,
                _ => {}
            }
        }
        Ordering::Equal
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let pattern = RoutePattern::parse("/api/products/:id");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("api".into()),
                Segment::Literal("products".into()),
                Segment::Param("id".into()),
            ]
        );
        assert_eq!(pattern.as_str(), "/api/products/:id");
    }

    #[test]
    fn test_literal_match() {
        let pattern = RoutePattern::parse("/api/products");
        assert_eq!(pattern.matches("/api/products"), Some(vec![]));
        assert_eq!(pattern.matches("/api/products/"), Some(vec![]));
        assert!(pattern.matches("/api/Products").is_none());
        assert!(pattern.matches("/api").is_none());
        assert!(pattern.matches("/api/products/1").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = RoutePattern::parse("/api/products/:id");
        assert_eq!(
            pattern.matches("/api/products/abc-123"),
            Some(vec![("id".to_string(), "abc-123".to_string())])
        );
        assert!(pattern.matches("/api/products").is_none());
        assert!(pattern.matches("/api/products/1/extra").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = RoutePattern::parse("/");
        assert_eq!(pattern.matches("/"), Some(vec![]));
        assert!(pattern.matches("/api").is_none());
    }

    #[test]
    fn test_literal_outranks_param() {
        let stats = RoutePattern::parse("/api/products/stats");
        let by_id = RoutePattern::parse("/api/products/:id");

        assert_eq!(stats.cmp_specificity(&by_id), Ordering::Greater);
        assert_eq!(by_id.cmp_specificity(&stats), Ordering::Less);
        assert_eq!(by_id.cmp_specificity(&by_id), Ordering::Equal);
    }
}
