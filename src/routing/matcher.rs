//! Route matching module
//!
//! Maps request paths to API routes. Matching is path-only; method
//! dispatch happens in the handlers.

use crate::config::HealthConfig;

/// Collection endpoint path. The trailing slash is part of the route.
pub const COLLECTION_PATH: &str = "/api/v1/puppies/";

/// A matched API route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    /// `/api/v1/puppies/` — list and create.
    Collection,
    /// `/api/v1/puppies/<id>` — read, update, or delete one record.
    Item(u64),
    /// Liveness probe.
    Liveness,
    /// Readiness probe.
    Readiness,
}

/// Match a request path against the route table.
///
/// Returns `None` for anything outside the table; there is no fallback
/// route. Item ids must be all ASCII digits, so `/api/v1/puppies/abc`
/// is an unmatched path, not a bad id.
pub fn match_route(path: &str, health: &HealthConfig) -> Option<ApiRoute> {
    if health.enabled {
        if path == health.liveness_path {
            return Some(ApiRoute::Liveness);
        }
        if path == health.readiness_path {
            return Some(ApiRoute::Readiness);
        }
    }

    if path == COLLECTION_PATH {
        return Some(ApiRoute::Collection);
    }

    let id = path.strip_prefix(COLLECTION_PATH)?;
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // A digit run too long for u64 cannot name an existing record.
    id.parse().ok().map(ApiRoute::Item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health() -> HealthConfig {
        HealthConfig::default()
    }

    #[test]
    fn test_match_collection_requires_trailing_slash() {
        assert_eq!(
            match_route("/api/v1/puppies/", &health()),
            Some(ApiRoute::Collection)
        );
        assert_eq!(match_route("/api/v1/puppies", &health()), None);
    }

    #[test]
    fn test_match_item_numeric_id() {
        assert_eq!(
            match_route("/api/v1/puppies/1", &health()),
            Some(ApiRoute::Item(1))
        );
        assert_eq!(
            match_route("/api/v1/puppies/42", &health()),
            Some(ApiRoute::Item(42))
        );
    }

    #[test]
    fn test_match_item_rejects_trailing_slash() {
        assert_eq!(match_route("/api/v1/puppies/42/", &health()), None);
    }

    #[test]
    fn test_match_item_non_numeric_is_unmatched() {
        assert_eq!(match_route("/api/v1/puppies/abc", &health()), None);
        assert_eq!(match_route("/api/v1/puppies/1a", &health()), None);
        assert_eq!(match_route("/api/v1/puppies/-1", &health()), None);
    }

    #[test]
    fn test_match_item_leading_zeros_parse() {
        assert_eq!(
            match_route("/api/v1/puppies/007", &health()),
            Some(ApiRoute::Item(7))
        );
    }

    #[test]
    fn test_match_item_overflowing_id_is_unmatched() {
        assert_eq!(
            match_route("/api/v1/puppies/99999999999999999999999999", &health()),
            None
        );
    }

    #[test]
    fn test_no_fallback_route() {
        assert_eq!(match_route("/", &health()), None);
        assert_eq!(match_route("/api/v1/", &health()), None);
        assert_eq!(match_route("/api/v1/kittens/", &health()), None);
    }

    #[test]
    fn test_health_routes() {
        assert_eq!(match_route("/healthz", &health()), Some(ApiRoute::Liveness));
        assert_eq!(match_route("/readyz", &health()), Some(ApiRoute::Readiness));
    }

    #[test]
    fn test_health_routes_disabled() {
        let health = HealthConfig {
            enabled: false,
            ..HealthConfig::default()
        };
        assert_eq!(match_route("/healthz", &health), None);
        assert_eq!(match_route("/readyz", &health), None);
    }
}
