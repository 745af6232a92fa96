//! Request dispatch module
//!
//! Resolves one request to exactly one response: preflight short-circuit,
//! exact route lookup, then the 405 / 404 fallbacks. Every branch returns.

use hyper::header;
use hyper::{Method, StatusCode};
use serde_json::json;

use crate::http::{ApiRequest, ApiResponse};
use crate::routing::{self, RouteTable};

/// Dispatch a request against the route table.
///
/// `route_param` names the query parameter that carries the route when
/// front-controller routing is enabled.
pub fn dispatch(table: &RouteTable, req: &ApiRequest, route_param: Option<&str>) -> ApiResponse {
    // 1. Preflight
    if req.method == Method::OPTIONS {
        return ApiResponse::empty(StatusCode::NO_CONTENT);
    }

    // 2. Exact lookup
    let path = routing::normalize(req.route_target(route_param));
    if let Some(handler) = table.lookup(&req.method, &path) {
        return handler(req);
    }

    // 3. Known path, other method
    let allowed = table.methods_for_path(&path);
    if !allowed.is_empty() {
        return method_not_allowed(&allowed);
    }

    // 4. Unknown path
    not_found(&path)
}

fn method_not_allowed(allowed: &[Method]) -> ApiResponse {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    ApiResponse::json(
        StatusCode::METHOD_NOT_ALLOWED,
        json!({ "error": "Method not allowed", "allow": allow }),
    )
    .with_header(header::ALLOW, allow)
}

fn not_found(path: &str) -> ApiResponse {
    ApiResponse::json(
        StatusCode::NOT_FOUND,
        json!({ "error": "Not found", "path": path }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::endpoints;

    fn table() -> RouteTable {
        endpoints::build_route_table().unwrap()
    }

    fn get(path: &str) -> ApiRequest {
        ApiRequest::new(Method::GET, path)
    }

    fn post(path: &str, body: &'static str) -> ApiRequest {
        ApiRequest::new(Method::POST, path).with_body(body)
    }

    #[test]
    fn test_options_short_circuits() {
        for path in ["/ping", "/nowhere", ""] {
            let resp = dispatch(&table(), &ApiRequest::new(Method::OPTIONS, path), None);
            assert_eq!(resp.status, StatusCode::NO_CONTENT);
            assert!(resp.body.is_none());
        }
        // also with nothing registered at all
        let resp = dispatch(&RouteTable::new(), &ApiRequest::new(Method::OPTIONS, "/x"), None);
        assert_eq!(resp.status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_dispatch_hit() {
        let resp = dispatch(&table(), &get("/sum?a=2&b=3"), None);
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body.unwrap()["sum"].as_f64(), Some(5.0));
    }

    #[test]
    fn test_not_found_reports_normalized_path() {
        let resp = dispatch(&table(), &get("//missing/?x=1"), None);
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(
            resp.body.unwrap(),
            json!({"error": "Not found", "path": "/missing/"})
        );

        let resp = dispatch(&table(), &ApiRequest::new(Method::DELETE, ""), None);
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body.unwrap()["path"], "/");
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let resp = dispatch(&table(), &ApiRequest::new(Method::PUT, "/sum"), None);
        assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.header(&header::ALLOW), Some("GET, POST"));
        assert_eq!(
            resp.body.unwrap(),
            json!({"error": "Method not allowed", "allow": "GET, POST"})
        );

        let resp = dispatch(&table(), &post("/ping", ""), None);
        assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.header(&header::ALLOW), Some("GET"));
    }

    #[test]
    fn test_allow_follows_registration_order() {
        fn ok(_: &ApiRequest) -> ApiResponse {
            ApiResponse::empty(StatusCode::OK)
        }
        let mut table = RouteTable::new();
        table.register(Method::DELETE, "/item", ok).unwrap();
        table.register(Method::GET, "/other", ok).unwrap();
        table.register(Method::PATCH, "/item", ok).unwrap();
        table.register(Method::GET, "/item", ok).unwrap();

        let resp = dispatch(&table, &ApiRequest::new(Method::POST, "/item"), None);
        assert_eq!(resp.header(&header::ALLOW), Some("DELETE, PATCH, GET"));
    }

    #[test]
    fn test_suffix_paths_do_not_leak_into_allow() {
        let resp = dispatch(&table(), &ApiRequest::new(Method::PUT, "/um"), None);
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        let resp = dispatch(&table(), &ApiRequest::new(Method::PUT, "/ping/"), None);
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_leading_slashes_collapse() {
        let resp = dispatch(&table(), &get("//ping"), None);
        assert_eq!(resp.status, StatusCode::OK);
        let resp = dispatch(&table(), &get("ping"), None);
        assert_eq!(resp.status, StatusCode::OK);
        let resp = dispatch(&table(), &get("/"), None);
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_route_param_mode() {
        let resp = dispatch(&table(), &get("/api?r=/ping"), Some("r"));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body.unwrap()["ok"], true);

        // Without the parameter the URI path is used
        let resp = dispatch(&table(), &get("/api"), Some("r"));
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body.unwrap()["path"], "/api");

        // Encoded route value with its own query-like suffix
        let resp = dispatch(&table(), &get("/api?r=%2Fsum&a=1&b=2"), Some("r"));
        assert_eq!(resp.body.unwrap()["sum"].as_f64(), Some(3.0));
    }

    #[test]
    fn test_get_requests_are_repeatable() {
        let first = dispatch(&table(), &get("/sum?a=1.5&b=2"), None);
        let second = dispatch(&table(), &get("/sum?a=1.5&b=2"), None);
        assert_eq!(first.body_string(), second.body_string());

        let first = dispatch(&table(), &get("/nope"), None);
        let second = dispatch(&table(), &get("/nope"), None);
        assert_eq!(first.body_string(), second.body_string());
    }
}
