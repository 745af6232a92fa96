//! Built-in endpoints
//!
//! `GET /ping`, `GET /time`, `GET /sum`, `POST /echo` and `POST /sum`.

use chrono::{Local, SecondsFormat};
use hyper::{Method, StatusCode};
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::http::{ApiRequest, ApiResponse};
use crate::routing::RouteTable;

const SUM_PARAMS_ERROR: &str = "Params a and b must be numbers";
const SUM_BODY_ERROR: &str = "Body must include numeric a and b";

/// The application's route table. Fails on a duplicate registration.
pub fn build_route_table() -> Result<RouteTable, AppError> {
    let mut table = RouteTable::new();
    table.register(Method::GET, "/ping", ping)?;
    table.register(Method::GET, "/time", time)?;
    table.register(Method::GET, "/sum", sum_query)?;
    table.register(Method::POST, "/echo", echo)?;
    table.register(Method::POST, "/sum", sum_body)?;
    Ok(table)
}

/// Liveness check with the current ISO-8601 timestamp
pub fn ping(_req: &ApiRequest) -> ApiResponse {
    let ts = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    ApiResponse::json(StatusCode::OK, json!({ "ok": true, "ts": ts }))
}

pub fn time(_req: &ApiRequest) -> ApiResponse {
    let server_time = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    ApiResponse::json(StatusCode::OK, json!({ "server_time": server_time }))
}

pub fn sum_query(req: &ApiRequest) -> ApiResponse {
    let a = req.query_param("a").and_then(parse_number);
    let b = req.query_param("b").and_then(parse_number);
    match (a, b) {
        (Some(a), Some(b)) => sum_response(a, b),
        _ => ApiResponse::bad_request(SUM_PARAMS_ERROR),
    }
}

pub fn echo(req: &ApiRequest) -> ApiResponse {
    match parse_json_body(req) {
        Ok(received) => ApiResponse::json(
            StatusCode::OK,
            json!({ "received": received, "method": "POST" }),
        ),
        Err(resp) => resp,
    }
}

pub fn sum_body(req: &ApiRequest) -> ApiResponse {
    let body = match parse_json_body(req) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let a = body.get("a").and_then(numeric_value);
    let b = body.get("b").and_then(numeric_value);
    match (a, b) {
        (Some(a), Some(b)) => sum_response(a, b),
        _ => ApiResponse::bad_request(SUM_BODY_ERROR),
    }
}

fn sum_response(a: f64, b: f64) -> ApiResponse {
    ApiResponse::json(StatusCode::OK, json!({ "a": a, "b": b, "sum": a + b }))
}

/// Blank body is an empty object; anything else must be valid JSON
fn parse_json_body(req: &ApiRequest) -> Result<Value, ApiResponse> {
    if req.body_is_blank() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(&req.body).map_err(|e| {
        ApiResponse::json(
            StatusCode::BAD_REQUEST,
            json!({ "error": "Invalid JSON", "details": e.to_string() }),
        )
    })
}

/// Finite number from text, surrounding whitespace allowed
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// JSON number or numeric string
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str) -> ApiRequest {
        ApiRequest::new(Method::GET, path)
    }

    fn post(path: &str, body: &'static str) -> ApiRequest {
        ApiRequest::new(Method::POST, path).with_body(body)
    }

    fn body(resp: &ApiResponse) -> &Value {
        resp.body.as_ref().unwrap()
    }

    #[test]
    fn test_build_route_table() {
        let table = build_route_table().unwrap();
        assert_eq!(table.routes().len(), 5);
        assert_eq!(table.methods_for_path("/sum"), vec![Method::GET, Method::POST]);
    }

    #[test]
    fn test_ping() {
        let resp = ping(&get("/ping"));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(body(&resp)["ok"], true);
        let ts = body(&resp)["ts"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "bad ts: {ts}");
    }

    #[test]
    fn test_time() {
        let resp = time(&get("/time"));
        assert_eq!(resp.status, StatusCode::OK);
        let server_time = body(&resp)["server_time"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(server_time, "%Y-%m-%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_sum_query() {
        let resp = sum_query(&get("/sum?a=2&b=3"));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(body(&resp), &json!({"a": 2.0, "b": 3.0, "sum": 5.0}));

        let resp = sum_query(&get("/sum?a=-1.5&b=%201e2"));
        assert_eq!(body(&resp)["sum"].as_f64(), Some(98.5));
    }

    #[test]
    fn test_sum_query_rejects_non_numbers() {
        for path in ["/sum?a=x&b=3", "/sum?a=1", "/sum", "/sum?a=inf&b=1", "/sum?a=NaN&b=1"] {
            let resp = sum_query(&get(path));
            assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{path}");
            assert_eq!(body(&resp), &json!({"error": SUM_PARAMS_ERROR}));
        }
    }

    #[test]
    fn test_echo() {
        let resp = echo(&post("/echo", r#"{"x":1}"#));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(body(&resp), &json!({"received": {"x": 1}, "method": "POST"}));
    }

    #[test]
    fn test_echo_empty_body_is_object() {
        let resp = echo(&post("/echo", ""));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(body(&resp)["received"], json!({}));
    }

    #[test]
    fn test_echo_any_shape() {
        let resp = echo(&post("/echo", "[1, \"two\", null]"));
        assert_eq!(body(&resp)["received"], json!([1, "two", null]));
    }

    #[test]
    fn test_echo_invalid_json() {
        let resp = echo(&post("/echo", "not json"));
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(body(&resp)["error"], "Invalid JSON");
        assert!(!body(&resp)["details"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_sum_body() {
        let resp = sum_body(&post("/sum", r#"{"a":"4","b":5}"#));
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(body(&resp), &json!({"a": 4.0, "b": 5.0, "sum": 9.0}));
    }

    #[test]
    fn test_sum_body_rejects_missing_or_non_numeric() {
        for payload in [
            "",
            "{}",
            r#"{"a":1}"#,
            r#"{"a":"x","b":1}"#,
            r#"{"a":true,"b":1}"#,
            r#"{"a":null,"b":1}"#,
            "[1,2]",
        ] {
            let resp = sum_body(&post("/sum", payload));
            assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body(&resp), &json!({"error": SUM_BODY_ERROR}));
        }
    }

    #[test]
    fn test_sum_body_invalid_json() {
        let resp = sum_body(&post("/sum", "{a:1"));
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(body(&resp)["error"], "Invalid JSON");
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value(&json!(2)), Some(2.0));
        assert_eq!(numeric_value(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(numeric_value(&json!("")), None);
        assert_eq!(numeric_value(&json!([1])), None);
    }
}
