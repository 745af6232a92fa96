//! HTTP response building module
//!
//! [`ApiResponse`] is what handlers and the dispatcher produce. It is turned
//! into a hyper response here, where the JSON encoding and the CORS headers
//! shared by every route are applied.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderName};
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

use crate::config::HttpConfig;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// A terminal response: status, extra headers and an optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, String)>,
    /// `None` means an empty body
    pub body: Option<Value>,
}

impl ApiResponse {
    pub const fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub const fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[cfg(test)]
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Compact JSON body, empty string for an empty body
    pub fn body_string(&self) -> String {
        self.body.as_ref().map(Value::to_string).unwrap_or_default()
    }

    /// 400 with an `error` message
    pub fn bad_request(message: &str) -> Self {
        Self::json(StatusCode::BAD_REQUEST, json!({ "error": message }))
    }

    /// 413 Payload Too Large
    pub fn payload_too_large(max_body_size: u64) -> Self {
        Self::json(
            StatusCode::PAYLOAD_TOO_LARGE,
            json!({ "error": "Payload too large", "max_body_size": max_body_size }),
        )
    }
}

/// Build the hyper response, adding content type, CORS and server headers
pub fn build_response(resp: &ApiResponse, http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(resp.status)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, &http.cors_origin)
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS)
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS)
        .header(header::SERVER, &http.server_name);

    for (name, value) in &resp.headers {
        builder = builder.header(name, value);
    }

    builder
        .body(Full::new(Bytes::from(resp.body_string())))
        .unwrap_or_else(|e| {
            log_build_error(resp.status, &e);
            let mut fallback = Response::new(Full::new(Bytes::from(
                r#"{"error":"Internal server error"}"#,
            )));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
