//! Request extraction module
//!
//! Converts a hyper request into the transport-independent [`ApiRequest`]:
//! decoded query parameters and a fully collected, size-limited body.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Method, Request};
use std::collections::HashMap;

use super::response::ApiResponse;
use crate::logger;

/// A request as seen by the dispatcher and handlers
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Request target as received (path, possibly with query)
    pub raw_path: String,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, raw_path: &str) -> Self {
        Self {
            method,
            raw_path: raw_path.to_string(),
            query: parse_query(raw_path.split_once('?').map_or("", |(_, q)| q)),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The target to route on: the `route_param` query value when configured
    /// and present, the raw path otherwise
    pub fn route_target(&self, route_param: Option<&str>) -> &str {
        route_param
            .and_then(|param| self.query_param(param))
            .unwrap_or(&self.raw_path)
    }

    /// True for an absent or whitespace-only body
    pub fn body_is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Decode a query string; a repeated key keeps its last value
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Read a hyper request into an [`ApiRequest`].
///
/// Fails with a ready-made response when the body exceeds `max_body_size`
/// (413) or cannot be read (400).
pub async fn read_request<B>(req: Request<B>, max_body_size: u64) -> Result<ApiRequest, ApiResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(resp) = check_body_size(req.headers(), max_body_size) {
        return Err(resp);
    }

    let method = req.method().clone();
    let uri = req.uri();
    let raw_path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body too large (max: {max_body_size} bytes)"
            ));
            return Err(ApiResponse::payload_too_large(max_body_size));
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(ApiResponse::bad_request("Failed to read request body"));
        }
    };

    Ok(ApiRequest::new(method, &raw_path).with_body(body))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<ApiResponse> {
    let content_length = headers.get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(ApiResponse::payload_too_large(max_body_size))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
