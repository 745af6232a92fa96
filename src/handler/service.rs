//! HTTP service entry point
//!
//! Glue between hyper and the dispatcher: read the request, dispatch it,
//! encode the response and write the access log line.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{header, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::dispatch;
use crate::config::AppState;
use crate::http::{self, ApiResponse};
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log.then(|| access_entry(&req, peer_addr));

    let api_response = match http::read_request(req, state.config.http.max_body_size).await {
        Ok(api_req) => {
            logger::log_debug(&format!("{} {}", api_req.method, api_req.raw_path));
            dispatch(&state.routes, &api_req, state.route_param())
        }
        Err(resp) => resp,
    };

    let response = http::build_response(&api_response, &state.config.http);

    if let Some(entry) = access_log {
        write_access_log(entry, &api_response, started, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Capture request details before the body is consumed
fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version()).trim_start_matches("HTTP/").to_string();
    entry.referer = header_value(header::REFERER);
    entry.user_agent = header_value(header::USER_AGENT);
    entry
}

fn write_access_log(
    mut entry: AccessLogEntry,
    resp: &ApiResponse,
    started: Instant,
    format: &str,
) {
    entry.status = resp.status.as_u16();
    entry.body_bytes = resp.body_string().len();
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);
}
