//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight and health checks,
//! body size validation, then dispatch to the API or the frontend assets.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const HEALTH_PATH: &str = "/healthz";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    apply_common_headers(&mut response, &state);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = Body::size_hint(response.body()).exact().unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let http_config = &state.config.http;

    // 1. CORS preflight and OPTIONS probes
    if req.method() == Method::OPTIONS {
        return http::build_options_response(http_config.enable_cors);
    }

    // 2. Liveness
    if req.uri().path() == HEALTH_PATH {
        return http::build_health_response();
    }

    // 3. Declared body size
    if let Some(resp) = check_body_size(&req, http_config.max_body_size) {
        return resp;
    }

    // 4. API
    if api::is_api_path(req.uri().path()) {
        return api::handle_api(req, state).await;
    }

    // 5. Frontend assets
    match *req.method() {
        Method::GET | Method::HEAD => {
            let is_head = req.method() == Method::HEAD;
            static_files::serve_asset(req.uri().path(), is_head, &state.config.assets).await
        }
        ref method => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(http::STATIC_METHODS)
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(header::CONTENT_LENGTH)?;
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
                Some(http::build_413_response())
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

fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(header::SERVER, server);
    }
    if state.config.http.enable_cors {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}
