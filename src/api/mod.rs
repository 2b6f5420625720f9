// API module entry
// JSON endpoints backed by the language model

mod error;
mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::logger;

pub const API_PREFIX: &str = "/api/";
pub const ANALYZE_PATH: &str = "/api/analyze";
pub const SUGGEST_PATH: &str = "/api/suggest";

/// Whether a path belongs to the API rather than the frontend
pub fn is_api_path(path: &str) -> bool {
    path.starts_with(API_PREFIX) || path == "/api"
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    match (method, path.as_str()) {
        (Method::POST, ANALYZE_PATH) => handlers::handle_analyze(req, state).await,
        (Method::POST, SUGGEST_PATH) => handlers::handle_suggest(req, state).await,
        (method, ANALYZE_PATH | SUGGEST_PATH) => {
            logger::log_api_request(method.as_str(), &path, 405);
            response::method_not_allowed()
        }
        (method, _) => {
            logger::log_api_request(method.as_str(), &path, 404);
            response::not_found()
        }
    }
}
