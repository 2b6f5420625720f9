// Task API handlers module
// validate -> build prompt -> invoke model -> parse -> respond

use chrono::Local;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use super::error::{ApiError, Operation};
use super::response::{from_error, json_response};
use super::types::{required_text, PARTIAL_TASK_FIELD, TASK_TEXT_FIELD};
use super::{ANALYZE_PATH, SUGGEST_PATH};
use crate::config::AppState;
use crate::logger;
use crate::model::ModelRequest;
use crate::prompts;
use crate::schema::{self, SuggestionList, TaskAnalysis, SUGGESTION_LIST, TASK_ANALYSIS};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// POST /api/analyze
pub async fn handle_analyze<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    respond(ANALYZE_PATH, analyze(req, state).await)
}

/// POST /api/suggest
pub async fn handle_suggest<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    respond(SUGGEST_PATH, suggest(req, state).await)
}

async fn analyze<B>(req: Request<B>, state: &AppState) -> Result<TaskAnalysis, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body = read_json_body(req, state.config.http.max_body_size).await?;
    let task_text =
        required_text(&body, TASK_TEXT_FIELD).ok_or(ApiError::MissingField(TASK_TEXT_FIELD))?;

    let today = Local::now().format("%Y-%m-%d").to_string();
    let request = ModelRequest::new(prompts::analysis_instruction(&today), task_text)
        .with_temperature(prompts::ANALYSIS_TEMPERATURE);

    let raw = invoke_model(state, &request, Operation::Analysis, ANALYZE_PATH).await?;
    Ok(schema::parse(&TASK_ANALYSIS, &raw)?)
}

async fn suggest<B>(req: Request<B>, state: &AppState) -> Result<SuggestionList, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let body = read_json_body(req, state.config.http.max_body_size).await?;
    let partial_task = required_text(&body, PARTIAL_TASK_FIELD)
        .ok_or(ApiError::MissingField(PARTIAL_TASK_FIELD))?;

    let request = ModelRequest::new(prompts::suggestion_instruction(), partial_task);

    let raw = invoke_model(state, &request, Operation::Suggestion, SUGGEST_PATH).await?;
    Ok(schema::parse(&SUGGESTION_LIST, &raw)?)
}

async fn invoke_model(
    state: &AppState,
    request: &ModelRequest,
    operation: Operation,
    path: &str,
) -> Result<String, ApiError> {
    let started = Instant::now();
    let result = state.provider.generate(request).await;
    logger::log_model_call(state.provider.name(), path, started.elapsed().as_millis());
    result.map_err(|source| ApiError::Provider { operation, source })
}

/// Read the request body as JSON, enforcing the size limit.
///
/// An empty body reads as `{}` so it fails on the missing field rather than
/// on JSON syntax.
async fn read_json_body<B>(req: Request<B>, max_body_size: u64) -> Result<Value, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(ApiError::PayloadTooLarge(max_body_size));
        }
        Err(e) => return Err(ApiError::InvalidBody(e.to_string())),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

fn respond<T: Serialize>(path: &str, result: Result<T, ApiError>) -> Response<Full<Bytes>> {
    match result {
        Ok(value) => {
            logger::log_api_request("POST", path, StatusCode::OK.as_u16());
            json_response(StatusCode::OK, &value)
        }
        Err(err) => {
            logger::log_api_request("POST", path, err.status().as_u16());
            from_error(path, &err)
        }
    }
}
