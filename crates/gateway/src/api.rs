//! Question-answering endpoints.
//!
//! Request and response bodies use the camelCase field names the web client
//! sends; the older snake_case Romanian names are accepted as aliases.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use consilium_core::error::Error;
use consilium_core::record::HclId;
use consilium_core::taxonomy::Language;
use consilium_pipeline::Answer;

use crate::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractInfoRequest {
    #[serde(alias = "interogare_utilizator")]
    pub query: String,

    #[serde(default, alias = "english")]
    pub use_english: bool,
}

#[derive(Debug, Deserialize)]
pub struct TimparkRequest {
    #[serde(alias = "interogare_utilizator")]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub final_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub identifiers: Vec<HclId>,
}

impl From<Answer> for AnswerResponse {
    fn from(answer: Answer) -> Self {
        Self {
            final_answer: answer.text,
            category: answer.category.map(|c| c.as_str().to_string()),
            identifiers: answer.identifiers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a pipeline failure onto a status code and a message safe to show
/// to the caller.
fn error_response(err: Error) -> ApiError {
    match err {
        Error::Classification(e) => {
            warn!(error = %e, "Query could not be classified");
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Could not classify the query into a known category: {e}"),
            )
        }
        Error::MissingDataset { path } => {
            error!(path = %path.display(), "Dataset missing");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The decision dataset for this request is not available",
            )
        }
        Error::Provider(e) => {
            error!(error = %e, "Language model request failed");
            api_error(
                StatusCode::BAD_GATEWAY,
                "The language model service is unavailable, try again later",
            )
        }
        other => {
            error!(error = %other, "Request failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn require_query(query: &str) -> Result<(), ApiError> {
    if query.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "query must not be empty"));
    }
    Ok(())
}

pub async fn extract_info_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ExtractInfoRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    require_query(&payload.query)?;
    let language = Language::from_english_flag(payload.use_english);
    info!(%language, query_len = payload.query.len(), "extract-info request");

    let answer = state
        .pipeline
        .answer(&payload.query, language)
        .await
        .map_err(error_response)?;

    Ok(Json(answer.into()))
}

pub async fn extract_timpark_info_handler(
    State(state): State<SharedState>,
    Json(payload): Json<TimparkRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    require_query(&payload.query)?;
    info!(query_len = payload.query.len(), "extract-timpark-info request");

    let answer = state
        .pipeline
        .answer_timpark(&payload.query)
        .await
        .map_err(error_response)?;

    Ok(Json(answer.into()))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
