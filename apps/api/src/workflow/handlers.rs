//! Axum route handlers for the recruiting workflows.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::Document;
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobListing;
use crate::state::AppState;
use crate::workflow::orchestrator::{PersistenceStatus, RegisterInput, Workflow};
use crate::workflow::GenerationResult;

/// Upper bound on a register request body, résumé included.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub profile: Option<CandidateProfile>,
    /// The outreach email, or the whole answer when the output is delimited.
    pub email: String,
    pub persistence: PersistenceStatus,
    pub result: GenerationResult,
}

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub raw_text: String,
    pub store_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseJobResponse {
    pub job: JobListing,
    pub persisted_row: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub sales_notes: String,
    pub store_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub candidates_considered: usize,
    pub result: GenerationResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/register
///
/// Multipart fields: `notes` (text), `resume` (file, optional),
/// `store_name` (optional). Stores the candidate and returns the email draft.
pub async fn handle_register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RegisterResponse>, AppError> {
    let mut notes = String::new();
    let mut document = None;
    let mut store_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error("Failed to read multipart field", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "notes" => notes = read_text(field).await?,
            "store_name" => store_name = Some(read_text(field).await?),
            "resume" => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error("Invalid resume upload", e))?;
                if !bytes.is_empty() {
                    document = Some(Document {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    info!(
        "Register request: {} chars of notes, resume attached: {}",
        notes.chars().count(),
        document.is_some()
    );

    let config = state.workflow.for_store(store_name.as_deref());
    let outcome = Workflow::new(state.store.as_ref(), state.generator.as_ref(), &config)
        .register(RegisterInput { notes, document })
        .await?;

    Ok(Json(RegisterResponse {
        profile: outcome.profile,
        email: outcome.email,
        persistence: outcome.persistence,
        result: outcome.result,
    }))
}

/// POST /api/v1/jobs/parse
///
/// Converts a pasted job posting into a listing row and appends it.
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(request): Json<ParseJobRequest>,
) -> Result<Json<ParseJobResponse>, AppError> {
    let config = state.workflow.for_store(request.store_name.as_deref());
    let outcome = Workflow::new(state.store.as_ref(), state.generator.as_ref(), &config)
        .parse_job(&request.raw_text)
        .await?;

    Ok(Json(ParseJobResponse {
        job: outcome.job,
        persisted_row: outcome.persisted_row,
    }))
}

/// POST /api/v1/candidates/search
///
/// Ranks registered candidates against notes from a client meeting.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let config = state.workflow.for_store(request.store_name.as_deref());
    let outcome = Workflow::new(state.store.as_ref(), state.generator.as_ref(), &config)
        .search(&request.sales_notes)
        .await?;

    Ok(Json(SearchResponse {
        candidates_considered: outcome.candidates_considered,
        result: outcome.result,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| upload_error("Invalid text field", e))
}

fn upload_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "The upload exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}
