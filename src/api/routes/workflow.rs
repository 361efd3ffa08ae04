//! Workflow API endpoints — the entire surface the display layer consumes.
//!
//! - POST /process-audio      — upload a recording (multipart)
//! - PUT  /transcript         — edit the transcript directly
//! - POST /process-transcript — run extraction on the held transcript
//! - PATCH /actions           — edit one field of one action item
//! - POST /schedule           — submit the eligible batch to the calendar
//! - POST /reset              — back to a clean slate
//! - GET  /state              — full state snapshot

use axum::{
    extract::{Multipart, State},
    response::Json,
    routing::{get, patch, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::audio::AudioInput;
use crate::workflow::{ItemField, MeetingWorkflow, ScheduleResult};

/// Shared state for workflow routes.
#[derive(Clone)]
pub struct WorkflowApiState {
    pub workflow: Arc<MeetingWorkflow>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: String,
    #[serde(default)]
    pub entities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct EditActionRequest {
    pub index: usize,
    pub field: ItemField,
    pub value: String,
}

pub fn router(state: WorkflowApiState) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/process-audio", post(process_audio))
        .route("/transcript", put(set_transcript))
        .route("/process-transcript", post(process_transcript))
        .route("/actions", patch(edit_action))
        .route("/schedule", post(schedule))
        .route("/reset", post(reset))
        .with_state(state)
}

async fn get_state(State(state): State<WorkflowApiState>) -> Json<Value> {
    let snapshot = state.workflow.handle().snapshot().await;
    Json(json!(snapshot))
}

async fn process_audio(
    State(state): State<WorkflowApiState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut input: Option<AudioInput> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        // Both field names appear in the wild
        if name == "audio" || name == "file" {
            let filename = field.file_name().unwrap_or("audio").to_string();
            let media_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            input = Some(AudioInput::new(filename, media_type, bytes.to_vec()));
        }
    }

    let input = input
        .ok_or_else(|| ApiError::bad_request("Missing 'audio' field in multipart body"))?;

    info!("Audio upload received: {} ({} bytes)", input.filename, input.size());

    let success = state.workflow.process_audio(input).await;
    let snapshot = state.workflow.handle().snapshot().await;

    Ok(Json(json!({
        "success": success,
        "transcript": snapshot.transcript,
        "upload_attempts": snapshot.upload_attempts,
        "error": snapshot.upload.error,
    })))
}

async fn set_transcript(
    State(state): State<WorkflowApiState>,
    Json(req): Json<TranscriptRequest>,
) -> Json<Value> {
    state.workflow.set_transcript(req.transcript).await;
    if let Some(entities) = req.entities {
        state.workflow.set_entities(entities).await;
    }
    Json(json!({ "success": true }))
}

async fn process_transcript(State(state): State<WorkflowApiState>) -> Json<Value> {
    state.workflow.process_transcript().await;
    let snapshot = state.workflow.handle().snapshot().await;

    Json(json!({
        "success": snapshot.extract.error.is_none(),
        "summary": snapshot.summary,
        "actions": snapshot.items,
        "decisions": snapshot.decisions,
        "error": snapshot.extract.error,
    }))
}

async fn edit_action(
    State(state): State<WorkflowApiState>,
    Json(req): Json<EditActionRequest>,
) -> Json<Value> {
    state
        .workflow
        .edit_action(req.index, req.field, &req.value)
        .await;
    let snapshot = state.workflow.handle().snapshot().await;
    Json(json!({ "success": true, "actions": snapshot.items }))
}

async fn schedule(State(state): State<WorkflowApiState>) -> Json<Value> {
    let result = state.workflow.schedule().await;
    let snapshot = state.workflow.handle().snapshot().await;

    match result {
        ScheduleResult::Scheduled { count } => Json(json!({
            "success": true,
            "scheduled": count,
            "message": snapshot.schedule_notice,
        })),
        ScheduleResult::Failed { message } => Json(json!({
            "success": false,
            "error": message,
        })),
    }
}

async fn reset(State(state): State<WorkflowApiState>) -> Json<Value> {
    state.workflow.reset().await;
    Json(json!({ "success": true }))
}
