//! Workflow state, phases, and the shared state handle.
//!
//! All mutable pipeline state lives in one `WorkflowState` behind a
//! `WorkflowHandle`. Stages never hold the lock across an await point:
//! each stage begins (flips its busy flag), runs its network call, then
//! settles the outcome in a second short critical section. That keeps the
//! busy flag truthful on every exit path and makes a prior stage's
//! committed data unreachable by a later stage's failure.

use crate::workflow::items::{self, ActionItem, ItemField, MeetingAnalysis};
use crate::workflow::WorkflowError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MSG_TRANSCRIPT_INVALID: &str = "Transcript is missing or invalid.";
pub const MSG_NO_ELIGIBLE_ACTIONS: &str = "No eligible actions to schedule.";
pub const MSG_SCHEDULED: &str = "Events scheduled successfully!";

/// Where the pipeline currently is.
///
/// `UploadFailed` and `ExtractFailed` permit re-invoking the same stage;
/// neither forces a restart from `Idle`. `Scheduled` flows back to
/// `Reviewing` as soon as the user edits again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Uploading,
    Transcribed,
    UploadFailed,
    Extracting,
    Analyzed,
    ExtractFailed,
    Reviewing,
    Scheduling,
    Scheduled,
    ScheduleFailed,
}

impl WorkflowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Transcribed => "transcribed",
            Self::UploadFailed => "upload_failed",
            Self::Extracting => "extracting",
            Self::Analyzed => "analyzed",
            Self::ExtractFailed => "extract_failed",
            Self::Reviewing => "reviewing",
            Self::Scheduling => "scheduling",
            Self::Scheduled => "scheduled",
            Self::ScheduleFailed => "schedule_failed",
        }
    }
}

/// Busy flag and last error for one stage. Exactly one message is visible
/// per stage at a time; a new attempt clears the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageStatus {
    pub busy: bool,
    pub error: Option<String>,
}

/// The whole in-memory workflow state, readable as a snapshot by the
/// display layer.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub phase: WorkflowPhase,
    pub transcript: String,
    pub entities: Vec<String>,
    pub summary: Vec<String>,
    pub decisions: Vec<String>,
    pub items: Vec<ActionItem>,
    pub upload_attempts: u32,
    pub upload: StageStatus,
    pub extract: StageStatus,
    pub schedule: StageStatus,
    /// Success notice from the last scheduling run, cleared on re-attempt.
    pub schedule_notice: Option<String>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            transcript: String::new(),
            entities: Vec::new(),
            summary: Vec::new(),
            decisions: Vec::new(),
            items: Vec::new(),
            upload_attempts: 0,
            upload: StageStatus::default(),
            extract: StageStatus::default(),
            schedule: StageStatus::default(),
            schedule_notice: None,
        }
    }
}

/// Clone-able handle sharing the workflow state between the orchestrator
/// and API handlers.
#[derive(Clone, Default)]
pub struct WorkflowHandle {
    inner: Arc<Mutex<WorkflowState>>,
}

impl WorkflowHandle {
    pub async fn snapshot(&self) -> WorkflowState {
        self.inner.lock().await.clone()
    }

    /// Read the transcript and entity hints as of right now, not as of when
    /// the stage was triggered.
    pub async fn transcript_and_entities(&self) -> (String, Vec<String>) {
        let state = self.inner.lock().await;
        (state.transcript.clone(), state.entities.clone())
    }

    pub async fn items(&self) -> Vec<ActionItem> {
        self.inner.lock().await.items.clone()
    }

    /// Direct transcript edit (the user may correct the text before
    /// analysis). Clears any stale upload error.
    pub async fn set_transcript(&self, text: String) {
        let mut state = self.inner.lock().await;
        state.transcript = text;
        state.upload.error = None;
        if !state.transcript.trim().is_empty()
            && matches!(
                state.phase,
                WorkflowPhase::Idle | WorkflowPhase::UploadFailed
            )
        {
            state.phase = WorkflowPhase::Transcribed;
        }
    }

    pub async fn set_entities(&self, entities: Vec<String>) {
        self.inner.lock().await.entities = entities;
    }

    // --- Upload stage ---

    /// Returns false when an upload is already in flight.
    pub async fn begin_upload(&self) -> bool {
        let mut state = self.inner.lock().await;
        if state.upload.busy {
            return false;
        }
        state.upload.busy = true;
        state.upload.error = None;
        state.phase = WorkflowPhase::Uploading;
        true
    }

    /// Bump the visible attempt counter; returns the new count.
    pub async fn record_upload_attempt(&self) -> u32 {
        let mut state = self.inner.lock().await;
        state.upload_attempts += 1;
        state.upload_attempts
    }

    /// Record a validation rejection that happened before any attempt.
    pub async fn fail_upload_validation(&self, message: String) {
        let mut state = self.inner.lock().await;
        state.upload.error = Some(message);
        state.phase = WorkflowPhase::UploadFailed;
    }

    /// Settle the upload. On success the transcript is replaced; on failure
    /// it is left untouched so a previous transcript is not silently lost.
    pub async fn finish_upload(&self, outcome: Result<String, WorkflowError>) -> bool {
        let mut state = self.inner.lock().await;
        state.upload.busy = false;
        match outcome {
            Ok(transcript) => {
                state.transcript = transcript;
                state.upload.error = None;
                state.phase = WorkflowPhase::Transcribed;
                true
            }
            Err(err) => {
                state.upload.error = Some(err.to_string());
                state.phase = WorkflowPhase::UploadFailed;
                false
            }
        }
    }

    // --- Extraction stage ---

    pub async fn begin_extract(&self) -> bool {
        let mut state = self.inner.lock().await;
        if state.extract.busy {
            return false;
        }
        state.extract.busy = true;
        state.extract.error = None;
        state.phase = WorkflowPhase::Extracting;
        true
    }

    pub async fn fail_extract_validation(&self, message: String) {
        let mut state = self.inner.lock().await;
        state.extract.error = Some(message);
        state.phase = WorkflowPhase::ExtractFailed;
    }

    /// Settle the extraction. Success replaces summary/decisions/items
    /// atomically (items normalized once on receipt); failure leaves any
    /// previously extracted analysis intact.
    pub async fn finish_extract(
        &self,
        outcome: Result<MeetingAnalysis, WorkflowError>,
        default_duration: u32,
    ) {
        let mut state = self.inner.lock().await;
        state.extract.busy = false;
        match outcome {
            Ok(analysis) => {
                state.summary = analysis.summary;
                state.decisions = analysis.decisions;
                state.items = items::normalize(&analysis.actions, default_duration);
                state.extract.error = None;
                state.phase = WorkflowPhase::Analyzed;
            }
            Err(err) => {
                state.extract.error = Some(err.to_string());
                state.phase = WorkflowPhase::ExtractFailed;
            }
        }
    }

    // --- Review stage ---

    /// Apply a single-field edit through the pure transform. Skips the
    /// write when nothing changed, so redundant edits cause no state churn.
    pub async fn edit_item(&self, idx: usize, field: ItemField, value: &str) {
        let mut state = self.inner.lock().await;
        let updated = items::edit_field(&state.items, idx, field, value);
        if updated != state.items {
            state.items = updated;
            if matches!(
                state.phase,
                WorkflowPhase::Analyzed | WorkflowPhase::Scheduled | WorkflowPhase::ScheduleFailed
            ) {
                state.phase = WorkflowPhase::Reviewing;
            }
        }
    }

    // --- Scheduling stage ---

    pub async fn begin_schedule(&self) -> bool {
        let mut state = self.inner.lock().await;
        if state.schedule.busy {
            return false;
        }
        state.schedule.busy = true;
        state.schedule.error = None;
        state.schedule_notice = None;
        state.phase = WorkflowPhase::Scheduling;
        true
    }

    pub async fn fail_schedule_validation(&self, message: String) {
        let mut state = self.inner.lock().await;
        state.schedule.error = Some(message);
        state.schedule_notice = None;
        state.phase = WorkflowPhase::ScheduleFailed;
    }

    /// Settle the scheduling batch. Batch-level only: one notice or one
    /// aggregated error, never per-item outcomes.
    pub async fn finish_schedule(&self, outcome: Result<(), WorkflowError>) -> bool {
        let mut state = self.inner.lock().await;
        state.schedule.busy = false;
        match outcome {
            Ok(()) => {
                state.schedule.error = None;
                state.schedule_notice = Some(MSG_SCHEDULED.to_string());
                state.phase = WorkflowPhase::Scheduled;
                true
            }
            Err(err) => {
                state.schedule.error = Some(err.to_string());
                state.phase = WorkflowPhase::ScheduleFailed;
                false
            }
        }
    }

    /// Back to a clean slate (the user starts over with a new recording).
    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        *state = WorkflowState::default();
    }
}
