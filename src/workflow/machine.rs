//! Meeting workflow orchestrator.
//!
//! Drives the four-stage pipeline:
//! upload → extract → review (user edits, arbitrarily long) → schedule
//!
//! Each stage catches its own failures and records them in that stage's
//! status; a failure never corrupts state a prior stage committed. All
//! collaborators are injected via constructor — no concrete types hardcoded.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::audio::AudioInput;
use crate::clients::{CalendarClient, ExtractionClient, TranscriptionClient};

use super::items::{self, DurationBounds, ItemField};
use super::state::{
    WorkflowHandle, MSG_NO_ELIGIBLE_ACTIONS, MSG_TRANSCRIPT_INVALID,
};
use super::WorkflowError;

/// Upload-stage limits and retry behavior.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    /// Total network attempts per call; transport failures are retried up
    /// to this many times, collaborator rejections are not.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 25 * crate::audio::BYTES_PER_MB,
            max_attempts: 2,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Batch outcome of one scheduling run. Deliberately not per-item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleResult {
    Scheduled { count: usize },
    Failed { message: String },
}

pub struct MeetingWorkflow {
    transcription: Box<dyn TranscriptionClient>,
    extraction: Box<dyn ExtractionClient>,
    calendar: Box<dyn CalendarClient>,
    handle: WorkflowHandle,
    upload_policy: UploadPolicy,
    durations: DurationBounds,
}

impl MeetingWorkflow {
    pub fn new(
        transcription: Box<dyn TranscriptionClient>,
        extraction: Box<dyn ExtractionClient>,
        calendar: Box<dyn CalendarClient>,
        upload_policy: UploadPolicy,
        durations: DurationBounds,
    ) -> Self {
        Self {
            transcription,
            extraction,
            calendar,
            handle: WorkflowHandle::default(),
            upload_policy,
            durations,
        }
    }

    /// Shared state handle for API handlers and the display layer.
    pub fn handle(&self) -> WorkflowHandle {
        self.handle.clone()
    }

    /// Upload stage: validate, submit, store the transcript. Returns true
    /// on success. On failure the previous transcript is left untouched.
    pub async fn process_audio(&self, input: AudioInput) -> bool {
        if let Err(err) = input.validate(self.upload_policy.max_bytes) {
            warn!("Rejected audio input: {}", err);
            self.handle.fail_upload_validation(err.to_string()).await;
            return false;
        }

        if !self.handle.begin_upload().await {
            warn!("Upload already in progress, ignoring");
            return false;
        }

        let outcome = self.run_upload(&input).await;
        let ok = self.handle.finish_upload(outcome).await;
        if ok {
            info!("Transcript stored for {}", input.filename);
        }
        ok
    }

    async fn run_upload(&self, input: &AudioInput) -> Result<String, WorkflowError> {
        let max_attempts = self.upload_policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let total = self.handle.record_upload_attempt().await;
            debug!("Transcription attempt {} (lifetime attempt {})", attempt, total);

            match self.transcription.transcribe(input).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "Transcription attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, max_attempts, err, self.upload_policy.retry_delay
                    );
                    tokio::time::sleep(self.upload_policy.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Extraction stage: analyze the transcript currently held by the
    /// workflow. Fails fast on an empty transcript without touching the
    /// network; on collaborator failure any previous analysis survives.
    pub async fn process_transcript(&self) {
        let (transcript, entities) = self.handle.transcript_and_entities().await;
        if transcript.trim().is_empty() {
            warn!("Extraction requested with no transcript");
            self.handle
                .fail_extract_validation(MSG_TRANSCRIPT_INVALID.to_string())
                .await;
            return;
        }

        if !self.handle.begin_extract().await {
            warn!("Extraction already in progress, ignoring");
            return;
        }

        let outcome = self.extraction.analyze(&transcript, &entities).await;
        self.handle
            .finish_extract(outcome, self.durations.default)
            .await;
    }

    /// Review stage: apply one field edit through the pure transform.
    pub async fn edit_action(&self, idx: usize, field: ItemField, value: &str) {
        self.handle.edit_item(idx, field, value).await;
    }

    pub async fn set_transcript(&self, text: String) {
        self.handle.set_transcript(text).await;
    }

    pub async fn set_entities(&self, entities: Vec<String>) {
        self.handle.set_entities(entities).await;
    }

    pub async fn reset(&self) {
        self.handle.reset().await;
    }

    /// Scheduling stage: filter eligible items, derive local start/end
    /// instants, submit the batch in one call.
    pub async fn schedule(&self) -> ScheduleResult {
        let current = self.handle.items().await;
        let batch = items::eligible_events(&current, &self.durations);

        if batch.is_empty() {
            warn!("No eligible actions in {} items", current.len());
            self.handle
                .fail_schedule_validation(MSG_NO_ELIGIBLE_ACTIONS.to_string())
                .await;
            return ScheduleResult::Failed {
                message: MSG_NO_ELIGIBLE_ACTIONS.to_string(),
            };
        }

        if !self.handle.begin_schedule().await {
            warn!("Scheduling already in progress, ignoring");
            return ScheduleResult::Failed {
                message: "Scheduling already in progress".to_string(),
            };
        }

        info!("Submitting {} of {} actions for scheduling", batch.len(), current.len());
        let outcome = self.calendar.schedule_events(&batch).await;
        if self.handle.finish_schedule(outcome).await {
            ScheduleResult::Scheduled { count: batch.len() }
        } else {
            let state = self.handle.snapshot().await;
            ScheduleResult::Failed {
                message: state
                    .schedule
                    .error
                    .unwrap_or_else(|| "Error scheduling events".to_string()),
            }
        }
    }
}
