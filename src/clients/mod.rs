//! Collaborator services the workflow calls but does not implement.
//!
//! Each boundary is a trait so the orchestrator stays testable against
//! in-process fakes; the HTTP implementations live alongside.

use crate::audio::AudioInput;
use crate::workflow::{EventRequest, MeetingAnalysis, WorkflowError};
use async_trait::async_trait;

pub mod calendar;
pub mod extraction;
pub mod transcription;

pub use calendar::{HttpCalendarClient, HttpTokenSource};
pub use extraction::HttpExtractionClient;
pub use transcription::HttpTranscriptionClient;

/// Speech-to-text service: audio bytes in, transcript text out.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(&self, input: &AudioInput) -> Result<String, WorkflowError>;
}

/// Language-understanding service: transcript in, analysis out.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    async fn analyze(
        &self,
        transcript: &str,
        entities: &[String],
    ) -> Result<MeetingAnalysis, WorkflowError>;
}

/// Calendar service: one batch of events per call, all-or-nothing from the
/// caller's perspective.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn schedule_events(&self, events: &[EventRequest]) -> Result<(), WorkflowError>;
}

/// Issues the bearer credential the calendar service may require.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, WorkflowError>;
}
