//! Service wiring: build the workflow from config and run the API server.

use crate::api::ApiServer;
use crate::clients::{
    HttpCalendarClient, HttpExtractionClient, HttpTokenSource, HttpTranscriptionClient,
    TokenSource,
};
use crate::config::Config;
use crate::workflow::{DurationBounds, MeetingWorkflow, UploadPolicy};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run_service(port_override: Option<u16>) -> Result<()> {
    info!("Starting debrief service");

    let config = Config::load()?;
    let workflow = Arc::new(build_workflow(&config));
    let port = port_override.unwrap_or(config.server.port);

    let api_server = ApiServer::new(workflow, port);

    info!("debrief is ready");
    api_server.start().await
}

/// Assemble a workflow with HTTP collaborators from config.
pub fn build_workflow(config: &Config) -> MeetingWorkflow {
    let transcription = HttpTranscriptionClient::new(
        config.transcription.endpoint.clone(),
        config.transcription.api_key.clone(),
    );
    let extraction = HttpExtractionClient::new(config.extraction.endpoint.clone());

    let token_source: Option<Box<dyn TokenSource>> = config
        .calendar
        .token_endpoint
        .as_ref()
        .map(|endpoint| Box::new(HttpTokenSource::new(endpoint.clone())) as Box<dyn TokenSource>);
    let calendar = HttpCalendarClient::new(config.calendar.endpoint.clone(), token_source);

    let upload_policy = UploadPolicy {
        max_bytes: config.transcription.max_upload_mb * crate::audio::BYTES_PER_MB,
        max_attempts: config.transcription.max_attempts,
        retry_delay: Duration::from_secs(config.transcription.retry_delay_seconds),
    };
    let durations = DurationBounds {
        default: config.calendar.default_duration_minutes,
        min: config.calendar.min_duration_minutes,
        max: config.calendar.max_duration_minutes,
    };

    MeetingWorkflow::new(
        Box::new(transcription),
        Box::new(extraction),
        Box::new(calendar),
        upload_policy,
        durations,
    )
}
