//! HTTP extraction client.
//!
//! Sends `{ transcript, entities }` as JSON and expects
//! `{ summary, actions, decisions }` back. Actions may arrive as bare
//! sentences or structured objects; both become `ActionItem`s.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::ExtractionClient;
use crate::workflow::{ActionItem, ActionItemInput, MeetingAnalysis, WorkflowError};

const GENERIC_ERROR: &str = "Error processing transcript";

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    summary: Vec<String>,
    #[serde(default)]
    actions: Vec<ActionItemInput>,
    #[serde(default)]
    decisions: Vec<String>,
    error: Option<String>,
    message: Option<String>,
}

pub struct HttpExtractionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExtractionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        info!("Extraction collaborator at {}", endpoint);
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl ExtractionClient for HttpExtractionClient {
    async fn analyze(
        &self,
        transcript: &str,
        entities: &[String],
    ) -> Result<MeetingAnalysis, WorkflowError> {
        debug!("Submitting transcript for analysis: {} chars", transcript.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "transcript": transcript, "entities": entities }))
            .send()
            .await
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ExtractResponse>(&body)
                .ok()
                .and_then(|r| r.error.or(r.message))
                .unwrap_or_else(|| GENERIC_ERROR.to_string());
            error!("Extraction failed with status {}: {}", status, message);
            return Err(WorkflowError::collaborator(message));
        }

        let parsed: ExtractResponse = serde_json::from_str(&body)
            .map_err(|_| WorkflowError::collaborator(GENERIC_ERROR))?;

        if let Some(message) = parsed.error.or(parsed.message) {
            error!("Extraction collaborator reported: {}", message);
            return Err(WorkflowError::collaborator(message));
        }

        let actions: Vec<ActionItem> = parsed.actions.into_iter().map(ActionItem::from).collect();
        info!(
            "Analysis received: {} summary sentences, {} actions, {} decisions",
            parsed.summary.len(),
            actions.len(),
            parsed.decisions.len()
        );

        Ok(MeetingAnalysis {
            summary: parsed.summary,
            decisions: parsed.decisions,
            actions,
        })
    }
}
