//! HTTP calendar client and token source.
//!
//! One POST per scheduling run carrying the whole eligible batch. When a
//! token endpoint is configured, a bearer credential is fetched first and a
//! failed fetch counts as a scheduling failure.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::{CalendarClient, TokenSource};
use crate::workflow::{EventRequest, WorkflowError};

const GENERIC_ERROR: &str = "Error scheduling events";

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    success: Option<bool>,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

/// Fetches `{ access_token }` from a token-issuing collaborator.
pub struct HttpTokenSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTokenSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    async fn access_token(&self) -> Result<String, WorkflowError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;

        let status = response.status();
        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;

        match parsed.access_token {
            Some(token) if status.is_success() => Ok(token),
            _ => {
                let message = parsed
                    .error
                    .unwrap_or_else(|| GENERIC_ERROR.to_string());
                error!("Token fetch failed with status {}: {}", status, message);
                Err(WorkflowError::collaborator(message))
            }
        }
    }
}

pub struct HttpCalendarClient {
    client: reqwest::Client,
    endpoint: String,
    token_source: Option<Box<dyn TokenSource>>,
}

impl HttpCalendarClient {
    pub fn new(endpoint: impl Into<String>, token_source: Option<Box<dyn TokenSource>>) -> Self {
        let endpoint = endpoint.into();
        info!("Calendar collaborator at {}", endpoint);
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token_source,
        }
    }
}

#[async_trait]
impl CalendarClient for HttpCalendarClient {
    async fn schedule_events(&self, events: &[EventRequest]) -> Result<(), WorkflowError> {
        debug!("Scheduling batch of {} events", events.len());

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "actions": events }));

        if let Some(source) = &self.token_source {
            let token = source.access_token().await?;
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;

        let parsed: ScheduleResponse = serde_json::from_str(&body).unwrap_or(ScheduleResponse {
            success: None,
            error: None,
            message: None,
        });

        if !status.is_success() || parsed.success == Some(false) {
            let message = parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| GENERIC_ERROR.to_string());
            error!("Scheduling failed with status {}: {}", status, message);
            return Err(WorkflowError::collaborator(message));
        }

        info!("Scheduled {} events", events.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_response_success() {
        let parsed: ScheduleResponse =
            serde_json::from_str(r#"{ "success": true, "scheduled": [] }"#).unwrap();
        assert_eq!(parsed.success, Some(true));
    }

    #[test]
    fn test_schedule_response_reported_failure() {
        let parsed: ScheduleResponse =
            serde_json::from_str(r#"{ "success": false, "error": "calendar unavailable" }"#)
                .unwrap();
        assert_eq!(parsed.success, Some(false));
        assert_eq!(parsed.error.as_deref(), Some("calendar unavailable"));
    }

    #[test]
    fn test_token_response() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{ "access_token": "abc123" }"#).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("abc123"));
    }
}
