//! HTTP transcription client.
//!
//! Uploads the recording as a multipart form and expects either
//! `{ "transcript": "..." }` or `{ "error": "..." }` / non-2xx back.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, error, info};

use super::TranscriptionClient;
use crate::audio::AudioInput;
use crate::workflow::WorkflowError;

const GENERIC_ERROR: &str = "Error processing audio";

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    transcript: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranscriptionClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let endpoint = endpoint.into();
        info!("Transcription collaborator at {}", endpoint);
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl TranscriptionClient for HttpTranscriptionClient {
    async fn transcribe(&self, input: &AudioInput) -> Result<String, WorkflowError> {
        debug!(
            "Uploading {} ({} bytes, {})",
            input.filename,
            input.size(),
            input.media_type
        );

        let part = Part::bytes(input.bytes.clone())
            .file_name(input.filename.clone())
            .mime_str(&input.media_type)
            .map_err(|e| WorkflowError::transport(GENERIC_ERROR, e))?;
        let form = Form::new().part("audio", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", key);
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

        let parsed: TranscribeResponse = serde_json::from_str(&body).unwrap_or(
            TranscribeResponse {
                transcript: None,
                error: None,
                message: None,
            },
        );

        if !status.is_success() {
            let message = parsed
                .error
                .or(parsed.message)
                .unwrap_or_else(|| GENERIC_ERROR.to_string());
            error!("Transcription upload failed with status {}: {}", status, message);
            return Err(WorkflowError::collaborator(message));
        }

        match parsed.transcript {
            Some(text) => {
                let text = text.trim().to_string();
                info!("Transcription complete: {} chars", text.len());
                Ok(text)
            }
            None => {
                let message = parsed
                    .error
                    .or(parsed.message)
                    .unwrap_or_else(|| GENERIC_ERROR.to_string());
                error!("Transcription collaborator reported: {}", message);
                Err(WorkflowError::collaborator(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_transcript() {
        let parsed: TranscribeResponse =
            serde_json::from_str(r#"{ "transcript": "Bob needs to brush his teeth" }"#).unwrap();
        assert_eq!(
            parsed.transcript.as_deref(),
            Some("Bob needs to brush his teeth")
        );
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_response_parsing_error_field() {
        let parsed: TranscribeResponse =
            serde_json::from_str(r#"{ "error": "unsupported codec" }"#).unwrap();
        assert!(parsed.transcript.is_none());
        assert_eq!(parsed.error.as_deref(), Some("unsupported codec"));
    }
}
