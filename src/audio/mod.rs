//! Audio input handling.
//!
//! An `AudioInput` is the ephemeral payload handed to the upload stage:
//! raw bytes plus the declared media type and original filename. It is
//! validated against the configured size limit and audio-type requirement
//! before any network call happens.

use crate::workflow::WorkflowError;
use anyhow::{Context, Result};
use std::path::Path;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Map a file extension to a MIME type for upload.
pub fn media_type_for_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// A meeting recording staged for transcription upload.
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub filename: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl AudioInput {
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Load a recording from disk, inferring the media type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read audio file {:?}", path))?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        let media_type =
            media_type_for_extension(path.extension().and_then(|e| e.to_str())).to_string();

        Ok(Self {
            filename,
            media_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check the size limit and audio-type requirement.
    pub fn validate(&self, max_bytes: u64) -> Result<(), WorkflowError> {
        if self.size() > max_bytes {
            return Err(WorkflowError::validation(format!(
                "File size exceeds {}MB limit",
                max_bytes / BYTES_PER_MB
            )));
        }
        if !self.media_type.starts_with("audio/") {
            return Err(WorkflowError::validation(
                "Unsupported file type! Please upload a valid audio file.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_media_type_mapping() {
        assert_eq!(media_type_for_extension(Some("wav")), "audio/wav");
        assert_eq!(media_type_for_extension(Some("mp3")), "audio/mpeg");
        assert_eq!(media_type_for_extension(Some("exe")), "application/octet-stream");
        assert_eq!(media_type_for_extension(None), "application/octet-stream");
    }

    #[test]
    fn test_validate_accepts_small_audio() {
        let input = AudioInput::new("standup.wav", "audio/wav", vec![0u8; 2 * 1024 * 1024]);
        assert!(input.validate(25 * BYTES_PER_MB).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversize() {
        let input = AudioInput::new("allhands.wav", "audio/wav", vec![0u8; 30 * 1024 * 1024]);
        let err = input.validate(25 * BYTES_PER_MB).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "File size exceeds 25MB limit");
    }

    #[test]
    fn test_validate_rejects_non_audio() {
        let input = AudioInput::new("notes.pdf", "application/pdf", vec![1, 2, 3]);
        let err = input.validate(25 * BYTES_PER_MB).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[tokio::test]
    async fn test_from_path_infers_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.mp3");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really mp3 data").unwrap();

        let input = AudioInput::from_path(&path).await.unwrap();
        assert_eq!(input.filename, "meeting.mp3");
        assert_eq!(input.media_type, "audio/mpeg");
        assert_eq!(input.size(), 19);
    }
}
