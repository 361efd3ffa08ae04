//! CLI handler for one-shot processing of a recording.
//!
//! Runs the upload and extraction stages against the configured
//! collaborators and prints the transcript, summary, decisions, and action
//! items. Scheduling stays interactive — it needs the review step.

use anyhow::{bail, Result};
use serde_json::json;

use crate::app::build_workflow;
use crate::audio::AudioInput;
use crate::cli::args::ProcessCliArgs;
use crate::config::Config;

pub async fn handle_process_command(args: ProcessCliArgs) -> Result<()> {
    let config = Config::load()?;
    let workflow = build_workflow(&config);

    let input = AudioInput::from_path(&args.file).await?;
    if !workflow.process_audio(input).await {
        let state = workflow.handle().snapshot().await;
        bail!(
            "Transcription failed after {} attempt(s): {}",
            state.upload_attempts,
            state
                .upload
                .error
                .unwrap_or_else(|| "unknown error".to_string())
        );
    }

    if !args.transcript_only {
        workflow.process_transcript().await;
    }

    let state = workflow.handle().snapshot().await;
    if let Some(err) = &state.extract.error {
        bail!("Analysis failed: {}", err);
    }

    if args.json {
        let output = json!({
            "transcript": state.transcript,
            "summary": state.summary,
            "decisions": state.decisions,
            "actions": state.items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Transcript\n----------\n{}\n", state.transcript);

    if !args.transcript_only {
        if !state.summary.is_empty() {
            println!("Summary\n-------");
            for line in &state.summary {
                println!("  - {}", line);
            }
            println!();
        }
        if !state.decisions.is_empty() {
            println!("Decisions\n---------");
            for line in &state.decisions {
                println!("  - {}", line);
            }
            println!();
        }
        if !state.items.is_empty() {
            println!("Action items\n------------");
            for (i, item) in state.items.iter().enumerate() {
                println!("  {}. {}", i + 1, item.text);
            }
        }
    }

    Ok(())
}
