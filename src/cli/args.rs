use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "debrief")]
#[command(about = "Turn meeting recordings into scheduled follow-up actions", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the upload and extraction stages on a recording, print the results
    Process(ProcessCliArgs),
    /// Start the HTTP service the review UI talks to (default)
    Serve(ServeCliArgs),
    /// Show the resolved configuration
    Config,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct ProcessCliArgs {
    /// Path to the recorded meeting audio file
    pub file: PathBuf,
    /// Stop after transcription, skip the extraction stage
    #[arg(long)]
    pub transcript_only: bool,
    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ServeCliArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}
