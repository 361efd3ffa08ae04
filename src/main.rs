use anyhow::Result;
use clap::Parser;
use debrief::{
    app,
    cli::{handle_config_command, handle_process_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("debrief {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Process(args)) => handle_process_command(args).await,
        Some(CliCommand::Config) => handle_config_command(),
        Some(CliCommand::Serve(args)) => app::run_service(args.port).await,
        None => app::run_service(None).await,
    }
}
