pub mod args;
pub mod config_show;
pub mod process;

pub use args::{Cli, CliCommand, ProcessCliArgs, ServeCliArgs};
pub use config_show::handle_config_command;
pub use process::handle_process_command;
