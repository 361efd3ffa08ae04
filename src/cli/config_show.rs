//! CLI handler for inspecting the resolved configuration.

use anyhow::Result;

use crate::config::Config;
use crate::global;

pub fn handle_config_command() -> Result<()> {
    let config = Config::load()?;
    println!("# {}", global::config_file()?.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
