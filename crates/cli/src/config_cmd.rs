//! `docent config` — validate and show the resolved configuration.

use std::path::Path;

use dc_domain::config::Config;

use crate::cli::ConfigCommand;

pub fn handle(path: &Path, command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Validate => {
            if !path.exists() {
                println!("{}: not found (defaults would be used)", path.display());
                return Ok(());
            }
            let raw = std::fs::read_to_string(path)?;
            match Config::from_toml(&raw) {
                Ok(_) => println!("{}: OK", path.display()),
                Err(e) => {
                    eprintln!("{}: {e}", path.display());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommand::Show => {
            let config = crate::bootstrap::load_config(path)?;
            print!("{}", toml::to_string_pretty(config.as_ref())?);
        }
    }
    Ok(())
}
