// SPDX-License-Identifier: AGPL-3.0-only
use crate::commands::load_config;
use crate::{print_info, print_success, ConfigCommands};
use neon_core::NeonConfig;
use std::path::Path;

pub fn handle(
    action: ConfigCommands,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigCommands::Init { output, force } => init(&output, force)?,
        ConfigCommands::Show => {
            let config = load_config(config_path)?;
            match config_path {
                Some(p) => print_info(&format!("config from {}", p.display())),
                None => print_info("default config with NEON_* overrides"),
            }
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

fn init(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }
    NeonConfig::default().save_to_file(output)?;
    print_success(&format!("wrote {}", output.display()));
    Ok(())
}
