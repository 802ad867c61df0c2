// SPDX-License-Identifier: AGPL-3.0-only
pub mod address;
pub mod config;
pub mod quote;
pub mod simulate;

use neon_core::{ConfigError, NeonConfig};
use std::path::Path;

/// Config from `path` when given, otherwise defaults plus `NEON_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<NeonConfig, ConfigError> {
    match path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            NeonConfig::load_from_file(p)
        }
        None => NeonConfig::load_from_env(),
    }
}
