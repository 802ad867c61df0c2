// SPDX-License-Identifier: AGPL-3.0-only
//! Deployment configuration.
//!
//! ```toml
//! [token]
//! name = "NEON Token"
//! symbol = "NEON"
//! decimals = 18
//! transfer_tax_rate = 500          # bps, max 1000
//! burn_rate = 20                   # percent of the tax, max 100
//! max_transfer_amount_rate = 50    # bps of total supply
//! swap_and_liquify_enabled = false
//! min_amount_to_liquify = "500000000000000000000"
//! ```
//!
//! Every field is optional and falls back to the NEON defaults.

use crate::bep20::TokenMetadata;
use crate::token::{
    neon_metadata, TokenSettings, DEFAULT_BURN_RATE, DEFAULT_MAX_TRANSFER_AMOUNT_RATE,
    DEFAULT_MIN_AMOUNT_TO_LIQUIFY, DEFAULT_TRANSFER_TAX_RATE,
};
use crate::u128_str;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode TOML: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{var}: {reason}")]
    Env { var: &'static str, reason: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeonConfig {
    #[serde(default)]
    pub token: TokenConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub transfer_tax_rate: u16,
    pub burn_rate: u16,
    pub max_transfer_amount_rate: u16,
    pub swap_and_liquify_enabled: bool,
    #[serde(with = "u128_str")]
    pub min_amount_to_liquify: u128,
}

impl Default for TokenConfig {
    fn default() -> Self {
        let meta = neon_metadata();
        Self {
            name: meta.name,
            symbol: meta.symbol,
            decimals: meta.decimals,
            transfer_tax_rate: DEFAULT_TRANSFER_TAX_RATE,
            burn_rate: DEFAULT_BURN_RATE,
            max_transfer_amount_rate: DEFAULT_MAX_TRANSFER_AMOUNT_RATE,
            swap_and_liquify_enabled: false,
            min_amount_to_liquify: DEFAULT_MIN_AMOUNT_TO_LIQUIFY,
        }
    }
}

impl TokenConfig {
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }

    pub fn settings(&self) -> TokenSettings {
        TokenSettings {
            transfer_tax_rate: self.transfer_tax_rate,
            burn_rate: self.burn_rate,
            max_transfer_amount_rate: self.max_transfer_amount_rate,
            swap_and_liquify_enabled: self.swap_and_liquify_enabled,
            min_amount_to_liquify: self.min_amount_to_liquify,
        }
    }
}

impl NeonConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: NeonConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `NEON_*` environment variables.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; `load_from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut token = TokenConfig::default();
        if let Some(v) = lookup("NEON_TOKEN_NAME") {
            token.name = v;
        }
        if let Some(v) = lookup("NEON_TOKEN_SYMBOL") {
            token.symbol = v;
        }
        if let Some(v) = lookup("NEON_TOKEN_DECIMALS") {
            token.decimals = parse_var("NEON_TOKEN_DECIMALS", &v)?;
        }
        if let Some(v) = lookup("NEON_TRANSFER_TAX_RATE") {
            token.transfer_tax_rate = parse_var("NEON_TRANSFER_TAX_RATE", &v)?;
        }
        if let Some(v) = lookup("NEON_BURN_RATE") {
            token.burn_rate = parse_var("NEON_BURN_RATE", &v)?;
        }
        if let Some(v) = lookup("NEON_MAX_TRANSFER_AMOUNT_RATE") {
            token.max_transfer_amount_rate = parse_var("NEON_MAX_TRANSFER_AMOUNT_RATE", &v)?;
        }
        if let Some(v) = lookup("NEON_SWAP_AND_LIQUIFY_ENABLED") {
            token.swap_and_liquify_enabled = parse_var("NEON_SWAP_AND_LIQUIFY_ENABLED", &v)?;
        }
        if let Some(v) = lookup("NEON_MIN_AMOUNT_TO_LIQUIFY") {
            token.min_amount_to_liquify = parse_var("NEON_MIN_AMOUNT_TO_LIQUIFY", &v)?;
        }
        let config = NeonConfig { token };
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.token;
        if t.name.is_empty() || t.name.len() > 64 {
            return Err(ConfigError::Invalid("token.name must be 1-64 characters".to_string()));
        }
        if t.symbol.is_empty() || t.symbol.len() > 8 {
            return Err(ConfigError::Invalid("token.symbol must be 1-8 characters".to_string()));
        }
        if t.decimals > 18 {
            return Err(ConfigError::Invalid("token.decimals must be 0-18".to_string()));
        }
        t.settings()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: e.to_string(),
    })
}
