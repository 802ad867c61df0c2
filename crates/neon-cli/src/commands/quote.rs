// SPDX-License-Identifier: AGPL-3.0-only
use crate::commands::load_config;
use crate::print_info;
use colored::*;
use neon_core::TaxSplit;
use std::path::Path;

pub fn handle(
    amount: u128,
    json: bool,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let split = TaxSplit::compute(amount, config.token.transfer_tax_rate, config.token.burn_rate)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&split)?);
        return Ok(());
    }

    print_info(&format!(
        "{} transfer at {} bps tax, {}% burn",
        config.token.symbol,
        config.token.transfer_tax_rate,
        config.token.burn_rate
    ));
    println!("  {:<10} {}", "amount".bold(), split.amount);
    println!("  {:<10} {}", "recipient".bold(), split.send.to_string().green());
    println!("  {:<10} {}", "tax".bold(), split.tax);
    println!("  {:<10} {}", "  burn".bold(), split.burn.to_string().red());
    println!("  {:<10} {}", "  liquify".bold(), split.liquify.to_string().yellow());
    Ok(())
}
