// SPDX-License-Identifier: AGPL-3.0-only
use crate::commands::load_config;
use crate::{print_error, print_info, print_success};
use colored::*;
use neon_core::scenario::StepReport;
use neon_core::{Deployment, Scenario, BURN_ADDRESS};
use std::path::Path;

/// Replay `scenario_path`; returns whether every step met its expectation.
pub fn handle(
    scenario_path: &Path,
    config_path: Option<&Path>,
    show_events: bool,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let content = std::fs::read_to_string(scenario_path)
        .map_err(|e| format!("cannot read scenario {}: {}", scenario_path.display(), e))?;
    let sim = Scenario::from_json(&content)?.run(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sim.steps)?);
        return Ok(sim.passed());
    }

    let d = &sim.deployment;
    print_info(&format!("deployer {}", d.deployer()));
    println!("  {:<9} {}", "token".cyan(), d.token().address());
    println!("  {:<9} {}", "referral".cyan(), d.referral().address());
    println!("  {:<9} {}", "locker".cyan(), d.locker().address());
    println!();

    for step in &sim.steps {
        print_step(step, show_events);
    }
    println!();

    print_balances(d);

    match d.audit() {
        Ok(()) => print_success("supply audit passed"),
        Err(e) => print_error(&e.to_string()),
    }
    Ok(sim.passed())
}

fn print_step(step: &StepReport, show_events: bool) {
    let r = &step.response;
    let status = if r.success { "ok".green() } else { "fail".red() };
    let mark = if step.matches_expectation() {
        "".normal()
    } else {
        " (unexpected)".red().bold()
    };
    println!(
        "[{:>3}] {:<28} {:<5}{} {}",
        step.index, step.action, status, mark, r.message
    );
    if let Some(data) = &r.data {
        println!("      {} {}", "→".dimmed(), data);
    }
    if show_events {
        for ev in &r.events {
            let line = serde_json::to_string(ev).unwrap_or_default();
            println!("      {} {}", "·".dimmed(), line.dimmed());
        }
    }
}

fn print_balances(d: &Deployment) {
    let token = d.token();
    println!(
        "{} balances (total supply {})",
        token.metadata().symbol.bold(),
        token.total_supply()
    );
    for (account, balance) in token.balances() {
        if *balance == 0 {
            continue;
        }
        let label = if *account == token.address() {
            " (token contract)"
        } else if *account == BURN_ADDRESS {
            " (burn)"
        } else if *account == d.locker().address() {
            " (locker)"
        } else {
            ""
        };
        println!("  {} {:>30}{}", account, balance, label.dimmed());
    }
    for lp in d.bep20_tokens() {
        println!("{} balances", lp.metadata().symbol.bold());
        for (account, balance) in lp.balances() {
            if *balance > 0 {
                println!("  {} {:>30}", account, balance);
            }
        }
    }
}
