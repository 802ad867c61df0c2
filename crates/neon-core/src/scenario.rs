// SPDX-License-Identifier: AGPL-3.0-only
//! Scripted replays against a fresh [`Deployment`].
//!
//! ```json
//! {
//!   "deployer": "@owner",
//!   "steps": [
//!     { "caller": "@owner", "action": "Mint", "to": "@alice", "amount": "10000000" },
//!     { "caller": "@alice", "action": "Transfer", "to": "$locker", "amount": "1000",
//!       "expect_success": true }
//!   ]
//! }
//! ```
//!
//! Any string value of the form `@label` is replaced by
//! `Address::from_seed(label)`; `$token`, `$referral` and `$locker` become the
//! deployed contract addresses. Plain `0x` addresses pass through. Values of
//! the free-text fields `name` and `symbol` are never rewritten.

use crate::action::{NeonAction, NeonResponse};
use crate::address::{Address, AddressParseError};
use crate::config::NeonConfig;
use crate::deployment::{Deployment, LOCKER_NONCE, REFERRAL_NONCE, TOKEN_NONCE};
use crate::error::NeonError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Seed used when a scenario names no deployer.
pub const DEFAULT_DEPLOYER_SEED: &str = "deployer";

/// Keys whose values are text, not addresses.
const LITERAL_KEYS: [&str; 2] = ["name", "symbol"];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid deployer: {0}")]
    Deployer(#[from] AddressParseError),
    #[error("deployer must be an address string, got {0}")]
    DeployerType(Value),
    #[error("deployment failed: {0}")]
    Deploy(#[from] NeonError),
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub deployer: Address,
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    pub caller: Address,
    /// When set, the step's outcome must match.
    #[serde(default)]
    pub expect_success: Option<bool>,
    #[serde(flatten)]
    pub action: NeonAction,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub caller: Address,
    pub action: String,
    pub expected: Option<bool>,
    pub response: NeonResponse,
}

impl StepReport {
    pub fn matches_expectation(&self) -> bool {
        self.expected.map_or(true, |e| e == self.response.success)
    }
}

pub struct Simulation {
    pub deployment: Deployment,
    pub steps: Vec<StepReport>,
}

impl Simulation {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(StepReport::matches_expectation)
    }
}

impl Scenario {
    /// Parse a scenario, expanding `@label` and `$contract` placeholders.
    pub fn from_json(input: &str) -> Result<Self, ScenarioError> {
        let mut value: Value = serde_json::from_str(input)?;
        let deployer = match value.get("deployer") {
            None | Some(Value::Null) => Address::from_seed(DEFAULT_DEPLOYER_SEED),
            Some(Value::String(raw)) => resolve_address(raw)?,
            Some(other) => return Err(ScenarioError::DeployerType(other.clone())),
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert("deployer".to_string(), Value::String(deployer.to_string()));
        }
        expand(&mut value, &deployer);
        Ok(serde_json::from_value(value)?)
    }

    /// Deploy from `config` and replay every step. Failed steps are recorded,
    /// never fatal.
    pub fn run(self, config: &NeonConfig) -> Result<Simulation, ScenarioError> {
        let mut deployment = Deployment::from_config(self.deployer, config)?;
        let mut steps = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.into_iter().enumerate() {
            let action = action_name(&step.action);
            log::debug!("step {}: {} by {}", index, action, step.caller);
            let response = deployment.execute(&step.caller, step.action);
            steps.push(StepReport {
                index,
                caller: step.caller,
                action,
                expected: step.expect_success,
                response,
            });
        }
        Ok(Simulation { deployment, steps })
    }
}

fn resolve_address(raw: &str) -> Result<Address, AddressParseError> {
    match raw.strip_prefix('@') {
        Some(label) => Ok(Address::from_seed(label)),
        None => raw.parse(),
    }
}

fn expand(value: &mut Value, deployer: &Address) {
    match value {
        Value::String(s) => {
            let replacement = if let Some(label) = s.strip_prefix('@') {
                Some(Address::from_seed(label))
            } else {
                match s.as_str() {
                    "$token" => Some(Address::derive_contract(deployer, TOKEN_NONCE)),
                    "$referral" => Some(Address::derive_contract(deployer, REFERRAL_NONCE)),
                    "$locker" => Some(Address::derive_contract(deployer, LOCKER_NONCE)),
                    _ => None,
                }
            };
            if let Some(addr) = replacement {
                *s = addr.to_string();
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| expand(v, deployer)),
        Value::Object(map) => map
            .iter_mut()
            .filter(|(key, _)| !LITERAL_KEYS.contains(&key.as_str()))
            .for_each(|(_, v)| expand(v, deployer)),
        _ => {}
    }
}

fn action_name(action: &NeonAction) -> String {
    serde_json::to_value(action)
        .ok()
        .and_then(|v| v.get("action").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "?".to_string())
}
