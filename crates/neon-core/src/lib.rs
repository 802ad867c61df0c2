// SPDX-License-Identifier: AGPL-3.0-only
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NEON - CORE
//
// In-process model of the NEON contracts:
// - NeonToken: BEP-20 with transfer tax, burn share and anti-whale cap
// - NeonLocker: owner-released escrow for any fungible token
// - OldSchoolReferral: operator-written referral ledger
// Every mutating call is all-or-nothing. All amounts are u128 atomic units
// and all rate arithmetic is truncating integer math.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod access;
pub mod action;
pub mod address;
pub mod bep20;
pub mod config;
pub mod deployment;
pub mod error;
pub mod event;
pub mod locker;
pub mod math;
pub mod referral;
pub mod scenario;
pub mod token;
pub mod tx;
pub mod u128_str;

pub use action::{ContractKind, NeonAction, NeonResponse};
pub use address::{Address, BURN_ADDRESS};
pub use bep20::{Bep20Token, Fungible, TokenMetadata};
pub use config::{ConfigError, NeonConfig};
pub use deployment::Deployment;
pub use error::{NeonError, Result};
pub use event::NeonEvent;
pub use locker::NeonLocker;
pub use referral::OldSchoolReferral;
pub use scenario::{Scenario, ScenarioError, Simulation};
pub use token::{NeonToken, TaxSplit, TokenSettings};
pub use tx::Transactional;
