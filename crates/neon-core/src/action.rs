// SPDX-License-Identifier: AGPL-3.0-only
// ─────────────────────────────────────────────────────────────
// NEON ACTION ABI
// ─────────────────────────────────────────────────────────────
//
// JSON entry point into a [`crate::deployment::Deployment`]. Every mutating
// contract operation and every accessor has one variant; the caller is passed
// alongside, never inside, the action.
//
// Example:
//   {"action":"Transfer","to":"0x…","amount":"12345"}
//   {"action":"Unlock","token":"0x…","recipient":"0x…"}
//
// Token-facing variants take an optional `token`; when absent the NEON token
// is meant. Any other address must be a BEP-20 token created through
// `DeployBep20`.

use crate::address::Address;
use crate::error::NeonError;
use crate::event::NeonEvent;
use crate::u128_str;
use serde::{Deserialize, Serialize};

/// Which role-bearing contract an ownership action targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    #[default]
    Token,
    Referral,
    Locker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum NeonAction {
    // ── Plain BEP-20 deployment ──
    /// Create a plain BEP-20 token; the caller receives `total_supply`.
    DeployBep20 {
        name: String,
        symbol: String,
        #[serde(default = "default_decimals")]
        decimals: u8,
        #[serde(with = "u128_str")]
        total_supply: u128,
    },

    // ── Token transfers and allowances ──
    Mint {
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Transfer {
        #[serde(default)]
        token: Option<Address>,
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    TransferFrom {
        #[serde(default)]
        token: Option<Address>,
        from: Address,
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Approve {
        #[serde(default)]
        token: Option<Address>,
        spender: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    IncreaseAllowance {
        #[serde(default)]
        token: Option<Address>,
        spender: Address,
        #[serde(with = "u128_str")]
        added: u128,
    },
    DecreaseAllowance {
        #[serde(default)]
        token: Option<Address>,
        spender: Address,
        #[serde(with = "u128_str")]
        subtracted: u128,
    },

    // ── Roles ──
    TransferOwnership {
        #[serde(default)]
        contract: ContractKind,
        new_owner: Address,
    },
    RenounceOwnership {
        #[serde(default)]
        contract: ContractKind,
    },
    TransferOperator {
        new_operator: Address,
    },

    // ── Operator settings ──
    UpdateTransferTaxRate {
        rate: u16,
    },
    UpdateBurnRate {
        rate: u16,
    },
    UpdateMaxTransferAmountRate {
        rate: u16,
    },
    UpdateSwapAndLiquifyEnabled {
        enabled: bool,
    },
    SetExcludedFromAntiWhale {
        account: Address,
        excluded: bool,
    },
    UpdateMinAmountToLiquify {
        #[serde(with = "u128_str")]
        amount: u128,
    },
    UpdateOldSchoolRouter {
        router: Address,
    },

    // ── Referral ──
    RecordReferral {
        user: Address,
        referrer: Address,
    },
    RecordReferralCommission {
        referrer: Address,
        #[serde(with = "u128_str")]
        commission: u128,
    },
    UpdateOperator {
        operator: Address,
        status: bool,
    },

    // ── Locker ──
    Unlock {
        #[serde(default)]
        token: Option<Address>,
        recipient: Address,
    },

    // ── Read-only queries ──
    BalanceOf {
        #[serde(default)]
        token: Option<Address>,
        account: Address,
    },
    Allowance {
        #[serde(default)]
        token: Option<Address>,
        owner: Address,
        spender: Address,
    },
    TotalSupply {
        #[serde(default)]
        token: Option<Address>,
    },
    /// Metadata plus current settings of the NEON token.
    TokenInfo,
    MaxTransferAmount,
    IsExcludedFromAntiWhale {
        account: Address,
    },
    Quote {
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Owner {
        #[serde(default)]
        contract: ContractKind,
    },
    Operator,
    IsOperator {
        account: Address,
    },
    GetReferrer {
        user: Address,
    },
    ReferralsCount {
        referrer: Address,
    },
    TotalReferralCommissions {
        referrer: Address,
    },
    LockedBalance {
        #[serde(default)]
        token: Option<Address>,
    },
}

fn default_decimals() -> u8 {
    18
}

impl NeonAction {
    /// True for variants that never change state.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            NeonAction::BalanceOf { .. }
                | NeonAction::Allowance { .. }
                | NeonAction::TotalSupply { .. }
                | NeonAction::TokenInfo
                | NeonAction::MaxTransferAmount
                | NeonAction::IsExcludedFromAntiWhale { .. }
                | NeonAction::Quote { .. }
                | NeonAction::Owner { .. }
                | NeonAction::Operator
                | NeonAction::IsOperator { .. }
                | NeonAction::GetReferrer { .. }
                | NeonAction::ReferralsCount { .. }
                | NeonAction::TotalReferralCommissions { .. }
                | NeonAction::LockedBalance { .. }
        )
    }
}

/// Result of one [`NeonAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeonResponse {
    pub success: bool,
    /// JSON-encoded return data (balance, split, address, ...)
    #[serde(default)]
    pub data: Option<String>,
    pub message: String,
    /// `NeonError::kind()` of the failure.
    #[serde(default)]
    pub error_kind: Option<String>,
    /// Events emitted during this call, across all contracts.
    #[serde(default)]
    pub events: Vec<NeonEvent>,
}

impl NeonResponse {
    pub fn ok(message: impl Into<String>, data: Option<String>, events: Vec<NeonEvent>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            error_kind: None,
            events,
        }
    }

    pub fn failure(err: &NeonError) -> Self {
        Self {
            success: false,
            data: None,
            message: err.to_string(),
            error_kind: Some(err.kind().to_string()),
            events: Vec::new(),
        }
    }
}
