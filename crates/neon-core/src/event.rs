// SPDX-License-Identifier: AGPL-3.0-only
//! Events emitted by successful contract operations.
//!
//! Each contract appends to its own log. A failed operation is rolled back
//! together with any event it had pushed.

use crate::address::Address;
use crate::u128_str;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum NeonEvent {
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    OperatorTransferred {
        previous_operator: Address,
        new_operator: Address,
    },
    TransferTaxRateUpdated {
        operator: Address,
        previous_rate: u16,
        new_rate: u16,
    },
    BurnRateUpdated {
        operator: Address,
        previous_rate: u16,
        new_rate: u16,
    },
    MaxTransferAmountRateUpdated {
        operator: Address,
        previous_rate: u16,
        new_rate: u16,
    },
    SwapAndLiquifyEnabledUpdated {
        operator: Address,
        enabled: bool,
    },
    MinAmountToLiquifyUpdated {
        operator: Address,
        #[serde(with = "u128_str")]
        previous_amount: u128,
        #[serde(with = "u128_str")]
        new_amount: u128,
    },
    OldSchoolRouterUpdated {
        operator: Address,
        router: Address,
    },
    ExcludedFromAntiWhale {
        account: Address,
        excluded: bool,
    },
    ReferralRecorded {
        user: Address,
        referrer: Address,
    },
    ReferralCommissionRecorded {
        referrer: Address,
        #[serde(with = "u128_str")]
        commission: u128,
    },
    OperatorUpdated {
        operator: Address,
        status: bool,
    },
    Unlocked {
        token: Address,
        recipient: Address,
        #[serde(with = "u128_str")]
        amount: u128,
    },
}
