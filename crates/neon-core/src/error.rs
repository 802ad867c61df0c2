// SPDX-License-Identifier: AGPL-3.0-only
//! Error taxonomy shared by every NEON contract.
//!
//! Any error returned from a mutating operation means the operation had no
//! effect: the contract state is restored by [`crate::tx::Transactional`].

use crate::address::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which role check failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unauthorized {
    #[error("Ownable: caller is not the owner")]
    NotOwner,
    #[error("operator: caller is not the operator")]
    NotOperator,
    /// Referral ledger: caller is not in the registered operator set.
    #[error("Operator: caller is not the operator")]
    NotRegisteredOperator,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("{0} is the zero address")]
    ZeroAddress(&'static str),
    #[error("NEON::updateTransferTaxRate: Transfer tax rate must not exceed the maximum rate.")]
    TransferTaxRateTooHigh { rate: u16, max: u16 },
    #[error("NEON::updateBurnRate: Burn rate must not exceed the maximum rate.")]
    BurnRateTooHigh { rate: u16, max: u16 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitExceeded {
    #[error("NEON::antiWhale: Transfer amount exceeds the maxTransferAmount")]
    MaxTransferAmount { amount: u128, max: u128 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NeonError {
    #[error(transparent)]
    Unauthorized(#[from] Unauthorized),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error("transfer amount exceeds balance: have {available}, need {required}")]
    InsufficientBalance { available: u128, required: u128 },

    #[error("transfer amount exceeds allowance: have {available}, need {required}")]
    InsufficientAllowance { available: u128, required: u128 },

    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),

    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    #[error("no contract deployed at {0}")]
    UnknownContract(Address),

    #[error("action changes state and cannot run as a query")]
    NotAQuery,

    #[error("supply mismatch on {token}: balances sum to {sum} but total supply is {supply}")]
    SupplyMismatch {
        token: Address,
        sum: u128,
        supply: u128,
    },
}

impl NeonError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            NeonError::Unauthorized(_) => "unauthorized",
            NeonError::InvalidArgument(_) => "invalid_argument",
            NeonError::InsufficientBalance { .. } => "insufficient_balance",
            NeonError::InsufficientAllowance { .. } => "insufficient_allowance",
            NeonError::LimitExceeded(_) => "limit_exceeded",
            NeonError::Overflow(_) => "overflow",
            NeonError::UnknownContract(_) => "unknown_contract",
            NeonError::NotAQuery => "not_a_query",
            NeonError::SupplyMismatch { .. } => "supply_mismatch",
        }
    }

    pub(crate) fn zero_address(what: &'static str) -> Self {
        NeonError::InvalidArgument(InvalidArgument::ZeroAddress(what))
    }
}

pub type Result<T> = std::result::Result<T, NeonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_revert_strings() {
        assert_eq!(
            NeonError::from(Unauthorized::NotOwner).to_string(),
            "Ownable: caller is not the owner"
        );
        assert_eq!(
            NeonError::from(Unauthorized::NotOperator).to_string(),
            "operator: caller is not the operator"
        );
        assert_eq!(
            NeonError::from(Unauthorized::NotRegisteredOperator).to_string(),
            "Operator: caller is not the operator"
        );
        assert_eq!(
            NeonError::zero_address("NEON::transferOperator: new operator").to_string(),
            "NEON::transferOperator: new operator is the zero address"
        );
        assert_eq!(
            NeonError::from(LimitExceeded::MaxTransferAmount { amount: 251, max: 250 }).to_string(),
            "NEON::antiWhale: Transfer amount exceeds the maxTransferAmount"
        );
        assert_eq!(
            NeonError::from(InvalidArgument::TransferTaxRateTooHigh { rate: 1001, max: 1000 })
                .to_string(),
            "NEON::updateTransferTaxRate: Transfer tax rate must not exceed the maximum rate."
        );
        assert_eq!(
            NeonError::from(InvalidArgument::BurnRateTooHigh { rate: 101, max: 100 }).to_string(),
            "NEON::updateBurnRate: Burn rate must not exceed the maximum rate."
        );
    }

    #[test]
    fn test_kinds() {
        let limit = NeonError::from(LimitExceeded::MaxTransferAmount { amount: 251, max: 250 });
        assert_eq!(limit.kind(), "limit_exceeded");

        let rate = NeonError::from(InvalidArgument::BurnRateTooHigh { rate: 101, max: 100 });
        assert_eq!(rate.kind(), "invalid_argument");
        let mismatch = NeonError::SupplyMismatch {
            token: Address::from_seed("lp"),
            sum: 9,
            supply: 10,
        };
        assert_eq!(mismatch.kind(), "supply_mismatch");
        assert!(mismatch.to_string().contains("balances sum to 9 but total supply is 10"));
        assert_eq!(
            NeonError::InsufficientBalance { available: 1, required: 2 }.kind(),
            "insufficient_balance"
        );
    }
}
