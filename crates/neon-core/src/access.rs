// SPDX-License-Identifier: AGPL-3.0-only
//! Role guards: a single owner and a single operator.
//!
//! Guards are plain checks called at the top of each protected operation.
//! Role transfers return the event the owning contract must log.

use crate::address::Address;
use crate::error::{NeonError, Result, Unauthorized};
use crate::event::NeonEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Current owner; `Address::ZERO` once ownership is renounced.
    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn only_owner(&self, caller: &Address) -> Result<()> {
        // A renounced contract has no owner, not an owner at the zero address.
        if self.owner.is_zero() || *caller != self.owner {
            return Err(Unauthorized::NotOwner.into());
        }
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<NeonEvent> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(NeonError::zero_address("new owner"));
        }
        Ok(self.set_owner(new_owner))
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<NeonEvent> {
        self.only_owner(caller)?;
        Ok(self.set_owner(Address::ZERO))
    }

    fn set_owner(&mut self, new_owner: Address) -> NeonEvent {
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        log::info!("ownership transferred: {} -> {}", previous_owner, new_owner);
        NeonEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operated {
    operator: Address,
}

impl Operated {
    pub fn new(operator: Address) -> Self {
        Self { operator }
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    pub fn only_operator(&self, caller: &Address) -> Result<()> {
        if *caller != self.operator {
            return Err(Unauthorized::NotOperator.into());
        }
        Ok(())
    }

    pub fn transfer_operator(
        &mut self,
        caller: &Address,
        new_operator: Address,
    ) -> Result<NeonEvent> {
        self.only_operator(caller)?;
        if new_operator.is_zero() {
            return Err(NeonError::zero_address("NEON::transferOperator: new operator"));
        }
        let previous_operator = std::mem::replace(&mut self.operator, new_operator);
        log::info!("operator transferred: {} -> {}", previous_operator, new_operator);
        Ok(NeonEvent::OperatorTransferred {
            previous_operator,
            new_operator,
        })
    }
}
