// SPDX-License-Identifier: AGPL-3.0-only
//! # NEON Locker
//!
//! Escrow for tokens (usually LP tokens). Anyone can lock by transferring to
//! the locker's address; only the owner can release, and a release always
//! moves the locker's entire holding of one token.
//!
//! Releasing a NEON balance goes through the NEON transfer rule, so it is
//! taxed and, unless the locker or recipient is excluded, anti-whale capped.

use crate::access::Ownable;
use crate::address::Address;
use crate::bep20::Fungible;
use crate::error::{NeonError, Result};
use crate::event::NeonEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeonLocker {
    address: Address,
    ownable: Ownable,
    #[serde(default)]
    events: Vec<NeonEvent>,
}

impl NeonLocker {
    pub fn new(deployer: Address, address: Address) -> Self {
        Self {
            address,
            ownable: Ownable::new(deployer),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn events(&self) -> &[NeonEvent] {
        &self.events
    }

    /// What the locker currently holds of `token`.
    pub fn locked_balance<T: Fungible + ?Sized>(&self, token: &T) -> u128 {
        token.balance_of(&self.address)
    }

    /// Release the full holding of `token` to `recipient`. Returns the amount
    /// debited from the locker; zero when there was nothing to release.
    pub fn unlock<T: Fungible + ?Sized>(
        &mut self,
        caller: &Address,
        token: &mut T,
        recipient: Address,
    ) -> Result<u128> {
        self.ownable.only_owner(caller)?;
        if recipient.is_zero() {
            return Err(NeonError::zero_address("unlock recipient"));
        }
        let amount = token.balance_of(&self.address);
        if amount == 0 {
            return Ok(0);
        }
        // The token transfer is the only fallible step after this point and it
        // rolls itself back, so the locker needs no snapshot of its own.
        token.transfer(&self.address, &recipient, amount)?;
        log::info!(
            "unlocked {} of token {} to {}",
            amount,
            token.address(),
            recipient
        );
        self.events.push(NeonEvent::Unlocked {
            token: token.address(),
            recipient,
            amount,
        });
        Ok(amount)
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        let ev = self.ownable.transfer_ownership(caller, new_owner)?;
        self.events.push(ev);
        Ok(())
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<()> {
        let ev = self.ownable.renounce_ownership(caller)?;
        self.events.push(ev);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::BURN_ADDRESS;
    use crate::bep20::{Bep20Token, TokenMetadata};
    use crate::error::Unauthorized;
    use crate::token::NeonToken;

    fn lp1(owner: Address) -> Bep20Token {
        Bep20Token::with_initial_supply(
            Address::derive_contract(&owner, 0),
            TokenMetadata {
                name: "LPToken".to_string(),
                symbol: "LP1".to_string(),
                decimals: 18,
            },
            owner,
            1_000_000,
        )
        .unwrap()
    }

    #[test]
    fn test_only_owner_unlock() {
        let owner = Address::from_seed("owner");
        let bob = Address::from_seed("bob");
        let carol = Address::from_seed("carol");
        let mut lp = lp1(owner);
        let mut locker = NeonLocker::new(owner, Address::derive_contract(&owner, 1));
        assert_eq!(locker.owner(), owner);

        lp.transfer(&owner, &locker.address(), 2_000).unwrap();
        assert_eq!(locker.locked_balance(&lp), 2_000);

        assert_eq!(
            locker.unlock(&bob, &mut lp, bob),
            Err(NeonError::Unauthorized(Unauthorized::NotOwner))
        );
        assert_eq!(locker.locked_balance(&lp), 2_000);

        assert_eq!(locker.unlock(&owner, &mut lp, carol), Ok(2_000));
        assert_eq!(lp.balance_of(&carol), 2_000);
        assert_eq!(lp.balance_of(&locker.address()), 0);
    }

    #[test]
    fn test_unlock_empty_is_noop() {
        let owner = Address::from_seed("owner");
        let mut lp = lp1(owner);
        let mut locker = NeonLocker::new(owner, Address::derive_contract(&owner, 1));
        assert_eq!(locker.unlock(&owner, &mut lp, owner), Ok(0));
        assert!(locker.events().is_empty());
    }

    #[test]
    fn test_unlock_to_zero_rejected() {
        let owner = Address::from_seed("owner");
        let mut lp = lp1(owner);
        let mut locker = NeonLocker::new(owner, Address::derive_contract(&owner, 1));
        lp.transfer(&owner, &locker.address(), 10).unwrap();
        assert_eq!(
            locker.unlock(&owner, &mut lp, Address::ZERO).unwrap_err().kind(),
            "invalid_argument"
        );
        assert_eq!(locker.locked_balance(&lp), 10);
    }

    #[test]
    fn test_unlock_neon_is_taxed() {
        let owner = Address::from_seed("owner");
        let carol = Address::from_seed("carol");
        let mut neon = NeonToken::new(owner, Address::derive_contract(&owner, 0));
        let mut locker = NeonLocker::new(owner, Address::derive_contract(&owner, 1));
        neon.mint(&owner, &locker.address(), 1_000).unwrap();

        assert_eq!(locker.unlock(&owner, &mut neon, carol), Ok(1_000));
        assert_eq!(neon.balance_of(&locker.address()), 0);
        assert_eq!(neon.balance_of(&carol), 950);
        assert_eq!(neon.balance_of(&BURN_ADDRESS), 10);
        assert_eq!(neon.balance_of(&neon.address()), 40);
    }

    #[test]
    fn test_unlock_neon_over_anti_whale_cap_fails_cleanly() {
        let owner = Address::from_seed("owner");
        let carol = Address::from_seed("carol");
        let mut neon = NeonToken::new(owner, Address::derive_contract(&owner, 0));
        let mut locker = NeonLocker::new(owner, Address::derive_contract(&owner, 1));
        neon.mint(&owner, &owner, 1_000_000).unwrap();
        neon.mint(&owner, &locker.address(), 10_000).unwrap();

        // cap is 5050, locker holds 10000
        assert_eq!(locker.unlock(&owner, &mut neon, carol).unwrap_err().kind(), "limit_exceeded");
        assert_eq!(locker.locked_balance(&neon), 10_000);
        assert!(locker.events().is_empty());

        neon.set_excluded_from_anti_whale(&owner, locker.address(), true)
            .unwrap();
        assert_eq!(locker.unlock(&owner, &mut neon, carol), Ok(10_000));
    }
}
