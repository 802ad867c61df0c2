// SPDX-License-Identifier: AGPL-3.0-only
//! Plain BEP-20 fungible token.
//!
//! Used directly for untaxed assets (LP tokens held by the locker) and as the
//! balance/allowance core that [`crate::token::NeonToken`] builds its transfer
//! rule on top of.

use crate::address::Address;
use crate::error::{NeonError, Result};
use crate::event::NeonEvent;
use crate::tx::{Transactional, UndoLog};
use crate::u128_str;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything the locker can hold and release.
pub trait Fungible {
    /// Contract address of the token.
    fn address(&self) -> Address;
    fn balance_of(&self, account: &Address) -> u128;
    /// Caller-authenticated transfer, all-or-nothing.
    fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bep20Token {
    address: Address,
    metadata: TokenMetadata,
    #[serde(with = "u128_str")]
    total_supply: u128,
    balances: BTreeMap<Address, u128>,
    /// owner → spender → remaining
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
    #[serde(default)]
    events: Vec<NeonEvent>,
    #[serde(skip)]
    undo: UndoLog<Bep20Undo>,
}

/// Prior value of one overwritten slot.
#[derive(Debug, Clone)]
enum Bep20Undo {
    Balance(Address, Option<u128>),
    Allowance {
        owner: Address,
        spender: Address,
        previous: Option<u128>,
    },
    TotalSupply(u128),
}

#[derive(Debug, Clone, Copy)]
pub struct Bep20Checkpoint {
    undo: usize,
    events: usize,
}

impl Transactional for Bep20Token {
    type Checkpoint = Bep20Checkpoint;

    fn checkpoint(&mut self) -> Bep20Checkpoint {
        Bep20Checkpoint {
            undo: self.undo.begin(),
            events: self.events.len(),
        }
    }

    fn commit(&mut self, _: Bep20Checkpoint) {
        self.undo.commit();
    }

    fn rollback(&mut self, checkpoint: Bep20Checkpoint) {
        for entry in self.undo.unwind(checkpoint.undo) {
            match entry {
                Bep20Undo::Balance(account, Some(previous)) => {
                    self.balances.insert(account, previous);
                }
                Bep20Undo::Balance(account, None) => {
                    self.balances.remove(&account);
                }
                Bep20Undo::Allowance {
                    owner,
                    spender,
                    previous,
                } => {
                    let spenders = self.allowances.entry(owner).or_default();
                    match previous {
                        Some(amount) => {
                            spenders.insert(spender, amount);
                        }
                        None => {
                            spenders.remove(&spender);
                        }
                    }
                    if spenders.is_empty() {
                        self.allowances.remove(&owner);
                    }
                }
                Bep20Undo::TotalSupply(previous) => self.total_supply = previous,
            }
        }
        self.events.truncate(checkpoint.events);
    }
}

impl Bep20Token {
    /// Empty token with zero supply.
    pub fn new(address: Address, metadata: TokenMetadata) -> Self {
        Self {
            address,
            metadata,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: Vec::new(),
            undo: UndoLog::default(),
        }
    }

    /// Token whose whole initial supply is minted to `holder`.
    pub fn with_initial_supply(
        address: Address,
        metadata: TokenMetadata,
        holder: Address,
        supply: u128,
    ) -> Result<Self> {
        let mut token = Self::new(address, metadata);
        token.mint(&holder, supply)?;
        Ok(token)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Every account with a recorded balance, in address order.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &u128)> {
        self.balances.iter()
    }

    pub fn events(&self) -> &[NeonEvent] {
        &self.events
    }

    /// Sum of every balance; equals `total_supply` in a consistent ledger.
    pub fn balance_sum(&self) -> u128 {
        self.balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    /// Supply invariant: balances sum to total supply.
    pub fn audit_supply(&self) -> Result<()> {
        let sum = self.balance_sum();
        if sum != self.total_supply {
            return Err(NeonError::SupplyMismatch {
                token: self.address,
                sum,
                supply: self.total_supply,
            });
        }
        Ok(())
    }

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()> {
        self.transact(|t| t.move_balance(caller, to, amount))
    }

    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u128) -> Result<()> {
        self.transact(|t| t.set_allowance(caller, spender, amount))
    }

    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: u128,
    ) -> Result<()> {
        self.transact(|t| {
            let current = t.allowance(caller, spender);
            let next = current
                .checked_add(added)
                .ok_or(NeonError::Overflow("allowance"))?;
            t.set_allowance(caller, spender, next)
        })
    }

    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: u128,
    ) -> Result<()> {
        self.transact(|t| {
            let current = t.allowance(caller, spender);
            let next = current
                .checked_sub(subtracted)
                .ok_or(NeonError::InsufficientAllowance {
                    available: current,
                    required: subtracted,
                })?;
            t.set_allowance(caller, spender, next)
        })
    }

    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<()> {
        self.transact(|t| {
            t.spend_allowance(from, caller, amount)?;
            t.move_balance(from, to, amount)
        })
    }

    // ── primitives: not transactional, callers wrap them ──

    pub(crate) fn push_event(&mut self, event: NeonEvent) {
        self.events.push(event);
    }

    pub(crate) fn ensure_balance(&self, account: &Address, amount: u128) -> Result<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(NeonError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        Ok(())
    }

    pub(crate) fn mint(&mut self, to: &Address, amount: u128) -> Result<()> {
        if to.is_zero() {
            return Err(NeonError::zero_address("mint to"));
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(NeonError::Overflow("total supply"))?;
        self.undo.record(Bep20Undo::TotalSupply(self.total_supply));
        self.total_supply = supply;
        self.credit(to, amount)?;
        self.push_event(NeonEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Debit `from`, credit `to`, log a Transfer.
    pub(crate) fn move_balance(&mut self, from: &Address, to: &Address, amount: u128) -> Result<()> {
        if from.is_zero() {
            return Err(NeonError::zero_address("transfer from"));
        }
        if to.is_zero() {
            return Err(NeonError::zero_address("transfer to"));
        }
        self.ensure_balance(from, amount)?;
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        self.push_event(NeonEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    pub(crate) fn set_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<()> {
        if owner.is_zero() {
            return Err(NeonError::zero_address("approve from"));
        }
        if spender.is_zero() {
            return Err(NeonError::zero_address("approve to"));
        }
        let previous = self
            .allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
        self.undo.record(Bep20Undo::Allowance {
            owner: *owner,
            spender: *spender,
            previous,
        });
        self.push_event(NeonEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    pub(crate) fn spend_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<()> {
        let available = self.allowance(owner, spender);
        let remaining = available
            .checked_sub(amount)
            .ok_or(NeonError::InsufficientAllowance {
                available,
                required: amount,
            })?;
        self.set_allowance(owner, spender, remaining)
    }

    fn debit(&mut self, account: &Address, amount: u128) -> Result<()> {
        let available = self.balance_of(account);
        let next = available
            .checked_sub(amount)
            .ok_or(NeonError::InsufficientBalance {
                available,
                required: amount,
            })?;
        self.write_balance(account, next);
        Ok(())
    }

    fn credit(&mut self, account: &Address, amount: u128) -> Result<()> {
        let next = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(NeonError::Overflow("balance"))?;
        self.write_balance(account, next);
        Ok(())
    }

    fn write_balance(&mut self, account: &Address, value: u128) {
        let previous = self.balances.insert(*account, value);
        self.undo.record(Bep20Undo::Balance(*account, previous));
    }

    /// Undo entries held for open checkpoints; zero between operations.
    pub fn pending_undo(&self) -> usize {
        self.undo.pending()
    }
}

impl Fungible for Bep20Token {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: &Address) -> u128 {
        Bep20Token::balance_of(self, account)
    }

    fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()> {
        Bep20Token::transfer(self, caller, to, amount)
    }
}
