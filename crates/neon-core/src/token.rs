// SPDX-License-Identifier: AGPL-3.0-only
//! # NEON Token
//!
//! Fee-bearing BEP-20 token. Every transfer is taxed at `transfer_tax_rate`
//! basis points; `burn_rate` percent of the tax goes to [`BURN_ADDRESS`] and
//! the remainder stays on the token contract's own balance for later
//! liquidity provisioning. Transfers between non-excluded accounts are capped
//! at `max_transfer_amount` (anti-whale).
//!
//! ```text
//!            amount
//!   sender ──────────┬─────────────────────────────▶ recipient  (amount - tax)
//!                    │ tax = amount * rate / 10000
//!                    ├── burn = tax * burnRate / 100 ▶ 0x…dEaD
//!                    └── tax - burn ────────────────▶ token contract
//! ```
//!
//! All arithmetic truncates. When `tax` rounds down to zero the transfer is
//! effectively untaxed even with a nonzero rate.

use crate::access::{Operated, Ownable};
use crate::address::{Address, BURN_ADDRESS};
use crate::bep20::{Bep20Checkpoint, Bep20Token, Fungible, TokenMetadata};
use crate::error::{InvalidArgument, LimitExceeded, NeonError, Result};
use crate::event::NeonEvent;
use crate::math::{apply_bps, apply_percent};
use crate::tx::{Transactional, UndoLog};
use crate::u128_str;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Upper bound for `transfer_tax_rate` (10%).
pub const MAX_TRANSFER_TAX_RATE: u16 = 1_000;
/// Upper bound for `burn_rate` (100% of the tax).
pub const MAX_BURN_RATE: u16 = 100;

pub const DEFAULT_TRANSFER_TAX_RATE: u16 = 500;
pub const DEFAULT_BURN_RATE: u16 = 20;
/// 0.5% of total supply.
pub const DEFAULT_MAX_TRANSFER_AMOUNT_RATE: u16 = 50;
/// 500 NEON at 18 decimals.
pub const DEFAULT_MIN_AMOUNT_TO_LIQUIFY: u128 = 500_000_000_000_000_000_000;

pub fn neon_metadata() -> TokenMetadata {
    TokenMetadata {
        name: "NEON Token".to_string(),
        symbol: "NEON".to_string(),
        decimals: 18,
    }
}

/// How a single transfer of `amount` is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSplit {
    #[serde(with = "u128_str")]
    pub amount: u128,
    /// Credited to the recipient.
    #[serde(with = "u128_str")]
    pub send: u128,
    #[serde(with = "u128_str")]
    pub tax: u128,
    /// Part of `tax` sent to the burn sink.
    #[serde(with = "u128_str")]
    pub burn: u128,
    /// Part of `tax` kept by the token contract.
    #[serde(with = "u128_str")]
    pub liquify: u128,
}

impl TaxSplit {
    pub fn compute(amount: u128, transfer_tax_rate: u16, burn_rate: u16) -> Result<Self> {
        if transfer_tax_rate == 0 {
            return Ok(Self {
                amount,
                send: amount,
                tax: 0,
                burn: 0,
                liquify: 0,
            });
        }
        let tax = apply_bps(amount, transfer_tax_rate).ok_or(NeonError::Overflow("tax amount"))?;
        let burn = apply_percent(tax, burn_rate).ok_or(NeonError::Overflow("burn amount"))?;
        let liquify = tax.checked_sub(burn).ok_or(NeonError::Overflow("liquify amount"))?;
        let send = amount.checked_sub(tax).ok_or(NeonError::Overflow("send amount"))?;
        Ok(Self {
            amount,
            send,
            tax,
            burn,
            liquify,
        })
    }
}

/// Tunable token parameters, fixed at deployment and later changed by the
/// operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Basis points, 0..=1000.
    pub transfer_tax_rate: u16,
    /// Percent of the tax, 0..=100.
    pub burn_rate: u16,
    /// Basis points of total supply.
    pub max_transfer_amount_rate: u16,
    pub swap_and_liquify_enabled: bool,
    #[serde(with = "u128_str")]
    pub min_amount_to_liquify: u128,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            transfer_tax_rate: DEFAULT_TRANSFER_TAX_RATE,
            burn_rate: DEFAULT_BURN_RATE,
            max_transfer_amount_rate: DEFAULT_MAX_TRANSFER_AMOUNT_RATE,
            swap_and_liquify_enabled: false,
            min_amount_to_liquify: DEFAULT_MIN_AMOUNT_TO_LIQUIFY,
        }
    }
}

impl TokenSettings {
    pub fn validate(&self) -> Result<()> {
        check_transfer_tax_rate(self.transfer_tax_rate)?;
        check_burn_rate(self.burn_rate)
    }
}

fn check_transfer_tax_rate(rate: u16) -> Result<()> {
    if rate > MAX_TRANSFER_TAX_RATE {
        log::debug!("transfer tax rate {} above maximum {}", rate, MAX_TRANSFER_TAX_RATE);
        return Err(InvalidArgument::TransferTaxRateTooHigh {
            rate,
            max: MAX_TRANSFER_TAX_RATE,
        }
        .into());
    }
    Ok(())
}

fn check_burn_rate(rate: u16) -> Result<()> {
    if rate > MAX_BURN_RATE {
        log::debug!("burn rate {} above maximum {}", rate, MAX_BURN_RATE);
        return Err(InvalidArgument::BurnRateTooHigh {
            rate,
            max: MAX_BURN_RATE,
        }
        .into());
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeonToken {
    base: Bep20Token,
    ownable: Ownable,
    operated: Operated,
    settings: TokenSettings,
    old_school_router: Option<Address>,
    excluded_from_anti_whale: BTreeSet<Address>,
    /// Prior membership of accounts whose exclusion flag was written.
    #[serde(skip)]
    exclusion_undo: UndoLog<(Address, bool)>,
}

/// Role and settings fields are small enough to copy whole; balances,
/// allowances and exclusions are journaled.
#[derive(Debug, Clone)]
pub struct NeonCheckpoint {
    base: Bep20Checkpoint,
    exclusions: usize,
    ownable: Ownable,
    operated: Operated,
    settings: TokenSettings,
    old_school_router: Option<Address>,
}

impl Transactional for NeonToken {
    type Checkpoint = NeonCheckpoint;

    fn checkpoint(&mut self) -> NeonCheckpoint {
        NeonCheckpoint {
            base: self.base.checkpoint(),
            exclusions: self.exclusion_undo.begin(),
            ownable: self.ownable.clone(),
            operated: self.operated.clone(),
            settings: self.settings.clone(),
            old_school_router: self.old_school_router,
        }
    }

    fn commit(&mut self, checkpoint: NeonCheckpoint) {
        self.base.commit(checkpoint.base);
        self.exclusion_undo.commit();
    }

    fn rollback(&mut self, checkpoint: NeonCheckpoint) {
        self.base.rollback(checkpoint.base);
        for (account, was_excluded) in self.exclusion_undo.unwind(checkpoint.exclusions) {
            if was_excluded {
                self.excluded_from_anti_whale.insert(account);
            } else {
                self.excluded_from_anti_whale.remove(&account);
            }
        }
        self.ownable = checkpoint.ownable;
        self.operated = checkpoint.operated;
        self.settings = checkpoint.settings;
        self.old_school_router = checkpoint.old_school_router;
    }
}

impl NeonToken {
    /// Deploy with default settings. The deployer becomes owner and operator.
    pub fn new(deployer: Address, address: Address) -> Self {
        let mut token = Self {
            base: Bep20Token::new(address, neon_metadata()),
            ownable: Ownable::new(deployer),
            operated: Operated::new(deployer),
            settings: TokenSettings::default(),
            old_school_router: None,
            excluded_from_anti_whale: BTreeSet::new(),
            exclusion_undo: UndoLog::default(),
        };
        token.exclude_defaults(deployer);
        token
    }

    pub fn with_settings(
        deployer: Address,
        address: Address,
        metadata: TokenMetadata,
        settings: TokenSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let mut token = Self::new(deployer, address);
        token.base = Bep20Token::new(address, metadata);
        token.settings = settings;
        Ok(token)
    }

    fn exclude_defaults(&mut self, deployer: Address) {
        let own = self.base.address();
        self.excluded_from_anti_whale
            .extend([deployer, Address::ZERO, own, BURN_ADDRESS]);
    }

    // ─────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────

    pub fn address(&self) -> Address {
        self.base.address()
    }

    pub fn metadata(&self) -> &TokenMetadata {
        self.base.metadata()
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn operator(&self) -> Address {
        self.operated.operator()
    }

    pub fn total_supply(&self) -> u128 {
        self.base.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.base.balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.base.allowance(owner, spender)
    }

    pub fn balances(&self) -> impl Iterator<Item = (&Address, &u128)> {
        self.base.balances()
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    pub fn transfer_tax_rate(&self) -> u16 {
        self.settings.transfer_tax_rate
    }

    pub fn burn_rate(&self) -> u16 {
        self.settings.burn_rate
    }

    pub fn max_transfer_amount_rate(&self) -> u16 {
        self.settings.max_transfer_amount_rate
    }

    /// `floor(total_supply * max_transfer_amount_rate / 10000)`, derived on
    /// every read so it tracks both mints and rate updates.
    pub fn max_transfer_amount(&self) -> u128 {
        apply_bps(self.total_supply(), self.settings.max_transfer_amount_rate).unwrap_or(u128::MAX)
    }

    pub fn is_excluded_from_anti_whale(&self, account: &Address) -> bool {
        self.excluded_from_anti_whale.contains(account)
    }

    pub fn swap_and_liquify_enabled(&self) -> bool {
        self.settings.swap_and_liquify_enabled
    }

    pub fn min_amount_to_liquify(&self) -> u128 {
        self.settings.min_amount_to_liquify
    }

    pub fn old_school_router(&self) -> Option<Address> {
        self.old_school_router
    }

    pub fn events(&self) -> &[NeonEvent] {
        self.base.events()
    }

    /// Undo entries held for open checkpoints; zero between operations.
    pub fn pending_undo(&self) -> usize {
        self.base.pending_undo() + self.exclusion_undo.pending()
    }

    /// Split `amount` would receive under the current rates.
    pub fn quote(&self, amount: u128) -> Result<TaxSplit> {
        TaxSplit::compute(amount, self.settings.transfer_tax_rate, self.settings.burn_rate)
    }

    /// Check that balances (burn sink and contract balance included) add up to
    /// total supply.
    pub fn audit_supply(&self) -> Result<()> {
        self.base.audit_supply()
    }

    // ─────────────────────────────────────────────────────────────
    // Owner
    // ─────────────────────────────────────────────────────────────

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()> {
        self.transact(|t| {
            t.ownable.only_owner(caller)?;
            t.base.mint(to, amount)?;
            log::debug!(
                "minted {} to {}; max transfer amount now {}",
                amount,
                to,
                t.max_transfer_amount()
            );
            Ok(())
        })
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.transact(|t| {
            let ev = t.ownable.transfer_ownership(caller, new_owner)?;
            t.base.push_event(ev);
            Ok(())
        })
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<()> {
        self.transact(|t| {
            let ev = t.ownable.renounce_ownership(caller)?;
            t.base.push_event(ev);
            Ok(())
        })
    }

    // ─────────────────────────────────────────────────────────────
    // BEP-20 surface
    // ─────────────────────────────────────────────────────────────

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<TaxSplit> {
        self.transact(|t| t.apply_transfer(caller, to, amount))
    }

    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<TaxSplit> {
        self.transact(|t| {
            t.base.spend_allowance(from, caller, amount)?;
            t.apply_transfer(from, to, amount)
        })
    }

    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u128) -> Result<()> {
        self.base.approve(caller, spender, amount)
    }

    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: u128,
    ) -> Result<()> {
        self.base.increase_allowance(caller, spender, added)
    }

    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: u128,
    ) -> Result<()> {
        self.base.decrease_allowance(caller, spender, subtracted)
    }

    /// The transfer rule. Not transactional on its own: every caller runs it
    /// inside `transact`.
    fn apply_transfer(&mut self, sender: &Address, recipient: &Address, amount: u128) -> Result<TaxSplit> {
        if sender.is_zero() {
            return Err(NeonError::zero_address("transfer from"));
        }
        if recipient.is_zero() {
            return Err(NeonError::zero_address("transfer to"));
        }
        self.check_anti_whale(sender, recipient, amount)?;
        self.base.ensure_balance(sender, amount)?;

        let split = self.quote(amount)?;
        if split.burn > 0 {
            self.base.move_balance(sender, &BURN_ADDRESS, split.burn)?;
        }
        if split.liquify > 0 {
            let own = self.address();
            self.base.move_balance(sender, &own, split.liquify)?;
        }
        self.base.move_balance(sender, recipient, split.send)?;

        log::debug!(
            "transfer {} -> {}: amount={} send={} burn={} liquify={}",
            sender,
            recipient,
            amount,
            split.send,
            split.burn,
            split.liquify
        );
        Ok(split)
    }

    fn check_anti_whale(&self, sender: &Address, recipient: &Address, amount: u128) -> Result<()> {
        if self.is_excluded_from_anti_whale(sender) || self.is_excluded_from_anti_whale(recipient) {
            return Ok(());
        }
        let max = self.max_transfer_amount();
        if amount > max {
            log::debug!("anti-whale: {} -> {} amount {} over limit {}", sender, recipient, amount, max);
            return Err(LimitExceeded::MaxTransferAmount { amount, max }.into());
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // Operator
    // ─────────────────────────────────────────────────────────────

    pub fn transfer_operator(&mut self, caller: &Address, new_operator: Address) -> Result<()> {
        self.transact(|t| {
            let ev = t.operated.transfer_operator(caller, new_operator)?;
            t.base.push_event(ev);
            Ok(())
        })
    }

    pub fn update_transfer_tax_rate(&mut self, caller: &Address, rate: u16) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            check_transfer_tax_rate(rate)?;
            let previous_rate = std::mem::replace(&mut t.settings.transfer_tax_rate, rate);
            t.base.push_event(NeonEvent::TransferTaxRateUpdated {
                operator: *caller,
                previous_rate,
                new_rate: rate,
            });
            Ok(())
        })
    }

    pub fn update_burn_rate(&mut self, caller: &Address, rate: u16) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            check_burn_rate(rate)?;
            let previous_rate = std::mem::replace(&mut t.settings.burn_rate, rate);
            t.base.push_event(NeonEvent::BurnRateUpdated {
                operator: *caller,
                previous_rate,
                new_rate: rate,
            });
            Ok(())
        })
    }

    pub fn update_max_transfer_amount_rate(&mut self, caller: &Address, rate: u16) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            let previous_rate = std::mem::replace(&mut t.settings.max_transfer_amount_rate, rate);
            t.base.push_event(NeonEvent::MaxTransferAmountRateUpdated {
                operator: *caller,
                previous_rate,
                new_rate: rate,
            });
            Ok(())
        })
    }

    pub fn update_swap_and_liquify_enabled(&mut self, caller: &Address, enabled: bool) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            t.settings.swap_and_liquify_enabled = enabled;
            t.base.push_event(NeonEvent::SwapAndLiquifyEnabledUpdated {
                operator: *caller,
                enabled,
            });
            Ok(())
        })
    }

    pub fn set_excluded_from_anti_whale(
        &mut self,
        caller: &Address,
        account: Address,
        excluded: bool,
    ) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            let was_excluded = if excluded {
                !t.excluded_from_anti_whale.insert(account)
            } else {
                t.excluded_from_anti_whale.remove(&account)
            };
            t.exclusion_undo.record((account, was_excluded));
            t.base
                .push_event(NeonEvent::ExcludedFromAntiWhale { account, excluded });
            Ok(())
        })
    }

    pub fn update_min_amount_to_liquify(&mut self, caller: &Address, amount: u128) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            let previous_amount = std::mem::replace(&mut t.settings.min_amount_to_liquify, amount);
            t.base.push_event(NeonEvent::MinAmountToLiquifyUpdated {
                operator: *caller,
                previous_amount,
                new_amount: amount,
            });
            Ok(())
        })
    }

    /// Records the router address only; no pair is created and nothing is
    /// swapped.
    pub fn update_old_school_router(&mut self, caller: &Address, router: Address) -> Result<()> {
        self.transact(|t| {
            t.operated.only_operator(caller)?;
            t.old_school_router = Some(router);
            t.base.push_event(NeonEvent::OldSchoolRouterUpdated {
                operator: *caller,
                router,
            });
            Ok(())
        })
    }
}

impl Fungible for NeonToken {
    fn address(&self) -> Address {
        NeonToken::address(self)
    }

    fn balance_of(&self, account: &Address) -> u128 {
        NeonToken::balance_of(self, account)
    }

    fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<()> {
        NeonToken::transfer(self, caller, to, amount).map(|_| ())
    }
}
