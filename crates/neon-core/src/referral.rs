// SPDX-License-Identifier: AGPL-3.0-only
//! # Old School Referral
//!
//! Referral ledger written by registered operators (typically the farm
//! contract). Recording is deliberately forgiving: invalid input is ignored
//! rather than rejected, so a referral side effect can never fail the caller's
//! main operation. Only the operator check itself is an error.

use crate::access::Ownable;
use crate::address::Address;
use crate::error::{NeonError, Result, Unauthorized};
use crate::event::NeonEvent;
use crate::tx::{Transactional, UndoLog};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OldSchoolReferral {
    address: Address,
    ownable: Ownable,
    operators: BTreeSet<Address>,
    /// referee → referrer
    referrers: BTreeMap<Address, Address>,
    referrals_count: BTreeMap<Address, u64>,
    total_referral_commissions: BTreeMap<Address, u128>,
    #[serde(default)]
    events: Vec<NeonEvent>,
    #[serde(skip)]
    undo: UndoLog<ReferralUndo>,
}

#[derive(Debug, Clone)]
enum ReferralUndo {
    Referrer(Address, Option<Address>),
    Count(Address, Option<u64>),
    Commission(Address, Option<u128>),
    Operator(Address, bool),
}

#[derive(Debug, Clone)]
pub struct ReferralCheckpoint {
    undo: usize,
    events: usize,
    ownable: Ownable,
}

impl Transactional for OldSchoolReferral {
    type Checkpoint = ReferralCheckpoint;

    fn checkpoint(&mut self) -> ReferralCheckpoint {
        ReferralCheckpoint {
            undo: self.undo.begin(),
            events: self.events.len(),
            ownable: self.ownable.clone(),
        }
    }

    fn commit(&mut self, _: ReferralCheckpoint) {
        self.undo.commit();
    }

    fn rollback(&mut self, checkpoint: ReferralCheckpoint) {
        for entry in self.undo.unwind(checkpoint.undo) {
            match entry {
                ReferralUndo::Referrer(user, previous) => restore(&mut self.referrers, user, previous),
                ReferralUndo::Count(referrer, previous) => {
                    restore(&mut self.referrals_count, referrer, previous)
                }
                ReferralUndo::Commission(referrer, previous) => {
                    restore(&mut self.total_referral_commissions, referrer, previous)
                }
                ReferralUndo::Operator(operator, true) => {
                    self.operators.insert(operator);
                }
                ReferralUndo::Operator(operator, false) => {
                    self.operators.remove(&operator);
                }
            }
        }
        self.events.truncate(checkpoint.events);
        self.ownable = checkpoint.ownable;
    }
}

fn restore<V>(map: &mut BTreeMap<Address, V>, key: Address, previous: Option<V>) {
    match previous {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

impl OldSchoolReferral {
    pub fn new(deployer: Address, address: Address) -> Self {
        Self {
            address,
            ownable: Ownable::new(deployer),
            operators: BTreeSet::new(),
            referrers: BTreeMap::new(),
            referrals_count: BTreeMap::new(),
            total_referral_commissions: BTreeMap::new(),
            events: Vec::new(),
            undo: UndoLog::default(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn operators(&self, account: &Address) -> bool {
        self.operators.contains(account)
    }

    pub fn get_referrer(&self, user: &Address) -> Option<Address> {
        self.referrers.get(user).copied()
    }

    pub fn referrals_count(&self, referrer: &Address) -> u64 {
        self.referrals_count.get(referrer).copied().unwrap_or(0)
    }

    pub fn total_referral_commissions(&self, referrer: &Address) -> u128 {
        self.total_referral_commissions
            .get(referrer)
            .copied()
            .unwrap_or(0)
    }

    pub fn events(&self) -> &[NeonEvent] {
        &self.events
    }

    fn only_operator(&self, caller: &Address) -> Result<()> {
        if !self.operators.contains(caller) {
            return Err(Unauthorized::NotRegisteredOperator.into());
        }
        Ok(())
    }

    /// Record `referrer` for `user`. Returns whether anything was recorded.
    ///
    /// Ignored (no error) when either side is null, on self-referral, and when
    /// `user` already has a referrer.
    pub fn record_referral(
        &mut self,
        caller: &Address,
        user: Address,
        referrer: Address,
    ) -> Result<bool> {
        self.transact(|r| {
            r.only_operator(caller)?;
            if user.is_zero() || referrer.is_zero() || user == referrer {
                log::debug!("referral ignored: user={} referrer={}", user, referrer);
                return Ok(false);
            }
            if r.referrers.contains_key(&user) {
                log::debug!("referral ignored: {} already referred", user);
                return Ok(false);
            }
            let previous = r.referrers.insert(user, referrer);
            r.undo.record(ReferralUndo::Referrer(user, previous));
            let count = r.referrals_count(&referrer).saturating_add(1);
            let previous = r.referrals_count.insert(referrer, count);
            r.undo.record(ReferralUndo::Count(referrer, previous));
            r.events.push(NeonEvent::ReferralRecorded { user, referrer });
            Ok(true)
        })
    }

    /// Add `commission` to `referrer`'s running total. Returns whether the
    /// total changed; a null referrer or zero commission is ignored.
    pub fn record_referral_commission(
        &mut self,
        caller: &Address,
        referrer: Address,
        commission: u128,
    ) -> Result<bool> {
        self.transact(|r| {
            r.only_operator(caller)?;
            if referrer.is_zero() || commission == 0 {
                return Ok(false);
            }
            let total = r
                .total_referral_commissions(&referrer)
                .checked_add(commission)
                .ok_or(NeonError::Overflow("referral commission"))?;
            let previous = r.total_referral_commissions.insert(referrer, total);
            r.undo.record(ReferralUndo::Commission(referrer, previous));
            r.events.push(NeonEvent::ReferralCommissionRecorded {
                referrer,
                commission,
            });
            Ok(true)
        })
    }

    pub fn update_operator(&mut self, caller: &Address, operator: Address, status: bool) -> Result<()> {
        self.transact(|r| {
            r.ownable.only_owner(caller)?;
            let was_operator = if status {
                !r.operators.insert(operator)
            } else {
                r.operators.remove(&operator)
            };
            r.undo.record(ReferralUndo::Operator(operator, was_operator));
            log::info!("referral operator {} set to {}", operator, status);
            r.events.push(NeonEvent::OperatorUpdated { operator, status });
            Ok(())
        })
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.transact(|r| {
            let ev = r.ownable.transfer_ownership(caller, new_owner)?;
            r.events.push(ev);
            Ok(())
        })
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<()> {
        self.transact(|r| {
            let ev = r.ownable.renounce_ownership(caller)?;
            r.events.push(ev);
            Ok(())
        })
    }
}
