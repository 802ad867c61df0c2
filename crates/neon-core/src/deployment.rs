// SPDX-License-Identifier: AGPL-3.0-only
//! The three NEON contracts deployed side by side, plus any plain BEP-20
//! tokens created afterwards, driven through [`NeonAction`].
//!
//! Contract addresses come from the deployer and a per-account nonce: the
//! NEON token takes nonce 0, the referral ledger 1 and the locker 2.
//!
//! Each mutating action ends in exactly one transactional contract call, and
//! deployment-level state (nonces, the BEP-20 registry) is written only once
//! nothing can fail, so a failed action leaves the deployment untouched.
//! Queries take `&self` and never open a checkpoint.

use crate::action::{ContractKind, NeonAction, NeonResponse};
use crate::address::Address;
use crate::bep20::{Bep20Token, TokenMetadata};
use crate::config::NeonConfig;
use crate::error::{NeonError, Result};
use crate::event::NeonEvent;
use crate::locker::NeonLocker;
use crate::referral::OldSchoolReferral;
use crate::token::NeonToken;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

pub const TOKEN_NONCE: u64 = 0;
pub const REFERRAL_NONCE: u64 = 1;
pub const LOCKER_NONCE: u64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    deployer: Address,
    token: NeonToken,
    referral: OldSchoolReferral,
    locker: NeonLocker,
    lp_tokens: BTreeMap<Address, Bep20Token>,
    nonces: BTreeMap<Address, u64>,
}

/// A token reference resolved against the deployment.
enum TokenRef {
    Neon,
    Bep20(Address),
}

/// Successful dispatch before events are attached.
struct Outcome {
    message: String,
    data: Option<String>,
}

impl Outcome {
    fn done(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    fn with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data.to_string()),
        }
    }
}

/// Event-log lengths taken before an action runs.
struct EventMarks {
    token: usize,
    referral: usize,
    locker: usize,
    lp_tokens: BTreeMap<Address, usize>,
}

impl Deployment {
    /// Deploy with default token settings.
    pub fn new(deployer: Address) -> Self {
        let token = NeonToken::new(deployer, Address::derive_contract(&deployer, TOKEN_NONCE));
        Self::assemble(deployer, token)
    }

    pub fn from_config(deployer: Address, config: &NeonConfig) -> Result<Self> {
        let token = NeonToken::with_settings(
            deployer,
            Address::derive_contract(&deployer, TOKEN_NONCE),
            config.token.metadata(),
            config.token.settings(),
        )?;
        Ok(Self::assemble(deployer, token))
    }

    fn assemble(deployer: Address, token: NeonToken) -> Self {
        let referral =
            OldSchoolReferral::new(deployer, Address::derive_contract(&deployer, REFERRAL_NONCE));
        let locker = NeonLocker::new(deployer, Address::derive_contract(&deployer, LOCKER_NONCE));
        log::info!(
            "deployed NEON token {} referral {} locker {} from {}",
            token.address(),
            referral.address(),
            locker.address(),
            deployer
        );
        let mut nonces = BTreeMap::new();
        nonces.insert(deployer, LOCKER_NONCE + 1);
        Self {
            deployer,
            token,
            referral,
            locker,
            lp_tokens: BTreeMap::new(),
            nonces,
        }
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    pub fn token(&self) -> &NeonToken {
        &self.token
    }

    pub fn referral(&self) -> &OldSchoolReferral {
        &self.referral
    }

    pub fn locker(&self) -> &NeonLocker {
        &self.locker
    }

    pub fn bep20(&self, address: &Address) -> Option<&Bep20Token> {
        self.lp_tokens.get(address)
    }

    pub fn bep20_tokens(&self) -> impl Iterator<Item = &Bep20Token> {
        self.lp_tokens.values()
    }

    /// Supply invariant across the NEON token and every BEP-20 token.
    pub fn audit(&self) -> Result<()> {
        self.token.audit_supply()?;
        self.lp_tokens.values().try_for_each(Bep20Token::audit_supply)
    }

    /// Run one action for `caller`. A failed action has no effect.
    pub fn execute(&mut self, caller: &Address, action: NeonAction) -> NeonResponse {
        if action.is_query() {
            return self.query(&action);
        }
        let marks = self.event_marks();
        match self.dispatch(caller, action) {
            Ok(outcome) => {
                let events = self.events_since(&marks);
                NeonResponse::ok(outcome.message, outcome.data, events)
            }
            Err(err) => {
                log::warn!("action by {} failed: {}", caller, err);
                NeonResponse::failure(&err)
            }
        }
    }

    fn event_marks(&self) -> EventMarks {
        EventMarks {
            token: self.token.events().len(),
            referral: self.referral.events().len(),
            locker: self.locker.events().len(),
            lp_tokens: self
                .lp_tokens
                .iter()
                .map(|(addr, lp)| (*addr, lp.events().len()))
                .collect(),
        }
    }

    fn events_since(&self, marks: &EventMarks) -> Vec<NeonEvent> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.token.events()[marks.token..]);
        out.extend_from_slice(&self.referral.events()[marks.referral..]);
        out.extend_from_slice(&self.locker.events()[marks.locker..]);
        for (addr, lp) in &self.lp_tokens {
            let from = marks.lp_tokens.get(addr).copied().unwrap_or(0);
            out.extend_from_slice(&lp.events()[from..]);
        }
        out
    }

    fn nonce_of(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    fn resolve(&self, token: Option<Address>) -> Result<TokenRef> {
        match token {
            None => Ok(TokenRef::Neon),
            Some(addr) if addr == self.token.address() => Ok(TokenRef::Neon),
            Some(addr) if self.lp_tokens.contains_key(&addr) => Ok(TokenRef::Bep20(addr)),
            Some(addr) => Err(NeonError::UnknownContract(addr)),
        }
    }

    fn bep20_ref(&self, address: Address) -> Result<&Bep20Token> {
        self.lp_tokens
            .get(&address)
            .ok_or(NeonError::UnknownContract(address))
    }

    fn bep20_mut(&mut self, address: Address) -> Result<&mut Bep20Token> {
        self.lp_tokens
            .get_mut(&address)
            .ok_or(NeonError::UnknownContract(address))
    }

    fn balance_in(&self, token: Option<Address>, account: &Address) -> Result<u128> {
        Ok(match self.resolve(token)? {
            TokenRef::Neon => self.token.balance_of(account),
            TokenRef::Bep20(addr) => self.bep20_ref(addr)?.balance_of(account),
        })
    }

    fn dispatch(&mut self, caller: &Address, action: NeonAction) -> Result<Outcome> {
        use NeonAction as A;
        match action {
            A::DeployBep20 {
                name,
                symbol,
                decimals,
                total_supply,
            } => {
                let nonce = self.nonce_of(caller);
                let address = Address::derive_contract(caller, nonce);
                let meta = TokenMetadata {
                    name,
                    symbol,
                    decimals,
                };
                let lp = Bep20Token::with_initial_supply(address, meta, *caller, total_supply)?;
                log::info!("deployed BEP-20 {} ({}) at {}", lp.metadata().name, lp.metadata().symbol, address);
                self.nonces.insert(*caller, nonce + 1);
                self.lp_tokens.insert(address, lp);
                Ok(Outcome::with_data("Token deployed", json!(address.to_string())))
            }

            A::Mint { to, amount } => {
                self.token.mint(caller, &to, amount)?;
                Ok(Outcome::done("Minted"))
            }
            A::Transfer { token, to, amount } => match self.resolve(token)? {
                TokenRef::Neon => {
                    let split = self.token.transfer(caller, &to, amount)?;
                    Ok(Outcome::with_data("Transfer successful", split_json(&split)))
                }
                TokenRef::Bep20(addr) => {
                    self.bep20_mut(addr)?.transfer(caller, &to, amount)?;
                    Ok(Outcome::done("Transfer successful"))
                }
            },
            A::TransferFrom {
                token,
                from,
                to,
                amount,
            } => match self.resolve(token)? {
                TokenRef::Neon => {
                    let split = self.token.transfer_from(caller, &from, &to, amount)?;
                    Ok(Outcome::with_data("TransferFrom successful", split_json(&split)))
                }
                TokenRef::Bep20(addr) => {
                    self.bep20_mut(addr)?
                        .transfer_from(caller, &from, &to, amount)?;
                    Ok(Outcome::done("TransferFrom successful"))
                }
            },
            A::Approve {
                token,
                spender,
                amount,
            } => {
                match self.resolve(token)? {
                    TokenRef::Neon => self.token.approve(caller, &spender, amount)?,
                    TokenRef::Bep20(addr) => self.bep20_mut(addr)?.approve(caller, &spender, amount)?,
                }
                Ok(Outcome::done("Approved"))
            }
            A::IncreaseAllowance {
                token,
                spender,
                added,
            } => {
                match self.resolve(token)? {
                    TokenRef::Neon => self.token.increase_allowance(caller, &spender, added)?,
                    TokenRef::Bep20(addr) => {
                        self.bep20_mut(addr)?
                            .increase_allowance(caller, &spender, added)?
                    }
                }
                Ok(Outcome::done("Allowance increased"))
            }
            A::DecreaseAllowance {
                token,
                spender,
                subtracted,
            } => {
                match self.resolve(token)? {
                    TokenRef::Neon => self.token.decrease_allowance(caller, &spender, subtracted)?,
                    TokenRef::Bep20(addr) => {
                        self.bep20_mut(addr)?
                            .decrease_allowance(caller, &spender, subtracted)?
                    }
                }
                Ok(Outcome::done("Allowance decreased"))
            }

            A::TransferOwnership {
                contract,
                new_owner,
            } => {
                match contract {
                    ContractKind::Token => self.token.transfer_ownership(caller, new_owner)?,
                    ContractKind::Referral => self.referral.transfer_ownership(caller, new_owner)?,
                    ContractKind::Locker => self.locker.transfer_ownership(caller, new_owner)?,
                }
                Ok(Outcome::done("Ownership transferred"))
            }
            A::RenounceOwnership { contract } => {
                match contract {
                    ContractKind::Token => self.token.renounce_ownership(caller)?,
                    ContractKind::Referral => self.referral.renounce_ownership(caller)?,
                    ContractKind::Locker => self.locker.renounce_ownership(caller)?,
                }
                Ok(Outcome::done("Ownership renounced"))
            }
            A::TransferOperator { new_operator } => {
                self.token.transfer_operator(caller, new_operator)?;
                Ok(Outcome::done("Operator transferred"))
            }

            A::UpdateTransferTaxRate { rate } => {
                self.token.update_transfer_tax_rate(caller, rate)?;
                Ok(Outcome::done("Transfer tax rate updated"))
            }
            A::UpdateBurnRate { rate } => {
                self.token.update_burn_rate(caller, rate)?;
                Ok(Outcome::done("Burn rate updated"))
            }
            A::UpdateMaxTransferAmountRate { rate } => {
                self.token.update_max_transfer_amount_rate(caller, rate)?;
                Ok(Outcome::done("Max transfer amount rate updated"))
            }
            A::UpdateSwapAndLiquifyEnabled { enabled } => {
                self.token.update_swap_and_liquify_enabled(caller, enabled)?;
                Ok(Outcome::done("Swap and liquify flag updated"))
            }
            A::SetExcludedFromAntiWhale { account, excluded } => {
                self.token.set_excluded_from_anti_whale(caller, account, excluded)?;
                Ok(Outcome::done("Anti-whale exclusion updated"))
            }
            A::UpdateMinAmountToLiquify { amount } => {
                self.token.update_min_amount_to_liquify(caller, amount)?;
                Ok(Outcome::done("Min amount to liquify updated"))
            }
            A::UpdateOldSchoolRouter { router } => {
                self.token.update_old_school_router(caller, router)?;
                Ok(Outcome::done("Router updated"))
            }

            A::RecordReferral { user, referrer } => {
                let recorded = self.referral.record_referral(caller, user, referrer)?;
                Ok(Outcome::with_data(
                    if recorded { "Referral recorded" } else { "Referral ignored" },
                    json!(recorded),
                ))
            }
            A::RecordReferralCommission {
                referrer,
                commission,
            } => {
                let recorded = self
                    .referral
                    .record_referral_commission(caller, referrer, commission)?;
                Ok(Outcome::with_data(
                    if recorded { "Commission recorded" } else { "Commission ignored" },
                    json!(recorded),
                ))
            }
            A::UpdateOperator { operator, status } => {
                self.referral.update_operator(caller, operator, status)?;
                Ok(Outcome::done("Referral operator updated"))
            }

            A::Unlock { token, recipient } => {
                let released = match self.resolve(token)? {
                    TokenRef::Neon => self.locker.unlock(caller, &mut self.token, recipient)?,
                    TokenRef::Bep20(addr) => {
                        let lp = self
                            .lp_tokens
                            .get_mut(&addr)
                            .ok_or(NeonError::UnknownContract(addr))?;
                        self.locker.unlock(caller, lp, recipient)?
                    }
                };
                Ok(Outcome::with_data("Unlocked", json!(released.to_string())))
            }

            query => self.read(&query),
        }
    }

    /// Answer a read-only action without touching state. Mutating actions
    /// fail with `not_a_query`.
    pub fn query(&self, action: &NeonAction) -> NeonResponse {
        match self.read(action) {
            Ok(outcome) => NeonResponse::ok(outcome.message, outcome.data, Vec::new()),
            Err(err) => NeonResponse::failure(&err),
        }
    }

    fn read(&self, action: &NeonAction) -> Result<Outcome> {
        use NeonAction as A;
        match *action {
            A::BalanceOf { token, account } => {
                let balance = self.balance_in(token, &account)?;
                Ok(Outcome::with_data("Balance", json!(balance.to_string())))
            }
            A::Allowance {
                token,
                owner,
                spender,
            } => {
                let allowance = match self.resolve(token)? {
                    TokenRef::Neon => self.token.allowance(&owner, &spender),
                    TokenRef::Bep20(addr) => self.bep20_ref(addr)?.allowance(&owner, &spender),
                };
                Ok(Outcome::with_data("Allowance", json!(allowance.to_string())))
            }
            A::TotalSupply { token } => {
                let supply = match self.resolve(token)? {
                    TokenRef::Neon => self.token.total_supply(),
                    TokenRef::Bep20(addr) => self.bep20_ref(addr)?.total_supply(),
                };
                Ok(Outcome::with_data("Total supply", json!(supply.to_string())))
            }
            A::TokenInfo => {
                let t = &self.token;
                let meta = t.metadata();
                Ok(Outcome::with_data(
                    "Token info",
                    json!({
                        "address": t.address().to_string(),
                        "name": meta.name,
                        "symbol": meta.symbol,
                        "decimals": meta.decimals,
                        "total_supply": t.total_supply().to_string(),
                        "transfer_tax_rate": t.transfer_tax_rate(),
                        "burn_rate": t.burn_rate(),
                        "max_transfer_amount_rate": t.max_transfer_amount_rate(),
                        "max_transfer_amount": t.max_transfer_amount().to_string(),
                        "swap_and_liquify_enabled": t.swap_and_liquify_enabled(),
                        "min_amount_to_liquify": t.min_amount_to_liquify().to_string(),
                        "old_school_router": t.old_school_router().map(|a| a.to_string()),
                        "owner": t.owner().to_string(),
                        "operator": t.operator().to_string(),
                    }),
                ))
            }
            A::MaxTransferAmount => Ok(Outcome::with_data(
                "Max transfer amount",
                json!(self.token.max_transfer_amount().to_string()),
            )),
            A::IsExcludedFromAntiWhale { account } => Ok(Outcome::with_data(
                "Anti-whale exclusion",
                json!(self.token.is_excluded_from_anti_whale(&account)),
            )),
            A::Quote { amount } => {
                let split = self.token.quote(amount)?;
                Ok(Outcome::with_data("Quote", split_json(&split)))
            }
            A::Owner { contract } => {
                let owner = match contract {
                    ContractKind::Token => self.token.owner(),
                    ContractKind::Referral => self.referral.owner(),
                    ContractKind::Locker => self.locker.owner(),
                };
                Ok(Outcome::with_data("Owner", json!(owner.to_string())))
            }
            A::Operator => Ok(Outcome::with_data(
                "Operator",
                json!(self.token.operator().to_string()),
            )),
            A::IsOperator { account } => Ok(Outcome::with_data(
                "Referral operator",
                json!(self.referral.operators(&account)),
            )),
            A::GetReferrer { user } => Ok(Outcome::with_data(
                "Referrer",
                json!(self.referral.get_referrer(&user).map(|a| a.to_string())),
            )),
            A::ReferralsCount { referrer } => Ok(Outcome::with_data(
                "Referrals count",
                json!(self.referral.referrals_count(&referrer)),
            )),
            A::TotalReferralCommissions { referrer } => Ok(Outcome::with_data(
                "Total referral commissions",
                json!(self.referral.total_referral_commissions(&referrer).to_string()),
            )),
            A::LockedBalance { token } => {
                let locker = self.locker.address();
                let held = self.balance_in(token, &locker)?;
                Ok(Outcome::with_data("Locked balance", json!(held.to_string())))
            }
            _ => Err(NeonError::NotAQuery),
        }
    }
}

fn split_json(split: &crate::token::TaxSplit) -> serde_json::Value {
    json!({
        "amount": split.amount.to_string(),
        "send": split.send.to_string(),
        "tax": split.tax.to_string(),
        "burn": split.burn.to_string(),
        "liquify": split.liquify.to_string(),
    })
}
