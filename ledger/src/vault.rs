//! The external fungible-token seam.
//!
//! The DAO never talks to token contracts directly; it sees them through
//! `TokenVault`, viewed from the treasury's seat. A refusing or failing
//! token must fail the enclosing operation — callers roll back any ledger
//! mutation made on behalf of a transfer that did not complete.

use crate::error::LedgerError;
use guildhall_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("token {token} refused the transfer")]
    Refused { token: Address },

    #[error("token {token}: insufficient funds (needed {needed}, available {available})")]
    InsufficientFunds {
        token: Address,
        needed: u128,
        available: u128,
    },

    #[error("token {token}: balance overflow")]
    Overflow { token: Address },
}

/// Capability over the tracked token contracts, from the treasury's seat.
///
/// Implementations must either complete a transfer in full or leave all
/// balances unchanged and return an error — there is no partial transfer.
pub trait TokenVault {
    /// Move `amount` of `token` out of the treasury's custody to `to`.
    fn transfer(
        &mut self,
        token: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), VaultError>;

    /// Pull `amount` of `token` from `from` into the treasury's custody.
    fn transfer_from(
        &mut self,
        token: &Address,
        from: &Address,
        amount: TokenAmount,
    ) -> Result<(), VaultError>;

    /// Balance of an arbitrary external account.
    fn balance_of(&self, token: &Address, account: &Address) -> TokenAmount;

    /// The treasury's own custodial balance of `token`.
    fn custody_balance(&self, token: &Address) -> TokenAmount;
}

/// In-memory token implementation for tests and simulation.
///
/// Tracks per-(token, account) balances, with a `refuse` switch per token to
/// exercise the external-failure paths.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryVault {
    treasury: Address,
    balances: HashMap<Address, HashMap<Address, u128>>,
    refusing: HashSet<Address>,
}

impl InMemoryVault {
    pub fn new(treasury: Address) -> Self {
        Self {
            treasury,
            balances: HashMap::new(),
            refusing: HashSet::new(),
        }
    }

    pub fn treasury(&self) -> &Address {
        &self.treasury
    }

    /// Conjure `amount` of `token` into `account`. Fixture-only.
    pub fn mint(&mut self, token: &Address, account: &Address, amount: TokenAmount) {
        let entry = self
            .balances
            .entry(token.clone())
            .or_default()
            .entry(account.clone())
            .or_insert(0);
        *entry = entry.saturating_add(amount.raw());
    }

    /// Make every subsequent transfer of `token` fail.
    pub fn set_refusing(&mut self, token: &Address, refusing: bool) {
        if refusing {
            self.refusing.insert(token.clone());
        } else {
            self.refusing.remove(token);
        }
    }

    fn move_between(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), VaultError> {
        if self.refusing.contains(token) {
            return Err(VaultError::Refused {
                token: token.clone(),
            });
        }
        if amount.is_zero() {
            return Ok(());
        }
        let accounts = self.balances.entry(token.clone()).or_default();
        let available = accounts.get(from).copied().unwrap_or(0);
        let from_after =
            available
                .checked_sub(amount.raw())
                .ok_or_else(|| VaultError::InsufficientFunds {
                    token: token.clone(),
                    needed: amount.raw(),
                    available,
                })?;
        let to_after = accounts
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount.raw())
            .ok_or_else(|| VaultError::Overflow {
                token: token.clone(),
            })?;
        accounts.insert(from.clone(), from_after);
        accounts.insert(to.clone(), to_after);
        Ok(())
    }
}

impl TokenVault for InMemoryVault {
    fn transfer(
        &mut self,
        token: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), VaultError> {
        let treasury = self.treasury.clone();
        self.move_between(token, &treasury, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        from: &Address,
        amount: TokenAmount,
    ) -> Result<(), VaultError> {
        let treasury = self.treasury.clone();
        self.move_between(token, from, &treasury, amount)
    }

    fn balance_of(&self, token: &Address, account: &Address) -> TokenAmount {
        let raw = self
            .balances
            .get(token)
            .and_then(|accounts| accounts.get(account))
            .copied()
            .unwrap_or(0);
        TokenAmount::new(raw)
    }

    fn custody_balance(&self, token: &Address) -> TokenAmount {
        self.balance_of(token, &self.treasury)
    }
}

impl From<VaultError> for LedgerError {
    fn from(err: VaultError) -> Self {
        LedgerError::ExternalTransfer(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> (InMemoryVault, Address, Address) {
        let token = Address::new("0xtoken");
        let alice = Address::new("0xalice");
        (InMemoryVault::new(Address::new("0xtreasury")), token, alice)
    }

    #[test]
    fn pull_then_pay_out() {
        let (mut vault, token, alice) = vault();
        vault.mint(&token, &alice, TokenAmount::new(100));

        vault
            .transfer_from(&token, &alice, TokenAmount::new(60))
            .unwrap();
        assert_eq!(vault.custody_balance(&token), TokenAmount::new(60));
        assert_eq!(vault.balance_of(&token, &alice), TokenAmount::new(40));

        vault.transfer(&token, &alice, TokenAmount::new(10)).unwrap();
        assert_eq!(vault.custody_balance(&token), TokenAmount::new(50));
        assert_eq!(vault.balance_of(&token, &alice), TokenAmount::new(50));
    }

    #[test]
    fn transfer_exceeding_funds_fails_cleanly() {
        let (mut vault, token, alice) = vault();
        vault.mint(&token, &alice, TokenAmount::new(5));
        assert!(vault
            .transfer_from(&token, &alice, TokenAmount::new(6))
            .is_err());
        assert_eq!(vault.balance_of(&token, &alice), TokenAmount::new(5));
        assert_eq!(vault.custody_balance(&token), TokenAmount::ZERO);
    }

    #[test]
    fn refusing_token_fails_every_transfer() {
        let (mut vault, token, alice) = vault();
        vault.mint(&token, &alice, TokenAmount::new(5));
        vault.set_refusing(&token, true);
        assert!(matches!(
            vault.transfer_from(&token, &alice, TokenAmount::new(1)),
            Err(VaultError::Refused { .. })
        ));
        vault.set_refusing(&token, false);
        vault
            .transfer_from(&token, &alice, TokenAmount::new(1))
            .unwrap();
    }
}
