//! The (account, token) → balance map.

use crate::account::AccountKey;
use crate::error::LedgerError;
use guildhall_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Internal balance ledger.
///
/// Balances are raw u128 units. All mutation is checked arithmetic; a debit
/// that exceeds the recorded balance fails, and nothing is ever fabricated —
/// credits are issued only against a confirmed inbound transfer or a paired
/// internal debit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// token → (account → balance).
    balances: HashMap<Address, HashMap<AccountKey, u128>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded balance of `account` for `token` (zero if no entry).
    pub fn balance_of(&self, account: &AccountKey, token: &Address) -> TokenAmount {
        let raw = self
            .balances
            .get(token)
            .and_then(|accounts| accounts.get(account))
            .copied()
            .unwrap_or(0);
        TokenAmount::new(raw)
    }

    /// Credit `amount` of `token` to `account`.
    pub fn credit(
        &mut self,
        account: &AccountKey,
        token: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }
        let entry = self
            .balances
            .entry(token.clone())
            .or_default()
            .entry(account.clone())
            .or_insert(0);
        *entry = entry
            .checked_add(amount.raw())
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Debit `amount` of `token` from `account`.
    pub fn debit(
        &mut self,
        account: &AccountKey,
        token: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(account, token);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount.raw(),
                available: available.raw(),
            })?;
        // Entry exists: available >= amount > 0.
        if let Some(accounts) = self.balances.get_mut(token) {
            if let Some(entry) = accounts.get_mut(account) {
                *entry = remaining.raw();
            }
        }
        Ok(())
    }

    /// Move `amount` of `token` from one internal account to another.
    ///
    /// Both sides are validated before either is written, so a failure
    /// leaves the ledger untouched.
    pub fn transfer_internal(
        &mut self,
        from: &AccountKey,
        to: &AccountKey,
        token: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let from_balance = self.balance_of(from, token);
        let from_after =
            from_balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    needed: amount.raw(),
                    available: from_balance.raw(),
                })?;
        let to_after = self
            .balance_of(to, token)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let accounts = self.balances.entry(token.clone()).or_default();
        accounts.insert(from.clone(), from_after.raw());
        accounts.insert(to.clone(), to_after.raw());
        Ok(())
    }

    /// Sum of all recorded balances for `token`. The conservation invariant
    /// says this must equal the treasury's custodial balance of that token
    /// between calls.
    pub fn total_for_token(&self, token: &Address) -> Result<TokenAmount, LedgerError> {
        let mut total = TokenAmount::ZERO;
        if let Some(accounts) = self.balances.get(token) {
            for raw in accounts.values() {
                total = total
                    .checked_add(TokenAmount::new(*raw))
                    .ok_or(LedgerError::Overflow)?;
            }
        }
        Ok(total)
    }

    /// All (account, balance) entries for a token, in no particular order.
    pub fn balances_for_token(
        &self,
        token: &Address,
    ) -> impl Iterator<Item = (&AccountKey, TokenAmount)> {
        self.balances
            .get(token)
            .into_iter()
            .flat_map(|accounts| accounts.iter())
            .map(|(key, raw)| (key, TokenAmount::new(*raw)))
    }
}
