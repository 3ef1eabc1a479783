//! The bounded token whitelist.

use crate::error::LedgerError;
use guildhall_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, append-only registry of approved treasury tokens.
///
/// Capacity accounting counts approved tokens *plus* whitelist proposals
/// already submitted but not yet resolved, since each pending proposal could
/// still independently add a token. The bound exists because ragequit
/// iterates every approved token and must stay affordable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenRegistry {
    approved: Vec<Address>,
    whitelist: HashSet<Address>,
    deposit_token: Address,
    max_token_count: usize,
    pending_whitelist: usize,
}

impl TokenRegistry {
    /// Build the genesis registry. The first token is the deposit token.
    pub fn new(tokens: Vec<Address>, max_token_count: usize) -> Result<Self, LedgerError> {
        let deposit_token = tokens.first().cloned().ok_or(LedgerError::EmptyTokenList)?;
        if tokens.len() > max_token_count {
            return Err(LedgerError::CapacityExceeded {
                approved: tokens.len(),
                pending: 0,
                max: max_token_count,
            });
        }
        let mut whitelist = HashSet::new();
        for token in &tokens {
            if token.is_zero() {
                return Err(LedgerError::ZeroTokenAddress);
            }
            if !whitelist.insert(token.clone()) {
                return Err(LedgerError::DuplicateToken(token.clone()));
            }
        }
        Ok(Self {
            approved: tokens,
            whitelist,
            deposit_token,
            max_token_count,
            pending_whitelist: 0,
        })
    }

    pub fn deposit_token(&self) -> &Address {
        &self.deposit_token
    }

    pub fn token_count(&self) -> usize {
        self.approved.len()
    }

    pub fn approved_token(&self, index: usize) -> Option<&Address> {
        self.approved.get(index)
    }

    pub fn approved_tokens(&self) -> &[Address] {
        &self.approved
    }

    pub fn is_whitelisted(&self, token: &Address) -> bool {
        self.whitelist.contains(token)
    }

    pub fn pending_whitelist_count(&self) -> usize {
        self.pending_whitelist
    }

    /// Register a new whitelist proposal for `token`.
    ///
    /// Fails if the token is the zero address, already approved, or if the
    /// approved count plus the outstanding proposals already fill the cap.
    pub fn submit_whitelist(&mut self, token: &Address) -> Result<(), LedgerError> {
        if token.is_zero() {
            return Err(LedgerError::ZeroTokenAddress);
        }
        if self.is_whitelisted(token) {
            return Err(LedgerError::AlreadyApproved(token.clone()));
        }
        if self.approved.len() + self.pending_whitelist >= self.max_token_count {
            return Err(LedgerError::CapacityExceeded {
                approved: self.approved.len(),
                pending: self.pending_whitelist,
                max: self.max_token_count,
            });
        }
        self.pending_whitelist += 1;
        Ok(())
    }

    /// Re-check capacity when a pending whitelist proposal is sponsored.
    ///
    /// The proposal being sponsored is itself among the pending count, so it
    /// is excluded from its own bound. The check only bites on state where
    /// approved + pending exceeds the cap (e.g. a restored legacy snapshot);
    /// submission keeps live state within the bound.
    pub fn check_sponsor_capacity(&self) -> Result<(), LedgerError> {
        let others = self.pending_whitelist.saturating_sub(1);
        if self.approved.len() + others >= self.max_token_count {
            return Err(LedgerError::CapacityExceeded {
                approved: self.approved.len(),
                pending: self.pending_whitelist,
                max: self.max_token_count,
            });
        }
        Ok(())
    }

    /// Whether processing a whitelist proposal for `token` could still
    /// append it: capacity remains and no other proposal approved it first.
    pub fn can_approve(&self, token: &Address) -> bool {
        self.approved.len() < self.max_token_count && !self.is_whitelisted(token)
    }

    /// Append `token` to the approved list.
    pub fn approve(&mut self, token: &Address) -> Result<(), LedgerError> {
        if self.approved.len() >= self.max_token_count {
            return Err(LedgerError::CapacityExceeded {
                approved: self.approved.len(),
                pending: self.pending_whitelist,
                max: self.max_token_count,
            });
        }
        if !self.whitelist.insert(token.clone()) {
            return Err(LedgerError::AlreadyApproved(token.clone()));
        }
        self.approved.push(token.clone());
        Ok(())
    }

    /// A pending whitelist proposal was processed (either outcome) or
    /// cancelled; its capacity reservation is released.
    pub fn resolve_pending(&mut self) {
        self.pending_whitelist = self.pending_whitelist.saturating_sub(1);
    }
}
