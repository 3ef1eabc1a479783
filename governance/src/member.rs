//! Membership state — shares, loot, delegate keys, derived totals.

use crate::error::GovernanceError;
use guildhall_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A member record.
///
/// Records are never physically removed: a member who burns down to zero
/// shares and zero loot stays inert in the registry, and their delegate-key
/// mapping persists so the key cannot be silently reused.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    /// Address currently authorized to vote/propose on this member's behalf.
    /// Defaults to the member's own address.
    pub delegate_key: Address,
    /// Voting + economic weight.
    pub shares: u128,
    /// Economic-only weight (no vote).
    pub loot: u128,
    /// Queue index of a guild-kick outcome against this member. Guild-kick
    /// semantics are an extension point; nothing sets this today.
    pub jailed: Option<u64>,
    /// Highest queue index this member voted yes on. Blocks ragequit while
    /// that proposal is unprocessed.
    pub highest_index_yes_vote: Option<u64>,
}

impl Member {
    /// Combined shares + loot. Registry-level checks keep the sum within
    /// u128, so saturation never actually bites.
    pub fn total_weight(&self) -> u128 {
        self.shares.saturating_add(self.loot)
    }
}

/// Registry of members keyed by address, with the delegate-key reverse map
/// and transactionally maintained share/loot totals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemberRegistry {
    members: HashMap<Address, Member>,
    /// 1:1 reverse map: delegate key → member address.
    member_by_delegate_key: HashMap<Address, Address>,
    total_shares: u128,
    total_loot: u128,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(&self, address: &Address) -> Option<&Member> {
        self.members.get(address)
    }

    pub fn is_member(&self, address: &Address) -> bool {
        self.members.contains_key(address)
    }

    /// The member address a delegate key speaks for, if any.
    pub fn resolve_delegate(&self, key: &Address) -> Option<&Address> {
        self.member_by_delegate_key.get(key)
    }

    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    pub fn total_loot(&self) -> u128 {
        self.total_loot
    }

    pub fn total_shares_and_loot(&self) -> Result<u128, GovernanceError> {
        self.total_shares
            .checked_add(self.total_loot)
            .ok_or(GovernanceError::Overflow)
    }

    /// Mint shares/loot to `applicant`, creating the member if new.
    ///
    /// If the applicant's address is currently in use as another member's
    /// delegate key, that member's delegation is reset to themselves first —
    /// the delegate map must stay a bijection onto members.
    pub fn mint(
        &mut self,
        applicant: &Address,
        shares: u128,
        loot: u128,
    ) -> Result<(), GovernanceError> {
        let new_total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(GovernanceError::Overflow)?;
        let new_total_loot = self
            .total_loot
            .checked_add(loot)
            .ok_or(GovernanceError::Overflow)?;
        // The combined total is snapshotted at every yes vote; keep it representable.
        new_total_shares
            .checked_add(new_total_loot)
            .ok_or(GovernanceError::Overflow)?;

        if let Some(member) = self.members.get_mut(applicant) {
            member.shares = member
                .shares
                .checked_add(shares)
                .ok_or(GovernanceError::Overflow)?;
            member.loot = member
                .loot
                .checked_add(loot)
                .ok_or(GovernanceError::Overflow)?;
        } else {
            if let Some(owner) = self.member_by_delegate_key.get(applicant).cloned() {
                if owner != *applicant {
                    if let Some(existing) = self.members.get_mut(&owner) {
                        existing.delegate_key = owner.clone();
                    }
                    self.member_by_delegate_key.insert(owner.clone(), owner);
                }
            }
            self.members.insert(
                applicant.clone(),
                Member {
                    delegate_key: applicant.clone(),
                    shares,
                    loot,
                    jailed: None,
                    highest_index_yes_vote: None,
                },
            );
            self.member_by_delegate_key
                .insert(applicant.clone(), applicant.clone());
        }

        self.total_shares = new_total_shares;
        self.total_loot = new_total_loot;
        Ok(())
    }

    /// Burn shares/loot from an existing member, keeping totals in step.
    pub fn burn(
        &mut self,
        address: &Address,
        shares: u128,
        loot: u128,
    ) -> Result<(), GovernanceError> {
        let member = self
            .members
            .get_mut(address)
            .ok_or_else(|| GovernanceError::NotAMember(address.clone()))?;
        if member.shares < shares {
            return Err(GovernanceError::InsufficientShares {
                requested: shares,
                held: member.shares,
            });
        }
        if member.loot < loot {
            return Err(GovernanceError::InsufficientLoot {
                requested: loot,
                held: member.loot,
            });
        }
        member.shares -= shares;
        member.loot -= loot;
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(GovernanceError::Overflow)?;
        self.total_loot = self
            .total_loot
            .checked_sub(loot)
            .ok_or(GovernanceError::Overflow)?;
        Ok(())
    }

    /// Record that a member voted yes on `queue_index`.
    pub fn note_yes_vote(&mut self, address: &Address, queue_index: u64) {
        if let Some(member) = self.members.get_mut(address) {
            member.highest_index_yes_vote = Some(
                member
                    .highest_index_yes_vote
                    .map_or(queue_index, |existing| existing.max(queue_index)),
            );
        }
    }

    /// Reassign a member's delegate key.
    ///
    /// The new key must not be another member's address, nor in use as any
    /// other member's delegate key.
    pub fn update_delegate_key(
        &mut self,
        member_address: &Address,
        new_key: &Address,
    ) -> Result<(), GovernanceError> {
        if !self.is_member(member_address) {
            return Err(GovernanceError::NotAMember(member_address.clone()));
        }
        if new_key != member_address {
            if self.is_member(new_key) {
                return Err(GovernanceError::DuplicateDelegateKey(new_key.clone()));
            }
            if let Some(owner) = self.member_by_delegate_key.get(new_key) {
                if owner != member_address {
                    return Err(GovernanceError::DuplicateDelegateKey(new_key.clone()));
                }
            }
        }
        // Drop the old key, install the new one.
        if let Some(member) = self.members.get_mut(member_address) {
            let old_key = std::mem::replace(&mut member.delegate_key, new_key.clone());
            self.member_by_delegate_key.remove(&old_key);
        }
        self.member_by_delegate_key
            .insert(new_key.clone(), member_address.clone());
        Ok(())
    }
}
