//! Proposals and their lifecycle.

use crate::error::GovernanceError;
use guildhall_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ballot choice. Vote weight comes from shares only; loot never votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
}

/// What kind of effect a passing proposal has.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    /// Mint shares/loot, move tribute into the guild, pay out payment.
    Standard,
    /// Add a token to the registry instead of moving treasury funds.
    Whitelist { token: Address },
    /// Reserved extension point — kick semantics are not defined here and
    /// nothing constructs this variant.
    GuildKick { member: Address },
}

/// Stored lifecycle state. Forward transitions only:
/// `Submitted → Sponsored → Processed`, with `Cancelled` reachable from
/// `Submitted`. The time-derived phases (voting, grace) are computed from
/// the current period, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Submitted,
    Sponsored {
        starting_period: u64,
        queue_index: u64,
    },
    Processed {
        passed: bool,
        starting_period: u64,
        queue_index: u64,
    },
    Cancelled,
}

impl ProposalStatus {
    pub fn is_sponsored(&self) -> bool {
        matches!(self, Self::Sponsored { .. } | Self::Processed { .. })
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn starting_period(&self) -> Option<u64> {
        match self {
            Self::Sponsored {
                starting_period, ..
            }
            | Self::Processed {
                starting_period, ..
            } => Some(*starting_period),
            _ => None,
        }
    }

    pub fn queue_index(&self) -> Option<u64> {
        match self {
            Self::Sponsored { queue_index, .. } | Self::Processed { queue_index, .. } => {
                Some(*queue_index)
            }
            _ => None,
        }
    }
}

/// The phase a proposal is in at a given period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProposalPhase {
    /// Submitted, awaiting a sponsor.
    Submitted,
    /// Sponsored but its voting window has not opened yet.
    Queued,
    Voting,
    Grace,
    ReadyToProcess,
    Processed { passed: bool },
    Cancelled,
}

/// A proposal record. Append-only: records are never deleted, and flags only
/// move forward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub kind: ProposalKind,
    /// Who submitted the proposal (and escrowed the tribute).
    pub proposer: Address,
    /// Who receives minted shares/loot and any payment.
    pub applicant: Address,
    /// Member who queued the proposal; unset until sponsored.
    pub sponsor: Option<Address>,
    pub shares_requested: u128,
    pub loot_requested: u128,
    pub tribute_offered: TokenAmount,
    pub tribute_token: Address,
    pub payment_requested: TokenAmount,
    pub payment_token: Address,
    pub details: String,
    pub yes_votes: u128,
    pub no_votes: u128,
    /// Highest total shares+loot observed at any yes vote — the dilution
    /// baseline checked at processing.
    pub max_total_shares_and_loot_at_yes_vote: u128,
    pub status: ProposalStatus,
    ballots: HashMap<Address, Vote>,
}

impl Proposal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        kind: ProposalKind,
        proposer: Address,
        applicant: Address,
        shares_requested: u128,
        loot_requested: u128,
        tribute_offered: TokenAmount,
        tribute_token: Address,
        payment_requested: TokenAmount,
        payment_token: Address,
        details: String,
    ) -> Self {
        Self {
            id,
            kind,
            proposer,
            applicant,
            sponsor: None,
            shares_requested,
            loot_requested,
            tribute_offered,
            tribute_token,
            payment_requested,
            payment_token,
            details,
            yes_votes: 0,
            no_votes: 0,
            max_total_shares_and_loot_at_yes_vote: 0,
            status: ProposalStatus::Submitted,
            ballots: HashMap::new(),
        }
    }

    pub fn has_voted(&self, member: &Address) -> bool {
        self.ballots.contains_key(member)
    }

    pub fn ballot_of(&self, member: &Address) -> Option<Vote> {
        self.ballots.get(member).copied()
    }

    /// Record a member's ballot and fold its weight into the tallies.
    ///
    /// `total_shares_and_loot` is the registry total at vote time; a yes
    /// vote ratchets the dilution baseline up to it.
    pub fn record_ballot(
        &mut self,
        member: Address,
        vote: Vote,
        weight: u128,
        total_shares_and_loot: u128,
    ) -> Result<(), GovernanceError> {
        if self.has_voted(&member) {
            return Err(GovernanceError::AlreadyVoted(member));
        }
        match vote {
            Vote::Yes => {
                self.yes_votes = self
                    .yes_votes
                    .checked_add(weight)
                    .ok_or(GovernanceError::Overflow)?;
                self.max_total_shares_and_loot_at_yes_vote = self
                    .max_total_shares_and_loot_at_yes_vote
                    .max(total_shares_and_loot);
            }
            Vote::No => {
                self.no_votes = self
                    .no_votes
                    .checked_add(weight)
                    .ok_or(GovernanceError::Overflow)?;
            }
        }
        self.ballots.insert(member, vote);
        Ok(())
    }

    /// Whether `current_period` falls inside the voting window.
    pub fn voting_open(&self, current_period: u64, voting_period_length: u64) -> bool {
        match self.status.starting_period() {
            Some(start) if !self.status.is_processed() => {
                current_period >= start
                    && current_period < start.saturating_add(voting_period_length)
            }
            _ => false,
        }
    }

    /// The period at which processing becomes allowed, if sponsored.
    pub fn processing_opens_at(
        &self,
        voting_period_length: u64,
        grace_period_length: u64,
    ) -> Option<u64> {
        self.status.starting_period().map(|start| {
            start
                .saturating_add(voting_period_length)
                .saturating_add(grace_period_length)
        })
    }

    /// Derive the phase at `current_period`.
    pub fn phase(
        &self,
        current_period: u64,
        voting_period_length: u64,
        grace_period_length: u64,
    ) -> ProposalPhase {
        match &self.status {
            ProposalStatus::Cancelled => ProposalPhase::Cancelled,
            ProposalStatus::Processed { passed, .. } => {
                ProposalPhase::Processed { passed: *passed }
            }
            ProposalStatus::Submitted => ProposalPhase::Submitted,
            ProposalStatus::Sponsored {
                starting_period, ..
            } => {
                let voting_ends = starting_period.saturating_add(voting_period_length);
                let grace_ends = voting_ends.saturating_add(grace_period_length);
                if current_period < *starting_period {
                    ProposalPhase::Queued
                } else if current_period < voting_ends {
                    ProposalPhase::Voting
                } else if current_period < grace_ends {
                    ProposalPhase::Grace
                } else {
                    ProposalPhase::ReadyToProcess
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(
            0,
            ProposalKind::Standard,
            Address::new("0xproposer"),
            Address::new("0xapplicant"),
            1,
            10,
            TokenAmount::new(100),
            Address::new("0xalpha"),
            TokenAmount::ZERO,
            Address::new("0xalpha"),
            "all hail the guild".into(),
        )
    }

    #[test]
    fn ballots_tally_by_weight() {
        let mut p = proposal();
        p.status = ProposalStatus::Sponsored {
            starting_period: 1,
            queue_index: 0,
        };
        p.record_ballot(Address::new("0xa"), Vote::Yes, 5, 20).unwrap();
        p.record_ballot(Address::new("0xb"), Vote::No, 3, 20).unwrap();
        assert_eq!(p.yes_votes, 5);
        assert_eq!(p.no_votes, 3);
        assert_eq!(p.max_total_shares_and_loot_at_yes_vote, 20);
    }

    #[test]
    fn double_vote_rejected() {
        let mut p = proposal();
        p.record_ballot(Address::new("0xa"), Vote::Yes, 1, 1).unwrap();
        assert!(matches!(
            p.record_ballot(Address::new("0xa"), Vote::No, 1, 1),
            Err(GovernanceError::AlreadyVoted(_))
        ));
        assert_eq!(p.ballot_of(&Address::new("0xa")), Some(Vote::Yes));
    }

    #[test]
    fn dilution_baseline_only_ratchets_on_yes() {
        let mut p = proposal();
        p.record_ballot(Address::new("0xa"), Vote::Yes, 1, 30).unwrap();
        p.record_ballot(Address::new("0xb"), Vote::Yes, 1, 25).unwrap();
        p.record_ballot(Address::new("0xc"), Vote::No, 1, 99).unwrap();
        assert_eq!(p.max_total_shares_and_loot_at_yes_vote, 30);
    }

    #[test]
    fn phase_progression() {
        let mut p = proposal();
        assert_eq!(p.phase(0, 35, 35), ProposalPhase::Submitted);

        p.status = ProposalStatus::Sponsored {
            starting_period: 5,
            queue_index: 0,
        };
        assert_eq!(p.phase(4, 35, 35), ProposalPhase::Queued);
        assert_eq!(p.phase(5, 35, 35), ProposalPhase::Voting);
        assert_eq!(p.phase(39, 35, 35), ProposalPhase::Voting);
        assert_eq!(p.phase(40, 35, 35), ProposalPhase::Grace);
        assert_eq!(p.phase(74, 35, 35), ProposalPhase::Grace);
        assert_eq!(p.phase(75, 35, 35), ProposalPhase::ReadyToProcess);

        p.status = ProposalStatus::Processed {
            passed: true,
            starting_period: 5,
            queue_index: 0,
        };
        assert_eq!(p.phase(80, 35, 35), ProposalPhase::Processed { passed: true });
    }

    #[test]
    fn voting_window_bounds() {
        let mut p = proposal();
        assert!(!p.voting_open(0, 35));
        p.status = ProposalStatus::Sponsored {
            starting_period: 2,
            queue_index: 0,
        };
        assert!(!p.voting_open(1, 35));
        assert!(p.voting_open(2, 35));
        assert!(p.voting_open(36, 35));
        assert!(!p.voting_open(37, 35));
    }
}
