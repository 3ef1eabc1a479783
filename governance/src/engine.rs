//! The guild engine — orchestrates the proposal pipeline, the ledger, and
//! membership through the full lifecycle.
//!
//! Every mutating operation either completes or fails without effect. All
//! invariant-bearing state is written before any outbound token transfer is
//! issued; a refused transfer rolls the paired ledger move back, standing in
//! for the atomic revert a chain host would provide.

use crate::error::GovernanceError;
use crate::member::{Member, MemberRegistry};
use crate::proposal::{Proposal, ProposalKind, ProposalStatus, Vote};
use crate::ragequit::fair_share;
use guildhall_ledger::{AccountKey, Ledger, LedgerError, TokenRegistry, TokenVault};
use guildhall_types::{Address, GuildConfig, PeriodClock, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Meta-store key used for persisting the engine state.
const ENGINE_META_KEY: &str = "guild_engine_state";

/// The member-governed treasury and proposal-voting engine.
///
/// Proposals move through `submit → sponsor → vote → grace → process`;
/// ragequit and withdrawal act on the ledger directly, independent of the
/// pipeline. The host serializes calls, so no locking is needed — ordering
/// invariants (in-order queue processing, delegate-key uniqueness) make
/// conflicting operations fail fast instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuildEngine {
    config: GuildConfig,
    clock: PeriodClock,
    registry: TokenRegistry,
    ledger: Ledger,
    members: MemberRegistry,
    /// Append-only record of every proposal, keyed by id == index.
    proposals: Vec<Proposal>,
    /// Proposal ids in sponsorship order. Processing walks this strictly
    /// left to right.
    queue: Vec<u64>,
}

impl GuildEngine {
    /// Summon a new guild. The summoner receives one share; the first
    /// approved token becomes the deposit token.
    pub fn summon(
        summoner: Address,
        approved_tokens: Vec<Address>,
        config: GuildConfig,
        now: Timestamp,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;
        if summoner.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        let registry = TokenRegistry::new(approved_tokens, config.max_token_count)?;
        let clock = PeriodClock::new(now, config.period_duration_secs);
        let mut members = MemberRegistry::new();
        members.mint(&summoner, 1, 0)?;

        info!(summoner = %summoner, tokens = registry.token_count(), "guild summoned");
        Ok(Self {
            config,
            clock,
            registry,
            ledger: Ledger::new(),
            members,
            proposals: Vec::new(),
            queue: Vec::new(),
        })
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Submit a standard proposal. The caller escrows the tribute; anyone
    /// may submit, membership is only needed to sponsor.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_proposal(
        &mut self,
        caller: &Address,
        applicant: Address,
        shares_requested: u128,
        loot_requested: u128,
        tribute_offered: TokenAmount,
        tribute_token: Address,
        payment_requested: TokenAmount,
        payment_token: Address,
        details: impl Into<String>,
        vault: &mut impl TokenVault,
    ) -> Result<u64, GovernanceError> {
        if applicant.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        if !self.registry.is_whitelisted(&tribute_token) {
            return Err(GovernanceError::TokenNotWhitelisted(tribute_token));
        }
        if !self.registry.is_whitelisted(&payment_token) {
            return Err(GovernanceError::TokenNotWhitelisted(payment_token));
        }
        if let Some(member) = self.members.member(&applicant) {
            if member.jailed.is_some() {
                return Err(GovernanceError::ApplicantJailed(applicant));
            }
        }

        self.pull_into_escrow(vault, &tribute_token, caller, tribute_offered)?;

        let id = self.proposals.len() as u64;
        self.proposals.push(Proposal::new(
            id,
            ProposalKind::Standard,
            caller.clone(),
            applicant,
            shares_requested,
            loot_requested,
            tribute_offered,
            tribute_token,
            payment_requested,
            payment_token,
            details.into(),
        ));
        debug!(id, proposer = %caller, "proposal submitted");
        Ok(id)
    }

    /// Submit a whitelist proposal for a new treasury token. Reserves one
    /// slot of registry capacity until the proposal is resolved.
    pub fn submit_whitelist_proposal(
        &mut self,
        caller: &Address,
        token: Address,
        details: impl Into<String>,
    ) -> Result<u64, GovernanceError> {
        self.registry.submit_whitelist(&token)?;

        let deposit_token = self.registry.deposit_token().clone();
        let id = self.proposals.len() as u64;
        self.proposals.push(Proposal::new(
            id,
            ProposalKind::Whitelist { token },
            caller.clone(),
            Address::zero(),
            0,
            0,
            TokenAmount::ZERO,
            deposit_token.clone(),
            TokenAmount::ZERO,
            deposit_token,
            details.into(),
        ));
        debug!(id, proposer = %caller, "whitelist proposal submitted");
        Ok(id)
    }

    /// Withdraw an unsponsored proposal. Proposer-only; returns any
    /// escrowed tribute to the applicant.
    pub fn cancel_proposal(
        &mut self,
        caller: &Address,
        proposal_id: u64,
        vault: &mut impl TokenVault,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get(proposal_id as usize)
            .ok_or(GovernanceError::InvalidProposalIndex(proposal_id))?;
        if proposal.status.is_cancelled() {
            return Err(GovernanceError::ProposalCancelled(proposal_id));
        }
        if proposal.status.is_sponsored() {
            return Err(GovernanceError::AlreadySponsored(proposal_id));
        }
        if proposal.proposer != *caller {
            return Err(GovernanceError::NotProposer);
        }
        let applicant = proposal.applicant.clone();
        let tribute_token = proposal.tribute_token.clone();
        let tribute = proposal.tribute_offered;
        let is_whitelist = matches!(proposal.kind, ProposalKind::Whitelist { .. });

        self.refund_from_escrow(vault, &tribute_token, &applicant, tribute)?;
        if is_whitelist {
            self.registry.resolve_pending();
        }
        self.proposals[proposal_id as usize].status = ProposalStatus::Cancelled;
        debug!(id = proposal_id, "proposal cancelled");
        Ok(())
    }

    // ── Sponsorship ──────────────────────────────────────────────────────

    /// Queue a submitted proposal for voting. The caller (a member or a
    /// member's delegate) posts the proposal deposit.
    ///
    /// The starting period is strictly after both the current period and the
    /// previously queued proposal's start, so voting windows open in queue
    /// order and vote-weight snapshots stay monotonically consistent.
    pub fn sponsor_proposal(
        &mut self,
        caller: &Address,
        proposal_id: u64,
        vault: &mut impl TokenVault,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let sponsor = self.resolve_active_member(caller)?;
        {
            let proposal = self
                .proposals
                .get(proposal_id as usize)
                .ok_or(GovernanceError::InvalidProposalIndex(proposal_id))?;
            if proposal.status.is_cancelled() {
                return Err(GovernanceError::ProposalCancelled(proposal_id));
            }
            if proposal.status.is_sponsored() {
                return Err(GovernanceError::AlreadySponsored(proposal_id));
            }
            if matches!(proposal.kind, ProposalKind::Whitelist { .. }) {
                self.registry.check_sponsor_capacity()?;
            }
        }

        let deposit_token = self.registry.deposit_token().clone();
        self.pull_into_escrow(vault, &deposit_token, caller, self.config.proposal_deposit)?;

        let current = self.clock.current_period(now);
        let last_queued_start = self
            .queue
            .last()
            .and_then(|id| self.proposals[*id as usize].status.starting_period())
            .unwrap_or(0);
        let starting_period = current
            .max(last_queued_start)
            .checked_add(1)
            .ok_or(GovernanceError::Overflow)?;
        let queue_index = self.queue.len() as u64;

        let proposal = &mut self.proposals[proposal_id as usize];
        proposal.sponsor = Some(sponsor.clone());
        proposal.status = ProposalStatus::Sponsored {
            starting_period,
            queue_index,
        };
        self.queue.push(proposal_id);
        debug!(
            id = proposal_id,
            sponsor = %sponsor,
            starting_period,
            queue_index,
            "proposal sponsored"
        );
        Ok(())
    }

    // ── Voting ───────────────────────────────────────────────────────────

    /// Cast a ballot on a queued proposal. The caller resolves to a member
    /// through the delegate key; vote weight is the member's shares.
    pub fn submit_vote(
        &mut self,
        caller: &Address,
        queue_index: u64,
        vote: Vote,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let member_addr = self.resolve_active_member(caller)?;
        let weight = self
            .members
            .member(&member_addr)
            .map(|m| m.shares)
            .unwrap_or(0);
        let total = self.members.total_shares_and_loot()?;
        let current = self.clock.current_period(now);
        let voting_len = self.config.voting_period_length;

        let proposal_id = *self
            .queue
            .get(queue_index as usize)
            .ok_or(GovernanceError::InvalidProposalIndex(queue_index))?;
        let proposal = &mut self.proposals[proposal_id as usize];
        let start = proposal
            .status
            .starting_period()
            .ok_or(GovernanceError::InvalidProposalIndex(queue_index))?;
        if current < start {
            return Err(GovernanceError::WindowNotOpen {
                current,
                opens_at: start,
            });
        }
        let closed_at = start.saturating_add(voting_len);
        if current >= closed_at {
            return Err(GovernanceError::WindowClosed { current, closed_at });
        }

        proposal.record_ballot(member_addr.clone(), vote, weight, total)?;
        if vote == Vote::Yes {
            self.members.note_yes_vote(&member_addr, queue_index);
        }
        debug!(queue_index, member = %member_addr, ?vote, weight, "vote recorded");
        Ok(())
    }

    // ── Processing ───────────────────────────────────────────────────────

    /// Process a standard proposal once its grace window has elapsed.
    /// Callable by anyone; the caller earns the processing reward.
    /// Returns whether the proposal passed.
    pub fn process_proposal(
        &mut self,
        caller: &Address,
        queue_index: u64,
        vault: &mut impl TokenVault,
        now: Timestamp,
    ) -> Result<bool, GovernanceError> {
        let proposal_id = self.validate_processing(queue_index, now)?;
        let proposal = &self.proposals[proposal_id as usize];
        if proposal.kind != ProposalKind::Standard {
            return Err(GovernanceError::WrongProposalKind);
        }
        let Some(sponsor) = proposal.sponsor.clone() else {
            // Unreachable: queued proposals always carry a sponsor.
            return Err(GovernanceError::InvalidProposalIndex(queue_index));
        };
        let applicant = proposal.applicant.clone();
        let tribute_token = proposal.tribute_token.clone();
        let tribute = proposal.tribute_offered;
        let payment_token = proposal.payment_token.clone();
        let payment = proposal.payment_requested;
        let shares = proposal.shares_requested;
        let loot = proposal.loot_requested;
        let starting_period = proposal.status.starting_period().unwrap_or(0);

        let mut did_pass = self.vote_carried(proposal)?;
        if self
            .members
            .member(&applicant)
            .is_some_and(|m| m.jailed.is_some())
        {
            did_pass = false;
        }
        // A passing payment the guild cannot cover fails the proposal
        // rather than erroring at processing time.
        if payment > self.ledger.balance_of(&AccountKey::Guild, &payment_token) {
            did_pass = false;
        }

        if did_pass {
            self.members.mint(&applicant, shares, loot)?;
            self.ledger.transfer_internal(
                &AccountKey::Escrow,
                &AccountKey::Guild,
                &tribute_token,
                tribute,
            )?;
            self.ledger.transfer_internal(
                &AccountKey::Guild,
                &AccountKey::Member(applicant.clone()),
                &payment_token,
                payment,
            )?;
        } else {
            self.refund_from_escrow(vault, &tribute_token, &applicant, tribute)?;
        }

        self.distribute_deposit(&sponsor, caller)?;
        self.proposals[proposal_id as usize].status = ProposalStatus::Processed {
            passed: did_pass,
            starting_period,
            queue_index,
        };
        info!(queue_index, id = proposal_id, did_pass, "proposal processed");
        Ok(did_pass)
    }

    /// Process a whitelist proposal. A passing vote whose token no longer
    /// fits the registry (capacity filled, or another proposal approved the
    /// same token first) is processed as failed, never erroring.
    pub fn process_whitelist_proposal(
        &mut self,
        caller: &Address,
        queue_index: u64,
        vault: &mut impl TokenVault,
        now: Timestamp,
    ) -> Result<bool, GovernanceError> {
        let _ = vault; // whitelist processing moves no external tokens
        let proposal_id = self.validate_processing(queue_index, now)?;
        let proposal = &self.proposals[proposal_id as usize];
        let ProposalKind::Whitelist { token } = proposal.kind.clone() else {
            return Err(GovernanceError::WrongProposalKind);
        };
        let Some(sponsor) = proposal.sponsor.clone() else {
            return Err(GovernanceError::InvalidProposalIndex(queue_index));
        };
        let starting_period = proposal.status.starting_period().unwrap_or(0);

        let did_pass = self.vote_carried(proposal)? && self.registry.can_approve(&token);
        if did_pass {
            self.registry.approve(&token)?;
        }
        self.registry.resolve_pending();

        self.distribute_deposit(&sponsor, caller)?;
        self.proposals[proposal_id as usize].status = ProposalStatus::Processed {
            passed: did_pass,
            starting_period,
            queue_index,
        };
        info!(queue_index, id = proposal_id, did_pass, token = %token, "whitelist proposal processed");
        Ok(did_pass)
    }

    // ── Exit ─────────────────────────────────────────────────────────────

    /// Burn shares/loot and withdraw the proportional claim on every
    /// approved token into the caller's ledger balance. Needs no approval —
    /// the exit guarantee is unconditional for members with no unresolved
    /// yes vote.
    pub fn ragequit(
        &mut self,
        caller: &Address,
        shares_to_burn: u128,
        loot_to_burn: u128,
    ) -> Result<(), GovernanceError> {
        let member = self
            .members
            .member(caller)
            .ok_or_else(|| GovernanceError::NotAMember(caller.clone()))?;
        if member.shares < shares_to_burn {
            return Err(GovernanceError::InsufficientShares {
                requested: shares_to_burn,
                held: member.shares,
            });
        }
        if member.loot < loot_to_burn {
            return Err(GovernanceError::InsufficientLoot {
                requested: loot_to_burn,
                held: member.loot,
            });
        }
        if let Some(index) = member.highest_index_yes_vote {
            let unresolved = self
                .queue
                .get(index as usize)
                .map(|id| !self.proposals[*id as usize].status.is_processed())
                .unwrap_or(true);
            if unresolved {
                return Err(GovernanceError::PendingVoteUnresolved(index));
            }
        }

        // One pre-burn denominator for every token, so the payout is
        // proportionally identical regardless of the shares/loot split.
        let total = self.members.total_shares_and_loot()?;
        let burn = shares_to_burn
            .checked_add(loot_to_burn)
            .ok_or(GovernanceError::Overflow)?;
        let member_key = AccountKey::Member(caller.clone());
        let tokens: Vec<Address> = self.registry.approved_tokens().to_vec();
        for token in &tokens {
            let guild_balance = self.ledger.balance_of(&AccountKey::Guild, token);
            let amount = fair_share(guild_balance.raw(), burn, total)?;
            if amount > 0 {
                self.ledger.transfer_internal(
                    &AccountKey::Guild,
                    &member_key,
                    token,
                    TokenAmount::new(amount),
                )?;
            }
        }

        self.members.burn(caller, shares_to_burn, loot_to_burn)?;
        info!(member = %caller, shares = shares_to_burn, loot = loot_to_burn, "ragequit");
        Ok(())
    }

    /// Drain ledger balances out to the caller's wallet. Entries are
    /// processed in order; a repeated token debits against the balance left
    /// by earlier entries. With `use_max`, each entry takes whatever remains
    /// for that token and its amount argument is ignored.
    pub fn withdraw_balances(
        &mut self,
        caller: &Address,
        tokens: &[Address],
        amounts: &[TokenAmount],
        use_max: bool,
        vault: &mut impl TokenVault,
    ) -> Result<(), GovernanceError> {
        if tokens.len() != amounts.len() {
            return Err(GovernanceError::ArrayLengthMismatch {
                tokens: tokens.len(),
                amounts: amounts.len(),
            });
        }
        let account = AccountKey::Member(caller.clone());

        // Resolve every entry against a scratch view first, so an
        // insufficient entry fails before anything is debited.
        let mut scratch: HashMap<&Address, u128> = HashMap::new();
        let mut resolved: Vec<TokenAmount> = Vec::with_capacity(tokens.len());
        for (token, requested) in tokens.iter().zip(amounts) {
            let available = *scratch
                .entry(token)
                .or_insert_with(|| self.ledger.balance_of(&account, token).raw());
            let amount = if use_max { available } else { requested.raw() };
            let remaining =
                available
                    .checked_sub(amount)
                    .ok_or(LedgerError::InsufficientBalance {
                        needed: amount,
                        available,
                    })?;
            scratch.insert(token, remaining);
            resolved.push(TokenAmount::new(amount));
        }

        // Commit every ledger debit, then issue the external transfers.
        for (token, amount) in tokens.iter().zip(&resolved) {
            self.ledger.debit(&account, token, *amount)?;
        }
        for (i, (token, amount)) in tokens.iter().zip(&resolved).enumerate() {
            if amount.is_zero() {
                continue;
            }
            if let Err(err) = vault.transfer(token, caller, *amount) {
                // Re-credit everything not yet paid out, then surface the
                // failure.
                for (token, amount) in tokens.iter().zip(&resolved).skip(i) {
                    self.ledger.credit(&account, token, *amount)?;
                }
                return Err(err.into());
            }
        }
        debug!(member = %caller, entries = tokens.len(), use_max, "balances withdrawn");
        Ok(())
    }

    /// Reassign the caller's delegate key. The key must stay a 1:1 mapping
    /// onto members.
    pub fn update_delegate_key(
        &mut self,
        caller: &Address,
        new_key: Address,
    ) -> Result<(), GovernanceError> {
        if new_key.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        let member = self
            .members
            .member(caller)
            .ok_or_else(|| GovernanceError::NotAMember(caller.clone()))?;
        if member.total_weight() == 0 {
            return Err(GovernanceError::NotAMember(caller.clone()));
        }
        self.members.update_delegate_key(caller, &new_key)
    }

    // ── Read-only surface ────────────────────────────────────────────────

    pub fn config(&self) -> &GuildConfig {
        &self.config
    }

    pub fn current_period(&self, now: Timestamp) -> u64 {
        self.clock.current_period(now)
    }

    pub fn clock(&self) -> &PeriodClock {
        &self.clock
    }

    pub fn total_shares(&self) -> u128 {
        self.members.total_shares()
    }

    pub fn total_loot(&self) -> u128 {
        self.members.total_loot()
    }

    pub fn token_count(&self) -> usize {
        self.registry.token_count()
    }

    pub fn approved_token(&self, index: usize) -> Option<&Address> {
        self.registry.approved_token(index)
    }

    pub fn approved_tokens(&self) -> &[Address] {
        self.registry.approved_tokens()
    }

    pub fn is_whitelisted(&self, token: &Address) -> bool {
        self.registry.is_whitelisted(token)
    }

    pub fn deposit_token(&self) -> &Address {
        self.registry.deposit_token()
    }

    pub fn pending_whitelist_count(&self) -> usize {
        self.registry.pending_whitelist_count()
    }

    pub fn balance_of(&self, account: &AccountKey, token: &Address) -> TokenAmount {
        self.ledger.balance_of(account, token)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn member(&self, address: &Address) -> Option<&Member> {
        self.members.member(address)
    }

    pub fn member_address_by_delegate_key(&self, key: &Address) -> Option<&Address> {
        self.members.resolve_delegate(key)
    }

    pub fn proposal(&self, proposal_id: u64) -> Option<&Proposal> {
        self.proposals.get(proposal_id as usize)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub fn queued_proposal(&self, queue_index: u64) -> Option<&Proposal> {
        self.queue
            .get(queue_index as usize)
            .and_then(|id| self.proposals.get(*id as usize))
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Serialize the full engine state for meta-store persistence.
    pub fn save_state(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// Restore an engine from serialized state.
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// The meta-store key used for engine persistence.
    pub fn meta_key() -> &'static str {
        ENGINE_META_KEY
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Resolve a caller (member or delegate key) to a member in good
    /// standing — holding a nonzero combined shares+loot weight.
    fn resolve_active_member(&self, caller: &Address) -> Result<Address, GovernanceError> {
        let member_addr = self
            .members
            .resolve_delegate(caller)
            .cloned()
            .ok_or_else(|| GovernanceError::NotAMember(caller.clone()))?;
        let standing = self
            .members
            .member(&member_addr)
            .map(|m| m.total_weight())
            .unwrap_or(0);
        if standing == 0 {
            return Err(GovernanceError::NotAMember(caller.clone()));
        }
        Ok(member_addr)
    }

    /// Yes votes carry and the dilution bound holds: total shares+loot may
    /// not have grown past `max_at_yes × dilution_bound` since the vote.
    fn vote_carried(&self, proposal: &Proposal) -> Result<bool, GovernanceError> {
        if proposal.yes_votes <= proposal.no_votes {
            return Ok(false);
        }
        let total = self.members.total_shares_and_loot()?;
        let ceiling = proposal
            .max_total_shares_and_loot_at_yes_vote
            .saturating_mul(self.config.dilution_bound as u128);
        Ok(total <= ceiling)
    }

    /// Shared processing preconditions: in bounds, grace elapsed, not yet
    /// processed, and the predecessor in the queue already processed.
    fn validate_processing(
        &self,
        queue_index: u64,
        now: Timestamp,
    ) -> Result<u64, GovernanceError> {
        let proposal_id = *self
            .queue
            .get(queue_index as usize)
            .ok_or(GovernanceError::InvalidProposalIndex(queue_index))?;
        let proposal = &self.proposals[proposal_id as usize];
        if proposal.status.is_processed() {
            return Err(GovernanceError::AlreadyProcessed(queue_index));
        }
        let current = self.clock.current_period(now);
        let opens_at = proposal
            .processing_opens_at(
                self.config.voting_period_length,
                self.config.grace_period_length,
            )
            .ok_or(GovernanceError::InvalidProposalIndex(queue_index))?;
        if current < opens_at {
            return Err(GovernanceError::WindowNotOpen { current, opens_at });
        }
        if queue_index > 0 {
            let prev_id = self.queue[(queue_index - 1) as usize];
            if !self.proposals[prev_id as usize].status.is_processed() {
                return Err(GovernanceError::OutOfOrderProcessing(queue_index));
            }
        }
        Ok(proposal_id)
    }

    /// Pull external tokens into custody and credit escrow. If the credit
    /// cannot be recorded the pull is undone, keeping custody and ledger in
    /// step.
    fn pull_into_escrow(
        &mut self,
        vault: &mut impl TokenVault,
        token: &Address,
        from: &Address,
        amount: TokenAmount,
    ) -> Result<(), GovernanceError> {
        if amount.is_zero() {
            return Ok(());
        }
        vault.transfer_from(token, from, amount)?;
        if let Err(err) = self.ledger.credit(&AccountKey::Escrow, token, amount) {
            let _ = vault.transfer(token, from, amount);
            return Err(err.into());
        }
        Ok(())
    }

    /// Debit escrow and pay the amount back out externally. A refused
    /// transfer restores the escrow balance.
    fn refund_from_escrow(
        &mut self,
        vault: &mut impl TokenVault,
        token: &Address,
        recipient: &Address,
        amount: TokenAmount,
    ) -> Result<(), GovernanceError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger.debit(&AccountKey::Escrow, token, amount)?;
        if let Err(err) = vault.transfer(token, recipient, amount) {
            self.ledger.credit(&AccountKey::Escrow, token, amount)?;
            return Err(err.into());
        }
        Ok(())
    }

    /// Split the escrowed deposit: processing reward to the processor, the
    /// remainder back to the sponsor — both as ledger credits.
    fn distribute_deposit(
        &mut self,
        sponsor: &Address,
        processor: &Address,
    ) -> Result<(), GovernanceError> {
        let token = self.registry.deposit_token().clone();
        let reward = self.config.processing_reward;
        let remainder = self
            .config
            .proposal_deposit
            .checked_sub(reward)
            .ok_or(GovernanceError::Overflow)?;
        self.ledger.transfer_internal(
            &AccountKey::Escrow,
            &AccountKey::Member(processor.clone()),
            &token,
            reward,
        )?;
        self.ledger.transfer_internal(
            &AccountKey::Escrow,
            &AccountKey::Member(sponsor.clone()),
            &token,
            remainder,
        )?;
        Ok(())
    }
}
