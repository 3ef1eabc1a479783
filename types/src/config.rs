//! Guild configuration — every tunable value in one place.

use crate::amount::TokenAmount;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Fixed parameters chosen at summoning time.
///
/// Durations for the voting and grace windows are counted in periods, not
/// seconds. The deposit and reward are denominated in the deposit token
/// (the first approved token).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuildConfig {
    /// Length of one period in seconds.
    pub period_duration_secs: u64,

    /// Number of periods a proposal's voting window stays open.
    pub voting_period_length: u64,

    /// Number of periods between voting close and processing eligibility.
    /// The grace window is the members' chance to ragequit before a passing
    /// proposal's effects land.
    pub grace_period_length: u64,

    /// Deposit (in the deposit token) a sponsor posts when queueing a
    /// proposal. Returned at processing, minus the processing reward.
    pub proposal_deposit: TokenAmount,

    /// Maximum allowed growth factor of total shares+loot between a
    /// proposal's yes vote and its processing. Beyond it the proposal is
    /// treated as failed.
    pub dilution_bound: u64,

    /// Portion of the deposit paid to whoever processes a proposal.
    pub processing_reward: TokenAmount,

    /// Hard cap on the number of tracked tokens. Ragequit iterates every
    /// approved token, so this bound keeps exit affordable.
    pub max_token_count: usize,
}

impl GuildConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_duration_secs == 0 {
            return Err(ConfigError::ZeroPeriodDuration);
        }
        if self.voting_period_length == 0 {
            return Err(ConfigError::ZeroVotingPeriod);
        }
        if self.dilution_bound == 0 {
            return Err(ConfigError::ZeroDilutionBound);
        }
        if self.max_token_count == 0 {
            return Err(ConfigError::ZeroTokenCapacity);
        }
        if self.proposal_deposit < self.processing_reward {
            return Err(ConfigError::DepositBelowReward {
                deposit: self.proposal_deposit.raw(),
                reward: self.processing_reward.raw(),
            });
        }
        Ok(())
    }
}

impl Default for GuildConfig {
    /// The reference deployment: 4.8-hour periods, 35-period voting and
    /// grace windows, deposit 10 / reward 1, dilution bound 3x, 10 tokens.
    fn default() -> Self {
        Self {
            period_duration_secs: 17_280,
            voting_period_length: 35,
            grace_period_length: 35,
            proposal_deposit: TokenAmount::new(10),
            dilution_bound: 3,
            processing_reward: TokenAmount::new(1),
            max_token_count: 10,
        }
    }
}
