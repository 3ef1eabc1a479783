use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("period duration must be non-zero")]
    ZeroPeriodDuration,

    #[error("voting period length must be non-zero")]
    ZeroVotingPeriod,

    #[error("dilution bound must be non-zero")]
    ZeroDilutionBound,

    #[error("token capacity must be non-zero")]
    ZeroTokenCapacity,

    #[error("proposal deposit {deposit} cannot be less than processing reward {reward}")]
    DepositBelowReward { deposit: u128, reward: u128 },
}
