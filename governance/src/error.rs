use guildhall_ledger::{LedgerError, VaultError};
use guildhall_types::{Address, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("{0} is not a member or the delegate of a member in good standing")]
    NotAMember(Address),

    #[error("proposal index {0} out of bounds")]
    InvalidProposalIndex(u64),

    #[error("proposal {0} is already sponsored")]
    AlreadySponsored(u64),

    #[error("proposal {0} was cancelled")]
    ProposalCancelled(u64),

    #[error("proposal at queue index {0} is already processed")]
    AlreadyProcessed(u64),

    #[error("proposal at queue index {0} must wait for its predecessor to be processed")]
    OutOfOrderProcessing(u64),

    #[error("window not open: current period {current}, opens at period {opens_at}")]
    WindowNotOpen { current: u64, opens_at: u64 },

    #[error("window closed: current period {current}, closed at period {closed_at}")]
    WindowClosed { current: u64, closed_at: u64 },

    #[error("member {0} has already voted on this proposal")]
    AlreadyVoted(Address),

    #[error("delegate key {0} is already in use")]
    DuplicateDelegateKey(Address),

    #[error("ragequit blocked: yes vote on queue index {0} is still unresolved")]
    PendingVoteUnresolved(u64),

    #[error("insufficient shares: burning {requested}, holding {held}")]
    InsufficientShares { requested: u128, held: u128 },

    #[error("insufficient loot: burning {requested}, holding {held}")]
    InsufficientLoot { requested: u128, held: u128 },

    #[error("tokens and amounts arrays must be matching lengths: {tokens} vs {amounts}")]
    ArrayLengthMismatch { tokens: usize, amounts: usize },

    #[error("only the proposer may cancel a proposal")]
    NotProposer,

    #[error("operation does not match the proposal's kind")]
    WrongProposalKind,

    #[error("token {0} is not whitelisted")]
    TokenNotWhitelisted(Address),

    #[error("the zero address is not a valid participant")]
    ZeroAddress,

    #[error("applicant {0} is jailed")]
    ApplicantJailed(Address),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error("external transfer failed: {0}")]
    ExternalTransferFailed(#[from] VaultError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("snapshot decode failed: {0}")]
    Snapshot(String),
}
