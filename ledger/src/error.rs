use guildhall_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("arithmetic overflow in ledger accounting")]
    Overflow,

    #[error("token capacity exceeded: {approved} approved + {pending} pending >= max {max}")]
    CapacityExceeded {
        approved: usize,
        pending: usize,
        max: usize,
    },

    #[error("token {0} appears more than once in the genesis list")]
    DuplicateToken(Address),

    #[error("token {0} is already approved")]
    AlreadyApproved(Address),

    #[error("the zero address is not a valid token")]
    ZeroTokenAddress,

    #[error("at least one approved token is required")]
    EmptyTokenList,

    #[error("external transfer failed: {0}")]
    ExternalTransfer(String),
}
