//! Internal treasury ledger for the guildhall DAO.
//!
//! The ledger is the only place real token custody is accounted for: every
//! unit of every tracked token held by the treasury is attributed to exactly
//! one ledger account. Internal moves are conservation-preserving pairs;
//! balances cross the treasury boundary only through the `TokenVault` seam.

pub mod account;
pub mod balances;
pub mod error;
pub mod registry;
pub mod vault;

pub use account::AccountKey;
pub use balances::Ledger;
pub use error::LedgerError;
pub use registry::TokenRegistry;
pub use vault::{InMemoryVault, TokenVault, VaultError};
