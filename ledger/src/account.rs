//! Ledger account keys.

use guildhall_types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The key of an internal ledger account.
///
/// `Guild` (the collective treasury) and `Escrow` (funds in flight: pending
/// tribute and sponsor deposits) are reserved accounts modeled as enum
/// variants rather than magic addresses, so they can never collide with a
/// real external address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKey {
    /// The collective treasury.
    Guild,
    /// Funds held pending a proposal outcome.
    Escrow,
    /// An ordinary member or applicant account.
    Member(Address),
}

impl AccountKey {
    pub fn member(address: impl Into<Address>) -> Self {
        Self::Member(address.into())
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Member(_))
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guild => write!(f, "GUILD"),
            Self::Escrow => write!(f, "ESCROW"),
            Self::Member(addr) => write!(f, "{}", addr),
        }
    }
}
