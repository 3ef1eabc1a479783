//! Account and token addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An external address — a member wallet, an applicant, or a token contract.
///
/// Addresses are opaque strings supplied by the execution host. The only
/// address with protocol meaning is the zero address, which is rejected
/// everywhere a real participant or token is expected. The treasury's
/// reserved accounts (Guild, Escrow) are deliberately *not* addresses —
/// see `AccountKey` in the ledger crate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The zero address: 40 hex zeroes, `0x`-prefixed.
    pub fn zero() -> Self {
        Self(format!("0x{:0>40}", ""))
    }

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.len() > 2
            && self.0.starts_with("0x")
            && self.0[2..].bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
