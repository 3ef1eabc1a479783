//! Token amount type.
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; denominations are a property of the external
//! token contract, not of this system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An amount of some external fungible token, in raw units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_sub_underflow() {
        assert_eq!(TokenAmount::new(1).checked_sub(TokenAmount::new(2)), None);
        assert_eq!(
            TokenAmount::new(2).checked_sub(TokenAmount::new(1)),
            Some(TokenAmount::new(1))
        );
    }

    #[test]
    fn checked_add_overflow() {
        assert_eq!(
            TokenAmount::new(u128::MAX).checked_add(TokenAmount::new(1)),
            None
        );
    }
}
