//! Proportional-redemption arithmetic.

use crate::error::GovernanceError;

/// The exiting member's claim on one token:
/// `floor(balance × burn / total)`, truncating toward zero.
///
/// All tokens in a ragequit are computed against the same pre-burn `total`,
/// so the payout is proportionally identical regardless of the shares/loot
/// split. Truncation dust stays in the guild.
///
/// When the direct product overflows u128, the computation falls back to
/// `(balance / total) × burn + ((balance % total) × burn) / total`, which is
/// exact: writing balance = q·total + r gives
/// floor(balance·burn/total) = q·burn + floor(r·burn/total).
pub fn fair_share(balance: u128, burn: u128, total: u128) -> Result<u128, GovernanceError> {
    if total == 0 || balance == 0 || burn == 0 {
        return Ok(0);
    }
    match balance.checked_mul(burn) {
        Some(product) => Ok(product / total),
        None => {
            let quotient = balance / total;
            let remainder = balance % total;
            let main = quotient
                .checked_mul(burn)
                .ok_or(GovernanceError::Overflow)?;
            let dust = remainder
                .checked_mul(burn)
                .ok_or(GovernanceError::Overflow)?
                / total;
            main.checked_add(dust).ok_or(GovernanceError::Overflow)
        }
    }
}
