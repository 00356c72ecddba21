//! Fee distribution and amount normalization.
//!
//! Fee math operates exclusively on normalized 8-decimal amounts so the
//! result is identical on every chain regardless of asset precision.
//!
//! Conservation invariant, enforced by construction and checked in tests:
//!
//! ```text
//! referrer_amount + protocol_amount + net_payout == amount
//! ```
//!
//! Normalization rounds **down**, never up, so the total paid out can never
//! exceed the amount deposited.

use serde::{Deserialize, Serialize};

use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS, NORMALIZED_DECIMALS};
use crate::{CrosslockError, Result};

/// Exact three-way division of a fulfillment or unlock amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub referrer_amount: u64,
    pub protocol_amount: u64,
    pub net_payout: u64,
}

/// Split `amount` between referrer, protocol, and net payout.
///
/// # Errors
/// Returns [`CrosslockError::FeeRateAboveCap`] if either rate exceeds
/// [`MAX_FEE_BPS`].
pub fn split(amount: u64, referrer_bps: u16, protocol_bps: u16) -> Result<FeeSplit> {
    ensure_bps(referrer_bps)?;
    ensure_bps(protocol_bps)?;

    let referrer_amount = mul_bps(amount, referrer_bps);
    let protocol_amount = mul_bps(amount, protocol_bps);
    // Caps guarantee referrer + protocol <= 1% of amount.
    let net_payout = amount - referrer_amount - protocol_amount;

    Ok(FeeSplit {
        referrer_amount,
        protocol_amount,
        net_payout,
    })
}

/// Reject a fee rate above the protocol cap.
pub fn ensure_bps(bps: u16) -> Result<()> {
    if bps > MAX_FEE_BPS {
        return Err(CrosslockError::FeeRateAboveCap { bps });
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)] // quotient is <= amount
fn mul_bps(amount: u64, bps: u16) -> u64 {
    (u128::from(amount) * u128::from(bps) / u128::from(BPS_DENOMINATOR)) as u64
}

/// Convert a native-precision amount to the normalized 8-decimal unit.
///
/// Integer division (truncation) when the asset has more than 8 decimals;
/// identity otherwise.
///
/// # Errors
/// Returns [`CrosslockError::AmountOverflow`] if the result does not fit
/// the 64-bit wire representation.
pub fn normalize(amount: u128, decimals: u8) -> Result<u64> {
    let scaled = if decimals > NORMALIZED_DECIMALS {
        amount / 10u128.pow(u32::from(decimals - NORMALIZED_DECIMALS))
    } else {
        amount
    };
    u64::try_from(scaled).map_err(|_| CrosslockError::AmountOverflow)
}

/// Convert a normalized amount back to the asset's native precision.
/// Inverse multiplication of [`normalize`]; exact for every value
/// `normalize` can produce.
#[must_use]
pub fn denormalize(amount: u64, decimals: u8) -> u128 {
    if decimals > NORMALIZED_DECIMALS {
        u128::from(amount) * 10u128.pow(u32::from(decimals - NORMALIZED_DECIMALS))
    } else {
        u128::from(amount)
    }
}
