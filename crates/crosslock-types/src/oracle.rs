//! Fee-oracle collaborator interface.
//!
//! The bps pricing policy lives outside this core. Oracle calls are wrapped
//! by [`guarded_protocol_bps`] so a failing or misbehaving oracle degrades
//! to a zero protocol fee instead of aborting order creation or settlement.

use crate::constants::MAX_FEE_BPS;
use crate::{Address32, ChainId, Result};

/// External pricing policy for the protocol fee share.
pub trait FeeOracle {
    /// Protocol fee rate in bps for the given order economics.
    ///
    /// # Errors
    /// Any error is swallowed by [`guarded_protocol_bps`].
    fn protocol_bps(
        &self,
        amount_in: u64,
        token_in: Address32,
        token_out: Address32,
        dest_chain: ChainId,
        referrer_bps: u16,
    ) -> Result<u16>;

    /// Account credited with the protocol fee share.
    fn fee_collector(&self) -> Address32;
}

/// Query the oracle, degrading any failure or over-cap return to 0 bps.
/// A misbehaving oracle must never block settlement.
pub fn guarded_protocol_bps(
    oracle: &dyn FeeOracle,
    amount_in: u64,
    token_in: Address32,
    token_out: Address32,
    dest_chain: ChainId,
    referrer_bps: u16,
) -> u16 {
    match oracle.protocol_bps(amount_in, token_in, token_out, dest_chain, referrer_bps) {
        Ok(bps) if bps <= MAX_FEE_BPS => bps,
        Ok(bps) => {
            tracing::warn!(bps, cap = MAX_FEE_BPS, "fee oracle returned over-cap rate, using 0");
            0
        }
        Err(err) => {
            tracing::warn!(%err, "fee oracle failed, using 0 bps");
            0
        }
    }
}

/// Fixed-rate oracle for tests.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Copy)]
pub struct StaticFeeOracle {
    pub bps: u16,
    pub collector: Address32,
}

#[cfg(any(test, feature = "test-helpers"))]
impl FeeOracle for StaticFeeOracle {
    fn protocol_bps(
        &self,
        _amount_in: u64,
        _token_in: Address32,
        _token_out: Address32,
        _dest_chain: ChainId,
        _referrer_bps: u16,
    ) -> Result<u16> {
        Ok(self.bps)
    }

    fn fee_collector(&self) -> Address32 {
        self.collector
    }
}

/// Always-failing oracle for degradation tests.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingFeeOracle;

#[cfg(any(test, feature = "test-helpers"))]
impl FeeOracle for FailingFeeOracle {
    fn protocol_bps(
        &self,
        _amount_in: u64,
        _token_in: Address32,
        _token_out: Address32,
        _dest_chain: ChainId,
        _referrer_bps: u16,
    ) -> Result<u16> {
        Err(crate::CrosslockError::Internal("oracle unavailable".into()))
    }

    fn fee_collector(&self) -> Address32 {
        Address32::ZERO
    }
}
