//! In-memory vault book standing in for on-chain token custody.
//!
//! The book tracks two things per asset: the **locked pool** (amounts the
//! ledger holds in escrow or pulled from fillers) and **credits** per
//! (holder, asset) pair (amounts released and withdrawable). Token-transfer
//! mechanics beyond this model are out of scope; a deployment maps credits
//! to actual transfers.
//!
//! All amounts are in the protocol's normalized 8-decimal unit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Address32, CrosslockError, Result};

/// Per-asset locked pool plus per-(holder, asset) credit ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultBook {
    locked: HashMap<Address32, u64>,
    credits: HashMap<(Address32, Address32), u64>,
}

impl VaultBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of `asset` to the locked pool.
    ///
    /// # Errors
    /// Returns [`CrosslockError::AmountOverflow`] if the pool balance would
    /// exceed `u64::MAX`.
    pub fn lock(&mut self, asset: Address32, amount: u64) -> Result<()> {
        let balance = self.locked.entry(asset).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(CrosslockError::AmountOverflow)?;
        Ok(())
    }

    /// Move `amount` of `asset` from the locked pool to `holder`'s credit.
    ///
    /// # Errors
    /// Returns [`CrosslockError::InsufficientVaultBalance`] if the pool
    /// holds less than `amount`.
    pub fn release(&mut self, asset: Address32, amount: u64, holder: Address32) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let pool = self.locked.get(&asset).copied().unwrap_or(0);
        if pool < amount {
            return Err(CrosslockError::InsufficientVaultBalance {
                needed: amount,
                available: pool,
            });
        }
        // Credit first: if the holder's balance would overflow, the pool
        // must stay untouched.
        self.credit(holder, asset, amount)?;
        self.locked.insert(asset, pool - amount);
        Ok(())
    }

    /// Credit `holder` directly, bypassing the locked pool. Used for fees
    /// deducted before an amount ever enters escrow.
    pub fn credit(&mut self, holder: Address32, asset: Address32, amount: u64) -> Result<()> {
        let balance = self.credits.entry((holder, asset)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(CrosslockError::AmountOverflow)?;
        Ok(())
    }

    /// Currently locked pool balance for `asset`.
    #[must_use]
    pub fn locked(&self, asset: Address32) -> u64 {
        self.locked.get(&asset).copied().unwrap_or(0)
    }

    /// Withdrawable credit of `holder` in `asset`.
    #[must_use]
    pub fn credit_of(&self, holder: Address32, asset: Address32) -> u64 {
        self.credits.get(&(holder, asset)).copied().unwrap_or(0)
    }
}
