//! Governance and ledger configuration.
//!
//! All admin/guardian state is carried in explicit value types passed into
//! ledger constructors — never ambient globals. Ownership rotates via an
//! explicit two-step propose/claim handshake so a mistyped owner address
//! cannot brick the ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Address32, ChainId, CrosslockError, Result};

/// Owner, pause flag, and rescue binding for one ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub owner: Address32,
    pub pending_owner: Option<Address32>,
    pub paused: bool,
    /// The single chain whose messages the rescue path accepts.
    pub rescue_chain: ChainId,
    /// Emitter address on the rescue chain.
    pub rescue_emitter: Address32,
    /// Fixed destination for rescued funds.
    pub rescue_destination: Address32,
}

impl GovernanceConfig {
    #[must_use]
    pub fn new(
        owner: Address32,
        rescue_chain: ChainId,
        rescue_emitter: Address32,
        rescue_destination: Address32,
    ) -> Self {
        Self {
            owner,
            pending_owner: None,
            paused: false,
            rescue_chain,
            rescue_emitter,
            rescue_destination,
        }
    }

    /// Reject callers other than the current owner.
    pub fn ensure_owner(&self, caller: Address32) -> Result<()> {
        if caller != self.owner {
            return Err(CrosslockError::NotOwner);
        }
        Ok(())
    }

    /// Reject state-changing traffic while paused.
    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            return Err(CrosslockError::Paused);
        }
        Ok(())
    }

    /// Step one of ownership rotation: the current owner names a successor.
    pub fn propose_owner(&mut self, caller: Address32, proposed: Address32) -> Result<()> {
        self.ensure_owner(caller)?;
        self.pending_owner = Some(proposed);
        Ok(())
    }

    /// Step two: the successor claims ownership.
    pub fn claim_owner(&mut self, caller: Address32) -> Result<()> {
        if self.pending_owner != Some(caller) {
            return Err(CrosslockError::NotPendingOwner);
        }
        self.owner = caller;
        self.pending_owner = None;
        Ok(())
    }

    pub fn set_paused(&mut self, caller: Address32, paused: bool) -> Result<()> {
        self.ensure_owner(caller)?;
        self.paused = paused;
        Ok(())
    }
}

/// Registry of trusted emitters: the (chain, address) pairs whose signed
/// messages a ledger accepts as authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmitterRegistry {
    emitters: HashMap<ChainId, Address32>,
    /// Alternate expedited-refund verifier, distinct from per-chain emitters.
    fast_emitter: Option<(ChainId, Address32)>,
    /// Emitter producing auction fulfillment messages.
    auction_emitter: Option<(ChainId, Address32)>,
}

impl EmitterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, chain: ChainId, emitter: Address32) {
        self.emitters.insert(chain, emitter);
    }

    #[must_use]
    pub fn emitter_for(&self, chain: ChainId) -> Option<Address32> {
        self.emitters.get(&chain).copied()
    }

    /// Require that a verified message's envelope matches the registered
    /// emitter for `chain`.
    pub fn ensure_emitter(
        &self,
        chain: ChainId,
        emitter_chain: ChainId,
        emitter_address: Address32,
    ) -> Result<()> {
        let expected = self
            .emitter_for(chain)
            .ok_or(CrosslockError::UnknownEmitterChain(chain))?;
        if emitter_chain != chain || emitter_address != expected {
            return Err(CrosslockError::UntrustedEmitter { chain });
        }
        Ok(())
    }

    pub fn set_fast_emitter(&mut self, chain: ChainId, emitter: Address32) {
        self.fast_emitter = Some((chain, emitter));
    }

    /// Require the fast-refund emitter identity.
    pub fn ensure_fast_emitter(
        &self,
        emitter_chain: ChainId,
        emitter_address: Address32,
    ) -> Result<()> {
        match self.fast_emitter {
            Some((chain, addr)) if emitter_chain == chain && emitter_address == addr => Ok(()),
            Some((chain, _)) => Err(CrosslockError::UntrustedEmitter { chain }),
            None => Err(CrosslockError::UnknownEmitterChain(emitter_chain)),
        }
    }

    pub fn set_auction_emitter(&mut self, chain: ChainId, emitter: Address32) {
        self.auction_emitter = Some((chain, emitter));
    }

    /// Require the auction-chain emitter identity.
    pub fn ensure_auction_emitter(
        &self,
        emitter_chain: ChainId,
        emitter_address: Address32,
    ) -> Result<()> {
        match self.auction_emitter {
            Some((chain, addr)) if emitter_chain == chain && emitter_address == addr => Ok(()),
            Some((chain, _)) => Err(CrosslockError::UntrustedEmitter { chain }),
            None => Err(CrosslockError::UnknownEmitterChain(emitter_chain)),
        }
    }
}

/// Per-ledger chain identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub local_chain: ChainId,
    /// Decimal precision of the local native asset.
    pub native_decimals: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gov() -> GovernanceConfig {
        GovernanceConfig::new(
            Address32([1u8; 32]),
            ChainId(99),
            Address32([2u8; 32]),
            Address32([3u8; 32]),
        )
    }

    #[test]
    fn owner_gate() {
        let cfg = gov();
        assert!(cfg.ensure_owner(Address32([1u8; 32])).is_ok());
        assert!(matches!(
            cfg.ensure_owner(Address32([9u8; 32])).unwrap_err(),
            CrosslockError::NotOwner
        ));
    }

    #[test]
    fn two_step_ownership_rotation() {
        let mut cfg = gov();
        let old = Address32([1u8; 32]);
        let new = Address32([5u8; 32]);

        // Claim without proposal fails.
        assert!(cfg.claim_owner(new).is_err());

        cfg.propose_owner(old, new).unwrap();
        // Old owner still in charge until the claim.
        assert!(cfg.ensure_owner(old).is_ok());

        // Only the proposed address may claim.
        assert!(cfg.claim_owner(Address32([6u8; 32])).is_err());
        cfg.claim_owner(new).unwrap();
        assert!(cfg.ensure_owner(new).is_ok());
        assert!(cfg.ensure_owner(old).is_err());
        assert!(cfg.pending_owner.is_none());
    }

    #[test]
    fn pause_gate() {
        let mut cfg = gov();
        assert!(cfg.ensure_not_paused().is_ok());
        cfg.set_paused(Address32([1u8; 32]), true).unwrap();
        assert!(matches!(
            cfg.ensure_not_paused().unwrap_err(),
            CrosslockError::Paused
        ));
        // Non-owner cannot unpause.
        assert!(cfg.set_paused(Address32([9u8; 32]), false).is_err());
    }

    #[test]
    fn emitter_binding() {
        let mut reg = EmitterRegistry::new();
        let chain = ChainId(4);
        let emitter = Address32([7u8; 32]);
        reg.register(chain, emitter);

        assert!(reg.ensure_emitter(chain, chain, emitter).is_ok());
        // Wrong address.
        assert!(reg.ensure_emitter(chain, chain, Address32([8u8; 32])).is_err());
        // Wrong chain in envelope.
        assert!(reg.ensure_emitter(chain, ChainId(5), emitter).is_err());
        // Unregistered chain.
        assert!(matches!(
            reg.ensure_emitter(ChainId(6), ChainId(6), emitter).unwrap_err(),
            CrosslockError::UnknownEmitterChain(ChainId(6))
        ));
    }

    #[test]
    fn fast_emitter_is_distinct() {
        let mut reg = EmitterRegistry::new();
        reg.register(ChainId(4), Address32([7u8; 32]));
        assert!(reg.ensure_fast_emitter(ChainId(4), Address32([7u8; 32])).is_err());

        reg.set_fast_emitter(ChainId(4), Address32([9u8; 32]));
        assert!(reg.ensure_fast_emitter(ChainId(4), Address32([9u8; 32])).is_ok());
        assert!(reg.ensure_fast_emitter(ChainId(4), Address32([7u8; 32])).is_err());
    }

    #[test]
    fn auction_emitter_binding() {
        let mut reg = EmitterRegistry::new();
        reg.set_auction_emitter(ChainId(10), Address32([0xAA; 32]));
        assert!(reg.ensure_auction_emitter(ChainId(10), Address32([0xAA; 32])).is_ok());
        assert!(reg.ensure_auction_emitter(ChainId(11), Address32([0xAA; 32])).is_err());
    }
}
