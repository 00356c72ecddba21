//! Message-bridge collaborator interface.
//!
//! The ledgers never reimplement bridge verification; they consume this
//! trait. All cross-ledger coordination happens through asynchronous,
//! independently-verifiable signed messages — there is no synchronous call
//! path between the two ledgers.

use serde::{Deserialize, Serialize};

use crate::{Address32, ChainId, Result, Sequence};

/// A bridge message whose signature set has already been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedMessage {
    pub emitter_chain: ChainId,
    pub emitter_address: Address32,
    pub sequence: Sequence,
    pub payload: Vec<u8>,
}

/// The message-bridge collaborator.
pub trait MessageBridge {
    /// Verify a raw signed message and return its envelope and payload.
    ///
    /// # Errors
    /// Returns [`crate::CrosslockError::BridgeVerification`] for any
    /// malformed or unverifiable input.
    fn verify(&self, raw: &[u8]) -> Result<VerifiedMessage>;

    /// Publish a payload, returning the assigned sequence number.
    fn publish(&mut self, payload: Vec<u8>, consistency_level: u8) -> Result<Sequence>;
}

/// In-memory bridge double for tests.
///
/// `verify` treats the raw bytes as a JSON-encoded [`VerifiedMessage`], so
/// tests can mint envelopes for arbitrary emitters with
/// [`MockBridge::envelope`]. `publish` records every payload and assigns
/// sequences from a local counter.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct MockBridge {
    next_sequence: u64,
    pub published: Vec<(Vec<u8>, u8)>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MockBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a raw message that `verify` will accept, claiming the given
    /// emitter identity.
    #[must_use]
    pub fn envelope(
        emitter_chain: ChainId,
        emitter_address: Address32,
        sequence: u64,
        payload: Vec<u8>,
    ) -> Vec<u8> {
        let msg = VerifiedMessage {
            emitter_chain,
            emitter_address,
            sequence: Sequence(sequence),
            payload,
        };
        serde_json::to_vec(&msg).expect("VerifiedMessage serializes")
    }

    /// Payload of the most recently published message.
    #[must_use]
    pub fn last_published(&self) -> Option<&[u8]> {
        self.published.last().map(|(payload, _)| payload.as_slice())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl MessageBridge for MockBridge {
    fn verify(&self, raw: &[u8]) -> Result<VerifiedMessage> {
        serde_json::from_slice(raw).map_err(|e| crate::CrosslockError::BridgeVerification {
            reason: e.to_string(),
        })
    }

    fn publish(&mut self, payload: Vec<u8>, consistency_level: u8) -> Result<Sequence> {
        let seq = Sequence(self.next_sequence);
        self.next_sequence += 1;
        self.published.push((payload, consistency_level));
        Ok(seq)
    }
}
