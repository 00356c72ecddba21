//! Unlock message batching.
//!
//! Fulfillments flagged for batching park their unlock entries here
//! instead of paying for an immediate bridge publication each. A posting
//! call later drains any subset and publishes one envelope — enumerated,
//! or compressed down to a 35-byte hash commitment with the payload
//! handed to the caller for out-of-band delivery.

use std::collections::HashMap;

use tracing::info;

use crosslock_codec::{encode_batch, encode_batch_payload, encode_compressed};
use crosslock_types::constants::CONSISTENCY_FINALIZED;
use crosslock_types::{CrosslockError, MessageBridge, OrderHash, Result, Sequence, UnlockMsg};

use crate::ledger::SettlementLedger;

/// Buffer of unlock entries awaiting a batch posting, keyed by order hash.
#[derive(Debug, Default)]
pub struct MessageBatcher {
    buffered: HashMap<OrderHash, UnlockMsg>,
}

impl MessageBatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn buffer(&mut self, entry: UnlockMsg) {
        self.buffered.insert(entry.order_hash, entry);
    }

    /// Remove and return the entries for `hashes`, in the given order.
    ///
    /// # Errors
    /// Returns [`CrosslockError::OrderNotFound`] if any hash has no
    /// buffered entry; no entry is removed in that case.
    pub(crate) fn take(&mut self, hashes: &[OrderHash]) -> Result<Vec<UnlockMsg>> {
        for hash in hashes {
            if !self.buffered.contains_key(hash) {
                return Err(CrosslockError::OrderNotFound(*hash));
            }
        }
        Ok(hashes
            .iter()
            .filter_map(|hash| self.buffered.remove(hash))
            .collect())
    }

    #[must_use]
    pub fn contains(&self, hash: &OrderHash) -> bool {
        self.buffered.contains_key(hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffered.is_empty()
    }
}

impl SettlementLedger {
    /// Drain the buffered unlock entries for `hashes` and publish them as
    /// one batch. With `compressed`, only the count and hash commitment go
    /// over the bridge; the returned payload must then be delivered
    /// out-of-band to the escrow side.
    ///
    /// Returns the assigned bridge sequence and the full batch payload.
    pub fn post_batch(
        &mut self,
        hashes: &[OrderHash],
        compressed: bool,
        bridge: &mut dyn MessageBridge,
    ) -> Result<(Sequence, Vec<u8>)> {
        let entries = self.batcher.take(hashes)?;
        let count = u16::try_from(entries.len())
            .map_err(|_| CrosslockError::Internal("batch exceeds u16 count field".into()))?;

        let payload = encode_batch_payload(&entries);
        let envelope = if compressed {
            encode_compressed(count, &payload)
        } else {
            encode_batch(&entries)
        };
        let sequence = bridge.publish(envelope, CONSISTENCY_FINALIZED)?;

        info!(
            count,
            compressed,
            %sequence,
            "unlock batch posted"
        );
        Ok((sequence, payload))
    }
}
