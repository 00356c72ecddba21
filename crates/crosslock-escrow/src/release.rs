//! Escrow release on verified unlock messages.
//!
//! Three delivery forms share one application path: a single tagged
//! message, an enumerated batch, and a compressed batch whose full payload
//! arrives out-of-band and is checked against the envelope's hash
//! commitment before any entry is touched.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crosslock_codec::{decode_batch, decode_compressed, decode_unlock_single};
use crosslock_types::{
    fees, CrosslockError, FeeOracle, MessageBridge, OrderStatus, Result, UnlockMsg,
    VerifiedMessage,
};

use crate::ledger::EscrowLedger;

impl EscrowLedger {
    /// Release one escrow on a verified single unlock message.
    pub fn unlock_single(
        &mut self,
        raw: &[u8],
        bridge: &dyn MessageBridge,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let envelope = bridge.verify(raw)?;
        let entry = decode_unlock_single(&envelope.payload)?;
        self.apply_unlock(&entry, &envelope, oracle, now)
    }

    /// Release escrows for an enumerated unlock batch. Entries whose record
    /// already left CREATED are skipped; returns the number released.
    pub fn unlock_batch(
        &mut self,
        raw: &[u8],
        bridge: &dyn MessageBridge,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let envelope = bridge.verify(raw)?;
        let entries = decode_batch(&envelope.payload)?;
        self.apply_entries(&entries, &envelope, oracle, now)
    }

    /// Release escrows for a compressed unlock batch: the envelope carries
    /// only a hash commitment, `payload` is the out-of-band batch body. A
    /// commitment mismatch fails the whole batch before any release.
    pub fn unlock_compressed(
        &mut self,
        raw: &[u8],
        payload: &[u8],
        bridge: &dyn MessageBridge,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let envelope = bridge.verify(raw)?;
        let entries = decode_compressed(&envelope.payload, payload)?;
        self.apply_entries(&entries, &envelope, oracle, now)
    }

    fn apply_entries(
        &mut self,
        entries: &[UnlockMsg],
        envelope: &VerifiedMessage,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        // Every entry is checked before any is applied, so one bad entry
        // cannot leave the batch half-released.
        for entry in entries {
            match self.check_unlock(entry, envelope) {
                // Already unlocked/refunded: duplicate delivery, skipped below.
                Ok(()) | Err(CrosslockError::WrongOrderStatus { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        let mut released = 0usize;
        let mut skipped = 0usize;
        for entry in entries {
            match self.apply_unlock(entry, envelope, oracle, now) {
                Ok(()) => released += 1,
                Err(CrosslockError::WrongOrderStatus { actual, .. }) => {
                    skipped += 1;
                    debug!(
                        order = %entry.order_hash.short(),
                        status = %actual,
                        "unlock entry skipped, record already settled"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        if skipped > 0 {
            info!(released, skipped, "unlock batch applied with skips");
        }
        Ok(released)
    }

    /// Everything that can reject an unlock entry, without touching state.
    fn check_unlock(&self, entry: &UnlockMsg, envelope: &VerifiedMessage) -> Result<()> {
        let record = self
            .records
            .get(&entry.order_hash)
            .ok_or(CrosslockError::OrderNotFound(entry.order_hash))?;

        // The envelope must come from the emitter registered for the chain
        // this order settles on, not merely any trusted emitter.
        self.emitters.ensure_emitter(
            record.dest_chain,
            envelope.emitter_chain,
            envelope.emitter_address,
        )?;

        if entry.src_chain != self.config.local_chain || entry.token_in != record.token_in {
            return Err(CrosslockError::MalformedMessage {
                reason: "unlock entry does not match escrow record".into(),
            });
        }
        if record.status != OrderStatus::Created {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: record.status,
            });
        }
        fees::split(
            record.normalized_amount_in,
            Self::effective_referrer_bps(entry),
            entry.protocol_bps,
        )?;
        Ok(())
    }

    fn apply_unlock(
        &mut self,
        entry: &UnlockMsg,
        envelope: &VerifiedMessage,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.check_unlock(entry, envelope)?;
        let record = *self
            .records
            .get(&entry.order_hash)
            .ok_or(CrosslockError::OrderNotFound(entry.order_hash))?;

        let split = fees::split(
            record.normalized_amount_in,
            Self::effective_referrer_bps(entry),
            entry.protocol_bps,
        )?;

        // Net payout first: if it fails the record stays CREATED with the
        // escrow intact, and the unlock can be redelivered.
        self.vault
            .release(record.token_in, split.net_payout, entry.recipient)?;

        // Fee forwarding is best-effort: a failed share stays locked in the
        // vault and never blocks the driver's payout.
        if split.referrer_amount > 0 {
            if let Err(err) = self
                .vault
                .release(record.token_in, split.referrer_amount, entry.referrer)
            {
                warn!(
                    %err,
                    order = %entry.order_hash.short(),
                    "referrer fee forwarding failed, share stays vaulted"
                );
            }
        }
        if split.protocol_amount > 0 {
            if let Err(err) =
                self.vault
                    .release(record.token_in, split.protocol_amount, oracle.fee_collector())
            {
                warn!(
                    %err,
                    order = %entry.order_hash.short(),
                    "protocol fee forwarding failed, share stays vaulted"
                );
            }
        }

        let stored = self
            .records
            .get_mut(&entry.order_hash)
            .ok_or(CrosslockError::OrderNotFound(entry.order_hash))?;
        Self::transition(stored, OrderStatus::Unlocked, now)?;

        info!(
            order = %entry.order_hash.short(),
            recipient = %entry.recipient,
            net = split.net_payout,
            "escrow released"
        );
        Ok(())
    }

    /// A zero referrer address means no referrer share regardless of rate.
    fn effective_referrer_bps(entry: &UnlockMsg) -> u16 {
        if entry.referrer.is_zero() {
            0
        } else {
            entry.referrer_bps
        }
    }
}
