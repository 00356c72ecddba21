//! Admin rescue: the only path allowed to bypass the status transition
//! matrix.
//!
//! Rescue messages are accepted from exactly one governance-fixed chain and
//! emitter, each bridge sequence is consumed at most once, and rescued
//! funds can go nowhere but the fixed rescue destination. Compromising the
//! rescue authority therefore cannot redirect funds to an attacker.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crosslock_codec::decode_rescue;
use crosslock_types::{CrosslockError, MessageBridge, Result};

use crate::ledger::EscrowLedger;

impl EscrowLedger {
    /// Apply a verified rescue message: force the order's status and
    /// redirect `amount` of `asset` to the rescue destination.
    pub fn rescue(
        &mut self,
        raw: &[u8],
        bridge: &dyn MessageBridge,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let envelope = bridge.verify(raw)?;
        if envelope.emitter_chain != self.governance.rescue_chain
            || envelope.emitter_address != self.governance.rescue_emitter
        {
            return Err(CrosslockError::RescueChainUntrusted(envelope.emitter_chain));
        }
        self.consumed.consume(envelope.sequence)?;

        let msg = decode_rescue(&envelope.payload)?;
        if msg.chain != self.config.local_chain {
            debug!(chain = %msg.chain, "rescue message addressed to another chain, ignored");
            return Ok(());
        }

        let prior = {
            let record = self
                .records
                .get_mut(&msg.order_hash)
                .ok_or(CrosslockError::OrderNotFound(msg.order_hash))?;
            let prior = record.status;
            record.status = msg.new_status;
            record.updated_at = now;
            prior
        };
        if msg.amount > 0 {
            self.vault
                .release(msg.asset, msg.amount, self.governance.rescue_destination)?;
        }

        warn!(
            order = %msg.order_hash.short(),
            from = %prior,
            to = %msg.new_status,
            amount = msg.amount,
            "admin rescue applied"
        );
        Ok(())
    }
}
