//! Admin rescue, settlement side. Same trust shape as the escrow side:
//! one fixed chain and emitter, exactly-once sequence consumption, funds
//! redirectable only to the fixed rescue destination.

use tracing::{debug, warn};

use crosslock_codec::decode_rescue;
use crosslock_types::{CrosslockError, MessageBridge, Result};

use crate::ledger::SettlementLedger;

impl SettlementLedger {
    /// Apply a verified rescue message: force the order's status and
    /// redirect `amount` of `asset` to the rescue destination.
    pub fn rescue(&mut self, raw: &[u8], bridge: &dyn MessageBridge) -> Result<()> {
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

        let prior = self.status_of(&msg.order_hash);
        self.statuses.insert(msg.order_hash, msg.new_status);
        self.pending.remove(&msg.order_hash);
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
