//! Destination-driven cancellation.
//!
//! Anyone may cancel an order on the destination side once its deadline
//! has passed and nothing has been fulfilled locally. The cancellation
//! publishes the refund message the escrow side needs to return the
//! deposit, paying the canceler and the refund relayer the fixed fees the
//! trader committed to in the key.

use chrono::{DateTime, Utc};
use tracing::info;

use crosslock_codec::encode_refund;
use crosslock_types::constants::CONSISTENCY_FINALIZED;
use crosslock_types::{
    Address32, CrosslockError, MessageBridge, OrderKey, OrderStatus, RefundMsg, Result, Sequence,
};

use crate::ledger::{unix_seconds, SettlementLedger};

impl SettlementLedger {
    /// Cancel an unfulfilled order after its deadline and publish the
    /// refund message for the escrow side.
    pub fn cancel_order(
        &mut self,
        key: &OrderKey,
        canceler: Address32,
        bridge: &mut dyn MessageBridge,
        now: DateTime<Utc>,
    ) -> Result<Sequence> {
        if key.params.dest_chain != self.config.local_chain {
            return Err(CrosslockError::InvalidOrder {
                reason: "order is not destined for this chain".into(),
            });
        }
        let hash = crosslock_codec::order_hash(key);

        let status = self.status_of(&hash);
        if status != OrderStatus::Created {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: status,
            });
        }
        if unix_seconds(now) <= key.params.deadline {
            return Err(CrosslockError::DeadlineNotReached {
                deadline: key.params.deadline,
            });
        }

        self.statuses.insert(hash, OrderStatus::Canceled);
        let msg = RefundMsg {
            order_hash: hash,
            src_chain: key.src_chain,
            token_in: key.token_in,
            trader: key.trader,
            canceler,
            cancel_fee: key.params.cancel_fee,
            refund_fee: key.params.refund_fee,
        };
        let sequence = bridge.publish(encode_refund(&msg), CONSISTENCY_FINALIZED)?;

        info!(
            order = %hash.short(),
            canceler = %canceler,
            %sequence,
            "order canceled, refund message published"
        );
        Ok(sequence)
    }
}
