//! Deposit return paths: local deadline cancellation and destination-driven
//! refunds.
//!
//! `cancel_order` needs no bridge message — after the deadline the source
//! chain can see for itself that the order may die, and the settlement side
//! independently refuses post-deadline fulfillment. `refund_order` is the
//! message-driven form, paying out the fixed cancel/refund fees the trader
//! agreed to in the key.

use chrono::{DateTime, Utc};
use tracing::info;

use crosslock_codec::{decode_refund, order_hash};
use crosslock_types::{
    Address32, CrosslockError, MessageBridge, OrderKey, OrderStatus, Result,
};

use crate::ledger::{unix_seconds, EscrowLedger};

impl EscrowLedger {
    /// Source-initiated cancellation after the deadline: the full deposit
    /// goes back to the trader, no fees.
    pub fn cancel_order(&mut self, key: &OrderKey, now: DateTime<Utc>) -> Result<()> {
        let hash = order_hash(key);
        let record = *self
            .records
            .get(&hash)
            .ok_or(CrosslockError::OrderNotFound(hash))?;

        if record.status != OrderStatus::Created {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: record.status,
            });
        }
        if unix_seconds(now) <= key.params.deadline {
            return Err(CrosslockError::DeadlineNotReached {
                deadline: key.params.deadline,
            });
        }

        {
            let stored = self
                .records
                .get_mut(&hash)
                .ok_or(CrosslockError::OrderNotFound(hash))?;
            Self::transition(stored, OrderStatus::Canceled, now)?;
        }
        self.vault
            .release(record.token_in, record.normalized_amount_in, record.trader)?;

        info!(
            order = %hash.short(),
            trader = %record.trader,
            amount = record.normalized_amount_in,
            "order canceled, deposit returned"
        );
        Ok(())
    }

    /// Destination-driven refund on a verified refund message. Pays the
    /// cancel fee to the canceler named in the message, the refund fee to
    /// the submitting relayer, and the remainder to the trader.
    ///
    /// With `fast` the envelope is checked against the alternate fast
    /// emitter instead of the per-chain one.
    pub fn refund_order(
        &mut self,
        raw: &[u8],
        fast: bool,
        relayer: Address32,
        bridge: &dyn MessageBridge,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let envelope = bridge.verify(raw)?;
        let msg = decode_refund(&envelope.payload)?;

        let record = *self
            .records
            .get(&msg.order_hash)
            .ok_or(CrosslockError::OrderNotFound(msg.order_hash))?;

        if fast {
            self.emitters
                .ensure_fast_emitter(envelope.emitter_chain, envelope.emitter_address)?;
        } else {
            self.emitters.ensure_emitter(
                record.dest_chain,
                envelope.emitter_chain,
                envelope.emitter_address,
            )?;
        }

        if msg.src_chain != self.config.local_chain
            || msg.token_in != record.token_in
            || msg.trader != record.trader
        {
            return Err(CrosslockError::MalformedMessage {
                reason: "refund message does not match escrow record".into(),
            });
        }
        if record.status != OrderStatus::Created {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: record.status,
            });
        }

        let fixed_fees = msg
            .cancel_fee
            .checked_add(msg.refund_fee)
            .ok_or(CrosslockError::AmountOverflow)?;
        let remainder = record
            .normalized_amount_in
            .checked_sub(fixed_fees)
            .ok_or(CrosslockError::FeesExceedDeposit {
                fees: fixed_fees,
                deposit: record.normalized_amount_in,
            })?;

        {
            let stored = self
                .records
                .get_mut(&msg.order_hash)
                .ok_or(CrosslockError::OrderNotFound(msg.order_hash))?;
            Self::transition(stored, OrderStatus::Refunded, now)?;
        }
        self.vault
            .release(record.token_in, msg.cancel_fee, msg.canceler)?;
        self.vault.release(record.token_in, msg.refund_fee, relayer)?;
        self.vault.release(record.token_in, remainder, record.trader)?;

        info!(
            order = %msg.order_hash.short(),
            trader = %record.trader,
            remainder,
            "order refunded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use crosslock_codec::encode_refund;
    use crosslock_types::{
        ChainId, GovernanceConfig, LedgerConfig, MockBridge, RefundMsg, StaticFeeOracle,
    };

    use super::*;

    const OWNER: Address32 = Address32([0x01; 32]);
    const TOKEN: Address32 = Address32([0x11; 32]);
    const CANCELER: Address32 = Address32([0x55; 32]);
    const RELAYER: Address32 = Address32([0x56; 32]);
    const LOCAL: ChainId = ChainId(1);
    const DEST: ChainId = ChainId(4);
    const DEST_EMITTER: Address32 = Address32([0x77; 32]);
    const FAST_EMITTER: Address32 = Address32([0x78; 32]);

    fn setup() -> (EscrowLedger, OrderKey, crosslock_types::OrderHash) {
        let mut ledger = EscrowLedger::new(
            LedgerConfig {
                local_chain: LOCAL,
                native_decimals: 18,
            },
            GovernanceConfig::new(OWNER, ChainId(99), Address32([2u8; 32]), Address32([3u8; 32])),
        );
        ledger.register_emitter(OWNER, DEST, DEST_EMITTER).unwrap();
        ledger.set_fast_emitter(OWNER, DEST, FAST_EMITTER).unwrap();

        let key = OrderKey::dummy(LOCAL, DEST);
        let oracle = StaticFeeOracle {
            bps: 20,
            collector: Address32([0x99; 32]),
        };
        let hash = ledger
            .create_with_asset(
                key.trader,
                key.token_in,
                100 * 10u128.pow(18),
                18,
                key.params,
                None,
                &oracle,
                t0(),
            )
            .unwrap();
        (ledger, key, hash)
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn after_deadline(key: &OrderKey) -> DateTime<Utc> {
        Utc.timestamp_opt(i64::try_from(key.params.deadline).unwrap() + 1, 0)
            .unwrap()
    }

    fn refund_for(key: &OrderKey) -> RefundMsg {
        RefundMsg {
            order_hash: order_hash(key),
            src_chain: key.src_chain,
            token_in: key.token_in,
            trader: key.trader,
            canceler: CANCELER,
            cancel_fee: key.params.cancel_fee,
            refund_fee: key.params.refund_fee,
        }
    }

    #[test]
    fn cancel_after_deadline_returns_full_deposit() {
        let (mut ledger, key, hash) = setup();
        ledger.cancel_order(&key, after_deadline(&key)).unwrap();
        assert_eq!(ledger.status_of(&hash), Some(OrderStatus::Canceled));
        assert_eq!(ledger.vault().credit_of(key.trader, TOKEN), 10_000_000_000);
        assert_eq!(ledger.vault().locked(TOKEN), 0);
    }

    #[test]
    fn cancel_before_deadline_rejected() {
        let (mut ledger, key, hash) = setup();
        let err = ledger.cancel_order(&key, t0()).unwrap_err();
        assert!(matches!(err, CrosslockError::DeadlineNotReached { .. }));
        assert_eq!(ledger.status_of(&hash), Some(OrderStatus::Created));
    }

    #[test]
    fn cancel_twice_rejected() {
        let (mut ledger, key, _) = setup();
        ledger.cancel_order(&key, after_deadline(&key)).unwrap();
        let err = ledger.cancel_order(&key, after_deadline(&key)).unwrap_err();
        assert!(matches!(err, CrosslockError::WrongOrderStatus { .. }));
        // Deposit not returned twice.
        assert_eq!(ledger.vault().credit_of(key.trader, TOKEN), 10_000_000_000);
    }

    #[test]
    fn refund_splits_fees_and_remainder() {
        let (mut ledger, key, hash) = setup();
        let msg = refund_for(&key);
        let raw = MockBridge::envelope(DEST, DEST_EMITTER, 0, encode_refund(&msg));

        ledger
            .refund_order(&raw, false, RELAYER, &MockBridge::new(), t0())
            .unwrap();

        assert_eq!(ledger.status_of(&hash), Some(OrderStatus::Refunded));
        assert_eq!(ledger.vault().credit_of(CANCELER, TOKEN), key.params.cancel_fee);
        assert_eq!(ledger.vault().credit_of(RELAYER, TOKEN), key.params.refund_fee);
        assert_eq!(
            ledger.vault().credit_of(key.trader, TOKEN),
            10_000_000_000 - key.params.cancel_fee - key.params.refund_fee
        );
    }

    #[test]
    fn fast_refund_requires_fast_emitter() {
        let (mut ledger, key, hash) = setup();
        let msg = refund_for(&key);

        // Normal emitter is not acceptable on the fast path.
        let raw = MockBridge::envelope(DEST, DEST_EMITTER, 0, encode_refund(&msg));
        assert!(ledger
            .refund_order(&raw, true, RELAYER, &MockBridge::new(), t0())
            .is_err());

        let raw = MockBridge::envelope(DEST, FAST_EMITTER, 1, encode_refund(&msg));
        ledger
            .refund_order(&raw, true, RELAYER, &MockBridge::new(), t0())
            .unwrap();
        assert_eq!(ledger.status_of(&hash), Some(OrderStatus::Refunded));
    }

    #[test]
    fn refund_with_mismatched_trader_rejected() {
        let (mut ledger, key, hash) = setup();
        let mut msg = refund_for(&key);
        msg.trader = Address32([0xEE; 32]);
        let raw = MockBridge::envelope(DEST, DEST_EMITTER, 0, encode_refund(&msg));

        let err = ledger
            .refund_order(&raw, false, RELAYER, &MockBridge::new(), t0())
            .unwrap_err();
        assert!(matches!(err, CrosslockError::MalformedMessage { .. }));
        assert_eq!(ledger.status_of(&hash), Some(OrderStatus::Created));
    }

    #[test]
    fn refund_after_cancel_rejected() {
        let (mut ledger, key, _) = setup();
        ledger.cancel_order(&key, after_deadline(&key)).unwrap();

        let msg = refund_for(&key);
        let raw = MockBridge::envelope(DEST, DEST_EMITTER, 0, encode_refund(&msg));
        let err = ledger
            .refund_order(&raw, false, RELAYER, &MockBridge::new(), t0())
            .unwrap_err();
        assert!(matches!(err, CrosslockError::WrongOrderStatus { .. }));
    }
}
