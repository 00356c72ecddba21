//! The settlement ledger: fulfillment, bypass fills, and deferred payload
//! settlement.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crosslock_codec::{decode_fulfill, encode_unlock_single, order_hash};
use crosslock_types::constants::{CONSISTENCY_FINALIZED, RESCUE_SEQUENCE_CACHE_SIZE};
use crosslock_types::{
    fees, Address32, AuctionMode, ChainId, ConsumedSequences, CrosslockError, EmitterRegistry,
    FeeOracle, GovernanceConfig, LedgerConfig, MessageBridge, OrderHash, OrderKey, OrderStatus,
    PayloadKind, Result, UnlockMsg, VaultBook,
};

use crate::batcher::MessageBatcher;

/// Net amount parked for a payload-kind order between fulfillment and the
/// destination address's explicit settlement call.
#[derive(Debug, Clone, Copy)]
pub struct PendingPayout {
    pub asset: Address32,
    pub amount: u64,
    pub gas_drop: u64,
    pub dest_addr: Address32,
}

/// Destination-chain settlement ledger.
///
/// Statuses are stored sparsely: an absent entry means CREATED, since the
/// destination side has no record at all until something happens locally.
pub struct SettlementLedger {
    pub(crate) config: LedgerConfig,
    pub(crate) governance: GovernanceConfig,
    pub(crate) emitters: EmitterRegistry,
    pub(crate) statuses: HashMap<OrderHash, OrderStatus>,
    pub(crate) pending: HashMap<OrderHash, PendingPayout>,
    pub(crate) batcher: MessageBatcher,
    pub(crate) vault: VaultBook,
    pub(crate) consumed: ConsumedSequences,
}

impl SettlementLedger {
    #[must_use]
    pub fn new(config: LedgerConfig, governance: GovernanceConfig) -> Self {
        Self {
            config,
            governance,
            emitters: EmitterRegistry::new(),
            statuses: HashMap::new(),
            pending: HashMap::new(),
            batcher: MessageBatcher::new(),
            vault: VaultBook::new(),
            consumed: ConsumedSequences::new(RESCUE_SEQUENCE_CACHE_SIZE),
        }
    }

    /// Fulfill an order under the auction emitter's signed message.
    ///
    /// Before the penalty window opens only the driver named in the message
    /// may call; once `deadline - penalty_period` has passed, anyone may
    /// (the original driver is penalized by losing exclusivity). The
    /// fulfillment amount must meet the promised amount after
    /// normalization.
    #[allow(clippy::too_many_arguments)]
    pub fn fulfill_order(
        &mut self,
        key: &OrderKey,
        fulfill_amount: u128,
        decimals: u8,
        raw_fulfill: &[u8],
        recipient: Address32,
        batch: bool,
        caller: Address32,
        oracle: &dyn FeeOracle,
        bridge: &mut dyn MessageBridge,
        now: DateTime<Utc>,
    ) -> Result<OrderHash> {
        self.governance.ensure_not_paused()?;

        let envelope = bridge.verify(raw_fulfill)?;
        self.emitters
            .ensure_auction_emitter(envelope.emitter_chain, envelope.emitter_address)?;
        let fulfill = decode_fulfill(&envelope.payload)?;

        let hash = self.local_order_hash(key)?;
        if fulfill.order_hash != hash {
            return Err(CrosslockError::OrderHashMismatch);
        }

        let now_ts = unix_seconds(now);
        if now_ts >= key.params.deadline {
            return Err(CrosslockError::DeadlinePassed {
                deadline: key.params.deadline,
            });
        }
        if now_ts < key.penalty_window_opens() && caller != fulfill.driver {
            return Err(CrosslockError::UnauthorizedDriver);
        }

        let normalized = fees::normalize(fulfill_amount, decimals)?;
        if normalized < fulfill.promised_amount {
            return Err(CrosslockError::FulfillAmountTooLow {
                needed: fulfill.promised_amount,
                provided: normalized,
            });
        }

        self.apply_fill(
            key,
            hash,
            fulfill.driver,
            recipient,
            normalized,
            batch,
            oracle,
            bridge,
            now_ts,
        )?;
        Ok(hash)
    }

    /// Fill a bypass-mode order directly: no auction message, no driver
    /// gate, promised amount is the order's minimum.
    #[allow(clippy::too_many_arguments)]
    pub fn fulfill_simple(
        &mut self,
        key: &OrderKey,
        fulfill_amount: u128,
        decimals: u8,
        recipient: Address32,
        batch: bool,
        caller: Address32,
        oracle: &dyn FeeOracle,
        bridge: &mut dyn MessageBridge,
        now: DateTime<Utc>,
    ) -> Result<OrderHash> {
        self.governance.ensure_not_paused()?;

        if key.params.auction_mode != AuctionMode::Bypass {
            return Err(CrosslockError::InvalidOrder {
                reason: "order requires the auction fulfillment path".into(),
            });
        }
        let hash = self.local_order_hash(key)?;

        let now_ts = unix_seconds(now);
        if now_ts >= key.params.deadline {
            return Err(CrosslockError::DeadlinePassed {
                deadline: key.params.deadline,
            });
        }

        let normalized = fees::normalize(fulfill_amount, decimals)?;
        if normalized < key.params.min_amount_out {
            return Err(CrosslockError::FulfillAmountTooLow {
                needed: key.params.min_amount_out,
                provided: normalized,
            });
        }

        self.apply_fill(
            key, hash, caller, recipient, normalized, batch, oracle, bridge, now_ts,
        )?;
        Ok(hash)
    }

    /// Pay out a payload-kind order previously parked by `fulfill_order`.
    /// Only the order's destination address may trigger this.
    pub fn settle_with_payload(&mut self, key: &OrderKey, caller: Address32) -> Result<()> {
        let hash = self.local_order_hash(key)?;
        if caller != key.params.dest_addr {
            return Err(CrosslockError::NotPayloadRecipient);
        }
        let status = self.status_of(&hash);
        if status != OrderStatus::Fulfilled {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Fulfilled,
                actual: status,
            });
        }
        let payout = self
            .pending
            .remove(&hash)
            .ok_or_else(|| CrosslockError::Internal("pending payout missing".into()))?;

        self.statuses.insert(hash, OrderStatus::Settled);
        self.vault
            .release(payout.asset, payout.amount, payout.dest_addr)?;
        if payout.gas_drop > 0 {
            self.vault
                .release(Address32::ZERO, payout.gas_drop, payout.dest_addr)?;
        }
        info!(
            order = %hash.short(),
            amount = payout.amount,
            "payload order settled"
        );
        Ok(())
    }

    /// Shared payout path for both fulfillment forms. The caller has
    /// already validated timing, amount, and authorization.
    #[allow(clippy::too_many_arguments)]
    fn apply_fill(
        &mut self,
        key: &OrderKey,
        hash: OrderHash,
        driver: Address32,
        recipient: Address32,
        normalized: u64,
        batch: bool,
        oracle: &dyn FeeOracle,
        bridge: &mut dyn MessageBridge,
        now_ts: u64,
    ) -> Result<()> {
        let status = self.status_of(&hash);
        if status != OrderStatus::Created {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: status,
            });
        }

        let token_out = key.params.token_out;
        let gas_drop = key.params.gas_drop;

        // The key's fee rates are caller-derived and validated nowhere else
        // on this chain; reject them before taking the filler's funds.
        let referrer_bps = if key.params.referrer.is_zero() {
            0
        } else {
            key.params.referrer_bps
        };
        let split = fees::split(normalized, referrer_bps, key.protocol_bps)?;

        // Pull the filler's funds into the vault before any distribution.
        self.vault.lock(token_out, normalized)?;
        if gas_drop > 0 {
            self.vault.lock(Address32::ZERO, gas_drop)?;
        }

        self.vault
            .release(token_out, split.referrer_amount, key.params.referrer)?;
        self.vault
            .release(token_out, split.protocol_amount, oracle.fee_collector())?;

        match key.payload_kind {
            PayloadKind::Payload => {
                self.statuses.insert(hash, OrderStatus::Fulfilled);
                self.pending.insert(
                    hash,
                    PendingPayout {
                        asset: token_out,
                        amount: split.net_payout,
                        gas_drop,
                        dest_addr: key.params.dest_addr,
                    },
                );
                info!(
                    order = %hash.short(),
                    net = split.net_payout,
                    "payload order fulfilled, payout parked"
                );
            }
            PayloadKind::Transfer => {
                self.statuses.insert(hash, OrderStatus::Settled);
                self.vault
                    .release(token_out, split.net_payout, key.params.dest_addr)?;
                if gas_drop > 0 {
                    self.vault
                        .release(Address32::ZERO, gas_drop, key.params.dest_addr)?;
                }
                info!(
                    order = %hash.short(),
                    net = split.net_payout,
                    "transfer order settled"
                );
            }
        }

        let unlock = UnlockMsg {
            order_hash: hash,
            src_chain: key.src_chain,
            token_in: key.token_in,
            referrer: key.params.referrer,
            referrer_bps,
            protocol_bps: key.protocol_bps,
            recipient,
            driver,
            fulfill_time: now_ts,
        };
        if batch {
            self.batcher.buffer(unlock);
            debug!(order = %hash.short(), "unlock buffered for batching");
        } else if let Err(err) =
            bridge.publish(encode_unlock_single(&unlock), CONSISTENCY_FINALIZED)
        {
            // The fill is already committed locally; keep the unlock
            // recoverable through the batch path instead of failing it.
            warn!(
                %err,
                order = %hash.short(),
                "unlock publish failed, entry buffered for batch posting"
            );
            self.batcher.buffer(unlock);
        }
        Ok(())
    }

    /// Recompute the order hash, refusing keys not destined for this chain.
    fn local_order_hash(&self, key: &OrderKey) -> Result<OrderHash> {
        if key.params.dest_chain != self.config.local_chain {
            return Err(CrosslockError::InvalidOrder {
                reason: "order is not destined for this chain".into(),
            });
        }
        Ok(order_hash(key))
    }

    // ------------------------------------------------------------------
    // Owner surface
    // ------------------------------------------------------------------

    pub fn register_emitter(
        &mut self,
        caller: Address32,
        chain: ChainId,
        emitter: Address32,
    ) -> Result<()> {
        self.governance.ensure_owner(caller)?;
        self.emitters.register(chain, emitter);
        Ok(())
    }

    pub fn set_auction_emitter(
        &mut self,
        caller: Address32,
        chain: ChainId,
        emitter: Address32,
    ) -> Result<()> {
        self.governance.ensure_owner(caller)?;
        self.emitters.set_auction_emitter(chain, emitter);
        Ok(())
    }

    pub fn set_paused(&mut self, caller: Address32, paused: bool) -> Result<()> {
        self.governance.set_paused(caller, paused)
    }

    pub fn propose_owner(&mut self, caller: Address32, proposed: Address32) -> Result<()> {
        self.governance.propose_owner(caller, proposed)
    }

    pub fn claim_owner(&mut self, caller: Address32) -> Result<()> {
        self.governance.claim_owner(caller)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Local status of an order; absent records are CREATED by definition.
    #[must_use]
    pub fn status_of(&self, hash: &OrderHash) -> OrderStatus {
        self.statuses
            .get(hash)
            .copied()
            .unwrap_or(OrderStatus::Created)
    }

    #[must_use]
    pub fn pending_payout(&self, hash: &OrderHash) -> Option<&PendingPayout> {
        self.pending.get(hash)
    }

    #[must_use]
    pub fn vault(&self) -> &VaultBook {
        &self.vault
    }

    #[must_use]
    pub fn batcher(&self) -> &MessageBatcher {
        &self.batcher
    }
}

/// Unix seconds of a UTC instant, clamped at zero for pre-epoch inputs.
pub(crate) fn unix_seconds(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp()).unwrap_or(0)
}
