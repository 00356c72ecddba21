//! The escrow ledger: order records, deposit custody, and creation paths.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

use crosslock_codec::order_hash;
use crosslock_types::constants::RESCUE_SEQUENCE_CACHE_SIZE;
use crosslock_types::oracle::guarded_protocol_bps;
use crosslock_types::{
    fees, Address32, ChainId, ConsumedSequences, CrosslockError, EmitterRegistry, FeeOracle,
    GovernanceConfig, LedgerConfig, OrderHash, OrderKey, OrderParams, OrderStatus, Result,
    VaultBook,
};

/// Stored escrow-side state for one order. The full order key is never
/// persisted; callers re-supply it and the ledger re-derives the hash.
#[derive(Debug, Clone, Copy)]
pub struct EscrowRecord {
    pub status: OrderStatus,
    /// Deposit held for this order, normalized units.
    pub normalized_amount_in: u64,
    pub dest_chain: ChainId,
    pub trader: Address32,
    pub token_in: Address32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Source-chain escrow ledger.
pub struct EscrowLedger {
    pub(crate) config: LedgerConfig,
    pub(crate) governance: GovernanceConfig,
    pub(crate) emitters: EmitterRegistry,
    pub(crate) records: HashMap<OrderHash, EscrowRecord>,
    pub(crate) vault: VaultBook,
    pub(crate) consumed: ConsumedSequences,
}

impl EscrowLedger {
    #[must_use]
    pub fn new(config: LedgerConfig, governance: GovernanceConfig) -> Self {
        Self {
            config,
            governance,
            emitters: EmitterRegistry::new(),
            records: HashMap::new(),
            vault: VaultBook::new(),
            consumed: ConsumedSequences::new(RESCUE_SEQUENCE_CACHE_SIZE),
        }
    }

    /// Lock a deposit of the chain-native asset under a new order.
    pub fn create_with_native(
        &mut self,
        trader: Address32,
        amount: u128,
        params: OrderParams,
        custom_payload: Option<&[u8]>,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<OrderHash> {
        self.create_with_asset(
            trader,
            Address32::ZERO,
            amount,
            self.config.native_decimals,
            params,
            custom_payload,
            oracle,
            now,
        )
    }

    /// Lock a deposit of an arbitrary asset under a new order.
    #[allow(clippy::too_many_arguments)]
    pub fn create_with_asset(
        &mut self,
        trader: Address32,
        token_in: Address32,
        amount: u128,
        decimals: u8,
        params: OrderParams,
        custom_payload: Option<&[u8]>,
        oracle: &dyn FeeOracle,
        now: DateTime<Utc>,
    ) -> Result<OrderHash> {
        let normalized = fees::normalize(amount, decimals)?;
        let custom_hash = custom_payload.map(hash_custom_payload);
        let protocol_bps = guarded_protocol_bps(
            oracle,
            normalized,
            token_in,
            params.token_out,
            params.dest_chain,
            params.referrer_bps,
        );
        self.create_normalized(trader, token_in, normalized, params, custom_hash, protocol_bps, now)
    }

    /// Shared creation path over an already-normalized deposit.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create_normalized(
        &mut self,
        trader: Address32,
        token_in: Address32,
        normalized: u64,
        params: OrderParams,
        custom_payload_hash: Option<[u8; 32]>,
        protocol_bps: u16,
        now: DateTime<Utc>,
    ) -> Result<OrderHash> {
        self.governance.ensure_not_paused()?;

        if params.deadline <= unix_seconds(now) {
            return Err(CrosslockError::DeadlinePassed {
                deadline: params.deadline,
            });
        }
        if normalized == 0 {
            return Err(CrosslockError::DepositTooSmall);
        }
        let fixed_fees = params
            .cancel_fee
            .checked_add(params.refund_fee)
            .ok_or(CrosslockError::AmountOverflow)?;
        if fixed_fees >= normalized {
            return Err(CrosslockError::FeesExceedDeposit {
                fees: fixed_fees,
                deposit: normalized,
            });
        }
        if params.token_out.is_zero() && params.gas_drop != 0 {
            return Err(CrosslockError::GasDropWithNativeOutput);
        }
        if params.dest_chain == self.config.local_chain {
            return Err(CrosslockError::InvalidOrder {
                reason: "destination chain equals local chain".into(),
            });
        }
        if self.emitters.emitter_for(params.dest_chain).is_none() {
            return Err(CrosslockError::UnknownEmitterChain(params.dest_chain));
        }
        fees::ensure_bps(params.referrer_bps)?;
        fees::ensure_bps(protocol_bps)?;

        let key = OrderKey::assemble(
            trader,
            self.config.local_chain,
            token_in,
            params,
            protocol_bps,
            custom_payload_hash,
        );
        let hash = order_hash(&key);

        // Bump rule: an identical key may replace its CREATED record only
        // with a strictly larger deposit; the prior deposit goes back to
        // the trader.
        if let Some(prior) = self.records.get(&hash).copied() {
            if prior.status != OrderStatus::Created {
                return Err(CrosslockError::DuplicateOrder(hash));
            }
            if normalized <= prior.normalized_amount_in {
                return Err(CrosslockError::BumpTooSmall {
                    prior: prior.normalized_amount_in,
                    offered: normalized,
                });
            }
            self.vault
                .release(token_in, prior.normalized_amount_in, trader)?;
            info!(
                order = %hash.short(),
                prior = prior.normalized_amount_in,
                offered = normalized,
                "order bumped, prior deposit refunded"
            );
        }

        self.vault.lock(token_in, normalized)?;
        self.records.insert(
            hash,
            EscrowRecord {
                status: OrderStatus::Created,
                normalized_amount_in: normalized,
                dest_chain: params.dest_chain,
                trader,
                token_in,
                created_at: now,
                updated_at: now,
            },
        );
        info!(
            order = %hash.short(),
            trader = %trader,
            amount = normalized,
            dest = %params.dest_chain,
            "escrow order created"
        );
        Ok(hash)
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

    pub fn set_fast_emitter(
        &mut self,
        caller: Address32,
        chain: ChainId,
        emitter: Address32,
    ) -> Result<()> {
        self.governance.ensure_owner(caller)?;
        self.emitters.set_fast_emitter(chain, emitter);
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

    #[must_use]
    pub fn record(&self, hash: &OrderHash) -> Option<&EscrowRecord> {
        self.records.get(hash)
    }

    #[must_use]
    pub fn status_of(&self, hash: &OrderHash) -> Option<OrderStatus> {
        self.records.get(hash).map(|r| r.status)
    }

    #[must_use]
    pub fn vault(&self) -> &VaultBook {
        &self.vault
    }

    #[must_use]
    pub fn governance(&self) -> &GovernanceConfig {
        &self.governance
    }

    /// Apply a checked monotonic transition to a record.
    pub(crate) fn transition(
        record: &mut EscrowRecord,
        target: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !record.status.can_transition_to(target) {
            return Err(CrosslockError::WrongOrderStatus {
                expected: OrderStatus::Created,
                actual: record.status,
            });
        }
        record.status = target;
        record.updated_at = now;
        Ok(())
    }
}

/// Hash an order's custom payload section into the key's 32-byte slot.
#[must_use]
pub(crate) fn hash_custom_payload(payload: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(payload);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Unix seconds of a UTC instant, clamped at zero for pre-epoch inputs.
pub(crate) fn unix_seconds(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use crosslock_types::StaticFeeOracle;

    use super::*;

    const TRADER: Address32 = Address32([0xAA; 32]);
    const TOKEN: Address32 = Address32([0x11; 32]);
    const OWNER: Address32 = Address32([0x01; 32]);
    const LOCAL: ChainId = ChainId(1);
    const DEST: ChainId = ChainId(4);

    fn ledger() -> EscrowLedger {
        let mut ledger = EscrowLedger::new(
            LedgerConfig {
                local_chain: LOCAL,
                native_decimals: 18,
            },
            GovernanceConfig::new(OWNER, ChainId(99), Address32([2u8; 32]), Address32([3u8; 32])),
        );
        ledger
            .register_emitter(OWNER, DEST, Address32([0x77; 32]))
            .unwrap();
        ledger
    }

    fn oracle() -> StaticFeeOracle {
        StaticFeeOracle {
            bps: 20,
            collector: Address32([0x99; 32]),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn create(ledger: &mut EscrowLedger, amount: u128) -> Result<OrderHash> {
        let params = OrderParams::dummy(DEST);
        ledger.create_with_asset(TRADER, TOKEN, amount, 18, params, None, &oracle(), t0())
    }

    #[test]
    fn create_locks_normalized_deposit() {
        let mut ledger = ledger();
        let hash = create(&mut ledger, 100 * 10u128.pow(18)).unwrap();

        let record = ledger.record(&hash).unwrap();
        assert_eq!(record.status, OrderStatus::Created);
        assert_eq!(record.normalized_amount_in, 10_000_000_000);
        assert_eq!(ledger.vault().locked(TOKEN), 10_000_000_000);
    }

    #[test]
    fn create_rejects_dust_deposit() {
        let mut ledger = ledger();
        // 18-decimal dust below one normalized unit.
        let err = create(&mut ledger, 10u128.pow(9)).unwrap_err();
        assert!(matches!(err, CrosslockError::DepositTooSmall));
    }

    #[test]
    fn create_rejects_past_deadline() {
        let mut ledger = ledger();
        let mut params = OrderParams::dummy(DEST);
        params.deadline = unix_seconds(t0()) - 1;
        let err = ledger
            .create_with_asset(TRADER, TOKEN, 10u128.pow(18), 18, params, None, &oracle(), t0())
            .unwrap_err();
        assert!(matches!(err, CrosslockError::DeadlinePassed { .. }));
    }

    #[test]
    fn create_rejects_fees_eating_deposit() {
        let mut ledger = ledger();
        let mut params = OrderParams::dummy(DEST);
        params.cancel_fee = 70;
        params.refund_fee = 30;
        // Deposit normalizes to exactly 100 units; fees must be strictly less.
        let err = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                100 * 10u128.pow(10),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap_err();
        assert!(matches!(err, CrosslockError::FeesExceedDeposit { .. }));
    }

    #[test]
    fn create_rejects_gas_drop_with_native_output() {
        let mut ledger = ledger();
        let mut params = OrderParams::dummy(DEST);
        params.token_out = Address32::ZERO;
        params.gas_drop = 5;
        let err = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap_err();
        assert!(matches!(err, CrosslockError::GasDropWithNativeOutput));
    }

    #[test]
    fn create_rejects_local_destination() {
        let mut ledger = ledger();
        let params = OrderParams::dummy(LOCAL);
        let err = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap_err();
        assert!(matches!(err, CrosslockError::InvalidOrder { .. }));
    }

    #[test]
    fn create_rejects_unregistered_destination() {
        let mut ledger = ledger();
        let params = OrderParams::dummy(ChainId(55));
        let err = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap_err();
        assert!(matches!(err, CrosslockError::UnknownEmitterChain(ChainId(55))));
    }

    #[test]
    fn create_rejects_referrer_rate_above_cap() {
        let mut ledger = ledger();
        let mut params = OrderParams::dummy(DEST);
        params.referrer_bps = 51;
        let err = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap_err();
        assert!(matches!(err, CrosslockError::FeeRateAboveCap { bps: 51 }));
    }

    #[test]
    fn over_cap_oracle_degrades_not_rejects() {
        let mut ledger = ledger();
        let bad_oracle = StaticFeeOracle {
            bps: 500,
            collector: Address32([0x99; 32]),
        };
        let params = OrderParams::dummy(DEST);
        // Degrades to 0 bps instead of failing the creation.
        let hash = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &bad_oracle,
                t0(),
            )
            .unwrap();
        assert!(ledger.record(&hash).is_some());
    }

    #[test]
    fn paused_ledger_rejects_creates() {
        let mut ledger = ledger();
        ledger.set_paused(OWNER, true).unwrap();
        let err = create(&mut ledger, 10u128.pow(18)).unwrap_err();
        assert!(matches!(err, CrosslockError::Paused));
    }

    #[test]
    fn bump_replaces_and_refunds_prior_deposit() {
        let mut ledger = ledger();
        let params = OrderParams::dummy(DEST);
        let hash = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                100 * 10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap();

        // Same key, strictly larger deposit.
        let bumped = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                150 * 10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap();
        assert_eq!(hash, bumped);

        let record = ledger.record(&hash).unwrap();
        assert_eq!(record.normalized_amount_in, 15_000_000_000);
        // Prior deposit refunded to the trader; only the bump stays locked.
        assert_eq!(ledger.vault().credit_of(TRADER, TOKEN), 10_000_000_000);
        assert_eq!(ledger.vault().locked(TOKEN), 15_000_000_000);
    }

    #[test]
    fn bump_rejects_equal_and_smaller_deposits() {
        let mut ledger = ledger();
        let params = OrderParams::dummy(DEST);
        let mut create_same_key = |ledger: &mut EscrowLedger, amount: u128| {
            ledger.create_with_asset(TRADER, TOKEN, amount, 18, params, None, &oracle(), t0())
        };
        create_same_key(&mut ledger, 100 * 10u128.pow(18)).unwrap();

        let err = create_same_key(&mut ledger, 100 * 10u128.pow(18)).unwrap_err();
        assert!(matches!(err, CrosslockError::BumpTooSmall { .. }));

        let err = create_same_key(&mut ledger, 50 * 10u128.pow(18)).unwrap_err();
        assert!(matches!(err, CrosslockError::BumpTooSmall { .. }));
    }

    #[test]
    fn distinct_nonces_make_distinct_orders() {
        let mut ledger = ledger();
        let mut params = OrderParams::dummy(DEST);
        params.nonce = 1;
        let a = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap();
        params.nonce = 2;
        let b = ledger
            .create_with_asset(
                TRADER,
                TOKEN,
                10u128.pow(18),
                18,
                params,
                None,
                &oracle(),
                t0(),
            )
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(ledger.vault().locked(TOKEN), 200_000_000);
    }

    #[test]
    fn native_create_uses_configured_decimals() {
        let mut ledger = ledger();
        let params = OrderParams::dummy(DEST);
        let hash = ledger
            .create_with_native(TRADER, 2 * 10u128.pow(18), params, None, &oracle(), t0())
            .unwrap();
        let record = ledger.record(&hash).unwrap();
        assert_eq!(record.token_in, Address32::ZERO);
        assert_eq!(record.normalized_amount_in, 200_000_000);
    }

    #[test]
    fn ownership_rotation_via_ledger() {
        let mut ledger = ledger();
        let new_owner = Address32([0x05; 32]);
        ledger.propose_owner(OWNER, new_owner).unwrap();
        ledger.claim_owner(new_owner).unwrap();
        assert!(ledger.set_paused(OWNER, true).is_err());
        assert!(ledger.set_paused(new_owner, true).is_ok());
    }
}
