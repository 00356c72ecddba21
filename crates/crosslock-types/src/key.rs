//! The order key — every economically meaningful term of an intent.
//!
//! The key is **never persisted**. Both ledgers rebuild it from call
//! parameters on every operation and derive the order hash from its
//! canonical encoding (see `crosslock-codec`). Changing any field,
//! including the nonce, yields an unrelated order.

use serde::{Deserialize, Serialize};

use crate::{Address32, ChainId};

/// Whether the order carries an arbitrary custom payload section.
///
/// Payload orders defer the destination payout: fulfillment parks the net
/// amount until the destination address claims it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    Transfer,
    Payload,
}

impl PayloadKind {
    #[must_use]
    pub fn wire_tag(&self) -> u8 {
        match self {
            Self::Transfer => 0,
            Self::Payload => 1,
        }
    }
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transfer => write!(f, "TRANSFER"),
            Self::Payload => write!(f, "PAYLOAD"),
        }
    }
}

/// How the filler of this order is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionMode {
    /// Competitive off-chain auction; fulfillment requires the signed
    /// auction message naming the winning driver.
    English,
    /// Limit-order style: any caller may fill immediately at the order's
    /// minimum amount out, no auction message needed.
    Bypass,
}

impl AuctionMode {
    #[must_use]
    pub fn wire_tag(&self) -> u8 {
        match self {
            Self::English => 1,
            Self::Bypass => 2,
        }
    }

    #[must_use]
    pub fn from_wire_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::English),
            2 => Some(Self::Bypass),
            _ => None,
        }
    }
}

/// Driver bond terms carried in the key for the external auction.
/// The auction mechanism itself is out of scope; the terms are hashed so
/// they cannot be altered after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BondTerms {
    /// Bond the winning driver must post, in normalized units.
    pub amount: u64,
    /// Share of the bond slashed on a missed fulfillment, in bps.
    pub slash_bps: u16,
}

impl BondTerms {
    pub const NONE: Self = Self {
        amount: 0,
        slash_bps: 0,
    };
}

/// The trader-supplied portion of the order key.
///
/// All amounts are in the protocol's normalized 8-decimal unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParams {
    /// Output asset on the destination chain (`Address32::ZERO` = native).
    pub token_out: Address32,
    /// Minimum acceptable output amount.
    pub min_amount_out: u64,
    /// Destination-chain native asset delivered alongside the payout.
    /// Must be zero when `token_out` is native.
    pub gas_drop: u64,
    /// Fee paid to the canceler on a destination-driven refund.
    pub cancel_fee: u64,
    /// Fee paid to the refund-submitting relayer.
    pub refund_fee: u64,
    /// Fulfillment deadline, unix seconds.
    pub deadline: u64,
    /// Trailing window before the deadline during which only the named
    /// driver may fulfill, in seconds.
    pub penalty_period: u64,
    /// Recipient of the destination payout.
    pub dest_addr: Address32,
    /// Destination chain.
    pub dest_chain: ChainId,
    /// Referrer receiving a fee share (`Address32::ZERO` = none).
    pub referrer: Address32,
    /// Referrer fee rate in bps, capped at [`crate::constants::MAX_FEE_BPS`].
    pub referrer_bps: u16,
    /// Filler selection mode.
    pub auction_mode: AuctionMode,
    /// Driver bond terms for the external auction.
    pub bond: BondTerms,
    /// Random nonce distinguishing otherwise-identical orders.
    pub nonce: u64,
}

/// The complete order key: trader-supplied params plus the fields the
/// source ledger binds at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderKey {
    pub payload_kind: PayloadKind,
    pub trader: Address32,
    pub src_chain: ChainId,
    pub token_in: Address32,
    pub params: OrderParams,
    /// Protocol fee rate supplied by the external fee oracle at creation.
    pub protocol_bps: u16,
    /// Hash of the custom payload section; present iff `payload_kind`
    /// is [`PayloadKind::Payload`].
    pub custom_payload_hash: Option<[u8; 32]>,
}

impl OrderKey {
    /// Assemble a key from its parts. The payload kind is derived from the
    /// presence of the custom payload hash, so the two can never disagree.
    #[must_use]
    pub fn assemble(
        trader: Address32,
        src_chain: ChainId,
        token_in: Address32,
        params: OrderParams,
        protocol_bps: u16,
        custom_payload_hash: Option<[u8; 32]>,
    ) -> Self {
        Self {
            payload_kind: if custom_payload_hash.is_some() {
                PayloadKind::Payload
            } else {
                PayloadKind::Transfer
            },
            trader,
            src_chain,
            token_in,
            params,
            protocol_bps,
            custom_payload_hash,
        }
    }

    /// The instant the penalty window opens: `deadline - penalty_period`.
    /// Before this instant only the named driver may fulfill.
    #[must_use]
    pub fn penalty_window_opens(&self) -> u64 {
        self.params.deadline.saturating_sub(self.params.penalty_period)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl OrderParams {
    /// A plausible transfer order to `dest_chain` with a far-future deadline.
    pub fn dummy(dest_chain: ChainId) -> Self {
        Self {
            token_out: Address32([0xBB; 32]),
            min_amount_out: 9_500_000_000,
            gas_drop: 0,
            cancel_fee: 10,
            refund_fee: 5,
            deadline: 4_102_444_800, // 2100-01-01
            penalty_period: 600,
            dest_addr: Address32([0xCC; 32]),
            dest_chain,
            referrer: Address32([0xDD; 32]),
            referrer_bps: 30,
            auction_mode: AuctionMode::English,
            bond: BondTerms::NONE,
            nonce: rand::random::<u64>(),
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl OrderKey {
    /// A dummy transfer-kind key from `src_chain` to `dest_chain`.
    pub fn dummy(src_chain: ChainId, dest_chain: ChainId) -> Self {
        Self::assemble(
            Address32([0xAA; 32]),
            src_chain,
            Address32([0x11; 32]),
            OrderParams::dummy(dest_chain),
            20,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_derives_payload_kind() {
        let key = OrderKey::dummy(ChainId(1), ChainId(2));
        assert_eq!(key.payload_kind, PayloadKind::Transfer);

        let key = OrderKey::assemble(
            key.trader,
            key.src_chain,
            key.token_in,
            key.params,
            key.protocol_bps,
            Some([5u8; 32]),
        );
        assert_eq!(key.payload_kind, PayloadKind::Payload);
    }

    #[test]
    fn penalty_window_opens_before_deadline() {
        let key = OrderKey::dummy(ChainId(1), ChainId(2));
        assert_eq!(
            key.penalty_window_opens(),
            key.params.deadline - key.params.penalty_period
        );
    }

    #[test]
    fn penalty_window_saturates() {
        let mut key = OrderKey::dummy(ChainId(1), ChainId(2));
        key.params.deadline = 100;
        key.params.penalty_period = 500;
        assert_eq!(key.penalty_window_opens(), 0);
    }

    #[test]
    fn auction_mode_wire_roundtrip() {
        for mode in [AuctionMode::English, AuctionMode::Bypass] {
            assert_eq!(AuctionMode::from_wire_tag(mode.wire_tag()), Some(mode));
        }
        assert_eq!(AuctionMode::from_wire_tag(0), None);
    }

    #[test]
    fn serde_roundtrip() {
        let key = OrderKey::dummy(ChainId(1), ChainId(2));
        let json = serde_json::to_string(&key).unwrap();
        let back: OrderKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
