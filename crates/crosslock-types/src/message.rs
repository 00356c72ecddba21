//! Wire message value types.
//!
//! These are pure values with no storage lifetime beyond optional buffering
//! for batching. Their byte layouts live in `crosslock-codec`; this module
//! only defines the decoded shapes the ledgers operate on.

use serde::{Deserialize, Serialize};

use crate::{Address32, ChainId, OrderHash, OrderStatus};

/// Result of the off-chain auction, signed by the auction-chain emitter.
/// Binds the winning driver and the amount it promised to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillMsg {
    pub order_hash: OrderHash,
    pub driver: Address32,
    /// Promised output amount in normalized units.
    pub promised_amount: u64,
}

/// Emitted by the settlement ledger after a successful fulfillment;
/// consumed by the escrow ledger to release the source deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockMsg {
    pub order_hash: OrderHash,
    pub src_chain: ChainId,
    pub token_in: Address32,
    pub referrer: Address32,
    pub referrer_bps: u16,
    pub protocol_bps: u16,
    /// Escrow release recipient (normally the driver's source-chain address).
    pub recipient: Address32,
    pub driver: Address32,
    /// Unix seconds of the destination-side fulfillment.
    pub fulfill_time: u64,
}

/// Emitted by the settlement ledger on a destination-driven cancellation;
/// consumed by the escrow ledger to refund the trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundMsg {
    pub order_hash: OrderHash,
    pub src_chain: ChainId,
    pub token_in: Address32,
    pub trader: Address32,
    /// Account credited with the cancel fee.
    pub canceler: Address32,
    pub cancel_fee: u64,
    pub refund_fee: u64,
}

/// Privileged escape hatch from the fixed rescue chain: force an order's
/// status and redirect stuck funds to the rescue destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescueMsg {
    /// Chain the rescue applies to; ignored by other chains' ledgers.
    pub chain: ChainId,
    pub order_hash: OrderHash,
    pub new_status: OrderStatus,
    pub asset: Address32,
    /// Amount to redirect to the rescue destination, normalized units.
    pub amount: u64,
}
