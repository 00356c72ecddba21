//! Canonical order-key encoding and hash derivation.
//!
//! The order hash is the sole identifier correlating escrow-side and
//! settlement-side records, so every field is emitted at a fixed width in a
//! fixed order — never a variable-length or implementation-dependent
//! representation. Payload-kind orders append the 32-byte hash of the
//! custom section; the total length is therefore kind-dependent but still
//! deterministic.

use sha2::{Digest, Sha256};

use crosslock_types::constants::ORDER_HASH_DOMAIN;
use crosslock_types::{OrderHash, OrderKey, PayloadKind};

/// Encoded key length for transfer-kind orders.
pub const KEY_LEN_TRANSFER: usize = 236;
/// Encoded key length for payload-kind orders (transfer + custom hash).
pub const KEY_LEN_PAYLOAD: usize = KEY_LEN_TRANSFER + 32;

/// Canonical fixed-width, field-order-stable encoding of an order key.
#[must_use]
pub fn encode_key(key: &OrderKey) -> Vec<u8> {
    let p = &key.params;
    let mut out = Vec::with_capacity(KEY_LEN_PAYLOAD);
    out.push(key.payload_kind.wire_tag());
    out.extend_from_slice(key.trader.as_bytes());
    out.extend_from_slice(&key.src_chain.0.to_be_bytes());
    out.extend_from_slice(key.token_in.as_bytes());
    out.extend_from_slice(p.token_out.as_bytes());
    out.extend_from_slice(&p.min_amount_out.to_be_bytes());
    out.extend_from_slice(&p.gas_drop.to_be_bytes());
    out.extend_from_slice(&p.cancel_fee.to_be_bytes());
    out.extend_from_slice(&p.refund_fee.to_be_bytes());
    out.extend_from_slice(&p.deadline.to_be_bytes());
    out.extend_from_slice(&p.penalty_period.to_be_bytes());
    out.extend_from_slice(p.dest_addr.as_bytes());
    out.extend_from_slice(&p.dest_chain.0.to_be_bytes());
    out.extend_from_slice(p.referrer.as_bytes());
    out.extend_from_slice(&p.referrer_bps.to_be_bytes());
    out.extend_from_slice(&key.protocol_bps.to_be_bytes());
    out.push(p.auction_mode.wire_tag());
    out.extend_from_slice(&p.bond.amount.to_be_bytes());
    out.extend_from_slice(&p.bond.slash_bps.to_be_bytes());
    out.extend_from_slice(&p.nonce.to_be_bytes());
    if let Some(custom) = &key.custom_payload_hash {
        out.extend_from_slice(custom);
    }
    debug_assert_eq!(
        out.len(),
        match key.payload_kind {
            PayloadKind::Transfer => KEY_LEN_TRANSFER,
            PayloadKind::Payload => KEY_LEN_PAYLOAD,
        }
    );
    out
}

/// Derive the order hash: Sha256 over the domain prefix and the canonical
/// encoding. A pure function of every key field including the nonce.
#[must_use]
pub fn order_hash(key: &OrderKey) -> OrderHash {
    let mut hasher = Sha256::new();
    hasher.update(ORDER_HASH_DOMAIN);
    hasher.update(encode_key(key));
    let digest = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    OrderHash(hash)
}
