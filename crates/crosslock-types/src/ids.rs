//! Identifiers used throughout Crosslock.
//!
//! Every cross-chain identity is a fixed-width value so the wire encoding
//! is byte-identical on every participating chain: 32-byte identifiers for
//! accounts, assets, and order hashes; `u16` chain ids; `u64` bridge
//! sequences.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OrderHash
// ---------------------------------------------------------------------------

/// Deterministic identifier binding all economic terms of an intent.
///
/// The order hash is the **sole** linkage between the escrow-side and
/// settlement-side records; both sides recompute it independently from the
/// canonical key encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub [u8; 32]);

impl OrderHash {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Address32
// ---------------------------------------------------------------------------

/// Universal 32-byte identity for accounts and assets.
///
/// Shorter native addresses are left-padded to 32 bytes by the caller.
/// When used as an asset identity, [`Address32::ZERO`] denotes the chain's
/// native asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address32(pub [u8; 32]);

impl Address32 {
    /// The zero address. As an asset id this is the chain-native asset.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// Wire identifier for a participating chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ChainId(pub u16);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Monotonic sequence number assigned by the message bridge to each
/// published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Sequence(pub u64);

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_hash_display_is_full_hex() {
        let hash = OrderHash([0xAB; 32]);
        let s = format!("{hash}");
        assert!(s.starts_with("0xabab"));
        assert_eq!(s.len(), 2 + 64);
    }

    #[test]
    fn order_hash_short() {
        let hash = OrderHash([0xCD; 32]);
        assert_eq!(hash.short(), "cdcdcdcd");
    }

    #[test]
    fn zero_address_is_native() {
        assert!(Address32::ZERO.is_zero());
        assert!(!Address32([1u8; 32]).is_zero());
    }

    #[test]
    fn chain_id_display() {
        assert_eq!(format!("{}", ChainId(23)), "chain:23");
    }

    #[test]
    fn serde_roundtrips() {
        let hash = OrderHash([9u8; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        let back: OrderHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, back);

        let chain = ChainId(7);
        let json = serde_json::to_string(&chain).unwrap();
        let back: ChainId = serde_json::from_str(&json).unwrap();
        assert_eq!(chain, back);
    }
}
