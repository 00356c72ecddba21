//! Refund message codec.

use crosslock_types::{Address32, ChainId, OrderHash, RefundMsg, Result};

use crate::reader::Reader;
use crate::ACTION_REFUND;

/// tag(1) + order_hash(32) + src_chain(2) + token_in(32) + trader(32) +
/// canceler(32) + cancel_fee(8) + refund_fee(8)
pub const REFUND_MSG_LEN: usize = 147;

#[must_use]
pub fn encode_refund(msg: &RefundMsg) -> Vec<u8> {
    let mut out = Vec::with_capacity(REFUND_MSG_LEN);
    out.push(ACTION_REFUND);
    out.extend_from_slice(msg.order_hash.as_bytes());
    out.extend_from_slice(&msg.src_chain.0.to_be_bytes());
    out.extend_from_slice(msg.token_in.as_bytes());
    out.extend_from_slice(msg.trader.as_bytes());
    out.extend_from_slice(msg.canceler.as_bytes());
    out.extend_from_slice(&msg.cancel_fee.to_be_bytes());
    out.extend_from_slice(&msg.refund_fee.to_be_bytes());
    out
}

/// Decode a refund message, failing closed on tag or length mismatch.
pub fn decode_refund(payload: &[u8]) -> Result<RefundMsg> {
    let mut r = Reader::expect_frame(payload, ACTION_REFUND, REFUND_MSG_LEN)?;
    Ok(RefundMsg {
        order_hash: OrderHash(r.bytes32()?),
        src_chain: ChainId(r.u16()?),
        token_in: Address32(r.bytes32()?),
        trader: Address32(r.bytes32()?),
        canceler: Address32(r.bytes32()?),
        cancel_fee: r.u64()?,
        refund_fee: r.u64()?,
    })
}

#[cfg(test)]
mod tests {
    use crosslock_types::CrosslockError;

    use super::*;

    fn make_msg() -> RefundMsg {
        RefundMsg {
            order_hash: OrderHash([0xAB; 32]),
            src_chain: ChainId(1),
            token_in: Address32([0x11; 32]),
            trader: Address32([0x22; 32]),
            canceler: Address32([0x33; 32]),
            cancel_fee: 50_000_000,
            refund_fee: 25_000_000,
        }
    }

    #[test]
    fn roundtrip() {
        let msg = make_msg();
        let bytes = encode_refund(&msg);
        assert_eq!(bytes.len(), REFUND_MSG_LEN);
        assert_eq!(decode_refund(&bytes).unwrap(), msg);
    }

    #[test]
    fn wrong_tag_fails_closed() {
        let mut bytes = encode_refund(&make_msg());
        bytes[0] = crate::ACTION_UNLOCK;
        let err = decode_refund(&bytes).unwrap_err();
        assert!(matches!(err, CrosslockError::WrongActionTag { .. }));
    }

    #[test]
    fn wrong_length_fails_closed() {
        let bytes = encode_refund(&make_msg());
        let err = decode_refund(&bytes[..REFUND_MSG_LEN - 1]).unwrap_err();
        assert!(matches!(err, CrosslockError::WrongMessageLength { .. }));
    }
}
