//! Fulfillment message codec.
//!
//! Earlier protocol revisions carried deadline, gas-drop, and referrer
//! fields here; all of those are now recomputed from the order key, so the
//! wire form binds only the auction result: order hash, winning driver, and
//! promised amount.

use crosslock_types::{Address32, FulfillMsg, OrderHash, Result};

use crate::reader::Reader;
use crate::ACTION_FULFILL;

/// tag(1) + order_hash(32) + driver(32) + promised_amount(8)
pub const FULFILL_MSG_LEN: usize = 73;

#[must_use]
pub fn encode_fulfill(msg: &FulfillMsg) -> Vec<u8> {
    let mut out = Vec::with_capacity(FULFILL_MSG_LEN);
    out.push(ACTION_FULFILL);
    out.extend_from_slice(msg.order_hash.as_bytes());
    out.extend_from_slice(msg.driver.as_bytes());
    out.extend_from_slice(&msg.promised_amount.to_be_bytes());
    out
}

/// Decode a fulfillment message, failing closed on tag or length mismatch.
pub fn decode_fulfill(payload: &[u8]) -> Result<FulfillMsg> {
    let mut r = Reader::expect_frame(payload, ACTION_FULFILL, FULFILL_MSG_LEN)?;
    Ok(FulfillMsg {
        order_hash: OrderHash(r.bytes32()?),
        driver: Address32(r.bytes32()?),
        promised_amount: r.u64()?,
    })
}

#[cfg(test)]
mod tests {
    use crosslock_types::CrosslockError;

    use super::*;

    fn make_msg() -> FulfillMsg {
        FulfillMsg {
            order_hash: OrderHash([3u8; 32]),
            driver: Address32([4u8; 32]),
            promised_amount: 9_500_000_000,
        }
    }

    #[test]
    fn roundtrip() {
        let msg = make_msg();
        let bytes = encode_fulfill(&msg);
        assert_eq!(bytes.len(), FULFILL_MSG_LEN);
        assert_eq!(decode_fulfill(&bytes).unwrap(), msg);
    }

    #[test]
    fn wrong_tag_fails_closed() {
        let mut bytes = encode_fulfill(&make_msg());
        bytes[0] = crate::ACTION_UNLOCK;
        let err = decode_fulfill(&bytes).unwrap_err();
        assert!(matches!(err, CrosslockError::WrongActionTag { .. }));
    }

    #[test]
    fn wrong_length_fails_closed() {
        let mut bytes = encode_fulfill(&make_msg());
        bytes.push(0);
        let err = decode_fulfill(&bytes).unwrap_err();
        assert!(matches!(err, CrosslockError::WrongMessageLength { .. }));

        bytes.truncate(FULFILL_MSG_LEN - 1);
        let err = decode_fulfill(&bytes).unwrap_err();
        assert!(matches!(err, CrosslockError::WrongMessageLength { .. }));
    }

    #[test]
    fn amounts_are_big_endian() {
        let msg = FulfillMsg {
            promised_amount: 0x0102_0304_0506_0708,
            ..make_msg()
        };
        let bytes = encode_fulfill(&msg);
        assert_eq!(&bytes[65..73], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
