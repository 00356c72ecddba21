//! Unlock message codec.
//!
//! A single unlock is a tag-prefixed entry; batches (see [`crate::batch`])
//! concatenate the same fixed-width entries, so entry encoding is shared.

use crosslock_types::{Address32, ChainId, CrosslockError, OrderHash, Result, UnlockMsg};

use crate::reader::Reader;
use crate::ACTION_UNLOCK;

/// order_hash(32) + src_chain(2) + token_in(32) + referrer(32) +
/// referrer_bps(2) + protocol_bps(2) + recipient(32) + driver(32) +
/// fulfill_time(8)
pub const UNLOCK_ENTRY_LEN: usize = 174;

/// tag(1) + entry
pub const UNLOCK_MSG_LEN: usize = 1 + UNLOCK_ENTRY_LEN;

/// Encode one unlock entry (no action tag).
#[must_use]
pub fn encode_unlock_entry(msg: &UnlockMsg) -> Vec<u8> {
    let mut out = Vec::with_capacity(UNLOCK_ENTRY_LEN);
    out.extend_from_slice(msg.order_hash.as_bytes());
    out.extend_from_slice(&msg.src_chain.0.to_be_bytes());
    out.extend_from_slice(msg.token_in.as_bytes());
    out.extend_from_slice(msg.referrer.as_bytes());
    out.extend_from_slice(&msg.referrer_bps.to_be_bytes());
    out.extend_from_slice(&msg.protocol_bps.to_be_bytes());
    out.extend_from_slice(msg.recipient.as_bytes());
    out.extend_from_slice(msg.driver.as_bytes());
    out.extend_from_slice(&msg.fulfill_time.to_be_bytes());
    out
}

/// Decode one unlock entry from an exactly entry-sized slice.
pub fn decode_unlock_entry(bytes: &[u8]) -> Result<UnlockMsg> {
    if bytes.len() != UNLOCK_ENTRY_LEN {
        return Err(CrosslockError::WrongMessageLength {
            expected: UNLOCK_ENTRY_LEN,
            actual: bytes.len(),
        });
    }
    let mut r = Reader::new(bytes);
    read_entry(&mut r)
}

pub(crate) fn read_entry(r: &mut Reader<'_>) -> Result<UnlockMsg> {
    Ok(UnlockMsg {
        order_hash: OrderHash(r.bytes32()?),
        src_chain: ChainId(r.u16()?),
        token_in: Address32(r.bytes32()?),
        referrer: Address32(r.bytes32()?),
        referrer_bps: r.u16()?,
        protocol_bps: r.u16()?,
        recipient: Address32(r.bytes32()?),
        driver: Address32(r.bytes32()?),
        fulfill_time: r.u64()?,
    })
}

/// Encode a single tag-prefixed unlock message.
#[must_use]
pub fn encode_unlock_single(msg: &UnlockMsg) -> Vec<u8> {
    let mut out = Vec::with_capacity(UNLOCK_MSG_LEN);
    out.push(ACTION_UNLOCK);
    out.extend_from_slice(&encode_unlock_entry(msg));
    out
}

/// Decode a single unlock message, failing closed on tag or length.
pub fn decode_unlock_single(payload: &[u8]) -> Result<UnlockMsg> {
    let mut r = Reader::expect_frame(payload, ACTION_UNLOCK, UNLOCK_MSG_LEN)?;
    read_entry(&mut r)
}
