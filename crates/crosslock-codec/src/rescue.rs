//! Admin rescue message codec.

use crosslock_types::{Address32, ChainId, CrosslockError, OrderHash, OrderStatus, RescueMsg, Result};

use crate::reader::Reader;
use crate::ACTION_RESCUE;

/// tag(1) + chain(2) + order_hash(32) + status(1) + asset(32) + amount(8)
pub const RESCUE_MSG_LEN: usize = 76;

#[must_use]
pub fn encode_rescue(msg: &RescueMsg) -> Vec<u8> {
    let mut out = Vec::with_capacity(RESCUE_MSG_LEN);
    out.push(ACTION_RESCUE);
    out.extend_from_slice(&msg.chain.0.to_be_bytes());
    out.extend_from_slice(msg.order_hash.as_bytes());
    out.push(msg.new_status.wire_tag());
    out.extend_from_slice(msg.asset.as_bytes());
    out.extend_from_slice(&msg.amount.to_be_bytes());
    out
}

/// Decode a rescue message, failing closed on tag, length, or an unknown
/// status tag.
pub fn decode_rescue(payload: &[u8]) -> Result<RescueMsg> {
    let mut r = Reader::expect_frame(payload, ACTION_RESCUE, RESCUE_MSG_LEN)?;
    let chain = ChainId(r.u16()?);
    let order_hash = OrderHash(r.bytes32()?);
    let status_tag = r.u8()?;
    let new_status =
        OrderStatus::from_wire_tag(status_tag).ok_or(CrosslockError::MalformedMessage {
            reason: format!("unknown status tag {status_tag}"),
        })?;
    Ok(RescueMsg {
        chain,
        order_hash,
        new_status,
        asset: Address32(r.bytes32()?),
        amount: r.u64()?,
    })
}
