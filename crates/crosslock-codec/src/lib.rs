//! # crosslock-codec
//!
//! The pure deterministic plane of Crosslock: canonical order-key encoding
//! and hashing, plus the fixed-offset wire codecs for every bridge message.
//!
//! Every encoding is fixed-width and big-endian so it is re-derivable
//! byte-identically by independent implementations on every participating
//! chain, including chains with different native word sizes. Decoders fail
//! closed: a wrong action tag or a wrong total length aborts the call.
//!
//! Offset constants are isolated here — business logic in the ledger crates
//! never touches raw byte layouts.

pub mod batch;
pub mod fulfill;
pub mod order_key;
pub mod refund;
pub mod rescue;
pub mod unlock;

mod reader;

pub use batch::{
    batch_commitment, decode_batch, decode_compressed, encode_batch, encode_batch_payload,
    encode_compressed,
};
pub use fulfill::{decode_fulfill, encode_fulfill};
pub use order_key::{encode_key, order_hash, KEY_LEN_PAYLOAD, KEY_LEN_TRANSFER};
pub use refund::{decode_refund, encode_refund};
pub use rescue::{decode_rescue, encode_rescue};
pub use unlock::{decode_unlock_entry, decode_unlock_single, encode_unlock_entry,
    encode_unlock_single, UNLOCK_ENTRY_LEN};

/// Action tag identifying a fulfillment message.
pub const ACTION_FULFILL: u8 = 1;
/// Action tag identifying a single unlock message.
pub const ACTION_UNLOCK: u8 = 2;
/// Action tag identifying an enumerated unlock batch.
pub const ACTION_UNLOCK_BATCH: u8 = 3;
/// Action tag identifying a hash-committed compressed unlock batch.
pub const ACTION_UNLOCK_COMPRESSED: u8 = 4;
/// Action tag identifying a refund message.
pub const ACTION_REFUND: u8 = 5;
/// Action tag identifying an admin rescue message.
pub const ACTION_RESCUE: u8 = 6;
