//! Unlock batch codecs: enumerated and hash-committed ("compressed").
//!
//! Batch payload layout: count (u16) followed by `count` concatenated
//! fixed-width unlock entries. The enumerated envelope carries the whole
//! payload cross-chain; the compressed envelope carries only the count and
//! a hash commitment, and the full payload travels out-of-band on the
//! receiving chain. The decoder verifies the commitment before processing
//! a single entry — amortizing cross-chain message cost over many unlocks.

use sha2::{Digest, Sha256};

use crosslock_types::constants::BATCH_COMMITMENT_DOMAIN;
use crosslock_types::{CrosslockError, Result, UnlockMsg};

use crate::reader::Reader;
use crate::unlock::{encode_unlock_entry, read_entry, UNLOCK_ENTRY_LEN};
use crate::{ACTION_UNLOCK_BATCH, ACTION_UNLOCK_COMPRESSED};

/// tag(1) + count(2) + commitment(32)
pub const COMPRESSED_MSG_LEN: usize = 35;

/// Encode the raw batch payload: count followed by concatenated entries.
/// This is both the enumerated envelope body and the out-of-band payload
/// for the compressed flow.
///
/// # Panics
/// Panics if more than `u16::MAX` entries are supplied; the batcher caps
/// batches well below that.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_batch_payload(entries: &[UnlockMsg]) -> Vec<u8> {
    assert!(entries.len() <= usize::from(u16::MAX), "batch exceeds u16 count field");
    let count = entries.len() as u16;
    let mut out = Vec::with_capacity(2 + entries.len() * UNLOCK_ENTRY_LEN);
    out.extend_from_slice(&count.to_be_bytes());
    for entry in entries {
        out.extend_from_slice(&encode_unlock_entry(entry));
    }
    out
}

/// Encode a full enumerated batch envelope.
#[must_use]
pub fn encode_batch(entries: &[UnlockMsg]) -> Vec<u8> {
    let payload = encode_batch_payload(entries);
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(ACTION_UNLOCK_BATCH);
    out.extend_from_slice(&payload);
    out
}

/// Decode an enumerated batch envelope into its unlock entries.
pub fn decode_batch(payload: &[u8]) -> Result<Vec<UnlockMsg>> {
    if payload.len() < 3 {
        return Err(CrosslockError::WrongMessageLength {
            expected: 3,
            actual: payload.len(),
        });
    }
    let count = usize::from(u16::from_be_bytes([payload[1], payload[2]]));
    let expected = 3 + count * UNLOCK_ENTRY_LEN;
    let mut r = Reader::expect_frame(payload, ACTION_UNLOCK_BATCH, expected)?;
    let decoded_count = r.u16()?;
    debug_assert_eq!(usize::from(decoded_count), count);

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(read_entry(&mut r)?);
    }
    Ok(entries)
}

/// Hash commitment over a raw batch payload.
#[must_use]
pub fn batch_commitment(payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(BATCH_COMMITMENT_DOMAIN);
    hasher.update(payload);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Encode a compressed batch envelope committing to `payload`.
#[must_use]
pub fn encode_compressed(entry_count: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(COMPRESSED_MSG_LEN);
    out.push(ACTION_UNLOCK_COMPRESSED);
    out.extend_from_slice(&entry_count.to_be_bytes());
    out.extend_from_slice(&batch_commitment(payload));
    out
}

/// Decode a compressed envelope and verify the independently-supplied
/// out-of-band payload against its commitment, returning the entries.
///
/// A commitment or count mismatch fails the whole batch — no entry of an
/// unverified payload is ever processed.
pub fn decode_compressed(envelope: &[u8], oob_payload: &[u8]) -> Result<Vec<UnlockMsg>> {
    let mut r = Reader::expect_frame(envelope, ACTION_UNLOCK_COMPRESSED, COMPRESSED_MSG_LEN)?;
    let count = r.u16()?;
    let commitment = r.bytes32()?;

    if batch_commitment(oob_payload) != commitment {
        return Err(CrosslockError::CommitmentMismatch);
    }

    let expected = 2 + usize::from(count) * UNLOCK_ENTRY_LEN;
    if oob_payload.len() != expected {
        return Err(CrosslockError::WrongMessageLength {
            expected,
            actual: oob_payload.len(),
        });
    }
    let mut pr = Reader::new(oob_payload);
    let payload_count = pr.u16()?;
    if payload_count != count {
        return Err(CrosslockError::CommitmentMismatch);
    }

    let mut entries = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        entries.push(read_entry(&mut pr)?);
    }
    Ok(entries)
}
