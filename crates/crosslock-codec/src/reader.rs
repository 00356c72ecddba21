//! Fixed-offset payload reader shared by the wire codecs.

use crosslock_types::{CrosslockError, Result};

/// Sequential reader over a fixed-layout payload. Length is validated by
/// the caller before any reads, so reads past the end indicate a codec bug
/// and surface as structural errors rather than panics.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Require the payload to have exactly `expected` bytes and consume the
    /// leading action tag, which must equal `tag`.
    pub(crate) fn expect_frame(bytes: &'a [u8], tag: u8, expected: usize) -> Result<Self> {
        if bytes.len() != expected {
            return Err(CrosslockError::WrongMessageLength {
                expected,
                actual: bytes.len(),
            });
        }
        let mut reader = Self::new(bytes);
        let actual = reader.u8()?;
        if actual != tag {
            return Err(CrosslockError::WrongActionTag {
                expected: tag,
                actual,
            });
        }
        Ok(reader)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(CrosslockError::WrongMessageLength {
                expected: end,
                actual: self.bytes.len(),
            })?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }

    pub(crate) fn bytes32(&mut self) -> Result<[u8; 32]> {
        let b = self.take(32)?;
        let mut buf = [0u8; 32];
        buf.copy_from_slice(b);
        Ok(buf)
    }
}
