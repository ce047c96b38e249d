//! Bounds-checked cursor over a captured frame.
//!
//! Every decoder reads frame bytes through [`Cursor`] rather than indexing
//! slices directly. Out-of-range reads fail with [`DecodeError::Truncated`]
//! instead of panicking, and the error carries the protocol name so a
//! truncated layer is identifiable in the frame record.

use crate::error::DecodeError;

/// Bounds-checked view over frame bytes with offset arithmetic.
#[derive(Debug, Clone)]
pub struct Cursor<'data> {
    data: &'data [u8],
    pos: usize,
    protocol: &'static str,
}

impl<'data> Cursor<'data> {
    /// Create a cursor over `data` on behalf of `protocol`.
    pub fn new(data: &'data [u8], protocol: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            protocol,
        }
    }

    /// Current offset from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::Truncated {
            protocol: self.protocol,
            needed,
            have: self.remaining(),
        }
    }

    /// Read the next `n` bytes, advancing the cursor.
    pub fn take(&mut self, n: usize) -> Result<&'data [u8], DecodeError> {
        if self.remaining() < n {
            return Err(self.truncated(n));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Advance the cursor by `n` bytes without returning them.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        if self.remaining() < n {
            return Err(self.truncated(n));
        }
        self.pos += n;
        Ok(())
    }

    /// Move the cursor to an absolute offset.
    ///
    /// Used by the DNS name reader to follow compression pointers.
    pub fn seek(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(DecodeError::Truncated {
                protocol: self.protocol,
                needed: pos,
                have: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let bytes = self.take(1)?;
        Ok(bytes[0])
    }

    /// Read a network-order u16.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a network-order u32.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// All bytes from the current position to the end, without advancing.
    pub fn rest(&self) -> &'data [u8] {
        &self.data[self.pos..]
    }
}
