//! Characteristic value store
//!
//! Holds the current sensor reading. The update loop is the only writer;
//! attribute reads run in the host's context and load it concurrently, so
//! the value lives in a single atomic word.

use core::sync::atomic::{AtomicU32, Ordering};
use heapless::Vec;

/// Encoded size of the characteristic value
pub const VALUE_LEN: usize = core::mem::size_of::<u32>();

/// ATT error code for a read offset past the end of the value
const ATT_ERR_INVALID_OFFSET: u8 = 0x07;

/// Errors returned to the attribute-read dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttReadError {
    /// Offset lies beyond the end of the value
    InvalidOffset,
}

impl AttReadError {
    /// ATT protocol error code
    pub fn att_code(self) -> u8 {
        match self {
            AttReadError::InvalidOffset => ATT_ERR_INVALID_OFFSET,
        }
    }

    /// Negative return value for callback-style dispatchers that expect
    /// a byte count or a negated ATT error
    pub fn to_errno(self) -> i32 {
        -(self.att_code() as i32)
    }
}

/// Capability registered with the GATT layer to serve attribute reads
pub trait ReadHandler {
    /// Copy the value starting at `offset` into `buf`.
    ///
    /// Returns the number of bytes copied, at most `buf.len()`.
    fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<usize, AttReadError>;
}

/// Current value of the sensor characteristic
pub struct CharacteristicStore {
    value: AtomicU32,
}

impl CharacteristicStore {
    /// Create a store holding `initial`
    pub const fn new(initial: u32) -> Self {
        Self {
            value: AtomicU32::new(initial),
        }
    }

    /// Replace the current value
    pub fn write(&self, value: u32) {
        self.value.store(value, Ordering::Release);
    }

    /// Load the current value
    pub fn value(&self) -> u32 {
        self.value.load(Ordering::Acquire)
    }

    /// Little-endian wire encoding of the current value
    pub fn encoded(&self) -> [u8; VALUE_LEN] {
        self.value().to_le_bytes()
    }

    /// Read up to `max_len` bytes of the encoded value starting at `offset`.
    ///
    /// An offset equal to the value length yields zero bytes; anything past
    /// it is [`AttReadError::InvalidOffset`].
    pub fn read(&self, offset: usize, max_len: usize) -> Result<Vec<u8, VALUE_LEN>, AttReadError> {
        let mut buf = [0u8; VALUE_LEN];
        let limit = max_len.min(VALUE_LEN);
        let count = self.read_into(offset, &mut buf[..limit])?;

        let mut out = Vec::new();
        // count <= VALUE_LEN, always fits
        let _ = out.extend_from_slice(&buf[..count]);
        Ok(out)
    }
}

impl Default for CharacteristicStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ReadHandler for CharacteristicStore {
    fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<usize, AttReadError> {
        if offset > VALUE_LEN {
            return Err(AttReadError::InvalidOffset);
        }

        let encoded = self.encoded();
        let count = buf.len().min(VALUE_LEN - offset);
        buf[..count].copy_from_slice(&encoded[offset..offset + count]);
        Ok(count)
    }
}
