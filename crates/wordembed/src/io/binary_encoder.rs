//! # Binary Section Encoder

use crate::{
    errors::{WEResult, WordembedError},
    io::LONG_STR_MARKER,
};

/// The ``u32`` length written after [`LONG_STR_MARKER`].
fn long_str_len(len: usize) -> WEResult<u32> {
    u32::try_from(len)
        .map_err(|_| WordembedError::Malformed(format!("string of {len} bytes exceeds u32 length")))
}

/// Append-only little-endian byte section builder.
///
/// Mirrors [`crate::io::BinaryDecoder`] field for field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryEncoder {
    data: Vec<u8>,
}

impl BinaryEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the encoder, returning the section bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Append a single byte.
    pub fn add_u8(
        &mut self,
        value: u8,
    ) {
        self.data.push(value);
    }

    /// Append a little-endian ``u32``.
    pub fn add_u32(
        &mut self,
        value: u32,
    ) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    /// Append a 0/1 flag byte.
    pub fn add_flag(
        &mut self,
        value: bool,
    ) {
        self.add_u8(value as u8);
    }

    /// Append a length-prefixed string.
    ///
    /// ## Returns
    /// [`WordembedError::Malformed`] if the string is longer than ``u32::MAX``
    /// bytes; nothing is written in that case.
    pub fn add_str(
        &mut self,
        value: &str,
    ) -> WEResult<()> {
        let len = value.len();
        if len < LONG_STR_MARKER as usize {
            self.add_u8(len as u8);
        } else {
            let long_len = long_str_len(len)?;
            self.add_u8(LONG_STR_MARKER);
            self.add_u32(long_len);
        }
        self.data.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Append a block of little-endian ``f32`` values.
    pub fn add_f32s(
        &mut self,
        values: &[f32],
    ) {
        self.data.reserve(values.len() * size_of::<f32>());
        for v in values {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
    }
}
