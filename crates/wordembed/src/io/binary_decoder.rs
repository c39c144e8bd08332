//! # Binary Section Decoder

use crate::{
    errors::{WEResult, WordembedError},
    io::LONG_STR_MARKER,
};

/// Cursor over a borrowed little-endian byte section.
///
/// Every read either consumes exactly the bytes it needs, or fails with
/// [`WordembedError::UnexpectedEof`] and leaves the cursor unchanged.
#[derive(Debug, Clone)]
pub struct BinaryDecoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BinaryDecoder<'a> {
    /// Create a decoder at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// The current byte offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Has the whole section been consumed?
    pub fn is_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `len` raw bytes.
    pub fn next_bytes(
        &mut self,
        len: usize,
    ) -> WEResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(WordembedError::UnexpectedEof {
                offset: self.offset,
                needed: len,
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn next_array<const N: usize>(&mut self) -> WEResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.next_bytes(N)?);
        Ok(buf)
    }

    /// Read a single byte.
    pub fn next_u8(&mut self) -> WEResult<u8> {
        Ok(self.next_array::<1>()?[0])
    }

    /// Read a little-endian ``u32``.
    pub fn next_u32(&mut self) -> WEResult<u32> {
        Ok(u32::from_le_bytes(self.next_array()?))
    }

    /// Read a 0/1 flag byte.
    pub fn next_flag(&mut self) -> WEResult<bool> {
        let offset = self.offset;
        match self.next_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => {
                self.offset = offset;
                Err(WordembedError::Malformed(format!(
                    "flag byte {b} at offset {offset} is not 0 or 1"
                )))
            }
        }
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn next_str(&mut self) -> WEResult<&'a str> {
        let start = self.offset;
        let mut len = self.next_u8()? as usize;
        if len == LONG_STR_MARKER as usize {
            len = match self.next_u32() {
                Ok(len) => len as usize,
                Err(err) => {
                    self.offset = start;
                    return Err(err);
                }
            };
        }

        let bytes = match self.next_bytes(len) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.offset = start;
                return Err(err);
            }
        };

        core::str::from_utf8(bytes).map_err(|_| {
            let offset = self.offset - len;
            self.offset = start;
            WordembedError::InvalidUtf8 { offset }
        })
    }

    /// Read `count` little-endian ``f32`` values.
    pub fn next_f32s(
        &mut self,
        count: usize,
    ) -> WEResult<Vec<f32>> {
        let len = count.checked_mul(size_of::<f32>()).ok_or_else(|| {
            WordembedError::Malformed(format!("float block of {count} values overflows"))
        })?;
        let bytes = self.next_bytes(len)?;

        Ok(bytes
            .chunks_exact(size_of::<f32>())
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads() {
        let data = [7u8, 0x01, 0x02, 0x00, 0x00, 1];
        let mut dec = BinaryDecoder::new(&data);

        assert_eq!(dec.next_u8().unwrap(), 7);
        assert_eq!(dec.next_u32().unwrap(), 0x0201);
        assert!(dec.next_flag().unwrap());
        assert!(dec.is_end());
    }

    #[test]
    fn test_short_read_leaves_cursor() {
        let data = [1u8, 2, 3];
        let mut dec = BinaryDecoder::new(&data);

        assert!(matches!(
            dec.next_u32(),
            Err(WordembedError::UnexpectedEof {
                offset: 0,
                needed: 4
            })
        ));
        assert_eq!(dec.offset(), 0);
        assert_eq!(dec.next_u8().unwrap(), 1);
    }

    #[test]
    fn test_next_str() {
        let mut data = vec![3u8];
        data.extend_from_slice(b"dog");
        data.push(0);
        let mut dec = BinaryDecoder::new(&data);

        assert_eq!(dec.next_str().unwrap(), "dog");
        assert_eq!(dec.next_str().unwrap(), "");
        assert!(dec.is_end());
    }

    #[test]
    fn test_next_str_long_form() {
        let word = "x".repeat(300);
        let mut data = vec![LONG_STR_MARKER];
        data.extend_from_slice(&300u32.to_le_bytes());
        data.extend_from_slice(word.as_bytes());
        let mut dec = BinaryDecoder::new(&data);

        assert_eq!(dec.next_str().unwrap(), word);
    }

    #[test]
    fn test_next_str_errors() {
        let data = [5u8, b'a', b'b'];
        let mut dec = BinaryDecoder::new(&data);
        assert!(matches!(
            dec.next_str(),
            Err(WordembedError::UnexpectedEof { offset: 1, .. })
        ));
        assert_eq!(dec.offset(), 0);

        let data = [2u8, 0xff, 0xfe];
        let mut dec = BinaryDecoder::new(&data);
        assert!(matches!(
            dec.next_str(),
            Err(WordembedError::InvalidUtf8 { offset: 1 })
        ));
    }

    #[test]
    fn test_bad_flag() {
        let data = [2u8];
        let mut dec = BinaryDecoder::new(&data);
        assert!(matches!(dec.next_flag(), Err(WordembedError::Malformed(_))));
    }

    #[test]
    fn test_next_f32s() {
        let mut data = Vec::new();
        for v in [1.5f32, -2.0, 0.25] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let mut dec = BinaryDecoder::new(&data);

        assert_eq!(dec.next_f32s(3).unwrap(), vec![1.5, -2.0, 0.25]);
        assert!(dec.next_f32s(1).is_err());
        assert_eq!(dec.next_f32s(0).unwrap(), Vec::<f32>::new());
    }
}
