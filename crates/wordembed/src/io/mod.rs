//! # Embedding Section IO
//!
//! The embedding section is a flat little-endian byte stream:
//!
//! | field       | encoding                                       |
//! |-------------|------------------------------------------------|
//! | dimension   | ``u32``                                        |
//! | `dict_size` | ``u32``                                        |
//! | words       | `dict_size` length-prefixed UTF-8 strings      |
//! | has unknown | ``u8`` (0/1)                                   |
//! | subform     | ``u8`` (0/1)                                   |
//! | weights     | ``dimension * (dict_size + has_unknown)`` ``f32`` |
//!
//! String lengths are a single byte; the value 255 escapes to a following ``u32``.
//!
//! ## Writing and Reading A Section
//!
//! ```rust
//! use wordembed::io::{BinaryDecoder, BinaryEncoder};
//!
//! let mut enc = BinaryEncoder::new();
//! enc.add_u32(2);
//! enc.add_str("cat").unwrap();
//! enc.add_f32s(&[0.5, -1.0]);
//! let bytes = enc.into_bytes();
//!
//! let mut dec = BinaryDecoder::new(&bytes);
//! assert_eq!(dec.next_u32().unwrap(), 2);
//! assert_eq!(dec.next_str().unwrap(), "cat");
//! assert_eq!(dec.next_f32s(2).unwrap(), vec![0.5, -1.0]);
//! assert!(dec.is_end());
//! ```

mod binary_decoder;
mod binary_encoder;

#[doc(inline)]
pub use binary_decoder::*;
#[doc(inline)]
pub use binary_encoder::*;

/// Length prefix value which escapes to a following ``u32`` length.
pub const LONG_STR_MARKER: u8 = u8::MAX;
