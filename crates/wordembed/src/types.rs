//! # Common Types and Traits
use core::{
    fmt::{Debug, Display},
    hash::Hash,
};

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

use crate::errors::{WEResult, WordembedError};

/// A type that can be used as a row id in a [`crate::WordEmbedding`].
///
/// These are constrained to be unsigned primitive integers;
/// row ids are dense, so the id space is ``0..rows``.
pub trait IdType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> IdType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// Convert a row index into an id, failing if the id type is too narrow.
pub fn try_id<T: IdType>(index: usize) -> WEResult<T> {
    T::from_usize(index).ok_or(WordembedError::IdOverflow { rows: index + 1 })
}

/// Validate that an id space of `rows` rows fits `T`.
pub fn try_id_space<T: IdType>(rows: usize) -> WEResult<usize> {
    match rows.checked_sub(1) {
        Some(max) if T::from_usize(max).is_none() => Err(WordembedError::IdOverflow { rows }),
        _ => Ok(rows),
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type Alias for hash maps in this crate.
        pub type WEHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> WEHashMap<K, V> {
            WEHashMap::with_capacity(capacity)
        }
    } else if #[cfg(feature = "foldhash")] {
        /// Type Alias for hash maps in this crate.
        pub type WEHashMap<K, V> = foldhash::HashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> WEHashMap<K, V> {
            foldhash::HashMapExt::with_capacity(capacity)
        }
    } else {
        /// Type Alias for hash maps in this crate.
        pub type WEHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new hash map with the given capacity.
        pub fn hash_map_with_capacity<K, V>(capacity: usize) -> WEHashMap<K, V> {
            WEHashMap::with_capacity(capacity)
        }
    }
}
