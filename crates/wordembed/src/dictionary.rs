//! # Word Dictionary ``{ String -> T }``

use crate::{
    errors::WEResult,
    types::{IdType, WEHashMap, hash_map_with_capacity, try_id, try_id_space},
};

/// Static word to dense id mapping.
///
/// Ids are positional: the `n`-th inserted word is assigned id `n`.
/// A repeated word still consumes its id, but lookups keep resolving to the
/// first occurrence.
///
/// ## Style Hints
///
/// When there is no local ambiguity, instance names should prefer `dict`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary<T: IdType> {
    index: WEHashMap<String, T>,
    words: Vec<String>,
}

impl<T: IdType> Default for Dictionary<T> {
    fn default() -> Self {
        Self {
            index: WEHashMap::default(),
            words: Vec::new(),
        }
    }
}

impl<T: IdType> Dictionary<T> {
    /// Create an empty dictionary with room for `capacity` words.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: hash_map_with_capacity(capacity),
            words: Vec::with_capacity(capacity),
        }
    }

    /// Build a dictionary from words in id order.
    pub fn from_words<I, S>(words: I) -> WEResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter();
        let mut dict = Self::with_capacity(words.size_hint().0);
        for word in words {
            dict.push(word)?;
        }
        Ok(dict)
    }

    /// Append a word, assigning it the next id.
    ///
    /// ## Returns
    /// The id assigned to this position; or a [`crate::WordembedError::IdOverflow`]
    /// if the id space is exhausted.
    pub fn push(
        &mut self,
        word: impl Into<String>,
    ) -> WEResult<T> {
        let word = word.into();
        let id: T = try_id(self.words.len())?;

        if self.index.contains_key(&word) {
            log::warn!("duplicate dictionary word {word:?} at id {id}; lookups keep the first id");
        } else {
            self.index.insert(word.clone(), id);
        }
        self.words.push(word);

        Ok(id)
    }

    /// The number of assigned ids.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Is the dictionary empty?
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Look up the id of a word.
    #[inline(always)]
    pub fn get(
        &self,
        word: &str,
    ) -> Option<T> {
        self.index.get(word).copied()
    }

    /// Does the dictionary contain this word?
    pub fn contains(
        &self,
        word: &str,
    ) -> bool {
        self.index.contains_key(word)
    }

    /// Reverse lookup of the word stored at an id.
    pub fn word(
        &self,
        id: T,
    ) -> Option<&str> {
        self.words.get(id.to_usize()?).map(String::as_str)
    }

    /// Iterate over the words in id order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Check that `extra` trailing ids still fit `T`.
    pub(crate) fn check_id_space(
        &self,
        extra: usize,
    ) -> WEResult<usize> {
        try_id_space::<T>(self.len() + extra)
    }
}
