//! # Subword Composition
//!
//! In subform mode an unseen word is wrapped in boundary markers
//! (``cats -> <cats>``), cut into every character n-gram of
//! [`MIN_NGRAM`]..=[`MAX_NGRAM`] characters, and the n-grams found in the
//! dictionary become the constituents of a new composed row.
//!
//! Single characters are never used as n-grams.

use core::iter::once;

use crate::{
    dictionary::Dictionary,
    errors::WEResult,
    store::WeightStore,
    types::{IdType, WEHashMap},
};

/// Beginning-of-word marker.
pub const BOW: char = '<';

/// End-of-word marker.
pub const EOW: char = '>';

/// Shortest n-gram, in characters.
pub const MIN_NGRAM: usize = 2;

/// Longest n-gram, in characters.
pub const MAX_NGRAM: usize = 4;

/// Write the boundary-marked form of `word` into `buffer`.
pub fn bracket_into(
    word: &str,
    buffer: &mut String,
) {
    buffer.clear();
    buffer.reserve(word.len() + 2);
    buffer.push(BOW);
    buffer.push_str(word);
    buffer.push(EOW);
}

/// Iterate over the character n-grams of `marked`.
///
/// From each start position, yields the substrings of
/// [`MIN_NGRAM`]..=[`MAX_NGRAM`] characters, shortest first;
/// positions near the end yield only the n-grams which fit.
pub fn boundary_ngrams(marked: &str) -> impl Iterator<Item = &str> + '_ {
    marked.char_indices().flat_map(move |(start, _)| {
        let tail = &marked[start..];
        // End offsets of the 1, 2, 3, ... character prefixes of `tail`.
        tail.char_indices()
            .map(|(end, _)| end)
            .skip(1)
            .chain(once(tail.len()))
            .skip(MIN_NGRAM - 1)
            .take(MAX_NGRAM - MIN_NGRAM + 1)
            .map(move |end| &tail[..end])
    })
}

/// Collect the sorted, unique dictionary ids of the n-grams of `word`.
///
/// ## Arguments
/// * `dict` - the n-gram dictionary.
/// * `word` - the unmarked word.
/// * `buffer` - scratch space for the marked form.
pub fn ngram_ids<T: IdType>(
    dict: &Dictionary<T>,
    word: &str,
    buffer: &mut String,
) -> Vec<T> {
    bracket_into(word, buffer);

    let mut ids: Vec<T> = boundary_ngrams(buffer.as_str())
        .filter_map(|gram| dict.get(gram))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Memoized outcome of decomposing a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decomposition<T: IdType> {
    /// The word has a composed row.
    Composed(T),

    /// No n-gram matched and there is no unknown row to fall back on.
    NotComposable,
}

/// Decomposes unseen words into composed rows, memoizing every word.
#[derive(Debug, Clone, PartialEq)]
pub struct SubformComposer<T: IdType> {
    forms: WEHashMap<String, Decomposition<T>>,
    composed: usize,
    max_composed: Option<usize>,
}

impl<T: IdType> Default for SubformComposer<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: IdType> SubformComposer<T> {
    /// Create a composer.
    ///
    /// ## Arguments
    /// * `max_composed` - optional cap on the number of composed rows.
    pub fn new(max_composed: Option<usize>) -> Self {
        Self {
            forms: WEHashMap::default(),
            composed: 0,
            max_composed,
        }
    }

    /// Change the cap on the number of composed rows.
    ///
    /// Rows already composed are kept, even beyond a lowered cap.
    pub fn set_max_composed(
        &mut self,
        max_composed: Option<usize>,
    ) {
        self.max_composed = max_composed;
    }

    /// The number of composed rows allocated so far.
    pub fn composed_count(&self) -> usize {
        self.composed
    }

    /// The memoized decomposition of a word, if it has been seen.
    pub fn decomposition(
        &self,
        word: &str,
    ) -> Option<Decomposition<T>> {
        self.forms.get(word).copied()
    }

    /// Resolve `word` to a composed row, allocating one on first sight.
    ///
    /// ## Arguments
    /// * `dict` - the n-gram dictionary.
    /// * `store` - the weight store new rows are appended to.
    /// * `unknown` - the unknown id, used as sole constituent when nothing matches.
    /// * `word` - the word to decompose.
    /// * `buffer` - scratch space.
    ///
    /// ## Returns
    /// The composed id; `None` if the word is not composable, or if the
    /// composed row cap has been reached.
    pub fn compose(
        &mut self,
        dict: &Dictionary<T>,
        store: &mut WeightStore<T>,
        unknown: Option<T>,
        word: &str,
        buffer: &mut String,
    ) -> WEResult<Option<T>> {
        if let Some(decomposition) = self.forms.get(word) {
            return Ok(match *decomposition {
                Decomposition::Composed(id) => Some(id),
                Decomposition::NotComposable => None,
            });
        }

        let mut subforms = ngram_ids(dict, word, buffer);
        if subforms.is_empty() {
            match unknown {
                Some(unknown) => subforms.push(unknown),
                None => {
                    self.forms
                        .insert(word.to_string(), Decomposition::NotComposable);
                    return Ok(None);
                }
            }
        }

        if self.max_composed.is_some_and(|max| self.composed >= max) {
            log::debug!("composed row cap reached; not composing {word:?}");
            return Ok(None);
        }

        let id = store.push_composed(subforms)?;
        self.composed += 1;
        self.forms
            .insert(word.to_string(), Decomposition::Composed(id));

        Ok(Some(id))
    }
}
