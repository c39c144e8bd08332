//! # Embedding Options

/// Options for configuring a [`crate::WordEmbedding`].
///
/// The persisted section decides the dimension, dictionary, unknown row and
/// lookup mode; these options only tune runtime behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmbeddingOptions {
    /// Decompose every word in subform mode, even dictionary words.
    pub compose_known_words: bool,

    /// Cap on the number of composed rows; `None` is unbounded.
    pub max_composed_rows: Option<usize>,
}

impl EmbeddingOptions {
    /// Gets the configured `compose_known_words` value.
    ///
    /// When enabled, subform mode skips the verbatim dictionary check,
    /// which suits dictionaries which hold only n-grams.
    pub fn compose_known_words(&self) -> bool {
        self.compose_known_words
    }

    /// Sets the configured `compose_known_words` value.
    pub fn set_compose_known_words(
        &mut self,
        compose_known_words: bool,
    ) {
        self.compose_known_words = compose_known_words;
    }

    /// Sets the configured `compose_known_words` value.
    pub fn with_compose_known_words(
        mut self,
        compose_known_words: bool,
    ) -> Self {
        self.set_compose_known_words(compose_known_words);
        self
    }

    /// Gets the configured composed row cap.
    ///
    /// Once the cap is reached, new unseen words resolve as if none of
    /// their n-grams matched, and no further rows are allocated.
    pub fn max_composed_rows(&self) -> Option<usize> {
        self.max_composed_rows
    }

    /// Sets the configured composed row cap.
    pub fn set_max_composed_rows(
        &mut self,
        max_composed_rows: Option<usize>,
    ) {
        self.max_composed_rows = max_composed_rows;
    }

    /// Sets the configured composed row cap.
    pub fn with_max_composed_rows(
        mut self,
        max_composed_rows: Option<usize>,
    ) -> Self {
        self.set_max_composed_rows(max_composed_rows);
        self
    }
}
