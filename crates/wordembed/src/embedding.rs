//! # Word Embedding
//!
//! [`WordEmbedding`] ties together the [`Dictionary`], the OOV strategy
//! selected by the persisted section ([`LookupMode`]), and the
//! [`WeightStore`].
//!
//! ## Access Protocol
//!
//! * [`WordEmbedding::lookup`] resolves a word to a row id. In subform mode
//!   this may append a composed row.
//! * [`WordEmbedding::ensure_materialized`] brings a composed row up to date;
//!   [`WordEmbedding::read_row`] is then a pure read.
//!   [`WordEmbedding::get_row`] does both.
//! * An optimizer writes through [`WordEmbedding::row_mut`], and then
//!   [`WordEmbedding::flush_updates`] moves the changes on composed rows
//!   down into their n-gram rows.
//!
//! All mutation goes through ``&mut self``; an embedding shared between
//! threads must be wrapped in a lock by the caller.
//!
//! ## Style Hints
//!
//! When there is no local ambiguity, instance names should prefer `embedding`.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    dictionary::Dictionary,
    errors::{WEResult, WordembedError},
    io::{BinaryDecoder, BinaryEncoder},
    options::EmbeddingOptions,
    resolver::resolve_heuristic,
    store::WeightStore,
    subform::{Decomposition, SubformComposer},
    types::{IdType, try_id, try_id_space},
    unicode::{CharClassifier, UnicodeClassifier},
};

/// How words missing from the dictionary are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LookupMode {
    /// Case folding and leading-number fallbacks.
    #[default]
    Heuristic,

    /// Character n-gram composition.
    Subform,
}

impl LookupMode {
    /// Select the mode from the persisted subform flag.
    pub fn from_subform_flag(subform: bool) -> Self {
        if subform {
            LookupMode::Subform
        } else {
            LookupMode::Heuristic
        }
    }

    /// Is this [`LookupMode::Subform`]?
    pub fn is_subform(self) -> bool {
        self == LookupMode::Subform
    }
}

/// The outcome of a [`WordEmbedding::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordLookup<T: IdType> {
    /// A dictionary row; verbatim or through the heuristics.
    Known(T),

    /// A composed subform row.
    Composed(T),

    /// Nothing matched; the unknown row.
    Unknown(T),

    /// Nothing matched, and there is no unknown row.
    Missing,
}

impl<T: IdType> WordLookup<T> {
    /// The resolved row id, if any.
    pub fn id(&self) -> Option<T> {
        match *self {
            WordLookup::Known(id) | WordLookup::Composed(id) | WordLookup::Unknown(id) => Some(id),
            WordLookup::Missing => None,
        }
    }

    /// A short name for the kind of resolution.
    pub fn kind(&self) -> &'static str {
        match self {
            WordLookup::Known(_) => "known",
            WordLookup::Composed(_) => "composed",
            WordLookup::Unknown(_) => "unknown",
            WordLookup::Missing => "missing",
        }
    }
}

/// Word embedding matrix with OOV handling.
///
/// ## Type Parameters
/// * `T` - the row id type.
/// * `C` - the unicode capability used by the heuristics.
#[derive(Debug, Clone)]
pub struct WordEmbedding<T: IdType = u32, C: CharClassifier = UnicodeClassifier> {
    dict: Dictionary<T>,
    unknown: Option<T>,
    mode: LookupMode,
    store: WeightStore<T>,
    composer: SubformComposer<T>,
    classifier: C,
    options: EmbeddingOptions,
    buffer: String,
}

impl<T: IdType> WordEmbedding<T> {
    /// Decode an embedding section with the default [`UnicodeClassifier`].
    ///
    /// Consumes exactly the embedding section; the decoder is left positioned
    /// after it.
    pub fn load(data: &mut BinaryDecoder) -> WEResult<Self> {
        Self::load_with(data, UnicodeClassifier, EmbeddingOptions::default())
    }

    /// Decode an embedding from a buffer holding exactly one section.
    pub fn from_bytes(data: &[u8]) -> WEResult<Self> {
        let mut dec = BinaryDecoder::new(data);
        let embedding = Self::load(&mut dec)?;
        if !dec.is_end() {
            return Err(WordembedError::Malformed(format!(
                "{} trailing bytes after embedding section",
                dec.remaining()
            )));
        }
        Ok(embedding)
    }

    /// Read an embedding from a [`Read`] stream holding exactly one section.
    pub fn read_from<R: Read>(mut reader: R) -> WEResult<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Load an embedding file.
    pub fn load_path(path: impl AsRef<Path>) -> WEResult<Self> {
        let path = path.as_ref();
        log::debug!("loading embedding: {}", path.display());
        Self::read_from(BufReader::new(File::open(path)?))
    }

    /// Build an embedding in memory.
    ///
    /// ## Arguments
    /// * `dimension` - the row width.
    /// * `words` - dictionary words in id order.
    /// * `weights` - row-major ``dimension * (words + has_unknown)`` values.
    /// * `has_unknown` - is the last row the unknown row?
    /// * `mode` - the OOV lookup mode.
    pub fn from_parts<I, S>(
        dimension: usize,
        words: I,
        weights: Vec<f32>,
        has_unknown: bool,
        mode: LookupMode,
    ) -> WEResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts_with(
            dimension,
            words,
            weights,
            has_unknown,
            mode,
            UnicodeClassifier,
            EmbeddingOptions::default(),
        )
    }
}

impl<T: IdType, C: CharClassifier> WordEmbedding<T, C> {
    /// Decode an embedding section.
    ///
    /// ## Arguments
    /// * `data` - decoder positioned at the start of the section.
    /// * `classifier` - the unicode capability for the heuristics.
    /// * `options` - runtime options.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn load_with(
        data: &mut BinaryDecoder,
        classifier: C,
        options: EmbeddingOptions,
    ) -> WEResult<Self> {
        let dimension = data.next_u32()? as usize;
        if dimension == 0 {
            return Err(WordembedError::Malformed(
                "embedding dimension must be non-zero".to_string(),
            ));
        }

        let dict_size = try_id_space::<T>(data.next_u32()? as usize)?;
        // Every word costs at least its length byte.
        let mut dict = Dictionary::with_capacity(dict_size.min(data.remaining()));
        for _ in 0..dict_size {
            dict.push(data.next_str()?)?;
        }

        let has_unknown = data.next_flag()?;
        let mode = LookupMode::from_subform_flag(data.next_flag()?);

        let rows = dict.check_id_space(has_unknown as usize)?;
        let count = dimension.checked_mul(rows).ok_or_else(|| {
            WordembedError::Malformed(format!("{rows} rows of width {dimension} overflow"))
        })?;
        let weights = data.next_f32s(count)?;

        Self::assemble(
            dimension,
            dict,
            weights,
            has_unknown,
            mode,
            classifier,
            options,
        )
    }

    /// Build an embedding in memory, with a custom classifier and options.
    ///
    /// See [`WordEmbedding::from_parts`].
    pub fn from_parts_with<I, S>(
        dimension: usize,
        words: I,
        weights: Vec<f32>,
        has_unknown: bool,
        mode: LookupMode,
        classifier: C,
        options: EmbeddingOptions,
    ) -> WEResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dict = Dictionary::from_words(words)?;
        let rows = dict.check_id_space(has_unknown as usize)?;
        if dimension.checked_mul(rows) != Some(weights.len()) {
            return Err(WordembedError::Malformed(format!(
                "expected {rows} rows of width {dimension}, found {} weights",
                weights.len()
            )));
        }

        Self::assemble(
            dimension,
            dict,
            weights,
            has_unknown,
            mode,
            classifier,
            options,
        )
    }

    fn assemble(
        dimension: usize,
        dict: Dictionary<T>,
        weights: Vec<f32>,
        has_unknown: bool,
        mode: LookupMode,
        classifier: C,
        options: EmbeddingOptions,
    ) -> WEResult<Self> {
        let store = WeightStore::from_matrix(dimension, weights)?;
        let unknown = if has_unknown {
            Some(try_id(dict.len())?)
        } else {
            None
        };
        debug_assert_eq!(store.rows(), dict.len() + has_unknown as usize);

        log::debug!(
            "embedding: dimension {dimension}, {} words, unknown row: {has_unknown}, mode: {mode:?}",
            dict.len()
        );

        Ok(Self {
            dict,
            unknown,
            mode,
            store,
            composer: SubformComposer::new(options.max_composed_rows()),
            classifier,
            options,
            buffer: String::new(),
        })
    }

    /// Replace the runtime options.
    pub fn with_options(
        mut self,
        options: EmbeddingOptions,
    ) -> Self {
        self.composer
            .set_max_composed(options.max_composed_rows());
        self.options = options;
        self
    }

    /// The runtime options.
    pub fn options(&self) -> &EmbeddingOptions {
        &self.options
    }

    /// The row width.
    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    /// The current number of rows, including composed rows.
    pub fn rows(&self) -> usize {
        self.store.rows()
    }

    /// The word dictionary.
    pub fn dictionary(&self) -> &Dictionary<T> {
        &self.dict
    }

    /// The weight store.
    pub fn store(&self) -> &WeightStore<T> {
        &self.store
    }

    /// The OOV lookup mode.
    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    /// The reserved unknown row id, if configured.
    pub fn unknown_id(&self) -> Option<T> {
        self.unknown
    }

    fn unknown_lookup(&self) -> WordLookup<T> {
        match self.unknown {
            Some(id) => WordLookup::Unknown(id),
            None => WordLookup::Missing,
        }
    }

    /// Resolve a word to a row id.
    ///
    /// * Heuristic mode: the dictionary, then the normalization chain of
    ///   [`crate::resolver`], then the unknown row.
    /// * Subform mode: the dictionary, then a (memoized) composed row, then
    ///   the unknown row.
    ///
    /// Composed ids are never recycled; the same unseen word resolves to the
    /// same id for the lifetime of the embedding.
    ///
    /// ## Returns
    /// The resolution; or [`WordembedError::IdOverflow`] if a composed row
    /// would not fit the id type.
    pub fn lookup(
        &mut self,
        word: &str,
    ) -> WEResult<WordLookup<T>> {
        match self.mode {
            LookupMode::Heuristic => Ok(
                match resolve_heuristic(&self.dict, &self.classifier, word, &mut self.buffer) {
                    Some((id, _)) => WordLookup::Known(id),
                    None => self.unknown_lookup(),
                },
            ),
            LookupMode::Subform => {
                if !self.options.compose_known_words()
                    && let Some(id) = self.dict.get(word)
                {
                    return Ok(WordLookup::Known(id));
                }

                let composed = self.composer.compose(
                    &self.dict,
                    &mut self.store,
                    self.unknown,
                    word,
                    &mut self.buffer,
                )?;
                Ok(match composed {
                    Some(id) => WordLookup::Composed(id),
                    None => self.unknown_lookup(),
                })
            }
        }
    }

    /// Resolve a word to a row id; `None` when nothing matched and there is
    /// no unknown row.
    pub fn lookup_id(
        &mut self,
        word: &str,
    ) -> WEResult<Option<T>> {
        Ok(self.lookup(word)?.id())
    }

    /// The memoized subform decomposition of a word, if it has been seen.
    pub fn decomposition(
        &self,
        word: &str,
    ) -> Option<Decomposition<T>> {
        self.composer.decomposition(word)
    }

    /// The constituent ids of a composed row.
    pub fn subforms(
        &self,
        id: T,
    ) -> Option<&[T]> {
        self.store.composition(id).map(|comp| comp.subforms())
    }

    /// Bring the row for `id` up to date.
    ///
    /// See [`WeightStore::ensure_materialized`].
    ///
    /// ## Returns
    /// `false` if `id` is out of range.
    pub fn ensure_materialized(
        &mut self,
        id: T,
    ) -> bool {
        self.store.ensure_materialized(id)
    }

    /// Read the row for `id` as stored, without materializing.
    pub fn read_row(
        &self,
        id: T,
    ) -> Option<&[f32]> {
        self.store.read_row(id)
    }

    /// Materialize (if needed) and read the row for `id`.
    ///
    /// ## Returns
    /// The row; `None` if `id` is out of range.
    pub fn get_row(
        &mut self,
        id: T,
    ) -> Option<&[f32]> {
        if !self.store.ensure_materialized(id) {
            return None;
        }
        self.store.read_row(id)
    }

    /// Materialize (if needed) and borrow the row for `id` for an update.
    ///
    /// Changes to composed rows reach their constituents on the next
    /// [`flush_updates`](Self::flush_updates).
    pub fn row_mut(
        &mut self,
        id: T,
    ) -> Option<&mut [f32]> {
        if !self.store.ensure_materialized(id) {
            return None;
        }
        self.store.row_mut(id)
    }

    /// The composed ids materialized since the last flush.
    pub fn active_ids(&self) -> &[T] {
        self.store.active_ids()
    }

    /// Push changes made to composed rows back into their constituent rows.
    ///
    /// For every active composed row, ``(row - snapshot) / count`` is added to
    /// each constituent row, and the composed row is marked stale.
    ///
    /// ## Returns
    /// The number of composed rows flushed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn flush_updates(&mut self) -> usize {
        if !self.mode.is_subform() {
            return 0;
        }
        let flushed = self.store.flush();
        log::debug!("flushed {flushed} composed rows");
        flushed
    }

    /// Encode the embedding section.
    ///
    /// Only the loaded rows (dictionary and unknown) are written;
    /// composed rows are rebuilt on demand after loading.
    ///
    /// ## Returns
    /// [`WordembedError::PendingUpdates`] if composed rows hold changes which
    /// have not been flushed.
    pub fn encode(
        &self,
        enc: &mut BinaryEncoder,
    ) -> WEResult<()> {
        let pending = self.store.pending_updates();
        if pending > 0 {
            return Err(WordembedError::PendingUpdates { active: pending });
        }

        let dimension = self.dimension();
        let to_u32 = |value: usize, what: &str| {
            u32::try_from(value)
                .map_err(|_| WordembedError::Malformed(format!("{what} {value} exceeds u32")))
        };

        enc.add_u32(to_u32(dimension, "dimension")?);
        enc.add_u32(to_u32(self.dict.len(), "dictionary size")?);
        for word in self.dict.words() {
            enc.add_str(word)?;
        }
        enc.add_flag(self.unknown.is_some());
        enc.add_flag(self.mode.is_subform());

        let base_rows = self.dict.len() + self.unknown.is_some() as usize;
        enc.add_f32s(&self.store.matrix()[..base_rows * dimension]);

        Ok(())
    }

    /// Encode the embedding section into a new buffer.
    pub fn to_bytes(&self) -> WEResult<Vec<u8>> {
        let mut enc = BinaryEncoder::new();
        self.encode(&mut enc)?;
        Ok(enc.into_bytes())
    }

    /// Write the embedding section to a [`Write`] stream.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
    ) -> WEResult<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Save the embedding section to a file.
    pub fn save_path(
        &self,
        path: impl AsRef<Path>,
    ) -> WEResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
