//! # `wordembed` Word Embedding Lookup
//!
//! Maps word tokens to fixed-dimension `f32` vectors for a downstream
//! tagging / parsing model, and handles out-of-vocabulary (OOV) words in one
//! of two ways:
//!
//! * a heuristic normalization chain (case folding, leading-digit fallback)
//!   which finds an existing dictionary entry; or
//! * "subform" mode, which composes a vector for an unseen word as the mean
//!   of its boundary-marked character n-gram rows.
//!
//! Composed rows are materialized lazily, and after an external optimizer
//! step has written into them, [`WordEmbedding::flush_updates`] pushes the
//! changes back down into the n-gram rows they were built from.
//!
//! See:
//! * [`embedding`] for the [`WordEmbedding`] itself.
//! * [`io`] for the binary section codec.
//! * [`unicode`] for the injectable character classification.
//!
//! ## Loading and Looking Up
//!
//! ```rust,no_run
//! use wordembed::{WEResult, WordEmbedding};
//!
//! fn example() -> WEResult<()> {
//!     let mut embedding: WordEmbedding<u32> = WordEmbedding::load_path("forms.emb")?;
//!
//!     let dimension = embedding.dimension();
//!     if let Some(id) = embedding.lookup("Unseen")?.id() {
//!         let row = embedding.get_row(id).expect("lookup ids are in range");
//!         assert_eq!(row.len(), dimension);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod dictionary;
pub mod embedding;
pub mod errors;
pub mod io;
pub mod options;
pub mod resolver;
pub mod store;
pub mod subform;
pub mod types;
pub mod unicode;

#[doc(inline)]
pub use dictionary::Dictionary;
#[doc(inline)]
pub use embedding::{LookupMode, WordEmbedding, WordLookup};
#[doc(inline)]
pub use errors::{WEResult, WordembedError};
#[doc(inline)]
pub use options::EmbeddingOptions;
#[doc(inline)]
pub use store::WeightStore;
#[doc(inline)]
pub use types::IdType;
#[doc(inline)]
pub use unicode::{CharClass, CharClassifier, UnicodeClassifier};
