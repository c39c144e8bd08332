//! # Heuristic OOV Resolver
//!
//! Finds a dictionary entry for a word which is not present verbatim,
//! by trying a fixed chain of normalizations:
//!
//! 1. the word as-is;
//! 2. ``McDONALD -> Mcdonald``: if the first character and some later character
//!    are uppercase/titlecase, lowercase all but the first character;
//! 3. ``The -> the``: if any character is uppercase/titlecase, lowercase the word;
//! 4. ``1,234.5 -> 1``: if the word starts with a number and contains no letters,
//!    reduce it to its first character.
//!
//! The first hit wins. Each step costs at most one dictionary lookup, and the
//! word is classified exactly once.

use crate::{
    dictionary::Dictionary,
    types::IdType,
    unicode::{CharClass, CharClassifier},
};

/// Which step of the chain produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicStep {
    /// The word itself.
    Exact,

    /// All but the first character lowercased.
    TailLowercase,

    /// The whole word lowercased.
    Lowercase,

    /// Reduced to its leading numeric character.
    LeadingNumber,
}

/// Per-word character classification summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordShape {
    /// Class of the first character; `None` for the empty word.
    pub first: Option<CharClass>,

    /// Does any later character have an uppercase/titlecase class?
    pub rest_upper: bool,

    /// Is any later character a letter?
    pub rest_letter: bool,
}

impl WordShape {
    /// Classify every character of `word` once.
    pub fn classify<C: CharClassifier + ?Sized>(
        classifier: &C,
        word: &str,
    ) -> Self {
        let mut chars = word.chars();
        let mut shape = WordShape {
            first: chars.next().map(|c| classifier.class(c)),
            ..Default::default()
        };
        for c in chars {
            let class = classifier.class(c);
            shape.rest_upper |= class.is_upper_or_title();
            shape.rest_letter |= class.is_letter();
        }
        shape
    }

    fn first_upper(&self) -> bool {
        self.first.is_some_and(CharClass::is_upper_or_title)
    }

    fn first_number(&self) -> bool {
        self.first.is_some_and(CharClass::is_number)
    }
}

/// Resolve `word` through the heuristic chain.
///
/// ## Arguments
/// * `dict` - the dictionary to search; never modified.
/// * `classifier` - unicode classification and lowercasing.
/// * `word` - the word to resolve.
/// * `buffer` - scratch space for normalized forms.
///
/// ## Returns
/// The matched id and the step which matched, or `None` if every step missed.
pub fn resolve_heuristic<T, C>(
    dict: &Dictionary<T>,
    classifier: &C,
    word: &str,
    buffer: &mut String,
) -> Option<(T, HeuristicStep)>
where
    T: IdType,
    C: CharClassifier + ?Sized,
{
    if let Some(id) = dict.get(word) {
        return Some((id, HeuristicStep::Exact));
    }

    let shape = WordShape::classify(classifier, word);

    if shape.first_upper() && shape.rest_upper {
        buffer.clear();
        let mut chars = word.chars();
        buffer.extend(chars.next());
        buffer.extend(chars.map(|c| classifier.lowercase(c)));

        if let Some(id) = dict.get(buffer.as_str()) {
            return Some((id, HeuristicStep::TailLowercase));
        }
    }

    if shape.first_upper() || shape.rest_upper {
        buffer.clear();
        buffer.extend(word.chars().map(|c| classifier.lowercase(c)));

        if let Some(id) = dict.get(buffer.as_str()) {
            return Some((id, HeuristicStep::Lowercase));
        }
    }

    if shape.first_number() && !shape.rest_letter {
        buffer.clear();
        buffer.extend(word.chars().next());

        if let Some(id) = dict.get(buffer.as_str()) {
            return Some((id, HeuristicStep::LeadingNumber));
        }
    }

    None
}
