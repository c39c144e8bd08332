//! # Character Classification
//!
//! The OOV heuristics only need two things from unicode:
//! a coarse category per character, and a simple 1:1 lowercase mapping.
//! Both are provided by a [`CharClassifier`], so callers can substitute
//! their own tables (or a stub in tests).

use unicode_general_category::{GeneralCategory, get_general_category};

/// Coarse character classes used by the OOV heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Uppercase or titlecase letter (``Lu``, ``Lt``).
    UpperOrTitle,

    /// Any other letter (``Ll``, ``Lm``, ``Lo``).
    Letter,

    /// Numeric character (``Nd``, ``Nl``, ``No``).
    Number,

    /// Everything else.
    Other,
}

impl CharClass {
    /// Is this an uppercase or titlecase letter?
    pub fn is_upper_or_title(self) -> bool {
        self == CharClass::UpperOrTitle
    }

    /// Is this a letter of any case?
    pub fn is_letter(self) -> bool {
        matches!(self, CharClass::UpperOrTitle | CharClass::Letter)
    }

    /// Is this a numeric character?
    pub fn is_number(self) -> bool {
        self == CharClass::Number
    }
}

/// Injected unicode capability.
pub trait CharClassifier {
    /// Classify a character.
    fn class(
        &self,
        c: char,
    ) -> CharClass;

    /// Map a character to its (simple, single character) lowercase form.
    fn lowercase(
        &self,
        c: char,
    ) -> char;
}

/// [`CharClassifier`] backed by the unicode general category tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeClassifier;

impl CharClassifier for UnicodeClassifier {
    fn class(
        &self,
        c: char,
    ) -> CharClass {
        match get_general_category(c) {
            GeneralCategory::UppercaseLetter | GeneralCategory::TitlecaseLetter => {
                CharClass::UpperOrTitle
            }
            GeneralCategory::LowercaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter => CharClass::Letter,
            GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber => CharClass::Number,
            _ => CharClass::Other,
        }
    }

    fn lowercase(
        &self,
        c: char,
    ) -> char {
        // Multi-char expansions keep their leading char, which is the
        // simple case mapping for every expansion in the current tables.
        c.to_lowercase().next().unwrap_or(c)
    }
}
