use std::collections::HashMap;
use thiserror::Error;

use crate::constant::*;
use crate::model::{Dialect, LexicalType, TextComparison};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Cannot register {0} text in a vocabulary.")]
    InvalidType(LexicalType),

    #[error("Cannot register empty {0} text.")]
    EmptyText(LexicalType),

    #[error("Text '{text}' is already registered as {existing}.")]
    Duplicate { text: String, existing: LexicalType },
}

/// A single recognized token text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    kind: LexicalType,
    text: String,
}

impl VocabularyEntry {
    /// The lexical type produced when this text is matched.
    pub fn kind(&self) -> LexicalType {
        self.kind
    }

    /// The literal text to match.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The set of token texts recognized by the tokenizer.
///
/// Each text is unique under the vocabulary's [`TextComparison`]; no two roles may share the same literal.
///
/// ### Example
/// ```
/// # use optlex_builder as optlex;
/// use optlex::{Dialect, LexicalType, LexicalVocabulary};
///
/// let mut vocabulary = LexicalVocabulary::for_dialect(Dialect::Linux);
/// vocabulary.add(LexicalType::KeyPrefix, "+").unwrap();
/// assert!(vocabulary.add(LexicalType::ValuePrefix, "-").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalVocabulary {
    comparison: TextComparison,
    entries: Vec<VocabularyEntry>,
    index: HashMap<String, LexicalType>,
}

impl LexicalVocabulary {
    /// Create an empty vocabulary.
    pub fn new(comparison: TextComparison) -> Self {
        Self {
            comparison,
            entries: Vec::default(),
            index: HashMap::default(),
        }
    }

    /// Create the default vocabulary for `dialect`, using the dialect's default comparison.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::with_comparison(dialect, dialect.default_comparison())
    }

    /// Create the default vocabulary for `dialect`, overriding the text comparison.
    pub fn with_comparison(dialect: Dialect, comparison: TextComparison) -> Self {
        let mut vocabulary = Self::new(comparison);
        let key_prefixes: &[&str] = match dialect {
            Dialect::Linux => &LINUX_KEY_PREFIXES,
            Dialect::Windows => &WINDOWS_KEY_PREFIXES,
            Dialect::Universal => &UNIVERSAL_KEY_PREFIXES,
            Dialect::UserDefined => return vocabulary,
        };

        let defaults = key_prefixes
            .iter()
            .map(|text| (LexicalType::KeyPrefix, *text))
            .chain(VALUE_PREFIXES.iter().map(|t| (LexicalType::ValuePrefix, *t)))
            .chain(QUOTERS.iter().map(|t| (LexicalType::Quoter, *t)))
            .chain(SEPARATORS.iter().map(|t| (LexicalType::Separator, *t)));

        for (kind, text) in defaults {
            vocabulary
                .add(kind, text)
                .expect("internal error - default vocabularies must not collide");
        }

        vocabulary
    }

    /// Register a token text.
    ///
    /// Fails when `kind` is synthesized (`Text`, `StartOfInput`, `EndOfInput`), when `text` is empty, or when `text` is already registered.
    /// A failure leaves the vocabulary unchanged.
    pub fn add(
        &mut self,
        kind: LexicalType,
        text: impl Into<String>,
    ) -> Result<(), VocabularyError> {
        let text = text.into();

        if !kind.is_configurable() {
            return Err(VocabularyError::InvalidType(kind));
        }

        if text.is_empty() {
            return Err(VocabularyError::EmptyText(kind));
        }

        let normalized = self.comparison.normalize(&text).into_owned();

        if let Some(existing) = self.index.get(&normalized) {
            return Err(VocabularyError::Duplicate {
                text,
                existing: *existing,
            });
        }

        self.index.insert(normalized, kind);
        self.entries.push(VocabularyEntry { kind, text });
        Ok(())
    }

    /// The text comparison in use.
    pub fn comparison(&self) -> TextComparison {
        self.comparison
    }

    /// All registered entries, in registration order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// The registered texts of a single lexical type.
    pub fn texts(&self, kind: LexicalType) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |entry| entry.kind == kind)
            .map(VocabularyEntry::text)
    }

    /// The lexical type registered for `text`, if any.
    pub fn lookup(&self, text: &str) -> Option<LexicalType> {
        self.index.get(self.comparison.normalize(text).as_ref()).copied()
    }

    /// A copy of this vocabulary restricted to the given types.
    pub(crate) fn restricted(&self, kinds: &[LexicalType]) -> Self {
        let mut vocabulary = Self::new(self.comparison);

        for entry in self.entries.iter().filter(|e| kinds.contains(&e.kind)) {
            vocabulary
                .add(entry.kind, entry.text.clone())
                .expect("internal error - a subset of a valid vocabulary must be valid");
        }

        vocabulary
    }
}
