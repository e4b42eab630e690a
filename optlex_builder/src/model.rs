use std::borrow::Cow;

/// The role a piece of command line text plays.
///
/// `Text`, `StartOfInput` and `EndOfInput` are synthesized by the tokenizer/parser and can never be registered in a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalType {
    /// Whitespace between tokens (ex: `' '`).
    Separator,
    /// Joins a key to an inline value (ex: `=` in `-x=value`).
    ValuePrefix,
    /// Marks the start of an option key (ex: `--`).
    KeyPrefix,
    /// Opens/closes a quoted span (ex: `"`).
    Quoter,
    /// Any text which doesn't match the vocabulary.
    Text,
    /// The synthetic token preceding all input.
    StartOfInput,
    /// The synthetic token following all input.
    EndOfInput,
}

impl LexicalType {
    /// Whether this type may be supplied by a vocabulary.
    pub fn is_configurable(&self) -> bool {
        matches!(
            self,
            LexicalType::Separator
                | LexicalType::ValuePrefix
                | LexicalType::KeyPrefix
                | LexicalType::Quoter
        )
    }
}

impl std::fmt::Display for LexicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A typed piece of the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: LexicalType,
    text: String,
}

impl Token {
    /// Create a token.
    pub fn new(kind: LexicalType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Create a `Text` token.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(LexicalType::Text, text)
    }

    pub(crate) fn start_of_input() -> Self {
        Self::new(LexicalType::StartOfInput, "")
    }

    pub(crate) fn end_of_input() -> Self {
        Self::new(LexicalType::EndOfInput, "")
    }

    /// The lexical type of this token.
    pub fn kind(&self) -> LexicalType {
        self.kind
    }

    /// The literal text of this token.
    pub fn value(&self) -> &str {
        &self.text
    }

    /// The length (in bytes) of the literal text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the literal text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn into_value(self) -> String {
        self.text
    }
}

/// The type pair used to look up transitions in the parsing table.
pub type LexicalPair = (LexicalType, LexicalType);

/// Adjacent `(previous, current)` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPair<'t> {
    /// The preceding token.
    pub previous: &'t Token,
    /// The token being processed.
    pub current: &'t Token,
}

impl<'t> TokenPair<'t> {
    pub(crate) fn new(previous: &'t Token, current: &'t Token) -> Self {
        Self { previous, current }
    }

    /// The types of the pair.
    pub fn lexical_pair(&self) -> LexicalPair {
        (self.previous.kind(), self.current.kind())
    }
}

/// The rule for comparing vocabulary texts and option keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextComparison {
    /// Exact, case sensitive comparison.
    Ordinal,
    /// Case insensitive comparison.
    OrdinalIgnoreCase,
}

impl TextComparison {
    /// Whether `left` and `right` are the same text under this comparison.
    pub fn equals(&self, left: &str, right: &str) -> bool {
        match self {
            TextComparison::Ordinal => left == right,
            TextComparison::OrdinalIgnoreCase => {
                left == right || left.to_lowercase() == right.to_lowercase()
            }
        }
    }

    /// The form of `text` used as a lookup key under this comparison.
    pub fn normalize<'s>(&self, text: &'s str) -> Cow<'s, str> {
        match self {
            TextComparison::Ordinal => Cow::Borrowed(text),
            TextComparison::OrdinalIgnoreCase => Cow::Owned(text.to_lowercase()),
        }
    }

    /// The byte offset of the first occurrence of `needle` in `haystack`.
    pub(crate) fn find(&self, haystack: &str, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }

        match self {
            TextComparison::Ordinal => haystack.find(needle),
            TextComparison::OrdinalIgnoreCase => haystack.char_indices().find_map(|(i, _)| {
                haystack
                    .get(i..i + needle.len())
                    .filter(|candidate| self.equals(candidate, needle))
                    .map(|_| i)
            }),
        }
    }
}

/// A named preset of lexical vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `-x`, `--x`; case sensitive.
    Linux,
    /// `/x`; case insensitive.
    Windows,
    /// `-x`, `--x` and `/x`; case insensitive.
    Universal,
    /// An empty vocabulary to be populated by the caller; case insensitive.
    UserDefined,
}

impl Dialect {
    /// The text comparison used when none is explicitly configured.
    pub fn default_comparison(&self) -> TextComparison {
        match self {
            Dialect::Linux => TextComparison::Ordinal,
            Dialect::Windows | Dialect::Universal | Dialect::UserDefined => {
                TextComparison::OrdinalIgnoreCase
            }
        }
    }
}
