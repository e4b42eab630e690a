use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::{LexicalPair, LexicalType};

/// The step the generator takes for a `(previous, current)` token pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Begin a new option group.
    Create,
    /// Hand the pending option group to the allocator; when the current token is a key prefix, begin a new one.
    Commit,
    /// Skip the current token.
    ConsumeToken,
    /// Use the current text as the pending group's key, or as one of its values.
    ProcessText,
    /// Join the pending group's key to an inline value (`-x=value`).
    ///
    /// Only legal directly after the key; anywhere else it terminates like [`Action::TerminateWithPrejudice`].
    EncloseValue,
    /// Abandon the pending group and fail.
    TerminateWithPrejudice,
}

/// A transition table mapping token pairs to [`Action`]s.
///
/// Pairs without an entry are illegal sequences.
/// Pairs ending in `EndOfInput` are never consulted; the generator handles them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingTable {
    cells: HashMap<LexicalPair, Action>,
}

const ROWS: [LexicalType; 5] = [
    LexicalType::StartOfInput,
    LexicalType::KeyPrefix,
    LexicalType::ValuePrefix,
    LexicalType::Separator,
    LexicalType::Text,
];

const COLUMNS: [LexicalType; 4] = [
    LexicalType::KeyPrefix,
    LexicalType::ValuePrefix,
    LexicalType::Separator,
    LexicalType::Text,
];

impl ParsingTable {
    /// The standard table, built once on first use.
    pub fn standard() -> &'static ParsingTable {
        static STANDARD: OnceLock<ParsingTable> = OnceLock::new();
        STANDARD.get_or_init(Self::build_standard)
    }

    fn build_standard() -> Self {
        use Action::*;

        // Columns: KeyPrefix, ValuePrefix, Separator, Text.
        let actions: [[Action; 4]; 5] = [
            // StartOfInput
            [Create, TerminateWithPrejudice, ConsumeToken, ProcessText],
            // KeyPrefix
            [
                TerminateWithPrejudice,
                TerminateWithPrejudice,
                TerminateWithPrejudice,
                ProcessText,
            ],
            // ValuePrefix
            [
                TerminateWithPrejudice,
                TerminateWithPrejudice,
                ConsumeToken,
                ProcessText,
            ],
            // Separator
            [Commit, ConsumeToken, ConsumeToken, ProcessText],
            // Text
            [TerminateWithPrejudice, EncloseValue, ConsumeToken, ProcessText],
        ];

        let mut cells = HashMap::default();

        for (previous, row) in ROWS.iter().zip(actions.iter()) {
            for (current, action) in COLUMNS.iter().zip(row.iter()) {
                cells.insert((*previous, *current), *action);
            }
        }

        Self { cells }
    }

    /// The action for `pair`, or `None` when the sequence is illegal.
    pub fn action(&self, pair: LexicalPair) -> Option<Action> {
        self.cells.get(&pair).copied()
    }

    /// The number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
