mod generator;
mod table;

use thiserror::Error;

use crate::model::LexicalType;

pub(crate) use generator::{Allocate, OptionsGenerator};
pub use generator::OptionId;
pub use table::*;

/// Error when the token stream does not form a valid sequence of options.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Illegal token sequence {previous} followed by {current} at token {index}.")]
    IllegalSequence {
        previous: LexicalType,
        current: LexicalType,
        index: usize,
    },

    #[error("Malformed option at token {index}: {previous} cannot be followed by {current}.")]
    TerminatedWithPrejudice {
        previous: LexicalType,
        current: LexicalType,
        index: usize,
    },

    #[error("Key prefix '{prefix}' is not followed by a key (token {index}).")]
    DanglingKeyPrefix { prefix: String, index: usize },
}
