mod collection;
mod option;

use thiserror::Error;

use crate::convert::ConversionError;
use crate::grammar::GrammarError;
use crate::lexer::LexicalError;

pub use collection::*;
pub use option::*;

/// Error when an option cannot be registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Option '{0}' must have at least one key.")]
    NoKeys(String),

    #[error("Option '{0}' has an empty key.")]
    EmptyKey(String),

    #[error("Option '{0}' is already registered.")]
    DuplicatePath(String),

    #[error("Option key '{key}' is already registered to '{context_path}'.")]
    DuplicateKey { key: String, context_path: String },

    #[error("Option key '{key}' contains the vocabulary text '{text}', and so can never be matched.")]
    UnreachableKey { key: String, text: String },

    #[error("Option '{context_path}' declares the shape {shape}, which has no converter.")]
    Unconvertible { context_path: String, shape: String },
}

/// Error when a command line cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Lexical(#[from] LexicalError),

    #[error("Parse error: {0}")]
    Grammar(#[from] GrammarError),
}

/// Error when an option's values cannot be retrieved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("No option is registered at '{0}'.")]
    UnknownPath(String),

    #[error("Option '{0}' has no declared shape; use `get_value_as`.")]
    MissingShape(String),

    #[error("Option '{context_path}': {error}")]
    Conversion {
        context_path: String,
        #[source]
        error: ConversionError,
    },
}
