mod cleanup;
mod tokenizer;
mod vocabulary;

use thiserror::Error;

pub use cleanup::*;
pub use tokenizer::*;
pub use vocabulary::*;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexicalError {
    #[error("Unterminated quote {quoter} at offset {offset}; the input was truncated.")]
    UnterminatedQuote { quoter: String, offset: usize },
}
