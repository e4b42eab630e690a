mod registry;
mod shape;
mod value;

use thiserror::Error;

pub use registry::*;
pub use shape::*;
pub use value::*;

/// Error when raw option values cannot be converted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No converter is registered for {type_name}.")]
    Unconvertible { type_name: String },

    #[error("Cannot convert '{raw}' to {type_name}.")]
    InvalidValue { raw: String, type_name: String },

    #[error("Cannot convert multiple values {values:?} to a single {type_name}.")]
    MultipleValues {
        values: Vec<String>,
        type_name: String,
    },

    #[error("'{raw}' is not a member of {type_name}.")]
    UnknownMember { raw: String, type_name: String },

    #[error("Cannot read a {actual} value as {expected}.")]
    Mismatch {
        expected: &'static str,
        actual: &'static str,
    },
}
