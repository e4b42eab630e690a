//! Builder module for `optlex`.
//! See the `optlex` crate root for full details.
mod api;
mod constant;
mod convert;
mod grammar;
mod lexer;
mod model;
pub mod prelude;

pub use api::*;
pub use convert::*;
pub use grammar::{Action, GrammarError, OptionId, ParsingTable};
pub use lexer::*;
pub use model::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
