//! `optlex` is a dialect aware, table driven command line option parser for Rust.
//!
//! Rather than walking `argv` by hand, `optlex` treats the command line as a small language:
//! * *Lexing*:
//! The input is tokenized against a [`LexicalVocabulary`] of key prefixes (`-`, `--`, `/`), value prefixes (`=`), quoters and separators.
//! The vocabulary is chosen per [`Dialect`], or configured by hand.
//! * *Grammar*:
//! Each adjacent pair of tokens is looked up in a fixed [`ParsingTable`], whose [`Action`] drives the construction of key/value groups.
//! Any pair the table does not list is a parse error, reported with the token index.
//! * *Allocation*:
//! Each group is handed to the [`CliOption`] registered under its key, according to the option's [`OptionStyle`].
//! Unknown keys and stray values are recorded rather than rejected.
//! * *Conversion*:
//! Raw text is converted on demand into a declared [`TargetShape`] via a [`ConverterRegistry`].
//!
//! # Usage
//! Configure an [`OptionCollection`] by `register`ing [`OptionDefinition`]s, then `parse` the command line:
//! ```no_run
#![doc = include_str!("../demos/demo_copy.rs")]
//! ```
//!
//! ```console
//! $ copy -s a.txt b.txt --verbose
//! Sources: [Text("a.txt"), Text("b.txt")]
//! Retries: 3
//! Verbose: true
//!
//! $ copy --retries
//! Option 'source' is not satisfied by 0 value(s).
//! Option 'retries' is not satisfied by 0 value(s).
//!
//! $ copy -s a.txt --retries --verbose
//! Parse error: Malformed option at token 8: KeyPrefix cannot be followed by KeyPrefix.
//! ```
//!
//! # Option styles
//! * [`OptionStyle::Switch`]: presence only (`-v`); a switch given values keeps none of them, and the surplus becomes stray.
//! * [`OptionStyle::SingleValued`]: exactly one value (`-o out.txt`, `-o=out.txt`).
//! * [`OptionStyle::Collection`]: one or more values, accumulated across repeated keys (`-i a -i b c`).
//! * [`OptionStyle::ConcatenatedSingleValue`]: one or more values forming one logical value, typically a flag enumeration (`-p Read Write`).
//!
//! # Dialects
//! * [`Dialect::Linux`]: keys are prefixed by `-` or `--` and compared case sensitively.
//! * [`Dialect::Windows`]: keys are prefixed by `/` and compared case insensitively.
//! * [`Dialect::Universal`]: accepts both styles, case insensitively.
//! * [`Dialect::UserDefined`]: starts empty; populate it through [`LexicalVocabulary::add`].
//!
//! Every dialect accepts `=` as a value prefix, and `"` and `'` as quoters.
//!
//! # Enumerations
//! Enumerations are converted by name, via [`prelude::CliEnum`].
//! Derive it with [`derive::CliEnum`]; mark flag enumerations with `#[optlex(flags)]` so that `-p Read,Write` (or `-p Read Write`) combines members:
//! ```no_run
#![doc = include_str!("../demos/demo_permissions.rs")]
//! ```
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events from the tokenizer, the grammar and the conversion layer.
pub mod derive;
pub use optlex_builder::*;
