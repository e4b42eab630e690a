//! Derive macros for `optlex`.
//!
//! [`CliEnum`] implements [`crate::prelude::CliEnum`] on a field-less enum.
//! * `#[optlex(flags)]` on the enum: members may be combined, either comma delimited (`Read,Write`) or as separate values.
//! Either every variant gives an explicit discriminant, or none does and they take successive powers of two by position.
//! * `#[optlex(name = "..")]` on a variant: the member name matched on the command line (default: the variant name).
//!
//! Member names are always matched case insensitively.
//!
//! ```
//! use optlex::derive::*;
//! use optlex::prelude::*;
//!
//! #[derive(Debug, PartialEq, CliEnum)]
//! enum Colour {
//!     Red,
//!     #[optlex(name = "azure")]
//!     Blue,
//! }
//!
//! let descriptor = Colour::descriptor();
//! assert_eq!(descriptor.name(), "Colour");
//! assert_eq!(descriptor.member("AZURE").map(|member| member.bits()), Some(1));
//! assert_eq!(Colour::from_bits(0), Some(Colour::Red));
//! ```

pub use optlex_derive::*;
