//! Traits which, typically, may be imported without concern: `use optlex::prelude::*`.

use crate::convert::EnumDescriptor;

/// Behaviour for an enumeration to be converted from command line text.
///
/// Typically derived: `#[derive(CliEnum)]`, with `#[optlex(flags)]` for flag enumerations.
pub trait CliEnum: Sized {
    /// The members of this enumeration.
    fn descriptor() -> EnumDescriptor;

    /// The variant whose value is exactly `bits`.
    fn from_bits(bits: u64) -> Option<Self>;
}
