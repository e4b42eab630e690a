//! Derive macros for `optlex`.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{parse_macro_input, DeriveInput};

use crate::model::DeriveEnum;

pub(crate) const MACRO_CLI_ENUM: &str = "CliEnum";
pub(crate) const ATTRIBUTE: &str = "optlex";

/// Derive `optlex::prelude::CliEnum` on a field-less enum.
///
/// Each variant is matched by its name (case insensitive), or by `#[optlex(name = "..")]`.
/// Mark the enum `#[optlex(flags)]` to accept combinations such as `Read,Write`; its variants either all
/// carry explicit discriminants, or all take successive powers of two by position.
#[proc_macro_derive(CliEnum, attributes(optlex))]
pub fn cli_enum(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as DeriveInput);

    DeriveEnum::try_from(derive_input)
        .and_then(TokenStream2::try_from)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
