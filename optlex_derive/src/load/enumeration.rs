use proc_macro2::Literal;
use quote::ToTokens;
use std::collections::HashMap;

use crate::{
    model::{DeriveEnum, DeriveValue, DeriveVariant, IntermediateAttributes},
    ATTRIBUTE, MACRO_CLI_ENUM,
};

impl TryFrom<syn::DeriveInput> for DeriveEnum {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let enum_name = &value.ident;

        match &value.data {
            syn::Data::Enum(de) => {
                let attributes = IntermediateAttributes::collect(&value.attrs)?;
                let variants = de
                    .variants
                    .iter()
                    .map(DeriveVariant::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                let flags = attributes.singletons.contains("flags");

                if flags && variants.len() > 64 {
                    return Err(syn::Error::new(
                        enum_name.span(),
                        format!("Invalid - {MACRO_CLI_ENUM} flags support at most 64 variants."),
                    ));
                }

                // Implicit flag members are numbered by position.
                if flags
                    && variants.iter().any(|v| v.explicit_discriminant)
                    && variants.iter().any(|v| !v.explicit_discriminant)
                {
                    return Err(syn::Error::new(
                        enum_name.span(),
                        format!(
                            "Invalid - {MACRO_CLI_ENUM} flags cannot mix implicit and explicit discriminants."
                        ),
                    ));
                }

                let mut discriminants: HashMap<u64, &syn::Ident> = HashMap::default();

                for variant in &de.variants {
                    if let Some(value) = literal_discriminant(variant)? {
                        if let Some(existing) = discriminants.insert(value, &variant.ident) {
                            return Err(syn::Error::new(
                                variant.ident.span(),
                                format!(
                                    "Invalid - {MACRO_CLI_ENUM} variants '{existing}' and '{}' share the discriminant {value}.",
                                    variant.ident
                                ),
                            ));
                        }
                    }
                }

                Ok(DeriveEnum {
                    enum_name: enum_name.clone(),
                    flags,
                    variants,
                })
            }
            _ => Err(syn::Error::new(
                enum_name.span(),
                format!("Invalid - {MACRO_CLI_ENUM} only applies to 'enum' data structures."),
            )),
        }
    }
}

impl TryFrom<&syn::Variant> for DeriveVariant {
    type Error = syn::Error;

    fn try_from(value: &syn::Variant) -> Result<Self, Self::Error> {
        let variant_name = value.ident.clone();

        if !matches!(value.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                variant_name.span(),
                format!("Invalid - {MACRO_CLI_ENUM} variants cannot carry fields."),
            ));
        }

        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        let name = match attributes.pairs.get("name").map(Vec::as_slice) {
            None | Some([]) => DeriveValue {
                tokens: Literal::string(&variant_name.to_string()).into_token_stream(),
            },
            Some([value]) => {
                if syn::parse2::<syn::LitStr>(value.tokens.clone()).is_err() {
                    return Err(syn::Error::new_spanned(
                        &value.tokens,
                        format!("Invalid - {ATTRIBUTE} `name` must be a string literal."),
                    ));
                }

                value.clone()
            }
            Some(_) => {
                return Err(syn::Error::new(
                    variant_name.span(),
                    format!("Invalid - {ATTRIBUTE} `name` may only be given once per variant."),
                ));
            }
        };

        Ok(DeriveVariant {
            variant_name,
            name,
            explicit_discriminant: value.discriminant.is_some(),
        })
    }
}

/// The value of an integer literal discriminant; other expressions are left to the compiler.
fn literal_discriminant(variant: &syn::Variant) -> Result<Option<u64>, syn::Error> {
    match &variant.discriminant {
        Some((
            _,
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Int(literal),
                ..
            }),
        )) => literal.base10_parse::<u64>().map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;

    #[test]
    fn construct_derive_enum_empty() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(CliEnum)]
                enum Values { }
            "#,
        )
        .unwrap();

        // Execute
        let derive_enum = DeriveEnum::try_from(input).unwrap();

        // Verify
        assert_eq!(
            derive_enum,
            DeriveEnum {
                enum_name: ident("Values"),
                flags: false,
                variants: vec![],
            }
        );
    }

    #[test]
    fn construct_derive_enum() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(CliEnum)]
                #[optlex(flags)]
                enum Permissions {
                    Read = 1,
                    #[optlex(name = "rw")]
                    Write = 4,
                }
            "#,
        )
        .unwrap();

        // Execute
        let derive_enum = DeriveEnum::try_from(input).unwrap();

        // Verify
        assert_eq!(
            derive_enum,
            DeriveEnum {
                enum_name: ident("Permissions"),
                flags: true,
                variants: vec![
                    DeriveVariant {
                        variant_name: ident("Read"),
                        name: DeriveValue {
                            tokens: Literal::string("Read").into_token_stream(),
                        },
                        explicit_discriminant: true,
                    },
                    DeriveVariant {
                        variant_name: ident("Write"),
                        name: DeriveValue {
                            tokens: Literal::string("rw").into_token_stream(),
                        },
                        explicit_discriminant: true,
                    },
                ],
            }
        );
    }

    #[test]
    fn construct_derive_enum_struct() {
        // Setup
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(CliEnum)]
                struct Values { }
            "#,
        )
        .unwrap();

        // Execute
        let error = DeriveEnum::try_from(input).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - CliEnum only applies to 'enum' data structures."
        );
    }

    #[test]
    fn construct_derive_enum_fields() {
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[derive(CliEnum)]
                enum Values {
                    Plain,
                    Carrying(u32),
                }
            "#,
        )
        .unwrap();
        let error = DeriveEnum::try_from(input).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid - CliEnum variants cannot carry fields."
        );
    }

    #[test]
    fn construct_derive_enum_flags_mixed() {
        assert_eq!(
            load_error(
                r#"
                    #[optlex(flags)]
                    enum Mode { Read, Write = 1 }
                "#
            ),
            "Invalid - CliEnum flags cannot mix implicit and explicit discriminants."
        );
        assert_eq!(
            load_error(
                r#"
                    #[optlex(flags)]
                    enum Mode { Nothing = 0, Read, Write }
                "#
            ),
            "Invalid - CliEnum flags cannot mix implicit and explicit discriminants."
        );
    }

    #[test]
    fn construct_derive_enum_duplicate_discriminant() {
        assert_eq!(
            load_error(
                r#"
                    enum Mode { Read = 1, Write = 0x1 }
                "#
            ),
            "Invalid - CliEnum variants 'Read' and 'Write' share the discriminant 1."
        );
    }

    #[test]
    fn construct_derive_variant_repeated_name() {
        assert_eq!(
            load_error(
                r#"
                    enum Mode {
                        #[optlex(name = "r")]
                        #[optlex(name = "read")]
                        Read,
                    }
                "#
            ),
            "Invalid - optlex `name` may only be given once per variant."
        );
    }

    #[test]
    fn construct_derive_variant_name_not_string() {
        assert_eq!(
            load_error(
                r#"
                    enum Mode {
                        #[optlex(name = read)]
                        Read,
                    }
                "#
            ),
            "Invalid - optlex `name` must be a string literal."
        );
    }

    #[test]
    fn construct_derive_enum_flags_explicit() {
        let input: syn::DeriveInput = syn::parse_str(
            r#"
                #[optlex(flags)]
                enum Mode { Nothing = 0, Read = 1, Write = 2 }
            "#,
        )
        .unwrap();

        let derive_enum = DeriveEnum::try_from(input).unwrap();

        assert!(derive_enum.flags);
        assert!(derive_enum
            .variants
            .iter()
            .all(|variant| variant.explicit_discriminant));
    }

    fn load_error(source: &str) -> String {
        let input: syn::DeriveInput = syn::parse_str(source).unwrap();
        DeriveEnum::try_from(input).unwrap_err().to_string()
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
