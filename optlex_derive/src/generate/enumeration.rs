use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;

use crate::model::{DeriveEnum, DeriveVariant};

impl TryFrom<DeriveEnum> for TokenStream2 {
    type Error = syn::Error;

    fn try_from(value: DeriveEnum) -> Result<Self, Self::Error> {
        let DeriveEnum {
            enum_name,
            flags,
            variants,
        } = value;
        let descriptor_name = Literal::string(&enum_name.to_string());
        let count = variants.len();
        let bits = variants
            .iter()
            .enumerate()
            .map(|(index, variant)| member_bits(flags, index, variant))
            .collect::<Vec<_>>();
        let names = variants
            .iter()
            .map(|variant| variant.name.tokens.clone())
            .collect::<Vec<_>>();
        let variant_names = variants
            .iter()
            .map(|variant| variant.variant_name.clone())
            .collect::<Vec<_>>();

        Ok(quote! {
            impl ::optlex::prelude::CliEnum for #enum_name {
                fn descriptor() -> ::optlex::EnumDescriptor {
                    let members: [(&str, u64); #count] = [ #( (#names, #bits) ),* ];
                    ::optlex::EnumDescriptor::new(#descriptor_name, #flags, members)
                }

                fn from_bits(bits: u64) -> ::std::option::Option<Self> {
                    #(
                        if bits == #bits {
                            return ::std::option::Option::Some(Self::#variant_names);
                        }
                    )*
                    ::std::option::Option::None
                }
            }
        })
    }
}

// Implicit flag members take successive powers of two.
fn member_bits(flags: bool, index: usize, variant: &DeriveVariant) -> TokenStream2 {
    let variant_name = &variant.variant_name;

    if flags && !variant.explicit_discriminant {
        let shift = Literal::usize_unsuffixed(index);
        quote! { (1u64 << #shift) }
    } else {
        quote! { (Self::#variant_name as u64) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeriveValue;
    use proc_macro2::Span;
    use quote::ToTokens;

    #[test]
    fn render_derive_enum_empty() {
        // Setup
        let derive_enum = DeriveEnum {
            enum_name: ident("Values"),
            flags: false,
            variants: vec![],
        };

        // Execute
        let token_stream = TokenStream2::try_from(derive_enum).unwrap();

        // Verify
        let expected = quote! {
            impl ::optlex::prelude::CliEnum for Values {
                fn descriptor() -> ::optlex::EnumDescriptor {
                    let members: [(&str, u64); 0usize] = [];
                    ::optlex::EnumDescriptor::new("Values", false, members)
                }

                fn from_bits(bits: u64) -> ::std::option::Option<Self> {
                    ::std::option::Option::None
                }
            }
        };
        assert_eq!(token_stream.to_string(), expected.to_string());
    }

    #[test]
    fn render_derive_enum() {
        // Setup
        let derive_enum = DeriveEnum {
            enum_name: ident("Colour"),
            flags: false,
            variants: vec![variant("Red", "red", false), variant("Blue", "Blue", true)],
        };

        // Execute
        let token_stream = TokenStream2::try_from(derive_enum).unwrap();

        // Verify
        let expected = quote! {
            impl ::optlex::prelude::CliEnum for Colour {
                fn descriptor() -> ::optlex::EnumDescriptor {
                    let members: [(&str, u64); 2usize] = [
                        ("red", (Self::Red as u64)),
                        ("Blue", (Self::Blue as u64))
                    ];
                    ::optlex::EnumDescriptor::new("Colour", false, members)
                }

                fn from_bits(bits: u64) -> ::std::option::Option<Self> {
                    if bits == (Self::Red as u64) {
                        return ::std::option::Option::Some(Self::Red);
                    }
                    if bits == (Self::Blue as u64) {
                        return ::std::option::Option::Some(Self::Blue);
                    }
                    ::std::option::Option::None
                }
            }
        };
        assert_eq!(token_stream.to_string(), expected.to_string());
    }

    #[test]
    fn render_derive_enum_flags() {
        // Setup
        let derive_enum = DeriveEnum {
            enum_name: ident("Permissions"),
            flags: true,
            variants: vec![
                variant("Read", "Read", false),
                variant("Write", "Write", false),
                variant("Execute", "exec", false),
            ],
        };

        // Execute
        let token_stream = TokenStream2::try_from(derive_enum).unwrap();

        // Verify
        let expected = quote! {
            let members: [(&str, u64); 3usize] = [
                ("Read", (1u64 << 0)),
                ("Write", (1u64 << 1)),
                ("exec", (1u64 << 2))
            ];
            ::optlex::EnumDescriptor::new("Permissions", true, members)
        };
        assert!(token_stream.to_string().contains(&expected.to_string()));
    }

    fn variant(variant_name: &str, name: &str, explicit_discriminant: bool) -> DeriveVariant {
        DeriveVariant {
            variant_name: ident(variant_name),
            name: DeriveValue {
                tokens: Literal::string(name).into_token_stream(),
            },
            explicit_discriminant,
        }
    }

    fn ident(name: &str) -> syn::Ident {
        syn::Ident::new(name, Span::call_site())
    }
}
