use crate::model::{DeriveValue, IntermediateAttributes};
use crate::ATTRIBUTE;
use quote::ToTokens;
use std::collections::{HashMap, HashSet};

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let expressions = value.parse_args_with(attributes_parser)?;
        let mut singletons = HashSet::default();
        let mut pairs: HashMap<String, Vec<DeriveValue>> = HashMap::default();

        for expression in expressions {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let left = assignment.left.to_token_stream();
                    pairs
                        .entry(left.to_string())
                        .or_default()
                        .push(DeriveValue {
                            tokens: assignment.right.to_token_stream(),
                        });
                }
                syn::Expr::Path(path) if path.path.get_ident().is_some() => {
                    if let Some(ident) = path.path.get_ident() {
                        singletons.insert(ident.to_string());
                    }
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        expression,
                        format!("Invalid - unparseable `{ATTRIBUTE}` attribute."),
                    ));
                }
            };
        }

        Ok(Self { singletons, pairs })
    }
}

impl IntermediateAttributes {
    /// Merge every `#[optlex(..)]` attribute in `attributes`.
    pub(crate) fn collect(attributes: &[syn::Attribute]) -> Result<Self, syn::Error> {
        let mut merged = Self::default();

        for attribute in attributes.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
            let Self { singletons, pairs } = Self::try_from(attribute)?;
            merged.singletons.extend(singletons);

            for (key, values) in pairs {
                merged.pairs.entry(key).or_default().extend(values);
            }
        }

        Ok(merged)
    }
}
