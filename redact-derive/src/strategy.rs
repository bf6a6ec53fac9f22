//! Parsing of `#[redact(...)]` field attributes.
//!
//! This module maps attribute syntax to the tag a field selects and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, LitStr, Meta, Result};

/// What the walker does with a field, based on its `#[redact(...)]` attribute.
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `Secret` | Walk with the default secret tag |
/// | `#[redact(secret)]` | `Secret` | Same, spelled out |
/// | `#[redact(nonsecret)]` | `NonSecret` | Walk with the no-op tag |
/// | `#[redact(tag = "name")]` | `Tag(name)` | Walk with a registered tag |
/// | `#[redact(opaque)]` | `Opaque` | Clone in copy mode, never walk |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    Secret,
    NonSecret,
    Tag(LitStr),
    /// Not walked: cloned shallowly by copy mode and left alone by mutate mode.
    Opaque,
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "conflicting #[redact] options: choose one of `secret`, `nonsecret`, `tag = \"...\"` or `opaque`",
        ));
    }
    *target = Some(next);
    Ok(())
}

/// Parses the field strategy. Returns `None` when the field has no `#[redact]` attribute.
pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Option<Strategy>> {
    let mut strategy: Option<Strategy> = None;
    let mut seen = false;
    for attr in attrs {
        if !attr.path().is_ident("redact") {
            continue;
        }
        if seen {
            return Err(syn::Error::new(
                attr.span(),
                "multiple #[redact] attributes specified on the same field",
            ));
        }
        seen = true;

        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new(
                attr.span(),
                "expected #[redact(...)] with `secret`, `nonsecret`, `tag = \"...\"` or `opaque`",
            ));
        };

        list.parse_nested_meta(|meta| {
            let span = meta.path.span();
            if meta.path.is_ident("secret") {
                set_strategy(&mut strategy, Strategy::Secret, span)
            } else if meta.path.is_ident("nonsecret") {
                set_strategy(&mut strategy, Strategy::NonSecret, span)
            } else if meta.path.is_ident("opaque") {
                set_strategy(&mut strategy, Strategy::Opaque, span)
            } else if meta.path.is_ident("tag") {
                let name: LitStr = meta.value()?.parse()?;
                let next = if name.value().is_empty() {
                    Strategy::Secret
                } else {
                    Strategy::Tag(name)
                };
                set_strategy(&mut strategy, next, span)
            } else {
                Err(meta.error(format!(
                    "unknown field option `{}`; expected `secret`, `nonsecret`, `tag` or `opaque`",
                    meta.path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string)
                )))
            }
        })?;

        if strategy.is_none() {
            return Err(syn::Error::new(attr.span(), "empty #[redact()] attribute"));
        }
    }

    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    fn error_of(tokens: proc_macro2::TokenStream) -> String {
        parse_field_strategy(&parse_attrs(tokens))
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn no_attribute_returns_none() {
        let attrs = parse_attrs(quote! {});
        assert!(parse_field_strategy(&attrs).unwrap().is_none());
    }

    #[test]
    fn builtin_tags_are_parsed() {
        let attrs = parse_attrs(quote! { #[redact(nonsecret)] });
        assert!(matches!(
            parse_field_strategy(&attrs).unwrap(),
            Some(Strategy::NonSecret)
        ));

        let attrs = parse_attrs(quote! { #[redact(secret)] });
        assert!(matches!(
            parse_field_strategy(&attrs).unwrap(),
            Some(Strategy::Secret)
        ));
    }

    #[test]
    fn named_tag_is_parsed() {
        let attrs = parse_attrs(quote! { #[redact(tag = "lower")] });
        match parse_field_strategy(&attrs).unwrap() {
            Some(Strategy::Tag(name)) => assert_eq!(name.value(), "lower"),
            other => panic!("expected Tag, got {other:?}"),
        }
    }

    #[test]
    fn empty_tag_means_secret() {
        let attrs = parse_attrs(quote! { #[redact(tag = "")] });
        assert!(matches!(
            parse_field_strategy(&attrs).unwrap(),
            Some(Strategy::Secret)
        ));
    }

    #[test]
    fn opaque_is_parsed() {
        let attrs = parse_attrs(quote! { #[redact(opaque)] });
        assert!(matches!(
            parse_field_strategy(&attrs).unwrap(),
            Some(Strategy::Opaque)
        ));
    }

    #[test]
    fn conflicting_options_error() {
        assert!(error_of(quote! { #[redact(nonsecret, opaque)] }).contains("conflicting"));
    }

    #[test]
    fn multiple_attributes_error() {
        assert!(error_of(quote! {
            #[redact(nonsecret)]
            #[redact(opaque)]
        })
        .contains("multiple #[redact] attributes"));
    }

    #[test]
    fn unknown_option_error() {
        assert!(error_of(quote! { #[redact(hidden)] }).contains("unknown field option `hidden`"));
    }

    #[test]
    fn bare_and_name_value_forms_error() {
        assert!(error_of(quote! { #[redact] }).contains("expected #[redact(...)]"));
        assert!(error_of(quote! { #[redact = "x"] }).contains("expected #[redact(...)]"));
    }

    #[test]
    fn non_string_tag_error() {
        let attrs = parse_attrs(quote! { #[redact(tag = 3)] });
        assert!(parse_field_strategy(&attrs).is_err());
    }

    #[test]
    fn other_attributes_ignored() {
        let attrs = parse_attrs(quote! {
            #[serde(skip)]
            #[doc = "field"]
        });
        assert!(parse_field_strategy(&attrs).unwrap().is_none());
    }
}
