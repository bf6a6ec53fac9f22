//! Match-arm assembly for the generated walker methods.
//!
//! Structs produce a single arm (`Self { .. }`), enums one arm per variant.
//! Every generated method is a `match self` over these arms.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Fields, Result};

use crate::{
    strategy::{parse_field_strategy, Strategy},
    transform::{generate_field_tokens, DeriveContext, FieldTokens, TagSource},
};

enum Style {
    Named(Vec<Ident>),
    Unnamed,
    Unit,
}

pub(crate) struct Arm {
    path: TokenStream,
    style: Style,
    bindings: Vec<Ident>,
    fields: Vec<FieldTokens>,
}

impl Arm {
    /// Builds the arm for `path` (`Self` or `Self::Variant`).
    ///
    /// `label_prefix` is prepended to alias-validator path segments, e.g. the
    /// variant name for enums. With `transparent`, the single field inherits
    /// the caller's tag and must not carry its own annotation.
    pub(crate) fn new(
        ctx: &mut DeriveContext<'_>,
        path: TokenStream,
        fields: Fields,
        label_prefix: Option<&Ident>,
        transparent: bool,
    ) -> Result<Self> {
        let mut bindings = Vec::new();
        let mut tokens = Vec::new();
        let mut names = Vec::new();
        let named = matches!(fields, Fields::Named(_));
        let unit = matches!(fields, Fields::Unit);

        for (position, field) in fields.into_iter().enumerate() {
            let span = field.span();
            let strategy = parse_field_strategy(&field.attrs)?;
            let (binding, member) = match &field.ident {
                Some(ident) => (ident.clone(), ident.to_string()),
                None => (format_ident!("field_{position}"), position.to_string()),
            };
            let label = match label_prefix {
                Some(prefix) => format!("{prefix}.{member}"),
                None => member,
            };

            let default_strategy = Strategy::Secret;
            let source = if transparent {
                if strategy.is_some() {
                    return Err(syn::Error::new(
                        span,
                        "the field of a #[redact(transparent)] container inherits the caller's tag and cannot be annotated",
                    ));
                }
                TagSource::Inherited
            } else {
                TagSource::Field(strategy.as_ref().unwrap_or(&default_strategy))
            };

            tokens.push(generate_field_tokens(
                ctx, &field.ty, &binding, &label, span, &source,
            )?);
            if let Some(ident) = field.ident {
                names.push(ident);
            }
            bindings.push(binding);
        }

        let style = if named {
            Style::Named(names)
        } else if unit {
            Style::Unit
        } else {
            Style::Unnamed
        };

        Ok(Self {
            path,
            style,
            bindings,
            fields: tokens,
        })
    }

    fn pattern(&self) -> TokenStream {
        let path = &self.path;
        let bindings = &self.bindings;
        match &self.style {
            Style::Named(_) => quote! { #path { #(#bindings),* } },
            Style::Unnamed => quote! { #path ( #(#bindings),* ) },
            Style::Unit => quote! { #path },
        }
    }

    fn construct(&self) -> TokenStream {
        let path = &self.path;
        let copies = self.fields.iter().map(|field| &field.copy);
        match &self.style {
            Style::Named(names) => quote! { #path { #(#names: #copies),* } },
            Style::Unnamed => quote! { #path ( #(#copies),* ) },
            Style::Unit => quote! { #path },
        }
    }
}

/// Bodies of the four `SensitiveType` methods.
pub(crate) struct MethodBodies {
    pub(crate) redact: TokenStream,
    pub(crate) copy: TokenStream,
    pub(crate) check: TokenStream,
    pub(crate) record: TokenStream,
}

pub(crate) fn render_methods(arms: &[Arm]) -> MethodBodies {
    if arms.is_empty() {
        // Uninhabited enum: there is no value to walk.
        let never = quote! { match *self {} };
        return MethodBodies {
            redact: never.clone(),
            copy: never.clone(),
            check: never.clone(),
            record: never,
        };
    }

    let patterns: Vec<TokenStream> = arms.iter().map(Arm::pattern).collect();
    let constructs = arms.iter().map(Arm::construct);
    let redacts = arms.iter().map(|arm| {
        let statements = arm.fields.iter().map(|field| &field.redact);
        quote! { #(#statements)* }
    });
    let checks = arms.iter().map(|arm| {
        let statements = arm.fields.iter().map(|field| &field.check);
        quote! { #(#statements)* }
    });
    let records = arms.iter().map(|arm| {
        let statements = arm.fields.iter().map(|field| &field.record);
        quote! { #(#statements)* }
    });

    MethodBodies {
        redact: quote! {
            match self {
                #(#patterns => { #redacts })*
            }
        },
        copy: quote! {
            match self {
                #(#patterns => #constructs,)*
            }
        },
        check: quote! {
            match self {
                #(#patterns => { #checks })*
            }
            ::core::result::Result::Ok(())
        },
        record: quote! {
            match self {
                #(#patterns => { #records })*
            }
        },
    }
}
