//! Per-field code generation shared by struct and enum derivation.

use proc_macro2::{Ident, Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::Result;

use crate::{
    crate_root,
    generics::{collect_generics_from_type, mentions_generics},
    strategy::Strategy,
    types::is_scalar_type,
};

/// Accumulated bound requirements while processing fields.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    /// Type parameters that must implement `SensitiveType`.
    pub(crate) walked_generics: &'a mut Vec<Ident>,
    /// Generic opaque field types that must implement `Clone`.
    pub(crate) opaque_types: &'a mut Vec<syn::Type>,
}

/// Where a field's tag comes from.
pub(crate) enum TagSource<'a> {
    /// The field's own annotation (or the default secret tag).
    Field(&'a Strategy),
    /// The tag the container itself was walked with (`#[redact(transparent)]`).
    Inherited,
}

/// Generated statements/expressions for one field, one per walker method.
pub(crate) struct FieldTokens {
    pub(crate) redact: TokenStream,
    pub(crate) copy: TokenStream,
    pub(crate) check: TokenStream,
    pub(crate) record: TokenStream,
}

/// Generates the walker code for a single bound field.
///
/// `binding` is a reference to the field inside a match arm; `label` is the
/// path segment used by the alias validator.
pub(crate) fn generate_field_tokens(
    ctx: &mut DeriveContext<'_>,
    ty: &syn::Type,
    binding: &Ident,
    label: &str,
    span: Span,
    source: &TagSource<'_>,
) -> Result<FieldTokens> {
    let root = crate_root();

    let tag = match source {
        TagSource::Inherited => quote! { __tag },
        TagSource::Field(Strategy::Opaque) => {
            if mentions_generics(ty, ctx.generics) {
                ctx.opaque_types.push(ty.clone());
            }
            return Ok(FieldTokens {
                redact: quote! {},
                copy: quote_spanned! { span => ::core::clone::Clone::clone(#binding) },
                check: quote! {},
                record: quote! {},
            });
        }
        TagSource::Field(Strategy::Tag(name)) if is_scalar_type(ty) => {
            return Err(syn::Error::new(
                name.span(),
                "scalar fields are never transformed: remove `tag = \"...\"` from this field",
            ));
        }
        TagSource::Field(Strategy::Secret) => quote! { #root::SECRET },
        TagSource::Field(Strategy::NonSecret) => quote! { #root::NONSECRET },
        TagSource::Field(Strategy::Tag(name)) => quote! { #name },
    };

    collect_generics_from_type(ty, ctx.generics, ctx.walked_generics);

    Ok(FieldTokens {
        redact: quote_spanned! { span =>
            #root::SensitiveType::redact_in_place(#binding, #tag, __registry);
        },
        copy: quote_spanned! { span =>
            #root::SensitiveType::redacted_copy(#binding, #tag, __registry)
        },
        check: quote_spanned! { span =>
            #root::SensitiveType::check_writable(#binding)?;
        },
        record: quote_spanned! { span =>
            #root::SensitiveType::record_addresses(
                #binding,
                &::std::format!("{}.{}", __path, #label),
                __index,
            );
        },
    })
}
