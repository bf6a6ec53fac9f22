//! Derive macros for `redact`.
//!
//! This crate generates the struct and enum part of the redaction walker
//! behind `#[derive(Sensitive)]`. It:
//! - reads `#[redact(...)]` field and container attributes
//! - emits a `SensitiveType` implementation covering both operation modes,
//!   the writability pre-flight and the alias-validator walk
//!
//! It does **not** define tags or transforms. Those live in the `redact` crate
//! and are resolved at runtime through its registry.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

#[cfg(feature = "slog")]
use proc_macro2::Span;
use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
#[cfg(feature = "slog")]
use syn::parse_quote;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod arm;
mod container;
mod derive_enum;
mod derive_struct;
mod generics;
mod strategy;
mod transform;
mod types;
use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use generics::{add_opaque_bounds, add_walk_bounds};
use transform::DeriveContext;

/// Derives `redact::SensitiveType` for structs and enums.
///
/// # Field Attributes
///
/// - **No annotation**: strings reached through the field are secret and get the
///   default transform, however deeply they are nested.
/// - `#[redact(nonsecret)]`: strings reached through the field are kept.
/// - `#[redact(tag = "name")]`: strings reached through the field go through the
///   transform registered as `name`. Not allowed on bare scalar fields.
/// - `#[redact(secret)]`: the default, spelled out.
/// - `#[redact(opaque)]`: the field is never walked. Copy mode clones it
///   (`Clone` required), mutate mode leaves it alone. Pointers inside it stay
///   shared between a value and its redacted copy.
///
/// Nested types that derive `Sensitive` select tags for their own fields; the
/// tag of the enclosing field only covers containers and leaves in between.
///
/// # Container Attributes
///
/// - `#[redact(transparent)]`: for single-field newtypes. The field inherits
///   the tag the newtype is reached with, so `struct Name(String)` behaves
///   like a string leaf.
/// - `#[redact(slog)]`: also implement `slog::Value`, logging the redacted copy
///   as JSON. Requires the `slog` feature and `Self: serde::Serialize`. The
///   derive looks for a top-level `slog` crate, then for a path in the
///   `REDACT_SLOG_CRATE` env var (e.g. `my_log::slog`).
///
/// Unions are rejected at compile time.
#[proc_macro_derive(Sensitive, attributes(redact))]
pub fn derive_sensitive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the redact crate root.
///
/// Handles crate renaming (e.g., `my_redact = { package = "redact", ... }`).
/// Inside `redact` itself, `::redact` resolves through `extern crate self as redact`,
/// which also keeps doctests working.
fn crate_root() -> TokenStream {
    match crate_name("redact") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::redact },
    }
}

fn crate_path(item: &str) -> TokenStream {
    let root = crate_root();
    let item_ident = format_ident!("{}", item);
    quote! { #root::#item_ident }
}

/// Returns the token stream to reference the slog crate root.
///
/// If the top-level `slog` crate is not available, falls back to the
/// `REDACT_SLOG_CRATE` env var, which should be a path like `my_log::slog`.
#[cfg(feature = "slog")]
fn slog_crate() -> Result<TokenStream> {
    match crate_name("slog") {
        Ok(FoundCrate::Itself) => Ok(quote! { crate }),
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            Ok(quote! { ::#ident })
        }
        Err(_) => {
            let env_value = std::env::var("REDACT_SLOG_CRATE").map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    "#[redact(slog)] needs a `slog` dependency: add `slog` or set \
REDACT_SLOG_CRATE to a path such as `my_log::slog`",
                )
            })?;
            let path = syn::parse_str::<syn::Path>(&env_value).map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    format!("REDACT_SLOG_CRATE must be a valid Rust path (got `{env_value}`)"),
                )
            })?;
            Ok(quote! { #path })
        }
    }
}

#[cfg(feature = "slog")]
fn slog_impl(ident: &syn::Ident, generics: &syn::Generics) -> Result<TokenStream> {
    let slog_crate = slog_crate()?;
    let root = crate_root();
    let (_, ty_generics, _) = generics.split_for_impl();
    let self_ty: syn::Type = parse_quote!(#ident #ty_generics);
    let mut slog_generics = generics.clone();
    slog_generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#self_ty: ::serde::Serialize));
    let (impl_generics, ty_generics, where_clause) = slog_generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #slog_crate::Value for #ident #ty_generics #where_clause {
            fn serialize(
                &self,
                record: &#slog_crate::Record<'_>,
                key: #slog_crate::Key,
                serializer: &mut dyn #slog_crate::Serializer,
            ) -> #slog_crate::Result {
                let redacted = #root::slog::ToRedactedJson::to_redacted_json(self);
                #slog_crate::Value::serialize(&redacted, record, key, serializer)
            }
        }
    })
}

#[cfg(not(feature = "slog"))]
fn slog_impl(ident: &syn::Ident, _generics: &syn::Generics) -> Result<TokenStream> {
    Err(syn::Error::new(
        ident.span(),
        "#[redact(slog)] requires the `slog` feature of `redact`",
    ))
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { transparent, slog } = parse_container_options(&attrs)?;

    let mut walked_generics = Vec::new();
    let mut opaque_types = Vec::new();
    let mut ctx = DeriveContext {
        generics: &generics,
        walked_generics: &mut walked_generics,
        opaque_types: &mut opaque_types,
    };

    let bodies = match data {
        Data::Struct(data) => derive_struct(&mut ctx, data, transparent)?,
        Data::Enum(data) => {
            if transparent {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "#[redact(transparent)] is only supported on structs",
                ));
            }
            derive_enum(&mut ctx, data)?
        }
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`Sensitive` cannot be derived for unions",
            ));
        }
    };

    let root = crate_root();
    let walk_generics = add_walk_bounds(generics.clone(), &walked_generics);
    let walk_generics = add_opaque_bounds(walk_generics, &opaque_types);
    let (impl_generics, ty_generics, where_clause) = walk_generics.split_for_impl();

    let redact_body = &bodies.redact;
    let copy_body = &bodies.copy;
    let check_body = &bodies.check;
    let record_body = &bodies.record;

    let slog_impl = if slog {
        slog_impl(&ident, &walk_generics)?
    } else {
        quote! {}
    };

    Ok(quote! {
        #[allow(unused_variables, unreachable_code, clippy::used_underscore_binding)]
        impl #impl_generics #root::SensitiveType for #ident #ty_generics #where_clause {
            fn redact_in_place(&mut self, __tag: &str, __registry: &#root::Registry) {
                #redact_body
            }

            fn redacted_copy(&self, __tag: &str, __registry: &#root::Registry) -> Self {
                #copy_body
            }

            fn check_writable(&self) -> ::core::result::Result<(), #root::RedactError> {
                #check_body
            }

            fn record_addresses(&self, __path: &str, __index: &mut #root::AddressIndex) {
                #record_body
            }
        }

        #slog_impl
    })
}
