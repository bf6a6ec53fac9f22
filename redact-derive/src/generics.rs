//! Generic type parameter handling and trait bound management.
//!
//! Walked fields put a `SensitiveType` bound on every type parameter they
//! mention. Opaque fields are only cloned, so their whole type gets a `Clone`
//! bound instead.
//!
//! `PhantomData<T>` mentions are skipped: a marker parameter should not have
//! to be walkable for the container to be.

use syn::{parse_quote, Ident};

use crate::crate_path;

pub(crate) fn collect_generics_from_type(
    ty: &syn::Type,
    generics: &syn::Generics,
    result: &mut Vec<Ident>,
) {
    match ty {
        syn::Type::Path(path) => {
            if let Some(qself) = &path.qself {
                collect_generics_from_type(&qself.ty, generics, result);
            }
            if let Some(first) = path.path.segments.first() {
                if path.path.leading_colon.is_none() {
                    push_if_param(&first.ident, generics, result);
                }
            }
            for segment in &path.path.segments {
                if segment.ident == "PhantomData" {
                    return;
                }
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner) = arg {
                            collect_generics_from_type(inner, generics, result);
                        }
                    }
                }
            }
        }
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Slice(slice) => collect_generics_from_type(&slice.elem, generics, result),
        syn::Type::Reference(reference) => {
            collect_generics_from_type(&reference.elem, generics, result);
        }
        syn::Type::Ptr(ptr) => collect_generics_from_type(&ptr.elem, generics, result),
        syn::Type::Paren(paren) => collect_generics_from_type(&paren.elem, generics, result),
        syn::Type::Group(group) => collect_generics_from_type(&group.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_generics_from_type(elem, generics, result);
            }
        }
        _ => {}
    }
}

fn push_if_param(ident: &Ident, generics: &syn::Generics, result: &mut Vec<Ident>) {
    for param in generics.type_params() {
        if *ident == param.ident && !result.iter().any(|g| g == &param.ident) {
            result.push(param.ident.clone());
        }
    }
}

pub(crate) fn mentions_generics(ty: &syn::Type, generics: &syn::Generics) -> bool {
    let mut found = Vec::new();
    collect_generics_from_type(ty, generics, &mut found);
    !found.is_empty()
}

/// Adds `SensitiveType` bounds to generic parameters used in walked fields.
pub(crate) fn add_walk_bounds(mut generics: syn::Generics, walked: &[Ident]) -> syn::Generics {
    let sensitive_type = crate_path("SensitiveType");
    for param in generics.type_params_mut() {
        if walked.iter().any(|g| g == &param.ident) {
            param.bounds.push(parse_quote!(#sensitive_type));
        }
    }
    generics
}

/// Adds `Clone` bounds for generic opaque field types.
pub(crate) fn add_opaque_bounds(mut generics: syn::Generics, opaque: &[syn::Type]) -> syn::Generics {
    if opaque.is_empty() {
        return generics;
    }
    let where_clause = generics.make_where_clause();
    for ty in opaque {
        where_clause
            .predicates
            .push(parse_quote!(#ty: ::core::clone::Clone));
    }
    generics
}
