//! Type utilities for the derive macro.

/// Checks if a type is a bare primitive the walker never transforms.
///
/// Only unqualified, non-generic names like `i32` or `bool` match. Anything
/// else may hold strings and is left to the trait system.
pub(crate) fn is_scalar_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };
    if path.qself.is_some() || path.path.leading_colon.is_some() || path.path.segments.len() != 1
    {
        return false;
    }
    let Some(segment) = path.path.segments.first() else {
        return false;
    };
    segment.arguments.is_empty()
        && matches!(
            segment.ident.to_string().as_str(),
            "i8" | "i16"
                | "i32"
                | "i64"
                | "i128"
                | "isize"
                | "u8"
                | "u16"
                | "u32"
                | "u64"
                | "u128"
                | "usize"
                | "f32"
                | "f64"
                | "bool"
                | "char"
        )
}
