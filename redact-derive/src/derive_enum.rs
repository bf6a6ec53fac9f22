//! Enum-specific `SensitiveType` derivation.
//!
//! Each variant becomes one match arm. Variant fields select their tags exactly
//! like struct fields do; alias-validator paths are prefixed with the variant
//! name.

use quote::quote;
use syn::{DataEnum, Result};

use crate::{
    arm::{render_methods, Arm, MethodBodies},
    transform::DeriveContext,
};

pub(crate) fn derive_enum(ctx: &mut DeriveContext<'_>, data: DataEnum) -> Result<MethodBodies> {
    let mut arms = Vec::new();
    for variant in data.variants {
        let ident = variant.ident;
        arms.push(Arm::new(
            ctx,
            quote! { Self::#ident },
            variant.fields,
            Some(&ident),
            false,
        )?);
    }
    Ok(render_methods(&arms))
}
