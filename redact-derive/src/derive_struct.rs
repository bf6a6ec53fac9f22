//! Struct-specific `SensitiveType` derivation.

use quote::quote;
use syn::{spanned::Spanned, DataStruct, Result};

use crate::{
    arm::{render_methods, Arm, MethodBodies},
    transform::DeriveContext,
};

pub(crate) fn derive_struct(
    ctx: &mut DeriveContext<'_>,
    data: DataStruct,
    transparent: bool,
) -> Result<MethodBodies> {
    if transparent && data.fields.len() != 1 {
        return Err(syn::Error::new(
            data.struct_token.span(),
            "#[redact(transparent)] requires a struct with exactly one field",
        ));
    }
    let arm = Arm::new(ctx, quote! { Self }, data.fields, None, transparent)?;
    Ok(render_methods(&[arm]))
}
