//! Container-level attribute parsing for `#[derive(Sensitive)]`.
//!
//! This module handles attributes on the struct/enum itself, not on fields.

use syn::{Attribute, Meta, Result};

/// Options parsed from container-level `#[redact(...)]` attributes.
#[derive(Clone, Debug, Default)]
#[allow(clippy::struct_field_names)]
pub(crate) struct ContainerOptions {
    /// The single field inherits the caller's tag instead of selecting one.
    pub(crate) transparent: bool,
    /// Generate a `slog::Value` impl that logs the redacted copy.
    pub(crate) slog: bool,
}

/// Parses container-level `#[redact(...)]` attributes.
pub(crate) fn parse_container_options(attrs: &[Attribute]) -> Result<ContainerOptions> {
    let mut options = ContainerOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("redact") {
            continue;
        }

        match &attr.meta {
            Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("transparent") {
                        options.transparent = true;
                        Ok(())
                    } else if meta.path.is_ident("slog") {
                        options.slog = true;
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown container option `{}`; expected `transparent` or `slog`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
            }
            Meta::Path(path) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "expected #[redact(transparent)] or #[redact(slog)] on the container",
                ));
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "name-value syntax is not supported for container-level #[redact]",
                ));
            }
        }
    }

    Ok(options)
}
