//! Application layer: the two operation modes.

use crate::{
    error::RedactError,
    registry::{self, Registry, NONSECRET},
    SensitiveType,
};

/// Redacts `value` in place using the process-wide registry.
///
/// The root is walked with the `nonsecret` tag: strings are redacted because a
/// struct field selects a tag for them, not because they are reachable. Every
/// location is checked for writability before the first write, so on error
/// the value is left exactly as it was.
pub fn redact<T: SensitiveType>(value: &mut T) -> Result<(), RedactError> {
    let registry = registry::global();
    redact_with(value, &registry)
}

/// Redacts `value` in place using an explicit registry.
pub fn redact_with<T: SensitiveType>(value: &mut T, registry: &Registry) -> Result<(), RedactError> {
    if let Err(err) = value.check_writable() {
        tracing::debug!(error = %err, "refusing in-place redaction");
        return Err(err);
    }
    value.redact_in_place(NONSECRET, registry);
    Ok(())
}

/// Returns a redacted copy of `value` using the process-wide registry.
///
/// `value` is not modified and the copy shares no walked storage with it.
/// Fields marked `#[redact(opaque)]` are cloned, not walked, so any
/// `Rc`/`Arc` they hold stays shared between the two values.
#[must_use]
pub fn as_copy<T: SensitiveType>(value: &T) -> T {
    let registry = registry::global();
    as_copy_with(value, &registry)
}

/// Returns a redacted copy of `value` using an explicit registry.
#[must_use]
pub fn as_copy_with<T: SensitiveType>(value: &T, registry: &Registry) -> T {
    value.redacted_copy(NONSECRET, registry)
}

/// Method-style access to [`redact`] and [`as_copy`].
///
/// Blanket-implemented for every [`SensitiveType`].
pub trait Redactable: SensitiveType {
    /// Redacts `self` in place. See [`redact`].
    fn redact(&mut self) -> Result<(), RedactError> {
        redact(self)
    }

    /// Returns a redacted copy of `self`. See [`as_copy`].
    #[must_use]
    fn as_copy(&self) -> Self {
        as_copy(self)
    }
}

impl<T> Redactable for T where T: SensitiveType {}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{as_copy_with, redact_with};
    use crate::{
        registry::{Registry, REDACTED_PLACEHOLDER},
        RedactError,
    };

    #[test]
    fn bare_root_strings_are_not_redacted() {
        let registry = Registry::new();
        let mut value = "top-level".to_string();
        redact_with(&mut value, &registry).unwrap();
        assert_eq!(value, "top-level");
        assert_eq!(as_copy_with(&vec![value.clone()], &registry), vec![value]);
    }

    #[test]
    fn failed_check_leaves_value_untouched() {
        let registry = Registry::new();
        let shared = Rc::new("secret".to_string());
        let mut root = (Some(Rc::clone(&shared)), 1_u8);
        let err = redact_with(&mut root, &registry).unwrap_err();
        assert!(matches!(err, RedactError::Unsettable { .. }));
        assert_eq!(*shared, "secret");
        assert_ne!(*shared, REDACTED_PLACEHOLDER);
    }
}
