//! Dynamically typed nodes.
//!
//! `Box<dyn DynSensitive>` holds a value whose concrete type is only known at
//! runtime. The walker unwraps it, walks the concrete value with the inherited
//! tag and, in copy mode, boxes the result again.

use std::{any::Any, fmt};

use crate::{alias::AddressIndex, error::RedactError, registry::Registry, SensitiveType};

/// Object-safe view of [`SensitiveType`].
///
/// Implemented for every `'static` [`SensitiveType`] that is also `Debug`, so
/// any derived type can be boxed as `Box<dyn DynSensitive>`.
pub trait DynSensitive: Any + fmt::Debug {
    fn redact_dyn(&mut self, tag: &str, registry: &Registry);

    fn redacted_dyn(&self, tag: &str, registry: &Registry) -> Box<dyn DynSensitive>;

    fn check_writable_dyn(&self) -> Result<(), RedactError>;

    fn record_addresses_dyn(&self, path: &str, index: &mut AddressIndex);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> DynSensitive for T
where
    T: SensitiveType + fmt::Debug + 'static,
{
    fn redact_dyn(&mut self, tag: &str, registry: &Registry) {
        self.redact_in_place(tag, registry);
    }

    fn redacted_dyn(&self, tag: &str, registry: &Registry) -> Box<dyn DynSensitive> {
        Box::new(self.redacted_copy(tag, registry))
    }

    fn check_writable_dyn(&self) -> Result<(), RedactError> {
        self.check_writable()
    }

    fn record_addresses_dyn(&self, path: &str, index: &mut AddressIndex) {
        self.record_addresses(path, index);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn DynSensitive {
    /// Returns `true` if the boxed value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrows the boxed value as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably borrows the boxed value as a `T`, if it is one.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

// The box itself is also `DynSensitive` through the blanket impl, so every call
// below dereferences to the trait object first.
impl SensitiveType for Box<dyn DynSensitive> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        (**self).redact_dyn(tag, registry);
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        (**self).redacted_dyn(tag, registry)
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        (**self).check_writable_dyn()
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        (**self).record_addresses_dyn(path, index);
    }
}
