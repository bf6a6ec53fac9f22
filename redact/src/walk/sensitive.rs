//! The value-graph walker and its per-kind implementations.
//!
//! [`SensitiveType`] is implemented once for every structural kind the walker
//! understands. Each impl provides both operation modes:
//!
//! | Kind | Types | Tag |
//! |------|-------|-----|
//! | string leaf | `String`, `Cow<str>`, `Box<str>` | transformed with the tag in effect |
//! | array | `[T; N]` | inherited |
//! | sequence | `Vec<T>`, `VecDeque<T>` | inherited |
//! | map | `HashMap<K, V>`, `BTreeMap<K, V>` | inherited by values, keys untouched |
//! | pointer | `Box<T>`, `Rc<T>`, `Arc<T>` | inherited |
//! | nullable | `Option<T>` | inherited |
//! | dynamic | `Box<dyn DynSensitive>` | inherited |
//! | struct / enum | `#[derive(Sensitive)]` | selected per field |
//! | other scalars | numbers, `bool`, `char`, `()` | not a target |
//!
//! Struct fields are the only place a new tag is selected. Every other kind
//! passes the tag it received to its children unchanged.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap, VecDeque},
    fmt::Debug,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
    mem,
    rc::Rc,
    sync::Arc,
};

use crate::{alias::AddressIndex, error::RedactError, registry::Registry};

/// A type the redaction walker can traverse.
///
/// Derive it with `#[derive(Sensitive)]` for your own structs and enums.
/// Hand-written impls must forward `tag` to every child except where they
/// deliberately select a new one, like derived struct fields do.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be walked for redaction",
    label = "this type does not implement `SensitiveType`",
    note = "use `#[derive(Sensitive)]` on the type definition",
    note = "or mark the field `#[redact(opaque)]` to clone it without walking"
)]
pub trait SensitiveType: Sized {
    /// Mutate mode: overwrites reachable string leaves in place.
    ///
    /// Callers must run [`SensitiveType::check_writable`] first; locations that
    /// turn out not to be writable are skipped.
    fn redact_in_place(&mut self, tag: &str, registry: &Registry);

    /// Copy mode: builds a new value of the same shape with transformed leaves.
    ///
    /// The result shares no walked storage with `self`.
    #[must_use]
    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self;

    /// Verifies every walked location can be written in place.
    fn check_writable(&self) -> Result<(), RedactError> {
        Ok(())
    }

    /// Records the storage address of every walked location under `path`.
    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
    }
}

// =============================================================================
// String leaves
// =============================================================================

impl SensitiveType for String {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        *self = registry.apply(tag, self);
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        registry.apply(tag, self)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        if self.capacity() != 0 {
            index.record_address(&format!("{path}[heap]"), self.as_ptr() as usize);
        }
    }
}

impl SensitiveType for Cow<'_, str> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        *self = Cow::Owned(registry.apply(tag, self));
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        Cow::Owned(registry.apply(tag, self))
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        if !self.is_empty() {
            index.record_address(&format!("{path}[heap]"), self.as_ptr() as usize);
        }
    }
}

impl SensitiveType for Box<str> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        *self = registry.apply(tag, self).into_boxed_str();
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        registry.apply(tag, self).into_boxed_str()
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        if !self.is_empty() {
            index.record_address(&format!("{path}[heap]"), self.as_ptr() as usize);
        }
    }
}

// =============================================================================
// Scalars: never transformed
// =============================================================================

macro_rules! impl_sensitive_type_passthrough {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SensitiveType for $ty {
                fn redact_in_place(&mut self, _tag: &str, _registry: &Registry) {}

                fn redacted_copy(&self, _tag: &str, _registry: &Registry) -> Self {
                    *self
                }
            }
        )*
    };
}

impl_sensitive_type_passthrough!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, (),
);

impl<T: ?Sized> SensitiveType for PhantomData<T> {
    fn redact_in_place(&mut self, _tag: &str, _registry: &Registry) {}

    fn redacted_copy(&self, _tag: &str, _registry: &Registry) -> Self {
        PhantomData
    }
}

// =============================================================================
// Nullable and pointers
// =============================================================================

impl<T: SensitiveType> SensitiveType for Option<T> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        if let Some(value) = self {
            value.redact_in_place(tag, registry);
        }
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        self.as_ref().map(|value| value.redacted_copy(tag, registry))
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        self.as_ref().map_or(Ok(()), SensitiveType::check_writable)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        match self {
            Some(value) => value.record_addresses(path, index),
            None => index.record(path, self),
        }
    }
}

impl<T: SensitiveType> SensitiveType for Box<T> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        (**self).redact_in_place(tag, registry);
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        Box::new((**self).redacted_copy(tag, registry))
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        (**self).check_writable()
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        (**self).record_addresses(path, index);
    }
}

// Shared pointers are writable only while they own their allocation alone.
macro_rules! impl_sensitive_type_shared {
    ($ptr:ident) => {
        impl<T: SensitiveType> SensitiveType for $ptr<T> {
            fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
                match $ptr::get_mut(self) {
                    Some(value) => value.redact_in_place(tag, registry),
                    None => tracing::warn!(
                        type_name = std::any::type_name::<Self>(),
                        "skipping shared pointer during in-place redaction"
                    ),
                }
            }

            fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
                $ptr::new((**self).redacted_copy(tag, registry))
            }

            fn check_writable(&self) -> Result<(), RedactError> {
                if $ptr::strong_count(self) != 1 || $ptr::weak_count(self) != 0 {
                    return Err(RedactError::unsettable::<Self>());
                }
                (**self).check_writable()
            }

            fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
                index.record(path, self);
                (**self).record_addresses(path, index);
            }
        }
    };
}

impl_sensitive_type_shared!(Rc);
impl_sensitive_type_shared!(Arc);

// =============================================================================
// Arrays and sequences
// =============================================================================

impl<T: SensitiveType, const N: usize> SensitiveType for [T; N] {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        for value in self.iter_mut() {
            value.redact_in_place(tag, registry);
        }
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        self.each_ref().map(|value| value.redacted_copy(tag, registry))
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        self.iter().try_for_each(SensitiveType::check_writable)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        for (position, value) in self.iter().enumerate() {
            value.record_addresses(&format!("{path}[{position}]"), index);
        }
    }
}

impl<T: SensitiveType> SensitiveType for Vec<T> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        for value in self.iter_mut() {
            value.redact_in_place(tag, registry);
        }
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        self.iter()
            .map(|value| value.redacted_copy(tag, registry))
            .collect()
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        self.iter().try_for_each(SensitiveType::check_writable)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        if self.is_empty() {
            // Capacity without elements can still be shared.
            if self.capacity() != 0 && mem::size_of::<T>() != 0 {
                index.record_address(&format!("{path}[buffer]"), self.as_ptr() as usize);
            }
            return;
        }
        for (position, value) in self.iter().enumerate() {
            value.record_addresses(&format!("{path}[{position}]"), index);
        }
    }
}

impl<T: SensitiveType> SensitiveType for VecDeque<T> {
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        for value in self.iter_mut() {
            value.redact_in_place(tag, registry);
        }
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        self.iter()
            .map(|value| value.redacted_copy(tag, registry))
            .collect()
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        self.iter().try_for_each(SensitiveType::check_writable)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        for (position, value) in self.iter().enumerate() {
            value.record_addresses(&format!("{path}[{position}]"), index);
        }
    }
}

// =============================================================================
// Maps: values are walked, keys are cloned as-is
// =============================================================================

impl<K, V, S> SensitiveType for HashMap<K, V, S>
where
    K: Eq + Hash + Clone + Debug,
    V: SensitiveType,
    S: BuildHasher + Clone,
{
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        for value in self.values_mut() {
            value.redact_in_place(tag, registry);
        }
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        let mut result = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        result.extend(
            self.iter()
                .map(|(key, value)| (key.clone(), value.redacted_copy(tag, registry))),
        );
        result
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        self.values().try_for_each(SensitiveType::check_writable)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        for (key, value) in self {
            index.record(&format!("{path}[{key:?};key]"), key);
            value.record_addresses(&format!("{path}[{key:?}]"), index);
        }
    }
}

impl<K, V> SensitiveType for BTreeMap<K, V>
where
    K: Ord + Clone + Debug,
    V: SensitiveType,
{
    fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
        for value in self.values_mut() {
            value.redact_in_place(tag, registry);
        }
    }

    fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
        self.iter()
            .map(|(key, value)| (key.clone(), value.redacted_copy(tag, registry)))
            .collect()
    }

    fn check_writable(&self) -> Result<(), RedactError> {
        self.values().try_for_each(SensitiveType::check_writable)
    }

    fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
        index.record(path, self);
        for (key, value) in self {
            index.record(&format!("{path}[{key:?};key]"), key);
            value.record_addresses(&format!("{path}[{key:?}]"), index);
        }
    }
}

// =============================================================================
// Tuples
// =============================================================================

macro_rules! impl_sensitive_type_tuple {
    ($($name:ident . $position:tt),+) => {
        impl<$($name: SensitiveType),+> SensitiveType for ($($name,)+) {
            fn redact_in_place(&mut self, tag: &str, registry: &Registry) {
                $(self.$position.redact_in_place(tag, registry);)+
            }

            fn redacted_copy(&self, tag: &str, registry: &Registry) -> Self {
                ($(self.$position.redacted_copy(tag, registry),)+)
            }

            fn check_writable(&self) -> Result<(), RedactError> {
                $(self.$position.check_writable()?;)+
                Ok(())
            }

            fn record_addresses(&self, path: &str, index: &mut AddressIndex) {
                $(self.$position.record_addresses(&format!("{path}.{}", $position), index);)+
            }
        }
    };
}

impl_sensitive_type_tuple!(A.0);
impl_sensitive_type_tuple!(A.0, B.1);
impl_sensitive_type_tuple!(A.0, B.1, C.2);
impl_sensitive_type_tuple!(A.0, B.1, C.2, D.3);

#[cfg(test)]
mod tests {
    use std::{
        borrow::Cow,
        collections::{BTreeMap, HashMap, VecDeque},
        rc::Rc,
        sync::Arc,
    };

    use super::SensitiveType;
    use crate::{
        registry::{Registry, NONSECRET, REDACTED_PLACEHOLDER, SECRET},
        RedactError,
    };

    #[test]
    fn string_leaf_uses_the_tag_in_effect() {
        let registry = Registry::new();
        let mut value = "secret".to_string();
        value.redact_in_place(NONSECRET, &registry);
        assert_eq!(value, "secret");
        value.redact_in_place(SECRET, &registry);
        assert_eq!(value, REDACTED_PLACEHOLDER);
    }

    #[test]
    fn empty_strings_are_replaced() {
        let registry = Registry::new();
        let mut value = String::new();
        value.redact_in_place(SECRET, &registry);
        assert_eq!(value, REDACTED_PLACEHOLDER);
    }

    #[test]
    fn cow_and_boxed_str_leaves() {
        let registry = Registry::new();
        let borrowed: Cow<'static, str> = Cow::Borrowed("secret");
        let copy = borrowed.redacted_copy(SECRET, &registry);
        assert_eq!(copy, REDACTED_PLACEHOLDER);
        assert_eq!(borrowed, "secret");

        let mut boxed: Box<str> = "secret".into();
        boxed.redact_in_place(SECRET, &registry);
        assert_eq!(&*boxed, REDACTED_PLACEHOLDER);
    }

    #[test]
    fn scalars_pass_through() {
        let registry = Registry::new();
        let mut number = 42_u32;
        number.redact_in_place(SECRET, &registry);
        assert_eq!(number, 42);
        assert!(true.redacted_copy(SECRET, &registry));
        assert_eq!('x'.redacted_copy(SECRET, &registry), 'x');
    }

    #[test]
    fn containers_inherit_the_tag() {
        let registry = Registry::new();
        let values = vec![Some("a".to_string()), None];
        assert_eq!(
            values.redacted_copy(SECRET, &registry),
            vec![Some(REDACTED_PLACEHOLDER.to_string()), None]
        );
        assert_eq!(values.redacted_copy(NONSECRET, &registry), values);

        let array = ["a".to_string(), "b".to_string()];
        assert_eq!(
            array.redacted_copy(SECRET, &registry),
            [REDACTED_PLACEHOLDER.to_string(), REDACTED_PLACEHOLDER.to_string()]
        );

        let deque: VecDeque<String> = VecDeque::from(vec!["a".to_string()]);
        assert_eq!(deque.redacted_copy(SECRET, &registry)[0], REDACTED_PLACEHOLDER);

        let tuple = ("a".to_string(), 7_i64);
        assert_eq!(
            tuple.redacted_copy(SECRET, &registry),
            (REDACTED_PLACEHOLDER.to_string(), 7)
        );
    }

    #[test]
    fn map_values_are_walked_and_keys_kept() {
        let registry = Registry::new();
        let mut map = HashMap::new();
        map.insert("public_key".to_string(), "secret".to_string());
        map.redact_in_place(SECRET, &registry);
        assert_eq!(map["public_key"], REDACTED_PLACEHOLDER);

        let mut tree = BTreeMap::new();
        tree.insert("key".to_string(), vec!["secret".to_string()]);
        let copy = tree.redacted_copy(SECRET, &registry);
        assert_eq!(copy["key"], vec![REDACTED_PLACEHOLDER.to_string()]);
        assert_eq!(tree["key"], vec!["secret".to_string()]);
    }

    #[test]
    fn pointers_are_written_through() {
        let registry = Registry::new();
        let mut boxed = Box::new("secret".to_string());
        let before = std::ptr::from_ref(&*boxed);
        boxed.redact_in_place(SECRET, &registry);
        assert_eq!(*boxed, REDACTED_PLACEHOLDER);
        assert_eq!(std::ptr::from_ref(&*boxed), before);

        let mut rc = Rc::new("secret".to_string());
        assert!(rc.check_writable().is_ok());
        rc.redact_in_place(SECRET, &registry);
        assert_eq!(*rc, REDACTED_PLACEHOLDER);
    }

    #[test]
    fn copy_allocates_fresh_pointees() {
        let registry = Registry::new();
        let shared = Arc::new("value".to_string());
        let copy = shared.redacted_copy(NONSECRET, &registry);
        assert_eq!(*copy, "value");
        assert!(!Arc::ptr_eq(&shared, &copy));
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn shared_pointers_are_not_writable() {
        let first = Rc::new("secret".to_string());
        let second = Rc::clone(&first);
        assert!(matches!(
            second.check_writable(),
            Err(RedactError::Unsettable { .. })
        ));

        let nested = vec![Some(Arc::new(1_u8)), None];
        assert!(nested.check_writable().is_ok());
        let weak = Arc::downgrade(nested[0].as_ref().unwrap());
        assert!(nested.check_writable().is_err());
        drop(weak);
    }
}
