//! Tag registry: maps secrecy tags to string transforms.
//!
//! A [`Registry`] always resolves two built-in tags:
//!
//! - [`SECRET`] (the empty tag) replaces the value with [`REDACTED_PLACEHOLDER`].
//! - [`NONSECRET`] keeps the value unchanged.
//!
//! Any other name resolves to the transform registered under it. Names that were
//! never registered fall back to the secret transform, so a typo in a field
//! annotation never leaks data.
//!
//! The process-wide registry used by [`crate::redact`] and [`crate::as_copy`] is
//! extended with [`add_redactor`]. Register transforms during start-up, before
//! values are redacted concurrently; a traversal reads whatever is registered
//! when it begins.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use crate::policy::TextPolicy;

/// Tag selecting the default secret transform. Fields without an annotation use it.
pub const SECRET: &str = "";

/// Tag selecting the no-op transform.
pub const NONSECRET: &str = "nonsecret";

/// Placeholder written by the default secret transform.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// A string transform selected by a secrecy tag.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Mapping from tag names to string transforms.
#[derive(Clone)]
pub struct Registry {
    secret: Transform,
    named: HashMap<String, Transform>,
}

impl Registry {
    /// Creates a registry holding only the built-in `""` and `"nonsecret"` tags.
    #[must_use]
    pub fn new() -> Self {
        let mut named: HashMap<String, Transform> = HashMap::new();
        named.insert(NONSECRET.to_string(), Arc::new(str::to_owned));
        Self {
            secret: Arc::new(|_: &str| REDACTED_PLACEHOLDER.to_owned()),
            named,
        }
    }

    /// Adds or replaces the transform for `tag`.
    ///
    /// Registering under [`SECRET`] replaces the default transform, which also
    /// applies to unknown tags.
    pub fn register<F>(&mut self, tag: impl Into<String>, transform: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.insert(tag.into(), Arc::new(transform));
    }

    /// Registers a [`TextPolicy`] under `tag`.
    pub fn register_policy(&mut self, tag: impl Into<String>, policy: TextPolicy) {
        self.register(tag, move |value: &str| policy.apply_to(value));
    }

    fn insert(&mut self, tag: String, transform: Transform) {
        tracing::debug!(tag = %tag, "registered redaction transform");
        if tag == SECRET {
            self.secret = transform;
        } else {
            self.named.insert(tag, transform);
        }
    }

    /// Returns `true` when `tag` resolves to something other than the fallback.
    pub fn contains(&self, tag: &str) -> bool {
        tag == SECRET || self.named.contains_key(tag)
    }

    /// Returns the transform selected by `tag`.
    pub fn resolve(&self, tag: &str) -> &Transform {
        self.named.get(tag).unwrap_or(&self.secret)
    }

    /// Applies the transform selected by `tag` to `value`.
    ///
    /// Empty values are transformed like any other: an empty secret still
    /// becomes the placeholder.
    #[must_use]
    pub fn apply(&self, tag: &str, value: &str) -> String {
        (self.resolve(tag))(value)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.named.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("Registry").field("tags", &tags).finish()
    }
}

static GLOBAL: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::new()));

/// Registers `transform` for `tag` in the process-wide registry.
///
/// ```rust
/// use redact::{Redactable, Sensitive};
///
/// redact::add_redactor("lower", str::to_lowercase);
///
/// #[derive(Sensitive)]
/// struct Record {
///     #[redact(tag = "lower")]
///     code: String,
/// }
///
/// let mut record = Record { code: "DATA".into() };
/// record.redact().unwrap();
/// assert_eq!(record.code, "data");
/// ```
pub fn add_redactor<F>(tag: impl Into<String>, transform: F)
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(tag, transform);
}

/// Snapshot of the process-wide registry.
///
/// The lock is released before any traversal, so transforms may call
/// [`add_redactor`] or re-enter the entry points. Registrations made during a
/// traversal apply from the next call on.
pub(crate) fn global() -> Registry {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod tests {
    use super::{Registry, TextPolicy, NONSECRET, REDACTED_PLACEHOLDER, SECRET};

    #[test]
    fn builtin_tags_resolve() {
        let registry = Registry::new();
        assert_eq!(registry.apply(SECRET, "hunter2"), REDACTED_PLACEHOLDER);
        assert_eq!(registry.apply(NONSECRET, "hunter2"), "hunter2");
    }

    #[test]
    fn empty_value_is_still_redacted() {
        let registry = Registry::new();
        assert_eq!(registry.apply(SECRET, ""), REDACTED_PLACEHOLDER);
        assert_eq!(registry.apply(NONSECRET, ""), "");
    }

    #[test]
    fn default_transform_is_idempotent() {
        let registry = Registry::new();
        let once = registry.apply(SECRET, "value");
        assert_eq!(registry.apply(SECRET, &once), once);
    }

    #[test]
    fn unknown_tag_falls_back_to_secret() {
        let registry = Registry::new();
        assert!(!registry.contains("upper"));
        assert_eq!(registry.apply("upper", "value"), REDACTED_PLACEHOLDER);
    }

    #[test]
    fn register_adds_and_overwrites() {
        let mut registry = Registry::new();
        registry.register("upper", str::to_uppercase);
        assert!(registry.contains("upper"));
        assert_eq!(registry.apply("upper", "value"), "VALUE");

        registry.register("upper", |value: &str| format!("<{value}>"));
        assert_eq!(registry.apply("upper", "value"), "<value>");
    }

    #[test]
    fn registering_the_empty_tag_replaces_the_default() {
        let mut registry = Registry::new();
        registry.register(SECRET, |_: &str| "***".to_string());
        assert_eq!(registry.apply(SECRET, "value"), "***");
        assert_eq!(registry.apply("never-registered", "value"), "***");
        assert_eq!(registry.apply(NONSECRET, "value"), "value");
    }

    #[test]
    fn policies_can_be_registered() {
        let mut registry = Registry::new();
        registry.register_policy("last4", TextPolicy::keep_last(4));
        assert_eq!(registry.apply("last4", "4111111111111111"), "************1111");
    }

    #[test]
    fn debug_lists_tags_without_transforms() {
        let mut registry = Registry::new();
        registry.register("lower", str::to_lowercase);
        assert_eq!(
            format!("{registry:?}"),
            r#"Registry { tags: ["lower", "nonsecret"] }"#
        );
    }
}
