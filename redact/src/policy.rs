//! Reusable text transforms for custom tags.
//!
//! Policies are pure string transformations. They know nothing about tags or
//! traversal; register one with [`crate::Registry::register_policy`] to bind it
//! to a tag name.

use std::borrow::Cow;

use crate::registry::REDACTED_PLACEHOLDER;

const DEFAULT_MASK_CHAR: char = '*';

/// A string transform that can be bound to a tag.
///
/// Keep and mask policies operate on Unicode scalar values and return empty
/// strings unchanged. Full redaction always returns the placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextPolicy {
    /// Replace the whole value with a fixed placeholder.
    Full {
        /// The text written in place of the value.
        placeholder: Cow<'static, str>,
    },
    /// Keep `prefix` leading and `suffix` trailing characters, mask the rest.
    Keep {
        /// Visible leading characters.
        prefix: usize,
        /// Visible trailing characters.
        suffix: usize,
        /// Character written over hidden characters.
        mask: char,
    },
    /// Mask `prefix` leading and `suffix` trailing characters, keep the rest.
    Mask {
        /// Masked leading characters.
        prefix: usize,
        /// Masked trailing characters.
        suffix: usize,
        /// Character written over hidden characters.
        mask: char,
    },
}

impl TextPolicy {
    /// Full redaction using [`REDACTED_PLACEHOLDER`].
    #[must_use]
    pub fn full() -> Self {
        Self::Full {
            placeholder: Cow::Borrowed(REDACTED_PLACEHOLDER),
        }
    }

    /// Full redaction using a custom placeholder.
    #[must_use]
    pub fn full_with<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    #[must_use]
    pub fn keep_first(prefix: usize) -> Self {
        Self::keep_both(prefix, 0)
    }

    #[must_use]
    pub fn keep_last(suffix: usize) -> Self {
        Self::keep_both(0, suffix)
    }

    /// Keeps both ends visible. If `prefix + suffix` covers the value, nothing is masked.
    #[must_use]
    pub fn keep_both(prefix: usize, suffix: usize) -> Self {
        Self::Keep {
            prefix,
            suffix,
            mask: DEFAULT_MASK_CHAR,
        }
    }

    #[must_use]
    pub fn mask_first(prefix: usize) -> Self {
        Self::mask_both(prefix, 0)
    }

    #[must_use]
    pub fn mask_last(suffix: usize) -> Self {
        Self::mask_both(0, suffix)
    }

    /// Masks both ends. If `prefix + suffix` covers the value, everything is masked.
    #[must_use]
    pub fn mask_both(prefix: usize, suffix: usize) -> Self {
        Self::Mask {
            prefix,
            suffix,
            mask: DEFAULT_MASK_CHAR,
        }
    }

    /// Overrides the mask character. Has no effect on [`TextPolicy::Full`].
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        match &mut self {
            Self::Full { .. } => {}
            Self::Keep { mask, .. } | Self::Mask { mask, .. } => *mask = mask_char,
        }
        self
    }

    /// Applies the policy to `value`.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            Self::Full { placeholder } => placeholder.clone().into_owned(),
            Self::Keep {
                prefix,
                suffix,
                mask,
            } => {
                let total = value.chars().count();
                if prefix.saturating_add(*suffix) >= total {
                    return value.to_owned();
                }
                masked(value, *mask, |index| index >= *prefix && index < total - suffix)
            }
            Self::Mask {
                prefix,
                suffix,
                mask,
            } => {
                let total = value.chars().count();
                if prefix.saturating_add(*suffix) >= total {
                    return std::iter::repeat(*mask).take(total).collect();
                }
                masked(value, *mask, |index| index < *prefix || index >= total - suffix)
            }
        }
    }
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self::full()
    }
}

fn masked(value: &str, mask: char, hide: impl Fn(usize) -> bool) -> String {
    value
        .chars()
        .enumerate()
        .map(|(index, ch)| if hide(index) { mask } else { ch })
        .collect()
}
