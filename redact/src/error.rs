//! Error types returned by the redaction entrypoints.

use std::fmt;

use crate::alias::Alias;

/// Failure modes of in-place redaction.
///
/// Copy mode never fails: it always allocates a fresh value graph, so there is
/// nothing that has to be written through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedactError {
    /// A reachable location cannot be written in place.
    ///
    /// This is raised for `Rc`/`Arc` handles whose allocation is shared with
    /// another owner. It is reported before any write happens, so a failed
    /// call leaves the whole value untouched.
    #[error("cannot redact `{type_name}` in place: the value is shared and not writable")]
    Unsettable {
        /// Type name of the offending location.
        type_name: &'static str,
    },
}

impl RedactError {
    pub(crate) fn unsettable<T: ?Sized>() -> Self {
        Self::Unsettable {
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Raised by [`crate::validate_no_exported_aliases`] when two value graphs
/// share storage through walked fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} aliased location(s): {}", .aliases.len(), AliasList(.aliases))]
pub struct AliasError {
    /// Every address reachable from both graphs.
    pub aliases: Vec<Alias>,
}

struct AliasList<'a>(&'a [Alias]);

impl fmt::Display for AliasList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, alias) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{alias}")?;
        }
        Ok(())
    }
}
