//! Value-graph traversal and entrypoints.
//!
//! - **`sensitive`**: the walker trait and its impls for std kinds
//! - **`dynamic`**: runtime-typed nodes (`Box<dyn DynSensitive>`)
//! - **`entry`**: mutate (`redact`) and copy (`as_copy`) entrypoints

mod dynamic;
mod entry;
mod sensitive;

pub use dynamic::DynSensitive;
pub use entry::{as_copy, as_copy_with, redact, redact_with, Redactable};
pub use sensitive::SensitiveType;
