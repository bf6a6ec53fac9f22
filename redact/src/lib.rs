//! Tag-driven redaction of string data inside arbitrary nested values.
//!
//! Every string reachable from a value is treated as secret unless the struct
//! field it is reached through says otherwise:
//!
//! - no annotation: replaced with [`REDACTED_PLACEHOLDER`]
//! - `#[redact(nonsecret)]`: left unchanged
//! - `#[redact(tag = "name")]`: passed through the transform registered as `name`
//! - `#[redact(opaque)]`: never walked; cloned as-is by [`as_copy`]
//!
//! A field's tag governs its whole subtree: options, vectors, maps and boxes
//! pass it down unchanged, and only the next struct field selects a new one.
//!
//! Two operation modes are provided:
//!
//! - [`redact`] overwrites the value in place.
//! - [`as_copy`] returns a redacted copy and leaves the original untouched.
//!
//! ```rust
//! use redact::{Redactable, Sensitive, REDACTED_PLACEHOLDER};
//!
//! #[derive(Sensitive)]
//! struct Login {
//!     password: String,
//!     #[redact(nonsecret)]
//!     username: String,
//! }
//!
//! let login = Login {
//!     password: "hunter2".into(),
//!     username: "alice".into(),
//! };
//! let logged = login.as_copy();
//! assert_eq!(logged.password, REDACTED_PLACEHOLDER);
//! assert_eq!(logged.username, "alice");
//! assert_eq!(login.password, "hunter2");
//! ```
//!
//! Transforms are looked up in a [`Registry`]. The free functions use a
//! process-wide one extended with [`add_redactor`]; the `*_with` variants take
//! an explicit registry instead.
//!
//! What this crate does not do:
//! - redact numbers, booleans or other non-string scalars
//! - transform map keys
//! - walk reference cycles (the supported pointer kinds cannot form them)

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use redact_derive::Sensitive;

#[allow(unused_extern_crates)]
extern crate self as redact;

mod alias;
mod error;
mod policy;
mod registry;
#[cfg(feature = "slog")]
pub mod slog;
mod walk;

pub use alias::{find_aliases, validate_no_exported_aliases, AddressIndex, Alias};
pub use error::{AliasError, RedactError};
pub use policy::TextPolicy;
pub use registry::{add_redactor, Registry, Transform, NONSECRET, REDACTED_PLACEHOLDER, SECRET};
pub use walk::{
    as_copy, as_copy_with, redact, redact_with, DynSensitive, Redactable, SensitiveType,
};
