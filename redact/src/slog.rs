//! Adapters for logging redacted values through `slog`.
//!
//! The logged representation is always built from [`crate::as_copy`], never
//! from the original value. Serialization failures are logged as a placeholder
//! string rather than returned to `slog`.
//!
//! Types deriving `Sensitive` with `#[redact(slog)]` get a `slog::Value` impl
//! that goes through [`ToRedactedJson`].

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::SensitiveType;

/// A `slog::Value` emitting an already redacted payload as structured JSON.
#[derive(Clone, Debug)]
pub struct RedactedJson {
    value: JsonValue,
}

impl RedactedJson {
    /// The redacted JSON payload.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for RedactedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts values into a `slog::Value` that logs their redacted copy as JSON.
///
/// ```ignore
/// use redact::slog::ToRedactedJson;
///
/// info!(logger, "login"; "request" => request.to_redacted_json());
/// ```
pub trait ToRedactedJson: SensitiveType + Serialize {
    /// Redacts a copy of `self` with the process-wide registry and captures it
    /// as JSON. `self` is left untouched.
    fn to_redacted_json(&self) -> RedactedJson {
        let redacted = crate::as_copy(self);
        let value = serde_json::to_value(&redacted).unwrap_or_else(|_| {
            JsonValue::String("Failed to serialize redacted value".to_string())
        });
        RedactedJson { value }
    }
}

impl<T> ToRedactedJson for T where T: SensitiveType + Serialize {}
