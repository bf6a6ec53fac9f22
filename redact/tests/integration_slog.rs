//! Integration tests for the slog module.
//!
//! These tests verify that:
//! - `to_redacted_json()` logs the redacted copy, not the original,
//! - the `slog::Value` impl generated by `#[redact(slog)]` emits nested JSON, and
//! - the logged value leaves the original untouched.

#![cfg(feature = "slog")]

use std::{cell::RefCell, collections::HashMap, fmt::Arguments};

use redact::{slog::ToRedactedJson, Sensitive, REDACTED_PLACEHOLDER};
use serde::Serialize;
use serde_json::Value as JsonValue;

// A test serializer that captures serialized key-value pairs
struct CapturingSerializer {
    captured: RefCell<HashMap<String, CapturedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
enum CapturedValue {
    Str(String),
    // For nested serde values, we capture the JSON representation
    Serde(JsonValue),
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn json(&self, key: &str) -> JsonValue {
        match self.captured.borrow().get(key) {
            Some(CapturedValue::Serde(json)) => json.clone(),
            other => panic!("expected a Serde value for `{key}`, got {other:?}"),
        }
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Str(val.to_string()));
        Ok(())
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(JsonValue::Null);
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Serde(json));
        Ok(())
    }
}

/// Serializes a `slog::Value` into the capturing serializer.
fn serialize_to_capture<V: slog::Value>(
    value: &V,
    key: &'static str,
    serializer: &mut CapturingSerializer,
) {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    value.serialize(&record, key, serializer).unwrap();
}

#[derive(Clone, Debug, PartialEq, Sensitive, Serialize)]
#[redact(slog)]
struct Login {
    #[redact(nonsecret)]
    username: String,
    password: String,
    attempts: u32,
}

fn login() -> Login {
    Login {
        username: "alice".into(),
        password: "super_secret_password".into(),
        attempts: 3,
    }
}

#[test]
fn test_to_redacted_json_simple_struct() {
    let login = login();
    let redacted = login.to_redacted_json();

    assert_eq!(redacted.as_json()["username"], "alice");
    assert_eq!(redacted.as_json()["password"], REDACTED_PLACEHOLDER);
    assert_eq!(redacted.as_json()["attempts"], 3);
    assert_eq!(login.password, "super_secret_password");
}

#[test]
fn test_redacted_json_emits_nested_serde() {
    let redacted = login().to_redacted_json();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&redacted, "login", &mut serializer);

    let json = serializer.json("login");
    assert_eq!(json["username"], "alice");
    assert_eq!(json["password"], REDACTED_PLACEHOLDER);
}

#[test]
fn test_derived_slog_value() {
    let login = login();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&login, "login", &mut serializer);

    let json = serializer.json("login");
    assert_eq!(json["password"], REDACTED_PLACEHOLDER);
    assert_eq!(json["username"], "alice");
    assert_eq!(login, self::login());
}

#[test]
fn test_nested_containers_are_redacted_when_logged() {
    #[derive(Clone, Sensitive, Serialize)]
    #[redact(slog)]
    struct Request {
        #[redact(nonsecret)]
        path: String,
        headers: HashMap<String, String>,
        #[redact(nonsecret)]
        logins: Vec<Login>,
    }

    let request = Request {
        path: "/login".into(),
        headers: HashMap::from([("authorization".to_string(), "Bearer abc".to_string())]),
        logins: vec![login()],
    };

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&request, "request", &mut serializer);

    let json = serializer.json("request");
    assert_eq!(json["path"], "/login");
    assert_eq!(json["headers"]["authorization"], REDACTED_PLACEHOLDER);
    assert_eq!(json["logins"][0]["password"], REDACTED_PLACEHOLDER);
    assert_eq!(json["logins"][0]["username"], "alice");
}
