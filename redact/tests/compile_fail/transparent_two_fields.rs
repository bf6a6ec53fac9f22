//! `#[redact(transparent)]` forwards the caller's tag to exactly one field.

use redact::Sensitive;

#[derive(Sensitive)]
#[redact(transparent)]
struct Pair(String, String);

fn main() {}
