//! Misspelled field options are rejected instead of silently ignored.

use redact::Sensitive;

#[derive(Sensitive)]
struct Record {
    #[redact(non_secret)]
    name: String,
}

fn main() {}
