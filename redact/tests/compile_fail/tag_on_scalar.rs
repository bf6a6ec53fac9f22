//! Scalars are never transformed, so selecting a tag for one is a mistake.

use redact::Sensitive;

#[derive(Sensitive)]
struct Record {
    #[redact(tag = "lower")]
    count: i32,
}

fn main() {}
