//! A field selects one behavior: a tag or opaque, never both.

use redact::Sensitive;

#[derive(Sensitive)]
struct Record {
    #[redact(nonsecret, opaque)]
    name: String,
}

fn main() {}
