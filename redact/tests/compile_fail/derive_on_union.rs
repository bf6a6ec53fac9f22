//! Unions have no active field to walk.

use redact::Sensitive;

#[derive(Sensitive)]
union Bits {
    int: u32,
    float: f32,
}

fn main() {}
