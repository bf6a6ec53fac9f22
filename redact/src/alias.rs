//! Alias validation between two value graphs.
//!
//! Copy mode promises that no walked location of the copy shares storage with
//! the original. This module proves it after the fact: it indexes every storage
//! address reachable through walked fields of each graph, then reports the
//! addresses found in both.
//!
//! Opaque fields are not walked and therefore never indexed. Zero-sized values
//! have no storage of their own and are skipped. Map keys are indexed by the
//! slot they occupy (`path[key;key]`) but not followed: a key is only known to
//! be `Debug`, so storage behind an `Rc<str>` or `Arc<str>` key is not checked.

use std::{collections::HashMap, fmt, mem, ptr};

use crate::{error::AliasError, SensitiveType};

/// Address → field paths index built by [`SensitiveType::record_addresses`].
#[derive(Debug, Default)]
pub struct AddressIndex {
    paths: HashMap<usize, Vec<String>>,
}

impl AddressIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the address of `value` itself under `path`.
    pub fn record<T: ?Sized>(&mut self, path: &str, value: &T) {
        if mem::size_of_val(value) == 0 {
            return;
        }
        self.record_address(path, ptr::from_ref(value).cast::<u8>() as usize);
    }

    /// Records a raw address, e.g. a heap buffer, under `path`.
    pub fn record_address(&mut self, path: &str, address: usize) {
        if address == 0 {
            return;
        }
        self.paths
            .entry(address)
            .or_default()
            .push(path.to_string());
    }

    /// Paths recorded for `address`.
    pub fn paths(&self, address: usize) -> Option<&[String]> {
        self.paths.get(&address).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Indexes every walked location of `value`, rooted at `root`.
    pub fn of<T: SensitiveType>(root: &str, value: &T) -> Self {
        let mut index = Self::new();
        value.record_addresses(root, &mut index);
        index
    }
}

/// One storage address reachable from both graphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub address: usize,
    /// Paths to the address in the first graph, rooted at `a`.
    pub left: Vec<String>,
    /// Paths to the address in the second graph, rooted at `b`.
    pub right: Vec<String>,
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {} are aliases",
            self.left.join(", "),
            self.right.join(", ")
        )
    }
}

/// Lists every storage address reachable through walked fields of both `a`
/// and `b`, ordered by the first path on the `a` side.
pub fn find_aliases<A, B>(a: &A, b: &B) -> Vec<Alias>
where
    A: SensitiveType,
    B: SensitiveType,
{
    let left = AddressIndex::of("a", a);
    let right = AddressIndex::of("b", b);

    let mut aliases: Vec<Alias> = left
        .paths
        .iter()
        .filter_map(|(address, left_paths)| {
            right.paths(*address).map(|right_paths| Alias {
                address: *address,
                left: left_paths.clone(),
                right: right_paths.to_vec(),
            })
        })
        .collect();
    aliases.sort_by(|x, y| x.left.cmp(&y.left));
    aliases
}

/// Fails if any walked location of `a` shares storage with `b`.
///
/// A successful check means mutating one value cannot change the other through
/// a walked field.
pub fn validate_no_exported_aliases<A, B>(a: &A, b: &B) -> Result<(), AliasError>
where
    A: SensitiveType,
    B: SensitiveType,
{
    let aliases = find_aliases(a, b);
    if aliases.is_empty() {
        Ok(())
    } else {
        Err(AliasError { aliases })
    }
}
