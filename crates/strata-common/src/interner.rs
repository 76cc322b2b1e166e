//! Global string interner.
//!
//! Identifier and literal text recur constantly across an AST (the same
//! attribute name read a thousand times, the same module path imported by
//! every file). `Atom` hands those strings a cheap, `Copy`, hashable id
//! instead of re-allocating and re-comparing bytes everywhere.
//!
//! The table is process-global and append-only: once a string is interned it
//! lives until the process exits. That is a deliberate trade against a
//! threaded-interner-per-compilation-unit design; see `DESIGN.md`.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Mutex;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

struct InternerTable {
    strings: Vec<&'static str>,
    ids: FxHashMap<&'static str, u32>,
}

static TABLE: Lazy<Mutex<InternerTable>> = Lazy::new(|| {
    Mutex::new(InternerTable { strings: Vec::new(), ids: FxHashMap::default() })
});

impl Atom {
    pub fn new(s: &str) -> Self {
        let mut table = TABLE.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(&id) = table.ids.get(s) {
            return Atom(id);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let id = table.strings.len() as u32;
        table.strings.push(leaked);
        table.ids.insert(leaked, id);
        Atom(id)
    }

    pub fn as_str(&self) -> &'static str {
        let table = TABLE.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        table.strings[self.0 as usize]
    }
}

impl std::fmt::Debug for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Atom({:?})", self.as_str())
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::new(s)
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom::new(&s)
    }
}

impl serde::Serialize for Atom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedupes() {
        let a = Atom::new("foo");
        let b = Atom::new("foo");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "foo");
    }

    #[test]
    fn distinct_strings_get_distinct_atoms() {
        assert_ne!(Atom::new("alpha"), Atom::new("beta"));
    }
}
