//! The one symbol-table query expressions need.

use std::collections::{BTreeSet, HashSet};

pub trait SymbolLookup {
    fn is_declared(&self, name: &str) -> bool;
}

impl SymbolLookup for HashSet<String> {
    fn is_declared(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl SymbolLookup for BTreeSet<String> {
    fn is_declared(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl SymbolLookup for [String] {
    fn is_declared(&self, name: &str) -> bool {
        self.iter().any(|s| s == name)
    }
}

impl SymbolLookup for [&str] {
    fn is_declared(&self, name: &str) -> bool {
        self.iter().any(|s| *s == name)
    }
}

impl<S: SymbolLookup + ?Sized> SymbolLookup for &S {
    fn is_declared(&self, name: &str) -> bool {
        (**self).is_declared(name)
    }
}
