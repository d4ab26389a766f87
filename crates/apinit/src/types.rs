//! Shared type definitions for the apinit crate
//!
//! This module contains common types used across the generator components,
//! kept in one place to avoid circular module dependencies.

use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

/// Type alias for IndexMap with FxHasher for better performance
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Identity of a symbol being exported.
///
/// Two declarations carrying different `Token` identities may never claim the
/// same fully-qualified destination name. `Unchecked` marks declarations that
/// are exempt from that rule: constants (a literal value has no stable
/// identity to compare) and the synthesized parent-chain imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolId {
    /// Stable identity token, by convention the dotted path of the symbol's
    /// canonical definition site (e.g. `mylib.python.ops.math_ops.add`).
    Token(String),

    /// Sentinel identity that never participates in conflict detection.
    Unchecked,
}

impl SymbolId {
    /// Create a token identity from a canonical definition site.
    pub fn token(site: impl Into<String>) -> Self {
        SymbolId::Token(site.into())
    }

    /// Check if this is the no-check sentinel.
    pub fn is_unchecked(&self) -> bool {
        matches!(self, SymbolId::Unchecked)
    }
}
