//! Canonical dedup keys and the registry of already-passed objects.
//!
//! Canonicalization semantics (quantity stripping, adjective collapsing,
//! subtype preservation) belong to the judging collaborator. This module
//! only normalizes the collaborator's `canonical_name` for key equality:
//! lowercase, trimmed, internal whitespace collapsed.

use std::collections::BTreeSet;
use tracing::debug;

/// Sentinel key used when the judge supplies an empty canonical name.
pub const UNKNOWN_OBJECT: &str = "unknown object";

/// Derives the dedup key for a judge-supplied canonical name.
pub fn canonical_key(name: &str) -> String {
    let key = name
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    if key.is_empty() {
        UNKNOWN_OBJECT.to_string()
    } else {
        key
    }
}

/// Set of canonical keys already scored as passes this session.
///
/// Monotonically growing: keys are inserted on passes and never removed
/// while the session lives.
#[derive(Debug, Clone, Default)]
pub struct UsedObjectRegistry {
    keys: BTreeSet<String>,
}

impl UsedObjectRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a key has already been scored as a pass.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Records a passed key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: String) -> bool {
        let inserted = self.keys.insert(key.clone());
        debug!(key = %key, inserted, total = self.keys.len(), "Registered canonical key");
        inserted
    }

    /// Number of distinct passed keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in sorted order, for the judge's turn context.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}
