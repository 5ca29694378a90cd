//! Cache Entry Module
//!
//! Defines the key/value pair stored in the recency list and the byte
//! accounting used by memory budgets.

use std::sync::Arc;

// == Blob ==
/// An opaque value the cache can store and account for.
pub trait Blob {
    /// Number of payload bytes held by the value.
    fn byte_len(&self) -> usize;
}

impl Blob for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Blob for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Blob for Box<str> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Blob for Box<[u8]> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Blob for Arc<str> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Blob for Arc<[u8]> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

// == Cache Entry ==
/// A single stored key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    /// The lookup key
    pub key: String,
    /// The stored value
    pub value: V,
}

impl<V: Blob> Entry<V> {
    // == Constructor ==
    /// Creates a new entry.
    pub fn new(key: String, value: V) -> Self {
        Self { key, value }
    }

    // == Charge ==
    /// Bytes this entry counts against a memory budget.
    pub fn charge(&self) -> usize {
        charge_of(&self.key, &self.value)
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (String, V) {
        (self.key, self.value)
    }
}

/// Bytes a key/value pair counts against a memory budget.
pub fn charge_of<V: Blob>(key: &str, value: &V) -> usize {
    key.len().saturating_add(value.byte_len())
}
