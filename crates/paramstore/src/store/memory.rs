//! In-memory parameter store.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Fetched, Parameter, ParameterKind, ParameterStore, StoreError};
use crate::MAX_PARAMETERS;

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    kind: ParameterKind,
}

/// A thread-safe in-memory [`ParameterStore`].
///
/// Enforces the same per-request key limit as a remote store and reports
/// unknown keys as invalid. Values can be changed at any time with
/// [`set`](Self::set), which makes it usable behind a running watcher.
///
/// `SecureString` values are returned as-is when fetched with decryption
/// and masked otherwise.
///
/// # Example
///
/// ```rust
/// use paramstore::store::{MemoryStore, ParameterStore};
///
/// let store = MemoryStore::new()
///     .with("/app/port", "8080")
///     .with_secure("/app/token", "s3cr3t");
///
/// let fetched = store.get_parameters(&["/app/port", "/app/missing"], false).unwrap();
/// assert_eq!(fetched.parameters[0].value, "8080");
/// assert_eq!(fetched.invalid, vec!["/app/missing".to_string()]);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    max_keys: usize,
    entries: RwLock<HashMap<String, Entry>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store named `"memory"`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "memory".to_string(),
            max_keys: MAX_PARAMETERS,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the store's name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();

        self
    }

    /// Adds a plain parameter.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);

        self
    }

    /// Adds an encrypted parameter.
    #[must_use]
    pub fn with_secure(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_kind(key, value, ParameterKind::SecureString);

        self
    }

    /// Sets or replaces a plain parameter.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.set_kind(key, value, ParameterKind::String);
    }

    /// Sets or replaces a parameter of the given kind.
    pub fn set_kind(&self, key: impl Into<String>, value: impl Into<String>, kind: ParameterKind) {
        self.entries.write().insert(
            key.into(),
            Entry {
                value: value.into(),
                kind,
            },
        );
    }

    /// Removes a parameter, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Number of stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn parameter(key: &str, entry: &Entry, decrypt: bool) -> Parameter {
        let value = if entry.kind == ParameterKind::SecureString && !decrypt {
            "*".repeat(entry.value.len().min(8))
        } else {
            entry.value.clone()
        };

        Parameter {
            name: key.to_string(),
            value,
            kind: entry.kind,
        }
    }
}

impl ParameterStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_parameter(&self, key: &str, decrypt: bool) -> Result<Parameter, StoreError> {
        let entries = self.entries.read();

        entries
            .get(key)
            .map(|entry| Self::parameter(key, entry, decrypt))
            .ok_or_else(|| StoreError::not_found(&self.name, key))
    }

    fn get_parameters(&self, keys: &[&str], decrypt: bool) -> Result<Fetched, StoreError> {
        if keys.len() > self.max_keys {
            return Err(StoreError::TooManyKeys {
                store: self.name.clone(),
                requested: keys.len(),
                max: self.max_keys,
            });
        }

        let entries = self.entries.read();
        let mut fetched = Fetched::default();

        for key in keys {
            match entries.get(*key) {
                Some(entry) => fetched
                    .parameters
                    .push(Self::parameter(key, entry, decrypt)),
                None => fetched.invalid.push((*key).to_string()),
            }
        }

        Ok(fetched)
    }
}
