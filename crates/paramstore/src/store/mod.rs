//! Store abstraction for remote parameter sources.
//!
//! This module defines the [`ParameterStore`] trait, the capability the
//! loader needs from a remote key-value parameter service: fetch one key,
//! or fetch up to [`MAX_PARAMETERS`](crate::MAX_PARAMETERS) keys at once
//! while reporting which of them do not exist.
//!
//! # Built-in Stores
//!
//! - [`MemoryStore`] - In-memory store for tests, examples and local runs
//!
//! # Custom Stores
//!
//! ```rust,ignore
//! use paramstore::store::{Fetched, Parameter, ParameterStore, StoreError};
//!
//! struct SsmStore { client: SsmClient }
//!
//! impl ParameterStore for SsmStore {
//!     fn name(&self) -> &str { "ssm" }
//!
//!     fn get_parameter(&self, key: &str, decrypt: bool) -> Result<Parameter, StoreError> {
//!         // call GetParameter...
//!     }
//!
//!     fn get_parameters(&self, keys: &[&str], decrypt: bool) -> Result<Fetched, StoreError> {
//!         // call GetParameters...
//!     }
//! }
//! ```

mod memory;

pub use memory::MemoryStore;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use miette::Diagnostic;
use thiserror::Error as ThisError;

// ============================================================================
// Store Value Types
// ============================================================================

/// How the store holds a parameter's value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ParameterKind {
    /// Plain text.
    #[default]
    String,
    /// Comma-separated list of text values.
    StringList,
    /// Encrypted text, readable only with decryption.
    SecureString,
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::String => f.write_str("String"),
            ParameterKind::StringList => f.write_str("StringList"),
            ParameterKind::SecureString => f.write_str("SecureString"),
        }
    }
}

/// A parameter returned by the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    /// The parameter's full key.
    pub name: String,

    /// The raw text value.
    pub value: String,

    /// How the store holds the value.
    pub kind: ParameterKind,
}

impl Parameter {
    /// Creates a plain text parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParameterKind::String,
        }
    }

    /// Sets the parameter's kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;

        self
    }
}

/// Result of a multi-key fetch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Fetched {
    /// Parameters that were found.
    pub parameters: Vec<Parameter>,

    /// Requested keys the store does not know.
    pub invalid: Vec<String>,
}

// ============================================================================
// Store Errors
// ============================================================================

/// Errors raised by a store client.
#[derive(Debug, ThisError, Diagnostic)]
pub enum StoreError {
    /// The requested key does not exist in the store.
    #[error("parameter '{key}' not found in store '{store}'")]
    #[diagnostic(code(paramstore::store::not_found))]
    NotFound {
        /// The missing key.
        key: String,
        /// The store name.
        store: String,
    },

    /// A multi-key fetch asked for more keys than the store accepts.
    #[error("store '{store}' accepts at most {max} keys per request, got {requested}")]
    #[diagnostic(
        code(paramstore::store::too_many_keys),
        help("split the request into batches")
    )]
    TooManyKeys {
        /// The store name.
        store: String,
        /// How many keys were requested.
        requested: usize,
        /// The store's per-request limit.
        max: usize,
    },

    /// Transport, throttling or authentication failure.
    #[error("store '{store}' connection error: {message}")]
    #[diagnostic(
        code(paramstore::store::connection),
        help("check store configuration and connectivity")
    )]
    Connection {
        /// The store name.
        store: String,
        /// The error message.
        message: String,
        /// The underlying error source.
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Generic store error.
    #[error("store '{store}' error: {message}")]
    #[diagnostic(code(paramstore::store::error))]
    Other {
        /// The store name.
        store: String,
        /// The error message.
        message: String,
        /// The underlying error source.
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl StoreError {
    /// Returns the store name from the error.
    #[must_use]
    pub fn store_name(&self) -> &str {
        match self {
            StoreError::NotFound { store, .. }
            | StoreError::TooManyKeys { store, .. }
            | StoreError::Connection { store, .. }
            | StoreError::Other { store, .. } => store,
        }
    }

    /// Creates a not-found error.
    pub fn not_found(store: impl Into<String>, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            key: key.into(),
            store: store.into(),
        }
    }

    /// Creates a connection error.
    pub fn connection(store: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Connection {
            store: store.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a connection error with source.
    pub fn connection_with_source(
        store: impl Into<String>,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        StoreError::Connection {
            store: store.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a generic error.
    pub fn other(store: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Other {
            store: store.into(),
            message: message.into(),
            source: None,
        }
    }
}

// ============================================================================
// Store Trait
// ============================================================================

/// A remote key-value parameter store.
///
/// Implementations are called synchronously by the loader, one batch at a
/// time, and from the watcher thread, hence `Send + Sync`. No timeout is
/// applied by the loader: a store call that hangs hangs the load.
pub trait ParameterStore: Send + Sync {
    /// Returns the store's name for error messages and logs.
    fn name(&self) -> &str;

    /// Fetches one parameter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the key does not exist, or
    /// another variant when the store fails.
    fn get_parameter(&self, key: &str, decrypt: bool) -> Result<Parameter, StoreError>;

    /// Fetches several parameters in one call.
    ///
    /// Unknown keys are reported in [`Fetched::invalid`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TooManyKeys`] when `keys` exceeds the store's
    /// per-request limit, or another variant when the store fails.
    fn get_parameters(&self, keys: &[&str], decrypt: bool) -> Result<Fetched, StoreError>;
}

impl<S: ParameterStore + ?Sized> ParameterStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_parameter(&self, key: &str, decrypt: bool) -> Result<Parameter, StoreError> {
        (**self).get_parameter(key, decrypt)
    }

    fn get_parameters(&self, keys: &[&str], decrypt: bool) -> Result<Fetched, StoreError> {
        (**self).get_parameters(keys, decrypt)
    }
}

impl<S: ParameterStore + ?Sized> ParameterStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_parameter(&self, key: &str, decrypt: bool) -> Result<Parameter, StoreError> {
        (**self).get_parameter(key, decrypt)
    }

    fn get_parameters(&self, keys: &[&str], decrypt: bool) -> Result<Fetched, StoreError> {
        (**self).get_parameters(keys, decrypt)
    }
}
