//! Error types for parameter loading.
//!
//! This module contains the [`Error`] enum returned by every loading entry
//! point. It integrates with [`miette`] so callers can render rich
//! diagnostics, and it is careful never to leak the values of `decrypt`
//! fields through `Display` or `Debug`.
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::InvalidType`] | The root record is absent or not a record |
//! | [`Error::TagParse`] | A `#[param("...")]` annotation has an empty key |
//! | [`Error::Convert`] | A fetched value does not fit the field's type |
//! | [`Error::NotFound`] | The store reported one or more keys as invalid |
//! | [`Error::MissingValue`] | A requested key is absent from a fetch result |
//! | [`Error::Store`] | The store client itself failed |
//! | [`Error::Conflict`] | A custom-decoder field also asks for `json` |
//! | [`Error::Json`] | A `json` field could not be decoded |
//! | [`Error::Decode`] | A custom decoder rejected the value |
//! | [`Error::Parameters`] | Template parameters could not be serialized |
//!
//! # Fail-fast
//!
//! Loading stops at the first error. Fields bound before the failure keep
//! their new values; nothing is rolled back.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};

use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::store::StoreError;
use crate::walk::FieldMeta;

/// Boxed error returned by custom decoders.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A value that is masked in `Display` and `Debug` when it is secret.
///
/// Values fetched with decryption are wrapped as secret so conversion
/// errors can carry the offending text without printing it.
#[derive(Clone, PartialEq, Eq)]
pub struct MaybeRedacted {
    value: String,
    secret: bool,
}

impl MaybeRedacted {
    /// Wraps a value, masking it when `secret` is set.
    pub fn new(value: impl Into<String>, secret: bool) -> Self {
        Self {
            value: value.into(),
            secret,
        }
    }

    /// Returns the raw value regardless of the secret flag.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Whether the value is masked.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        self.secret
    }
}

impl Display for MaybeRedacted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.secret {
            f.write_str("<redacted>")
        } else {
            f.write_str(&self.value)
        }
    }
}

impl Debug for MaybeRedacted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.secret {
            f.write_str("<redacted>")
        } else {
            Debug::fmt(&self.value, f)
        }
    }
}

/// Errors that can occur while loading parameters into a record.
///
/// # Example
///
/// ```rust,ignore
/// match loader.load(&mut config) {
///     Ok(_) => { /* all fields bound */ }
///     Err(Error::NotFound { keys }) => {
///         eprintln!("missing parameters: {}", keys.join(", "));
///     }
///     Err(e) => eprintln!("{:?}", miette::Report::from(e)),
/// }
/// ```
#[derive(Debug, ThisError, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// The root record was absent, or not a record at all.
    #[error("{}", invalid_type_message(.type_name.as_deref()))]
    #[diagnostic(
        code(paramstore::invalid_type),
        help("pass a mutable reference to a struct that derives `Parameters`")
    )]
    InvalidType {
        /// Name of the offending type, `None` when the record was absent.
        type_name: Option<String>,
    },

    /// A field annotation could not be parsed.
    #[error("failed to parse tag [{tag}] for field {field}")]
    #[diagnostic(
        code(paramstore::tag_parse),
        help("annotations look like `#[param(\"/app/key,decrypt\")]`; the key must not be empty")
    )]
    TagParse {
        /// The raw annotation text.
        tag: String,
        /// The field carrying the annotation.
        field: String,
    },

    /// A fetched value could not be converted into the field's type.
    #[error("{}", convert_message(.field, .type_name, .value))]
    #[diagnostic(code(paramstore::convert))]
    Convert {
        /// The field being assigned; empty until the loader enriches the error.
        field: String,
        /// The target type name (e.g. `"i8"`, `"Duration"`).
        type_name: String,
        /// The text that failed to convert.
        value: MaybeRedacted,
    },

    /// The store reported keys that do not exist.
    #[error("invalid parameters: {}", .keys.join(", "))]
    #[diagnostic(
        code(paramstore::not_found),
        help("create the parameters in the store or fix the field annotations")
    )]
    NotFound {
        /// Every key the store flagged as invalid in the failing batch.
        keys: Vec<String>,
    },

    /// A requested key was missing from the fetch result although the store
    /// did not flag it.
    #[error("failed to load parameter for key '{key}'")]
    #[diagnostic(code(paramstore::missing_value))]
    MissingValue {
        /// The key without a value.
        key: String,
    },

    /// The store client failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    /// A field's type has a custom decoder and the annotation also sets `json`.
    #[error(
        "cannot use 'json' option on a type with a custom decoder: {field} {type_name}"
    )]
    #[diagnostic(
        code(paramstore::conflict),
        help("remove the `json` option or the custom decoder")
    )]
    Conflict {
        /// The field carrying both.
        field: String,
        /// The field's declared type.
        type_name: String,
    },

    /// A `json` field could not be decoded.
    #[error("json decode error for field '{field}' at '{path}': {message}")]
    #[diagnostic(code(paramstore::json))]
    Json {
        /// The field being decoded.
        field: String,
        /// Location inside the JSON document where decoding failed.
        path: String,
        /// The decoder's message.
        message: String,
    },

    /// A custom decoder rejected the value.
    #[error("custom decoder failed for field '{field}'")]
    #[diagnostic(code(paramstore::decode))]
    Decode {
        /// The field being decoded.
        field: String,
        /// The decoder's error.
        #[source]
        source: BoxError,
    },

    /// The template parameters could not be serialized.
    #[error("failed to serialize template parameters")]
    #[diagnostic(
        code(paramstore::parameters),
        help("template parameters must serialize to a JSON object or value")
    )]
    Parameters {
        /// The serialization error.
        #[source]
        source: serde_json::Error,
    },
}

fn invalid_type_message(type_name: Option<&str>) -> String {
    match type_name {
        None => "nil type".to_string(),
        Some(name) => format!("non-reference Load({name})"),
    }
}

fn convert_message(field: &str, type_name: &str, value: &MaybeRedacted) -> String {
    if field.is_empty() {
        format!("failed to convert '{value}' to {type_name}")
    } else {
        format!("failed to convert '{value}' to {type_name} for field {field}")
    }
}

impl Error {
    /// Creates an `InvalidType` error; `None` marks an absent record.
    pub fn invalid_type(type_name: Option<&str>) -> Self {
        Error::InvalidType {
            type_name: type_name.map(str::to_string),
        }
    }

    /// Creates a `TagParse` error.
    pub fn tag_parse(tag: impl Into<String>, field: impl Into<String>) -> Self {
        Error::TagParse {
            tag: tag.into(),
            field: field.into(),
        }
    }

    /// Creates a `Convert` error without a field name.
    pub fn convert(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Error::Convert {
            field: String::new(),
            type_name: type_name.into(),
            value: MaybeRedacted::new(value, false),
        }
    }

    /// Creates a `NotFound` error from the keys the store flagged.
    pub fn not_found(keys: Vec<String>) -> Self {
        Error::NotFound { keys }
    }

    /// Creates a `MissingValue` error.
    pub fn missing_value(key: impl Into<String>) -> Self {
        Error::MissingValue { key: key.into() }
    }

    /// Creates a `Conflict` error without a field name.
    pub fn conflict(type_name: impl Into<String>) -> Self {
        Error::Conflict {
            field: String::new(),
            type_name: type_name.into(),
        }
    }

    /// Creates a `Json` error from a path-aware serde error.
    pub fn json(err: &serde_path_to_error::Error<serde_json::Error>) -> Self {
        Error::Json {
            field: String::new(),
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }

    /// Creates a `Json` error for a type that cannot be decoded from JSON.
    pub fn json_unsupported(type_name: &str) -> Self {
        Error::Json {
            field: String::new(),
            path: ".".to_string(),
            message: format!("{type_name} does not support JSON decoding"),
        }
    }

    /// Creates a `Decode` error without a field name.
    pub fn decode(source: BoxError) -> Self {
        Error::Decode {
            field: String::new(),
            source,
        }
    }

    /// Fills in the originating field for errors raised by the converter.
    ///
    /// The converter does not know which field it is working on when it
    /// recurses into list elements or option targets, so the loader attaches
    /// it afterwards. A field name that is already set is kept. Values of
    /// secret fields are masked.
    #[must_use]
    pub fn for_field(self, meta: &FieldMeta, secret: bool) -> Self {
        match self {
            Error::Convert {
                field,
                type_name,
                value,
            } => Error::Convert {
                field: or_name(field, meta),
                type_name,
                value: MaybeRedacted::new(value.value, value.secret || secret),
            },

            Error::Conflict { field, type_name } => Error::Conflict {
                field: or_name(field, meta),
                type_name: if type_name.is_empty() {
                    meta.type_name().to_string()
                } else {
                    type_name
                },
            },

            Error::Json {
                field,
                path,
                message,
            } => Error::Json {
                field: or_name(field, meta),
                path,
                message,
            },

            Error::Decode { field, source } => Error::Decode {
                field: or_name(field, meta),
                source,
            },

            other => other,
        }
    }

    /// Returns the field name carried by the error, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::TagParse { field, .. }
            | Error::Convert { field, .. }
            | Error::Conflict { field, .. }
            | Error::Json { field, .. }
            | Error::Decode { field, .. } => Some(field.as_str()).filter(|f| !f.is_empty()),
            _ => None,
        }
    }
}

fn or_name(field: String, meta: &FieldMeta) -> String {
    if field.is_empty() {
        meta.name().to_string()
    } else {
        field
    }
}
