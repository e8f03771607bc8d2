//! # paramstore
//!
//! Annotation-driven binding of Rust structs from a remote key-value
//! parameter store.
//!
//! `paramstore` fills the fields of a record from parameters held in a
//! store such as AWS Systems Manager Parameter Store. Each field names its
//! remote key in a `#[param]` attribute; keys may embed placeholders that
//! are rendered against runtime parameters, values can be fetched with
//! decryption, and JSON-encoded values decode straight into structs.
//!
//! ## Features
//!
//! - **Compile-time registration** - `#[derive(Parameters)]` records each field once
//! - **Batched fetching** - Keys are fetched ten at a time, plain before decrypted
//! - **Key templates** - `{{.env}}`-style placeholders in keys
//! - **Typed conversion** - Integers, floats, booleans, strings, durations,
//!   options, lists, JSON and custom decoders
//! - **Secret masking** - Values of `decrypt` fields never appear in errors
//! - **Drift detection** - A background watcher reports when bound values change
//! - **Rich diagnostics** - Error codes and help text via [`miette`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use paramstore::{Loader, Parameters};
//! use paramstore::store::MemoryStore;
//!
//! #[derive(Default, Parameters)]
//! struct Config {
//!     #[param("/{{.env}}/db/url")]
//!     db_url: String,
//!
//!     #[param("/{{.env}}/db/password,decrypt")]
//!     db_password: String,
//!
//!     #[param("/{{.env}}/http/timeout")]
//!     timeout: Duration,
//!
//!     #[param("/{{.env}}/http/allowed_ports")]
//!     allowed_ports: Vec<u16>,
//! }
//!
//! let store = MemoryStore::new()
//!     .with("/prd/db/url", "postgres://db")
//!     .with_secure("/prd/db/password", "hunter2")
//!     .with("/prd/http/timeout", "30s")
//!     .with("/prd/http/allowed_ports", "80,443");
//!
//! let mut config = Config::default();
//! Loader::new(&store)
//!     .load_with_parameters(&mut config, &serde_json::json!({ "env": "prd" }))
//!     .unwrap();
//!
//! assert_eq!(config.db_password, "hunter2");
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.allowed_ports, vec![80, 443]);
//! ```
//!
//! ## Annotation Syntax
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[param("/app/key")]` | Bind the field to `/app/key` |
//! | `#[param("/app/key,decrypt")]` | Fetch the value with decryption |
//! | `#[param("/app/key,json")]` | Decode the value as JSON |
//! | `#[param("/{{.env}}/key")]` | Render the key against template parameters |
//! | `#[param("-")]` | Skip the field |
//! | `#[param(flatten)]` | Walk a nested `Parameters` record |
//!
//! Fields without `#[param]` are never touched.
//!
//! ## Error Handling
//!
//! Loading stops at the first error. All errors implement
//! [`miette::Diagnostic`]:
//!
//! ```rust,ignore
//! if let Err(e) = Loader::new(&store).load(&mut config) {
//!     eprintln!("{:?}", miette::Report::from(e));
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Lets the derive's `::paramstore::` paths resolve inside this crate.
extern crate self as paramstore;

// Re-export the derive macro
pub use paramstore_macro::Parameters;

/// Re-export miette for error handling.
pub use miette;

/// Re-export `serde_json` for building template parameters.
pub use serde_json;

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::{BoxError, Error, MaybeRedacted};

/// A Result type that displays errors with miette's fancy formatting.
///
/// ```rust,ignore
/// fn main() -> paramstore::Result<()> {
///     Loader::new(&store).load(&mut config)?;
///     Ok(())
/// }
/// ```
pub type Result<T> = miette::Result<T>;

mod tag;
pub use tag::Tag;

pub mod template;

mod walk;
pub use walk::{Binding, FieldMeta, Parameters, Walker};

pub mod batch;

pub mod duration;

pub mod convert;
pub use convert::{Bind, Conversion, DecodeParameter, Target};

pub mod fingerprint;
pub use fingerprint::Fingerprint;

pub mod store;

mod loader;
pub use loader::{Loader, MAX_PARAMETERS, load, load_with_parameters};

pub mod watch;
pub use watch::{WatchError, WatchHandle, Watcher};
