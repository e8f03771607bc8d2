//! Derive macro for `paramstore`.
//!
//! This crate provides `#[derive(Parameters)]`, which registers a struct's
//! annotated fields with the `paramstore` runtime at compile time. Use it
//! through the `paramstore` crate, which re-exports it.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// Internal modules - not exposed publicly
mod expand;
mod field;
mod parse;

/// Derive macro binding a struct from a parameter store.
///
/// Generates an implementation of `paramstore::Parameters` that hands each
/// annotated field to the loader, in declaration order.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[param("/key")]` | Bind the field to a remote key |
/// | `#[param("/key,decrypt")]` | Fetch with decryption |
/// | `#[param("/key,json")]` | Decode the value as JSON |
/// | `#[param("/{{.env}}/key")]` | Key rendered against template parameters |
/// | `#[param("-")]` | Skip the field |
/// | `#[param(flatten)]` | Walk a nested `Parameters` struct in place |
///
/// Fields without `#[param]` are not registered. `Option<T>` fields are
/// filled with `T::default()` before binding, so `T` must implement
/// `Default`.
///
/// # Example
///
/// ```rust,ignore
/// use paramstore::Parameters;
///
/// #[derive(Default, Parameters)]
/// struct Database {
///     #[param("/{{.env}}/db/url")]
///     url: String,
///
///     #[param("/{{.env}}/db/password,decrypt")]
///     password: Option<String>,
/// }
///
/// #[derive(Default, Parameters)]
/// struct Config {
///     #[param(flatten)]
///     database: Database,
///
///     #[param("/{{.env}}/features,json")]
///     features: serde_json::Value,
/// }
/// ```
///
/// # Supported Types
///
/// Only structs with named fields. Enums, unions, tuple structs and unit
/// structs are rejected at compile time.
#[proc_macro_derive(Parameters, attributes(param))]
pub fn derive_parameters(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand::Expander::expand(&input).unwrap_or_else(|err| err.to_compile_error().into())
}
