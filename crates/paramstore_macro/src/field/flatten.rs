//! Flatten field implementation.
//!
//! This module provides [`FlattenField`], the code generator for nested
//! records walked in place of the parent.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[derive(Default, Parameters)]
//! struct Database {
//!     #[param("/db/host")]
//!     host: String,
//! }
//!
//! #[derive(Default, Parameters)]
//! struct App {
//!     #[param(flatten)]
//!     database: Database,
//!
//!     #[param(flatten)]
//!     replica: Option<Database>,
//! }
//! ```
//!
//! # Generated Code Pattern
//!
//! ```rust,ignore
//! __walker.nested(&mut self.database)?;
//! __walker.optional_nested(&mut self.replica)?;
//! ```
//!
//! Nested keys are not prefixed: every nested field names its full key.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::Ident;

use super::FieldGenerator;

/// A nested record field.
///
/// The nested type must also implement `Parameters`. An `Option` of it is
/// filled with `Default::default()` before walking.
pub struct FlattenField {
    /// The struct field name
    pub name: Ident,

    /// Whether the type is `Option<R>`
    pub optional: bool,
}

impl FieldGenerator for FlattenField {
    fn generate_walk(&self) -> QuoteStream {
        let name = &self.name;

        if self.optional {
            quote! { __walker.optional_nested(&mut self.#name)?; }
        } else {
            quote! { __walker.nested(&mut self.#name)?; }
        }
    }
}
