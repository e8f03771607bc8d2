//! Leaf field implementation.
//!
//! A leaf field is bound to one remote key:
//!
//! ```rust,ignore
//! #[param("/{{.env}}/db/port")]
//! port: u16,
//!
//! #[param("/{{.env}}/db/password,decrypt")]
//! password: Option<String>,
//! ```
//!
//! # Generated Code Pattern
//!
//! ```rust,ignore
//! __walker.field(::paramstore::FieldMeta::new("port", "u16"), "/{{.env}}/db/port", &mut self.port)?;
//! __walker.optional_field(
//!     ::paramstore::FieldMeta::new("password", "Option<String>"),
//!     "/{{.env}}/db/password,decrypt",
//!     &mut self.password,
//! )?;
//! ```

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Ident, LitStr, Type};

use super::{FieldGenerator, field_label, type_label};

/// A field bound to a remote key.
pub struct LeafField {
    /// The struct field name
    pub name: Ident,

    /// The field's declared type
    pub ty: Type,

    /// The annotation string, passed to the runtime verbatim
    pub annotation: LitStr,

    /// Whether the type is `Option<T>`, eagerly filled before binding
    pub optional: bool,
}

impl FieldGenerator for LeafField {
    fn generate_walk(&self) -> QuoteStream {
        let name = &self.name;
        let label = field_label(name);
        let type_name = type_label(&self.ty);
        let annotation = &self.annotation;

        let method = if self.optional {
            quote!(optional_field)
        } else {
            quote!(field)
        };

        quote! {
            __walker.#method(
                ::paramstore::FieldMeta::new(#label, #type_name),
                #annotation,
                &mut self.#name,
            )?;
        }
    }
}
