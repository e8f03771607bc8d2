//! Field code generators.
//!
//! Each registered field becomes a [`FieldGenerator`] that emits one
//! statement of the generated `walk` body. [`FieldFactory`] picks the
//! generator from the field's `#[param]` attribute and its type.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Field, GenericArgument, Ident, PathArguments, Result as SynResult, Type};

use crate::parse::ParamAttr;

mod flatten;
mod leaf;

pub use flatten::FlattenField;
pub use leaf::LeafField;

/// Emits the walk statement of one field.
pub trait FieldGenerator {
    /// The statement registering the field with `__walker`.
    fn generate_walk(&self) -> QuoteStream;
}

/// Builds field generators from struct fields.
pub struct FieldFactory;

impl FieldFactory {
    /// Returns the generator for `field`, or `None` when the field carries
    /// no `#[param]` attribute.
    pub fn parse_field(field: &Field) -> SynResult<Option<Box<dyn FieldGenerator>>> {
        let Some(attr) = ParamAttr::parse_from_field(field)? else {
            return Ok(None);
        };

        // Named fields always have an identifier.
        let Some(name) = field.ident.clone() else {
            return Ok(None);
        };

        let optional = Self::extract_option_inner(&field.ty).is_some();

        let generator: Box<dyn FieldGenerator> = match attr {
            ParamAttr::Annotation(annotation) => Box::new(LeafField {
                name,
                ty: field.ty.clone(),
                annotation,
                optional,
            }),

            ParamAttr::Flatten => Box::new(FlattenField { name, optional }),
        };

        Ok(Some(generator))
    }

    /// Extracts the inner type from `Option<T>`.
    ///
    /// Matches `Option<T>`, `std::option::Option<T>` and
    /// `core::option::Option<T>` by the last path segment.
    pub fn extract_option_inner(ty: &Type) -> Option<&Type> {
        let Type::Path(type_path) = ty else {
            return None;
        };

        let segment = type_path.path.segments.last()?;

        if segment.ident != "Option" {
            return None;
        }

        let PathArguments::AngleBracketed(args) = &segment.arguments else {
            return None;
        };

        let GenericArgument::Type(inner) = args.args.first()? else {
            return None;
        };

        Some(inner)
    }
}

/// The field name as it appears in errors, without any `r#` prefix.
pub fn field_label(name: &Ident) -> String {
    name.unraw().to_string()
}

/// The declared type as compact text, e.g. `Option<Vec<u8>>`.
pub fn type_label(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}
