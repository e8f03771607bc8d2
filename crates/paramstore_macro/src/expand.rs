//! Macro expansion for `#[derive(Parameters)]`.
//!
//! The generated implementation walks every registered field in
//! declaration order:
//!
//! ```rust,ignore
//! impl ::paramstore::Parameters for Config {
//!     fn walk<'__a>(
//!         &'__a mut self,
//!         __walker: &mut ::paramstore::Walker<'__a, '_>,
//!     ) -> ::core::result::Result<(), ::paramstore::Error> {
//!         __walker.field(::paramstore::FieldMeta::new("port", "u16"), "/app/port", &mut self.port)?;
//!         __walker.nested(&mut self.database)?;
//!         ::core::result::Result::Ok(())
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Error as SynError, Field, Fields, Result as SynResult};

use crate::field::{FieldFactory, FieldGenerator};

/// The main orchestrator for macro expansion.
pub struct Expander;

impl Expander {
    /// Main entry point for expanding the derive macro.
    pub fn expand(input: &DeriveInput) -> SynResult<TokenStream> {
        let struct_name = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

        let fields = Self::extract_struct_fields(input)?;

        let generators: Vec<Box<dyn FieldGenerator>> = fields
            .iter()
            .map(FieldFactory::parse_field)
            .collect::<SynResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        let walks = generators.iter().map(|g| g.generate_walk());

        let expanded = quote! {
            impl #impl_generics ::paramstore::Parameters for #struct_name #ty_generics #where_clause {
                fn walk<'__a>(
                    &'__a mut self,
                    __walker: &mut ::paramstore::Walker<'__a, '_>,
                ) -> ::core::result::Result<(), ::paramstore::Error> {
                    #(#walks)*
                    ::core::result::Result::Ok(())
                }
            }
        };

        Ok(expanded.into())
    }

    /// Validates and extracts named fields from the input.
    fn extract_struct_fields(input: &DeriveInput) -> SynResult<&Punctuated<Field, Comma>> {
        match &input.data {
            Data::Struct(data_struct) => match &data_struct.fields {
                Fields::Named(fields_named) => Ok(&fields_named.named),

                Fields::Unnamed(_) => Err(SynError::new_spanned(
                    input,
                    "Parameters does not support tuple structs",
                )),

                Fields::Unit => Err(SynError::new_spanned(
                    input,
                    "Parameters does not support unit structs",
                )),
            },

            Data::Enum(_) => Err(SynError::new_spanned(
                input,
                "Parameters can only be derived for structs, not enums",
            )),

            Data::Union(_) => Err(SynError::new_spanned(
                input,
                "Parameters can only be derived for structs, not unions",
            )),
        }
    }
}
