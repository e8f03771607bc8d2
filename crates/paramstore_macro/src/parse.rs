//! Attribute parsing for `#[param("...")]` and `#[param(flatten)]`.
//!
//! The annotation string is carried verbatim to the runtime, which parses
//! the key and its options and renders templates. Only the attribute's
//! shape is checked here.
//!
//! # Supported Syntax
//!
//! ```ignore
//! #[param("/app/key")]             // Leaf field
//! #[param("/app/key,decrypt")]     // Options are runtime text
//! #[param("-")]                    // Skipped at runtime
//! #[param(flatten)]                // Nested record
//! ```

use syn::parse::ParseStream;
use syn::{Attribute, Error as SynError, Field, Ident, LitStr, Result as SynResult};

/// A parsed `#[param(...)]` attribute.
pub enum ParamAttr {
    /// `#[param("...")]`
    Annotation(LitStr),

    /// `#[param(flatten)]`
    Flatten,
}

impl ParamAttr {
    /// Parses the `#[param]` attribute of a field, if any.
    ///
    /// A field may carry at most one.
    pub fn parse_from_field(field: &Field) -> SynResult<Option<Self>> {
        let mut found: Option<(Self, &Attribute)> = None;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("param")) {
            if let Some((_, first)) = &found {
                let mut err = SynError::new_spanned(attr, "duplicate `#[param]` attribute");
                err.combine(SynError::new_spanned(first, "first `#[param]` attribute here"));
                return Err(err);
            }

            found = Some((attr.parse_args_with(Self::parse_args)?, attr));
        }

        Ok(found.map(|(parsed, _)| parsed))
    }

    fn parse_args(input: ParseStream) -> SynResult<Self> {
        if input.peek(LitStr) {
            return Ok(Self::Annotation(input.parse()?));
        }

        let ident: Ident = input.parse().map_err(|e| {
            SynError::new(
                e.span(),
                "expected an annotation string like `\"/app/key\"` or `flatten`",
            )
        })?;

        if ident == "flatten" {
            Ok(Self::Flatten)
        } else {
            Err(SynError::new_spanned(
                &ident,
                format!("unknown option `{ident}`, expected an annotation string or `flatten`"),
            ))
        }
    }
}
