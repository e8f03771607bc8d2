//! Record traversal.
//!
//! `#[derive(Parameters)]` generates a [`Parameters::walk`] body that hands
//! each registered field to a [`Walker`], in declaration order. The walker
//! parses the field's annotation and records a [`Binding`]: the resolved
//! tag together with a mutable borrow of the field itself.
//!
//! Nested records marked `#[param(flatten)]` are walked in place, and their
//! bindings are spliced into the parent's list. Keys are never prefixed by
//! nesting.

use std::fmt::{self, Debug, Formatter};

use serde_json::Value;

use crate::convert::Bind;
use crate::error::Error;
use crate::tag::Tag;

/// Name and declared type of a record field, for error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldMeta {
    name: &'static str,
    type_name: &'static str,
}

impl FieldMeta {
    /// Creates field metadata.
    #[must_use]
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self { name, type_name }
    }

    /// The field's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The field's declared type, as written.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A field bound to a resolved tag.
pub struct Binding<'a> {
    /// The parsed annotation.
    pub tag: Tag,

    /// The field's metadata.
    pub field: FieldMeta,

    /// The field's storage.
    pub slot: &'a mut dyn Bind,
}

impl Debug for Binding<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("tag", &self.tag)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// A record whose fields can be bound from a parameter store.
///
/// Derive it with `#[derive(Parameters)]`:
///
/// ```rust
/// use paramstore::Parameters;
///
/// #[derive(Default, Parameters)]
/// struct Database {
///     #[param("/app/db/host")]
///     host: String,
///
///     #[param("/app/db/password,decrypt")]
///     password: String,
///
///     // Not registered, never bound.
///     pool: usize,
/// }
/// ```
pub trait Parameters {
    /// Registers every bindable field with `walker`, depth-first in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagParse`] for a malformed annotation, or
    /// [`Error::InvalidType`] when an absent record is reached.
    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), Error>;
}

impl<R: Parameters + ?Sized> Parameters for Box<R> {
    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), Error> {
        (**self).walk(walker)
    }
}

/// An absent record cannot be loaded.
impl<R: Parameters> Parameters for Option<R> {
    fn walk<'a>(&'a mut self, walker: &mut Walker<'a, '_>) -> Result<(), Error> {
        match self {
            Some(record) => record.walk(walker),
            None => Err(Error::invalid_type(None)),
        }
    }
}

/// Collects the bindings of a record.
pub struct Walker<'a, 'p> {
    params: Option<&'p Value>,
    bindings: Vec<Binding<'a>>,
}

impl<'a, 'p> Walker<'a, 'p> {
    /// Creates a walker that renders keys against `params`, if any.
    #[must_use]
    pub const fn new(params: Option<&'p Value>) -> Self {
        Self {
            params,
            bindings: Vec::new(),
        }
    }

    /// Walks `record` and returns its bindings in declaration order.
    ///
    /// # Errors
    ///
    /// Propagates the first walk failure; no bindings are returned then.
    pub fn collect<R: Parameters + ?Sized>(
        record: &'a mut R,
        params: Option<&'p Value>,
    ) -> Result<Vec<Binding<'a>>, Error> {
        let mut walker = Walker::new(params);
        record.walk(&mut walker)?;

        Ok(walker.bindings)
    }

    /// Registers a leaf field.
    ///
    /// A field whose annotation is empty or `"-"` is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagParse`] for an empty key.
    pub fn field<T: Bind>(
        &mut self,
        meta: FieldMeta,
        annotation: &str,
        slot: &'a mut T,
    ) -> Result<(), Error> {
        if let Some(tag) = Tag::parse(annotation, meta.name(), self.params)? {
            self.bindings.push(Binding {
                tag,
                field: meta,
                slot,
            });
        }

        Ok(())
    }

    /// Registers an `Option<T>` leaf field.
    ///
    /// The option is filled with `T::default()` before the annotation is
    /// parsed, even when the field ends up skipped or fails to convert.
    /// Text values bind the inner `T`; `json` values bind the option
    /// itself, so a JSON `null` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagParse`] for an empty key.
    pub fn optional_field<T: Bind + Default>(
        &mut self,
        meta: FieldMeta,
        annotation: &str,
        slot: &'a mut Option<T>,
    ) -> Result<(), Error> {
        if slot.is_none() {
            *slot = Some(T::default());
        }

        let Some(tag) = Tag::parse(annotation, meta.name(), self.params)? else {
            return Ok(());
        };

        let slot: &'a mut dyn Bind = if tag.json {
            slot
        } else {
            slot.get_or_insert_with(T::default)
        };

        self.bindings.push(Binding {
            tag,
            field: meta,
            slot,
        });

        Ok(())
    }

    /// Walks a nested record in place.
    ///
    /// # Errors
    ///
    /// Propagates the nested record's walk failure.
    pub fn nested<R: Parameters + ?Sized>(&mut self, record: &'a mut R) -> Result<(), Error> {
        record.walk(self)
    }

    /// Walks an optional nested record, allocating it first when empty.
    ///
    /// # Errors
    ///
    /// Propagates the nested record's walk failure.
    pub fn optional_nested<R: Parameters + Default>(
        &mut self,
        slot: &'a mut Option<R>,
    ) -> Result<(), Error> {
        slot.get_or_insert_with(R::default).walk(self)
    }
}
