//! Value conversion from store text into typed fields.
//!
//! Every bindable field type implements [`Bind`], which describes the
//! field's shape as a [`Target`]. The converter dispatches on that shape:
//!
//! 1. **Custom** - the type's own [`DecodeParameter`] implementation
//! 2. **JSON** - when the annotation has the `json` option
//! 3. **Duration** - unit-suffixed text, or a raw nanosecond count
//! 4. **Optional** - a fresh inner value is allocated and converted
//! 5. **Sequence** - comma-separated text, converted element by element
//! 6. **Text**, **Bool**, **Signed**, **Unsigned**, **Float** - scalars
//! 7. **Unsupported** - nothing is assigned and no error is raised
//!
//! # Adding Types
//!
//! Implement [`DecodeParameter`] and register the type with
//! [`custom_parameter!`](crate::custom_parameter), or register a serde type
//! that is only ever decoded from JSON with
//! [`json_parameter!`](crate::json_parameter):
//!
//! ```rust
//! use paramstore::{custom_parameter, json_parameter, BoxError, DecodeParameter};
//! use serde::Deserialize;
//!
//! #[derive(Default)]
//! struct Upper(String);
//!
//! impl DecodeParameter for Upper {
//!     fn decode_parameter(&mut self, value: &str) -> Result<(), BoxError> {
//!         self.0 = value.to_uppercase();
//!         Ok(())
//!     }
//! }
//! custom_parameter!(Upper);
//!
//! #[derive(Default, Deserialize)]
//! struct Endpoint { host: String, port: u16 }
//! json_parameter!(Endpoint);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use num_traits::{NumCast, ToPrimitive};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::duration::parse_duration;
use crate::error::{BoxError, Error};

/// Outcome of a successful conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// The field was assigned.
    Assigned,
    /// The field's shape has no text conversion; nothing was assigned.
    Unsupported,
}

/// A type that decodes itself from parameter text.
///
/// Takes precedence over every built-in conversion, and cannot be combined
/// with the `json` option.
pub trait DecodeParameter {
    /// Replaces `self` with the value decoded from `value`.
    ///
    /// # Errors
    ///
    /// Any error is reported as [`Error::Decode`] for the field.
    fn decode_parameter(&mut self, value: &str) -> Result<(), BoxError>;
}

/// A numeric field, assigned after parsing at 64-bit width.
///
/// Each setter returns `false` when the value does not fit the field's
/// width.
pub trait Numeric {
    /// Name of the concrete numeric type.
    fn type_name(&self) -> &'static str;

    /// Assigns a signed value.
    fn set_i64(&mut self, value: i64) -> bool;

    /// Assigns an unsigned value.
    fn set_u64(&mut self, value: u64) -> bool;

    /// Assigns a floating point value.
    fn set_f64(&mut self, value: f64) -> bool;
}

impl<T: NumCast + ToPrimitive + Copy + 'static> Numeric for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn set_i64(&mut self, value: i64) -> bool {
        match <T as NumCast>::from(value) {
            Some(cast) => {
                *self = cast;
                true
            }
            None => false,
        }
    }

    fn set_u64(&mut self, value: u64) -> bool {
        match <T as NumCast>::from(value) {
            Some(cast) => {
                *self = cast;
                true
            }
            None => false,
        }
    }

    fn set_f64(&mut self, value: f64) -> bool {
        let Some(cast) = <T as NumCast>::from(value) else {
            return false;
        };

        // Narrowing a finite value must not saturate to infinity.
        if value.is_finite() && cast.to_f64().is_some_and(f64::is_infinite) {
            return false;
        }

        *self = cast;
        true
    }
}

/// An `Option<T>` field, seen through its inner type.
pub trait OptionalTarget {
    /// Allocates a fresh inner value, converts `text` into it and stores it,
    /// even when the conversion fails.
    ///
    /// # Errors
    ///
    /// Returns the inner conversion's error.
    fn convert_inner(&mut self, text: &str) -> Result<Conversion, Error>;
}

/// A `Vec<T>` field, seen through its element type.
pub trait SequenceTarget {
    /// Replaces the contents with one converted element per part.
    ///
    /// # Errors
    ///
    /// Returns the first element conversion error.
    fn convert_elements(&mut self, parts: &[&str]) -> Result<Conversion, Error>;
}

/// The shape of a bindable field.
pub enum Target<'a> {
    /// Decoded by the type itself.
    Custom(&'a mut dyn DecodeParameter),
    /// A [`Duration`].
    Duration(&'a mut Duration),
    /// An `Option<T>`.
    Optional(&'a mut dyn OptionalTarget),
    /// A `Vec<T>`.
    Sequence(&'a mut dyn SequenceTarget),
    /// A `String`.
    Text(&'a mut String),
    /// A `bool`.
    Bool(&'a mut bool),
    /// A signed integer of any width.
    Signed(&'a mut dyn Numeric),
    /// An unsigned integer of any width.
    Unsigned(&'a mut dyn Numeric),
    /// A floating point number of any width.
    Float(&'a mut dyn Numeric),
    /// No text conversion exists for this shape.
    Unsupported,
}

/// A field type the loader can assign.
///
/// Implemented for the built-in scalar types, [`Duration`], `Option<T>`,
/// `Vec<T>` and a few JSON-only types. Use
/// [`custom_parameter!`](crate::custom_parameter) or
/// [`json_parameter!`](crate::json_parameter) to register your own.
pub trait Bind {
    /// The field's shape.
    fn target(&mut self) -> Target<'_>;

    /// Decodes JSON text into the field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when the text is not valid JSON for the type.
    /// The default implementation rejects JSON altogether.
    fn decode_json(&mut self, text: &str) -> Result<(), Error> {
        let _ = text;
        Err(Error::json_unsupported("this type"))
    }
}

// ============================================================================
// Conversion entry points
// ============================================================================

/// Converts `text` into `slot`, honoring the `json` option.
///
/// # Errors
///
/// - [`Error::Conflict`] when `json` is set on a custom-decoded type
/// - [`Error::Json`] when JSON decoding fails
/// - [`Error::Convert`] when the text does not fit the target type
/// - [`Error::Decode`] when a custom decoder fails
pub fn convert(slot: &mut dyn Bind, text: &str, json: bool) -> Result<Conversion, Error> {
    if json {
        if matches!(slot.target(), Target::Custom(_)) {
            return Err(Error::conflict(""));
        }

        slot.decode_json(text)?;
        return Ok(Conversion::Assigned);
    }

    convert_text(slot, text)
}

fn convert_text(slot: &mut dyn Bind, text: &str) -> Result<Conversion, Error> {
    match slot.target() {
        Target::Custom(decoder) => decoder.decode_parameter(text).map_err(Error::decode)?,

        Target::Duration(duration) => *duration = parse_duration_or_nanos(text)?,

        Target::Optional(optional) => {
            optional.convert_inner(text)?;
        }

        Target::Sequence(sequence) => {
            let parts: Vec<&str> = text.split(',').collect();
            sequence.convert_elements(&parts)?;
        }

        Target::Text(value) => {
            value.clear();
            value.push_str(text);
        }

        Target::Bool(value) => {
            *value = parse_bool(text).ok_or_else(|| Error::convert("bool", text))?;
        }

        Target::Signed(number) => {
            let type_name = number.type_name();
            let parsed: i64 = text
                .parse()
                .map_err(|_| Error::convert(type_name, text))?;
            if !number.set_i64(parsed) {
                return Err(Error::convert(type_name, text));
            }
        }

        Target::Unsigned(number) => {
            let type_name = number.type_name();
            // Unsigned text carries no sign at all.
            if text.starts_with('+') {
                return Err(Error::convert(type_name, text));
            }
            let parsed: u64 = text
                .parse()
                .map_err(|_| Error::convert(type_name, text))?;
            if !number.set_u64(parsed) {
                return Err(Error::convert(type_name, text));
            }
        }

        Target::Float(number) => {
            let type_name = number.type_name();
            let parsed: f64 = text
                .parse()
                .map_err(|_| Error::convert(type_name, text))?;
            if parsed.is_infinite() && !is_infinity_literal(text) {
                return Err(Error::convert(type_name, text));
            }
            if !number.set_f64(parsed) {
                return Err(Error::convert(type_name, text));
            }
        }

        Target::Unsupported => return Ok(Conversion::Unsupported),
    }

    Ok(Conversion::Assigned)
}

/// Parses canonical boolean text.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True`, `0`, `f`, `F`, `FALSE`,
/// `false` and `False`.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Parses unit-suffixed duration text, falling back to a nanosecond count.
///
/// # Errors
///
/// Returns [`Error::Convert`] naming `Duration` when neither form parses.
pub fn parse_duration_or_nanos(text: &str) -> Result<Duration, Error> {
    parse_duration(text)
        .or_else(|_| text.parse::<u64>().map(Duration::from_nanos))
        .map_err(|_| Error::convert("Duration", text))
}

/// Decodes JSON text into any deserializable value, tracking the path of
/// the first failure.
///
/// # Errors
///
/// Returns [`Error::Json`] with the failing path and message.
pub fn decode_json_into<T: DeserializeOwned>(slot: &mut T, text: &str) -> Result<(), Error> {
    let mut deserializer = serde_json::Deserializer::from_str(text);

    let value: T =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Error::json(&e))?;

    deserializer.end().map_err(|e| Error::Json {
        field: String::new(),
        path: ".".to_string(),
        message: e.to_string(),
    })?;

    *slot = value;
    Ok(())
}

// ============================================================================
// Built-in Bind implementations
// ============================================================================

macro_rules! impl_bind_numeric {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Bind for $ty {
                fn target(&mut self) -> Target<'_> {
                    Target::$variant(self)
                }

                fn decode_json(&mut self, text: &str) -> Result<(), Error> {
                    decode_json_into(self, text)
                }
            }
        )+
    };
}

impl_bind_numeric!(Signed => i8, i16, i32, i64, isize);
impl_bind_numeric!(Unsigned => u8, u16, u32, u64, usize);
impl_bind_numeric!(Float => f32, f64);

impl Bind for bool {
    fn target(&mut self) -> Target<'_> {
        Target::Bool(self)
    }

    fn decode_json(&mut self, text: &str) -> Result<(), Error> {
        decode_json_into(self, text)
    }
}

impl Bind for String {
    fn target(&mut self) -> Target<'_> {
        Target::Text(self)
    }

    fn decode_json(&mut self, text: &str) -> Result<(), Error> {
        decode_json_into(self, text)
    }
}

impl Bind for Duration {
    fn target(&mut self) -> Target<'_> {
        Target::Duration(self)
    }

    fn decode_json(&mut self, text: &str) -> Result<(), Error> {
        let mut value = Value::Null;
        decode_json_into(&mut value, text)?;

        *self = match &value {
            Value::Number(n) => n
                .as_u64()
                .map(Duration::from_nanos)
                .ok_or_else(|| Error::convert("Duration", n.to_string()))?,
            Value::String(s) => parse_duration_or_nanos(s)?,
            other => return Err(Error::convert("Duration", other.to_string())),
        };

        Ok(())
    }
}

impl<T: Bind + Default> OptionalTarget for Option<T> {
    fn convert_inner(&mut self, text: &str) -> Result<Conversion, Error> {
        let mut value = T::default();
        let result = convert_text(&mut value, text);
        *self = Some(value);

        result.map(|_| Conversion::Assigned)
    }
}

impl<T: Bind + Default> Bind for Option<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Optional(self)
    }

    fn decode_json(&mut self, text: &str) -> Result<(), Error> {
        if text.trim() == "null" {
            *self = None;
            return Ok(());
        }

        let mut value = T::default();
        let result = value.decode_json(text);
        *self = Some(value);

        result
    }
}

impl<T: Bind + Default> SequenceTarget for Vec<T> {
    fn convert_elements(&mut self, parts: &[&str]) -> Result<Conversion, Error> {
        self.clear();
        self.resize_with(parts.len(), T::default);

        for (element, part) in self.iter_mut().zip(parts) {
            convert_text(element, part)?;
        }

        Ok(Conversion::Assigned)
    }
}

impl<T: Bind + Default> Bind for Vec<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Sequence(self)
    }

    fn decode_json(&mut self, text: &str) -> Result<(), Error> {
        let mut elements: Vec<Value> = Vec::new();
        decode_json_into(&mut elements, text)?;

        let mut decoded = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let mut value = T::default();
            value
                .decode_json(&element.to_string())
                .map_err(|err| prefix_json_path(err, index))?;
            decoded.push(value);
        }

        *self = decoded;
        Ok(())
    }
}

fn prefix_json_path(err: Error, index: usize) -> Error {
    match err {
        Error::Json {
            field,
            path,
            message,
        } => Error::Json {
            field,
            path: if path == "." {
                format!("[{index}]")
            } else {
                format!("[{index}].{path}")
            },
            message,
        },
        other => other,
    }
}

/// Registers types as bindable through JSON decoding only.
///
/// Without the `json` option such fields are an unsupported shape: the
/// loader fetches their key but assigns nothing.
#[macro_export]
macro_rules! json_parameter {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Bind for $ty {
                fn target(&mut self) -> $crate::Target<'_> {
                    $crate::Target::Unsupported
                }

                fn decode_json(&mut self, text: &str) -> ::core::result::Result<(), $crate::Error> {
                    $crate::convert::decode_json_into(self, text)
                }
            }
        )+
    };
}

/// Registers types implementing [`DecodeParameter`] as bindable.
///
/// Combining such a field with the `json` option is an
/// [`Error::Conflict`].
#[macro_export]
macro_rules! custom_parameter {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Bind for $ty {
                fn target(&mut self) -> $crate::Target<'_> {
                    $crate::Target::Custom(self)
                }

                fn decode_json(&mut self, _text: &str) -> ::core::result::Result<(), $crate::Error> {
                    ::core::result::Result::Err($crate::Error::conflict(stringify!($ty)))
                }
            }
        )+
    };
}

json_parameter!(Value, HashMap<String, String>, BTreeMap<String, String>);
