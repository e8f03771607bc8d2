//! Field annotation parsing.
//!
//! An annotation has the form `<key-or-template>[,<option>...]`. The key is
//! trimmed and, when template parameters are present, rendered through
//! [`template::render`](crate::template::render). Recognized options are
//! `decrypt` and `json`; they are matched case-sensitively and anything
//! else is ignored.

use serde_json::Value;

use crate::error::Error;
use crate::template;

/// A parsed field annotation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag {
    /// The resolved remote key.
    pub key: String,

    /// Fetch the value with decryption.
    pub decrypt: bool,

    /// Decode the value as JSON.
    pub json: bool,
}

impl Tag {
    /// Parses an annotation.
    ///
    /// Returns `Ok(None)` for an empty annotation or `"-"`, which exclude
    /// the field from binding.
    ///
    /// A template that fails to render leaves the key as written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagParse`] when the key part is empty after
    /// trimming.
    ///
    /// # Example
    ///
    /// ```rust
    /// use paramstore::Tag;
    /// use serde_json::json;
    ///
    /// let params = json!({ "env": "prod" });
    /// let tag = Tag::parse("/{{.env}}/token, decrypt", "token", Some(&params))
    ///     .unwrap()
    ///     .unwrap();
    ///
    /// assert_eq!(tag.key, "/prod/token");
    /// assert!(tag.decrypt);
    /// assert!(!tag.json);
    /// ```
    pub fn parse(
        annotation: &str,
        field: &str,
        params: Option<&Value>,
    ) -> Result<Option<Self>, Error> {
        if annotation.is_empty() || annotation == "-" {
            return Ok(None);
        }

        let mut parts = annotation.split(',');
        let key = parts.next().unwrap_or_default().trim();

        if key.is_empty() {
            return Err(Error::tag_parse(annotation, field));
        }

        let mut tag = Tag {
            key: resolve_key(key, params),
            ..Tag::default()
        };

        for option in parts {
            match option.trim() {
                "decrypt" => tag.decrypt = true,
                "json" => tag.json = true,
                _ => {}
            }
        }

        Ok(Some(tag))
    }
}

fn resolve_key(key: &str, params: Option<&Value>) -> String {
    let Some(params) = params.filter(|_| template::has_placeholders(key)) else {
        return key.to_string();
    };

    match template::render(key, params) {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::trace!(key, error = %err, "template render failed, keeping key as written");
            key.to_string()
        }
    }
}
