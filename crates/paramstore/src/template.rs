//! Key template rendering.
//!
//! Keys may embed placeholders resolved against the caller's template
//! parameters before the key is sent to the store:
//!
//! | Placeholder | Resolves to |
//! |-------------|-------------|
//! | `{{.env}}` | field `env` of the parameters |
//! | `{{ .env }}` | same, whitespace inside the braces is ignored |
//! | `{{.db.name}}` | nested lookup through objects |
//! | `{{.}}` | the parameters value itself |
//!
//! Only scalar values (strings, numbers, booleans) can be rendered.

use std::ops::Range;

use serde_json::Value;
use thiserror::Error as ThisError;

/// Why a template could not be rendered.
///
/// Render failures are not fatal to a load: the tag parser keeps the
/// original key text.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` without a matching `}}`.
    #[error("unclosed action starting at byte {0}")]
    Unclosed(usize),

    /// An action that is not a `.`-rooted field path.
    #[error("invalid action '{0}'")]
    InvalidAction(String),

    /// The path does not exist in the parameters.
    #[error("no value for '{0}'")]
    MissingValue(String),

    /// The path resolves to an object, array or null.
    #[error("value for '{0}' is not a scalar")]
    NotScalar(String),
}

/// A parsed template fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    /// Literal text, as a range into the template.
    Literal(Range<usize>),
    /// A field path; empty for `{{.}}`.
    Field(Vec<String>),
}

fn tokenize(template: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = template[pos..].find("{{") {
        let open = pos + found;
        if open > pos {
            tokens.push(Token::Literal(pos..open));
        }

        let body_start = open + 2;
        let close = template[body_start..]
            .find("}}")
            .map(|i| body_start + i)
            .ok_or(TemplateError::Unclosed(open))?;

        tokens.push(Token::Field(parse_action(&template[body_start..close])?));
        pos = close + 2;
    }

    if pos < template.len() {
        tokens.push(Token::Literal(pos..template.len()));
    }

    Ok(tokens)
}

fn parse_action(action: &str) -> Result<Vec<String>, TemplateError> {
    let trimmed = action.trim();
    let path = trimmed
        .strip_prefix('.')
        .ok_or_else(|| TemplateError::InvalidAction(trimmed.to_string()))?;

    if path.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
    let valid = segments.iter().all(|s| {
        !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    });

    if valid {
        Ok(segments)
    } else {
        Err(TemplateError::InvalidAction(trimmed.to_string()))
    }
}

fn lookup<'v>(params: &'v Value, path: &[String]) -> Result<&'v Value, TemplateError> {
    path.iter().try_fold(params, |value, segment| {
        value
            .get(segment.as_str())
            .ok_or_else(|| TemplateError::MissingValue(format!(".{}", path.join("."))))
    })
}

fn write_scalar(out: &mut String, value: &Value, path: &[String]) -> Result<(), TemplateError> {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(TemplateError::NotScalar(format!(".{}", path.join("."))));
        }
    }

    Ok(())
}

/// Renders `template` against `params`.
///
/// # Errors
///
/// Returns a [`TemplateError`] when the template is malformed or a
/// placeholder cannot be resolved to a scalar.
///
/// # Example
///
/// ```rust
/// use paramstore::template::render;
/// use serde_json::json;
///
/// let params = json!({ "env": "prod" });
/// assert_eq!(render("/{{.env}}/db/password", &params).unwrap(), "/prod/db/password");
/// ```
pub fn render(template: &str, params: &Value) -> Result<String, TemplateError> {
    let tokens = tokenize(template)?;
    let mut out = String::with_capacity(template.len());

    for token in &tokens {
        match token {
            Token::Literal(range) => out.push_str(&template[range.clone()]),
            Token::Field(path) => write_scalar(&mut out, lookup(params, path)?, path)?,
        }
    }

    Ok(out)
}

/// Whether `text` contains a placeholder opener.
#[must_use]
pub fn has_placeholders(text: &str) -> bool {
    text.contains("{{")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render("/app/key", &json!({})).unwrap(), "/app/key");
        assert!(!has_placeholders("/app/key"));
    }

    #[test]
    fn test_named_and_spaced_placeholders() {
        let params = json!({ "env": "dev", "region": "eu" });

        assert_eq!(
            render("/{{.env}}/{{ .region }}/key", &params).unwrap(),
            "/dev/eu/key"
        );
    }

    #[test]
    fn test_nested_lookup_and_scalars() {
        let params = json!({ "db": { "shard": 3, "primary": true } });

        assert_eq!(
            render("/db/{{.db.shard}}/{{.db.primary}}", &params).unwrap(),
            "/db/3/true"
        );
    }

    #[test]
    fn test_dot_renders_whole_value() {
        assert_eq!(render("/svc/{{.}}", &json!("api")).unwrap(), "/svc/api");
    }

    #[test]
    fn test_failures() {
        let params = json!({ "env": "dev", "list": [1, 2] });

        assert_eq!(
            render("/{{.env", &params),
            Err(TemplateError::Unclosed(1))
        );
        assert_eq!(
            render("/{{env}}", &params),
            Err(TemplateError::InvalidAction("env".to_string()))
        );
        assert_eq!(
            render("/{{.missing}}", &params),
            Err(TemplateError::MissingValue(".missing".to_string()))
        );
        assert_eq!(
            render("/{{.list}}", &params),
            Err(TemplateError::NotScalar(".list".to_string()))
        );
        assert!(matches!(
            render("/{{.a..b}}", &params),
            Err(TemplateError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_single_braces_are_literal() {
        assert_eq!(render("/{a}/}}", &json!({})).unwrap(), "/{a}/}}");
    }
}
