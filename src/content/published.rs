//! Normalization of the `published` front-matter flag

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::ValidationError;

/// How strictly a `published` value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishedPolicy {
    /// Any string other than `true` (after trimming, ignoring case) means
    /// unpublished; other values coerce by truthiness
    #[default]
    Lenient,
    /// Only booleans and the strings `true` / `false` are accepted
    Strict,
}

/// Resolve the raw `published` value into a visibility flag.
///
/// Absent and null values mean published.
pub fn resolve_published(
    value: Option<&Value>,
    policy: PublishedPolicy,
) -> Result<bool, ValidationError> {
    let Some(value) = value else {
        return Ok(true);
    };

    match (value, policy) {
        (Value::Null, _) => Ok(true),
        (Value::Bool(b), _) => Ok(*b),
        (Value::String(s), PublishedPolicy::Lenient) => Ok(normalize_token(s) == "true"),
        (Value::String(s), PublishedPolicy::Strict) => match normalize_token(s).as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ValidationError::invalid("published", s.as_str(), "`true` or `false`")),
        },
        (Value::Number(n), PublishedPolicy::Lenient) => {
            Ok(n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()))
        }
        (Value::Tagged(tagged), PublishedPolicy::Lenient) => {
            resolve_published(Some(&tagged.value), policy)
        }
        (Value::Sequence(_) | Value::Mapping(_), PublishedPolicy::Lenient) => Ok(true),
        (other, PublishedPolicy::Strict) => Err(ValidationError::invalid(
            "published",
            describe(other),
            "`true` or `false`",
        )),
    }
}

/// Drop line breaks, trim, lowercase
fn normalize_token(s: &str) -> String {
    s.replace(['\r', '\n'], "").trim().to_lowercase()
}

fn describe(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}
