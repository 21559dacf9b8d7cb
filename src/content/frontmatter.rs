//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

use super::ValidationError;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Like `string_or_vec`, but keeps "key absent" apart from "empty list"
fn optional_string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_vec(deserializer).map(Some)
}

/// Front-matter of a post, or one row of a static project table
///
/// Only shape is checked here. Required fields and value formats are
/// validated by the loader, which knows the content kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Explicit identifier, takes precedence over the file path for the slug
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Kept as a raw value so that a bad date is reported, not swallowed
    pub date: Option<Value>,
    pub duration: Option<Value>,
    pub published: Option<Value>,
    #[serde(alias = "imageUrl")]
    pub image: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "optional_string_or_vec")]
    pub technologies: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    /// Inline body, only meaningful for table rows
    pub body: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Content without a header yields an empty front-matter.
    pub fn parse(content: &str) -> Result<(Self, &str), ValidationError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), ValidationError> {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let (yaml_content, remaining) = if rest.starts_with("---") {
            ("", &rest[3..])
        } else {
            let end_pos = rest
                .find("\n---")
                .ok_or_else(|| ValidationError::Malformed("missing closing `---`".into()))?;
            (&rest[..end_pos], &rest[end_pos + 4..])
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map(|fm| (fm, remaining))
            .map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), ValidationError> {
        // JSON front-matter ends with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest
                .find(";;;")
                .ok_or_else(|| ValidationError::Malformed("missing closing `;;;`".into()))?;
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            let fm = serde_json::from_str(&rest[..end_pos])
                .map_err(|e| ValidationError::Malformed(e.to_string()))?;
            return Ok((fm, remaining));
        }

        // A bare JSON object at the start; find the matching closing brace
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end_pos = None;
        for (i, c) in content.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end_pos = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        let end_pos =
            end_pos.ok_or_else(|| ValidationError::Malformed("unbalanced JSON object".into()))?;
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);
        let fm = serde_json::from_str(&content[..end_pos])
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Ok((fm, remaining))
    }
}

/// Render a scalar front-matter value as text, for date parsing and messages
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with an offset; the wall-clock time is kept
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}
