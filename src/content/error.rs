//! Load-time errors for content collections

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A raw entry that cannot become a content record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("field `{field}` has invalid value `{value}`, expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("malformed front-matter: {0}")]
    Malformed(String),

    #[error("could not derive a slug")]
    EmptySlug,
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            expected,
        }
    }
}

/// Failure to load a whole collection
#[derive(Debug, Error)]
pub enum LoadError {
    /// One entry failed validation; the collection is not loaded
    #[error("{origin}{}: {error}", .slug.as_ref().map(|s| format!(" (slug `{s}`)")).unwrap_or_default())]
    Invalid {
        origin: String,
        slug: Option<String>,
        #[source]
        error: ValidationError,
    },

    #[error("duplicate slug `{slug}` in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub(crate) fn invalid(origin: &str, slug: Option<&str>, error: ValidationError) -> Self {
        Self::Invalid {
            origin: origin.to_string(),
            slug: slug.map(str::to_string),
            error,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
