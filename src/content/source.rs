//! Origins of raw content entries: a directory of content files, or a static table

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde_yaml::Value;
use walkdir::WalkDir;

use super::{LoadError, ValidationError};

/// The unparsed document behind an entry
#[derive(Debug, Clone, PartialEq)]
pub enum RawDocument {
    /// A content file: front-matter header followed by a markdown body
    Text(String),
    /// One row of a static table, already structured
    Row(Value),
}

/// A raw entry, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Human-readable origin used in diagnostics
    pub origin: String,
    /// Path relative to the content directory, for file entries
    pub path: Option<String>,
    pub document: RawDocument,
}

/// Something that yields the raw entries of one collection
pub trait EntrySource {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Read every raw entry, in a deterministic order
    fn entries(&self) -> Result<Vec<RawEntry>, LoadError>;
}

/// Content files under a directory whose relative path matches a glob
#[derive(Debug)]
pub struct DirectorySource {
    content_dir: PathBuf,
    pattern: Pattern,
}

impl DirectorySource {
    /// `pattern` is matched against paths relative to `content_dir`,
    /// e.g. `posts/**/*.md*`
    pub fn new<P: AsRef<Path>>(content_dir: P, pattern: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            pattern: Pattern::new(pattern)?,
        })
    }
}

impl EntrySource for DirectorySource {
    fn describe(&self) -> String {
        format!("{} in {:?}", self.pattern, self.content_dir)
    }

    fn entries(&self) -> Result<Vec<RawEntry>, LoadError> {
        if !self.content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.content_dir);
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.content_dir.as_path()).to_path_buf();
                LoadError::io(path, io::Error::from(e))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = path
                .strip_prefix(&self.content_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            if !self.pattern.matches(&relative) {
                tracing::debug!("Skipping {:?}: does not match {}", relative, self.pattern);
                continue;
            }

            let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;

            entries.push(RawEntry {
                origin: relative.clone(),
                path: Some(relative),
                document: RawDocument::Text(normalize_line_endings(&text)),
            });
        }

        Ok(entries)
    }
}

/// A static, in-process table of entries
#[derive(Debug)]
pub struct TableSource {
    label: String,
    rows: Vec<Value>,
}

impl TableSource {
    pub fn new(label: impl Into<String>, rows: Vec<Value>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }

    /// Parse a YAML list of mappings
    pub fn from_yaml_str(label: impl Into<String>, yaml: &str) -> Result<Self, LoadError> {
        let label = label.into();
        let rows: Vec<Value> = serde_yaml::from_str(yaml).map_err(|e| {
            LoadError::invalid(&label, None, ValidationError::Malformed(e.to_string()))
        })?;
        Ok(Self::new(label, rows))
    }

    /// Read a YAML table file such as `data/projects.yml`
    pub fn from_file<P: AsRef<Path>>(path: P, label: impl Into<String>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::from_yaml_str(label, &normalize_line_endings(&yaml))
    }
}

impl EntrySource for TableSource {
    fn describe(&self) -> String {
        format!("table {}", self.label)
    }

    fn entries(&self) -> Result<Vec<RawEntry>, LoadError> {
        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| RawEntry {
                origin: format!("{}[{}]", self.label, i),
                path: None,
                document: RawDocument::Row(row.clone()),
            })
            .collect())
    }
}

fn normalize_line_endings(s: &str) -> String {
    s.replace("\r\n", "\n")
}
