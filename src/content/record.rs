//! Content records: blog posts and project entries

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::slug::record_url;

/// The kind of content a collection holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Project,
}

impl ContentKind {
    /// First URL segment of every record of this kind
    pub fn route_prefix(self) -> &'static str {
        match self {
            ContentKind::Post => "blog",
            ContentKind::Project => "projects",
        }
    }

    /// Default directory under the content dir
    pub fn default_dir(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Project => "projects",
        }
    }

    /// Listing page heading
    pub fn heading(self) -> &'static str {
        match self {
            ContentKind::Post => "Blog",
            ContentKind::Project => "Projects",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Post => f.write_str("post"),
            ContentKind::Project => f.write_str("project"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" | "posts" | "blog" => Ok(ContentKind::Post),
            "project" | "projects" => Ok(ContentKind::Project),
            other => Err(format!("unknown content kind `{other}`, expected post or project")),
        }
    }
}

/// Project category, from the `type` front-matter key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Website,
    Dashboard,
    Mobile,
}

impl FromStr for ProjectCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "website" => Ok(ProjectCategory::Website),
            "dashboard" => Ok(ProjectCategory::Dashboard),
            "mobile" => Ok(ProjectCategory::Mobile),
            _ => Err(()),
        }
    }
}

/// When a record happened; used for display and ordering only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Timeline {
    /// A post's publication date
    Date { date: NaiveDateTime },
    /// A project's duration; `end` is `None` while ongoing
    Span {
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    },
    Undated,
}

impl Timeline {
    /// The instant records are sorted by
    pub fn sort_date(&self) -> Option<NaiveDateTime> {
        match self {
            Timeline::Date { date } => Some(*date),
            Timeline::Span { start, .. } => Some(*start),
            Timeline::Undated => None,
        }
    }
}

/// A single displayable unit of content
///
/// Records are built by the loader and never change afterwards; consumers
/// only see shared references handed out by a `ContentSource`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub kind: ContentKind,

    /// Unique lookup key within the collection
    pub slug: String,

    pub title: String,

    /// May be empty
    pub description: String,

    pub timeline: Timeline,

    /// Listed when true; reachable by slug either way
    pub published: bool,

    /// Tags for posts, technologies for projects
    pub tags: Vec<String>,

    /// Cover image (URL or site path)
    pub image: Option<String>,

    /// Project category, always `None` for posts
    pub category: Option<ProjectCategory>,

    /// Origin of the record (relative path or table row)
    pub source: String,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl ContentRecord {
    /// Site path of this record, e.g. `/blog/mastering-tailwind-css`
    pub fn url(&self) -> String {
        record_url(self.kind, &self.slug)
    }

    pub fn sort_date(&self) -> Option<NaiveDateTime> {
        self.timeline.sort_date()
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
