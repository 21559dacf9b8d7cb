//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::{ContentKind, PublishedPolicy, SortOrder};
use crate::helpers::check_date_format;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Writing
    pub new_post_name: String,
    pub published_policy: PublishedPolicy,
    pub highlight_theme: String,

    // Display
    pub date_format: String,
    pub placeholder_image: String,

    // Collections
    pub posts: CollectionConfig,
    pub projects: CollectionConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            new_post_name: ":title.mdx".to_string(),
            published_policy: PublishedPolicy::default(),
            highlight_theme: "base16-ocean.dark".to_string(),

            date_format: "MMMM D, YYYY".to_string(),
            placeholder_image: "/placeholder.jpg".to_string(),

            posts: CollectionConfig::default(),
            projects: CollectionConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, while rendering
    pub fn validate(&self) -> Result<()> {
        if check_date_format(&self.date_format).is_err() {
            anyhow::bail!("date_format {:?} cannot render a date", self.date_format);
        }
        Ok(())
    }

    pub fn collection(&self, kind: ContentKind) -> &CollectionConfig {
        match kind {
            ContentKind::Post => &self.posts,
            ContentKind::Project => &self.projects,
        }
    }

    /// Document title for a page, e.g. `Projects | My Portfolio`
    pub fn page_title(&self, page: &str) -> String {
        if page.is_empty() {
            self.title.clone()
        } else {
            format!("{} | {}", page, self.title)
        }
    }
}

/// Where one collection's entries come from and how it is listed
///
/// Unset paths fall back to the kind's default directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Directory under `content_dir`; also stripped from slugs
    pub dir: Option<String>,
    /// Glob relative to `content_dir`, defaults to `{dir}/**/*.md*`
    pub pattern: Option<String>,
    /// Static YAML table relative to the site root; replaces the directory
    pub table: Option<String>,
    /// Listing order, e.g. `-date`
    pub order_by: Option<String>,
}

impl CollectionConfig {
    pub fn dir(&self, kind: ContentKind) -> &str {
        self.dir.as_deref().unwrap_or(kind.default_dir())
    }

    pub fn pattern(&self, kind: ContentKind) -> String {
        self.pattern
            .clone()
            .unwrap_or_else(|| format!("{}/**/*.md*", self.dir(kind)))
    }

    pub fn order(&self) -> Result<SortOrder> {
        match &self.order_by {
            Some(order) => order.parse().map_err(anyhow::Error::msg),
            None => Ok(SortOrder::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SortField;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.published_policy, PublishedPolicy::Lenient);
        assert_eq!(config.posts.pattern(ContentKind::Post), "posts/**/*.md*");
        assert_eq!(config.projects.dir(ContentKind::Project), "projects");
        assert_eq!(config.posts.order().unwrap(), SortOrder::default());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Durgendra
author: Durgendra
published_policy: strict
posts:
  dir: articles
  order_by: title
projects:
  table: data/projects.yml
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Durgendra");
        assert_eq!(config.published_policy, PublishedPolicy::Strict);
        assert_eq!(config.posts.pattern(ContentKind::Post), "articles/**/*.md*");
        assert_eq!(config.posts.order().unwrap().field, SortField::Title);
        assert_eq!(config.projects.table.as_deref(), Some("data/projects.yml"));
        assert_eq!(config.projects.dir(ContentKind::Project), "projects");
        assert_eq!(config.date_format, "MMMM D, YYYY");
    }

    #[test]
    fn test_bad_order_is_an_error() {
        let config = CollectionConfig {
            order_by: Some("popularity".into()),
            ..Default::default()
        };
        assert!(config.order().is_err());
    }

    #[test]
    fn test_load_accepts_timezone_token_in_date_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, "date_format: YYYY-MM-DD ZZ\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.date_format, "YYYY-MM-DD ZZ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_title() {
        let config = SiteConfig {
            title: "Durgendra Portfolio".into(),
            ..Default::default()
        };
        assert_eq!(config.page_title("Projects"), "Projects | Durgendra Portfolio");
        assert_eq!(config.page_title(""), "Durgendra Portfolio");
    }
}
