//! folio-rs: the content registry behind a personal portfolio site
//!
//! Blog posts and project entries are loaded from Markdown files with
//! front-matter (or a static YAML table), validated once, and then served
//! read-only to whatever renders the About, Projects, Blog and Contact pages.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod site;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use site::{Resolved, Site, StaticPage};

/// Name of the site configuration file at the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// A portfolio site on disk
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory (posts, projects)
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Open a site directory, using default configuration when
    /// `_config.yml` is missing
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Load and validate all content
    pub fn load(&self) -> Result<Site> {
        Site::load(self)
    }

    /// Write page data for every route
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
