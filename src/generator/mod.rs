//! Generator module - writes JSON page data for every route of the site

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::content::{ContentKind, ContentRecord, ProjectCategory};
use crate::helpers::{date_xml, format_timeline, full_url_for, image_url, url_for};
use crate::site::{Resolved, Site, StaticPage};

/// Records shown on the home page per collection
const HOME_PREVIEW: usize = 3;

/// Site-wide data included in every page
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
}

/// A record as it appears in listings
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub url: String,
    /// Formatted with `date_format`; `None` for undated projects
    pub date: Option<String>,
    /// Machine-readable sort date
    pub datetime: Option<String>,
    pub tags: Vec<String>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
}

/// Link to a neighbouring record
#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
}

/// A full record page
#[derive(Debug, Clone, Serialize)]
pub struct RecordData {
    #[serde(flatten)]
    pub summary: RecordSummary,
    pub published: bool,
    /// Rendered HTML body
    pub content: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageBody {
    Page {
        page: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        recent_posts: Vec<RecordSummary>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        featured_projects: Vec<RecordSummary>,
    },
    Listing {
        kind: ContentKind,
        records: Vec<RecordSummary>,
        tags: IndexMap<String, usize>,
    },
    /// Nested so record fields never collide with page-level keys
    Record { record: RecordData },
    NotFound {},
}

/// Everything needed to render one route
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub path: String,
    pub site: SiteData,
    #[serde(flatten)]
    pub body: PageBody,
}

impl PageData {
    /// Build page data for `path`, already resolved against `site`
    pub fn build(site: &Site, path: &str, resolved: &Resolved<'_>) -> Self {
        let config = &site.config;
        let summary = |record: &ContentRecord| summarize(site, record);

        let body = match resolved {
            Resolved::Page(page) => {
                let (recent_posts, featured_projects) = match page {
                    StaticPage::Home => (
                        preview(site, ContentKind::Post),
                        preview(site, ContentKind::Project),
                    ),
                    _ => (Vec::new(), Vec::new()),
                };
                PageBody::Page {
                    page: format!("{:?}", page).to_lowercase(),
                    recent_posts,
                    featured_projects,
                }
            }
            Resolved::Listing { kind, records } => PageBody::Listing {
                kind: *kind,
                records: records.iter().map(|r| summary(r)).collect(),
                tags: site.collection(*kind).tag_counts(),
            },
            Resolved::Record(record) => {
                let (prev, next) = site
                    .collection(record.kind)
                    .neighbors(&record.slug, site.order(record.kind));
                let link = |r: &ContentRecord| NavLink {
                    title: r.title.clone(),
                    url: url_for(config, &r.url()),
                };
                PageBody::Record {
                    record: RecordData {
                        summary: summary(record),
                        published: record.published,
                        content: record.content.clone(),
                        prev: prev.map(link),
                        next: next.map(link),
                    },
                }
            }
            Resolved::NotFound => PageBody::NotFound {},
        };

        Self {
            title: site.title(resolved),
            path: path.to_string(),
            site: SiteData {
                title: config.title.clone(),
                description: config.description.clone(),
                author: config.author.clone(),
                language: config.language.clone(),
                url: full_url_for(config, "/"),
            },
            body,
        }
    }
}

fn summarize(site: &Site, record: &ContentRecord) -> RecordSummary {
    let config = &site.config;
    RecordSummary {
        kind: record.kind,
        slug: record.slug.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        url: url_for(config, &record.url()),
        date: format_timeline(&record.timeline, &config.date_format),
        datetime: record.sort_date().map(|d| date_xml(&d)),
        tags: record.tags.clone(),
        image: image_url(config, record.image.as_deref()),
        category: record.category,
    }
}

fn preview(site: &Site, kind: ContentKind) -> Vec<RecordSummary> {
    site.listing(kind)
        .into_iter()
        .take(HOME_PREVIEW)
        .map(|r| summarize(site, r))
        .collect()
}

/// Static page data generator
pub struct Generator {
    public_dir: PathBuf,
}

impl Generator {
    /// Create a new generator writing into `public_dir`
    pub fn new<P: AsRef<Path>>(public_dir: P) -> Self {
        Self {
            public_dir: public_dir.as_ref().to_path_buf(),
        }
    }

    /// Generate every route plus `404.json`; returns the number of files written
    pub fn generate(&self, site: &Site) -> Result<usize> {
        fs::create_dir_all(&self.public_dir)?;

        let routes = site.routes();
        for route in &routes {
            let data = PageData::build(site, route, &site.resolve(route));
            let output_path = self.output_path(route)?;
            self.write(&output_path, &data)?;
        }

        let not_found = PageData::build(site, "/404", &Resolved::NotFound);
        self.write(&self.public_dir.join("404.json"), &not_found)?;

        tracing::info!("Generated {} pages", routes.len());
        Ok(routes.len() + 1)
    }

    /// `public/<route>/index.json`; routes may only name plain path segments
    pub fn output_path(&self, route: &str) -> Result<PathBuf> {
        let relative = Path::new(route.trim_matches('/'));
        if let Some(component) = relative
            .components()
            .find(|c| !matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("Route {:?} escapes the public directory at {:?}", route, component);
        }
        Ok(self.public_dir.join(relative).join("index.json"))
    }

    fn write(&self, output_path: &Path, data: &PageData) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Wrote {:?}", output_path);
        Ok(())
    }
}
