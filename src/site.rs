//! The loaded site: both content collections and route resolution

use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;

use crate::config::SiteConfig;
use crate::content::source::{DirectorySource, EntrySource, TableSource};
use crate::content::{
    ContentKind, ContentLoader, ContentRecord, ContentSource, MarkdownRenderer, SortOrder,
};
use crate::Folio;

/// Pages that exist without any content behind them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Home,
    About,
    Contact,
}

impl StaticPage {
    pub const ALL: [StaticPage; 3] = [StaticPage::Home, StaticPage::About, StaticPage::Contact];

    pub fn path(self) -> &'static str {
        match self {
            StaticPage::Home => "/",
            StaticPage::About => "/about",
            StaticPage::Contact => "/contact",
        }
    }

    /// Heading used in the document title; empty for the home page
    pub fn heading(self) -> &'static str {
        match self {
            StaticPage::Home => "",
            StaticPage::About => "About",
            StaticPage::Contact => "Contact",
        }
    }
}

/// What a site path points at
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    Page(StaticPage),
    /// Published records of one kind, in the configured order
    Listing {
        kind: ContentKind,
        records: Vec<&'a ContentRecord>,
    },
    /// A single record, published or not
    Record(&'a ContentRecord),
    NotFound,
}

/// All content of a site, loaded and validated
#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    posts: ContentSource,
    projects: ContentSource,
    post_order: SortOrder,
    project_order: SortOrder,
}

impl Site {
    /// Load both collections; any invalid entry fails the whole load
    pub fn load(folio: &Folio) -> Result<Self> {
        let config = &folio.config;
        let loader = ContentLoader::with_renderer(
            MarkdownRenderer::with_theme(&config.highlight_theme),
            config.published_policy,
        );

        let load = |kind: ContentKind| -> Result<ContentSource> {
            let collection = config.collection(kind);
            let source: Box<dyn EntrySource> = match &collection.table {
                Some(table) => Box::new(TableSource::from_file(
                    folio.base_dir.join(table),
                    table.as_str(),
                )?),
                None => Box::new(DirectorySource::new(
                    &folio.content_dir,
                    &collection.pattern(kind),
                )?),
            };
            let loaded = ContentSource::load(kind, collection.dir(kind), source.as_ref(), &loader)?;
            Ok(loaded)
        };

        let posts = load(ContentKind::Post).context("Failed to load posts")?;
        let projects = load(ContentKind::Project).context("Failed to load projects")?;

        Self::new(config.clone(), posts, projects)
    }

    pub fn new(config: SiteConfig, posts: ContentSource, projects: ContentSource) -> Result<Self> {
        let post_order = config.posts.order().context("Invalid posts.order_by")?;
        let project_order = config.projects.order().context("Invalid projects.order_by")?;

        Ok(Self {
            config,
            posts,
            projects,
            post_order,
            project_order,
        })
    }

    pub fn collection(&self, kind: ContentKind) -> &ContentSource {
        match kind {
            ContentKind::Post => &self.posts,
            ContentKind::Project => &self.projects,
        }
    }

    /// Configured listing order of a collection
    pub fn order(&self, kind: ContentKind) -> SortOrder {
        match kind {
            ContentKind::Post => self.post_order,
            ContentKind::Project => self.project_order,
        }
    }

    /// Published records of a kind, in the configured order
    pub fn listing(&self, kind: ContentKind) -> Vec<&ContentRecord> {
        self.collection(kind).list_published(self.order(kind))
    }

    /// Resolve a request path such as `/blog/mastering-tailwind-css/`.
    ///
    /// Query strings and trailing slashes are ignored, segments are
    /// percent-decoded, and the configured `root` is stripped first.
    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let trimmed = decoded.trim_matches('/');

        let root = self.config.root.trim_matches('/');
        let rest = if root.is_empty() {
            trimmed
        } else {
            match trimmed.strip_prefix(root) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
                _ => return Resolved::NotFound,
            }
        };

        let (first, slug) = match rest.split_once('/') {
            Some((first, slug)) => (first, Some(slug)),
            None => (rest, None),
        };

        let kind = [ContentKind::Post, ContentKind::Project]
            .into_iter()
            .find(|kind| kind.route_prefix() == first);

        match (kind, slug) {
            (Some(kind), None) => Resolved::Listing {
                kind,
                records: self.listing(kind),
            },
            (Some(kind), Some(slug)) => self
                .collection(kind)
                .get_by_slug(slug)
                .map_or(Resolved::NotFound, Resolved::Record),
            (None, None) => StaticPage::ALL
                .into_iter()
                .find(|page| page.path().trim_matches('/') == first)
                .map_or(Resolved::NotFound, Resolved::Page),
            (None, Some(_)) => Resolved::NotFound,
        }
    }

    /// Every resolvable path: static pages, both listings, and every record,
    /// unlisted ones included
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = StaticPage::ALL
            .iter()
            .map(|page| page.path().to_string())
            .collect();

        for kind in [ContentKind::Post, ContentKind::Project] {
            routes.push(format!("/{}", kind.route_prefix()));
            routes.extend(self.collection(kind).load_all().iter().map(|r| r.url()));
        }

        routes
    }

    /// Document title of a resolved page
    pub fn title(&self, resolved: &Resolved<'_>) -> String {
        match resolved {
            Resolved::Page(page) => self.config.page_title(page.heading()),
            Resolved::Listing { kind, .. } => self.config.page_title(kind.heading()),
            Resolved::Record(record) => self.config.page_title(&record.title),
            Resolved::NotFound => self.config.page_title("Not Found"),
        }
    }
}
