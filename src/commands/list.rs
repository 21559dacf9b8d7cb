//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::{ContentKind, ContentRecord, SortOrder};
use crate::helpers::format_timeline;
use crate::site::Site;
use crate::Folio;

/// Listing filters from the command line
#[derive(Debug, Clone, Default)]
pub struct ListOptions<'a> {
    /// Include unpublished records
    pub all: bool,
    /// Overrides the collection's configured order
    pub order: Option<&'a str>,
    /// Only records carrying this tag
    pub tag: Option<&'a str>,
}

/// List posts, projects or tags. Unpublished records are only shown with `all`.
pub fn run(folio: &Folio, content_type: &str, options: &ListOptions<'_>) -> Result<()> {
    let site = folio.load()?;
    print!("{}", render(&site, content_type, options)?);
    Ok(())
}

pub fn render(site: &Site, content_type: &str, options: &ListOptions<'_>) -> Result<String> {
    let mut out = String::new();

    if matches!(content_type, "tag" | "tags") {
        for kind in [ContentKind::Post, ContentKind::Project] {
            let tags = site.collection(kind).tag_counts();
            let label = match kind {
                ContentKind::Post => "Tags",
                ContentKind::Project => "Technologies",
            };
            writeln!(out, "{} ({}):", label, tags.len())?;
            for (tag, count) in tags {
                writeln!(out, "  {} ({})", tag, count)?;
            }
        }
        return Ok(out);
    }

    let kind: ContentKind = content_type.parse().map_err(|e: String| {
        anyhow::anyhow!("{}. Available: posts, projects, tags", e)
    })?;
    let order: SortOrder = match options.order {
        Some(order) => order.parse().map_err(anyhow::Error::msg)?,
        None => site.order(kind),
    };

    let collection = site.collection(kind);
    let records: Vec<&ContentRecord> = match (options.all, options.tag) {
        (false, Some(tag)) => collection.tagged(tag, order),
        (false, None) => collection.list_published(order),
        (true, tag) => {
            let mut records: Vec<_> = collection
                .load_all()
                .iter()
                .filter(|r| tag.map_or(true, |tag| r.has_tag(tag)))
                .collect();
            records.sort_by(|a, b| order.compare(a, b));
            records
        }
    };

    writeln!(out, "{} ({}):", kind.heading(), records.len())?;
    for record in records {
        let date = format_timeline(&record.timeline, "YYYY-MM-DD");
        writeln!(
            out,
            "  {} - {} [{}]{}",
            date.as_deref().unwrap_or("undated"),
            record.title,
            record.url(),
            if record.published { "" } else { " (unpublished)" }
        )?;
    }

    Ok(out)
}
