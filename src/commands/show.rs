//! Show a single record

use anyhow::Result;
use std::fmt::Write;

use crate::content::{ContentKind, ContentRecord};
use crate::helpers::{format_timeline, url_for};
use crate::site::Site;
use crate::Folio;

/// Print one record. A missing slug is reported, not treated as an error.
pub fn run(folio: &Folio, kind: &str, slug: &str) -> Result<()> {
    let site = folio.load()?;
    print!("{}", render(&site, kind, slug)?);
    Ok(())
}

pub fn render(site: &Site, kind: &str, slug: &str) -> Result<String> {
    let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;

    match site.collection(kind).get_by_slug(slug) {
        Some(record) => describe(site, record),
        None => Ok(format!("No {} with slug `{}`\n", kind, slug)),
    }
}

fn describe(site: &Site, record: &ContentRecord) -> Result<String> {
    let config = &site.config;
    let mut out = String::new();

    writeln!(out, "{}", record.title)?;
    writeln!(out, "  slug:        {}", record.slug)?;
    writeln!(out, "  url:         {}", url_for(config, &record.url()))?;
    if let Some(date) = format_timeline(&record.timeline, &config.date_format) {
        writeln!(out, "  date:        {}", date)?;
    }
    writeln!(out, "  published:   {}", record.published)?;
    if !record.tags.is_empty() {
        let label = match record.kind {
            ContentKind::Post => "tags:        ",
            ContentKind::Project => "technologies:",
        };
        writeln!(out, "  {} {}", label, record.tags.join(", "))?;
    }
    if let Some(category) = record.category {
        writeln!(out, "  type:        {:?}", category)?;
    }
    if let Some(image) = &record.image {
        writeln!(out, "  image:       {}", image)?;
    }
    writeln!(out, "  source:      {}", record.source)?;
    writeln!(out)?;
    writeln!(out, "{}", record.description)?;

    Ok(out)
}
