//! Validate all content without writing anything

use anyhow::Result;
use std::fmt::Write;

use crate::content::ContentKind;
use crate::site::Site;
use crate::Folio;

/// Load every entry; the first invalid one is returned as the error
pub fn run(folio: &Folio) -> Result<()> {
    let site = folio.load()?;
    print!("{}", summary(&site)?);
    Ok(())
}

pub fn summary(site: &Site) -> Result<String> {
    let mut out = String::new();

    for kind in [ContentKind::Post, ContentKind::Project] {
        let collection = site.collection(kind);
        let published = collection.load_all().iter().filter(|r| r.published).count();
        writeln!(
            out,
            "{}: {} record(s), {} published, {} unlisted",
            kind.heading(),
            collection.len(),
            published,
            collection.len() - published
        )?;

        for record in collection.load_all().iter().filter(|r| r.image.is_none()) {
            tracing::debug!("{} `{}` has no image, placeholder used", kind, record.slug);
        }
    }
    writeln!(out, "{} route(s) OK", site.routes().len())?;

    Ok(out)
}
