//! Write page data for every route

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Load and validate all content, then write `public_dir`
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let site = folio.load()?;
    let written = Generator::new(&folio.public_dir).generate(&site)?;

    tracing::info!(
        "Wrote {} files to {:?} in {:.2?}",
        written,
        folio.public_dir,
        start.elapsed()
    );

    Ok(())
}
