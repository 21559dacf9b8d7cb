//! Formatting helpers shared by the generator, the server and the CLI

mod date;
mod url;

pub use date::*;
pub use url::*;
