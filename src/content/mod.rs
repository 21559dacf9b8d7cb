//! Content module - records, their sources, and the collections that own them

mod collection;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod published;
pub(crate) mod record;
pub mod slug;
pub mod source;

pub use collection::{ContentSource, SortField, SortOrder};
pub use error::{LoadError, ValidationError};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use published::{resolve_published, PublishedPolicy};
pub use record::{ContentKind, ContentRecord, ProjectCategory, Timeline};
