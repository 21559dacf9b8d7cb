//! Slug derivation and record URLs
//!
//! Both are pure functions of their inputs; a record's URL is never stored.

use super::{ContentKind, ValidationError};

/// Characters that would change the meaning of a URL path or a file name
const RESERVED: [char; 4] = ['?', '#', '%', '\\'];

/// Derive a slug from a content file path relative to the content directory.
///
/// Separators are normalized to `/`, the collection prefix (`posts/`) and the
/// file extension are stripped, and a trailing `index` segment is dropped:
/// `posts/2023/hello.mdx` becomes `2023/hello`, `posts/launch/index.md`
/// becomes `launch`.
pub fn slug_from_path(relative_path: &str, prefix: &str) -> String {
    let path = relative_path.replace('\\', "/");
    let path = path.trim_start_matches("./");

    let prefix = prefix.trim_matches('/');
    let path = if prefix.is_empty() {
        path
    } else {
        path.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    };

    // Only the last segment carries an extension
    let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));
    let stem = match file.rfind('.') {
        Some(pos) if pos > 0 => &file[..pos],
        _ => file,
    };

    let slug = match (dir, stem) {
        ("", "index") => String::new(),
        (dir, "index") => dir.to_string(),
        ("", stem) => stem.to_string(),
        (dir, stem) => format!("{dir}/{stem}"),
    };
    slug.trim_matches('/').to_string()
}

/// Normalize an explicit `id` into a slug
pub fn slug_from_id(id: &str) -> String {
    id.trim().trim_matches('/').to_string()
}

/// Check that a slug is usable both as a URL path and as a directory under
/// the public dir: no empty, `.` or `..` segments, no whitespace, and none
/// of `?`, `#`, `%` or `\`.
pub fn validate_slug(field: &'static str, slug: &str) -> Result<(), ValidationError> {
    let bad_segment = slug
        .split('/')
        .any(|segment| matches!(segment, "" | "." | ".."));
    let bad_char = slug
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || RESERVED.contains(&c));

    if bad_segment || bad_char {
        return Err(ValidationError::invalid(
            field,
            slug,
            "a URL-safe slug without `.`/`..` segments, whitespace, `?`, `#`, `%` or `\\`",
        ));
    }
    Ok(())
}

/// Site path of a record: `/{route prefix}/{slug}`
pub fn record_url(kind: ContentKind, slug: &str) -> String {
    format!("/{}/{}", kind.route_prefix(), slug)
}
