//! Content loader - turns raw entries into validated records

use chrono::NaiveDateTime;
use serde_yaml::Value;

use super::frontmatter::{parse_date_string, scalar_text};
use super::published::{resolve_published, PublishedPolicy};
use super::slug::{slug_from_id, slug_from_path, validate_slug};
use super::source::{RawDocument, RawEntry};
use super::{
    ContentKind, ContentRecord, FrontMatter, LoadError, MarkdownRenderer, ProjectCategory,
    Timeline, ValidationError,
};

/// Validates and normalizes raw entries of any kind
pub struct ContentLoader {
    renderer: MarkdownRenderer,
    policy: PublishedPolicy,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(policy: PublishedPolicy) -> Self {
        Self::with_renderer(MarkdownRenderer::new(), policy)
    }

    pub fn with_renderer(renderer: MarkdownRenderer, policy: PublishedPolicy) -> Self {
        Self { renderer, policy }
    }

    /// Build one record. `prefix` is the collection directory stripped from
    /// file paths when deriving the slug.
    pub fn build(
        &self,
        kind: ContentKind,
        prefix: &str,
        entry: RawEntry,
    ) -> Result<ContentRecord, LoadError> {
        let RawEntry {
            origin,
            path,
            document,
        } = entry;

        let (mut fm, body) = match document {
            RawDocument::Text(text) => {
                let (fm, body) = FrontMatter::parse(&text)
                    .map_err(|e| LoadError::invalid(&origin, None, e))?;
                (fm, body.to_string())
            }
            RawDocument::Row(row) => {
                let mut fm: FrontMatter = serde_yaml::from_value(row).map_err(|e| {
                    LoadError::invalid(&origin, None, ValidationError::Malformed(e.to_string()))
                })?;
                let body = fm.body.take().unwrap_or_default();
                (fm, body)
            }
        };

        // An explicit id wins over the file path
        let slug = match (fm.id.as_deref(), path.as_deref()) {
            (Some(id), _) => slug_from_id(id),
            (None, Some(path)) => slug_from_path(path, prefix),
            (None, None) => {
                return Err(LoadError::invalid(
                    &origin,
                    None,
                    ValidationError::MissingField("id"),
                ))
            }
        };
        if slug.is_empty() {
            return Err(LoadError::invalid(&origin, None, ValidationError::EmptySlug));
        }
        let slug_field = if fm.id.is_some() { "id" } else { "path" };
        validate_slug(slug_field, &slug).map_err(|e| LoadError::invalid(&origin, None, e))?;

        let fail = |error: ValidationError| LoadError::invalid(&origin, Some(&slug), error);

        let title = match fm.title.take() {
            Some(title) if title.trim().is_empty() => {
                return Err(fail(ValidationError::EmptyField("title")))
            }
            Some(title) => title.trim().to_string(),
            None => return Err(fail(ValidationError::MissingField("title"))),
        };

        let description = fm
            .description
            .take()
            .ok_or_else(|| fail(ValidationError::MissingField("description")))?;

        let timeline = match (kind, fm.date.as_ref(), fm.duration.as_ref()) {
            (ContentKind::Post, Some(date), _) => Timeline::Date {
                date: parse_date_value("date", date).map_err(fail)?,
            },
            (ContentKind::Post, None, _) => {
                return Err(fail(ValidationError::MissingField("date")))
            }
            (ContentKind::Project, _, Some(duration)) => {
                parse_duration(duration).map_err(fail)?
            }
            (ContentKind::Project, _, None) => Timeline::Undated,
        };

        let tags = match kind {
            ContentKind::Post => std::mem::take(&mut fm.tags),
            ContentKind::Project => fm
                .technologies
                .take()
                .ok_or_else(|| fail(ValidationError::MissingField("technologies")))?,
        };

        let category = match (kind, fm.project_type.take()) {
            (ContentKind::Project, Some(value)) => {
                let category = value.parse::<ProjectCategory>().map_err(|_| {
                    fail(ValidationError::invalid(
                        "type",
                        value.as_str(),
                        "website, dashboard or mobile",
                    ))
                })?;
                Some(category)
            }
            (ContentKind::Post, Some(value)) => {
                fm.extra.insert("type".to_string(), Value::String(value));
                None
            }
            (_, None) => None,
        };

        let published = resolve_published(fm.published.as_ref(), self.policy).map_err(fail)?;

        let image = fm
            .image
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let content = self.renderer.render(&body);

        tracing::debug!("Loaded {} `{}` from {}", kind, slug, origin);

        Ok(ContentRecord {
            kind,
            slug,
            title,
            description,
            timeline,
            published,
            tags,
            image,
            category,
            source: origin,
            raw: body,
            content,
            extra: fm.extra,
        })
    }
}

fn parse_date_value(field: &'static str, value: &Value) -> Result<NaiveDateTime, ValidationError> {
    const EXPECTED: &str = "a date such as 2023-07-20";
    let text = scalar_text(value)
        .ok_or_else(|| ValidationError::invalid(field, format!("{value:?}"), EXPECTED))?;
    parse_date_string(&text).ok_or_else(|| ValidationError::invalid(field, text, EXPECTED))
}

/// A project duration: `start..end`, `start..` (ongoing), a single date, or a
/// mapping with `start` and optional `end`
fn parse_duration(value: &Value) -> Result<Timeline, ValidationError> {
    let (start, end) = match value {
        Value::Mapping(map) => {
            let start = map
                .get("start")
                .ok_or(ValidationError::MissingField("duration.start"))?;
            let start = parse_date_value("duration", start)?;
            let end = match map.get("end") {
                None | Some(Value::Null) => None,
                Some(end) => Some(parse_date_value("duration", end)?),
            };
            (start, end)
        }
        other => {
            let text = scalar_text(other).ok_or_else(|| {
                ValidationError::invalid("duration", format!("{other:?}"), "a date range")
            })?;
            match text.split_once("..") {
                Some((start, end)) => {
                    let start = parse_date_value("duration", &Value::String(start.into()))?;
                    let end = end.trim();
                    let end = if end.is_empty() || end.eq_ignore_ascii_case("present") {
                        None
                    } else {
                        Some(parse_date_value("duration", &Value::String(end.into()))?)
                    };
                    (start, end)
                }
                None => {
                    let date = parse_date_value("duration", other)?;
                    (date, Some(date))
                }
            }
        }
    };

    if end.is_some_and(|end| end < start) {
        return Err(ValidationError::invalid(
            "duration",
            format!("{value:?}"),
            "an end on or after the start",
        ));
    }

    Ok(Timeline::Span { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn loader() -> ContentLoader {
        ContentLoader::new(PublishedPolicy::Lenient)
    }

    fn file(path: &str, text: &str) -> RawEntry {
        RawEntry {
            origin: path.to_string(),
            path: Some(path.to_string()),
            document: RawDocument::Text(text.to_string()),
        }
    }

    fn row(yaml: &str) -> RawEntry {
        RawEntry {
            origin: "projects.yml[0]".to_string(),
            path: None,
            document: RawDocument::Row(serde_yaml::from_str(yaml).unwrap()),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn invalid(err: LoadError) -> ValidationError {
        match err {
            LoadError::Invalid { error, .. } => error,
            other => panic!("expected a validation failure, got {other:?}"),
        }
    }

    const POST: &str = "---
title: Getting Started with Next.js
description: Learn how to build modern web applications with Next.js
date: 2023-06-15
tags: [nextjs, react]
---

## Why Choose Next.js?
";

    #[test]
    fn test_build_post() {
        let record = loader()
            .build(ContentKind::Post, "posts", file("posts/getting-started.mdx", POST))
            .unwrap();

        assert_eq!(record.slug, "getting-started");
        assert_eq!(record.url(), "/blog/getting-started");
        assert_eq!(record.title, "Getting Started with Next.js");
        assert_eq!(record.timeline, Timeline::Date { date: day(2023, 6, 15) });
        assert!(record.published);
        assert_eq!(record.tags, vec!["nextjs", "react"]);
        assert!(record.image.is_none());
        assert!(record.content.contains(r#"id="why-choose-next-js""#));
        assert_eq!(record.source, "posts/getting-started.mdx");
    }

    #[test]
    fn test_explicit_id_wins_over_path() {
        let text = POST.replacen("---\n", "---\nid: custom\n", 1);
        let record = loader()
            .build(ContentKind::Post, "posts", file("posts/whatever.mdx", &text))
            .unwrap();
        assert_eq!(record.slug, "custom");
    }

    #[test]
    fn test_missing_post_fields() {
        let cases = [
            ("---\ndescription: d\ndate: 2023-01-01\n---\n", ValidationError::MissingField("title")),
            ("---\ntitle: t\ndate: 2023-01-01\n---\n", ValidationError::MissingField("description")),
            ("---\ntitle: t\ndescription: d\n---\n", ValidationError::MissingField("date")),
            ("---\ntitle: '  '\ndescription: d\ndate: 2023-01-01\n---\n", ValidationError::EmptyField("title")),
            ("no header at all", ValidationError::MissingField("title")),
        ];
        for (text, expected) in cases {
            let err = loader()
                .build(ContentKind::Post, "posts", file("posts/x.md", text))
                .unwrap_err();
            assert_eq!(invalid(err), expected, "{text:?}");
        }
    }

    #[test]
    fn test_empty_description_is_allowed() {
        let text = "---\ntitle: t\ndescription: ''\ndate: 2023-01-01\n---\n";
        let record = loader()
            .build(ContentKind::Post, "posts", file("posts/x.md", text))
            .unwrap();
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_unparseable_date() {
        let text = "---\ntitle: t\ndescription: d\ndate: someday\n---\n";
        let err = loader()
            .build(ContentKind::Post, "posts", file("posts/x.md", text))
            .unwrap_err();
        assert!(err.to_string().starts_with("posts/x.md (slug `x`):"), "{err}");
        assert!(matches!(
            invalid(err),
            ValidationError::InvalidValue { field: "date", .. }
        ));
    }

    #[test]
    fn test_published_variants() {
        for (value, expected) in [("'false'", false), ("\" True \\n\"", true), ("no", false), ("false", false)] {
            let text = format!("---\ntitle: t\ndescription: d\ndate: 2023-01-01\npublished: {value}\n---\n");
            let record = loader()
                .build(ContentKind::Post, "posts", file("posts/x.md", &text))
                .unwrap();
            assert_eq!(record.published, expected, "{value}");
        }
    }

    #[test]
    fn test_strict_policy_rejects_typo() {
        let strict = ContentLoader::new(PublishedPolicy::Strict);
        let text = "---\ntitle: t\ndescription: d\ndate: 2023-01-01\npublished: ture\n---\n";
        let err = strict
            .build(ContentKind::Post, "posts", file("posts/x.md", text))
            .unwrap_err();
        assert!(matches!(
            invalid(err),
            ValidationError::InvalidValue { field: "published", .. }
        ));
    }

    #[test]
    fn test_build_project_row() {
        let record = loader()
            .build(
                ContentKind::Project,
                "projects",
                row("id: dashboard
title: Dashboard Application
description: A data visualization dashboard with real-time updates and analytics.
technologies: [React, D3.js, GraphQL]
imageUrl: /images/projects/dashboard.png
type: dashboard
duration: 2022-03-01..2022-09-30
body: Built with **care**.
"),
            )
            .unwrap();

        assert_eq!(record.url(), "/projects/dashboard");
        assert_eq!(record.tags, vec!["React", "D3.js", "GraphQL"]);
        assert_eq!(record.category, Some(ProjectCategory::Dashboard));
        assert_eq!(record.image.as_deref(), Some("/images/projects/dashboard.png"));
        assert_eq!(
            record.timeline,
            Timeline::Span {
                start: day(2022, 3, 1),
                end: Some(day(2022, 9, 30)),
            }
        );
        assert!(record.content.contains("<strong>care</strong>"));
        assert!(!record.extra.contains_key("body"));
    }

    #[test]
    fn test_project_requires_technologies_but_not_duration() {
        let err = loader()
            .build(ContentKind::Project, "projects", row("id: p\ntitle: P\ndescription: d\n"))
            .unwrap_err();
        assert_eq!(invalid(err), ValidationError::MissingField("technologies"));

        let record = loader()
            .build(
                ContentKind::Project,
                "projects",
                row("id: p\ntitle: P\ndescription: d\ntechnologies: []\n"),
            )
            .unwrap();
        assert!(record.tags.is_empty());
        assert_eq!(record.timeline, Timeline::Undated);
    }

    #[test]
    fn test_unsafe_ids_are_rejected() {
        for id in ["../../escaped", "'a b?c#d'", "a/./b"] {
            let err = loader()
                .build(
                    ContentKind::Project,
                    "projects",
                    row(&format!("id: {id}\ntitle: P\ndescription: d\ntechnologies: []\n")),
                )
                .unwrap_err();
            assert!(
                matches!(invalid(err), ValidationError::InvalidValue { field: "id", .. }),
                "{id}"
            );
        }
    }

    #[test]
    fn test_unsafe_file_names_are_rejected() {
        let err = loader()
            .build(ContentKind::Post, "posts", file("posts/my post?.md", POST))
            .unwrap_err();
        assert!(matches!(
            invalid(err),
            ValidationError::InvalidValue { field: "path", .. }
        ));
    }

    #[test]
    fn test_row_without_id() {
        let err = loader()
            .build(ContentKind::Project, "projects", row("title: P\ndescription: d\n"))
            .unwrap_err();
        assert_eq!(invalid(err), ValidationError::MissingField("id"));
    }

    #[test]
    fn test_unknown_project_type() {
        let err = loader()
            .build(
                ContentKind::Project,
                "projects",
                row("id: p\ntitle: P\ndescription: d\ntechnologies: [Rust]\ntype: desktop\n"),
            )
            .unwrap_err();
        assert!(matches!(invalid(err), ValidationError::InvalidValue { field: "type", .. }));
    }

    #[test]
    fn test_duration_forms() {
        let ongoing = parse_duration(&Value::String("2023-01-05..".into())).unwrap();
        assert_eq!(ongoing, Timeline::Span { start: day(2023, 1, 5), end: None });

        let present = parse_duration(&Value::String("2023-01-05..present".into())).unwrap();
        assert_eq!(present, ongoing);

        let single = parse_duration(&Value::String("2023-01-05".into())).unwrap();
        assert_eq!(
            single,
            Timeline::Span { start: day(2023, 1, 5), end: Some(day(2023, 1, 5)) }
        );

        let mapping: Value = serde_yaml::from_str("start: 2021-02-01\nend: 2021-04-01").unwrap();
        assert_eq!(
            parse_duration(&mapping).unwrap(),
            Timeline::Span { start: day(2021, 2, 1), end: Some(day(2021, 4, 1)) }
        );

        assert!(parse_duration(&Value::String("2023-05-01..2023-01-01".into())).is_err());
        assert!(parse_duration(&Value::String("soon..".into())).is_err());
    }

    #[test]
    fn test_index_file_without_slug() {
        let err = loader()
            .build(ContentKind::Post, "posts", file("posts/index.mdx", POST))
            .unwrap_err();
        assert_eq!(invalid(err), ValidationError::EmptySlug);
    }
}
