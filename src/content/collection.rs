//! The owned, read-only collection of records of one kind

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::loader::ContentLoader;
use super::source::EntrySource;
use super::{ContentKind, ContentRecord, LoadError};

/// Field a listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Post date or project start
    Date,
    Title,
    Slug,
}

/// Listing order, written like `-date` (descending) or `title` (ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            descending: true,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, s),
        };
        let field = match name {
            "date" => SortField::Date,
            "title" => SortField::Title,
            "slug" => SortField::Slug,
            _ => {
                return Err(format!(
                    "unknown sort order `{s}`, expected date, title or slug (prefix with - to reverse)"
                ))
            }
        };
        Ok(Self { field, descending })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.field {
            SortField::Date => "date",
            SortField::Title => "title",
            SortField::Slug => "slug",
        };
        if self.descending {
            write!(f, "-{name}")
        } else {
            f.write_str(name)
        }
    }
}

impl SortOrder {
    /// Total order: the chosen field, then slug ascending.
    /// Undated records come after dated ones in either direction.
    pub fn compare(&self, a: &ContentRecord, b: &ContentRecord) -> Ordering {
        let directed = |ord: Ordering| if self.descending { ord.reverse() } else { ord };

        let primary = match self.field {
            SortField::Date => match (a.sort_date(), b.sort_date()) {
                (Some(x), Some(y)) => directed(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::Title => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            SortField::Slug => directed(a.slug.cmp(&b.slug)),
        };

        primary.then_with(|| a.slug.cmp(&b.slug))
    }
}

/// All records of one content kind
///
/// Built once by [`ContentSource::load`]; there is no way to add, change or
/// remove a record afterwards.
#[derive(Debug)]
pub struct ContentSource {
    kind: ContentKind,
    records: Vec<ContentRecord>,
    by_slug: HashMap<String, usize>,
}

impl ContentSource {
    /// Load and validate every entry of `source`.
    ///
    /// The first invalid entry or duplicate slug fails the whole load.
    pub fn load(
        kind: ContentKind,
        prefix: &str,
        source: &dyn EntrySource,
        loader: &ContentLoader,
    ) -> Result<Self, LoadError> {
        let mut collection = Self {
            kind,
            records: Vec::new(),
            by_slug: HashMap::new(),
        };

        for entry in source.entries()? {
            let record = loader.build(kind, prefix, entry)?;
            collection.insert(record)?;
        }

        tracing::info!(
            "Loaded {} {} record(s) from {}",
            collection.records.len(),
            kind,
            source.describe()
        );

        Ok(collection)
    }

    /// Build a collection from already validated records
    pub fn from_records(
        kind: ContentKind,
        records: impl IntoIterator<Item = ContentRecord>,
    ) -> Result<Self, LoadError> {
        let mut collection = Self {
            kind,
            records: Vec::new(),
            by_slug: HashMap::new(),
        };
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }

    fn insert(&mut self, record: ContentRecord) -> Result<(), LoadError> {
        match self.by_slug.entry(record.slug.clone()) {
            Entry::Occupied(existing) => Err(LoadError::DuplicateSlug {
                slug: record.slug,
                first: self.records[*existing.get()].source.clone(),
                second: record.source,
            }),
            Entry::Vacant(slot) => {
                slot.insert(self.records.len());
                self.records.push(record);
                Ok(())
            }
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Every record, published or not, in origin order
    pub fn load_all(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Direct lookup; ignores `published` so unlisted records stay reachable
    pub fn get_by_slug(&self, slug: &str) -> Option<&ContentRecord> {
        self.by_slug.get(slug).map(|&i| &self.records[i])
    }

    /// Published records in the given order
    pub fn list_published(&self, order: SortOrder) -> Vec<&ContentRecord> {
        let mut listed: Vec<_> = self.records.iter().filter(|r| r.published).collect();
        listed.sort_by(|a, b| order.compare(a, b));
        listed
    }

    /// Published records carrying `tag` (case-insensitive)
    pub fn tagged(&self, tag: &str, order: SortOrder) -> Vec<&ContentRecord> {
        let mut listed = self.list_published(order);
        listed.retain(|r| r.has_tag(tag));
        listed
    }

    /// Tag usage across published records, most used first, then by name
    pub fn tag_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for record in self.records.iter().filter(|r| r.published) {
            for tag in &record.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts.sort_by(|k1, v1, k2, v2| v2.cmp(v1).then_with(|| k1.cmp(k2)));
        counts
    }

    /// The published records before and after `slug` in a listing.
    ///
    /// Both are `None` for unpublished or unknown slugs.
    pub fn neighbors(
        &self,
        slug: &str,
        order: SortOrder,
    ) -> (Option<&ContentRecord>, Option<&ContentRecord>) {
        let listed = self.list_published(order);
        match listed.iter().position(|r| r.slug == slug) {
            Some(pos) => (
                pos.checked_sub(1).map(|i| listed[i]),
                listed.get(pos + 1).copied(),
            ),
            None => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::record::fixtures::post;
    use crate::content::source::TableSource;
    use crate::content::PublishedPolicy;

    fn slugs(records: &[&ContentRecord]) -> Vec<String> {
        records.iter().map(|r| r.slug.clone()).collect()
    }

    fn load_table(yaml: &str) -> Result<ContentSource, LoadError> {
        let source = TableSource::from_yaml_str("posts.yml", yaml)?;
        let loader = ContentLoader::new(PublishedPolicy::Lenient);
        ContentSource::load(ContentKind::Post, "posts", &source, &loader)
    }

    const SCENARIO: &str = r#"
- id: b
  title: B
  description: ""
  date: 2023-07-20
  published: true
- id: a
  title: A
  description: ""
  date: 2023-07-20
  published: true
- id: c
  title: C
  description: ""
  date: 2023-09-05
  published: false
"#;

    #[test]
    fn test_scenario_listing_and_lookup() {
        let posts = load_table(SCENARIO).unwrap();

        let listed = posts.list_published(SortOrder::default());
        assert_eq!(slugs(&listed), vec!["a", "b"]);

        let c = posts.get_by_slug("c").expect("unpublished record resolves");
        assert!(!c.published);
        assert_eq!(c.url(), "/blog/c");
    }

    #[test]
    fn test_round_trip_lookup() {
        let posts = load_table(SCENARIO).unwrap();
        for record in posts.load_all() {
            assert_eq!(posts.get_by_slug(&record.slug), Some(record));
        }
        assert!(posts.get_by_slug("missing").is_none());
    }

    #[test]
    fn test_load_all_keeps_origin_order() {
        let posts = load_table(SCENARIO).unwrap();
        let all: Vec<_> = posts.load_all().iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(all, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_repeated_loads_are_identical() {
        let first = load_table(SCENARIO).unwrap();
        let second = load_table(SCENARIO).unwrap();
        assert_eq!(first.load_all(), second.load_all());
        let urls = |c: &ContentSource| c.load_all().iter().map(|r| r.url()).collect::<Vec<_>>();
        assert_eq!(urls(&first), urls(&second));
    }

    #[test]
    fn test_unpublished_never_listed() {
        let posts = load_table(SCENARIO).unwrap();
        for order in ["date", "-date", "title", "-title", "slug", "-slug"] {
            let order: SortOrder = order.parse().unwrap();
            assert!(posts.list_published(order).iter().all(|r| r.slug != "c"));
        }
    }

    #[test]
    fn test_duplicate_slug_fails_load() {
        let yaml = r#"
- id: same
  title: One
  description: ""
  date: 2023-01-01
- id: same
  title: Two
  description: ""
  date: 2023-02-01
"#;
        match load_table(yaml).unwrap_err() {
            LoadError::DuplicateSlug {
                slug,
                first,
                second,
            } => {
                assert_eq!(slug, "same");
                assert_eq!(first, "posts.yml[0]");
                assert_eq!(second, "posts.yml[1]");
            }
            other => panic!("expected duplicate slug, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_entry_fails_whole_load() {
        let yaml = "- id: ok\n  title: Ok\n  description: ''\n  date: 2023-01-01\n- id: bad\n  description: ''\n  date: 2023-01-01\n";
        let err = load_table(yaml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "posts.yml[1] (slug `bad`): missing required field `title`"
        );
    }

    #[test]
    fn test_sort_is_deterministic_with_slug_tie_break() {
        let posts = ContentSource::from_records(
            ContentKind::Post,
            vec![
                post("delta", "2023-01-01"),
                post("bravo", "2023-05-01"),
                post("alpha", "2023-05-01"),
                post("charlie", "2022-12-31"),
            ],
        )
        .unwrap();

        let first = slugs(&posts.list_published(SortOrder::default()));
        let second = slugs(&posts.list_published(SortOrder::default()));
        assert_eq!(first, second);
        assert_eq!(first, vec!["alpha", "bravo", "delta", "charlie"]);

        let ascending = slugs(&posts.list_published("date".parse().unwrap()));
        assert_eq!(ascending, vec!["charlie", "delta", "alpha", "bravo"]);
    }

    #[test]
    fn test_undated_records_sort_last() {
        let mut undated = post("undated", "2023-01-01");
        undated.timeline = crate::content::Timeline::Undated;
        let posts = ContentSource::from_records(
            ContentKind::Post,
            vec![undated, post("old", "2020-01-01"), post("new", "2024-01-01")],
        )
        .unwrap();

        assert_eq!(
            slugs(&posts.list_published("-date".parse().unwrap())),
            vec!["new", "old", "undated"]
        );
        assert_eq!(
            slugs(&posts.list_published("date".parse().unwrap())),
            vec!["old", "new", "undated"]
        );
    }

    #[test]
    fn test_sort_by_title() {
        let mut x = post("x", "2023-01-01");
        x.title = "beta".into();
        let mut y = post("y", "2023-01-01");
        y.title = "Alpha".into();
        let posts = ContentSource::from_records(ContentKind::Post, vec![x, y]).unwrap();
        assert_eq!(slugs(&posts.list_published("title".parse().unwrap())), vec!["y", "x"]);
        assert_eq!(slugs(&posts.list_published("-title".parse().unwrap())), vec!["x", "y"]);
    }

    #[test]
    fn test_sort_order_parse_and_display() {
        let order: SortOrder = "-date".parse().unwrap();
        assert_eq!(order, SortOrder::default());
        assert_eq!(order.to_string(), "-date");
        assert_eq!("title".parse::<SortOrder>().unwrap().to_string(), "title");
        assert!("-views".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_tags() {
        let mut a = post("a", "2023-01-01");
        a.tags = vec!["react".into(), "nextjs".into()];
        let mut b = post("b", "2023-02-01");
        b.tags = vec!["React".into(), "css".into()];
        let mut hidden = post("hidden", "2023-03-01");
        hidden.tags = vec!["css".into(), "draft".into()];
        hidden.published = false;

        let posts = ContentSource::from_records(ContentKind::Post, vec![a, b, hidden]).unwrap();

        assert_eq!(slugs(&posts.tagged("REACT", SortOrder::default())), vec!["b", "a"]);
        assert!(posts.tagged("draft", SortOrder::default()).is_empty());

        let counts: Vec<_> = posts.tag_counts().into_iter().collect();
        assert_eq!(
            counts,
            vec![
                ("React".to_string(), 1),
                ("css".to_string(), 1),
                ("nextjs".to_string(), 1),
                ("react".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_neighbors() {
        let mut hidden = post("hidden", "2023-02-15");
        hidden.published = false;
        let posts = ContentSource::from_records(
            ContentKind::Post,
            vec![post("jan", "2023-01-01"), hidden, post("mar", "2023-03-01"), post("feb", "2023-02-01")],
        )
        .unwrap();

        let order = SortOrder::default();
        let (prev, next) = posts.neighbors("feb", order);
        assert_eq!(prev.map(|r| r.slug.as_str()), Some("mar"));
        assert_eq!(next.map(|r| r.slug.as_str()), Some("jan"));

        let (prev, next) = posts.neighbors("mar", order);
        assert!(prev.is_none());
        assert_eq!(next.map(|r| r.slug.as_str()), Some("feb"));

        assert_eq!(posts.neighbors("hidden", order), (None, None));
    }
}
