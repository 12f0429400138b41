//! Search and pagination engine shared by the category and post registries.
//!
//! A search filters on one text field (case-insensitive, unanchored substring),
//! orders by an allow-listed sort field, then skips `start` records and takes at
//! most `record_size`. The total count is taken before paging. Ties on the sort
//! field are broken by id in the same direction so consecutive pages never
//! overlap.
//!
//! [`paginate`] is the in-memory rendition; storage backends that push the
//! query down (see `folio-infra`) must honour the same contract.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::domain::{Category, Post, PostView};

pub const DEFAULT_START: u64 = 0;
pub const DEFAULT_RECORD_SIZE: u64 = 10;
pub const MAX_RECORD_SIZE: u64 = 100;

/// Sort direction, encoded on the wire as `1` (ascending) or `-1` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Negative values sort descending, everything else ascending.
    pub fn from_order_type(order_type: i64) -> Self {
        if order_type < 0 {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub fn order_type(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// An allow-listed sort field for one entity.
pub trait SortKey: Copy + Send + Sync + 'static {
    const DEFAULT: Self;
    const ALLOWED: &'static [Self];

    /// The wire name (`orderParam`) of this field.
    fn param(self) -> &'static str;

    fn from_param(param: &str) -> Option<Self> {
        Self::ALLOWED.iter().copied().find(|key| key.param() == param)
    }

    /// Comma-separated wire names, for error messages.
    fn allowed_params() -> String {
        Self::ALLOWED
            .iter()
            .map(|key| key.param())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySortField {
    Name,
    Title,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for CategorySortField {
    const DEFAULT: Self = Self::CreatedAt;
    const ALLOWED: &'static [Self] = &[Self::Name, Self::Title, Self::CreatedAt, Self::UpdatedAt];

    fn param(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSortField {
    Title,
    PostedBy,
    PostedOn,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for PostSortField {
    const DEFAULT: Self = Self::CreatedAt;
    const ALLOWED: &'static [Self] = &[
        Self::Title,
        Self::PostedBy,
        Self::PostedOn,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    fn param(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::PostedBy => "postedBy",
            Self::PostedOn => "postedOn",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery<S> {
    pub text: String,
    pub start: u64,
    pub record_size: u64,
    pub sort: S,
    pub direction: SortDirection,
}

impl<S: SortKey> Default for SearchQuery<S> {
    fn default() -> Self {
        Self {
            text: String::new(),
            start: DEFAULT_START,
            record_size: DEFAULT_RECORD_SIZE,
            sort: S::DEFAULT,
            direction: SortDirection::default(),
        }
    }
}

impl<S: SortKey> SearchQuery<S> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn page(mut self, start: u64, record_size: u64) -> Self {
        self.start = start;
        self.record_size = record_size;
        self
    }

    pub fn sorted_by(mut self, sort: S, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Lower-cased `LIKE` pattern for the search text with `%`, `_` and `\`
    /// escaped (escape character `\`). `None` when the text is empty.
    pub fn like_pattern(&self) -> Option<String> {
        if self.text.is_empty() {
            return None;
        }
        let mut pattern = String::with_capacity(self.text.len() + 2);
        pattern.push('%');
        for c in self.text.to_lowercase().chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

/// One page of results plus the number of matches before paging.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_records: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total_records: self.total_records,
        }
    }
}

/// Records the in-memory engine can filter and order.
pub trait Searchable<S> {
    fn id(&self) -> Uuid;

    /// The designated text field the substring filter applies to.
    fn search_field(&self) -> &str;

    fn compare_by(&self, other: &Self, key: S) -> Ordering;
}

/// Case-insensitive, unanchored substring match. An empty needle matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filter, order and page `items` according to `query`.
pub fn paginate<T, S>(items: impl IntoIterator<Item = T>, query: &SearchQuery<S>) -> Page<T>
where
    T: Searchable<S>,
    S: SortKey,
{
    let mut matching: Vec<T> = items
        .into_iter()
        .filter(|item| contains_ignore_case(item.search_field(), &query.text))
        .collect();

    matching.sort_by(|a, b| {
        query
            .direction
            .apply(a.compare_by(b, query.sort).then_with(|| a.id().cmp(&b.id())))
    });

    let total_records = matching.len() as u64;
    let records = matching
        .into_iter()
        .skip(usize::try_from(query.start).unwrap_or(usize::MAX))
        .take(usize::try_from(query.record_size).unwrap_or(usize::MAX))
        .collect();

    Page {
        records,
        total_records,
    }
}

impl Searchable<CategorySortField> for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_field(&self) -> &str {
        &self.name
    }

    fn compare_by(&self, other: &Self, key: CategorySortField) -> Ordering {
        match key {
            CategorySortField::Name => self.name.cmp(&other.name),
            CategorySortField::Title => self.title.cmp(&other.title),
            CategorySortField::CreatedAt => self.created_at.cmp(&other.created_at),
            CategorySortField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}

impl Searchable<PostSortField> for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_field(&self) -> &str {
        &self.title
    }

    fn compare_by(&self, other: &Self, key: PostSortField) -> Ordering {
        match key {
            PostSortField::Title => self.title.cmp(&other.title),
            PostSortField::PostedBy => self.posted_by.cmp(&other.posted_by),
            PostSortField::PostedOn => self.posted_on.cmp(&other.posted_on),
            PostSortField::CreatedAt => self.created_at.cmp(&other.created_at),
            PostSortField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}

impl Searchable<PostSortField> for PostView {
    fn id(&self) -> Uuid {
        self.post.id
    }

    fn search_field(&self) -> &str {
        &self.post.title
    }

    fn compare_by(&self, other: &Self, key: PostSortField) -> Ordering {
        self.post.compare_by(&other.post, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(names: &[&str]) -> Vec<Category> {
        let owner = Uuid::new_v4();
        names
            .iter()
            .map(|name| Category::new(owner, name, name.to_uppercase(), None, None))
            .collect()
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        assert!(contains_ignore_case("Observability Patterns", "pattern"));
        assert!(contains_ignore_case("Observability Patterns", "OBSERV"));
        assert!(contains_ignore_case("Observability Patterns", ""));
        assert!(!contains_ignore_case("Observability Patterns", "xyz123"));
    }

    #[test]
    fn test_paginate_filters_sorts_and_counts() {
        let items = categories(&["rust", "go", "trust", "zig", "crust"]);
        let query = SearchQuery::new("UST")
            .sorted_by(CategorySortField::Name, SortDirection::Descending)
            .page(1, 1);

        let page = paginate(items, &query);

        assert_eq!(page.total_records, 3);
        let names: Vec<_> = page.records.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["rust"]);
    }

    #[test]
    fn test_pages_concatenate_to_full_result() {
        let items = categories(&["a", "b", "c", "d", "e", "f", "g"]);
        let full = paginate(
            items.clone(),
            &SearchQuery::<CategorySortField>::new("").page(0, 100),
        );

        let mut collected = Vec::new();
        let mut start = 0;
        loop {
            let page = paginate(
                items.clone(),
                &SearchQuery::<CategorySortField>::new("").page(start, 3),
            );
            assert_eq!(page.total_records, 7);
            if page.records.is_empty() {
                break;
            }
            collected.extend(page.records);
            start += 3;
        }

        assert_eq!(collected, full.records);
    }

    #[test]
    fn test_start_past_end_yields_empty_page() {
        let page = paginate(
            categories(&["a", "b"]),
            &SearchQuery::<CategorySortField>::new("").page(10, 10),
        );
        assert!(page.records.is_empty());
        assert_eq!(page.total_records, 2);
    }

    #[test]
    fn test_sort_key_allow_list() {
        assert_eq!(
            PostSortField::from_param("postedOn"),
            Some(PostSortField::PostedOn)
        );
        assert_eq!(PostSortField::from_param("password"), None);
        assert_eq!(CategorySortField::from_param("postedBy"), None);
        assert_eq!(CategorySortField::DEFAULT.param(), "createdAt");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let query = SearchQuery::<PostSortField>::new("50%_Off\\");
        assert_eq!(query.like_pattern().as_deref(), Some("%50\\%\\_off\\\\%"));
        assert_eq!(SearchQuery::<PostSortField>::new("").like_pattern(), None);
    }

    #[test]
    fn test_order_type_encoding() {
        assert_eq!(SortDirection::from_order_type(-1), SortDirection::Descending);
        assert_eq!(SortDirection::from_order_type(-7), SortDirection::Descending);
        assert_eq!(SortDirection::from_order_type(0), SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.order_type(), -1);
    }
}
