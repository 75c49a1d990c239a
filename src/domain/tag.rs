use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Maximum number of characters in a trimmed tag name.
pub const TAG_NAME_MAX_LEN: usize = 50;

/// Domain representation of a reusable tag that can be attached to multiple products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Human-readable name, in the casing it was first submitted with.
    pub name: String,
    /// Timestamp for when the tag record was created.
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    /// Trimmed human-readable name.
    pub name: String,
    /// Case-folded comparison key, unique across all tags.
    pub name_key: String,
    /// Timestamp captured for the request creating the tag.
    pub created_at: NaiveDateTime,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name and its comparison key.
    pub fn new(name: impl Into<String>, created_at: NaiveDateTime) -> Self {
        let name = name.into().trim().to_string();
        let name_key = tag_key(&name);
        Self {
            name,
            name_key,
            created_at,
        }
    }
}

/// Query definition used to list tags.
#[derive(Debug, Clone, Default)]
pub struct TagListQuery {
    /// Optional case-insensitive substring search.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl TagListQuery {
    /// Filter the results by a search term applied to the tag name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Comparison key of a tag name: trimmed and lowercased.
///
/// Two names are the same tag exactly when their keys are equal.
pub fn tag_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim raw tag names, drop blank entries and remove case-insensitive
/// duplicates. The first spelling of each name is kept, in input order.
pub fn normalize_tag_names<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for name in raw {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(tag_key(trimmed)) {
            names.push(trimmed.to_string());
        }
    }

    names
}
