use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::domain::tag::{NewTag, Tag, TagListQuery, normalize_tag_names, tag_key};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ProductWriter, TagReader, TagWriter, UnitOfWork};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the tags listing.
#[derive(Debug, Default, Deserialize)]
pub struct TagQuery {
    /// Optional case-insensitive search applied to tag names.
    pub search: Option<String>,
    /// Page number requested by the client (1-based).
    pub page: Option<usize>,
}

/// Tag as exposed by the API.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagView {
    pub id: i32,
    pub name: String,
}

impl From<Tag> for TagView {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// Resolve the raw tag names of every submission in a batch to stored tags.
///
/// Names are normalized per submission, all distinct names of the batch are
/// looked up with one query, and each name that is still missing is created
/// exactly once. The result has one entry per submission, holding its tags in
/// normalized order. An empty batch or a batch of blank names touches nothing.
pub fn reconcile_tags<S, T>(
    store: &S,
    batch: &[T],
    now: NaiveDateTime,
) -> RepositoryResult<Vec<Vec<Tag>>>
where
    S: TagReader + TagWriter + ?Sized,
    T: AsRef<[String]>,
{
    let normalized: Vec<Vec<String>> = batch
        .iter()
        .map(|raw| normalize_tag_names(raw.as_ref()))
        .collect();

    let mut seen = HashSet::new();
    let mut distinct: Vec<(String, &str)> = Vec::new();
    for name in normalized.iter().flatten() {
        let key = tag_key(name);
        if seen.insert(key.clone()) {
            distinct.push((key, name.as_str()));
        }
    }

    if distinct.is_empty() {
        return Ok(vec![Vec::new(); batch.len()]);
    }

    let keys: Vec<String> = distinct.iter().map(|(key, _)| key.clone()).collect();
    let mut resolved: HashMap<String, Tag> = store
        .find_tags_by_keys(&keys)?
        .into_iter()
        .map(|tag| (tag_key(&tag.name), tag))
        .collect();

    let mut created = 0usize;
    for (key, name) in distinct {
        if resolved.contains_key(&key) {
            continue;
        }
        let tag = store.create_tag(&NewTag::new(name, now))?;
        resolved.insert(key, tag);
        created += 1;
    }

    if created > 0 {
        log::info!(
            "Reconciled {} tag names, created {created} new tags",
            keys.len()
        );
    }

    Ok(normalized
        .iter()
        .map(|names| {
            names
                .iter()
                .filter_map(|name| resolved.get(&tag_key(name)).cloned())
                .collect()
        })
        .collect())
}

/// Replace the tag links of `product_id` with `tags`.
pub fn attach_tags<S>(store: &S, product_id: i32, tags: &[Tag]) -> RepositoryResult<()>
where
    S: ProductWriter + ?Sized,
{
    let tag_ids: Vec<i32> = tags.iter().map(|tag| tag.id).collect();
    store.set_product_tags(product_id, &tag_ids)
}

/// Fetches a page of tags, optionally filtered by a name search.
pub fn list_tags<U>(
    uow: &U,
    cancel: &CancellationToken,
    query: TagQuery,
) -> ServiceResult<Paginated<TagView>>
where
    U: UnitOfWork + ?Sized,
{
    let TagQuery { search, page } = query;
    let page = page.unwrap_or(1).max(1);

    let mut list_query = TagListQuery::default();

    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, tags) = uow
        .run(cancel, |store| store.list_tags(list_query))
        .map_err(ServiceError::from)?;
    let tags = tags.into_iter().map(TagView::from).collect();

    Ok(Paginated::new(tags, page, total, DEFAULT_ITEMS_PER_PAGE))
}
