use diesel::prelude::*;

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag, TagListQuery, tag_key};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselStore, TagReader, TagWriter};

impl TagReader for DieselStore<'_> {
    fn find_tags_by_keys(&self, keys: &[String]) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        self.with_conn(|conn| {
            let db_tags = tags::table
                .filter(tags::name_key.eq_any(keys))
                .order(tags::id.asc())
                .load::<DbTag>(conn)?;

            Ok(db_tags.into_iter().map(DomainTag::from).collect())
        })
    }

    fn list_tags(&self, query: TagListQuery) -> RepositoryResult<(usize, Vec<DomainTag>)> {
        use crate::schema::tags;

        // Keys are already case-folded, so the search matches regardless of casing.
        let pattern = query
            .search
            .as_deref()
            .map(tag_key)
            .filter(|term| !term.is_empty())
            .map(|term| format!("%{}%", escape_like(&term)));

        self.with_conn(|conn| {
            let mut count_query = tags::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(pattern) = pattern.as_ref() {
                count_query = count_query.filter(tags::name_key.like(pattern).escape('\\'));
            }

            let total = count_query.count().get_result::<i64>(conn)? as usize;

            let mut items_query = tags::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(pattern) = pattern.as_ref() {
                items_query = items_query.filter(tags::name_key.like(pattern).escape('\\'));
            }

            items_query = items_query.order(tags::name_key.asc());

            if let Some(pagination) = &query.pagination {
                items_query = items_query
                    .offset(pagination.offset())
                    .limit(pagination.limit());
            }

            let db_tags = items_query.load::<DbTag>(conn)?;
            let tags = db_tags.into_iter().map(DomainTag::from).collect();

            Ok((total, tags))
        })
    }
}

impl TagWriter for DieselStore<'_> {
    fn create_tag(&self, new_tag: &DomainNewTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        self.with_conn(|conn| {
            let insertable = DbNewTag::from(new_tag);

            let created = diesel::insert_into(tags::table)
                .values(&insertable)
                .get_result::<DbTag>(conn)?;

            Ok(created.into())
        })
    }
}

/// Escape the `LIKE` wildcards in `term` so it matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
