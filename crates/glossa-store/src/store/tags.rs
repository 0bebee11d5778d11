//! Tag resolution and queries.
//!
//! Tags come into existence only through [`resolve_or_create_in`]; they
//! are read-only everywhere else and are never deleted.

use super::{parse_timestamp, Store};
use glossa_core::error::GlossaError;
use glossa_core::model::Tag;
use glossa_core::query::{Page, SortDirection, TagSortField};
use sqlx::{Sqlite, Transaction};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Row shape shared by the tag queries:
/// (id, name, description, created_at, updated_at).
pub(crate) type TagRow = (String, String, Option<String>, String, String);

const TAG_COLUMNS: &str = "id, name, description, created_at, updated_at";

fn row_to_tag(row: TagRow) -> Result<Tag, GlossaError> {
    let (id, name, description, created_at, updated_at) = row;
    Ok(Tag {
        id,
        name,
        description,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

async fn find_by_name_in(
    tx: &mut Transaction<'_, Sqlite>,
    name: &str,
) -> Result<Option<Tag>, GlossaError> {
    let row: Option<TagRow> =
        sqlx::query_as(&format!("SELECT {TAG_COLUMNS} FROM tags WHERE name = ?"))
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| GlossaError::Storage(format!("tag lookup failed: {e}")))?;
    row.map(row_to_tag).transpose()
}

/// Resolve tag names to records inside the caller's transaction,
/// creating unseen names.
///
/// Unseen names go through `INSERT OR IGNORE` followed by a re-fetch, so
/// two callers racing on the same name converge on a single row: the
/// loser adopts the winner's record instead of surfacing a conflict.
/// Duplicate and blank names in the input are skipped.
pub(crate) async fn resolve_or_create_in(
    tx: &mut Transaction<'_, Sqlite>,
    names: &[String],
) -> Result<Vec<Tag>, GlossaError> {
    let mut tags = Vec::new();
    let mut seen = HashSet::new();

    for name in names {
        let name = name.trim();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }

        if let Some(tag) = find_by_name_in(tx, name).await? {
            tags.push(tag);
            continue;
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT OR IGNORE INTO tags (id, name) VALUES (?, ?)")
            .bind(&id)
            .bind(name)
            .execute(&mut **tx)
            .await
            .map_err(|e| GlossaError::Storage(format!("create tag failed: {e}")))?;
        debug!("resolved tag '{name}'");

        let tag = find_by_name_in(tx, name).await?.ok_or_else(|| {
            GlossaError::Storage(format!("tag '{name}' missing after insert"))
        })?;
        tags.push(tag);
    }

    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
}

/// Insert association rows for a translation's resolved tag set.
pub(crate) async fn link_tags(
    tx: &mut Transaction<'_, Sqlite>,
    translation_id: &str,
    tags: &[Tag],
) -> Result<(), GlossaError> {
    for tag in tags {
        sqlx::query(
            "INSERT OR IGNORE INTO translation_tags (translation_id, tag_id) VALUES (?, ?)",
        )
        .bind(translation_id)
        .bind(&tag.id)
        .execute(&mut **tx)
        .await
        .map_err(|e| GlossaError::Storage(format!("link tag failed: {e}")))?;
    }
    Ok(())
}

impl Store {
    /// Resolve a set of tag names, creating any that do not exist yet.
    ///
    /// Idempotent: resolving the same names again returns records with
    /// the same identifiers.
    pub async fn resolve_or_create(&self, names: &[String]) -> Result<Vec<Tag>, GlossaError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GlossaError::Storage(format!("begin failed: {e}")))?;

        let tags = resolve_or_create_in(&mut tx, names).await?;

        tx.commit()
            .await
            .map_err(|e| GlossaError::Storage(format!("commit failed: {e}")))?;
        Ok(tags)
    }

    /// Page through all tags with a whitelisted sort.
    pub async fn list_tags(
        &self,
        page: u32,
        size: u32,
        sort_by: TagSortField,
        sort_direction: SortDirection,
    ) -> Result<Page<Tag>, GlossaError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GlossaError::Storage(format!("count failed: {e}")))?;

        let sql = format!(
            "SELECT {TAG_COLUMNS} FROM tags ORDER BY {} {}, name LIMIT ? OFFSET ?",
            sort_by.column(),
            sort_direction.as_sql()
        );
        let rows: Vec<TagRow> = sqlx::query_as(&sql)
            .bind(i64::from(size))
            .bind(i64::from(page) * i64::from(size))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        let tags = rows.into_iter().map(row_to_tag).collect::<Result<_, _>>()?;
        Ok(Page::new(tags, page, size, total as u64))
    }

    /// Tag name substring search, case-insensitive, ordered by name.
    pub async fn search_tags(
        &self,
        name_pattern: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Tag>, GlossaError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tags WHERE instr(lower(name), lower(?)) > 0")
                .bind(name_pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| GlossaError::Storage(format!("count failed: {e}")))?;

        let rows: Vec<TagRow> = sqlx::query_as(&format!(
            "SELECT {TAG_COLUMNS} FROM tags \
             WHERE instr(lower(name), lower(?)) > 0 ORDER BY name LIMIT ? OFFSET ?"
        ))
        .bind(name_pattern)
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        let tags = rows.into_iter().map(row_to_tag).collect::<Result<_, _>>()?;
        Ok(Page::new(tags, page, size, total as u64))
    }

    /// Tags used by any translation with the given key, across locales.
    pub async fn tags_for_key(&self, translation_key: &str) -> Result<Vec<Tag>, GlossaError> {
        let rows: Vec<TagRow> = sqlx::query_as(
            "SELECT DISTINCT g.id, g.name, g.description, g.created_at, g.updated_at \
             FROM tags g \
             JOIN translation_tags tt ON tt.tag_id = g.id \
             JOIN translations t ON t.id = tt.translation_id \
             WHERE t.key = ? ORDER BY g.name",
        )
        .bind(translation_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        rows.into_iter().map(row_to_tag).collect()
    }

    /// Tag sets for a batch of translation ids, each sorted by name.
    pub(crate) async fn tags_by_translation(
        &self,
        translation_ids: &[String],
    ) -> Result<HashMap<String, Vec<Tag>>, GlossaError> {
        if translation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; translation_ids.len()].join(", ");
        let sql = format!(
            "SELECT tt.translation_id, g.id, g.name, g.description, g.created_at, g.updated_at \
             FROM translation_tags tt JOIN tags g ON g.id = tt.tag_id \
             WHERE tt.translation_id IN ({placeholders}) ORDER BY g.name"
        );

        let mut query =
            sqlx::query_as::<_, (String, String, String, Option<String>, String, String)>(&sql);
        for id in translation_ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GlossaError::Storage(format!("tag batch query failed: {e}")))?;

        let mut by_translation: HashMap<String, Vec<Tag>> = HashMap::new();
        for (translation_id, id, name, description, created_at, updated_at) in rows {
            by_translation
                .entry(translation_id)
                .or_default()
                .push(row_to_tag((id, name, description, created_at, updated_at))?);
        }
        Ok(by_translation)
    }
}
