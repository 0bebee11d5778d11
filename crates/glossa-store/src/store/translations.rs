//! Translation CRUD — uniqueness and optimistic-concurrency enforcement.
//!
//! Every mutation runs inside a single transaction covering the
//! translation row, its version guard, and its tag-association rows, so
//! readers never observe a partially-updated tag set.

use super::{parse_timestamp, Store};
use crate::store::tags::{link_tags, resolve_or_create_in};
use glossa_core::error::GlossaError;
use glossa_core::model::{Tag, Translation, TranslationDraft};
use glossa_core::query::Page;
use sqlx::{Sqlite, Transaction};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Row shape shared by the translation queries:
/// (id, key, locale, content, created_at, updated_at, version).
pub(crate) type TranslationRow = (String, String, String, String, String, String, i64);

pub(crate) const TRANSLATION_COLUMNS: &str =
    "id, key, locale, content, created_at, updated_at, version";

pub(crate) fn row_to_translation(
    row: TranslationRow,
    tags: Vec<Tag>,
) -> Result<Translation, GlossaError> {
    let (id, key, locale, content, created_at, updated_at, version) = row;
    Ok(Translation {
        id,
        key,
        locale,
        content,
        tags,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        version,
    })
}

/// Map a unique-index violation to `Duplicate`, anything else to `Storage`.
///
/// The (key, locale) pre-checks run first, so this only fires when a
/// concurrent writer slips between check and insert.
fn duplicate_or_storage(e: sqlx::Error, what: String, op: &str) -> GlossaError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => GlossaError::Duplicate(what),
        _ => GlossaError::Storage(format!("{op} failed: {e}")),
    }
}

fn duplicate_pair_message(key: &str, locale: &str) -> String {
    format!("translation with key '{key}' and locale '{locale}' already exists")
}

async fn fetch_row_in(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> Result<Option<TranslationRow>, GlossaError> {
    sqlx::query_as::<_, TranslationRow>(&format!(
        "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| GlossaError::Storage(format!("fetch translation failed: {e}")))
}

async fn pair_exists_in(
    tx: &mut Transaction<'_, Sqlite>,
    key: &str,
    locale: &str,
) -> Result<bool, GlossaError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM translations WHERE key = ? AND locale = ?")
            .bind(key)
            .bind(locale)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| GlossaError::Storage(format!("uniqueness check failed: {e}")))?;
    Ok(count > 0)
}

impl Store {
    /// Create a translation with version 0 and its resolved tag set.
    ///
    /// Fails with `Duplicate` if the (key, locale) pair is already live,
    /// leaving the store unchanged.
    pub async fn create(&self, draft: &TranslationDraft) -> Result<Translation, GlossaError> {
        debug!("creating translation {}/{}", draft.key, draft.locale);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GlossaError::Storage(format!("begin failed: {e}")))?;

        if pair_exists_in(&mut tx, &draft.key, &draft.locale).await? {
            return Err(GlossaError::Duplicate(duplicate_pair_message(
                &draft.key,
                &draft.locale,
            )));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO translations (id, key, locale, content) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&draft.key)
            .bind(&draft.locale)
            .bind(&draft.content)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                duplicate_or_storage(
                    e,
                    duplicate_pair_message(&draft.key, &draft.locale),
                    "insert translation",
                )
            })?;

        let tags = resolve_or_create_in(&mut tx, &draft.tags).await?;
        link_tags(&mut tx, &id, &tags).await?;

        let row = fetch_row_in(&mut tx, &id)
            .await?
            .ok_or_else(|| GlossaError::Storage(format!("translation {id} missing after insert")))?;

        tx.commit()
            .await
            .map_err(|e| GlossaError::Storage(format!("commit failed: {e}")))?;

        info!("created translation {id} ({}/{})", draft.key, draft.locale);
        row_to_translation(row, tags)
    }

    /// Update a translation under optimistic concurrency.
    ///
    /// The version guard is a single `UPDATE ... WHERE id = ? AND
    /// version = ?`; zero affected rows means another writer got there
    /// first. The tag set is fully replaced, not merged.
    pub async fn update(
        &self,
        id: &str,
        draft: &TranslationDraft,
        expected_version: i64,
    ) -> Result<Translation, GlossaError> {
        debug!("updating translation {id}");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GlossaError::Storage(format!("begin failed: {e}")))?;

        let existing = fetch_row_in(&mut tx, id)
            .await?
            .ok_or_else(|| GlossaError::NotFound(format!("translation not found with id {id}")))?;

        let (_, current_key, current_locale, ..) = &existing;
        let pair_changed = *current_key != draft.key || *current_locale != draft.locale;
        if pair_changed && pair_exists_in(&mut tx, &draft.key, &draft.locale).await? {
            return Err(GlossaError::Duplicate(duplicate_pair_message(
                &draft.key,
                &draft.locale,
            )));
        }

        let result = sqlx::query(
            "UPDATE translations \
             SET key = ?, locale = ?, content = ?, version = version + 1, \
                 updated_at = datetime('now') \
             WHERE id = ? AND version = ?",
        )
        .bind(&draft.key)
        .bind(&draft.locale)
        .bind(&draft.content)
        .bind(id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            duplicate_or_storage(
                e,
                duplicate_pair_message(&draft.key, &draft.locale),
                "update translation",
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(GlossaError::ConcurrentModification(format!(
                "translation {id} changed since version {expected_version} was read"
            )));
        }

        sqlx::query("DELETE FROM translation_tags WHERE translation_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| GlossaError::Storage(format!("clear tag links failed: {e}")))?;

        let tags = resolve_or_create_in(&mut tx, &draft.tags).await?;
        link_tags(&mut tx, id, &tags).await?;

        let row = fetch_row_in(&mut tx, id)
            .await?
            .ok_or_else(|| GlossaError::Storage(format!("translation {id} missing after update")))?;

        tx.commit()
            .await
            .map_err(|e| GlossaError::Storage(format!("commit failed: {e}")))?;

        info!("updated translation {id} to version {}", row.6);
        row_to_translation(row, tags)
    }

    /// Get a translation by id, with its tag set.
    pub async fn get_by_id(&self, id: &str) -> Result<Translation, GlossaError> {
        let row: Option<TranslationRow> = sqlx::query_as(&format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        let row =
            row.ok_or_else(|| GlossaError::NotFound(format!("translation not found with id {id}")))?;
        let mut by_id = self.tags_by_translation(&[row.0.clone()]).await?;
        let tags = by_id.remove(&row.0).unwrap_or_default();
        row_to_translation(row, tags)
    }

    /// Get a translation by its (key, locale) pair, with its tag set.
    pub async fn get_by_key_and_locale(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Translation, GlossaError> {
        let row: Option<TranslationRow> = sqlx::query_as(&format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE key = ? AND locale = ?"
        ))
        .bind(key)
        .bind(locale)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        let row = row.ok_or_else(|| {
            GlossaError::NotFound(format!(
                "translation not found with key '{key}' and locale '{locale}'"
            ))
        })?;
        let mut by_id = self.tags_by_translation(&[row.0.clone()]).await?;
        let tags = by_id.remove(&row.0).unwrap_or_default();
        row_to_translation(row, tags)
    }

    /// Whether a live translation holds the given (key, locale) pair.
    pub async fn exists_by_key_and_locale(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<bool, GlossaError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM translations WHERE key = ? AND locale = ?")
                .bind(key)
                .bind(locale)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;
        Ok(count > 0)
    }

    /// Delete a translation and its tag associations. Tags themselves
    /// are never deleted, even when they become unused.
    pub async fn delete(&self, id: &str) -> Result<(), GlossaError> {
        debug!("deleting translation {id}");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GlossaError::Storage(format!("begin failed: {e}")))?;

        sqlx::query("DELETE FROM translation_tags WHERE translation_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| GlossaError::Storage(format!("clear tag links failed: {e}")))?;

        let result = sqlx::query("DELETE FROM translations WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| GlossaError::Storage(format!("delete failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(GlossaError::NotFound(format!(
                "translation not found with id {id}"
            )));
        }

        tx.commit()
            .await
            .map_err(|e| GlossaError::Storage(format!("commit failed: {e}")))?;

        info!("deleted translation {id}");
        Ok(())
    }

    /// Number of translations in a locale.
    pub async fn count_by_locale(&self, locale: &str) -> Result<u64, GlossaError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM translations WHERE locale = ?")
                .bind(locale)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;
        Ok(count as u64)
    }

    /// Distinct locales with at least one translation, sorted.
    pub async fn distinct_locales(&self) -> Result<Vec<String>, GlossaError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT locale FROM translations ORDER BY locale")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;
        Ok(rows.into_iter().map(|(l,)| l).collect())
    }

    /// Page through a locale's translations, sorted by key.
    pub async fn translations_by_locale(
        &self,
        locale: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Translation>, GlossaError> {
        let total = self.count_by_locale(locale).await?;

        let rows: Vec<TranslationRow> = sqlx::query_as(&format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations \
             WHERE locale = ? ORDER BY key LIMIT ? OFFSET ?"
        ))
        .bind(locale)
        .bind(i64::from(size))
        .bind(i64::from(page) * i64::from(size))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        let items = self.attach_tags(rows).await?;
        Ok(Page::new(items, page, size, total))
    }

    /// Translations updated strictly after the given timestamp, for
    /// incremental consumers. Ordered by locale then key.
    pub async fn updated_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Translation>, GlossaError> {
        let cutoff = since.format("%Y-%m-%d %H:%M:%S").to_string();
        let rows: Vec<TranslationRow> = sqlx::query_as(&format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations \
             WHERE updated_at > ? ORDER BY locale, key"
        ))
        .bind(&cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GlossaError::Storage(format!("query failed: {e}")))?;

        self.attach_tags(rows).await
    }

    /// Resolve each row's tag set and convert to domain records.
    pub(crate) async fn attach_tags(
        &self,
        rows: Vec<TranslationRow>,
    ) -> Result<Vec<Translation>, GlossaError> {
        let ids: Vec<String> = rows.iter().map(|r| r.0.clone()).collect();
        let mut by_id: HashMap<String, Vec<Tag>> = self.tags_by_translation(&ids).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let tags = by_id.remove(&row.0).unwrap_or_default();
            items.push(row_to_translation(row, tags)?);
        }
        Ok(items)
    }
}
