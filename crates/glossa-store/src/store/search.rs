//! Dynamic multi-filter translation search.
//!
//! Each supplied filter contributes one predicate; the predicates are
//! AND-combined into a single paginated query plus a matching count
//! query. `instr()` keeps key matching case-sensitive (SQLite `LIKE` is
//! not for ASCII) and treats `%`/`_` in user input as literal text. The
//! tag predicate is a subquery, so a translation with several matching
//! associations still appears once.

use super::translations::{TranslationRow, TRANSLATION_COLUMNS};
use super::Store;
use glossa_core::error::GlossaError;
use glossa_core::model::Translation;
use glossa_core::query::{Page, PageRequest, SearchFilter};
use tracing::debug;

impl Store {
    /// Search translations with optional filters, sorted and paginated.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        page: &PageRequest,
    ) -> Result<Page<Translation>, GlossaError> {
        let mut conds: Vec<&'static str> = Vec::new();
        let mut binds: Vec<&str> = Vec::new();

        if let Some(key) = filter.key.as_deref() {
            conds.push("instr(t.key, ?) > 0");
            binds.push(key);
        }
        if let Some(locale) = filter.locale.as_deref() {
            conds.push("t.locale = ?");
            binds.push(locale);
        }
        if let Some(content) = filter.content.as_deref() {
            conds.push("instr(lower(t.content), lower(?)) > 0");
            binds.push(content);
        }
        if let Some(tag) = filter.tag.as_deref() {
            conds.push(
                "t.id IN (SELECT tt.translation_id FROM translation_tags tt \
                 JOIN tags g ON g.id = tt.tag_id WHERE g.name = ?)",
            );
            binds.push(tag);
        }

        let where_clause = if conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conds.join(" AND "))
        };

        debug!("searching translations with {} filter(s)", conds.len());

        let count_sql = format!("SELECT COUNT(*) FROM translations t{where_clause}");
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(*bind);
        }
        let (total,) = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GlossaError::Storage(format!("search count failed: {e}")))?;

        // Stable order: id breaks ties within the sort column.
        let sql = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations t{where_clause} \
             ORDER BY t.{} {}, t.id LIMIT ? OFFSET ?",
            page.sort_by.column(),
            page.sort_direction.as_sql()
        );
        let mut query = sqlx::query_as::<_, TranslationRow>(&sql);
        for bind in &binds {
            query = query.bind(*bind);
        }
        let rows = query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GlossaError::Storage(format!("search failed: {e}")))?;

        let items = self.attach_tags(rows).await?;
        Ok(Page::new(items, page.page, page.size, total as u64))
    }
}
