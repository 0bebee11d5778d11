//! Bulk row loading for export snapshots.

use super::Store;
use glossa_core::error::GlossaError;

impl Store {
    /// All (locale, key, content) rows for an export snapshot, scoped to
    /// one locale when given, ordered by locale then key.
    pub async fn export_rows(
        &self,
        locale: Option<&str>,
    ) -> Result<Vec<(String, String, String)>, GlossaError> {
        let rows = match locale {
            Some(locale) => {
                sqlx::query_as(
                    "SELECT locale, key, content FROM translations WHERE locale = ? ORDER BY key",
                )
                .bind(locale)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT locale, key, content FROM translations ORDER BY locale, key",
                )
                .fetch_all(&self.pool)
                .await
            }
        };

        rows.map_err(|e| GlossaError::Storage(format!("export query failed: {e}")))
    }
}
