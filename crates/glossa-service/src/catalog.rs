//! Catalog service — orchestrates the store, the cache, and access checks.
//!
//! Reads go through the cache first and fall back to the store; every
//! successful write evicts all cache regions strictly after the store
//! transaction has committed.

use glossa_core::auth::Principal;
use glossa_core::config::{Config, ExportConfig};
use glossa_core::error::GlossaError;
use glossa_core::model::{Tag, Translation, TranslationDraft};
use glossa_core::query::{Page, PageRequest, SearchFilter, SortDirection, TagSortField};
use glossa_store::Store;
use tracing::warn;

use crate::cache::{CacheLayer, CacheStats};
use crate::export::{build_snapshot, export_scope, ExportSnapshot};

/// The translation catalog service.
pub struct Catalog {
    store: Store,
    cache: CacheLayer,
    export: ExportConfig,
}

fn ensure_can_edit(principal: &Principal) -> Result<(), GlossaError> {
    if !principal.role.can_edit() {
        return Err(GlossaError::Forbidden(format!(
            "role {} may not modify translations",
            principal.role
        )));
    }
    Ok(())
}

fn ensure_can_delete(principal: &Principal) -> Result<(), GlossaError> {
    if !principal.role.can_delete() {
        return Err(GlossaError::Forbidden(format!(
            "role {} may not delete translations",
            principal.role
        )));
    }
    Ok(())
}

impl Catalog {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            cache: CacheLayer::new(&config.cache),
            export: config.export.clone(),
        }
    }

    /// Create a translation. Requires an editing role.
    pub async fn create_translation(
        &self,
        principal: &Principal,
        draft: TranslationDraft,
    ) -> Result<Translation, GlossaError> {
        ensure_can_edit(principal)?;
        draft.validate()?;

        let created = self.store.create(&draft).await?;
        self.cache.evict_all().await;
        Ok(created)
    }

    /// Update a translation under optimistic concurrency. Requires an
    /// editing role.
    pub async fn update_translation(
        &self,
        principal: &Principal,
        id: &str,
        draft: TranslationDraft,
        expected_version: i64,
    ) -> Result<Translation, GlossaError> {
        ensure_can_edit(principal)?;
        draft.validate()?;

        let updated = self.store.update(id, &draft, expected_version).await?;
        self.cache.evict_all().await;
        Ok(updated)
    }

    /// Delete a translation. Requires an admin role.
    pub async fn delete_translation(
        &self,
        principal: &Principal,
        id: &str,
    ) -> Result<(), GlossaError> {
        ensure_can_delete(principal)?;

        self.store.delete(id).await?;
        self.cache.evict_all().await;
        Ok(())
    }

    /// Point lookup by id, read-through cached.
    pub async fn get_translation(
        &self,
        _principal: &Principal,
        id: &str,
    ) -> Result<Translation, GlossaError> {
        if let Some(hit) = self.cache.get_by_id(id).await {
            return Ok(hit);
        }
        let translation = self.store.get_by_id(id).await?;
        self.cache.put_by_id(&translation).await;
        Ok(translation)
    }

    /// Point lookup by (key, locale), read-through cached.
    pub async fn get_translation_by_key(
        &self,
        _principal: &Principal,
        key: &str,
        locale: &str,
    ) -> Result<Translation, GlossaError> {
        if let Some(hit) = self.cache.get_by_key_locale(key, locale).await {
            return Ok(hit);
        }
        let translation = self.store.get_by_key_and_locale(key, locale).await?;
        self.cache.put_by_key_locale(&translation).await;
        Ok(translation)
    }

    /// Whether a (key, locale) pair is taken. Exposed for caller-side
    /// idempotency checks.
    pub async fn translation_exists(
        &self,
        _principal: &Principal,
        key: &str,
        locale: &str,
    ) -> Result<bool, GlossaError> {
        self.store.exists_by_key_and_locale(key, locale).await
    }

    /// Multi-filter search; not cached.
    pub async fn search_translations(
        &self,
        _principal: &Principal,
        filter: SearchFilter,
        page: PageRequest,
    ) -> Result<Page<Translation>, GlossaError> {
        page.validate()?;
        self.store.search(&filter.normalized(), &page).await
    }

    /// Page through one locale's translations, sorted by key.
    pub async fn translations_by_locale(
        &self,
        _principal: &Principal,
        locale: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Translation>, GlossaError> {
        if size == 0 {
            return Err(GlossaError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        self.store.translations_by_locale(locale, page, size).await
    }

    /// Distinct locales with at least one translation, read-through cached.
    pub async fn available_locales(
        &self,
        _principal: &Principal,
    ) -> Result<Vec<String>, GlossaError> {
        if let Some(hit) = self.cache.get_locales().await {
            return Ok(hit);
        }
        let locales = self.store.distinct_locales().await?;
        self.cache.put_locales(locales.clone()).await;
        Ok(locales)
    }

    /// Number of translations in a locale.
    pub async fn count_by_locale(
        &self,
        _principal: &Principal,
        locale: &str,
    ) -> Result<u64, GlossaError> {
        self.store.count_by_locale(locale).await
    }

    /// Translations updated after the cutoff, for incremental consumers.
    pub async fn updated_since(
        &self,
        _principal: &Principal,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Translation>, GlossaError> {
        self.store.updated_since(since).await
    }

    /// Export a locale-keyed snapshot, read-through cached per scope.
    ///
    /// Public: no principal required. A `locale` restricts the snapshot
    /// to that locale; `None` exports everything.
    pub async fn export(&self, locale: Option<&str>) -> Result<ExportSnapshot, GlossaError> {
        let locale = locale.map(str::trim).filter(|l| !l.is_empty());
        let scope = export_scope(locale);

        if let Some(hit) = self.cache.get_export(&scope).await {
            return Ok(hit);
        }

        let rows = self.store.export_rows(locale).await?;
        if rows.len() > self.export.max_export_size {
            warn!(
                "export size ({}) exceeds maximum allowed ({})",
                rows.len(),
                self.export.max_export_size
            );
        }

        let snapshot = build_snapshot(rows, locale, &self.export);
        self.cache.put_export(&scope, &snapshot).await;
        Ok(snapshot)
    }

    /// Page through all tags.
    pub async fn list_tags(
        &self,
        _principal: &Principal,
        page: u32,
        size: u32,
        sort_by: TagSortField,
        sort_direction: SortDirection,
    ) -> Result<Page<Tag>, GlossaError> {
        if size == 0 {
            return Err(GlossaError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        self.store.list_tags(page, size, sort_by, sort_direction).await
    }

    /// Tag name substring search, case-insensitive.
    pub async fn search_tags(
        &self,
        _principal: &Principal,
        name_pattern: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Tag>, GlossaError> {
        if size == 0 {
            return Err(GlossaError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        self.store.search_tags(name_pattern, page, size).await
    }

    /// Tags used by any translation with the given key.
    pub async fn tags_for_key(
        &self,
        _principal: &Principal,
        translation_key: &str,
    ) -> Result<Vec<Tag>, GlossaError> {
        self.store.tags_for_key(translation_key).await
    }

    /// Cache hit/miss counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
