use crate::Catalog;
use glossa_core::auth::{Principal, Role};
use glossa_core::config::{CdnConfig, Config, StorageConfig};
use glossa_core::error::GlossaError;
use glossa_core::model::TranslationDraft;
use glossa_core::query::{PageRequest, SearchFilter};
use glossa_store::Store;

/// Create a catalog over an in-memory store.
async fn test_catalog_with(config: Config) -> Catalog {
    let storage = StorageConfig {
        db_path: ":memory:".to_string(),
        max_connections: 1,
    };
    let store = Store::new(&storage).await.unwrap();
    Catalog::new(store, &config)
}

async fn test_catalog() -> Catalog {
    test_catalog_with(Config::default()).await
}

fn admin() -> Principal {
    Principal::new("alice", Role::Admin)
}

fn editor() -> Principal {
    Principal::new("bob", Role::Editor)
}

fn viewer() -> Principal {
    Principal::new("carol", Role::Viewer)
}

fn draft(key: &str, locale: &str, content: &str, tags: &[&str]) -> TranslationDraft {
    TranslationDraft {
        key: key.to_string(),
        locale: locale.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn roles_gate_writes() {
    let catalog = test_catalog().await;

    let err = catalog
        .create_translation(&viewer(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::Forbidden(_)));

    let created = catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    let err = catalog
        .delete_translation(&editor(), &created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::Forbidden(_)));

    catalog.delete_translation(&admin(), &created.id).await.unwrap();
}

#[tokio::test]
async fn validation_runs_before_the_store() {
    let catalog = test_catalog().await;

    let err = catalog
        .create_translation(&editor(), draft("  ", "en", "Home", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::Validation(_)));

    let err = catalog
        .search_translations(
            &viewer(),
            SearchFilter::default(),
            PageRequest {
                size: 0,
                ..PageRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::Validation(_)));
}

#[tokio::test]
async fn point_lookups_are_read_through_cached() {
    let catalog = test_catalog().await;
    let created = catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    let first = catalog.get_translation(&viewer(), &created.id).await.unwrap();
    let second = catalog.get_translation(&viewer(), &created.id).await.unwrap();
    assert_eq!(first.content, second.content);

    let stats = catalog.cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn update_invalidates_cached_reads() {
    let catalog = test_catalog().await;
    let created = catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    // Warm both point-lookup regions.
    catalog.get_translation(&viewer(), &created.id).await.unwrap();
    catalog
        .get_translation_by_key(&viewer(), "app.title", "en")
        .await
        .unwrap();

    catalog
        .update_translation(
            &editor(),
            &created.id,
            draft("app.title", "en", "Dashboard", &[]),
            0,
        )
        .await
        .unwrap();

    let by_id = catalog.get_translation(&viewer(), &created.id).await.unwrap();
    assert_eq!(by_id.content, "Dashboard");
    let by_key = catalog
        .get_translation_by_key(&viewer(), "app.title", "en")
        .await
        .unwrap();
    assert_eq!(by_key.content, "Dashboard");
}

#[tokio::test]
async fn delete_invalidates_cached_reads() {
    let catalog = test_catalog().await;
    let created = catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    catalog.get_translation(&viewer(), &created.id).await.unwrap();
    catalog.delete_translation(&admin(), &created.id).await.unwrap();

    let err = catalog
        .get_translation(&viewer(), &created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::NotFound(_)));
}

#[tokio::test]
async fn locale_listing_tracks_writes() {
    let catalog = test_catalog().await;
    assert!(catalog.available_locales(&viewer()).await.unwrap().is_empty());

    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();
    assert_eq!(catalog.available_locales(&viewer()).await.unwrap(), vec!["en"]);

    catalog
        .create_translation(&editor(), draft("app.title", "fr", "Accueil", &[]))
        .await
        .unwrap();
    assert_eq!(
        catalog.available_locales(&viewer()).await.unwrap(),
        vec!["en", "fr"]
    );
}

#[tokio::test]
async fn search_normalizes_blank_filters() {
    let catalog = test_catalog().await;
    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    let filter = SearchFilter {
        key: Some("   ".to_string()),
        ..SearchFilter::default()
    };
    let page = catalog
        .search_translations(&viewer(), filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_elements, 1);
}

#[tokio::test]
async fn export_scopes_and_totals() {
    let catalog = test_catalog().await;
    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();
    catalog
        .create_translation(&editor(), draft("nav.home", "en", "Home page", &[]))
        .await
        .unwrap();
    catalog
        .create_translation(&editor(), draft("app.title", "fr", "Accueil", &[]))
        .await
        .unwrap();

    let scoped = catalog.export(Some("en")).await.unwrap();
    assert_eq!(scoped.locales, vec!["en"]);
    assert_eq!(scoped.total_translations, 2);
    assert_eq!(scoped.translations["en"]["app.title"], "Home");

    let full = catalog.export(None).await.unwrap();
    assert_eq!(full.locales, vec!["en", "fr"]);
    assert_eq!(full.total_translations, 3);
    // Widest locale: en carries two keys.
    assert_eq!(full.total_keys, 2);
}

#[tokio::test]
async fn export_is_cached_until_a_write() {
    let catalog = test_catalog().await;
    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    let first = catalog.export(None).await.unwrap();
    let cached = catalog.export(None).await.unwrap();
    assert_eq!(first.generated_at, cached.generated_at);

    catalog
        .create_translation(&editor(), draft("nav.home", "en", "Home page", &[]))
        .await
        .unwrap();
    let rebuilt = catalog.export(None).await.unwrap();
    assert_eq!(rebuilt.total_translations, 2);
}

#[tokio::test]
async fn export_blank_locale_means_full() {
    let catalog = test_catalog().await;
    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    let snapshot = catalog.export(Some("  ")).await.unwrap();
    assert_eq!(snapshot.locales, vec!["en"]);
    assert_eq!(snapshot.cache_ttl, Some(300));
}

#[tokio::test]
async fn export_carries_cdn_url_when_configured() {
    let mut config = Config::default();
    config.export.cdn = CdnConfig {
        enabled: true,
        base_url: "https://cdn.example.com".to_string(),
    };
    let catalog = test_catalog_with(config).await;
    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();

    let scoped = catalog.export(Some("en")).await.unwrap();
    assert_eq!(
        scoped.cdn_url.as_deref(),
        Some("https://cdn.example.com/translations/export_en.json")
    );
}

#[tokio::test]
async fn tag_surface_is_read_only_and_paged() {
    let catalog = test_catalog().await;
    catalog
        .create_translation(&editor(), draft("app.title", "en", "Home", &["web", "mobile"]))
        .await
        .unwrap();

    let page = catalog
        .list_tags(
            &viewer(),
            0,
            10,
            glossa_core::query::TagSortField::Name,
            glossa_core::query::SortDirection::Asc,
        )
        .await
        .unwrap();
    let names: Vec<&str> = page.content.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["mobile", "web"]);

    let hits = catalog.search_tags(&viewer(), "web", 0, 10).await.unwrap();
    assert_eq!(hits.total_elements, 1);

    let for_key = catalog.tags_for_key(&viewer(), "app.title").await.unwrap();
    assert_eq!(for_key.len(), 2);
}

#[tokio::test]
async fn lifecycle_end_to_end() {
    let catalog = test_catalog().await;
    let principal = editor();

    let created = catalog
        .create_translation(&principal, draft("app.title", "en", "Home", &[]))
        .await
        .unwrap();
    assert_eq!(created.version, 0);

    let err = catalog
        .create_translation(&principal, draft("app.title", "en", "Home again", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::Duplicate(_)));

    let updated = catalog
        .update_translation(
            &principal,
            &created.id,
            draft("app.title", "en", "Dashboard", &[]),
            0,
        )
        .await
        .unwrap();
    assert_eq!(updated.version, 1);

    let err = catalog
        .update_translation(
            &principal,
            &created.id,
            draft("app.title", "en", "Start", &[]),
            0,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::ConcurrentModification(_)));

    catalog.delete_translation(&admin(), &created.id).await.unwrap();
    let err = catalog
        .get_translation(&principal, &created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::NotFound(_)));
}
