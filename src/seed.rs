//! Sample-data seeding for local development and demos.

use glossa_core::auth::Principal;
use glossa_core::error::GlossaError;
use glossa_core::model::TranslationDraft;
use glossa_service::Catalog;
use tracing::info;

const LOCALES: &[&str] = &["en", "fr", "es", "de", "it", "pt"];
const CONTEXTS: &[&str] = &[
    "app", "auth", "nav", "error", "form", "button", "dashboard", "profile", "settings", "order",
];
const ACTIONS: &[&str] = &[
    "create", "save", "cancel", "submit", "search", "export", "edit", "view", "delete", "list",
];
const COMPONENTS: &[&str] = &[
    "title", "label", "tooltip", "placeholder", "hint", "success", "warning", "empty",
];
const TAG_POOL: &[&str] = &["web", "mobile", "desktop", "email", "onboarding", "checkout"];

/// Seed up to `count` translations over a deterministic key grid.
/// Existing (key, locale) pairs are skipped, so reseeding is idempotent.
pub async fn run(catalog: &Catalog, principal: &Principal, count: usize) -> anyhow::Result<()> {
    info!("seeding up to {count} translations");

    let mut created = 0usize;
    let mut skipped = 0usize;

    'grid: for (i, context) in CONTEXTS.iter().enumerate() {
        for (j, action) in ACTIONS.iter().enumerate() {
            for (k, component) in COMPONENTS.iter().enumerate() {
                let key = format!("{context}.{action}.{component}");
                for locale in LOCALES {
                    if created + skipped >= count {
                        break 'grid;
                    }
                    let draft = TranslationDraft {
                        key: key.clone(),
                        locale: (*locale).to_string(),
                        content: format!("[{locale}] {context} {action} {component}"),
                        tags: tags_for(i + j + k),
                    };
                    match catalog.create_translation(principal, draft).await {
                        Ok(_) => created += 1,
                        Err(GlossaError::Duplicate(_)) => skipped += 1,
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }

    info!("seeded {created} translations ({skipped} already present)");
    println!("seeded {created} translations ({skipped} already present)");
    Ok(())
}

/// Pick one or two tags by grid position.
fn tags_for(index: usize) -> Vec<String> {
    let mut tags = vec![TAG_POOL[index % TAG_POOL.len()].to_string()];
    if index % 3 == 0 {
        tags.push(TAG_POOL[(index + 2) % TAG_POOL.len()].to_string());
    }
    tags
}
