//! Domain model — translations, tags, and the input shapes that create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GlossaError;

/// Maximum length of a translation key, in characters.
pub const MAX_KEY_LEN: usize = 500;
/// Maximum length of a locale code, in characters.
pub const MAX_LOCALE_LEN: usize = 10;
/// Maximum length of translation content, in characters.
pub const MAX_CONTENT_LEN: usize = 5000;
/// Maximum length of a tag name, in characters.
pub const MAX_TAG_NAME_LEN: usize = 100;
/// Maximum length of a tag description, in characters.
pub const MAX_TAG_DESCRIPTION_LEN: usize = 500;

/// A text snippet identified by its (key, locale) pair.
///
/// The pair is unique across all live translations. `version` increments
/// by one on every successful update and drives optimistic concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: String,
    pub key: String,
    pub locale: String,
    pub content: String,
    /// Associated tags, unique by identity, sorted by name.
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

/// A named label grouping translations.
///
/// Tags are created lazily when an unseen name is first used on a
/// translation and are read-only afterwards. Their lifecycle is
/// independent of the translations referencing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating or updating a translation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationDraft {
    pub key: String,
    pub locale: String,
    pub content: String,
    /// Tag names to resolve; the stored tag set is fully replaced on update.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TranslationDraft {
    /// Check field presence and length limits before the draft reaches
    /// the store.
    pub fn validate(&self) -> Result<(), GlossaError> {
        require_text("key", &self.key, MAX_KEY_LEN)?;
        require_text("locale", &self.locale, MAX_LOCALE_LEN)?;
        require_text("content", &self.content, MAX_CONTENT_LEN)?;
        for name in &self.tags {
            require_text("tag name", name, MAX_TAG_NAME_LEN)?;
        }
        Ok(())
    }
}

/// Reject blank or over-length text fields.
fn require_text(field: &str, value: &str, max: usize) -> Result<(), GlossaError> {
    if value.trim().is_empty() {
        return Err(GlossaError::Validation(format!("{field} must not be blank")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(GlossaError::Validation(format!(
            "{field} must not exceed {max} characters (got {len})"
        )));
    }
    Ok(())
}
