//! Search filters, sorting, and pagination types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GlossaError;

/// Optional search predicates; an absent field imposes no restriction.
/// Supplied predicates are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Substring match against the key, case-sensitive.
    pub key: Option<String>,
    /// Exact locale match.
    pub locale: Option<String>,
    /// Substring match against the content, case-insensitive.
    pub content: Option<String>,
    /// Exact match against any associated tag name.
    pub tag: Option<String>,
}

impl SearchFilter {
    /// Treat blank filter values as absent.
    pub fn normalized(mut self) -> Self {
        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&self.key) {
            self.key = None;
        }
        if blank(&self.locale) {
            self.locale = None;
        }
        if blank(&self.content) {
            self.content = None;
        }
        if blank(&self.tag) {
            self.tag = None;
        }
        self
    }
}

/// Translation fields a search result may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Key,
    Locale,
    Content,
    CreatedAt,
    #[default]
    UpdatedAt,
    Version,
}

impl SortField {
    /// Column name in the translations table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Locale => "locale",
            Self::Content => "content",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Version => "version",
        }
    }
}

impl FromStr for SortField {
    type Err = GlossaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(Self::Key),
            "locale" => Ok(Self::Locale),
            "content" => Ok(Self::Content),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            "version" => Ok(Self::Version),
            other => Err(GlossaError::Validation(format!(
                "unknown sort field '{other}'"
            ))),
        }
    }
}

/// Tag fields a tag listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagSortField {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
}

impl TagSortField {
    /// Column name in the tags table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for TagSortField {
    type Err = GlossaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            "updatedAt" | "updated_at" => Ok(Self::UpdatedAt),
            other => Err(GlossaError::Validation(format!(
                "unknown tag sort field '{other}'"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = GlossaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(GlossaError::Validation(format!(
                "sort direction must be 'asc' or 'desc', got '{other}'"
            ))),
        }
    }
}

/// Zero-based page request with sorting.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort_by: SortField::UpdatedAt,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl PageRequest {
    pub fn validate(&self) -> Result<(), GlossaError> {
        if self.size == 0 {
            return Err(GlossaError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// One page of results with totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Build a page, deriving `total_pages = ceil(total_elements / size)`
    /// (zero when there are no matches).
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(size.max(1)))
        };
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_math() {
        let p = Page::new(vec![1, 2], 0, 2, 5);
        assert_eq!(p.total_pages, 3);

        let p = Page::new(vec![1, 2], 0, 2, 4);
        assert_eq!(p.total_pages, 2);

        let empty: Page<i32> = Page::new(Vec::new(), 0, 20, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn sort_field_parses_both_cases() {
        assert_eq!(
            "updatedAt".parse::<SortField>().ok(),
            Some(SortField::UpdatedAt)
        );
        assert_eq!(
            "updated_at".parse::<SortField>().ok(),
            Some(SortField::UpdatedAt)
        );
        assert!("drop table".parse::<SortField>().is_err());
    }

    #[test]
    fn direction_parses_case_insensitive() {
        assert_eq!(
            "DESC".parse::<SortDirection>().ok(),
            Some(SortDirection::Desc)
        );
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn blank_filters_normalize_to_absent() {
        let f = SearchFilter {
            key: Some("  ".to_string()),
            locale: Some("en".to_string()),
            content: None,
            tag: Some(String::new()),
        };
        let f = f.normalized();
        assert!(f.key.is_none());
        assert_eq!(f.locale.as_deref(), Some("en"));
        assert!(f.tag.is_none());
    }

    #[test]
    fn zero_size_rejected() {
        let req = PageRequest {
            size: 0,
            ..PageRequest::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn offset_scales_with_page() {
        let req = PageRequest {
            page: 3,
            size: 25,
            ..PageRequest::default()
        };
        assert_eq!(req.offset(), 75);
    }
}
