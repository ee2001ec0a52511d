//! Catalog query types.

use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which result set the catalog shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogTab {
    /// Complete machines.
    #[default]
    Machines,
    /// Spare parts.
    Spares,
}

impl CatalogTab {
    /// Value sent as the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogTab::Machines => "machines",
            CatalogTab::Spares => "spares",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CatalogTab::Machines => "Станки",
            CatalogTab::Spares => "Запчасти",
        }
    }
}

impl FromStr for CatalogTab {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "machines" => Ok(CatalogTab::Machines),
            "spares" => Ok(CatalogTab::Spares),
            _ => Err(CommerceError::InvalidTab(s.to_string())),
        }
    }
}

impl fmt::Display for CatalogTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Twenty,
    Forty,
    Sixty,
}

impl PageSize {
    /// Every supported size, smallest first.
    pub const ALL: [PageSize; 3] = [PageSize::Twenty, PageSize::Forty, PageSize::Sixty];

    /// Items per page.
    pub fn limit(&self) -> u32 {
        match self {
            PageSize::Twenty => 20,
            PageSize::Forty => 40,
            PageSize::Sixty => 60,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = CommerceError;

    fn try_from(limit: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|p| p.limit() == limit)
            .ok_or(CommerceError::InvalidPageSize(limit))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> u32 {
        size.limit()
    }
}

/// One request to the catalog search endpoint.
///
/// All criteria are AND-ed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search; `None` when blank.
    pub search_term: Option<String>,
    pub tab: CatalogTab,
    /// Category slug; `None` means unfiltered.
    pub category: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl CatalogQuery {
    /// First page of a tab with the default page size.
    pub fn new(tab: CatalogTab) -> Self {
        Self {
            search_term: None,
            tab,
            category: None,
            limit: PageSize::default().limit(),
            offset: 0,
        }
    }

    /// Set the text query. Blank terms are dropped.
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        self.search_term = normalize_term(term.as_ref());
        self
    }

    /// Restrict to a category. Blank slugs are dropped.
    pub fn with_category(mut self, slug: Option<impl AsRef<str>>) -> Self {
        self.category = slug.and_then(|s| normalize_term(s.as_ref()));
        self
    }

    /// Set the page window.
    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// Trim a user-entered term; blank means "no term".
pub(crate) fn normalize_term(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A change to one or more filter dimensions.
///
/// Unset fields are left as they are. `category` distinguishes "leave
/// alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChange {
    pub search_term: Option<String>,
    pub tab: Option<CatalogTab>,
    pub category: Option<Option<String>>,
}

impl FilterChange {
    /// Change only the search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self::default().with_search(term)
    }

    /// Change only the tab.
    pub fn tab(tab: CatalogTab) -> Self {
        Self::default().with_tab(tab)
    }

    /// Change only the category (`None` clears it).
    pub fn category(slug: Option<impl Into<String>>) -> Self {
        Self::default().with_category(slug)
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_tab(mut self, tab: CatalogTab) -> Self {
        self.tab = Some(tab);
        self
    }

    pub fn with_category(mut self, slug: Option<impl Into<String>>) -> Self {
        self.category = Some(slug.map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_parse_and_display() {
        assert_eq!("Spares".parse::<CatalogTab>().unwrap(), CatalogTab::Spares);
        assert_eq!(CatalogTab::Machines.to_string(), "machines");
        assert!("tools".parse::<CatalogTab>().is_err());
    }

    #[test]
    fn test_page_size_from_limit() {
        assert_eq!(PageSize::try_from(40).unwrap(), PageSize::Forty);
        assert!(matches!(
            PageSize::try_from(25),
            Err(CommerceError::InvalidPageSize(25))
        ));
        assert_eq!(u32::from(PageSize::Sixty), 60);
    }

    #[test]
    fn test_page_size_serde_as_number() {
        assert_eq!(serde_json::to_string(&PageSize::Forty).unwrap(), "40");
        assert_eq!(serde_json::from_str::<PageSize>("20").unwrap(), PageSize::Twenty);
        assert!(serde_json::from_str::<PageSize>("7").is_err());
    }

    #[test]
    fn test_query_builder() {
        let q = CatalogQuery::new(CatalogTab::Spares)
            .with_search("  шпиндель ")
            .with_category(Some("bearings"))
            .with_page(40, 80);

        assert_eq!(q.search_term.as_deref(), Some("шпиндель"));
        assert_eq!(q.category.as_deref(), Some("bearings"));
        assert_eq!((q.limit, q.offset), (40, 80));
    }

    #[test]
    fn test_blank_terms_are_dropped() {
        let q = CatalogQuery::new(CatalogTab::Machines)
            .with_search("   ")
            .with_category(Some(""));
        assert_eq!(q.search_term, None);
        assert_eq!(q.category, None);
    }

    #[test]
    fn test_filter_change_category_clear_vs_untouched() {
        assert_eq!(FilterChange::tab(CatalogTab::Spares).category, None);
        assert_eq!(FilterChange::category(None::<String>).category, Some(None));
        assert_eq!(
            FilterChange::category(Some("lathes")).category,
            Some(Some("lathes".to_string()))
        );
    }
}
