//! Category filter groups for the catalog sidebar.

use serde::{Deserialize, Serialize};

/// A selectable category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    /// Display name.
    pub name: String,
    /// Slug sent back to the search endpoint as `category`.
    pub slug: String,
}

/// A titled group of categories (e.g. "Станки", "Запчасти").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterGroup {
    /// Group heading.
    pub group: String,
    /// Categories in display order.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

/// Response of the filters endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterGroups {
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

impl FilterGroups {
    /// Check if there is nothing to filter by.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.categories.is_empty())
    }

    /// All categories across groups, in display order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryRef> {
        self.groups.iter().flat_map(|g| g.categories.iter())
    }

    /// Look up a category by slug.
    pub fn find(&self, slug: &str) -> Option<&CategoryRef> {
        self.categories().find(|c| c.slug == slug)
    }
}
