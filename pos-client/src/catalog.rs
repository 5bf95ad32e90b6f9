//! In-memory catalog cache with filtering and search
//!
//! Read-mostly: the item list is replaced wholesale on `reload` and the
//! category options are always derived from the current load, never
//! carried over from a previous one.

use crate::{ClientResult, PosApi};
use shared::models::Item;

/// Category selection for the POS item grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show every category
    #[default]
    All,
    /// Show only items whose category equals this value exactly
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Catalog of purchasable items currently loaded from the service
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog contents from the service.
    ///
    /// `include_inactive` is for the admin screen; the POS screen loads
    /// active items only.
    pub async fn reload(&mut self, api: &PosApi, include_inactive: bool) -> ClientResult<()> {
        self.replace(api.list_items(include_inactive).await?);
        Ok(())
    }

    /// Replace the catalog contents directly
    pub fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sorted distinct categories of the current load
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.items.iter().map(|item| item.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Items visible under a category filter and free-text query.
    ///
    /// An item matches when the category filter passes AND the query is
    /// empty or a case-insensitive substring of its name or item code.
    /// Zero matches yields an empty vec for the caller to render as an
    /// explicit empty state.
    pub fn visible(&self, filter: &CategoryFilter, query: &str) -> Vec<&Item> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| filter.matches(&item.category))
            .filter(|item| {
                needle.is_empty()
                    || item.name.to_lowercase().contains(&needle)
                    || item.item_code.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
