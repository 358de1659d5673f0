//! The pack size catalog.
//!
//! Holds the live set of distinct, strictly positive pack sizes the engine
//! calculates against. Mutations are serialized through an `RwLock`;
//! readers always observe the last completed write, and a calculation works
//! on a snapshot so a concurrent add/remove can never produce a torn read.

use std::collections::BTreeSet;
use std::sync::RwLock;

use serde::Serialize;

/// Errors raised by catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The size is not a positive integer.
    InvalidSize(u64),
    /// The size is already present; duplicates are rejected, not merged.
    DuplicateSize(u64),
    /// The size to remove is not in the catalog.
    NotFound(u64),
}

impl CatalogError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidSize(_) => "invalid_size",
            CatalogError::DuplicateSize(_) => "duplicate_size",
            CatalogError::NotFound(_) => "not_found",
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::InvalidSize(size) => {
                write!(f, "pack size must be greater than 0, got: {}", size)
            }
            CatalogError::DuplicateSize(size) => write!(f, "pack size {} already exists", size),
            CatalogError::NotFound(size) => write!(f, "pack size {} not found", size),
        }
    }
}

impl std::error::Error for CatalogError {}

/// One page of pack sizes, for list views that do not want the whole catalog.
///
/// # Fields
/// * `page` - 1-based page number
/// * `limit` - Requested page length
/// * `offset` - Index of the first returned size within the full listing
/// * `total` - Total number of sizes in the catalog
/// * `is_last_page` - Whether no further page follows
/// * `items` - The sizes on this page, ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
    pub is_last_page: bool,
    pub items: Vec<u64>,
}

/// The live collection of pack sizes.
///
/// Iteration order is always ascending, so repeated listings and repeated
/// calculations over the same catalog are reproducible.
#[derive(Debug, Default)]
pub struct PackCatalog {
    sizes: RwLock<BTreeSet<u64>>,
}

impl PackCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new pack size.
    ///
    /// # Errors
    /// * `CatalogError::InvalidSize` if `size` is zero
    /// * `CatalogError::DuplicateSize` if `size` is already present
    pub fn add(&self, size: u64) -> Result<(), CatalogError> {
        if size == 0 {
            return Err(CatalogError::InvalidSize(size));
        }

        let mut sizes = self.sizes.write().expect("catalog lock poisoned");
        if !sizes.insert(size) {
            return Err(CatalogError::DuplicateSize(size));
        }
        Ok(())
    }

    /// Removes a pack size.
    ///
    /// # Errors
    /// * `CatalogError::NotFound` if `size` is not in the catalog
    pub fn remove(&self, size: u64) -> Result<(), CatalogError> {
        let mut sizes = self.sizes.write().expect("catalog lock poisoned");
        if !sizes.remove(&size) {
            return Err(CatalogError::NotFound(size));
        }
        Ok(())
    }

    /// Returns all pack sizes in ascending order.
    ///
    /// The returned vector is a consistent snapshot: it can be iterated any
    /// number of times and is unaffected by later mutations. The engine
    /// consumes exactly this view.
    pub fn list(&self) -> Vec<u64> {
        let sizes = self.sizes.read().expect("catalog lock poisoned");
        sizes.iter().copied().collect()
    }

    /// Returns one page of the ascending listing.
    ///
    /// Pages are 1-based; a page number of 0 is treated as 1. A page past
    /// the end yields an empty item list with the correct total, and a
    /// limit of 0 yields an empty page marked as last so a pager always
    /// terminates.
    pub fn list_page(&self, page: u64, limit: u64) -> Page {
        let all = self.list();
        let total = all.len() as u64;
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(limit);

        let items: Vec<u64> = all
            .into_iter()
            .skip(offset.min(total) as usize)
            .take(limit as usize)
            .collect();

        let is_last_page = limit == 0 || offset + items.len() as u64 >= total;
        Page {
            page,
            limit,
            offset,
            total,
            is_last_page,
            items,
        }
    }

    /// Whether the catalog holds a given size.
    pub fn contains(&self, size: u64) -> bool {
        let sizes = self.sizes.read().expect("catalog lock poisoned");
        sizes.contains(&size)
    }

    /// Number of sizes in the catalog.
    pub fn len(&self) -> usize {
        let sizes = self.sizes.read().expect("catalog lock poisoned");
        sizes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(sizes: &[u64]) -> PackCatalog {
        let catalog = PackCatalog::new();
        for &size in sizes {
            catalog.add(size).expect("seed size");
        }
        catalog
    }

    #[test]
    fn rejects_zero_size() {
        let catalog = PackCatalog::new();
        assert_eq!(catalog.add(0), Err(CatalogError::InvalidSize(0)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn rejects_duplicate_size() {
        let catalog = catalog_with(&[250]);
        assert_eq!(catalog.add(250), Err(CatalogError::DuplicateSize(250)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn remove_absent_size_fails_with_not_found() {
        let catalog = catalog_with(&[250]);
        assert_eq!(catalog.remove(500), Err(CatalogError::NotFound(500)));
        assert_eq!(catalog.remove(250), Ok(()));
        assert_eq!(catalog.remove(250), Err(CatalogError::NotFound(250)));
    }

    #[test]
    fn lists_ascending_regardless_of_insertion_order() {
        let catalog = catalog_with(&[2000, 250, 5000, 1000, 500]);
        assert_eq!(catalog.list(), vec![250, 500, 1000, 2000, 5000]);
    }

    #[test]
    fn list_is_a_stable_snapshot() {
        let catalog = catalog_with(&[250, 500]);
        let snapshot = catalog.list();
        catalog.add(1000).expect("add");
        assert_eq!(snapshot, vec![250, 500]);
        assert_eq!(catalog.list(), vec![250, 500, 1000]);
    }

    #[test]
    fn paginates_with_last_page_flag() {
        let catalog = catalog_with(&[250, 500, 1000, 2000, 5000]);

        let first = catalog.list_page(1, 2);
        assert_eq!(first.items, vec![250, 500]);
        assert_eq!(first.total, 5);
        assert!(!first.is_last_page);

        let last = catalog.list_page(3, 2);
        assert_eq!(last.items, vec![5000]);
        assert_eq!(last.offset, 4);
        assert!(last.is_last_page);

        let beyond = catalog.list_page(4, 2);
        assert!(beyond.items.is_empty());
        assert!(beyond.is_last_page);
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn zero_limit_page_is_empty_and_last() {
        let catalog = catalog_with(&[250, 500]);
        let page = catalog.list_page(1, 0);
        assert!(page.items.is_empty());
        assert!(page.is_last_page);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn error_messages_name_the_size() {
        assert_eq!(
            CatalogError::InvalidSize(0).to_string(),
            "pack size must be greater than 0, got: 0"
        );
        assert_eq!(
            CatalogError::DuplicateSize(250).to_string(),
            "pack size 250 already exists"
        );
        assert_eq!(
            CatalogError::NotFound(42).to_string(),
            "pack size 42 not found"
        );
    }
}
