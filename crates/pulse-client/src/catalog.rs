use std::collections::BTreeSet;

use pulse_types::{Catalog, CatalogEntry, Category};
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn admits(self, entry: &CatalogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(Category::Animation) => entry.is_animation(),
            Self::Only(category) => entry.category == category,
        }
    }
}

/// One row of the admin catalog table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminRow<'a> {
    pub entry: &'a CatalogEntry,
    pub hidden: bool,
    pub featured: bool,
}

/// Admin-controlled hidden and featured sets layered over the static catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogOverlay {
    hidden: BTreeSet<String>,
    featured: BTreeSet<String>,
}

impl CatalogOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted id lists. Ids are kept as-is; stale ones are harmless.
    pub fn restore(hidden: Vec<String>, featured: Vec<String>) -> Self {
        Self {
            hidden: hidden.into_iter().collect(),
            featured: featured.into_iter().collect(),
        }
    }

    /// Flip visibility of `id`; returns whether it is now hidden.
    pub fn toggle_hidden(&mut self, catalog: &Catalog, id: &str) -> Result<bool> {
        let hidden = toggle(&mut self.hidden, catalog, id)?;
        info!(movie_id = id, hidden, "catalog visibility changed");
        Ok(hidden)
    }

    /// Flip featuring of `id`; returns whether it is now featured.
    pub fn toggle_featured(&mut self, catalog: &Catalog, id: &str) -> Result<bool> {
        let featured = toggle(&mut self.featured, catalog, id)?;
        info!(movie_id = id, featured, "catalog featuring changed");
        Ok(featured)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn is_featured(&self, id: &str) -> bool {
        self.featured.contains(id)
    }

    pub fn hidden_ids(&self) -> Vec<String> {
        self.hidden.iter().cloned().collect()
    }

    pub fn featured_ids(&self) -> Vec<String> {
        self.featured.iter().cloned().collect()
    }

    /// What audience members browse: visible titles matching `filter`,
    /// featured first, otherwise catalog order.
    pub fn audience_listing<'a>(
        &self,
        catalog: &'a Catalog,
        filter: CategoryFilter,
    ) -> Vec<&'a CatalogEntry> {
        let mut listing: Vec<&CatalogEntry> = catalog
            .entries()
            .iter()
            .filter(|e| !self.is_hidden(&e.id) && filter.admits(e))
            .collect();
        listing.sort_by_key(|e| !self.is_featured(&e.id));
        listing
    }

    pub fn admin_listing<'a>(&self, catalog: &'a Catalog) -> Vec<AdminRow<'a>> {
        catalog
            .entries()
            .iter()
            .map(|entry| AdminRow {
                entry,
                hidden: self.is_hidden(&entry.id),
                featured: self.is_featured(&entry.id),
            })
            .collect()
    }
}

fn toggle(set: &mut BTreeSet<String>, catalog: &Catalog, id: &str) -> Result<bool> {
    if !catalog.contains(id) {
        return Err(AppError::movie_not_found(id));
    }
    if set.remove(id) {
        Ok(false)
    } else {
        set.insert(id.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(listing: &[&CatalogEntry]) -> Vec<String> {
        listing.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn category_filter_keeps_catalog_order() {
        let catalog = Catalog::seeded();
        let overlay = CatalogOverlay::new();
        let tamil = overlay.audience_listing(&catalog, CategoryFilter::Only(Category::Tamil));
        assert_eq!(ids(&tamil), vec!["t1", "t2", "t3", "t4", "t5", "t6"]);
        assert_eq!(overlay.audience_listing(&catalog, CategoryFilter::All).len(), 18);
    }

    #[test]
    fn animation_filter_matches_genre() {
        let catalog = Catalog::seeded();
        let overlay = CatalogOverlay::new();
        let animated = overlay.audience_listing(&catalog, CategoryFilter::Only(Category::Animation));
        assert_eq!(ids(&animated), vec!["e4", "e6", "k5"]);
    }

    #[test]
    fn hide_then_unhide_restores_listing() {
        let catalog = Catalog::seeded();
        let mut overlay = CatalogOverlay::new();
        let filter = CategoryFilter::Only(Category::English);

        assert!(overlay.toggle_hidden(&catalog, "e2").unwrap());
        assert!(!ids(&overlay.audience_listing(&catalog, filter)).contains(&"e2".to_string()));

        assert!(!overlay.toggle_hidden(&catalog, "e2").unwrap());
        assert_eq!(
            ids(&overlay.audience_listing(&catalog, filter)),
            vec!["e1", "e2", "e3", "e4", "e5", "e6"]
        );
    }

    #[test]
    fn featured_sort_first_and_stay_stable() {
        let catalog = Catalog::seeded();
        let mut overlay = CatalogOverlay::new();
        overlay.toggle_featured(&catalog, "k6").unwrap();
        overlay.toggle_featured(&catalog, "k3").unwrap();
        let listing = overlay.audience_listing(&catalog, CategoryFilter::Only(Category::KDrama));
        assert_eq!(ids(&listing), vec!["k3", "k6", "k1", "k2", "k4", "k5"]);
    }

    #[test]
    fn unknown_ids_rejected() {
        let catalog = Catalog::seeded();
        let mut overlay = CatalogOverlay::new();
        let err = overlay.toggle_hidden(&catalog, "nope").unwrap_err();
        assert!(matches!(err, AppError::NotFound { what: "movie", .. }));
        assert!(overlay.toggle_featured(&catalog, "nope").is_err());
        assert_eq!(overlay, CatalogOverlay::new());
    }

    #[test]
    fn admin_listing_shows_hidden_titles() {
        let catalog = Catalog::seeded();
        let mut overlay = CatalogOverlay::new();
        overlay.toggle_hidden(&catalog, "t3").unwrap();
        let rows = overlay.admin_listing(&catalog);
        assert_eq!(rows.len(), 18);
        let t3 = rows.iter().find(|r| r.entry.id == "t3").unwrap();
        assert!(t3.hidden && !t3.featured);
    }

    #[test]
    fn restore_round_trips_ids() {
        let overlay = CatalogOverlay::restore(vec!["t1".into()], vec!["e1".into(), "k1".into()]);
        assert_eq!(overlay.hidden_ids(), vec!["t1"]);
        assert_eq!(overlay.featured_ids(), vec!["e1", "k1"]);
    }
}
