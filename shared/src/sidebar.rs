//! Trait sidebar state: option search and accordion expansion.
//!
//! The option query only narrows what the sidebar lists; it never touches
//! the filter state or the grid.

use std::collections::BTreeSet;

use crate::catalog::TraitCategory;
use crate::facets::FacetOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSidebar {
    query: String,
    /// Categories the user opened by hand.
    expanded: BTreeSet<TraitCategory>,
}

impl FacetSidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn toggle(&mut self, category: TraitCategory) {
        if !self.expanded.remove(&category) {
            self.expanded.insert(category);
        }
    }

    fn folded_query(&self) -> String {
        self.query.to_lowercase()
    }

    /// Shown when there is no query, when the category name contains it,
    /// or when any option does.
    pub fn is_category_visible(&self, options: &FacetOptions, category: TraitCategory) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.folded_query();
        category.as_str().contains(&needle)
            || options
                .values(category)
                .iter()
                .any(|v| v.to_lowercase().contains(&needle))
    }

    /// Categories to render, in sidebar order.
    pub fn visible_categories(&self, options: &FacetOptions) -> Vec<TraitCategory> {
        TraitCategory::ALL
            .into_iter()
            .filter(|c| self.is_category_visible(options, *c))
            .collect()
    }

    /// Options of a category matching the query.
    pub fn visible_options<'a>(&self, options: &'a FacetOptions, category: TraitCategory) -> Vec<&'a str> {
        let needle = self.folded_query();
        options
            .values(category)
            .iter()
            .filter(|v| needle.is_empty() || v.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// A non-empty query opens every visible category; otherwise the manual
    /// toggle decides.
    pub fn is_expanded(&self, options: &FacetOptions, category: TraitCategory) -> bool {
        if !self.query.is_empty() && self.is_category_visible(options, category) {
            return true;
        }
        self.expanded.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Item};
    use crate::facets::compute_options;

    fn options() -> FacetOptions {
        compute_options(&Catalog::new(vec![
            Item::new("a")
                .with_trait(TraitCategory::Outfit, "Tuxedo")
                .with_trait(TraitCategory::Head, "Cowboy Hat"),
            Item::new("b")
                .with_trait(TraitCategory::Outfit, "Hoodie")
                .with_trait(TraitCategory::Pet, "Hamster"),
        ]))
    }

    #[test]
    fn test_no_query_shows_everything_collapsed() {
        let options = options();
        let sidebar = FacetSidebar::new();
        assert_eq!(sidebar.visible_categories(&options), TraitCategory::ALL.to_vec());
        assert!(!sidebar.is_expanded(&options, TraitCategory::Outfit));
        assert_eq!(sidebar.visible_options(&options, TraitCategory::Outfit), vec!["Hoodie", "Tuxedo"]);
    }

    #[test]
    fn test_query_matches_option_values_case_insensitively() {
        let options = options();
        let mut sidebar = FacetSidebar::new();
        sidebar.set_query("HAT");
        assert_eq!(sidebar.visible_categories(&options), vec![TraitCategory::Head]);
        assert_eq!(sidebar.visible_options(&options, TraitCategory::Head), vec!["Cowboy Hat"]);
        assert!(sidebar.is_expanded(&options, TraitCategory::Head));
        assert!(!sidebar.is_expanded(&options, TraitCategory::Outfit));
    }

    #[test]
    fn test_query_matches_category_name() {
        let options = options();
        let mut sidebar = FacetSidebar::new();
        sidebar.set_query("ou");
        // "outfit" by name, "mouth" by name, "Hoodie" has no "ou".
        let visible = sidebar.visible_categories(&options);
        assert_eq!(visible, vec![TraitCategory::Outfit, TraitCategory::Mouth]);
        assert!(sidebar.visible_options(&options, TraitCategory::Outfit).is_empty());
    }

    #[test]
    fn test_manual_toggle() {
        let options = options();
        let mut sidebar = FacetSidebar::new();
        sidebar.toggle(TraitCategory::Pet);
        assert!(sidebar.is_expanded(&options, TraitCategory::Pet));
        sidebar.toggle(TraitCategory::Pet);
        assert!(!sidebar.is_expanded(&options, TraitCategory::Pet));
    }
}
