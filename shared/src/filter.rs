//! Filter Engine: per-category selections combined with AND.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, Item, TraitCategory};

/// One selection slot per category. An empty slot is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    selections: BTreeMap<TraitCategory, String>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState::new()
    }
}

impl FilterState {
    pub fn new() -> Self {
        FilterState {
            selections: TraitCategory::ALL
                .into_iter()
                .map(|category| (category, String::new()))
                .collect(),
        }
    }

    /// Current selection for a category, "" when unconstrained.
    pub fn get(&self, category: TraitCategory) -> &str {
        self.selections
            .get(&category)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Replace one category's selection. An empty value clears it.
    /// Returns true if the state changed.
    pub fn set(&mut self, category: TraitCategory, value: &str) -> bool {
        let slot = self.selections.entry(category).or_default();
        if slot.as_str() == value {
            return false;
        }
        *slot = value.to_string();
        true
    }

    /// Reset every category at once. Returns true if anything was active.
    pub fn clear_all(&mut self) -> bool {
        let changed = self.active_count() > 0;
        for slot in self.selections.values_mut() {
            slot.clear();
        }
        changed
    }

    pub fn active_count(&self) -> usize {
        self.selections.values().filter(|v| !v.is_empty()).count()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_count() == 0
    }

    /// Active (category, value) pairs in category order.
    pub fn active(&self) -> impl Iterator<Item = (TraitCategory, &str)> {
        self.selections
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(c, v)| (*c, v.as_str()))
    }

    /// Exact, case-sensitive match on every active category. An item
    /// missing a constrained category fails.
    pub fn matches(&self, item: &Item) -> bool {
        self.active()
            .all(|(category, wanted)| item.trait_value(category) == Some(wanted))
    }
}

/// Catalog positions of the matching items, in catalog order.
pub fn apply_filters(catalog: &Catalog, state: &FilterState) -> Vec<usize> {
    if state.is_unconstrained() {
        return (0..catalog.len()).collect();
    }
    catalog
        .iter()
        .enumerate()
        .filter(|(_, item)| state.matches(item))
        .map(|(position, _)| position)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Item::new("a").with_trait(TraitCategory::Outfit, "Suit").with_trait(TraitCategory::Head, "Cap"),
            Item::new("b").with_trait(TraitCategory::Outfit, "Hoodie").with_trait(TraitCategory::Head, "Cap"),
            Item::new("c").with_trait(TraitCategory::Outfit, "Suit"),
            Item::new("d").with_trait(TraitCategory::Outfit, "Suit").with_trait(TraitCategory::Head, "Crown"),
        ])
    }

    #[test]
    fn test_new_state_has_every_category_empty() {
        let state = FilterState::new();
        for category in TraitCategory::ALL {
            assert_eq!(state.get(category), "");
        }
        assert!(state.is_unconstrained());
    }

    #[test]
    fn test_empty_state_is_identity() {
        let catalog = catalog();
        assert_eq!(apply_filters(&catalog, &FilterState::new()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_single_filter_preserves_order() {
        let catalog = catalog();
        let mut state = FilterState::new();
        state.set(TraitCategory::Outfit, "Suit");
        assert_eq!(apply_filters(&catalog, &state), vec![0, 2, 3]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let catalog = catalog();
        let mut state = FilterState::new();
        state.set(TraitCategory::Outfit, "Suit");
        state.set(TraitCategory::Head, "Cap");
        assert_eq!(apply_filters(&catalog, &state), vec![0]);
        assert_eq!(state.active_count(), 2);
    }

    #[test]
    fn test_missing_category_fails_constraint() {
        let catalog = catalog();
        let mut state = FilterState::new();
        state.set(TraitCategory::Head, "Crown");
        assert_eq!(apply_filters(&catalog, &state), vec![3]);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let catalog = catalog();
        let mut state = FilterState::new();
        state.set(TraitCategory::Outfit, "suit");
        assert!(apply_filters(&catalog, &state).is_empty());
    }

    #[test]
    fn test_filtered_is_ordered_subsequence() {
        let catalog = catalog();
        let mut state = FilterState::new();
        for value in ["Suit", "Hoodie", "Missing"] {
            state.set(TraitCategory::Outfit, value);
            let positions = apply_filters(&catalog, &state);
            assert!(positions.len() <= catalog.len());
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_set_and_clear_report_changes() {
        let mut state = FilterState::new();
        assert!(state.set(TraitCategory::Pet, "Dog"));
        assert!(!state.set(TraitCategory::Pet, "Dog"));
        assert!(state.set(TraitCategory::Pet, ""));
        assert!(!state.clear_all());
        state.set(TraitCategory::Eyes, "Laser");
        assert!(state.clear_all());
        assert!(state.is_unconstrained());
    }
}
