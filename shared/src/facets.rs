//! Facet Index: distinct trait values per category, over the full catalog.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, TraitCategory};

/// Sorted distinct values for every category. Derived from the whole
/// catalog, so options do not shrink as other filters are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    options: BTreeMap<TraitCategory, Vec<String>>,
}

impl FacetOptions {
    pub fn values(&self, category: TraitCategory) -> &[String] {
        self.options
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, category: TraitCategory) -> usize {
        self.values(category).len()
    }

    pub fn contains(&self, category: TraitCategory, value: &str) -> bool {
        self.values(category)
            .binary_search_by(|v| v.as_str().cmp(value))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitCategory, &[String])> {
        self.options.iter().map(|(c, v)| (*c, v.as_slice()))
    }
}

/// Compute the options for every category. Categories nobody carries get
/// an empty list.
pub fn compute_options(catalog: &Catalog) -> FacetOptions {
    let mut sets: BTreeMap<TraitCategory, BTreeSet<&str>> = TraitCategory::ALL
        .into_iter()
        .map(|category| (category, BTreeSet::new()))
        .collect();

    for item in catalog.iter() {
        for (category, value) in &item.traits {
            if value.is_empty() {
                continue;
            }
            if let Some(set) = sets.get_mut(category) {
                set.insert(value.as_str());
            }
        }
    }

    FacetOptions {
        options: sets
            .into_iter()
            .map(|(category, set)| (category, set.into_iter().map(str::to_string).collect()))
            .collect(),
    }
}
