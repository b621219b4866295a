//! Trait rarity: how often each value occurs per category.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::catalog::{Catalog, TraitCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraitStat {
    pub value: String,
    pub count: usize,
    /// Share of the whole catalog, one decimal place ("12.5").
    pub percentage: String,
}

/// Per category, values ordered by count descending. Equal counts keep the
/// order in which the values were first seen in the catalog.
pub fn trait_stats(catalog: &Catalog) -> BTreeMap<TraitCategory, Vec<TraitStat>> {
    let mut counts: BTreeMap<TraitCategory, Vec<(&str, usize)>> = TraitCategory::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();
    let mut slots: HashMap<(TraitCategory, &str), usize> = HashMap::new();

    for item in catalog.iter() {
        for (category, value) in &item.traits {
            let Some(bucket) = counts.get_mut(category) else {
                continue;
            };
            match slots.get(&(*category, value.as_str())) {
                Some(&slot) => bucket[slot].1 += 1,
                None => {
                    slots.insert((*category, value.as_str()), bucket.len());
                    bucket.push((value.as_str(), 1));
                }
            }
        }
    }

    let total = catalog.len();
    counts
        .into_iter()
        .map(|(category, mut bucket)| {
            // Stable sort keeps first-seen order among ties.
            bucket.sort_by(|a, b| b.1.cmp(&a.1));
            let stats = bucket
                .into_iter()
                .map(|(value, count)| TraitStat {
                    value: value.to_string(),
                    count,
                    percentage: percentage(count, total),
                })
                .collect();
            (category, stats)
        })
        .collect()
}

fn percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    // Integer tenths, halves rounded up.
    let (count, total) = (count as u128, total as u128);
    let tenths = (count * 2000 + total) / (total * 2);
    format!("{}.{}", tenths / 10, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;

    #[test]
    fn test_counts_sorted_descending() {
        let catalog = Catalog::new(vec![
            Item::new("a").with_trait(TraitCategory::Pet, "Fish"),
            Item::new("b").with_trait(TraitCategory::Pet, "Dog"),
            Item::new("c").with_trait(TraitCategory::Pet, "Dog"),
            Item::new("d"),
        ]);
        let stats = trait_stats(&catalog);
        let pets = &stats[&TraitCategory::Pet];
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].value, "Dog");
        assert_eq!(pets[0].count, 2);
        assert_eq!(pets[0].percentage, "50.0");
        assert_eq!(pets[1].value, "Fish");
        assert_eq!(pets[1].percentage, "25.0");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let catalog = Catalog::new(vec![
            Item::new("a").with_trait(TraitCategory::Eyes, "Sleepy"),
            Item::new("b").with_trait(TraitCategory::Eyes, "Angry"),
            Item::new("c").with_trait(TraitCategory::Eyes, "Wide"),
        ]);
        let stats = trait_stats(&catalog);
        let values: Vec<&str> = stats[&TraitCategory::Eyes].iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["Sleepy", "Angry", "Wide"]);
        assert_eq!(stats[&TraitCategory::Eyes][0].percentage, "33.3");
    }

    #[test]
    fn test_percentage_rounds_halves_up() {
        assert_eq!(percentage(49, 400), "12.3");
        assert_eq!(percentage(1, 400), "0.3");
        assert_eq!(percentage(3, 400), "0.8");
        assert_eq!(percentage(1, 3), "33.3");
        assert_eq!(percentage(2, 3), "66.7");
        assert_eq!(percentage(7, 7), "100.0");
    }

    #[test]
    fn test_empty_catalog_has_empty_lists() {
        let stats = trait_stats(&Catalog::empty());
        assert_eq!(stats.len(), TraitCategory::ALL.len());
        assert!(stats.values().all(Vec::is_empty));
    }
}
