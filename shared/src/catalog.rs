//! Catalog Store: the immutable, order-stable item sequence.
//!
//! Load order is the canonical 1-based numbering used for display labels
//! and positional search. Nothing here mutates after construction.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

use crate::error::CatalogError;

// ── TraitCategory ───────────────────────────────────────────────────────────

/// The fixed set of trait categories an item can carry.
///
/// Declaration order is the sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitCategory {
    Outfit,
    Head,
    Eyes,
    Ears,
    Mouth,
    Pet,
}

impl TraitCategory {
    pub const ALL: [TraitCategory; 6] = [
        TraitCategory::Outfit,
        TraitCategory::Head,
        TraitCategory::Eyes,
        TraitCategory::Ears,
        TraitCategory::Mouth,
        TraitCategory::Pet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TraitCategory::Outfit => "outfit",
            TraitCategory::Head => "head",
            TraitCategory::Eyes => "eyes",
            TraitCategory::Ears => "ears",
            TraitCategory::Mouth => "mouth",
            TraitCategory::Pet => "pet",
        }
    }

    /// Parse a category name as it appears in catalog JSON. Unknown names
    /// return None and are ignored by every caller.
    pub fn parse(name: &str) -> Option<TraitCategory> {
        TraitCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Item ────────────────────────────────────────────────────────────────────

/// One collectible. Identifier is opaque and unique; a category may be
/// absent from `traits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "inscriptionId")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_traits")]
    pub traits: BTreeMap<TraitCategory, String>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Item {
            id: id.into(),
            traits: BTreeMap::new(),
        }
    }

    pub fn with_trait(mut self, category: TraitCategory, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.traits.insert(category, value);
        }
        self
    }

    pub fn trait_value(&self, category: TraitCategory) -> Option<&str> {
        self.traits.get(&category).map(String::as_str)
    }
}

/// Keep recognized categories with non-empty string values; everything
/// else in the `traits` object is dropped rather than rejected.
fn deserialize_traits<'de, D>(deserializer: D) -> Result<BTreeMap<TraitCategory, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| {
            let category = TraitCategory::parse(&name)?;
            match value {
                serde_json::Value::String(s) if !s.is_empty() => Some((category, s)),
                _ => None,
            }
        })
        .collect())
}

// ── Catalog ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    /// Identifier -> first position carrying it.
    by_id: HashMap<String, usize>,
    /// Lowercased identifier -> first position, for case-insensitive lookup.
    by_folded_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        let mut by_folded_id = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            by_id.entry(item.id.clone()).or_insert(position);
            by_folded_id
                .entry(item.id.to_lowercase())
                .or_insert(position);
        }
        Catalog {
            items,
            by_id,
            by_folded_id,
        }
    }

    pub fn empty() -> Self {
        Catalog::default()
    }

    /// Parse the catalog file contents.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Ok(Catalog::new(items))
    }

    /// Parse the catalog file contents, degrading to an empty catalog when
    /// the payload is missing or malformed.
    pub fn from_json_or_empty(json: &str) -> Self {
        match Catalog::from_json(json) {
            Ok(catalog) => {
                info!(items = catalog.len(), "catalog loaded");
                catalog
            }
            Err(e) => {
                warn!("catalog unavailable, continuing empty: {e}");
                Catalog::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Position of an identifier (exact, case-sensitive).
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Position of the first item whose identifier equals `id` ignoring case.
    pub fn position_of_ignore_case(&self, id: &str) -> Option<usize> {
        self.by_folded_id.get(&id.to_lowercase()).copied()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"inscriptionId": "abc123i0", "traits": {"outfit": "Suit", "head": "Cap", "pet": ""}},
        {"inscriptionId": "def456i0", "traits": {"outfit": "Hoodie", "wings": "Gold"}},
        {"inscriptionId": "ghi789i0"}
    ]"#;

    #[test]
    fn test_from_json_keeps_load_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        let ids: Vec<&str> = catalog.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["abc123i0", "def456i0", "ghi789i0"]);
    }

    #[test]
    fn test_unknown_and_empty_traits_dropped() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let first = catalog.get(0).unwrap();
        assert_eq!(first.trait_value(TraitCategory::Outfit), Some("Suit"));
        assert_eq!(first.trait_value(TraitCategory::Pet), None);

        let second = catalog.get(1).unwrap();
        assert_eq!(second.traits.len(), 1);

        assert!(catalog.get(2).unwrap().traits.is_empty());
    }

    #[test]
    fn test_malformed_payload_degrades_to_empty() {
        assert!(Catalog::from_json("<html>404</html>").is_err());
        assert!(Catalog::from_json_or_empty("<html>404</html>").is_empty());
        assert!(Catalog::from_json_or_empty("").is_empty());
        assert!(Catalog::from_json_or_empty(r#"{"items": []}"#).is_empty());
    }

    #[test]
    fn test_lookup_by_identifier() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.position_of("def456i0"), Some(1));
        assert_eq!(catalog.position_of("DEF456I0"), None);
        assert_eq!(catalog.position_of_ignore_case("DEF456I0"), Some(1));
        assert_eq!(catalog.position_of_ignore_case("nope"), None);
    }

    #[test]
    fn test_duplicate_identifier_resolves_to_first() {
        let catalog = Catalog::new(vec![Item::new("dup"), Item::new("other"), Item::new("DUP")]);
        assert_eq!(catalog.position_of("dup"), Some(0));
        assert_eq!(catalog.position_of_ignore_case("Dup"), Some(0));
        assert_eq!(catalog.position_of("DUP"), Some(2));
    }

    #[test]
    fn test_serializes_in_input_shape() {
        let catalog = Catalog::new(vec![Item::new("x1").with_trait(TraitCategory::Eyes, "Laser")]);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"[{"inscriptionId":"x1","traits":{"eyes":"Laser"}}]"#);
        let back = Catalog::from_json(&json).unwrap();
        assert_eq!(back.items(), catalog.items());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(TraitCategory::parse("mouth"), Some(TraitCategory::Mouth));
        assert_eq!(TraitCategory::parse("Mouth"), None);
        assert_eq!(TraitCategory::Pet.to_string(), "pet");
    }
}
