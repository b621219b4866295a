//! Selection Navigator: index translation between the three coordinate
//! spaces (catalog, filtered subset, single search override).
//!
//! A selection index is always relative to the backing collection of the
//! active view:
//!
//! | Active view  | Visible slice              | Backing collection |
//! |--------------|----------------------------|--------------------|
//! | `Browsing`   | first `revealed` filtered  | filtered positions |
//! | `Overridden` | the one search result      | full catalog       |
//!
//! The override walks the full catalog so the detail strip keeps a useful
//! neighbor set instead of a one-element list. Catalog positions are only
//! used to build display titles.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, Item, TraitCategory};
use crate::config::ViewConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Browsing,
    Overridden,
}

/// The view the user is interacting with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView<'a> {
    Browsing {
        /// Catalog positions of every filtered item.
        filtered: &'a [usize],
        /// How many of them are disclosed.
        revealed: usize,
    },
    Overridden {
        /// Catalog position of the search result.
        position: usize,
    },
}

impl<'a> ActiveView<'a> {
    pub fn kind(&self) -> ViewKind {
        match self {
            ActiveView::Browsing { .. } => ViewKind::Browsing,
            ActiveView::Overridden { .. } => ViewKind::Overridden,
        }
    }

    /// Number of visible entries.
    pub fn len(&self) -> usize {
        match self {
            ActiveView::Browsing { filtered, revealed } => (*revealed).min(filtered.len()),
            ActiveView::Overridden { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Catalog position of a visible entry.
    pub fn catalog_position(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        match self {
            ActiveView::Browsing { filtered, .. } => filtered.get(index).copied(),
            ActiveView::Overridden { position } => Some(*position),
        }
    }

    /// Catalog positions of the visible entries, in display order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + 'a {
        let view = *self;
        (0..view.len()).filter_map(move |i| view.catalog_position(i))
    }

    /// The non-truncated collection selection indices refer to.
    pub fn backing(&self, catalog_len: usize) -> Backing<'a> {
        match self {
            ActiveView::Browsing { filtered, .. } => Backing::Filtered(*filtered),
            ActiveView::Overridden { .. } => Backing::Catalog { len: catalog_len },
        }
    }
}

/// Collection a selection index is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing<'a> {
    Filtered(&'a [usize]),
    Catalog { len: usize },
}

impl Backing<'_> {
    pub fn len(&self) -> usize {
        match self {
            Backing::Filtered(positions) => positions.len(),
            Backing::Catalog { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn catalog_position(&self, index: usize) -> Option<usize> {
        match self {
            Backing::Filtered(positions) => positions.get(index).copied(),
            Backing::Catalog { len } => (index < *len).then_some(index),
        }
    }
}

/// Everything the detail view shows about the selected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailData {
    pub title: String,
    pub identifier: String,
    pub attributes: BTreeMap<TraitCategory, String>,
    pub image: String,
    /// 1-based catalog ordinal.
    pub ordinal: usize,
}

/// One slot of the neighbor strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor<'a> {
    /// Index in the backing collection (what `navigate_to` takes).
    pub index: usize,
    /// Catalog position, for the title.
    pub position: usize,
    pub item: &'a Item,
    pub is_current: bool,
}

// ── Navigator ───────────────────────────────────────────────────────────────

/// Holds the selection index. Everything else is recomputed on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    selection: Option<usize>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Record the entry clicked in the active view. Returns the selection
    /// index in the backing collection, or None if the position is not
    /// visible.
    pub fn select(&mut self, view: &ActiveView<'_>, position_in_view: usize) -> Option<usize> {
        let index = match view {
            ActiveView::Browsing { .. } => {
                (position_in_view < view.len()).then_some(position_in_view)
            }
            ActiveView::Overridden { position } => (position_in_view == 0).then_some(*position),
        }?;
        self.selection = Some(index);
        Some(index)
    }

    /// Move to `index` if it exists in the backing collection; otherwise
    /// ignore the request.
    pub fn navigate_to(&mut self, backing: Backing<'_>, index: usize) -> bool {
        if index >= backing.len() {
            return false;
        }
        self.selection = Some(index);
        true
    }

    pub fn previous(&mut self, backing: Backing<'_>) -> bool {
        match self.selection {
            Some(index) if index > 0 => self.navigate_to(backing, index - 1),
            _ => false,
        }
    }

    pub fn next(&mut self, backing: Backing<'_>) -> bool {
        match self.selection {
            Some(index) => self.navigate_to(backing, index + 1),
            None => false,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(self.selection, Some(index) if index > 0)
    }

    pub fn can_go_next(&self, backing: Backing<'_>) -> bool {
        matches!(self.selection, Some(index) if index + 1 < backing.len())
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }
}

/// Detail data for `index` in `backing`. The title comes from the item's
/// catalog ordinal, found by identifier, so it does not depend on which
/// subset produced the selection.
pub fn detail_data(
    catalog: &Catalog,
    backing: Backing<'_>,
    index: usize,
    config: &ViewConfig,
) -> Option<DetailData> {
    let position = backing.catalog_position(index)?;
    let item = catalog.get(position)?;
    let ordinal = catalog.position_of(&item.id).unwrap_or(position) + 1;
    Some(DetailData {
        title: config.display_label(ordinal),
        identifier: item.id.clone(),
        attributes: item.traits.clone(),
        image: config.image_ref(&item.id),
        ordinal,
    })
}

/// Up to `2 * span + 1` entries centered on `index`, clipped at both ends.
pub fn neighbors<'a>(
    catalog: &'a Catalog,
    backing: Backing<'_>,
    index: usize,
    span: usize,
) -> Vec<Neighbor<'a>> {
    let len = backing.len();
    if index >= len {
        return Vec::new();
    }
    let start = index.saturating_sub(span);
    let end = index.saturating_add(span).min(len - 1);
    (start..=end)
        .filter_map(|i| {
            let position = backing.catalog_position(i)?;
            let item = catalog.get(position)?;
            Some(Neighbor {
                index: i,
                position,
                item,
                is_current: i == index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> Catalog {
        Catalog::new((0..n).map(|i| Item::new(format!("item{i}"))).collect())
    }

    #[test]
    fn test_neighbors_at_start_are_clipped() {
        let catalog = catalog(10);
        let window = neighbors(&catalog, Backing::Catalog { len: 10 }, 0, 2);
        let indices: Vec<usize> = window.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(window[0].is_current);
    }

    #[test]
    fn test_neighbors_in_middle_and_end() {
        let catalog = catalog(10);
        let backing = Backing::Catalog { len: 10 };
        let middle: Vec<usize> = neighbors(&catalog, backing, 5, 2).iter().map(|n| n.index).collect();
        assert_eq!(middle, vec![3, 4, 5, 6, 7]);
        let end: Vec<usize> = neighbors(&catalog, backing, 9, 2).iter().map(|n| n.index).collect();
        assert_eq!(end, vec![7, 8, 9]);
        assert_eq!(neighbors(&catalog, backing, 10, 2).len(), 0);
    }

    #[test]
    fn test_neighbors_over_filtered_backing_map_positions() {
        let catalog = catalog(10);
        let filtered = [1, 4, 8];
        let window = neighbors(&catalog, Backing::Filtered(&filtered), 1, 2);
        let positions: Vec<usize> = window.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![1, 4, 8]);
        assert_eq!(window[1].item.id, "item4");
        assert!(window[1].is_current);
    }

    #[test]
    fn test_select_in_browsing_view() {
        let filtered = [2, 5, 7, 9];
        let view = ActiveView::Browsing {
            filtered: &filtered,
            revealed: 2,
        };
        let mut nav = Navigator::new();
        assert_eq!(nav.select(&view, 1), Some(1));
        assert_eq!(nav.select(&view, 2), None);
        assert_eq!(nav.selection(), Some(1));
    }

    #[test]
    fn test_select_in_override_uses_catalog_position() {
        let view = ActiveView::Overridden { position: 41 };
        let mut nav = Navigator::new();
        assert_eq!(nav.select(&view, 0), Some(41));
        assert_eq!(nav.select(&view, 1), None);
        assert_eq!(view.backing(50), Backing::Catalog { len: 50 });
    }

    #[test]
    fn test_navigate_out_of_range_is_ignored() {
        let filtered = [0, 3, 6];
        let backing = Backing::Filtered(&filtered);
        let mut nav = Navigator::new();
        assert!(nav.navigate_to(backing, 2));
        assert!(!nav.navigate_to(backing, 3));
        assert_eq!(nav.selection(), Some(2));
        assert!(!nav.next(backing));
        assert!(nav.previous(backing));
        assert_eq!(nav.selection(), Some(1));
        assert!(nav.can_go_previous());
        assert!(nav.can_go_next(backing));
    }

    #[test]
    fn test_previous_at_start_is_noop() {
        let mut nav = Navigator::new();
        let backing = Backing::Catalog { len: 3 };
        assert!(!nav.previous(backing));
        nav.navigate_to(backing, 0);
        assert!(!nav.previous(backing));
        assert!(!nav.can_go_previous());
        assert_eq!(nav.selection(), Some(0));
    }

    #[test]
    fn test_detail_title_uses_catalog_ordinal() {
        let catalog = Catalog::new(vec![
            Item::new("a"),
            Item::new("b").with_trait(TraitCategory::Outfit, "Suit"),
            Item::new("c"),
        ]);
        let filtered = [1];
        let detail = detail_data(&catalog, Backing::Filtered(&filtered), 0, &ViewConfig::default()).unwrap();
        assert_eq!(detail.title, "purrbang002");
        assert_eq!(detail.identifier, "b");
        assert_eq!(detail.ordinal, 2);
        assert_eq!(detail.image, "https://ordinals.com/preview/b");
        assert_eq!(detail.attributes.get(&TraitCategory::Outfit).map(String::as_str), Some("Suit"));
        assert!(detail_data(&catalog, Backing::Filtered(&filtered), 1, &ViewConfig::default()).is_none());
    }

    #[test]
    fn test_active_view_positions() {
        let filtered = [3, 4, 9];
        let view = ActiveView::Browsing {
            filtered: &filtered,
            revealed: 30,
        };
        assert_eq!(view.positions().collect::<Vec<_>>(), vec![3, 4, 9]);
        assert_eq!(view.kind(), ViewKind::Browsing);
        let view = ActiveView::Overridden { position: 12 };
        assert_eq!(view.positions().collect::<Vec<_>>(), vec![12]);
    }
}
