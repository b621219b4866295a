//! Serializable snapshot of a CollectionView for a rendering client.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::TraitCategory;
use crate::navigator::{DetailData, ViewKind};
use crate::view::CollectionView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Index within the active view (what `select` takes).
    pub index: usize,
    /// 0-based catalog position.
    pub position: usize,
    pub identifier: String,
    pub title: String,
    pub image: String,
    pub traits: BTreeMap<TraitCategory, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborCard {
    /// Index in the backing collection (what `navigate` takes).
    pub index: usize,
    pub position: usize,
    pub identifier: String,
    pub title: String,
    pub image: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailFrame {
    pub selection: usize,
    #[serde(flatten)]
    pub data: DetailData,
    pub neighbors: Vec<NeighborCard>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewFrame {
    pub version: u64,
    pub view: ViewKind,
    pub catalog_count: usize,
    pub filtered_count: usize,
    pub visible_count: usize,
    pub has_more: bool,
    pub active_filters: BTreeMap<TraitCategory, String>,
    pub cards: Vec<Card>,
    pub detail: Option<DetailFrame>,
}

impl ViewFrame {
    pub fn capture(view: &CollectionView) -> ViewFrame {
        let config = view.config();

        let cards = view
            .visible()
            .enumerate()
            .map(|(index, (position, item))| Card {
                index,
                position,
                identifier: item.id.clone(),
                title: config.label_for_position(position),
                image: config.image_ref(&item.id),
                traits: item.traits.clone(),
            })
            .collect();

        let detail = match (view.selection(), view.current_detail()) {
            (Some(selection), Some(data)) => Some(DetailFrame {
                selection,
                data,
                neighbors: view
                    .neighbors()
                    .into_iter()
                    .map(|n| NeighborCard {
                        index: n.index,
                        position: n.position,
                        identifier: n.item.id.clone(),
                        title: config.label_for_position(n.position),
                        image: config.image_ref(&n.item.id),
                        is_current: n.is_current,
                    })
                    .collect(),
                can_go_previous: view.can_go_previous(),
                can_go_next: view.can_go_next(),
            }),
            _ => None,
        };

        ViewFrame {
            version: view.version(),
            view: view.view_kind(),
            catalog_count: view.catalog().len(),
            filtered_count: view.filtered_len(),
            visible_count: view.visible_len(),
            has_more: view.has_more(),
            active_filters: view
                .filters()
                .active()
                .map(|(c, v)| (c, v.to_string()))
                .collect(),
            cards,
            detail,
        }
    }
}
