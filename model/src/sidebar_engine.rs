// =============================================================================
// Sidebar Engine
// =============================================================================
//
// Trait accordion next to the grid: one section per category listing the
// values that occur in the catalog, an option search box that narrows the
// list, and manual expand/collapse.
//
// The sidebar never filters the grid itself. Clicking an option calls
// CollectionEngine.set_filter(category, value); this engine only decides
// which categories and options to draw. Call sync_options(&engine) after
// every CollectionEngine.load_catalog().
//
// =============================================================================

use gallery_shared::{FacetOptions, FacetSidebar, TraitCategory};
use wasm_bindgen::prelude::*;

use crate::collection_engine::CollectionEngine;

#[wasm_bindgen]
pub struct SidebarEngine {
    sidebar: FacetSidebar,
    options: FacetOptions,
    data_version: u32,
}

impl Default for SidebarEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SidebarEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SidebarEngine {
        SidebarEngine {
            sidebar: FacetSidebar::new(),
            options: FacetOptions::default(),
            data_version: 0,
        }
    }

    pub fn data_version(&self) -> u32 {
        self.data_version
    }

    fn bump_version(&mut self) {
        self.data_version = self.data_version.wrapping_add(1);
    }

    /// Copy the facet options of the collection engine's current catalog.
    pub fn sync_options(&mut self, engine: &CollectionEngine) {
        self.options = engine.facets().clone();
        self.bump_version();
    }

    // ── Option search ─────────────────────────────────────────────────

    pub fn set_query(&mut self, query: &str) {
        if self.sidebar.query() != query {
            self.sidebar.set_query(query);
            self.bump_version();
        }
    }

    pub fn query(&self) -> String {
        self.sidebar.query().to_string()
    }

    // ── Categories ────────────────────────────────────────────────────

    pub fn category_count(&self) -> usize {
        self.sidebar.visible_categories(&self.options).len()
    }

    /// Name of the i-th visible category, "" if out of range.
    pub fn category_name(&self, index: usize) -> String {
        self.sidebar
            .visible_categories(&self.options)
            .get(index)
            .map(|c| c.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn toggle(&mut self, category: &str) {
        if let Some(category) = TraitCategory::parse(category) {
            self.sidebar.toggle(category);
            self.bump_version();
        }
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        TraitCategory::parse(category)
            .map(|c| self.sidebar.is_expanded(&self.options, c))
            .unwrap_or(false)
    }

    // ── Options ───────────────────────────────────────────────────────

    /// Options of a category matching the query.
    pub fn visible_option_count(&self, category: &str) -> usize {
        TraitCategory::parse(category)
            .map(|c| self.sidebar.visible_options(&self.options, c).len())
            .unwrap_or(0)
    }

    pub fn option_value(&self, category: &str, index: usize) -> String {
        TraitCategory::parse(category)
            .and_then(|c| {
                self.sidebar
                    .visible_options(&self.options, c)
                    .get(index)
                    .map(|v| v.to_string())
            })
            .unwrap_or_default()
    }

    /// Every option of a category regardless of the query.
    pub fn option_count(&self, category: &str) -> usize {
        TraitCategory::parse(category)
            .map(|c| self.options.count(c))
            .unwrap_or(0)
    }
}
