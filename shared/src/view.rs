//! CollectionView: the single owner of all browsing state for one session.
//!
//! Derived data (facet options, filtered positions) is recomputed in full
//! whenever its inputs change, before the mutating call returns, so every
//! read sees a consistent view. `version` is bumped on each change that
//! affects what is rendered.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, Item, TraitCategory};
use crate::config::ViewConfig;
use crate::disclosure::Disclosure;
use crate::facets::{compute_options, FacetOptions};
use crate::filter::{apply_filters, FilterState};
use crate::navigator::{self, ActiveView, Backing, DetailData, Navigator, Neighbor, ViewKind};
use crate::search::{resolve, SearchOutcome};

#[derive(Debug, Clone)]
pub struct CollectionView {
    catalog: Arc<Catalog>,
    config: ViewConfig,
    facets: FacetOptions,
    filters: FilterState,
    /// Catalog positions passing `filters`, catalog order.
    filtered: Vec<usize>,
    disclosure: Disclosure,
    /// Catalog position of the search result replacing the grid.
    search_override: Option<usize>,
    navigator: Navigator,
    version: u64,
}

impl CollectionView {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        CollectionView::with_config(catalog, ViewConfig::default())
    }

    pub fn with_config(catalog: Arc<Catalog>, config: ViewConfig) -> Self {
        let filters = FilterState::new();
        let facets = compute_options(&catalog);
        let filtered = apply_filters(&catalog, &filters);
        let disclosure = Disclosure::new(config.page_size);
        CollectionView {
            catalog,
            config,
            facets,
            filters,
            filtered,
            disclosure,
            search_override: None,
            navigator: Navigator::new(),
            version: 0,
        }
    }

    // ── Catalog ───────────────────────────────────────────────────────

    /// Swap in a new catalog. Facets and the filtered set are rebuilt;
    /// override, selection and disclosure start over. Filter selections are
    /// kept.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;
        self.facets = compute_options(&self.catalog);
        self.search_override = None;
        self.navigator.clear();
        self.disclosure.reset();
        self.refilter();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn refilter(&mut self) {
        self.filtered = apply_filters(&self.catalog, &self.filters);
        self.bump_version();
    }

    // ── Filters ───────────────────────────────────────────────────────

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count()
    }

    /// Replace one category's selection ("" clears it).
    pub fn set_filter(&mut self, category: TraitCategory, value: &str) -> bool {
        if !self.filters.set(category, value) {
            return false;
        }
        self.on_filters_changed();
        true
    }

    pub fn clear_filters(&mut self) -> bool {
        if !self.filters.clear_all() {
            return false;
        }
        self.on_filters_changed();
        true
    }

    fn on_filters_changed(&mut self) {
        if self.config.reset_disclosure_on_filter_change {
            self.disclosure.reset();
        }
        // A browsing selection indexes the old filtered set.
        if self.search_override.is_none() {
            self.navigator.clear();
        }
        self.refilter();
    }

    pub fn filtered_positions(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered_items(&self) -> impl Iterator<Item = &Item> {
        self.filtered.iter().filter_map(|&p| self.catalog.get(p))
    }

    // ── Disclosure ────────────────────────────────────────────────────

    pub fn revealed_count(&self) -> usize {
        self.disclosure.revealed(self.filtered.len())
    }

    /// More filtered items are waiting and disclosure is not suspended.
    pub fn has_more(&self) -> bool {
        self.search_override.is_none() && self.disclosure.has_more(self.filtered.len())
    }

    pub fn load_more(&mut self) -> bool {
        if self.search_override.is_some() {
            return false;
        }
        let advanced = self.disclosure.advance(self.filtered.len());
        if advanced {
            self.bump_version();
        }
        advanced
    }

    /// Sentinel proximity for a frame/scroll batch.
    pub fn on_proximity(&mut self, frame: u64) -> bool {
        if self.search_override.is_some() {
            return false;
        }
        let advanced = self.disclosure.on_proximity(frame, self.filtered.len());
        if advanced {
            debug!(frame, revealed = self.revealed_count(), "disclosed next page");
            self.bump_version();
        }
        advanced
    }

    // ── Active view ───────────────────────────────────────────────────

    pub fn active_view(&self) -> ActiveView<'_> {
        match self.search_override {
            Some(position) => ActiveView::Overridden { position },
            None => ActiveView::Browsing {
                filtered: &self.filtered,
                revealed: self.disclosure.count(),
            },
        }
    }

    pub fn view_kind(&self) -> ViewKind {
        self.active_view().kind()
    }

    /// (catalog position, item) for every visible entry.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.active_view()
            .positions()
            .filter_map(|p| self.catalog.get(p).map(|item| (p, item)))
    }

    pub fn visible_len(&self) -> usize {
        self.active_view().len()
    }

    /// Display label of a catalog position.
    pub fn label(&self, position: usize) -> String {
        self.config.label_for_position(position)
    }

    // ── Search ────────────────────────────────────────────────────────

    /// Submit a query. A hit replaces the grid with that one item; a miss
    /// leaves the current view untouched. Blank queries are ignored.
    pub fn search(&mut self, raw: &str) -> SearchOutcome {
        if raw.trim().is_empty() {
            return SearchOutcome::ignored();
        }
        match resolve(raw, &self.catalog, &self.config) {
            Some(hit) => {
                debug!(position = hit.position, "search override installed");
                self.search_override = Some(hit.position);
                self.navigator.clear();
                self.bump_version();
                SearchOutcome::hit(hit)
            }
            None => SearchOutcome::miss(),
        }
    }

    /// The query text changed. Emptying it clears the override.
    pub fn query_changed(&mut self, text: &str) -> bool {
        if text.is_empty() {
            self.clear_search()
        } else {
            false
        }
    }

    pub fn clear_search(&mut self) -> bool {
        if self.search_override.take().is_none() {
            return false;
        }
        self.navigator.clear();
        self.bump_version();
        true
    }

    pub fn search_override(&self) -> Option<&Item> {
        self.search_override.and_then(|p| self.catalog.get(p))
    }

    pub fn is_overridden(&self) -> bool {
        self.search_override.is_some()
    }

    // ── Selection / detail ────────────────────────────────────────────

    pub fn backing(&self) -> Backing<'_> {
        self.active_view().backing(self.catalog.len())
    }

    /// Open the detail view for an entry of the active view.
    pub fn select(&mut self, position_in_view: usize) -> Option<usize> {
        let view = match self.search_override {
            Some(position) => ActiveView::Overridden { position },
            None => ActiveView::Browsing {
                filtered: &self.filtered,
                revealed: self.disclosure.count(),
            },
        };
        let selected = self.navigator.select(&view, position_in_view);
        if selected.is_some() {
            self.bump_version();
        }
        selected
    }

    pub fn selection(&self) -> Option<usize> {
        self.navigator.selection()
    }

    pub fn close_detail(&mut self) {
        if self.navigator.selection().is_some() {
            self.navigator.clear();
            self.bump_version();
        }
    }

    pub fn navigate_to(&mut self, index: usize) -> bool {
        let backing = backing_of(&self.filtered, self.search_override, self.catalog.len());
        let moved = self.navigator.navigate_to(backing, index);
        if moved {
            self.bump_version();
        }
        moved
    }

    pub fn previous(&mut self) -> bool {
        let backing = backing_of(&self.filtered, self.search_override, self.catalog.len());
        let moved = self.navigator.previous(backing);
        if moved {
            self.bump_version();
        }
        moved
    }

    pub fn next(&mut self) -> bool {
        let backing = backing_of(&self.filtered, self.search_override, self.catalog.len());
        let moved = self.navigator.next(backing);
        if moved {
            self.bump_version();
        }
        moved
    }

    pub fn can_go_previous(&self) -> bool {
        self.navigator.can_go_previous()
    }

    pub fn can_go_next(&self) -> bool {
        self.navigator.can_go_next(self.backing())
    }

    pub fn current_detail(&self) -> Option<DetailData> {
        let index = self.navigator.selection()?;
        navigator::detail_data(&self.catalog, self.backing(), index, &self.config)
    }

    pub fn neighbors(&self) -> Vec<Neighbor<'_>> {
        match self.navigator.selection() {
            Some(index) => navigator::neighbors(
                &self.catalog,
                self.backing(),
                index,
                self.config.neighbor_span,
            ),
            None => Vec::new(),
        }
    }
}

/// Split-borrow helper: the navigator is borrowed mutably while the
/// backing borrows `filtered`.
fn backing_of(filtered: &[usize], search_override: Option<usize>, catalog_len: usize) -> Backing<'_> {
    match search_override {
        Some(_) => Backing::Catalog { len: catalog_len },
        None => Backing::Filtered(filtered),
    }
}
