// =============================================================================
// Collection Engine
// =============================================================================
//
// Owns one browsing session in the browser: the parsed catalog, trait
// filters, progressive disclosure, the search override, the detail view
// with its neighbor strip, and the theme preference.
//
// HOW THE TS SIDE DRIVES IT:
//
//   1. new CollectionEngine(), optionally configure(json) with ViewConfig
//      overrides, then hydrate preferences from localStorage via
//      set_preference(key, value).
//   2. fetch('/all-traits.json') and pass the body to load_catalog(json).
//   3. Render the grid from visible_count() / visible_id(i) / visible_title(i).
//   4. When the sentinel below the grid enters the viewport, call
//      on_sentinel_visible(frame) with the animation frame id. Several
//      signals in one frame advance disclosure once.
//   5. Clicking a card calls select(i); the detail view reads detail_* and
//      neighbor_*(i). Metadata fetches go through begin_detail_fetch() and
//      complete_detail_fetch(...), which drops responses for a detail the
//      user has already left.
//   6. Watch data_version() and re-render when it changes.
//
// Scalar getters return "" or -1 when there is nothing to report, so the
// TS side never has to handle undefined.
//
// =============================================================================

use std::sync::Arc;

use gallery_shared::{
    trait_stats, Catalog, CollectionView, DetailMeta, DetailRequests, FacetOptions, MemoryStore,
    PreferenceStore, RequestTicket, SearchOutcome, Theme, TraitCategory, ViewConfig, ViewFrame,
};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct CollectionEngine {
    catalog: Arc<Catalog>,
    view: CollectionView,

    /// Stale-response guard for detail metadata.
    requests: DetailRequests,

    /// Mirrors the browser's localStorage for the keys the engine cares about.
    prefs: MemoryStore,
    theme: Theme,

    /// Result of the last submitted search, for the status line.
    last_search: Option<SearchOutcome>,

    /// Bumped on every engine-level mutation (theme, metadata, search
    /// status). View changes are tracked by the view's own version.
    local_version: u32,
}

impl Default for CollectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CollectionEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CollectionEngine {
        let catalog = Arc::new(Catalog::empty());
        let prefs = MemoryStore::new();
        let theme = Theme::load(&prefs);
        CollectionEngine {
            view: CollectionView::new(Arc::clone(&catalog)),
            catalog,
            requests: DetailRequests::new(),
            prefs,
            theme,
            last_search: None,
            local_version: 0,
        }
    }

    /// Combined change counter. Compare against the last seen value to
    /// decide whether to re-render.
    pub fn data_version(&self) -> u32 {
        (self.view.version() as u32).wrapping_add(self.local_version)
    }

    fn bump_version(&mut self) {
        self.local_version = self.local_version.wrapping_add(1);
    }

    // ── Configuration ─────────────────────────────────────────────────

    /// Apply ViewConfig overrides (missing fields keep their defaults).
    /// Starts the session over on the current catalog. Returns false and
    /// keeps the old settings when the JSON does not parse.
    pub fn configure(&mut self, json: &str) -> bool {
        let config: ViewConfig = match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring view config: {e}");
                return false;
            }
        };
        // The new view counts from zero; carry the old count so the sum
        // never goes back.
        self.local_version = self
            .local_version
            .wrapping_add(self.view.version() as u32);
        self.view = CollectionView::with_config(Arc::clone(&self.catalog), config);
        self.requests.cancel();
        self.last_search = None;
        self.bump_version();
        true
    }

    // ── Catalog ───────────────────────────────────────────────────────

    /// Parse and install the catalog. Malformed input yields an empty
    /// catalog rather than an error. Returns the item count.
    pub fn load_catalog(&mut self, json: &str) -> usize {
        self.catalog = Arc::new(Catalog::from_json_or_empty(json));
        self.view.replace_catalog(Arc::clone(&self.catalog));
        self.requests.cancel();
        self.last_search = None;
        self.bump_version();
        self.catalog.len()
    }

    pub fn item_count(&self) -> usize {
        self.catalog.len()
    }

    /// Per-category value counts as JSON, most common first.
    pub fn trait_stats_json(&self) -> String {
        serde_json::to_string(&trait_stats(&self.catalog)).unwrap_or_default()
    }

    // ── Facets & filters ──────────────────────────────────────────────

    pub fn facet_count(&self, category: &str) -> usize {
        TraitCategory::parse(category)
            .map(|c| self.view.facets().count(c))
            .unwrap_or(0)
    }

    pub fn facet_value(&self, category: &str, index: usize) -> String {
        TraitCategory::parse(category)
            .and_then(|c| self.view.facets().values(c).get(index))
            .cloned()
            .unwrap_or_default()
    }

    /// Pick a value for a category; "" clears that category. Unknown
    /// categories are ignored.
    pub fn set_filter(&mut self, category: &str, value: &str) -> bool {
        match TraitCategory::parse(category) {
            Some(c) => {
                let changed = self.view.set_filter(c, value);
                self.sync_detail_requests();
                changed
            }
            None => {
                debug!(category, "ignoring filter on unknown category");
                false
            }
        }
    }

    pub fn clear_filters(&mut self) -> bool {
        let changed = self.view.clear_filters();
        self.sync_detail_requests();
        changed
    }

    pub fn filter_value(&self, category: &str) -> String {
        TraitCategory::parse(category)
            .map(|c| self.view.filters().get(c).to_string())
            .unwrap_or_default()
    }

    pub fn active_filter_count(&self) -> usize {
        self.view.active_filter_count()
    }

    pub fn filtered_count(&self) -> usize {
        self.view.filtered_len()
    }

    // ── Grid ──────────────────────────────────────────────────────────

    /// Cards currently rendered: the revealed prefix while browsing, one
    /// card while a search result is shown.
    pub fn visible_count(&self) -> usize {
        self.view.visible_len()
    }

    pub fn visible_id(&self, index: usize) -> String {
        self.visible_position(index)
            .and_then(|p| self.catalog.get(p))
            .map(|item| item.id.clone())
            .unwrap_or_default()
    }

    pub fn visible_title(&self, index: usize) -> String {
        self.visible_position(index)
            .map(|p| self.view.label(p))
            .unwrap_or_default()
    }

    pub fn visible_image(&self, index: usize) -> String {
        self.visible_position(index)
            .and_then(|p| self.catalog.get(p))
            .map(|item| self.view.config().image_ref(&item.id))
            .unwrap_or_default()
    }

    pub fn visible_trait(&self, index: usize, category: &str) -> String {
        let Some(category) = TraitCategory::parse(category) else {
            return String::new();
        };
        self.visible_position(index)
            .and_then(|p| self.catalog.get(p))
            .and_then(|item| item.trait_value(category))
            .unwrap_or_default()
            .to_string()
    }

    pub fn is_search_active(&self) -> bool {
        self.view.is_overridden()
    }

    pub fn has_more(&self) -> bool {
        self.view.has_more()
    }

    pub fn load_more(&mut self) -> bool {
        self.view.load_more()
    }

    /// Sentinel proximity signal tagged with the animation frame it was
    /// observed in.
    pub fn on_sentinel_visible(&mut self, frame: f64) -> bool {
        if !frame.is_finite() || frame < 0.0 {
            return false;
        }
        self.view.on_proximity(frame as u64)
    }

    // ── Search ────────────────────────────────────────────────────────

    /// Submit the search box. True on a hit.
    pub fn search(&mut self, query: &str) -> bool {
        let outcome = self.view.search(query);
        let found = outcome.found;
        self.requests.cancel();
        self.last_search = Some(outcome);
        self.bump_version();
        found
    }

    /// Status line for the last submitted search ("" before any).
    pub fn search_message(&self) -> String {
        self.last_search
            .as_ref()
            .map(|o| o.message.clone())
            .unwrap_or_default()
    }

    /// Search box edited. Emptying it restores the grid.
    pub fn query_changed(&mut self, text: &str) -> bool {
        let cleared = self.view.query_changed(text);
        if cleared {
            self.requests.cancel();
            self.last_search = None;
            self.bump_version();
        }
        cleared
    }

    pub fn clear_search(&mut self) -> bool {
        let cleared = self.view.clear_search();
        if cleared {
            self.requests.cancel();
            self.last_search = None;
            self.bump_version();
        }
        cleared
    }

    // ── Detail ────────────────────────────────────────────────────────

    /// Open the card at `index` of the visible grid. Returns the backing
    /// index of the selection, or -1.
    pub fn select(&mut self, index: usize) -> i32 {
        let selected = self.view.select(index);
        self.sync_detail_requests();
        selected.map(to_js_index).unwrap_or(-1)
    }

    pub fn selected_index(&self) -> i32 {
        self.view.selection().map(to_js_index).unwrap_or(-1)
    }

    pub fn close_detail(&mut self) {
        self.view.close_detail();
        self.requests.cancel();
    }

    pub fn navigate_to(&mut self, index: usize) -> bool {
        let moved = self.view.navigate_to(index);
        self.sync_detail_requests();
        moved
    }

    pub fn previous(&mut self) -> bool {
        let moved = self.view.previous();
        self.sync_detail_requests();
        moved
    }

    pub fn next(&mut self) -> bool {
        let moved = self.view.next();
        self.sync_detail_requests();
        moved
    }

    pub fn can_go_previous(&self) -> bool {
        self.view.can_go_previous()
    }

    pub fn can_go_next(&self) -> bool {
        self.view.can_go_next()
    }

    pub fn detail_title(&self) -> String {
        self.view.current_detail().map(|d| d.title).unwrap_or_default()
    }

    pub fn detail_id(&self) -> String {
        self.view
            .current_detail()
            .map(|d| d.identifier)
            .unwrap_or_default()
    }

    pub fn detail_image(&self) -> String {
        self.view.current_detail().map(|d| d.image).unwrap_or_default()
    }

    pub fn detail_trait(&self, category: &str) -> String {
        let Some(category) = TraitCategory::parse(category) else {
            return String::new();
        };
        self.view
            .current_detail()
            .and_then(|d| d.attributes.get(&category).cloned())
            .unwrap_or_default()
    }

    pub fn neighbor_count(&self) -> usize {
        self.view.neighbors().len()
    }

    /// Backing index of neighbor `i`, what navigate_to takes. -1 if out of range.
    pub fn neighbor_index(&self, i: usize) -> i32 {
        self.view
            .neighbors()
            .get(i)
            .map(|n| to_js_index(n.index))
            .unwrap_or(-1)
    }

    pub fn neighbor_id(&self, i: usize) -> String {
        self.view
            .neighbors()
            .get(i)
            .map(|n| n.item.id.clone())
            .unwrap_or_default()
    }

    pub fn neighbor_title(&self, i: usize) -> String {
        self.view
            .neighbors()
            .get(i)
            .map(|n| self.view.label(n.position))
            .unwrap_or_default()
    }

    pub fn neighbor_is_current(&self, i: usize) -> bool {
        self.view
            .neighbors()
            .get(i)
            .map(|n| n.is_current)
            .unwrap_or(false)
    }

    // ── Detail metadata ───────────────────────────────────────────────

    /// Start a metadata fetch for the open detail. Returns the generation
    /// to hand back on completion, or 0 when no detail is open.
    pub fn begin_detail_fetch(&mut self) -> u32 {
        let Some(detail) = self.view.current_detail() else {
            return 0;
        };
        let ticket = self.requests.begin(&detail.identifier);
        self.bump_version();
        ticket.generation as u32
    }

    /// Commit fetched payloads. Dropped (false) when the detail was closed
    /// or moved to another item since the fetch started. A payload that
    /// does not parse marks the metadata unavailable.
    pub fn complete_detail_fetch(
        &mut self,
        generation: u32,
        identifier: &str,
        inscription_json: &str,
        transfers_json: &str,
    ) -> bool {
        let meta = DetailMeta::from_payloads(inscription_json, transfers_json);
        self.commit_detail(generation, identifier, meta)
    }

    /// The fetch itself failed (network error, non-2xx).
    pub fn fail_detail_fetch(&mut self, generation: u32, identifier: &str) -> bool {
        self.commit_detail(generation, identifier, None)
    }

    pub fn is_meta_loading(&self) -> bool {
        self.meta_is_current() && self.requests.is_loading()
    }

    pub fn is_meta_unavailable(&self) -> bool {
        self.meta_is_current() && self.requests.is_unavailable()
    }

    /// Loaded metadata as JSON, "" while loading or unavailable.
    pub fn detail_meta_json(&self) -> String {
        if !self.meta_is_current() {
            return String::new();
        }
        self.requests
            .meta()
            .and_then(|m| serde_json::to_string(m).ok())
            .unwrap_or_default()
    }

    // ── Preferences ───────────────────────────────────────────────────

    /// Hydrate a stored preference. Setting the theme key re-reads the theme.
    pub fn set_preference(&mut self, key: &str, value: &str) {
        self.prefs.set(key, value);
        if key == gallery_shared::THEME_KEY {
            self.theme = Theme::load(&self.prefs);
        }
        self.bump_version();
    }

    pub fn preference(&self, key: &str) -> String {
        self.prefs.get(key).unwrap_or_default()
    }

    pub fn theme(&self) -> String {
        self.theme.as_str().to_string()
    }

    /// Flip the theme and persist it. Returns the new theme; the TS side
    /// writes `preference("theme")` back to localStorage.
    pub fn toggle_theme(&mut self) -> String {
        self.theme.toggle(&mut self.prefs);
        self.bump_version();
        self.theme()
    }

    // ── Snapshot ──────────────────────────────────────────────────────

    /// The whole rendered state as JSON (same shape the session host sends).
    pub fn frame_json(&self) -> String {
        serde_json::to_string(&ViewFrame::capture(&self.view)).unwrap_or_default()
    }
}

impl CollectionEngine {
    /// Facet options for the sidebar engine.
    pub(crate) fn facets(&self) -> &FacetOptions {
        self.view.facets()
    }

    fn visible_position(&self, index: usize) -> Option<usize> {
        self.view.active_view().catalog_position(index)
    }

    /// Metadata state belongs to the identifier the detail view shows.
    fn meta_is_current(&self) -> bool {
        match (self.requests.current(), self.view.current_detail()) {
            (Some(requested), Some(detail)) => requested == detail.identifier,
            _ => false,
        }
    }

    /// Drop metadata once the detail moves off the item it was fetched for.
    fn sync_detail_requests(&mut self) {
        if self.requests.current().is_some() && !self.meta_is_current() {
            self.requests.cancel();
            self.bump_version();
        }
    }

    fn commit_detail(&mut self, generation: u32, identifier: &str, meta: Option<DetailMeta>) -> bool {
        let showing = self
            .view
            .current_detail()
            .map(|d| d.identifier == identifier)
            .unwrap_or(false);
        if !showing {
            debug!(identifier, "detail no longer showing, dropping metadata");
            return false;
        }
        let ticket = RequestTicket {
            generation: u64::from(generation),
            identifier: identifier.to_string(),
        };
        let committed = self.requests.complete(&ticket, meta);
        if committed {
            self.bump_version();
        }
        committed
    }
}

fn to_js_index(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

// =============================================================================
// Tests
// =============================================================================
