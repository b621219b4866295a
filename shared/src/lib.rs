//! # Gallery Shared Crate
//!
//! The collection view core. Everything the browser engine (WASM) and the
//! native session host both need to agree on lives here: the catalog model,
//! facet options, filter semantics, incremental disclosure, exact-match
//! search and detail-view navigation.
//!
//! ## Architecture
//!
//! ```text
//! shared crate (this)
//!   |
//!   +-- model crate (gallery-engine, compiled to WASM)
//!   |     - CollectionEngine / SidebarEngine wrap CollectionView
//!   |     - wasm_bindgen lives there, NOT here
//!   |
//!   +-- server crate (gallery-server)
//!         - loads the catalog once, one CollectionView per client
//! ```
//!
//! ## Data flow
//!
//! ```text
//! Catalog ──→ FacetOptions            (sidebar options, stable)
//!    │
//!    └──→ FilterState ──→ filtered positions ──→ Disclosure (visible slice)
//!                                                   ∥
//!                               search override (replaces the visible slice)
//!                                                   │
//!                           Navigator (selection, detail data, neighbor window)
//! ```
//!
//! ## What does NOT belong here
//!
//! - `#[wasm_bindgen]` attributes (those go in the model crate)
//! - Network fetches, sockets, file reads other than parsing a buffer
//! - Rendering, theming visuals, clipboard, address formatting

pub mod catalog;
pub mod config;
pub mod detail;
pub mod disclosure;
pub mod error;
pub mod facets;
pub mod filter;
pub mod frame;
pub mod navigator;
pub mod search;
pub mod sidebar;
pub mod stats;
pub mod view;

pub use catalog::{Catalog, Item, TraitCategory};
pub use config::{MemoryStore, PreferenceStore, Theme, ViewConfig};
pub use detail::{DetailMeta, DetailRequests, InscriptionMeta, RequestTicket, Transfer};
pub use disclosure::Disclosure;
pub use error::CatalogError;
pub use facets::{compute_options, FacetOptions};
pub use filter::{apply_filters, FilterState};
pub use frame::ViewFrame;
pub use navigator::{ActiveView, Backing, DetailData, Navigator, Neighbor, ViewKind};
pub use search::{resolve, SearchHit, SearchOutcome};
pub use sidebar::FacetSidebar;
pub use stats::{trait_stats, TraitStat};
pub use view::CollectionView;

// ============================================
// Constants
//
// Defaults for ViewConfig. Both the browser engine and
// the session host start from these so a card title or
// a page boundary never differs between the two.
// ============================================

/// Items revealed initially and on every disclosure step.
pub const PAGE_SIZE: usize = 30;

/// Items shown on each side of the current item in the detail strip.
pub const NEIGHBOR_SPAN: usize = 2;

/// Name token prefixed to every display label (`purrbang007`).
pub const NAME_PREFIX: &str = "purrbang";

/// Zero-padding width of the ordinal in a display label.
pub const LABEL_WIDTH: usize = 3;

/// Base URL of the rendered preview for an identifier.
pub const PREVIEW_BASE_URL: &str = "https://ordinals.com/preview/";

/// Preference key under which the theme is persisted.
pub const THEME_KEY: &str = "theme";

/// Message reported for a search that resolves nothing.
pub const NOT_FOUND_MESSAGE: &str = "ERROR: item not found";
