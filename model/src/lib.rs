//! # Gallery Engines (WASM)
//!
//! Browser-side engines over the shared collection view core. The JS layer
//! is a thin renderer: it forwards user events (filter picks, sentinel
//! proximity, search submissions, detail navigation) and reads scalar
//! results back whenever `data_version()` changes.
//!
//! ```text
//! fetch('/all-traits.json') ──→ CollectionEngine.load_catalog(json)
//!                                    │
//!          SidebarEngine.sync_options(&engine)   (trait accordion)
//!                                    │
//!      grid: visible_count / visible_id(i) / visible_title(i)
//!      detail: select(i) / navigate_to(i) / neighbor_*(i)
//! ```

mod collection_engine;
mod sidebar_engine;

pub use collection_engine::CollectionEngine;
pub use sidebar_engine::SidebarEngine;
