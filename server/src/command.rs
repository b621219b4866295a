//! # Client Commands
//!
//! JSON commands a browser sends over `/ws`, and the per-client session
//! that applies them to its own `CollectionView`.
//!
//! ```text
//! {"type": "set_filter", "category": "outfit", "value": "Suit"}
//! {"type": "search", "query": "42"}
//! {"type": "select", "index": 0}
//! ```
//!
//! Every message is answered with the current frame. Commands that fail to
//! parse (unknown type, unknown trait category, missing fields) are logged
//! and leave the session untouched.

use std::sync::Arc;

use gallery_shared::{Catalog, CollectionView, SearchOutcome, TraitCategory, ViewConfig, ViewFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::SessionEngine;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetFilter {
        category: TraitCategory,
        #[serde(default)]
        value: String,
    },
    ClearFilters,
    LoadMore,
    /// Sentinel proximity, tagged with the client's frame/batch id.
    Proximity { frame: u64 },
    Search { query: String },
    QueryChanged { text: String },
    Select { index: usize },
    Navigate { index: usize },
    Previous,
    Next,
    CloseDetail,
}

impl Command {
    pub fn parse(msg: &str) -> Result<Command, serde_json::Error> {
        serde_json::from_str(msg)
    }
}

/// What a client receives after each message.
#[derive(Debug, Serialize)]
pub struct Reply<'a> {
    #[serde(flatten)]
    pub frame: ViewFrame,
    /// Outcome of the search this reply answers, if it answers one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a SearchOutcome>,
}

pub struct ViewSession {
    view: CollectionView,
    last_search: Option<SearchOutcome>,
}

impl ViewSession {
    pub fn new(catalog: Arc<Catalog>, config: ViewConfig) -> Self {
        ViewSession {
            view: CollectionView::with_config(catalog, config),
            last_search: None,
        }
    }

    pub fn view(&self) -> &CollectionView {
        &self.view
    }

    pub fn last_search(&self) -> Option<&SearchOutcome> {
        self.last_search.as_ref()
    }

    /// Apply a parsed command. Returns true if the view changed.
    pub fn apply(&mut self, command: Command) -> bool {
        debug!(?command, "applying command");
        self.last_search = None;
        match command {
            Command::SetFilter { category, value } => {
                if !value.is_empty() && !self.view.facets().contains(category, &value) {
                    warn!(%category, value = %value, "ignoring filter on a value no item carries");
                    return false;
                }
                self.view.set_filter(category, &value)
            }
            Command::ClearFilters => self.view.clear_filters(),
            Command::LoadMore => self.view.load_more(),
            Command::Proximity { frame } => self.view.on_proximity(frame),
            Command::Search { query } => {
                let outcome = self.view.search(&query);
                let found = outcome.found;
                self.last_search = Some(outcome);
                found
            }
            Command::QueryChanged { text } => self.view.query_changed(&text),
            Command::Select { index } => self.view.select(index).is_some(),
            Command::Navigate { index } => self.view.navigate_to(index),
            Command::Previous => self.view.previous(),
            Command::Next => self.view.next(),
            Command::CloseDetail => {
                let open = self.view.selection().is_some();
                self.view.close_detail();
                open
            }
        }
    }
}

impl SessionEngine for ViewSession {
    fn ingest(&mut self, msg: &str) -> bool {
        match Command::parse(msg) {
            Ok(command) => self.apply(command),
            Err(e) => {
                warn!("ignoring malformed command: {e}");
                self.last_search = None;
                false
            }
        }
    }

    fn snapshot(&self) -> String {
        let reply = Reply {
            frame: ViewFrame::capture(&self.view),
            search: self.last_search(),
        };
        match serde_json::to_string(&reply) {
            Ok(json) => json,
            Err(e) => {
                warn!("frame serialization failed: {e}");
                String::new()
            }
        }
    }
}
