//! Search Resolver: exact lookup by ordinal or identifier.
//!
//! Two query forms are recognized after trimming:
//!
//! - all ASCII digits: a 1-based ordinal, valid in `1..=len`
//! - anything else: identifier, compared case-insensitively
//!
//! A digit query that is out of range is a miss; it does not fall back to
//! identifier matching. There is no fuzzy or partial matching.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::ViewConfig;
use crate::NOT_FOUND_MESSAGE;

/// A resolved query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// 0-based catalog position.
    pub position: usize,
    /// Display label derived from the catalog ordinal.
    pub label: String,
}

/// What the search control reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub found: bool,
    pub position: Option<usize>,
    pub label: Option<String>,
    pub message: String,
}

impl SearchOutcome {
    pub fn hit(hit: SearchHit) -> Self {
        SearchOutcome {
            found: true,
            position: Some(hit.position),
            message: format!("{} found", hit.label),
            label: Some(hit.label),
        }
    }

    pub fn miss() -> Self {
        SearchOutcome {
            found: false,
            position: None,
            label: None,
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// Outcome for a blank submission: nothing searched, nothing to say.
    pub fn ignored() -> Self {
        SearchOutcome {
            found: false,
            position: None,
            label: None,
            message: String::new(),
        }
    }
}

fn is_all_digits(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

/// Resolve a raw query against the catalog.
pub fn resolve(raw: &str, catalog: &Catalog, config: &ViewConfig) -> Option<SearchHit> {
    let query = raw.trim();
    if query.is_empty() {
        return None;
    }

    let position = if is_all_digits(query) {
        // Overflowing digit strings cannot be in range either.
        let ordinal: usize = query.parse().ok()?;
        if ordinal == 0 || ordinal > catalog.len() {
            return None;
        }
        ordinal - 1
    } else {
        catalog.position_of_ignore_case(query)?
    };

    Some(SearchHit {
        position,
        label: config.label_for_position(position),
    })
}
