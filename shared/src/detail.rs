//! Detail-view metadata and the stale-response guard.
//!
//! Metadata (inscription number, owner, transfer history) is fetched by the
//! host after a selection changes. Responses can arrive out of order, so
//! every fetch carries a ticket and only the latest ticket for the
//! identifier still on screen may commit.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Inscription details as returned by the ordinals explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InscriptionMeta {
    #[serde(default)]
    pub number: Option<i64>,
    /// Seconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub height: Option<u64>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransferPage {
    #[serde(default)]
    results: Vec<Transfer>,
}

/// Metadata shown in the detail view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailMeta {
    pub inscription: InscriptionMeta,
    pub transfers: Vec<Transfer>,
}

impl DetailMeta {
    /// Combine the two fetched payloads. Either one failing to parse makes
    /// the whole lookup unavailable.
    pub fn from_payloads(inscription_json: &str, transfers_json: &str) -> Option<DetailMeta> {
        let inscription: InscriptionMeta = match serde_json::from_str(inscription_json) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("inscription metadata unparsable: {e}");
                return None;
            }
        };
        let page: TransferPage = match serde_json::from_str(transfers_json) {
            Ok(page) => page,
            Err(e) => {
                warn!("transfer history unparsable: {e}");
                return None;
            }
        };
        Some(DetailMeta {
            inscription,
            transfers: page.results,
        })
    }
}

/// Handle for one outstanding metadata fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MetaState {
    Idle,
    Loading,
    Loaded(DetailMeta),
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct DetailRequests {
    generation: u64,
    current: Option<String>,
    state: MetaState,
}

impl Default for DetailRequests {
    fn default() -> Self {
        DetailRequests::new()
    }
}

impl DetailRequests {
    pub fn new() -> Self {
        DetailRequests {
            generation: 0,
            current: None,
            state: MetaState::Idle,
        }
    }

    /// Start a fetch for `identifier`. Any earlier ticket becomes stale.
    pub fn begin(&mut self, identifier: &str) -> RequestTicket {
        self.generation = self.generation.wrapping_add(1);
        self.current = Some(identifier.to_string());
        self.state = MetaState::Loading;
        RequestTicket {
            generation: self.generation,
            identifier: identifier.to_string(),
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
            && self.current.as_deref() == Some(ticket.identifier.as_str())
    }

    /// Store a completed fetch. `None` means it failed. Returns false, and
    /// drops the result, when the ticket is stale.
    pub fn complete(&mut self, ticket: &RequestTicket, meta: Option<DetailMeta>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                generation = ticket.generation,
                identifier = %ticket.identifier,
                "dropping stale detail response"
            );
            return false;
        }
        self.state = match meta {
            Some(meta) => MetaState::Loaded(meta),
            None => MetaState::Unavailable,
        };
        true
    }

    /// Detail view closed: nothing outstanding may commit.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.current = None;
        self.state = MetaState::Idle;
    }

    /// Identifier of the latest fetch, if one is outstanding or loaded.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == MetaState::Loading
    }

    /// True after a failed fetch ("unable to load").
    pub fn is_unavailable(&self) -> bool {
        self.state == MetaState::Unavailable
    }

    pub fn meta(&self) -> Option<&DetailMeta> {
        match &self.state {
            MetaState::Loaded(meta) => Some(meta),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSCRIPTION: &str = r#"{"number": 70123, "timestamp": 1700000000, "height": 820000, "address": "bc1pxyz", "extra": true}"#;
    const TRANSFERS: &str = r#"{"limit": 20, "results": [{"timestamp": 1700000000000, "address": "bc1pabc"}]}"#;

    #[test]
    fn test_payloads_parse_with_unknown_fields() {
        let meta = DetailMeta::from_payloads(INSCRIPTION, TRANSFERS).unwrap();
        assert_eq!(meta.inscription.number, Some(70123));
        assert_eq!(meta.inscription.address.as_deref(), Some("bc1pxyz"));
        assert_eq!(meta.transfers.len(), 1);
    }

    #[test]
    fn test_missing_results_is_empty_history() {
        let meta = DetailMeta::from_payloads("{}", "{}").unwrap();
        assert_eq!(meta.inscription, InscriptionMeta::default());
        assert!(meta.transfers.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_unavailable() {
        assert!(DetailMeta::from_payloads("not json", TRANSFERS).is_none());
        assert!(DetailMeta::from_payloads(INSCRIPTION, "[").is_none());
    }

    #[test]
    fn test_latest_ticket_wins() {
        let mut requests = DetailRequests::new();
        let first = requests.begin("aaa");
        let second = requests.begin("bbb");
        assert!(requests.is_loading());

        let meta = DetailMeta::from_payloads(INSCRIPTION, TRANSFERS);
        assert!(!requests.complete(&first, meta.clone()));
        assert!(requests.is_loading());
        assert!(requests.complete(&second, meta));
        assert_eq!(requests.meta().and_then(|m| m.inscription.number), Some(70123));
    }

    #[test]
    fn test_same_identifier_refetch_supersedes() {
        let mut requests = DetailRequests::new();
        let first = requests.begin("aaa");
        let again = requests.begin("aaa");
        assert!(!requests.is_current(&first));
        assert!(requests.is_current(&again));
    }

    #[test]
    fn test_cancel_invalidates_outstanding() {
        let mut requests = DetailRequests::new();
        let ticket = requests.begin("aaa");
        requests.cancel();
        assert!(!requests.complete(&ticket, Some(DetailMeta::default())));
        assert!(requests.meta().is_none());
        assert!(!requests.is_loading());
    }

    #[test]
    fn test_failed_fetch_marks_unavailable() {
        let mut requests = DetailRequests::new();
        let ticket = requests.begin("aaa");
        assert!(requests.complete(&ticket, None));
        assert!(requests.is_unavailable());
        assert!(requests.meta().is_none());
    }
}
