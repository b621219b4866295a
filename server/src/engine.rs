//! # SessionEngine Trait
//!
//! Server-side counterpart to the browser engines. Each WebSocket client
//! owns one engine; the socket loop feeds it every text message and sends
//! back whatever `snapshot()` produces.
//!
//! ```text
//! client ──text──→ engine.ingest(&str)
//!                       │
//!                  engine.snapshot()  ──text──→ client
//! ```

pub trait SessionEngine: Send + 'static {
    /// Apply one client message. Returns true if the rendered state changed.
    ///
    /// Malformed messages must not fail the session: log them and return
    /// false.
    fn ingest(&mut self, msg: &str) -> bool;

    /// Current state, serialized for the client.
    fn snapshot(&self) -> String;
}
