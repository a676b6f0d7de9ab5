//! `tallybook-observability` — log subscriber setup for engine hosts.
//!
//! The engine crates only emit `tracing` events; where those events end up
//! is the host's decision, made by calling [`init`] early in `main`.

/// Install the process-wide log subscriber with default settings.
///
/// Idempotent: if a subscriber is already installed the call is a no-op.
pub fn init() {
    tracing::init();
}

/// Subscriber construction (env filter, JSON output).
pub mod tracing;
