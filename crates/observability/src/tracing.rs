//! Subscriber construction: env-filter selection plus JSON line output.
//!
//! The engine emits events for posted and reversed vouchers and for
//! rejected drafts; these initializers decide how much of that stream is
//! kept and how it is rendered.

use tracing_subscriber::EnvFilter;

/// Install a JSON subscriber filtered at `info` unless `RUST_LOG` says
/// otherwise.
pub fn init() {
    init_with_default_filter("info");
}

/// Like [`init`], with an explicit fallback directive for when `RUST_LOG`
/// is unset, e.g. `"tallybook_engine=debug,info"`.
///
/// If a subscriber is already installed the call leaves it in place.
pub fn init_with_default_filter(fallback: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
