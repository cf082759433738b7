//! Unified test logging initialization
//!
//! One idempotent entry point shared by unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize structured logging for tests.
///
/// Safe to call any number of times from any thread. The filter is read from
/// `TEST_LOG`, then `RUST_LOG`, and defaults to `"warn"`. Tests that force
/// a matcher fallback log a warning; `TEST_LOG=error` hides it.
///
/// Setting `TEST_LOG_JSON=1` switches to the same JSON layout the server
/// binary emits, which is handy when diffing engine logs against production.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let json = std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1");

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer() // cargo/nextest capture
            .without_time();

        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
