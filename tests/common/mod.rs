//! Shared test setup.
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//! }
//! ```
//!
//! `RUST_LOG` selects what is printed, e.g. `RUST_LOG=meldable_heaps=debug`
//! to see heap creation and melds, or `meldable_heaps=trace` to add
//! consolidation and combine sizes. Output goes through the test harness and
//! only shows for failing tests unless `--nocapture` is given.

#![allow(dead_code)]

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static INIT: Once = Once::new();

/// Installs the test subscriber. Only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let console = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_filter(make_filter(Level::WARN));

        // Another harness may already have installed a global subscriber.
        let _ = Registry::default().with(console).try_init();
    });
}

fn make_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{default_level}")))
}

/// Deterministic keys in `0..bound`, scattered by a prime stride so
/// insertion order is far from sorted. Shared with the benches.
pub fn scrambled_keys(count: usize, bound: i32) -> Vec<i32> {
    let bound = i64::from(bound);
    (0..count as i64).map(|i| ((i * 7_919 + 23) % bound) as i32).collect()
}
