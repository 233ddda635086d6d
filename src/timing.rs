//! Wall-clock timing for ledger operations
//!
//! Sealing time depends on difficulty and luck, so measurement lives with
//! the caller instead of inside the sealing loop. Wrap any closure to get
//! its result together with how long it ran.

use std::time::{Duration, Instant};

use tracing::info;

/// Run `operation` and return its result with the elapsed wall time.
pub fn timed<T>(operation: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = operation();
    (result, start.elapsed())
}

/// Like [`timed`], also logging the elapsed time under `label`.
pub fn timed_logged<T>(label: &str, operation: impl FnOnce() -> T) -> (T, Duration) {
    let (result, elapsed) = timed(operation);
    info!("{} completed in {:?}", label, elapsed);
    (result, elapsed)
}
