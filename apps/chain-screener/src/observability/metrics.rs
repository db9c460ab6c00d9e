//! Metrics recorded by a screening run.
//!
//! # Example
//!
//! ```ignore
//! use chain_screener::observability::record_candidates_generated;
//!
//! record_candidates_generated("iron_condor", 1_250);
//! ```

use metrics::{counter, histogram};

// ============================================================================
// Option Filter Metrics
// ============================================================================

/// Record how many quotes the option filter kept and rejected.
///
/// # Arguments
///
/// * `kept` - Quotes that passed every configured predicate
/// * `rejected` - Quotes that failed at least one predicate
pub fn record_options_filtered(kept: usize, rejected: usize) {
    counter!("screener_options_filtered_total", "outcome" => "kept").increment(kept as u64);
    counter!("screener_options_filtered_total", "outcome" => "rejected")
        .increment(rejected as u64);
}

// ============================================================================
// Generation Metrics
// ============================================================================

/// Record candidates emitted by one generator.
///
/// # Arguments
///
/// * `shape` - Strategy shape (e.g., `"iron_condor"`, `"straddle"`)
/// * `count` - Number of candidates before strategy-level filtering
pub fn record_candidates_generated(shape: &str, count: usize) {
    counter!(
        "screener_candidates_generated_total",
        "shape" => shape.to_string()
    )
    .increment(count as u64);
}

/// Record generator wall time.
///
/// # Arguments
///
/// * `shape` - Strategy shape
/// * `duration_seconds` - Time spent enumerating in seconds
pub fn record_generation_time(shape: &str, duration_seconds: f64) {
    histogram!(
        "screener_generation_seconds",
        "shape" => shape.to_string()
    )
    .record(duration_seconds);
}

// ============================================================================
// Feed Metrics
// ============================================================================

/// Record an expiration whose chain could not be fetched.
///
/// # Arguments
///
/// * `symbol` - Underlying whose chain was being fetched
pub fn record_fetch_failure(symbol: &str) {
    counter!(
        "screener_fetch_failures_total",
        "symbol" => symbol.to_string()
    )
    .increment(1);
}
