//! Observability module for metrics.
//!
//! Screening counters and timings are recorded through the `metrics` facade.
//! No exporter is installed here; the embedding process decides where they
//! go. Logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    record_candidates_generated, record_fetch_failure, record_generation_time,
    record_options_filtered,
};
