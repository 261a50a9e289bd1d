//! Metric name constants and startup registration, shared by every crate
//! that emits metrics. Naming lives here so call sites can't typo a metric
//! name, and [`describe_metrics`] registers descriptions once at startup.

pub use metrics;

use metrics::Unit;

/// Metric names emitted across the workspace.
pub mod metric_defs {
    pub const TERRAIN_TILE_FETCH_TOTAL: &str = "meshplan.terrain.tile_fetch_total";
    pub const TERRAIN_TILE_FETCH_FAILED: &str = "meshplan.terrain.tile_fetch_failed_total";
    pub const TERRAIN_TILE_FETCH_COALESCED: &str = "meshplan.terrain.tile_fetch_coalesced_total";
    pub const TERRAIN_TILE_CACHE_HIT: &str = "meshplan.terrain.tile_cache_hit_total";

    pub const COVERAGE_JOBS_STARTED: &str = "meshplan.coverage.jobs_started_total";
    pub const COVERAGE_JOBS_COMPLETED: &str = "meshplan.coverage.jobs_completed_total";
    pub const COVERAGE_JOBS_CANCELLED: &str = "meshplan.coverage.jobs_cancelled_total";
    pub const COVERAGE_JOB_DURATION_SECONDS: &str = "meshplan.coverage.job_duration_seconds";
    pub const COVERAGE_CANDIDATES_EVALUATED: &str = "meshplan.coverage.candidates_evaluated_total";
}

/// Registers descriptions for all metrics emitted by the workspace. Call
/// once at process startup, after installing a recorder.
pub fn describe_metrics() {
    use metric_defs::*;

    metrics::describe_counter!(
        TERRAIN_TILE_FETCH_TOTAL,
        Unit::Count,
        "Tile fetches initiated (single-flight instigator only)"
    );
    metrics::describe_counter!(
        TERRAIN_TILE_FETCH_FAILED,
        Unit::Count,
        "Tile fetches that ended in error"
    );
    metrics::describe_counter!(
        TERRAIN_TILE_FETCH_COALESCED,
        Unit::Count,
        "Tile requests joined an in-flight fetch instead of starting a new one"
    );
    metrics::describe_counter!(
        TERRAIN_TILE_CACHE_HIT,
        Unit::Count,
        "Tile lookups served from the process-local LRU"
    );

    metrics::describe_counter!(COVERAGE_JOBS_STARTED, Unit::Count, "Coverage jobs started");
    metrics::describe_counter!(
        COVERAGE_JOBS_COMPLETED,
        Unit::Count,
        "Coverage jobs completed successfully"
    );
    metrics::describe_counter!(
        COVERAGE_JOBS_CANCELLED,
        Unit::Count,
        "Coverage jobs stopped by cancellation"
    );
    metrics::describe_histogram!(
        COVERAGE_JOB_DURATION_SECONDS,
        Unit::Seconds,
        "Wall-clock time to run a coverage job"
    );
    metrics::describe_counter!(
        COVERAGE_CANDIDATES_EVALUATED,
        Unit::Count,
        "Candidate nodes evaluated across all coverage jobs"
    );
}
