//! Prometheus metric names and recording helpers.
//!
//! Without an installed recorder every call here is a no-op.

use std::time::Duration;

use metrics::{counter, histogram};
use terrain_common::{RemoteService, TerrainResult};

pub const UPLOADS_TOTAL: &str = "contour_uploads_total";
pub const PROCESSING_FAILURES_TOTAL: &str = "contour_processing_failures_total";
pub const TEXTURE_EXTRACT_SECONDS: &str = "contour_texture_extract_seconds";
pub const HEIGHTMAP_NORMALIZE_SECONDS: &str = "contour_heightmap_normalize_seconds";
pub const REMOTE_CALLS_TOTAL: &str = "contour_remote_calls_total";

pub fn record_upload(kind: &'static str) {
    counter!(UPLOADS_TOTAL, "kind" => kind).increment(1);
}

pub fn record_failure(stage: &'static str) {
    counter!(PROCESSING_FAILURES_TOTAL, "stage" => stage).increment(1);
}

pub fn record_texture_extract(elapsed: Duration) {
    histogram!(TEXTURE_EXTRACT_SECONDS).record(elapsed.as_secs_f64());
}

pub fn record_heightmap_normalize(elapsed: Duration) {
    histogram!(HEIGHTMAP_NORMALIZE_SECONDS).record(elapsed.as_secs_f64());
}

/// Count a remote call by service and outcome, passing the result through.
pub fn record_remote<T>(service: RemoteService, result: TerrainResult<T>) -> TerrainResult<T> {
    let outcome = if result.is_ok() { "success" } else { "failure" };
    counter!(
        REMOTE_CALLS_TOTAL,
        "service" => service.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    result
}
