//! Request metrics.
//!
//! Recorded through the `metrics` facade; the Prometheus recorder
//! installed by the binary renders them on `/metrics`.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

use popgrid_common::PopError;
use raster_store::RasterStore;

/// Route label for metric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Total,
    Grid,
    Project,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Grid => "grid",
            Self::Project => "project",
        }
    }
}

/// Record the outcome of one query request.
pub fn record_query<T>(endpoint: Endpoint, timer: &Timer, result: &Result<T, PopError>) {
    let label = endpoint.as_str();
    counter!("popgrid_requests_total", "endpoint" => label).increment(1);
    histogram!("popgrid_query_duration_ms", "endpoint" => label).record(timer.elapsed_ms());

    if let Err(err) = result {
        counter!(
            "popgrid_request_errors_total",
            "endpoint" => label,
            "code" => err.error_code()
        )
        .increment(1);
    }
}

/// Publish static facts about the loaded raster.
pub fn record_store(store: &RasterStore) {
    gauge!("popgrid_raster_rows").set(store.dims().rows as f64);
    gauge!("popgrid_raster_cols").set(store.dims().cols as f64);
    gauge!("popgrid_raster_total_population").set(store.total());
}

/// Wall-clock timer for a request.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_micros() as f64 / 1000.0
    }
}
