//! Routing statistics assembly and emission.
//!
//! Each completed request yields one key→value record describing its
//! geometry and outcome. The dispatcher doesn't know how records are
//! consumed; it hands them to a sink abstraction on the UI thread so the
//! sink may touch UI-affine state.

use super::result_code::RouterResultCode;
use crate::coord::{self, PointD};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One statistics record; keys are stable across releases.
pub type StatsRecord = BTreeMap<String, String>;

/// Sink for routing statistics records.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Records are always delivered on
/// the UI thread.
pub trait RoutingStatsSink: Send + Sync {
    /// Called once per emitted record.
    fn report(&self, record: StatsRecord);
}

// Coordinate precision of 5 digits after the decimal point corresponds to
// meters (0.00001 degree ~ 1 meter).
const COORD_PRECISION: usize = 5;

fn round_coord(value: f64) -> String {
    format!("{:.*}", COORD_PRECISION, value)
}

/// Builds the geometry part of a record: router name, start/finish
/// longitude and latitude, and the start direction vector.
fn prepare_statistics(
    router_name: &str,
    start: PointD,
    start_direction: PointD,
    finish: PointD,
) -> StatsRecord {
    let mut record = StatsRecord::new();
    record.insert("name".to_string(), router_name.to_string());
    record.insert("startLon".to_string(), round_coord(coord::x_to_lon(start.x)));
    record.insert("startLat".to_string(), round_coord(coord::y_to_lat(start.y)));
    record.insert(
        "startDirectionX".to_string(),
        round_coord(start_direction.x),
    );
    record.insert(
        "startDirectionY".to_string(),
        round_coord(start_direction.y),
    );
    record.insert("finalLon".to_string(), round_coord(coord::x_to_lon(finish.x)));
    record.insert("finalLat".to_string(), round_coord(coord::y_to_lat(finish.y)));
    record
}

/// Emits the record for a completed computation.
///
/// `distance` is included only for `NoError` outcomes. Skipped silently
/// when no sink is installed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn send_statistics(
    sink: &Option<Arc<dyn RoutingStatsSink>>,
    router_name: &str,
    start: PointD,
    start_direction: PointD,
    finish: PointD,
    code: RouterResultCode,
    route_length_m: f64,
    elapsed_sec: f64,
) {
    let Some(sink) = sink else {
        return;
    };

    let mut record = prepare_statistics(router_name, start, start_direction, finish);
    record.insert("result".to_string(), code.to_string());
    record.insert("elapsed".to_string(), elapsed_sec.to_string());

    if code.is_no_error() {
        record.insert("distance".to_string(), route_length_m.to_string());
    }

    sink.report(record);
}

/// Emits the record for a computation that ended in an engine fault.
pub(crate) fn send_exception_statistics(
    sink: &Option<Arc<dyn RoutingStatsSink>>,
    router_name: &str,
    start: PointD,
    start_direction: PointD,
    finish: PointD,
    message: &str,
) {
    let Some(sink) = sink else {
        return;
    };

    let mut record = prepare_statistics(router_name, start, start_direction, finish);
    record.insert("exception".to_string(), message.to_string());

    sink.report(record);
}

// =============================================================================
// Built-in Sink Implementations
// =============================================================================

/// No-op sink for when statistics are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatsSink;

impl RoutingStatsSink for NullStatsSink {
    fn report(&self, _record: StatsRecord) {
        // Intentionally empty
    }
}

/// Sink that logs records using the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatsSink;

impl RoutingStatsSink for TracingStatsSink {
    fn report(&self, record: StatsRecord) {
        tracing::info!(?record, "Routing statistics");
    }
}

/// Sink that forwards records to multiple sinks.
pub struct MultiplexStatsSink {
    sinks: Vec<Arc<dyn RoutingStatsSink>>,
}

impl MultiplexStatsSink {
    /// Creates a multiplex sink over the given sinks.
    pub fn new(sinks: Vec<Arc<dyn RoutingStatsSink>>) -> Self {
        Self { sinks }
    }

    /// Adds a sink to the multiplex.
    pub fn add_sink(&mut self, sink: Arc<dyn RoutingStatsSink>) {
        self.sinks.push(sink);
    }
}

impl RoutingStatsSink for MultiplexStatsSink {
    fn report(&self, record: StatsRecord) {
        for sink in &self.sinks {
            sink.report(record.clone());
        }
    }
}

impl std::fmt::Debug for MultiplexStatsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplexStatsSink")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}
