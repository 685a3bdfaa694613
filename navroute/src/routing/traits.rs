//! External collaborator interfaces.
//!
//! The dispatcher consumes the routing engine and the online
//! absent-regions fetcher through these seams. Once a request has
//! started, both are reached only from the worker thread.

use super::checkpoints::Checkpoints;
use super::delegate::RouterDelegate;
use super::error::EngineError;
use super::result_code::RouterResultCode;
use super::route::Route;
use crate::coord::PointD;

/// A route computation engine.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: the dispatcher installs the
/// engine from the UI thread and invokes it from the worker thread.
pub trait Router: Send + Sync {
    /// Engine name, recorded on produced routes and in statistics.
    fn name(&self) -> String;

    /// Drops any per-session search state.
    fn clear_state(&self) {}

    /// Computes a route through `checkpoints`, populating `route`.
    ///
    /// Long-running; the engine must poll `delegate.is_cancelled()` and
    /// return [`RouterResultCode::Cancelled`] promptly once it reports
    /// true. Expected outcomes are result codes; `Err` is reserved for
    /// faults (the dispatcher reports those as `InternalError`).
    fn calculate_route(
        &self,
        checkpoints: &Checkpoints,
        start_direction: PointD,
        adjust_to_prev_route: bool,
        delegate: &RouterDelegate,
        route: &mut Route,
    ) -> Result<RouterResultCode, EngineError>;
}

/// Online lookup for map regions that would improve a route.
///
/// The dispatcher kicks the request before the engine runs so network
/// latency overlaps compute, and drains the response afterwards.
pub trait AbsentRegionsFetcher: Send + Sync {
    /// Starts the online request. Must not block.
    fn generate_request(&self, checkpoints: &Checkpoints);

    /// Blocks until the response arrives and returns the absent regions.
    ///
    /// Fetch failures surface as an empty list.
    fn absent_regions(&self) -> Vec<String>;
}
