//! Asynchronous route computation core.
//!
//! The module is built around five pieces:
//!
//! - [`AsyncRouter`]: the dispatcher. Owns the worker thread, the single
//!   pending-request slot, and the active request's delegate proxy.
//! - The delegate proxy (internal): holds one request's user callbacks
//!   and filters every delivery through the cancellation flag.
//! - [`RouterDelegate`]: the engine-facing handle conveying cancellation,
//!   timeout, and progress reporting into a running computation.
//! - [`Router`] / [`AbsentRegionsFetcher`]: the consumed engine and
//!   online-fetcher seams.
//! - [`RoutingStatsSink`]: per-request statistics emission, always on the
//!   UI thread.
//!
//! # Delivery contract
//!
//! For a single request the UI thread observes a prefix of
//! `progress*, (ready | remove-route | need-more-maps)`, with
//! `need-more-maps` following a `ready` when the absent drain upgrades a
//! successful computation. A cancelled or preempted request schedules no
//! further callbacks once `cancel` has returned.

mod async_router;
mod checkpoints;
mod delegate;
mod error;
mod proxy;
mod result_code;
mod route;
mod stats;
mod traits;

pub use async_router::AsyncRouter;
pub use checkpoints::Checkpoints;
pub use delegate::RouterDelegate;
pub use error::EngineError;
pub use proxy::{
    NeedMoreMapsCallback, PointCheckCallback, ProgressCallback, ReadyCallback, RemoveRouteCallback,
    RouteCallbacks,
};
pub use result_code::RouterResultCode;
pub use route::Route;
pub use stats::{
    MultiplexStatsSink, NullStatsSink, RoutingStatsSink, StatsRecord, TracingStatsSink,
};
pub use traits::{AbsentRegionsFetcher, Router};
