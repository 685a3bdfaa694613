//! NavRoute - asynchronous routing dispatcher for mobile navigation
//!
//! This library decouples a latency-sensitive user-interface thread from a
//! potentially long-running route-computation engine. A route request is
//! parked in a single pending slot and drained by a dedicated background
//! worker; results, progress, and statistics come back to the UI thread
//! through an injected task queue.
//!
//! # High-Level API
//!
//! ```ignore
//! use navroute::gui::GuiThread;
//! use navroute::routing::{AsyncRouter, Checkpoints, RouteCallbacks};
//! use navroute::coord::PointD;
//! use std::sync::Arc;
//!
//! let gui = Arc::new(GuiThread::start());
//! let dispatcher = AsyncRouter::new(gui, None, None);
//! dispatcher.set_router(my_engine, Some(my_fetcher));
//!
//! let callbacks = RouteCallbacks::new()
//!     .on_ready(|route, code| { /* draw the route */ })
//!     .on_progress(|p| { /* update the progress bar */ });
//!
//! dispatcher.calculate_route(
//!     Checkpoints::new(PointD::new(27.5, 64.2), PointD::new(27.6, 64.3)),
//!     PointD::zero(),
//!     false,
//!     callbacks,
//!     0,
//! );
//! ```

pub mod config;
pub mod coord;
pub mod gui;
pub mod logging;
pub mod routing;

/// Version of the NavRoute library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
