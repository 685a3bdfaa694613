//! Per-request delegate proxy.
//!
//! The proxy sits between the worker thread and the user's callbacks for
//! exactly one request. Every callback is filtered through the request's
//! cancellation state under a leaf mutex: the decision to run user code
//! is made *before* the task is scheduled onto the UI thread, so a
//! cancelled request schedules nothing further. Tasks already queued on
//! the UI thread carry their own snapshots and may still run.

use super::delegate::RouterDelegate;
use super::result_code::RouterResultCode;
use super::route::Route;
use crate::coord::PointD;
use crate::gui::GuiRunner;
use std::sync::{Arc, Mutex, Weak};

/// Receives the computed route; ownership transfers to the UI.
pub type ReadyCallback = Box<dyn FnOnce(Route, RouterResultCode) + Send>;
/// Receives the route id and the absent map regions to download.
pub type NeedMoreMapsCallback = Box<dyn FnOnce(u64, Vec<String>) + Send>;
/// Receives the terminal code of a failed computation.
pub type RemoveRouteCallback = Box<dyn FnOnce(RouterResultCode) + Send>;
/// Receives computation progress in `[0.0, 1.0]`.
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;
/// Receives candidate points settled by the engine (debug builds).
pub type PointCheckCallback = Arc<dyn Fn(PointD) + Send + Sync>;

/// User callbacks for one route request.
///
/// All callbacks are optional; an absent callback silently drops its
/// events.
#[derive(Default)]
pub struct RouteCallbacks {
    pub(crate) on_ready: Option<ReadyCallback>,
    pub(crate) on_need_more_maps: Option<NeedMoreMapsCallback>,
    pub(crate) on_remove_route: Option<RemoveRouteCallback>,
    pub(crate) on_progress: Option<ProgressCallback>,
}

impl RouteCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once with the computed route on success (or with an empty
    /// route after an engine fault).
    pub fn on_ready(mut self, f: impl FnOnce(Route, RouterResultCode) + Send + 'static) -> Self {
        self.on_ready = Some(Box::new(f));
        self
    }

    /// Called when downloading more maps would improve the answer.
    pub fn on_need_more_maps(mut self, f: impl FnOnce(u64, Vec<String>) + Send + 'static) -> Self {
        self.on_need_more_maps = Some(Box::new(f));
        self
    }

    /// Called on terminal failures other than `NeedMoreMaps`.
    pub fn on_remove_route(mut self, f: impl FnOnce(RouterResultCode) + Send + 'static) -> Self {
        self.on_remove_route = Some(Box::new(f));
        self
    }

    /// Called as the engine reports progress.
    pub fn on_progress(mut self, f: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(f));
        self
    }
}

struct CallbackSlots {
    on_ready: Option<ReadyCallback>,
    on_need_more_maps: Option<NeedMoreMapsCallback>,
    on_remove_route: Option<RemoveRouteCallback>,
    on_progress: Option<ProgressCallback>,
    #[cfg(feature = "route-marks")]
    on_point_check: Option<PointCheckCallback>,
}

/// Callback holder and cancellation filter for one request.
pub(crate) struct DelegateProxy {
    guard: Mutex<CallbackSlots>,
    delegate: RouterDelegate,
    gui: Arc<dyn GuiRunner>,
}

impl DelegateProxy {
    /// Builds the proxy and wires the engine delegate's listeners back to
    /// it, then arms the request timeout.
    pub(crate) fn new(
        gui: Arc<dyn GuiRunner>,
        callbacks: RouteCallbacks,
        #[cfg_attr(not(feature = "route-marks"), allow(unused_variables))] point_check: Option<
            PointCheckCallback,
        >,
        timeout_secs: u32,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let delegate = RouterDelegate::new();
            delegate.reset();

            let proxy = Weak::clone(weak);
            delegate.set_progress_listener(Box::new(move |progress| {
                if let Some(proxy) = proxy.upgrade() {
                    proxy.on_progress(progress);
                }
            }));

            let proxy = Weak::clone(weak);
            delegate.set_point_check_listener(Box::new(move |point| {
                if let Some(proxy) = proxy.upgrade() {
                    proxy.on_point_check(point);
                }
            }));

            delegate.set_timeout(timeout_secs);

            Self {
                guard: Mutex::new(CallbackSlots {
                    on_ready: callbacks.on_ready,
                    on_need_more_maps: callbacks.on_need_more_maps,
                    on_remove_route: callbacks.on_remove_route,
                    on_progress: callbacks.on_progress,
                    #[cfg(feature = "route-marks")]
                    on_point_check: point_check,
                }),
                delegate,
                gui,
            }
        })
    }

    /// The engine-facing handle for this request.
    pub(crate) fn delegate(&self) -> &RouterDelegate {
        &self.delegate
    }

    /// Cancels the request. Idempotent; once this returns, no further
    /// user callback will be scheduled by this proxy.
    pub(crate) fn cancel(&self) {
        let _slots = self.guard.lock().unwrap();
        self.delegate.cancel();
    }

    /// Delivers the route. Runs on the UI thread.
    pub(crate) fn on_ready(&self, route: Route, code: RouterResultCode) {
        let callback = {
            let mut slots = self.guard.lock().unwrap();
            if slots.on_ready.is_none() || self.delegate.is_cancelled() {
                return;
            }
            slots.on_ready.take()
        };
        if let Some(callback) = callback {
            callback(route, code);
        }
    }

    /// Delivers the absent-regions hint. Runs on the UI thread.
    pub(crate) fn on_need_more_maps(&self, route_id: u64, absent_regions: Vec<String>) {
        let callback = {
            let mut slots = self.guard.lock().unwrap();
            if slots.on_need_more_maps.is_none() || self.delegate.is_cancelled() {
                return;
            }
            slots.on_need_more_maps.take()
        };
        if let Some(callback) = callback {
            callback(route_id, absent_regions);
        }
    }

    /// Delivers a terminal failure. Runs on the UI thread.
    pub(crate) fn on_remove_route(&self, code: RouterResultCode) {
        let callback = {
            let mut slots = self.guard.lock().unwrap();
            if slots.on_remove_route.is_none() || self.delegate.is_cancelled() {
                return;
            }
            slots.on_remove_route.take()
        };
        if let Some(callback) = callback {
            callback(code);
        }
    }

    /// Forwards engine progress. Runs on the worker thread; the user
    /// callback is snapshotted under the lock and scheduled onto the UI
    /// thread, so cancellation cannot race the snapshot.
    pub(crate) fn on_progress(&self, progress: f32) {
        let callback = {
            let slots = self.guard.lock().unwrap();
            if self.delegate.is_cancelled() {
                return;
            }
            match &slots.on_progress {
                Some(callback) => Arc::clone(callback),
                None => return,
            }
        };
        self.gui.run(Box::new(move || callback(progress)));
    }

    /// Forwards a candidate point to the debug callback. Compiled to a
    /// no-op without the `route-marks` feature.
    #[cfg(feature = "route-marks")]
    pub(crate) fn on_point_check(&self, point: PointD) {
        let callback = {
            let slots = self.guard.lock().unwrap();
            if self.delegate.is_cancelled() {
                return;
            }
            match &slots.on_point_check {
                Some(callback) => Arc::clone(callback),
                None => return,
            }
        };
        self.gui.run(Box::new(move || callback(point)));
    }

    #[cfg(not(feature = "route-marks"))]
    pub(crate) fn on_point_check(&self, _point: PointD) {}
}
