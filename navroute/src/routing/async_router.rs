//! Asynchronous routing dispatcher.
//!
//! `AsyncRouter` decouples the latency-sensitive UI thread from the
//! long-running route computation. A submitted request is parked in a
//! single pending slot and drained by a dedicated worker thread; a newer
//! submission overwrites the slot and cancels the delegate of the request
//! in flight, so only the latest request survives between two worker
//! iterations. Results, progress, and statistics travel back through the
//! injected [`GuiRunner`].
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ UI thread                                                    │
//! │   calculate_route / set_router / clear_state                 │
//! │   callbacks + statistics (scheduled via GuiRunner)           │
//! ├──────────────────────────────────────────────────────────────┤
//! │ worker thread (condvar-parked, one request at a time)        │
//! │   fetcher kick → engine compute → absent drain → delivery    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use super::checkpoints::Checkpoints;
use super::proxy::{DelegateProxy, PointCheckCallback, RouteCallbacks};
use super::result_code::{self, RouterResultCode};
use super::route::Route;
use super::stats::{self, RoutingStatsSink};
use super::traits::{AbsentRegionsFetcher, Router};
use crate::config::RoutingSettings;
use crate::coord::PointD;
use crate::gui::GuiRunner;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Dispatcher for asynchronous route computation.
///
/// Created once per navigation session; the engine and fetcher can be
/// swapped at any time (which cancels in-flight work). Dropping the
/// dispatcher cancels the active request and joins the worker thread.
pub struct AsyncRouter {
    context: Arc<RouterContext>,
    thread_handle: Option<JoinHandle<()>>,
}

/// State shared between the dispatcher facade and the worker thread.
struct RouterContext {
    guard: Mutex<DispatcherState>,
    condvar: Condvar,
    gui: Arc<dyn GuiRunner>,
    stats_sink: Option<Arc<dyn RoutingStatsSink>>,
    point_check: Option<PointCheckCallback>,
}

/// Everything behind the dispatcher mutex.
#[derive(Default)]
struct DispatcherState {
    thread_exit: bool,
    has_request: bool,
    clear_state: bool,
    checkpoints: Checkpoints,
    start_direction: PointD,
    adjust_to_prev_route: bool,
    router: Option<Arc<dyn Router>>,
    absent_fetcher: Option<Arc<dyn AbsentRegionsFetcher>>,
    delegate: Option<Arc<DelegateProxy>>,
    route_counter: u64,
}

/// One request, moved out of the pending slot by the worker.
struct RequestSnapshot {
    checkpoints: Checkpoints,
    start_direction: PointD,
    adjust_to_prev_route: bool,
    delegate: Arc<DelegateProxy>,
    router: Arc<dyn Router>,
    router_name: String,
    absent_fetcher: Option<Arc<dyn AbsentRegionsFetcher>>,
    route_id: u64,
}

impl AsyncRouter {
    /// Creates the dispatcher with default settings and spawns its worker.
    ///
    /// `stats_sink` receives one record per computed request on the UI
    /// thread; pass `None` to disable emission. `point_check` receives
    /// debug candidate points when the `route-marks` feature is enabled.
    pub fn new(
        gui: Arc<dyn GuiRunner>,
        stats_sink: Option<Arc<dyn RoutingStatsSink>>,
        point_check: Option<PointCheckCallback>,
    ) -> Self {
        Self::with_settings(&RoutingSettings::default(), gui, stats_sink, point_check)
    }

    /// Creates the dispatcher with explicit settings.
    pub fn with_settings(
        settings: &RoutingSettings,
        gui: Arc<dyn GuiRunner>,
        stats_sink: Option<Arc<dyn RoutingStatsSink>>,
        point_check: Option<PointCheckCallback>,
    ) -> Self {
        let context = Arc::new(RouterContext {
            guard: Mutex::new(DispatcherState::default()),
            condvar: Condvar::new(),
            gui,
            stats_sink,
            point_check,
        });

        let worker_context = Arc::clone(&context);
        let thread_handle = thread::Builder::new()
            .name(settings.worker_thread_name.clone())
            .spawn(move || worker_loop(&worker_context))
            .expect("Failed to spawn routing worker thread");

        Self {
            context,
            thread_handle: Some(thread_handle),
        }
    }

    /// Installs the engine and the optional absent-regions fetcher.
    ///
    /// Cancels the active request, if any. Safe to call repeatedly; the
    /// last installed engine is the one requests run against.
    pub fn set_router(
        &self,
        router: Arc<dyn Router>,
        absent_fetcher: Option<Arc<dyn AbsentRegionsFetcher>>,
    ) {
        let mut state = self.context.guard.lock().unwrap();

        reset_delegate(&mut state);

        state.router = Some(router);
        state.absent_fetcher = absent_fetcher;
    }

    /// Submits a route request, preempting any request in flight.
    ///
    /// The previous delegate is cancelled: its engine run is asked to
    /// abandon work and its remaining callbacks are filtered out. The
    /// pending slot always reflects the most recent submission.
    pub fn calculate_route(
        &self,
        checkpoints: Checkpoints,
        start_direction: PointD,
        adjust_to_prev_route: bool,
        callbacks: RouteCallbacks,
        timeout_secs: u32,
    ) {
        let mut state = self.context.guard.lock().unwrap();

        state.checkpoints = checkpoints;
        state.start_direction = start_direction;
        state.adjust_to_prev_route = adjust_to_prev_route;

        reset_delegate(&mut state);

        state.delegate = Some(DelegateProxy::new(
            Arc::clone(&self.context.gui),
            callbacks,
            self.context.point_check.clone(),
            timeout_secs,
        ));

        state.has_request = true;
        self.context.condvar.notify_one();
    }

    /// Asks the engine to drop its per-session search state.
    ///
    /// Cancels the active request. A no-op when no engine is installed.
    pub fn clear_state(&self) {
        let mut state = self.context.guard.lock().unwrap();

        state.clear_state = true;
        self.context.condvar.notify_one();

        reset_delegate(&mut state);
    }
}

impl Drop for AsyncRouter {
    fn drop(&mut self) {
        {
            let mut state = self.context.guard.lock().unwrap();

            reset_delegate(&mut state);

            state.thread_exit = true;
            self.context.condvar.notify_one();
        }

        // Join outside the lock; the worker may need it to finish.
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("Routing worker thread panicked during shutdown");
            }
        }
    }
}

/// Cancels and releases the active delegate, if any.
fn reset_delegate(state: &mut DispatcherState) {
    if let Some(delegate) = state.delegate.take() {
        delegate.cancel();
    }
}

/// The worker: parked on the condvar until there is something to do, then
/// drains one request at a time.
fn worker_loop(context: &RouterContext) {
    loop {
        {
            let mut state = context.guard.lock().unwrap();
            while !(state.thread_exit || state.has_request || state.clear_state) {
                state = context.condvar.wait(state).unwrap();
            }

            if state.clear_state {
                if let Some(router) = &state.router {
                    router.clear_state();
                }
                state.clear_state = false;
            }

            if state.thread_exit {
                break;
            }

            if !state.has_request {
                continue;
            }
        }

        process_request(context);
    }

    debug!("Routing worker stopped");
}

/// Moves the pending request out of the slot.
///
/// Returns `None` when the slot is empty or no engine/delegate is
/// installed; a request without them is a programming error and is
/// dropped silently. The route counter is pre-incremented only for
/// requests that actually run.
fn take_request(context: &RouterContext) -> Option<RequestSnapshot> {
    let mut state = context.guard.lock().unwrap();

    if !state.has_request {
        return None;
    }
    state.has_request = false;

    let router = state.router.clone()?;
    let delegate = state.delegate.clone()?;

    state.route_counter += 1;

    Some(RequestSnapshot {
        checkpoints: state.checkpoints.clone(),
        start_direction: state.start_direction,
        adjust_to_prev_route: state.adjust_to_prev_route,
        delegate,
        router_name: router.name(),
        router,
        absent_fetcher: state.absent_fetcher.clone(),
        route_id: state.route_counter,
    })
}

/// Runs one request end to end: fetcher kick, engine compute, primary
/// delivery, absent drain, secondary delivery.
fn process_request(context: &RouterContext) {
    let Some(request) = take_request(context) else {
        return;
    };
    let RequestSnapshot {
        checkpoints,
        start_direction,
        adjust_to_prev_route,
        delegate,
        router,
        router_name,
        absent_fetcher,
        route_id,
    } = request;

    let mut route = Route::new(router_name.clone(), route_id);

    info!(
        checkpoints = %checkpoints,
        start_direction = %start_direction,
        router = %router_name,
        "Calculating the route"
    );

    // Kick the online request first so network latency overlaps compute.
    if let Some(fetcher) = &absent_fetcher {
        fetcher.generate_request(&checkpoints);
    }

    let timer = Instant::now();

    let mut code = match router.calculate_route(
        &checkpoints,
        start_direction,
        adjust_to_prev_route,
        delegate.delegate(),
        &mut route,
    ) {
        Ok(code) => code,
        Err(engine_error) => {
            error!(error = %engine_error, "Engine fault while calculating route");
            schedule_exception_statistics(
                context,
                &router_name,
                &checkpoints,
                start_direction,
                engine_error.message().to_string(),
            );
            // The empty route still goes to on-ready so the UI observes
            // the terminal outcome.
            schedule_on_ready(context, delegate, route, RouterResultCode::InternalError);
            return;
        }
    };

    let mut elapsed_sec = timer.elapsed().as_secs_f64();
    result_code::log_code(code, elapsed_sec);

    let route_length_m = route.total_distance_meters();
    schedule_statistics(
        context,
        &router_name,
        &checkpoints,
        start_direction,
        code,
        route_length_m,
        elapsed_sec,
    );

    // Draw the route without waiting for network latency.
    if code == RouterResultCode::NoError {
        schedule_on_ready(context, Arc::clone(&delegate), route, code);
    }

    let need_fetch_absent = !code.is_cancelled();

    let mut absent = Vec::new();
    if need_fetch_absent {
        if let Some(fetcher) = &absent_fetcher {
            absent = fetcher.absent_regions();
        }
    }

    if !absent.is_empty() && code == RouterResultCode::NoError {
        code = RouterResultCode::NeedMoreMaps;
    }

    // Now covers routing time plus the absent fetch.
    elapsed_sec = timer.elapsed().as_secs_f64();
    result_code::log_code(code, elapsed_sec);

    // A second terminal callback is suppressed when the final code is
    // still NoError: on-ready already delivered the route.
    if code != RouterResultCode::NoError {
        if code == RouterResultCode::NeedMoreMaps {
            context.gui.run(Box::new(move || {
                delegate.on_need_more_maps(route_id, absent);
            }));
        } else {
            context.gui.run(Box::new(move || {
                delegate.on_remove_route(code);
            }));
        }
    }
}

/// Hands the route to the UI thread. The worker keeps no reference to it
/// after this call.
fn schedule_on_ready(
    context: &RouterContext,
    delegate: Arc<DelegateProxy>,
    route: Route,
    code: RouterResultCode,
) {
    context.gui.run(Box::new(move || {
        delegate.on_ready(route, code);
    }));
}

fn schedule_statistics(
    context: &RouterContext,
    router_name: &str,
    checkpoints: &Checkpoints,
    start_direction: PointD,
    code: RouterResultCode,
    route_length_m: f64,
    elapsed_sec: f64,
) {
    let sink = context.stats_sink.clone();
    let router_name = router_name.to_string();
    let start = checkpoints.start();
    let finish = checkpoints.finish();
    context.gui.run(Box::new(move || {
        stats::send_statistics(
            &sink,
            &router_name,
            start,
            start_direction,
            finish,
            code,
            route_length_m,
            elapsed_sec,
        );
    }));
}

fn schedule_exception_statistics(
    context: &RouterContext,
    router_name: &str,
    checkpoints: &Checkpoints,
    start_direction: PointD,
    message: String,
) {
    let sink = context.stats_sink.clone();
    let router_name = router_name.to_string();
    let start = checkpoints.start();
    let finish = checkpoints.finish();
    context.gui.run(Box::new(move || {
        stats::send_exception_statistics(
            &sink,
            &router_name,
            start,
            start_direction,
            finish,
            &message,
        );
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::GuiTask;
    use crate::routing::delegate::RouterDelegate;
    use crate::routing::error::EngineError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    /// Runs scheduled tasks inline on the calling thread.
    struct InlineGui;

    impl GuiRunner for InlineGui {
        fn run(&self, task: GuiTask) {
            task();
        }
    }

    struct CountingRouter {
        calls: AtomicUsize,
        clear_calls: AtomicUsize,
        done: mpsc::Sender<()>,
    }

    impl Router for CountingRouter {
        fn name(&self) -> String {
            "counting".to_string()
        }

        fn clear_state(&self) {
            self.clear_calls.fetch_add(1, Ordering::SeqCst);
        }

        fn calculate_route(
            &self,
            _checkpoints: &Checkpoints,
            _start_direction: PointD,
            _adjust_to_prev_route: bool,
            _delegate: &RouterDelegate,
            _route: &mut Route,
        ) -> Result<RouterResultCode, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.done.send(());
            Ok(RouterResultCode::RouteNotFound)
        }
    }

    fn dispatcher() -> AsyncRouter {
        AsyncRouter::new(Arc::new(InlineGui), None, None)
    }

    #[test]
    fn test_idle_dispatcher_drops_cleanly() {
        let router = dispatcher();
        drop(router);
    }

    #[test]
    fn test_request_without_engine_is_dropped_silently() {
        let router = dispatcher();
        // No engine installed: the worker discards the request without
        // any callback.
        router.calculate_route(
            Checkpoints::default(),
            PointD::zero(),
            false,
            RouteCallbacks::new().on_remove_route(|_| panic!("must not fire")),
            0,
        );
        thread::sleep(Duration::from_millis(100));
    }

    #[test]
    fn test_clear_state_without_engine_is_noop() {
        let router = dispatcher();
        router.clear_state();
        router.clear_state();
        thread::sleep(Duration::from_millis(50));
    }

    #[test]
    fn test_clear_state_reaches_engine() {
        let (done, _rx) = mpsc::channel();
        let engine = Arc::new(CountingRouter {
            calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
            done,
        });

        let router = dispatcher();
        router.set_router(engine.clone(), None);
        router.clear_state();

        // The worker handles the flag on its next wakeup.
        let deadline = Instant::now() + Duration::from_secs(2);
        while engine.clear_calls.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(engine.clear_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_engine_runs_submitted_request() {
        let (done, rx) = mpsc::channel();
        let engine = Arc::new(CountingRouter {
            calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
            done,
        });

        let router = dispatcher();
        router.set_router(engine.clone(), None);
        router.calculate_route(
            Checkpoints::default(),
            PointD::zero(),
            false,
            RouteCallbacks::new(),
            0,
        );

        rx.recv_timeout(Duration::from_secs(2))
            .expect("engine was not invoked");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }
}
