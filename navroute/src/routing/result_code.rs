//! Route computation outcome codes.

use std::fmt;
use tracing::{info, warn};

/// Outcome of a route computation.
///
/// The engine reports one of these for every request; the dispatcher may
/// upgrade `NoError` to `NeedMoreMaps` after draining the online
/// absent-regions fetcher. `Display` yields the stable code name used in
/// statistics records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterResultCode {
    NoError,
    Cancelled,
    StartPointNotFound,
    EndPointNotFound,
    IntermediatePointNotFound,
    PointsInDifferentMWM,
    RouteNotFound,
    RouteFileNotExist,
    NeedMoreMaps,
    NoCurrentPosition,
    InconsistentMWMandRoute,
    InternalError,
    FileTooOld,
    TransitRouteNotFoundNoNetwork,
    TransitRouteNotFoundTooLongPedestrian,
    RouteNotFoundRedressRouteError,
}

impl RouterResultCode {
    /// Returns true for the successful outcome.
    pub fn is_no_error(&self) -> bool {
        matches!(self, Self::NoError)
    }

    /// Returns true when the request was abandoned by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for RouterResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoError => "NoError",
            Self::Cancelled => "Cancelled",
            Self::StartPointNotFound => "StartPointNotFound",
            Self::EndPointNotFound => "EndPointNotFound",
            Self::IntermediatePointNotFound => "IntermediatePointNotFound",
            Self::PointsInDifferentMWM => "PointsInDifferentMWM",
            Self::RouteNotFound => "RouteNotFound",
            Self::RouteFileNotExist => "RouteFileNotExist",
            Self::NeedMoreMaps => "NeedMoreMaps",
            Self::NoCurrentPosition => "NoCurrentPosition",
            Self::InconsistentMWMandRoute => "InconsistentMWMandRoute",
            Self::InternalError => "InternalError",
            Self::FileTooOld => "FileTooOld",
            Self::TransitRouteNotFoundNoNetwork => "TransitRouteNotFoundNoNetwork",
            Self::TransitRouteNotFoundTooLongPedestrian => "TransitRouteNotFoundTooLongPedestrian",
            Self::RouteNotFoundRedressRouteError => "RouteNotFoundRedressRouteError",
        };
        write!(f, "{}", name)
    }
}

/// Logs the fixed message for a result code.
///
/// Codes describing degraded map data or unreachable points log at WARN;
/// the rest log at INFO, some with the elapsed time of the computation.
pub(crate) fn log_code(code: RouterResultCode, elapsed_sec: f64) {
    use RouterResultCode::*;
    match code {
        StartPointNotFound => warn!("Can't find start or end node"),
        EndPointNotFound => warn!("Can't find end point node"),
        IntermediatePointNotFound => warn!("Can't find intermediate point node"),
        PointsInDifferentMWM => warn!("Points are in different MWMs"),
        RouteNotFound => warn!("Route not found"),
        RouteFileNotExist => warn!("There is no routing file"),
        NeedMoreMaps => info!(
            elapsed_sec,
            "Routing can find a better way with additional maps"
        ),
        Cancelled => info!(elapsed_sec, "Route calculation cancelled"),
        NoError => info!(elapsed_sec, "Route found"),
        NoCurrentPosition => info!("No current position"),
        InconsistentMWMandRoute => info!("Inconsistent mwm and route"),
        InternalError => info!("Internal error"),
        FileTooOld => info!("File too old"),
        TransitRouteNotFoundNoNetwork => warn!(
            "No transit route is found because there's no transit network in the mwm of the route point"
        ),
        TransitRouteNotFoundTooLongPedestrian => {
            warn!("No transit route is found because pedestrian way is too long")
        }
        RouteNotFoundRedressRouteError => {
            warn!("Route not found because of a redress route error")
        }
    }
}
