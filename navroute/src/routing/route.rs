//! The route artifact produced by an engine.

use crate::coord::PointD;

/// A computed route.
///
/// Created empty by the dispatcher, tagged with the engine name and a
/// dispatcher-assigned id, then populated by the engine. After delivery
/// the route is used only on the UI thread.
#[derive(Debug, Clone)]
pub struct Route {
    router_name: String,
    route_id: u64,
    poly: Vec<PointD>,
    distance_m: f64,
}

impl Route {
    /// Creates an empty (invalid) route.
    pub fn new(router_name: impl Into<String>, route_id: u64) -> Self {
        Self {
            router_name: router_name.into(),
            route_id,
            poly: Vec::new(),
            distance_m: 0.0,
        }
    }

    /// Name of the engine that produced the route.
    pub fn router_name(&self) -> &str {
        &self.router_name
    }

    /// Dispatcher-assigned id; strictly increasing per dispatcher.
    pub fn route_id(&self) -> u64 {
        self.route_id
    }

    /// Installs the computed geometry and its total length.
    pub fn set_geometry(&mut self, poly: Vec<PointD>, distance_m: f64) {
        self.poly = poly;
        self.distance_m = distance_m;
    }

    /// Total route length in meters.
    pub fn total_distance_meters(&self) -> f64 {
        self.distance_m
    }

    /// The route polyline.
    pub fn polyline(&self) -> &[PointD] {
        &self.poly
    }

    /// A route is valid once it holds a drawable polyline.
    pub fn is_valid(&self) -> bool {
        self.poly.len() > 1
    }
}
