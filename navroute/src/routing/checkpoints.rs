//! Ordered waypoints of a route request.

use crate::coord::PointD;
use std::fmt;

/// Ordered geographic points a route must pass through.
///
/// There are always at least a start and a finish; any points between
/// them are intermediate stops. The sequence is immutable for the
/// lifetime of a request.
#[derive(Debug, Clone)]
pub struct Checkpoints {
    points: Vec<PointD>,
}

impl Checkpoints {
    /// Creates checkpoints from a start and a finish.
    pub fn new(start: PointD, finish: PointD) -> Self {
        Self {
            points: vec![start, finish],
        }
    }

    /// Creates checkpoints from an ordered point list.
    ///
    /// # Panics
    ///
    /// Panics unless the list holds at least a start and a finish;
    /// submitting fewer points is a programming error.
    pub fn from_points(points: Vec<PointD>) -> Self {
        assert!(
            points.len() >= 2,
            "checkpoints require at least a start and a finish"
        );
        Self { points }
    }

    /// The starting point.
    pub fn start(&self) -> PointD {
        self.points[0]
    }

    /// The final point.
    pub fn finish(&self) -> PointD {
        self.points[self.points.len() - 1]
    }

    /// Intermediate stops between start and finish, possibly empty.
    pub fn intermediate(&self) -> &[PointD] {
        &self.points[1..self.points.len() - 1]
    }

    /// All points in order.
    pub fn points(&self) -> &[PointD] {
        &self.points
    }
}

impl Default for Checkpoints {
    /// Two origin points; a placeholder until a request is submitted.
    fn default() -> Self {
        Self::new(PointD::zero(), PointD::zero())
    }
}

impl fmt::Display for Checkpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", point)?;
        }
        write!(f, "]")
    }
}
