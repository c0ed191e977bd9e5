//! Planar geometry helpers and the fixed path enemies travel along.

use glam::Vec2;
use thiserror::Error;

const STANDARD_WAYPOINTS: [Vec2; 8] = [
    Vec2::new(-40.0, 110.0),
    Vec2::new(240.0, 110.0),
    Vec2::new(240.0, 230.0),
    Vec2::new(520.0, 230.0),
    Vec2::new(520.0, 380.0),
    Vec2::new(790.0, 380.0),
    Vec2::new(790.0, 160.0),
    Vec2::new(950.0, 160.0),
];

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Returns the point on the closed segment `start..=end` closest to `point`.
///
/// Zero-length segments are treated as having unit squared length so the
/// projection collapses onto `start` instead of producing NaN.
#[must_use]
pub fn project_to_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let segment = end - start;
    let length_squared = segment.length_squared();
    let length_squared = if length_squared > 0.0 {
        length_squared
    } else {
        1.0
    };
    let t = ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    start + segment * t
}

/// Ordered, immutable route that every enemy follows.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    /// Validates and wraps the provided waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::TooFewWaypoints`] when fewer than two waypoints are
    /// supplied and [`PathError::RepeatedWaypoint`] when two consecutive
    /// waypoints coincide.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        if let Some(index) = waypoints
            .windows(2)
            .position(|pair| pair[0] == pair[1])
        {
            return Err(PathError::RepeatedWaypoint { index: index + 1 });
        }

        Ok(Self { waypoints })
    }

    /// The route used by the standard game.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            waypoints: STANDARD_WAYPOINTS.to_vec(),
        }
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Waypoint at `index`, or `None` once the end of the path has been passed.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Number of waypoints composing the path.
    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// First waypoint, where enemies enter the field.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Iterator over consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.waypoints.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Reports whether `point` lies strictly closer than `threshold` to any segment.
    #[must_use]
    pub fn is_near(&self, point: Vec2, threshold: f32) -> bool {
        self.segments().any(|(start, end)| {
            distance(point, project_to_segment(point, start, end)) < threshold
        })
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reasons a custom path may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path needs a start and an end.
    #[error("a path needs at least two waypoints (received {count})")]
    TooFewWaypoints {
        /// Number of waypoints that were supplied.
        count: usize,
    },
    /// Two consecutive waypoints share the same position.
    #[error("waypoint {index} repeats the previous waypoint")]
    RepeatedWaypoint {
        /// Index of the waypoint duplicating its predecessor.
        index: usize,
    },
}
