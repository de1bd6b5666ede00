use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};

/// A 2-D point together with its current cluster label and the squared
/// distance to the nearest centroid seen so far in this epoch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub cluster: Option<usize>,
    pub min_dist: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            cluster: None,
            min_dist: f64::INFINITY,
        }
    }

    /// Clears the running nearest-centroid distance for the next epoch.
    #[inline]
    pub fn reset_distance(&mut self) {
        self.min_dist = f64::INFINITY;
    }
}

/// Output record for a clustered point. Serialized as `x,y,c`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "c")]
    pub cluster: Option<usize>,
}

impl From<&Point> for LabeledPoint {
    fn from(p: &Point) -> Self {
        LabeledPoint {
            x: p.x,
            y: p.y,
            cluster: p.cluster,
        }
    }
}

/// Ordered, mutable collection of points. A point's identity is its index.
#[derive(Clone, Debug, Default)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    /// Builds a store from raw coordinates, rejecting NaN and infinite values.
    pub fn new(coords: Vec<(f64, f64)>) -> Result<Self> {
        let mut points = Vec::with_capacity(coords.len());
        for (index, (x, y)) in coords.into_iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(ClusterError::InvalidPoint { index, x, y });
            }
            points.push(Point::new(x, y));
        }
        Ok(PointStore { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Current label of every point, in store order.
    pub fn labels(&self) -> Vec<Option<usize>> {
        self.points.iter().map(|p| p.cluster).collect()
    }

    /// Forgets all labels and distances, returning the store to its freshly
    /// loaded state.
    pub fn clear_labels(&mut self) {
        for p in &mut self.points {
            p.cluster = None;
            p.reset_distance();
        }
    }

    pub fn labeled_points(&self) -> Vec<LabeledPoint> {
        self.points.iter().map(LabeledPoint::from).collect()
    }
}
