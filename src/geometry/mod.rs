//! Planar geometry over rendered node positions.
//!
//! Cluster regions are convex hulls of member positions, or a fixed-radius circle
//! around the members' mean when there are too few distinct positions for a polygon.
//! Containment tests never fail: missing or non-finite coordinates are simply
//! "not contained".

mod cache;
mod hull;
mod region;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::ClusterId;

pub use cache::HullCache;
pub use hull::convex_hull;
pub use region::{point_in_circle, point_in_polygon, point_in_region, Region};

/// Default radius of the circular region drawn around clusters with at most two members.
pub const DEFAULT_ARC_RADIUS: f64 = 50.0;

/// A point in layout (screen) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of `points`, or `None` when empty.
    pub fn mean(points: &[Point]) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Build one region per cluster from `(cluster, position)` pairs.
///
/// Positions that are missing or non-finite are ignored. A cluster left with no usable
/// position gets no region (it simply is not drawn or hit-tested).
pub fn compute_hulls<I>(members: I, arc_radius: f64) -> BTreeMap<ClusterId, Region>
where
    I: IntoIterator<Item = (ClusterId, Option<Point>)>,
{
    let mut grouped: BTreeMap<ClusterId, Vec<Point>> = BTreeMap::new();
    for (cluster, position) in members {
        let points = grouped.entry(cluster).or_default();
        if let Some(p) = position.filter(Point::is_finite) {
            points.push(p);
        }
    }

    grouped
        .into_iter()
        .filter_map(|(cluster, points)| match Region::from_points(&points, arc_radius) {
            Some(region) => Some((cluster, region)),
            None => {
                debug!(cluster, "no positioned members, skipping region");
                None
            }
        })
        .collect()
}
