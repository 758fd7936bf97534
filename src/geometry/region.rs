use serde::{Deserialize, Serialize};

use super::{convex_hull, Point};

/// Hit-test area of one cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Convex hull boundary, at least three vertices, in order.
    Polygon(Vec<Point>),
    /// Circle around the mean of a cluster with too few distinct positions for a polygon.
    Arc {
        /// Circle center.
        center: Point,
        /// Circle radius.
        radius: f64,
    },
}

impl Region {
    /// Region enclosing `points`, or `None` when there are none.
    ///
    /// Two or fewer points, or a hull that collapses to a segment, give an [`Region::Arc`]
    /// centered on the mean of `points`.
    pub fn from_points(points: &[Point], arc_radius: f64) -> Option<Region> {
        let center = Point::mean(points)?;
        if points.len() <= 2 {
            return Some(Region::Arc {
                center,
                radius: arc_radius,
            });
        }

        let hull = convex_hull(points);
        if hull.len() < 3 {
            return Some(Region::Arc {
                center,
                radius: arc_radius,
            });
        }
        Some(Region::Polygon(hull))
    }

    /// Whether `p` lies inside the region. Non-finite points are never inside.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Region::Polygon(vertices) => point_in_polygon(p, vertices),
            Region::Arc { center, radius } => point_in_circle(p, *center, *radius),
        }
    }

    /// Whether this is the circular fallback.
    pub fn is_arc(&self) -> bool {
        matches!(self, Region::Arc { .. })
    }
}

/// Containment test tolerant of missing coordinates.
pub fn point_in_region(point: Option<Point>, region: &Region) -> bool {
    point.is_some_and(|p| region.contains(p))
}

/// Even-odd ray casting.
///
/// Points exactly on an edge may land on either side.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    if !p.is_finite() || vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Strictly-inside test against a circle.
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    if !p.is_finite() || !center.is_finite() {
        return false;
    }
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy < radius * radius
}
