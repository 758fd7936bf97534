use std::cmp::Ordering;

use super::Point;

/// Convex hull by monotone chain.
///
/// Points are sorted by `x` (ties by `y`), duplicates dropped, then an upper and a lower
/// chain are built keeping only strict turns; collinear points are dropped. The chains
/// are joined without repeating their shared endpoints, giving the boundary in order.
///
/// Fewer than three distinct points are returned as-is (sorted). Inputs whose distinct
/// points are all collinear produce the two extreme points.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.iter().copied().filter(Point::is_finite).collect();
    sorted.sort_by(|a, b| match a.x.total_cmp(&b.x) {
        Ordering::Equal => a.y.total_cmp(&b.y),
        other => other,
    });
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        upper.push(p);
        pop_non_turns(&mut upper);
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        lower.push(p);
        pop_non_turns(&mut lower);
    }

    // Both chains share their endpoints.
    lower.pop();
    if !lower.is_empty() {
        lower.remove(0);
    }

    upper.extend(lower);
    upper
}

fn pop_non_turns(chain: &mut Vec<Point>) {
    while chain.len() >= 3 {
        let n = chain.len();
        if turns(chain[n - 3], chain[n - 2], chain[n - 1]) {
            break;
        }
        chain.remove(n - 2);
    }
}

#[inline]
fn turns(a: Point, b: Point, c: Point) -> bool {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x) > 0.0
}
