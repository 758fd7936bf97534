use std::collections::BTreeMap;

use tracing::trace;

use super::{compute_hulls, Point, Region};
use crate::graph::ClusterId;

/// Per-frame cache of cluster regions.
///
/// Regions are rebuilt when invalidated (cluster membership changed) or once every
/// `refresh_frames` frames so hulls follow nodes that the layout is still moving.
/// Every other frame is a lookup.
#[derive(Clone, Debug)]
pub struct HullCache {
    regions: BTreeMap<ClusterId, Region>,
    arc_radius: f64,
    refresh_frames: u32,
    frames_since_refresh: u32,
    stale: bool,
}

impl HullCache {
    /// Empty cache; the first frame computes regions.
    pub fn new(arc_radius: f64, refresh_frames: u32) -> Self {
        Self {
            regions: BTreeMap::new(),
            arc_radius,
            refresh_frames,
            frames_since_refresh: 0,
            stale: true,
        }
    }

    /// Force a rebuild on the next access.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Whether the next access will rebuild.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Cached regions, possibly out of date.
    pub fn regions(&self) -> &BTreeMap<ClusterId, Region> {
        &self.regions
    }

    /// Circle radius used for small clusters.
    pub fn arc_radius(&self) -> f64 {
        self.arc_radius
    }

    /// Advance one render frame.
    ///
    /// `members` is only called when a rebuild is due.
    pub fn frame<F, I>(&mut self, members: F) -> &BTreeMap<ClusterId, Region>
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (ClusterId, Option<Point>)>,
    {
        self.frames_since_refresh = self.frames_since_refresh.saturating_add(1);
        if self.frames_since_refresh >= self.refresh_frames {
            self.stale = true;
        }
        self.refresh_if_stale(members)
    }

    /// Rebuild only if invalidated, without counting a frame.
    pub fn refresh_if_stale<F, I>(&mut self, members: F) -> &BTreeMap<ClusterId, Region>
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (ClusterId, Option<Point>)>,
    {
        if self.stale {
            self.regions = compute_hulls(members(), self.arc_radius);
            self.frames_since_refresh = 0;
            self.stale = false;
            trace!(regions = self.regions.len(), "refreshed cluster regions");
        }
        &self.regions
    }

    /// Lowest cluster id other than `exclude` whose region contains `p`.
    pub fn foreign_region_containing(&self, p: Point, exclude: ClusterId) -> Option<ClusterId> {
        self.regions
            .iter()
            .find(|&(&cluster, region)| cluster != exclude && region.contains(p))
            .map(|(&cluster, _)| cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn members() -> Vec<(ClusterId, Option<Point>)> {
        vec![
            (0, Some(Point::new(0.0, 0.0))),
            (0, Some(Point::new(100.0, 0.0))),
            (0, Some(Point::new(50.0, 100.0))),
            (1, Some(Point::new(500.0, 500.0))),
        ]
    }

    #[test]
    fn rebuilds_only_when_due() {
        let mut cache = HullCache::new(50.0, 3);
        let builds = Cell::new(0);
        let mut tick = |cache: &mut HullCache| {
            cache.frame(|| {
                builds.set(builds.get() + 1);
                members()
            });
        };

        tick(&mut cache); // initial build
        tick(&mut cache);
        tick(&mut cache);
        assert_eq!(builds.get(), 1);
        tick(&mut cache); // third frame since refresh
        assert_eq!(builds.get(), 2);

        cache.invalidate();
        tick(&mut cache);
        assert_eq!(builds.get(), 3);
    }

    #[test]
    fn foreign_region_skips_own_cluster() {
        let mut cache = HullCache::new(50.0, 30);
        cache.refresh_if_stale(members);

        let inside_zero = Point::new(50.0, 30.0);
        assert_eq!(cache.foreign_region_containing(inside_zero, 1), Some(0));
        assert_eq!(cache.foreign_region_containing(inside_zero, 0), None);
        assert_eq!(cache.foreign_region_containing(Point::new(510.0, 490.0), 0), Some(1));
        assert_eq!(cache.foreign_region_containing(Point::new(900.0, 900.0), 0), None);
    }
}
