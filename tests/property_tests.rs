use corral::cluster::{Kmeans, Partitioner};
use corral::geometry::{Point, Region};
use corral::{compute_distance_matrix, AttributeWeights};
use proptest::prelude::*;

fn embeddings(max_n: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1usize..5).prop_flat_map(move |d| prop::collection::vec(prop::collection::vec(-10.0f32..10.0, d), 1..max_n))
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

proptest! {
    #[test]
    fn prop_distance_matrix_is_normalized(
        data in embeddings(16),
        scale in 0.01f32..5.0,
    ) {
        let d = data[0].len();
        let weights = vec![scale; d];
        let m = compute_distance_matrix(&data, &weights).unwrap();

        prop_assert_eq!(m.len(), data.len());
        for i in 0..m.len() {
            prop_assert_eq!(m.get(i, i), 0.0);
            for j in 0..m.len() {
                prop_assert_eq!(m.get(i, j), m.get(j, i));
                prop_assert!((0.0..=1.0).contains(&m.get(i, j)) || m.raw_range().span().is_none());
            }
        }
    }

    #[test]
    fn prop_hull_contains_its_points(
        raw in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 3..30),
    ) {
        let points: Vec<Point> = raw.into_iter().map(Point::from).collect();
        let region = Region::from_points(&points, 50.0).unwrap();
        let Region::Polygon(hull) = &region else {
            // Collinear input; covered by unit tests.
            return Ok(());
        };

        for &p in &points {
            let on_boundary = (0..hull.len())
                .any(|i| distance_to_segment(p, hull[i], hull[(i + 1) % hull.len()]) < 1e-6);
            prop_assert!(on_boundary || region.contains(p), "{:?} outside {:?}", p, hull);
        }
    }

    #[test]
    fn prop_kmeans_reseed_is_idempotent(
        data in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 4..20),
        k in 2usize..4,
        seed in any::<u64>(),
    ) {
        let weights = [1.0, 1.0];
        let first = Kmeans::new(k).with_seed(seed).partition(&data, &weights, None).unwrap();
        prop_assume!(first.converged);

        let second = Kmeans::new(k).partition(&data, &weights, Some(&first.centers[..])).unwrap();
        prop_assert_eq!(first.assignments, second.assignments);
    }

    #[test]
    fn prop_weights_stay_positive(
        steps in prop::collection::vec(
            (
                prop::collection::vec(-10.0f32..10.0, 3),
                prop::collection::vec(-10.0f32..10.0, 3),
                prop::collection::vec(-10.0f32..10.0, 3),
                0.0f32..3.0,
            ),
            1..50,
        ),
    ) {
        let mut weights = AttributeWeights::uniform(3, 1e-3);
        for (point, source, dest, rate) in steps {
            weights.nudge(&point, &source, &dest, rate);
            for &w in weights.as_slice() {
                prop_assert!(w.is_finite() && w >= 1e-3);
            }
        }
    }
}
