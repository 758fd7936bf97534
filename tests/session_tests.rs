use corral::config::KmeansConfig;
use corral::distance::weighted_squared_euclidean;
use corral::geometry::{compute_hulls, point_in_region, Point, Region};
use corral::{select_k_by_elbow, AttributeWeights, StrategyKind};
use corral::{DragOutcome, Error, Link, LinkKind, Node, NodeRef, Session, SessionConfig};

fn config(k: Option<usize>, seed: u64, restarts: usize) -> SessionConfig {
    SessionConfig {
        k,
        seed: Some(seed),
        kmeans: KmeansConfig {
            restarts,
            ..KmeansConfig::default()
        },
        ..SessionConfig::default()
    }
}

fn nodes(embeddings: &[[f32; 2]]) -> Vec<Node> {
    embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| Node::new(i as u64, e.to_vec()))
        .collect()
}

fn line(values: &[f32]) -> Vec<Node> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Node::new(i as u64, vec![v]))
        .collect()
}

fn place(session: &mut Session, positions: &[(f64, f64)]) {
    for (id, &p) in positions.iter().enumerate() {
        session
            .update_position(NodeRef::Ordinary(id as u64), Point::from(p))
            .unwrap();
    }
}

fn cluster(session: &Session, id: u64) -> usize {
    session.node(id).unwrap().cluster
}

const SIX: [[f32; 2]; 6] = [[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0], [5.0, 5.0], [5.0, 6.0]];

#[test]
fn six_points_split_into_three_pairs() {
    let session = Session::new(nodes(&SIX), config(Some(3), 42, 32)).unwrap();

    assert_eq!(session.k(), 3);
    assert_eq!(cluster(&session, 0), cluster(&session, 1));
    assert_eq!(cluster(&session, 2), cluster(&session, 3));
    assert_eq!(cluster(&session, 4), cluster(&session, 5));
    assert_ne!(cluster(&session, 0), cluster(&session, 2));
    assert_ne!(cluster(&session, 0), cluster(&session, 4));
    assert_ne!(cluster(&session, 2), cluster(&session, 4));
    assert_eq!(session.centroids().len(), 3);
}

#[test]
fn point_in_square_hull() {
    let square = Region::Polygon(vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 10.0),
        Point::new(10.0, 10.0),
        Point::new(10.0, 0.0),
    ]);
    assert!(point_in_region(Some(Point::new(5.0, 5.0)), &square));
    assert!(!point_in_region(Some(Point::new(50.0, 50.0)), &square));
    assert!(!point_in_region(None, &square));
}

#[test]
fn single_member_cluster_gets_an_arc() {
    let regions = compute_hulls(
        vec![
            (0, Some(Point::new(1.0, 2.0))),
            (1, Some(Point::new(0.0, 0.0))),
            (1, Some(Point::new(10.0, 0.0))),
            (1, Some(Point::new(5.0, 8.0))),
        ],
        50.0,
    );
    assert_eq!(
        regions[&0],
        Region::Arc {
            center: Point::new(1.0, 2.0),
            radius: 50.0
        }
    );
    assert!(!regions[&1].is_arc());
}

#[test]
fn dragging_toward_a_far_cluster_reweights_in_its_favor() {
    let mut session = Session::new(nodes(&SIX), config(Some(3), 42, 32)).unwrap();
    place(
        &mut session,
        &[(0.0, 0.0), (20.0, 0.0), (500.0, 500.0), (520.0, 500.0), (250.0, 250.0), (270.0, 250.0)],
    );
    session.on_render_frame();

    let source_center = session.centroids()[cluster(&session, 0)].center.clone();
    let dest = cluster(&session, 2);
    let before = session.weights().to_vec();

    let outcome = session.on_node_drag_end(0, Point::new(510.0, 505.0)).unwrap();
    let DragOutcome::Reassigned(r) = outcome else {
        panic!("expected a reassignment");
    };

    assert_eq!(r.from, cluster(&session, 1));
    assert_eq!(r.to, dest);
    assert!(r.iterations <= 100);
    assert!(r.weights.iter().all(|&w| w > 0.0));

    // The node's destination-to-source distance ratio shrank.
    let ratio = |w: &[f32]| {
        weighted_squared_euclidean(&[0.0, 0.0], &[10.0, 10.0], w)
            / weighted_squared_euclidean(&[0.0, 0.0], &source_center, w)
    };
    assert!(ratio(&r.weights) < ratio(&before));

    // No cluster was lost.
    assert_eq!(session.k(), 3);
    for c in 0..3 {
        assert!(r.assignment.values().any(|&a| a == c));
    }
    assert!(session.drag_state() == corral::reassign::DragState::Idle);
}

#[test]
fn drag_lands_node_in_destination_cluster() {
    let embeddings = [[-0.5, 0.0], [0.5, 0.0], [3.5, 4.0], [4.5, 4.0], [0.5, 2.5]];
    let mut session = Session::new(nodes(&embeddings), config(Some(2), 5, 16)).unwrap();
    assert_eq!(cluster(&session, 4), cluster(&session, 0));
    assert_ne!(cluster(&session, 4), cluster(&session, 2));

    place(&mut session, &[(0.0, 0.0), (20.0, 0.0), (400.0, 400.0), (420.0, 400.0), (10.0, 10.0)]);
    session.on_render_frame();

    let outcome = session.on_node_drag_end(4, Point::new(410.0, 410.0)).unwrap();
    assert!(outcome.changed());
    let DragOutcome::Reassigned(r) = outcome else {
        unreachable!()
    };
    assert!(r.landed);
    assert_eq!(r.assignment[&4], r.assignment[&2]);
    assert_eq!(cluster(&session, 4), r.to);
    assert!(r.weights[0] < r.weights[1]);

    // Membership changed, so the next frame rebuilds: three points now form a hull.
    let regions = session.on_render_frame();
    assert!(matches!(&regions[&r.to], Region::Polygon(v) if v.len() == 3));
}

#[test]
fn drop_inside_own_region_is_unchanged() {
    let mut session = Session::new(nodes(&SIX), config(Some(3), 42, 32)).unwrap();
    place(
        &mut session,
        &[(0.0, 0.0), (20.0, 0.0), (500.0, 500.0), (520.0, 500.0), (250.0, 250.0), (270.0, 250.0)],
    );
    session.on_render_frame();
    let before = session.weights().to_vec();

    let outcome = session.on_node_drag_end(0, Point::new(5.0, 5.0)).unwrap();
    assert_eq!(outcome, DragOutcome::Unchanged);
    assert_eq!(session.weights(), &before[..]);
    assert_eq!(session.node(0).unwrap().position, Some(Point::new(5.0, 5.0)));
    assert_eq!(session.node(0).unwrap().pinned, Some(Point::new(5.0, 5.0)));

    session.set_pinned(0, None).unwrap();
    assert_eq!(session.node(0).unwrap().pinned, None);
}

#[test]
fn drag_that_cannot_move_any_weight_is_unchanged() {
    // With one dimension every nudge rescales back to the same weight.
    let mut session = Session::new(line(&[0.0, 1.0, 10.0, 11.0, 20.0, 21.0]), config(Some(3), 42, 32)).unwrap();
    assert_eq!(cluster(&session, 0), cluster(&session, 1));
    assert_eq!(cluster(&session, 4), cluster(&session, 5));
    assert_ne!(cluster(&session, 0), cluster(&session, 4));

    place(
        &mut session,
        &[(0.0, 0.0), (20.0, 0.0), (500.0, 0.0), (520.0, 0.0), (1000.0, 0.0), (1020.0, 0.0)],
    );
    session.on_render_frame();
    let before = session.model().assignment();

    let outcome = session.on_node_drag_end(0, Point::new(1010.0, 5.0)).unwrap();
    assert_eq!(outcome, DragOutcome::Unchanged);
    assert!(!outcome.changed());
    assert_eq!(session.weights(), &[1.0]);
    assert_eq!(session.model().assignment(), before);
    assert!(session.drag_state() == corral::reassign::DragState::Idle);
}

#[test]
fn kmedoids_drag_lands_node_in_destination_cluster() {
    let embeddings = [[-0.5, 0.0], [0.5, 0.0], [3.5, 4.0], [4.5, 4.0], [0.5, 2.5]];
    let config = SessionConfig {
        strategy: StrategyKind::Kmedoids,
        ..config(Some(2), 5, 16)
    };
    let mut session = Session::new(nodes(&embeddings), config).unwrap();
    assert_eq!(cluster(&session, 4), cluster(&session, 0));
    assert_ne!(cluster(&session, 4), cluster(&session, 2));
    assert!(session.centroids().iter().all(|c| c.medoid.is_some()));

    place(&mut session, &[(0.0, 0.0), (20.0, 0.0), (400.0, 400.0), (420.0, 400.0), (10.0, 10.0)]);
    session.on_render_frame();

    let outcome = session.on_node_drag_end(4, Point::new(410.0, 410.0)).unwrap();
    let DragOutcome::Reassigned(r) = outcome else {
        panic!("expected a reassignment");
    };
    // Labels may swap when cluster sizes change; membership is what counts.
    assert!(r.landed);
    assert_eq!(session.k(), 2);
    assert_eq!(r.assignment[&4], r.assignment[&2]);
    assert_eq!(r.assignment[&2], r.assignment[&3]);
    assert_ne!(r.assignment[&0], r.assignment[&2]);
    assert_eq!(cluster(&session, 4), r.to);
}

#[test]
fn unknown_nodes_are_errors() {
    let mut session = Session::new(nodes(&SIX), config(Some(3), 42, 32)).unwrap();
    assert!(matches!(
        session.on_node_drag_end(77, Point::new(0.0, 0.0)),
        Err(Error::UnknownNode(77))
    ));
    assert!(matches!(
        session.update_position(NodeRef::Centroid(9), Point::new(0.0, 0.0)),
        Err(Error::UnknownCluster(9))
    ));
}

#[test]
fn elbow_picks_k_when_none_is_given() {
    let mut embeddings = Vec::new();
    for site in [[0.0, 0.0], [20.0, 0.0], [0.0, 20.0]] {
        embeddings.extend(std::iter::repeat(site).take(4));
    }
    let mut config = config(None, 11, 40);
    config.elbow.max_k = 5;
    let session = Session::new(nodes(&embeddings), config).unwrap();
    assert_eq!(session.k(), 3);
}

#[test]
fn elbow_partition_becomes_the_session_partition() {
    let embeddings: Vec<[f32; 2]> = (0..12).map(|i| [i as f32, ((i * i) % 7) as f32]).collect();
    let config = config(None, 3, 4);
    let session = Session::new(nodes(&embeddings), config.clone()).unwrap();

    let data: Vec<Vec<f32>> = embeddings.iter().map(|e| e.to_vec()).collect();
    let weights = AttributeWeights::uniform(2, config.reassign.min_weight);
    let choice = select_k_by_elbow(&data, weights.as_slice(), &config.elbow, |k| config.kmeans(k)).unwrap();

    assert_eq!(session.k(), choice.k);
    assert_eq!(session.model().partition(), &choice.partition);
}

#[test]
fn set_k_reclusters_and_rejects_bad_counts() {
    let mut session = Session::new(nodes(&SIX), config(Some(3), 42, 32)).unwrap();
    session.set_k(2).unwrap();
    assert_eq!(session.k(), 2);
    assert_eq!(session.centroids().len(), 2);

    assert!(matches!(session.set_k(6), Err(Error::InvalidClusterCount { requested: 6, .. })));
    assert_eq!(session.k(), 2);
}

#[test]
fn records_load_from_json() {
    let json = r#"{ "nodes": [
        {"id": 1, "embedding": [0.0, 0.0], "author": "a", "publishedAt": "2020-01-01", "text": "one"},
        {"id": 2, "embedding": [0.0, 1.0], "author": "b", "publishedAt": "2020-01-02", "text": "two"},
        {"id": 3, "embedding": [9.0, 9.0], "author": "c", "publishedAt": "2020-01-03", "text": "three"},
        {"id": 4, "embedding": [9.0, 8.0], "author": "d", "publishedAt": "2020-01-04", "text": "four"}
    ] }"#;
    let session = Session::from_json_str(json, config(Some(2), 1, 8)).unwrap();
    assert_eq!(session.nodes().len(), 4);
    assert_eq!(session.node(3).unwrap().meta.text, "three");
    assert_eq!(session.node(1).unwrap().cluster, session.node(2).unwrap().cluster);
    assert_eq!(session.distance_matrix().len(), 4);

    let dup = r#"[
        {"id": 1, "embedding": [0.0]},
        {"id": 1, "embedding": [1.0]}
    ]"#;
    assert!(matches!(
        Session::from_json_str(dup, SessionConfig::default()),
        Err(Error::DuplicateNode(1))
    ));
}

fn pairwise(session: &Session, a: u64, b: u64) -> &Link {
    session
        .links()
        .iter()
        .find(|l| {
            l.kind == LinkKind::Pairwise && l.source == NodeRef::Ordinary(a) && l.target == NodeRef::Ordinary(b)
        })
        .unwrap()
}

#[test]
fn link_lengths_follow_cluster_membership() {
    let session = Session::new(nodes(&SIX), config(Some(3), 42, 32)).unwrap();
    assert_eq!(session.link_distance(pairwise(&session, 0, 1)), 80.0);
    assert_eq!(session.link_distance(pairwise(&session, 0, 2)), 500.0);
    // [0, 0] to [10, 11] is the farthest pair.
    assert_eq!(pairwise(&session, 0, 3).distance, 1.0);
}
