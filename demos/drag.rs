//! Cluster a small dataset, lay it out, and drag a node into another cluster.

use corral::{DragOutcome, Node, NodeRef, Point, Region, Session, SessionConfig};

fn main() -> corral::Result<()> {
    // Two tight groups and one point in between, nearer the first group.
    let embeddings = [
        [-0.5, 0.0],
        [0.5, 0.0],
        [3.5, 4.0],
        [4.5, 4.0],
        [0.5, 2.5],
    ];
    let nodes = embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| Node::new(i as u64, e.to_vec()))
        .collect();

    let config = SessionConfig::from_json_str(r#"{ "k": 2, "seed": 5, "kmeans": { "restarts": 16 } }"#)?;
    let mut session = Session::new(nodes, config)?;

    // Positions as a force layout might report them.
    let positions = [(0.0, 0.0), (20.0, 0.0), (400.0, 400.0), (420.0, 400.0), (10.0, 10.0)];
    for (id, &p) in positions.iter().enumerate() {
        session.update_position(NodeRef::Ordinary(id as u64), Point::from(p))?;
    }

    println!("=== Initial clustering (k={}) ===", session.k());
    for node in session.nodes() {
        println!("  node {} {:?} => cluster {}", node.id, node.embedding, node.cluster);
    }
    print_regions(&mut session);

    println!("\n=== Drag node 4 to (410, 410) ===");
    match session.on_node_drag_end(4, Point::new(410.0, 410.0))? {
        DragOutcome::Unchanged => println!("  no reassignment"),
        DragOutcome::Reassigned(r) => {
            println!(
                "  cluster {} -> {} after {} rounds (landed: {})",
                r.from, r.to, r.iterations, r.landed
            );
            println!("  weights: {:?}", r.weights);
            for (id, cluster) in &r.assignment {
                println!("  node {id} => cluster {cluster}");
            }
        }
    }
    print_regions(&mut session);

    Ok(())
}

fn print_regions(session: &mut Session) {
    for (cluster, region) in session.on_render_frame() {
        match region {
            Region::Polygon(vertices) => println!("  cluster {cluster}: hull with {} vertices", vertices.len()),
            Region::Arc { center, radius } => {
                println!("  cluster {cluster}: circle r={radius} at ({:.1}, {:.1})", center.x, center.y)
            }
        }
    }
}
