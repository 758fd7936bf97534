//! Partitioning embeddings into hard clusters.
//!
//! Every node belongs to exactly one cluster. Both strategies cluster under the same
//! attribute-weighted metric (see [`crate::distance`]), so adapting the weights moves
//! cluster boundaries no matter which strategy a session runs.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, move each centroid to the mean of its
//! points, repeat.
//!
//! **Objective**: minimize the within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} d_w(x, μ_k)²
//! ```
//!
//! Seeding with the previous run's centroids keeps cluster indices stable across
//! reclustering, which is what keeps hulls and colors from shuffling on screen.
//!
//! ### K-medoids
//!
//! Each cluster center is an actual input point. Works from the pairwise distance
//! matrix alone and labels clusters by ascending size, so label order is reproducible.
//!
//! ### Choosing k
//!
//! [`select_k_by_elbow`] fits k-means across a range of `k` and stops where the SSE
//! curve flattens.
//!
//! ## Usage
//!
//! ```rust
//! use corral::cluster::{Kmeans, Partitioner};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//! let weights = vec![1.0, 1.0];
//!
//! let fit = Kmeans::new(2)
//!     .with_seed(42)
//!     .with_restarts(8)
//!     .partition(&data, &weights, None)
//!     .unwrap();
//! assert_eq!(fit.assignments[0], fit.assignments[1]);
//! assert_ne!(fit.assignments[0], fit.assignments[2]);
//!
//! // Reclustering from the previous centers keeps labels put.
//! let again = Kmeans::new(2)
//!     .partition(&data, &weights, Some(&fit.centers[..]))
//!     .unwrap();
//! assert_eq!(again.assignments, fit.assignments);
//! ```

mod elbow;
mod kmeans;
mod kmedoids;
mod strategy;
mod traits;
pub(crate) mod util;

pub use elbow::{select_k_by_elbow, ElbowChoice, ElbowConfig};
pub use kmeans::Kmeans;
pub use kmedoids::{KMedoids, MedoidFit};
pub use strategy::{Strategy, StrategyKind};
pub use traits::{Partition, Partitioner};
