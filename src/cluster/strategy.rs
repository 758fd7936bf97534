use serde::{Deserialize, Serialize};

use super::kmeans::Kmeans;
use super::kmedoids::KMedoids;
use super::traits::{Partition, Partitioner};
use crate::error::Result;

/// Which partitioning algorithm a session uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Mean centroids over the weighted metric.
    #[default]
    Kmeans,
    /// Medoids over the normalized distance matrix.
    Kmedoids,
}

/// A configured partitioner, selected once per session.
#[derive(Clone, Debug)]
pub enum Strategy {
    /// K-means.
    Kmeans(Kmeans),
    /// K-medoids.
    KMedoids(KMedoids),
}

impl Strategy {
    /// Which algorithm this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Kmeans(_) => StrategyKind::Kmeans,
            Strategy::KMedoids(_) => StrategyKind::Kmedoids,
        }
    }
}

impl Partitioner for Strategy {
    fn partition(
        &self,
        data: &[Vec<f32>],
        weights: &[f32],
        seeds: Option<&[Vec<f32>]>,
    ) -> Result<Partition> {
        match self {
            Strategy::Kmeans(m) => m.partition(data, weights, seeds),
            Strategy::KMedoids(m) => m.partition(data, weights, seeds),
        }
    }

    fn n_clusters(&self) -> usize {
        match self {
            Strategy::Kmeans(m) => m.n_clusters(),
            Strategy::KMedoids(m) => m.n_clusters(),
        }
    }
}

impl From<Kmeans> for Strategy {
    fn from(m: Kmeans) -> Self {
        Strategy::Kmeans(m)
    }
}

impl From<KMedoids> for Strategy {
    fn from(m: KMedoids) -> Self {
        Strategy::KMedoids(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_strategies_honor_the_contract() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![9.0, 9.0],
            vec![9.1, 9.2],
            vec![9.3, 8.9],
        ];
        let seeds = vec![vec![0.0, 0.0], vec![9.0, 9.0]];
        for strategy in [Strategy::from(Kmeans::new(2)), Strategy::from(KMedoids::new(2))] {
            let fit = strategy
                .partition(&data, &[1.0, 1.0], Some(&seeds[..]))
                .unwrap();
            assert_eq!(strategy.n_clusters(), 2);
            assert_eq!(fit.assignments.len(), data.len());
            assert_eq!(fit.centers.len(), 2);
            assert_eq!(fit.assignments[0], fit.assignments[1]);
            assert_eq!(fit.assignments[2], fit.assignments[4]);
            assert_ne!(fit.assignments[0], fit.assignments[2]);
        }
    }

    #[test]
    fn kind_round_trips_through_serde_names() {
        let kind: StrategyKind = serde_json::from_str("\"kmedoids\"").unwrap();
        assert_eq!(kind, StrategyKind::Kmedoids);
        assert_eq!(Strategy::from(Kmeans::new(3)).kind(), StrategyKind::Kmeans);
    }
}
