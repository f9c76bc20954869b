use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::DrawRepository;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringParams {
    pub epsilon: f64,
    pub min_points: usize,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self { epsilon: 5.0, min_points: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub centroid: Vec<f64>,
    pub members: Vec<Vec<u8>>,
    /// Part des tirages appartenant au groupe.
    pub strength: f64,
}

/// Distance euclidienne position par position, dans l'ordre du tirage.
pub fn distance(a: &[u8], b: &[u8]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

pub fn centroid(points: &[&[u8]]) -> Vec<f64> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut sums = vec![0.0; first.len()];
    for point in points {
        for (acc, &v) in sums.iter_mut().zip(point.iter()) {
            *acc += v as f64;
        }
    }
    sums.iter().map(|s| s / points.len() as f64).collect()
}

/// Variante simplifiée de DBSCAN : chaque tirage distinct avec au moins
/// `min_points` voisins à distance <= epsilon (lui compris) forme un groupe.
/// Les groupes peuvent se recouvrir.
pub fn cluster_draws(repo: &DrawRepository, params: &ClusteringParams) -> Vec<Cluster> {
    let points: Vec<&[u8]> = repo.iter().map(|d| d.numbers.as_slice()).collect();
    let mut visited: HashSet<&[u8]> = HashSet::new();
    let mut clusters = Vec::new();

    for &point in &points {
        if !visited.insert(point) {
            continue;
        }
        let neighbors: Vec<&[u8]> = points
            .iter()
            .copied()
            .filter(|p| distance(point, p) <= params.epsilon)
            .collect();
        if neighbors.len() >= params.min_points {
            clusters.push(Cluster {
                centroid: centroid(&neighbors),
                strength: neighbors.len() as f64 / points.len() as f64,
                members: neighbors.iter().map(|p| p.to_vec()).collect(),
            });
        }
    }

    log::debug!("{} groupes trouvés sur {} tirages", clusters.len(), points.len());
    clusters
}
