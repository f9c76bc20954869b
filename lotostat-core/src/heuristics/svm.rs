use serde::{Deserialize, Serialize};

use crate::models::{Board, DrawRepository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawFeatures {
    pub numbers: Vec<u8>,
    pub count: usize,
    pub sum: u32,
    pub even_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvmEstimate {
    pub prediction: i8,
    pub probability: f64,
    pub confidence: f64,
}

/// Estimateur de type SVM, purement heuristique : aucune marge n'est apprise,
/// les caractéristiques extraites ne servent qu'à l'inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmModel {
    pub board: Board,
    pub features: Vec<DrawFeatures>,
}

impl SvmModel {
    pub fn train(repo: &DrawRepository) -> Self {
        let features = repo
            .iter()
            .map(|d| DrawFeatures {
                numbers: d.numbers.clone(),
                count: d.numbers.len(),
                sum: d.sum(),
                even_count: d.numbers.iter().filter(|&&n| n % 2 == 0).count(),
            })
            .collect();
        Self { board: *repo.board(), features }
    }

    /// probabilité = somme / (taille × fin de plage), confiance = pairs / taille.
    pub fn predict(&self, numbers: &[u8]) -> SvmEstimate {
        if numbers.is_empty() || self.board.end == 0 {
            return SvmEstimate { prediction: 1, probability: 0.0, confidence: 0.0 };
        }
        let len = numbers.len() as f64;
        let sum: f64 = numbers.iter().map(|&n| n as f64).sum();
        let even = numbers.iter().filter(|&&n| n % 2 == 0).count() as f64;
        SvmEstimate {
            prediction: 1,
            probability: sum / (len * self.board.end as f64),
            confidence: even / len,
        }
    }
}
