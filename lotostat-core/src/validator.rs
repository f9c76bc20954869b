use serde::{Deserialize, Serialize};

use crate::analysis::pattern::{decade_of, DECADE_BUCKETS};

const SIMILARITY_LIMIT: f64 = 0.8;
const SIMILARITY_PENALTY: f64 = 0.8;
const SPATIAL_MIN: f64 = 0.6;
const PATTERN_MIN: f64 = 0.7;
const ACCEPTANCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    HistoricalSimilarity,
    SpatialDistribution,
    StatisticalPattern,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::HistoricalSimilarity => {
                write!(f, "Combinaison trop proche de tirages passés")
            }
            RejectionReason::SpatialDistribution => {
                write!(f, "Répartition spatiale des numéros déséquilibrée")
            }
            RejectionReason::StatisticalPattern => write!(f, "Dispersion statistique inhabituelle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub score: f64,
    pub reasons: Vec<RejectionReason>,
}

/// Filtre heuristique : signale les grilles statistiquement inhabituelles,
/// sans rien garantir sur leur équité.
pub fn validate_combination(numbers: &[u8], history: &[Vec<u8>]) -> ValidationResult {
    let mut reasons = Vec::new();
    let mut score = 1.0;

    if historical_similarity(numbers, history) > SIMILARITY_LIMIT {
        reasons.push(RejectionReason::HistoricalSimilarity);
        score *= SIMILARITY_PENALTY;
    }

    let spatial = spatial_distribution(numbers);
    if spatial < SPATIAL_MIN {
        reasons.push(RejectionReason::SpatialDistribution);
        score *= spatial;
    }

    let pattern = statistical_pattern(numbers);
    if pattern < PATTERN_MIN {
        reasons.push(RejectionReason::StatisticalPattern);
        score *= pattern;
    }

    ValidationResult { is_valid: score >= ACCEPTANCE, score, reasons }
}

/// Part maximale de numéros partagés avec un tirage historique (0 sans historique).
pub fn historical_similarity(numbers: &[u8], history: &[Vec<u8>]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    history
        .iter()
        .map(|game| {
            let common = game.iter().filter(|n| numbers.contains(n)).count();
            common as f64 / numbers.len() as f64
        })
        .fold(0.0, f64::max)
}

/// 1 - (pire écart d'une décennie à la répartition uniforme) / taille.
pub fn spatial_distribution(numbers: &[u8]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    let mut buckets = [0usize; DECADE_BUCKETS];
    for &n in numbers {
        buckets[decade_of(n)] += 1;
    }
    let ideal = numbers.len() as f64 / DECADE_BUCKETS as f64;
    let max_deviation = buckets
        .iter()
        .map(|&count| (count as f64 - ideal).abs())
        .fold(0.0, f64::max);
    1.0 - max_deviation / numbers.len() as f64
}

/// 1 - écart absolu moyen à la moyenne / moyenne.
pub fn statistical_pattern(numbers: &[u8]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    let len = numbers.len() as f64;
    let mean = numbers.iter().map(|&n| n as f64).sum::<f64>() / len;
    if mean == 0.0 {
        return 0.0;
    }
    let avg_deviation = numbers.iter().map(|&n| (n as f64 - mean).abs()).sum::<f64>() / len;
    1.0 - avg_deviation / mean
}
