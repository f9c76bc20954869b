use serde::{Deserialize, Serialize};

use crate::analysis::correlation::CorrelationProfile;
use crate::analysis::frequency::NumberFrequency;
use crate::analysis::pattern::PatternProfile;
use crate::analysis::temporal::TemporalProfile;
use crate::config::ScoreWeights;
use crate::models::{Board, ScoreLevel};

/// Nombre d'écarts récents pris en compte par le score de tendance.
const TREND_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub frequency: f64,
    pub dormancy: f64,
    pub correlation: f64,
    pub pattern: f64,
    pub trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberScore {
    pub number: u8,
    pub total: f64,
    pub level: ScoreLevel,
    pub components: ScoreComponents,
}

#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    pub weights: ScoreWeights,
    pub trend_smoothing: f64,
    board: Board,
}

impl Scorer {
    pub fn new(board: Board, weights: ScoreWeights, trend_smoothing: f64) -> Self {
        Self { weights, trend_smoothing, board }
    }

    pub fn with_defaults(board: Board) -> Self {
        Self::new(board, ScoreWeights::default(), 10.0)
    }

    pub fn score(
        &self,
        frequency: &NumberFrequency,
        pattern: &PatternProfile,
        correlation: &CorrelationProfile,
        temporal: &TemporalProfile,
    ) -> NumberScore {
        let components = ScoreComponents {
            frequency: frequency.probability,
            dormancy: dormancy_score(temporal),
            correlation: self.correlation_score(correlation),
            pattern: pattern_score(pattern),
            trend: self.trend_score(temporal),
        };

        // Somme pondérée non bornée : les poids somment à 1, le total reste dans
        // [0, 1] tant que chaque composante y reste.
        let w = &self.weights;
        let total = components.frequency * w.frequency
            + components.dormancy * w.dormancy
            + components.correlation * w.correlation
            + components.pattern * w.pattern
            + components.trend * w.trend;

        NumberScore {
            number: frequency.number,
            total,
            level: ScoreLevel::from_score(total),
            components,
        }
    }

    fn correlation_score(&self, correlation: &CorrelationProfile) -> f64 {
        let denominator = (self.board.size() * self.board.pick_count()) as f64;
        if denominator == 0.0 {
            return 0.0;
        }
        correlation.total_co_occurrences() as f64 / denominator
    }

    fn trend_score(&self, temporal: &TemporalProfile) -> f64 {
        match temporal.recent_mean_gap(TREND_WINDOW) {
            Some(mean) => (-mean / self.trend_smoothing).exp(),
            None => 0.0,
        }
    }
}

/// exp(-dernier écart / écart moyen).
///
/// Un écart récent COURT donne un score ÉLEVÉ : ce score mesure la récurrence
/// récente, pas la « dormance » au sens littéral. Comportement conservé tel quel.
pub fn dormancy_score(temporal: &TemporalProfile) -> f64 {
    match temporal.last_gap() {
        Some(last) if temporal.average_gap > 0.0 => (-(last as f64) / temporal.average_gap).exp(),
        _ => 0.0,
    }
}

/// Équilibre pair/impair : min / max, 0 si aucune apparition.
pub fn pattern_score(pattern: &PatternProfile) -> f64 {
    let even = pattern.parity.even as f64;
    let odd = pattern.parity.odd as f64;
    let max = even.max(odd);
    if max == 0.0 {
        0.0
    } else {
        even.min(odd) / max
    }
}
