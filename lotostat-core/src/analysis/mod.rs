pub mod correlation;
pub mod frequency;
pub mod pattern;
pub mod temporal;

use serde::{Deserialize, Serialize};

use crate::models::{Board, DrawRepository};
use crate::scoring::{NumberScore, Scorer};
use correlation::{CorrelationProfile, Quadrant};
use frequency::NumberFrequency;
use pattern::PatternProfile;
use temporal::TemporalProfile;

const TOP_CORRELATIONS: usize = 9;

/// Résultat complet d'une analyse, recalculé entièrement à chaque changement du dépôt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardAnalysis {
    pub board: Board,
    pub total_draws: usize,
    pub frequencies: Vec<NumberFrequency>,
    pub temporal: Vec<TemporalProfile>,
    pub correlations: Vec<CorrelationProfile>,
    pub patterns: Vec<PatternProfile>,
    pub scores: Vec<NumberScore>,
}

impl BoardAnalysis {
    pub fn compute(repo: &DrawRepository, scorer: &Scorer) -> Self {
        // Les quatre analyseurs ne lisent que le dépôt : exécution parallèle, puis jointure
        let ((frequencies, temporal), (correlations, patterns)) = rayon::join(
            || {
                rayon::join(
                    || frequency::compute_frequencies(repo),
                    || temporal::compute_temporal(repo),
                )
            },
            || {
                rayon::join(
                    || correlation::compute_correlations(repo),
                    || pattern::compute_patterns(repo),
                )
            },
        );

        let scores: Vec<NumberScore> = frequencies
            .iter()
            .zip(&patterns)
            .zip(&correlations)
            .zip(&temporal)
            .map(|(((f, p), c), t)| scorer.score(f, p, c, t))
            .collect();

        log::debug!(
            "Analyse de {} numéros sur {} tirages",
            scores.len(),
            repo.len()
        );

        Self {
            board: *repo.board(),
            total_draws: repo.len(),
            frequencies,
            temporal,
            correlations,
            patterns,
            scores,
        }
    }

    pub fn score_of(&self, number: u8) -> Option<&NumberScore> {
        self.board.index_of(number).map(|idx| &self.scores[idx])
    }

    pub fn frequency_of(&self, number: u8) -> Option<&NumberFrequency> {
        self.board.index_of(number).map(|idx| &self.frequencies[idx])
    }

    pub fn number_statistics(&self, number: u8) -> Option<NumberStatistics> {
        let idx = self.board.index_of(number)?;
        let frequency = &self.frequencies[idx];
        let temporal = &self.temporal[idx];
        let correlation = &self.correlations[idx];

        let mut correlations: Vec<CorrelationStrength> = correlation
            .co_occurrences
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(partner_idx, &count)| CorrelationStrength {
                number: self.board.number_at(partner_idx),
                strength: if frequency.frequency > 0 {
                    count as f64 / frequency.frequency as f64
                } else {
                    0.0
                },
            })
            .collect();
        correlations.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        correlations.truncate(TOP_CORRELATIONS);

        Some(NumberStatistics {
            number,
            absolute: frequency.frequency,
            relative: frequency.probability,
            current_dormancy: temporal.current_gap(self.total_draws),
            average_dormancy: temporal.average_gap,
            dormancy_history: temporal.gaps.clone(),
            correlations,
            patterns: self.pattern_tags(number, frequency),
        })
    }

    fn pattern_tags(&self, number: u8, frequency: &NumberFrequency) -> Vec<String> {
        let mut tags = Vec::new();
        tags.push(if frequency.is_even { "Pair".to_string() } else { "Impair".to_string() });

        let decade = pattern::decade_of(number);
        tags.push(format!("Décennie {}-{}", decade * 10 + 1, decade * 10 + 10));
        tags.push(format!("Quadrant {}", Quadrant::of(number)));

        if self.total_draws > 0 {
            let uniform = self.board.pick_count() as f64 / self.board.size() as f64;
            let deviation = (frequency.probability - uniform) / uniform;
            if deviation > 0.3 {
                tags.push("Numéro chaud".to_string());
            } else if deviation < -0.3 {
                tags.push("Numéro froid".to_string());
            }
        }
        tags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStrength {
    pub number: u8,
    pub strength: f64,
}

/// Fiche détaillée d'un numéro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberStatistics {
    pub number: u8,
    pub absolute: u32,
    pub relative: f64,
    pub current_dormancy: usize,
    pub average_dormancy: f64,
    pub dormancy_history: Vec<usize>,
    pub correlations: Vec<CorrelationStrength>,
    pub patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{make_test_repository, repository_from};

    fn analyze(repo: &DrawRepository) -> BoardAnalysis {
        BoardAnalysis::compute(repo, &Scorer::with_defaults(*repo.board()))
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let repo = make_test_repository(80);
        let first = analyze(&repo);
        let second = analyze(&repo);
        assert_eq!(first, second);
    }

    #[test]
    fn test_end_to_end_small_history() {
        let repo = repository_from(&[&[1, 2, 3, 4, 5, 6], &[2, 3, 4, 5, 6, 7]]);
        let analysis = analyze(&repo);
        assert!((analysis.frequency_of(2).unwrap().probability - 1.0).abs() < 1e-12);
        assert!((analysis.frequency_of(7).unwrap().probability - 0.5).abs() < 1e-12);
        assert!(analysis.temporal[0].gaps.is_empty());
        assert_eq!(analysis.score_of(61), None);
    }

    #[test]
    fn test_empty_repository_yields_zero_profiles() {
        let repo = DrawRepository::empty(Board::default());
        let analysis = analyze(&repo);
        assert_eq!(analysis.scores.len(), 60);
        for s in &analysis.scores {
            assert_eq!(s.total, 0.0);
            assert!(!s.total.is_nan());
        }
    }

    #[test]
    fn test_number_statistics() {
        let repo = repository_from(&[
            &[1, 2, 3, 4, 5, 6],
            &[1, 2, 13, 14, 15, 16],
            &[20, 21, 22, 23, 24, 25],
        ]);
        let analysis = analyze(&repo);
        let stats = analysis.number_statistics(1).unwrap();
        assert_eq!(stats.absolute, 2);
        assert_eq!(stats.current_dormancy, 1);
        assert_eq!(stats.dormancy_history, vec![1]);
        assert_eq!(stats.correlations[0].number, 2);
        assert!((stats.correlations[0].strength - 1.0).abs() < 1e-12);
        assert!(stats.correlations.len() <= TOP_CORRELATIONS);
        assert!(stats.patterns.contains(&"Impair".to_string()));
        assert!(stats.patterns.contains(&"Quadrant Q1".to_string()));
        assert!(stats.patterns.contains(&"Numéro chaud".to_string()));
    }

    #[test]
    fn test_number_statistics_out_of_range() {
        let repo = make_test_repository(5);
        assert!(analyze(&repo).number_statistics(0).is_none());
    }
}
