use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{sort_by_probability_desc, Combination, DrawRepository};

const TOP_SEQUENCES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvenOddDistribution {
    pub even: u32,
    pub odd: u32,
    pub total_games: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumDistribution {
    pub min: u32,
    pub max: u32,
    pub average: f64,
}

/// Séquences contiguës les plus fréquentes, par longueur (2 à 6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceFrequencies {
    pub doubles: Vec<Combination>,
    pub triples: Vec<Combination>,
    pub quadruples: Vec<Combination>,
    pub quintuples: Vec<Combination>,
    pub sextuples: Vec<Combination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub even_odd: EvenOddDistribution,
    pub sequences: SequenceFrequencies,
    pub sums: SumDistribution,
}

pub fn compute_game_statistics(repo: &DrawRepository) -> GameStatistics {
    let mut even = 0u32;
    let mut odd = 0u32;
    for draw in repo.iter() {
        let evens = draw.numbers.iter().filter(|&&n| n % 2 == 0).count() as u32;
        even += evens;
        odd += draw.numbers.len() as u32 - evens;
    }

    let sums: Vec<u32> = repo.iter().map(|d| d.sum()).collect();
    let sum_distribution = if sums.is_empty() {
        SumDistribution { min: 0, max: 0, average: 0.0 }
    } else {
        SumDistribution {
            min: sums.iter().copied().min().unwrap_or(0),
            max: sums.iter().copied().max().unwrap_or(0),
            average: sums.iter().map(|&s| s as f64).sum::<f64>() / sums.len() as f64,
        }
    };

    GameStatistics {
        even_odd: EvenOddDistribution { even, odd, total_games: repo.len() },
        sequences: SequenceFrequencies {
            doubles: frequent_sequences(repo, 2),
            triples: frequent_sequences(repo, 3),
            quadruples: frequent_sequences(repo, 4),
            quintuples: frequent_sequences(repo, 5),
            sextuples: frequent_sequences(repo, 6),
        },
        sums: sum_distribution,
    }
}

/// Fenêtres contiguës de `size` numéros dans l'ordre de chaque tirage, triées puis comptées.
pub fn frequent_sequences(repo: &DrawRepository, size: usize) -> Vec<Combination> {
    if size == 0 || repo.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
    for draw in repo.iter() {
        for window in draw.numbers.windows(size) {
            let mut key = window.to_vec();
            key.sort();
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let total = repo.len() as f64;
    let mut sequences: Vec<Combination> = counts
        .into_iter()
        .map(|(numbers, frequency)| Combination::new(numbers, frequency, frequency as f64 / total))
        .collect();
    // ordre stable entre exécutions malgré le HashMap
    sequences.sort_by(|a, b| a.numbers.cmp(&b.numbers));
    sort_by_probability_desc(&mut sequences);
    sequences.truncate(TOP_SEQUENCES);
    sequences
}
