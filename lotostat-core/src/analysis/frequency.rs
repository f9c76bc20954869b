use serde::{Deserialize, Serialize};

use crate::models::DrawRepository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub frequency: u32,
    /// frequency / nombre de tirages.
    pub probability: f64,
    pub is_even: bool,
    /// Somme moyenne des tirages contenant ce numéro.
    pub average_sum: f64,
}

/// Une entrée par numéro de la plage, numéros absents compris.
pub fn compute_frequencies(repo: &DrawRepository) -> Vec<NumberFrequency> {
    let board = repo.board();
    let mut counts = vec![0u32; board.size()];
    let mut sums = vec![0u64; board.size()];

    for draw in repo.iter() {
        let draw_sum = draw.sum() as u64;
        for &n in &draw.numbers {
            if let Some(idx) = board.index_of(n) {
                counts[idx] += 1;
                sums[idx] += draw_sum;
            }
        }
    }

    let total_draws = repo.len();
    board
        .numbers()
        .zip(counts.iter().zip(sums.iter()))
        .map(|(number, (&count, &sum))| NumberFrequency {
            number,
            frequency: count,
            probability: if total_draws > 0 { count as f64 / total_draws as f64 } else { 0.0 },
            is_even: number % 2 == 0,
            average_sum: if count > 0 { sum as f64 / count as f64 } else { 0.0 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{make_test_repository, repository_from, Board};

    #[test]
    fn test_frequency_end_to_end() {
        let repo = repository_from(&[&[1, 2, 3, 4, 5, 6], &[2, 3, 4, 5, 6, 7]]);
        let freqs = compute_frequencies(&repo);
        assert_eq!(freqs.len(), 60);
        assert_eq!(freqs[1].number, 2);
        assert!((freqs[1].probability - 1.0).abs() < 1e-12);
        assert!((freqs[6].probability - 0.5).abs() < 1e-12);
        // 2 apparaît dans les deux tirages : (21 + 27) / 2
        assert!((freqs[1].average_sum - 24.0).abs() < 1e-12);
        assert!(freqs[1].is_even);
    }

    #[test]
    fn test_frequency_absent_number_is_zero() {
        let repo = repository_from(&[&[1, 2, 3, 4, 5, 6]]);
        let freqs = compute_frequencies(&repo);
        let f60 = &freqs[59];
        assert_eq!(f60.frequency, 0);
        assert_eq!(f60.probability, 0.0);
        assert_eq!(f60.average_sum, 0.0);
    }

    #[test]
    fn test_frequency_empty_repository() {
        let repo = DrawRepository::empty(Board::default());
        let freqs = compute_frequencies(&repo);
        assert_eq!(freqs.len(), 60);
        assert!(freqs.iter().all(|f| f.probability == 0.0 && !f.average_sum.is_nan()));
    }

    #[test]
    fn test_frequency_counts_sum_to_picks() {
        let repo = make_test_repository(30);
        let freqs = compute_frequencies(&repo);
        let total: u32 = freqs.iter().map(|f| f.frequency).sum();
        assert_eq!(total, 30 * 6);
    }
}
