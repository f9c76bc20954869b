use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelFlag;
use crate::error::CoreError;
use crate::models::Board;

/// Gain associé à chaque nombre de numéros trouvés.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTable {
    prizes: BTreeMap<usize, f64>,
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::new([(6, 1_000_000.0), (5, 50_000.0), (4, 1_000.0)])
    }
}

impl PrizeTable {
    pub fn new(entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        Self { prizes: entries.into_iter().collect() }
    }

    pub fn prize_for(&self, matches: usize) -> f64 {
        self.prizes.get(&matches).copied().unwrap_or(0.0)
    }

    /// Plus petit nombre de numéros trouvés donnant un gain non nul.
    pub fn min_winning_matches(&self) -> Option<usize> {
        self.prizes
            .iter()
            .filter(|(_, &prize)| prize > 0.0)
            .map(|(&matches, _)| matches)
            .min()
    }
}

pub fn count_matches(numbers: &[u8], draw: &[u8]) -> usize {
    numbers.iter().filter(|n| draw.contains(n)).count()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub iterations: usize,
    /// Indice = nombre de numéros trouvés (0..=taille de la grille).
    pub match_distribution: Vec<usize>,
    pub wins: usize,
    pub win_probability: f64,
    pub total_prize: f64,
    pub expected_prize: f64,
}

/// Monte-Carlo : `iterations` tirages uniformes sur la plage, comparés à la grille.
pub fn run_simulation<R: Rng + ?Sized>(
    numbers: &[u8],
    board: &Board,
    prizes: &PrizeTable,
    iterations: usize,
    rng: &mut R,
    cancel: &CancelFlag,
) -> Result<SimulationResult, CoreError> {
    let mut distribution = vec![0usize; numbers.len() + 1];
    let mut wins = 0usize;
    let mut total_prize = 0.0;
    let pick = board.pick_count().min(board.size());
    let threshold = prizes.min_winning_matches();

    for i in 0..iterations {
        if cancel.is_cancelled() {
            log::info!("Simulation annulée après {} tirages", i);
            return Err(CoreError::Cancelled);
        }
        let draw: Vec<u8> = rand::seq::index::sample(rng, board.size(), pick)
            .into_iter()
            .map(|idx| board.number_at(idx))
            .collect();
        let matches = count_matches(numbers, &draw);
        distribution[matches] += 1;
        if threshold.is_some_and(|t| matches >= t) {
            wins += 1;
        }
        total_prize += prizes.prize_for(matches);
    }

    let (win_probability, expected_prize) = if iterations > 0 {
        (wins as f64 / iterations as f64, total_prize / iterations as f64)
    } else {
        (0.0, 0.0)
    };

    log::debug!("Simulation : {} tirages, {} gagnants", iterations, wins);

    Ok(SimulationResult {
        iterations,
        match_distribution: distribution,
        wins,
        win_probability,
        total_prize,
        expected_prize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_prize_table() {
        let table = PrizeTable::default();
        assert_eq!(table.prize_for(6), 1_000_000.0);
        assert_eq!(table.prize_for(5), 50_000.0);
        assert_eq!(table.prize_for(4), 1_000.0);
        assert_eq!(table.prize_for(3), 0.0);
        assert_eq!(table.min_winning_matches(), Some(4));
        assert_eq!(PrizeTable::new([]).min_winning_matches(), None);
    }

    #[test]
    fn test_count_matches() {
        assert_eq!(count_matches(&[1, 2, 3, 4, 5, 6], &[4, 5, 6, 7, 8, 9]), 3);
        assert_eq!(count_matches(&[1, 2], &[3, 4]), 0);
    }

    #[test]
    fn test_simulation_distribution_sums_to_iterations() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = run_simulation(
            &[5, 14, 23, 38, 41, 57],
            &Board::default(),
            &PrizeTable::default(),
            2_000,
            &mut rng,
            &CancelFlag::new(),
        )
        .unwrap();
        assert_eq!(result.match_distribution.len(), 7);
        assert_eq!(result.match_distribution.iter().sum::<usize>(), 2_000);
        let expected_wins: usize = result.match_distribution[4..].iter().sum();
        assert_eq!(result.wins, expected_wins);
        assert!((result.expected_prize - result.total_prize / 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_board_always_wins() {
        // plage de 6 numéros : chaque tirage est la grille elle-même
        let board = Board::new(1, 6, 6);
        let mut rng = StdRng::seed_from_u64(7);
        let result = run_simulation(
            &[1, 2, 3, 4, 5, 6],
            &board,
            &PrizeTable::default(),
            50,
            &mut rng,
            &CancelFlag::new(),
        )
        .unwrap();
        assert_eq!(result.match_distribution[6], 50);
        assert_eq!(result.win_probability, 1.0);
        assert_eq!(result.expected_prize, 1_000_000.0);
    }

    #[test]
    fn test_zero_iterations() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = run_simulation(
            &[1, 2, 3, 4, 5, 6],
            &Board::default(),
            &PrizeTable::default(),
            0,
            &mut rng,
            &CancelFlag::new(),
        )
        .unwrap();
        assert_eq!(result.win_probability, 0.0);
        assert_eq!(result.expected_prize, 0.0);
    }

    #[test]
    fn test_cancelled_simulation() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut rng = StdRng::seed_from_u64(1);
        let err = run_simulation(
            &[1, 2, 3],
            &Board::default(),
            &PrizeTable::default(),
            10,
            &mut rng,
            &cancel,
        )
        .unwrap_err();
        assert_eq!(err, CoreError::Cancelled);
    }
}
