use serde::{Deserialize, Serialize};

use crate::models::{Board, DrawRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    /// Grille de 10 colonnes : lignes 1-3 en haut, colonnes 1-5 à gauche.
    pub fn of(number: u8) -> Self {
        let row = (number as u32).div_ceil(10);
        let col = if number % 10 == 0 { 10 } else { number % 10 };
        match (row <= 3, col <= 5) {
            (true, true) => Quadrant::Q1,
            (true, false) => Quadrant::Q2,
            (false, true) => Quadrant::Q3,
            (false, false) => Quadrant::Q4,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}", self.index() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationProfile {
    pub number: u8,
    /// Co-occurrences indexées par `partenaire - start`.
    pub co_occurrences: Vec<u32>,
    /// Distances vers le numéro suivant, dans l'ordre du tirage.
    pub distances: Vec<i32>,
    pub quadrants: [u32; 4],
}

impl CorrelationProfile {
    pub fn total_co_occurrences(&self) -> u32 {
        self.co_occurrences.iter().sum()
    }

    pub fn co_occurrence_with(&self, board: &Board, partner: u8) -> u32 {
        board
            .index_of(partner)
            .map(|idx| self.co_occurrences[idx])
            .unwrap_or(0)
    }
}

pub fn compute_correlations(repo: &DrawRepository) -> Vec<CorrelationProfile> {
    let board = repo.board();
    let size = board.size();
    let mut profiles: Vec<CorrelationProfile> = board
        .numbers()
        .map(|number| CorrelationProfile {
            number,
            co_occurrences: vec![0; size],
            distances: Vec::new(),
            quadrants: [0; 4],
        })
        .collect();

    for draw in repo.iter() {
        let numbers = &draw.numbers;
        for (i, &num1) in numbers.iter().enumerate() {
            let Some(idx1) = board.index_of(num1) else {
                continue;
            };

            for (j, &num2) in numbers.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(idx2) = board.index_of(num2) {
                    profiles[idx1].co_occurrences[idx2] += 1;
                }
            }

            if let Some(&next) = numbers.get(i + 1) {
                profiles[idx1].distances.push(next as i32 - num1 as i32);
            }

            profiles[idx1].quadrants[Quadrant::of(num1).index()] += 1;
        }
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{make_test_repository, repository_from};

    #[test]
    fn test_quadrants() {
        assert_eq!(Quadrant::of(1), Quadrant::Q1);
        assert_eq!(Quadrant::of(5), Quadrant::Q1);
        assert_eq!(Quadrant::of(6), Quadrant::Q2);
        assert_eq!(Quadrant::of(10), Quadrant::Q2);
        assert_eq!(Quadrant::of(25), Quadrant::Q1);
        assert_eq!(Quadrant::of(30), Quadrant::Q2);
        assert_eq!(Quadrant::of(31), Quadrant::Q3);
        assert_eq!(Quadrant::of(49), Quadrant::Q4);
        assert_eq!(Quadrant::of(60), Quadrant::Q4);
    }

    #[test]
    fn test_co_occurrence_symmetry() {
        let repo = make_test_repository(60);
        let board = *repo.board();
        let profiles = compute_correlations(&repo);
        for a in &profiles {
            for b in &profiles {
                assert_eq!(
                    a.co_occurrence_with(&board, b.number),
                    b.co_occurrence_with(&board, a.number),
                    "co({}, {})",
                    a.number,
                    b.number
                );
            }
        }
    }

    #[test]
    fn test_no_self_co_occurrence() {
        let repo = make_test_repository(20);
        let board = *repo.board();
        let profiles = compute_correlations(&repo);
        assert!(profiles.iter().all(|p| p.co_occurrence_with(&board, p.number) == 0));
    }

    #[test]
    fn test_distances_follow_draw_order() {
        let repo = repository_from(&[&[5, 2, 9, 30, 31, 40]]);
        let profiles = compute_correlations(&repo);
        assert_eq!(profiles[4].distances, vec![-3]);
        assert_eq!(profiles[1].distances, vec![7]);
        // dernier numéro du tirage : pas de distance
        assert!(profiles[39].distances.is_empty());
    }

    #[test]
    fn test_quadrant_counts_match_appearances() {
        let repo = repository_from(&[&[1, 2, 3, 4, 5, 6], &[1, 12, 33, 44, 55, 60]]);
        let profiles = compute_correlations(&repo);
        assert_eq!(profiles[0].quadrants, [2, 0, 0, 0]);
        assert_eq!(profiles[59].quadrants, [0, 0, 0, 1]);
    }

    #[test]
    fn test_total_co_occurrences() {
        let repo = repository_from(&[&[1, 2, 3, 4, 5, 6], &[1, 12, 33, 44, 55, 60]]);
        let profiles = compute_correlations(&repo);
        assert_eq!(profiles[0].total_co_occurrences(), 10);
        assert_eq!(profiles[1].total_co_occurrences(), 5);
    }
}
