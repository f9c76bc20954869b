use serde::{Deserialize, Serialize};

use crate::models::DrawRepository;

pub const DECADE_BUCKETS: usize = 6;

/// Décennie 0-based : 1-10 → 0, 11-20 → 1, ... ; au-delà de 60, dernière tranche.
pub fn decade_of(number: u8) -> usize {
    ((number.saturating_sub(1)) as usize / 10).min(DECADE_BUCKETS - 1)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parity {
    pub even: u32,
    pub odd: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternProfile {
    pub number: u8,
    pub absolute: u32,
    pub relative: f64,
    pub decades: [u32; DECADE_BUCKETS],
    pub parity: Parity,
    /// Somme brute de tous les tirages contenant le numéro (non normalisée).
    pub sum_contribution: u64,
}

pub fn compute_patterns(repo: &DrawRepository) -> Vec<PatternProfile> {
    let board = repo.board();
    let mut profiles: Vec<PatternProfile> = board
        .numbers()
        .map(|number| PatternProfile {
            number,
            absolute: 0,
            relative: 0.0,
            decades: [0; DECADE_BUCKETS],
            parity: Parity::default(),
            sum_contribution: 0,
        })
        .collect();

    for draw in repo.iter() {
        let draw_sum = draw.sum() as u64;
        for &n in &draw.numbers {
            let Some(idx) = board.index_of(n) else {
                continue;
            };
            let profile = &mut profiles[idx];
            profile.absolute += 1;
            profile.decades[decade_of(n)] += 1;
            if n % 2 == 0 {
                profile.parity.even += 1;
            } else {
                profile.parity.odd += 1;
            }
            profile.sum_contribution += draw_sum;
        }
    }

    let total = repo.len();
    if total > 0 {
        for profile in &mut profiles {
            profile.relative = profile.absolute as f64 / total as f64;
        }
    }

    profiles
}
