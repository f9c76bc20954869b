use serde::{Deserialize, Serialize};

use crate::models::DrawRepository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalProfile {
    pub number: u8,
    /// Écarts entre apparitions consécutives ; longueur = apparitions - 1.
    pub gaps: Vec<usize>,
    pub average_gap: f64,
    /// Position de la dernière apparition dans le dépôt.
    pub last_appearance: Option<usize>,
}

impl TemporalProfile {
    fn empty(number: u8) -> Self {
        Self { number, gaps: Vec::new(), average_gap: 0.0, last_appearance: None }
    }

    pub fn last_gap(&self) -> Option<usize> {
        self.gaps.last().copied()
    }

    /// Tirages écoulés depuis la dernière apparition (`total` si jamais tiré).
    pub fn current_gap(&self, total_draws: usize) -> usize {
        match self.last_appearance {
            Some(last) => total_draws.saturating_sub(last + 1),
            None => total_draws,
        }
    }

    /// Moyenne des `n` derniers écarts, `None` sans écart.
    pub fn recent_mean_gap(&self, n: usize) -> Option<f64> {
        if self.gaps.is_empty() {
            return None;
        }
        let recent = &self.gaps[self.gaps.len().saturating_sub(n)..];
        Some(recent.iter().sum::<usize>() as f64 / recent.len() as f64)
    }
}

pub fn compute_temporal(repo: &DrawRepository) -> Vec<TemporalProfile> {
    let board = repo.board();
    let mut profiles: Vec<TemporalProfile> = board.numbers().map(TemporalProfile::empty).collect();

    for (position, draw) in repo.iter().enumerate() {
        for &n in &draw.numbers {
            let Some(idx) = board.index_of(n) else {
                continue;
            };
            let profile = &mut profiles[idx];
            // Première apparition : pas d'écart
            if let Some(last) = profile.last_appearance {
                profile.gaps.push(position - last);
            }
            profile.last_appearance = Some(position);
        }
    }

    for profile in &mut profiles {
        if !profile.gaps.is_empty() {
            profile.average_gap =
                profile.gaps.iter().sum::<usize>() as f64 / profile.gaps.len() as f64;
        }
    }

    profiles
}
