use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::DrawRepository;

/// État = tirage complet, numéros dans l'ordre d'origine joints par des virgules.
pub fn state_key(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkovChain {
    pub transitions: BTreeMap<String, BTreeMap<String, u32>>,
    pub probabilities: BTreeMap<String, BTreeMap<String, f64>>,
}

impl MarkovChain {
    pub fn build(repo: &DrawRepository) -> Self {
        let mut transitions: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        for pair in repo.draws().windows(2) {
            let current = state_key(&pair[0].numbers);
            let next = state_key(&pair[1].numbers);
            *transitions.entry(current).or_default().entry(next).or_insert(0) += 1;
        }

        let probabilities = transitions
            .iter()
            .map(|(state, nexts)| {
                let total: u32 = nexts.values().sum();
                let probs = nexts
                    .iter()
                    .map(|(next, &count)| (next.clone(), count as f64 / total as f64))
                    .collect();
                (state.clone(), probs)
            })
            .collect();

        Self { transitions, probabilities }
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    /// Transition la plus fréquente depuis `numbers`, à égalité la plus petite clé.
    pub fn most_likely_next(&self, numbers: &[u8]) -> Option<(&str, f64)> {
        let probs = self.probabilities.get(&state_key(numbers))?;
        let mut best: Option<(&str, f64)> = None;
        for (next, &p) in probs {
            if best.is_none_or(|(_, bp)| p > bp) {
                best = Some((next.as_str(), p));
            }
        }
        best
    }
}
