use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::DrawRepository;
use crate::simulation::{count_matches, PrizeTable};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeConfig {
    pub min_matches: usize,
    pub consider_zero_matches: bool,
}

impl Default for PrizeConfig {
    fn default() -> Self {
        Self { min_matches: 4, consider_zero_matches: false }
    }
}

impl PrizeConfig {
    fn qualifies(&self, matches: usize) -> bool {
        matches >= self.min_matches || (self.consider_zero_matches && matches == 0)
    }
}

/// Résultat de la grille face à un tirage historique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCheck {
    pub draw_index: u32,
    pub date: String,
    pub matches: usize,
    pub prize: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBucket {
    pub count: usize,
    pub prize: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeSummary {
    pub games_checked: usize,
    pub qualifying_games: Vec<GameCheck>,
    pub total_prize: f64,
    pub by_matches: BTreeMap<usize, MatchBucket>,
}

pub fn check_games(numbers: &[u8], repo: &DrawRepository, prizes: &PrizeTable) -> Vec<GameCheck> {
    repo.iter()
        .map(|draw| {
            let matches = count_matches(numbers, &draw.numbers);
            GameCheck {
                draw_index: draw.index,
                date: draw.date.clone(),
                matches,
                prize: prizes.prize_for(matches),
            }
        })
        .collect()
}

pub fn analyze_prizes(
    numbers: &[u8],
    repo: &DrawRepository,
    prizes: &PrizeTable,
    config: &PrizeConfig,
) -> PrizeSummary {
    let checks = check_games(numbers, repo, prizes);
    let games_checked = checks.len();

    let mut by_matches: BTreeMap<usize, MatchBucket> = BTreeMap::new();
    let mut total_prize = 0.0;
    let mut qualifying_games = Vec::new();
    for check in checks {
        if !config.qualifies(check.matches) {
            continue;
        }
        let bucket = by_matches.entry(check.matches).or_default();
        bucket.count += 1;
        bucket.prize += check.prize;
        total_prize += check.prize;
        qualifying_games.push(check);
    }

    PrizeSummary { games_checked, qualifying_games, total_prize, by_matches }
}
