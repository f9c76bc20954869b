use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Plage de numéros d'une loterie et nombre de numéros par tirage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub start: u8,
    pub end: u8,
    pub pick: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self { start: 1, end: 60, pick: 6 }
    }
}

impl Board {
    pub fn new(start: u8, end: u8, pick: usize) -> Self {
        Self { start, end, pick }
    }

    pub fn size(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        (self.end - self.start) as usize + 1
    }

    pub fn pick_count(&self) -> usize {
        self.pick
    }

    pub fn contains(&self, number: u8) -> bool {
        number >= self.start && number <= self.end
    }

    /// Position du numéro dans les tables par numéro (`number - start`).
    pub fn index_of(&self, number: u8) -> Option<usize> {
        if self.contains(number) {
            Some((number - self.start) as usize)
        } else {
            None
        }
    }

    pub fn number_at(&self, idx: usize) -> u8 {
        self.start + idx as u8
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub index: u32,
    /// Date brute telle qu'importée, jamais interprétée.
    pub date: String,
    pub numbers: Vec<u8>,
}

impl Draw {
    pub fn new(index: u32, date: impl Into<String>, numbers: Vec<u8>) -> Self {
        Self { index, date: date.into(), numbers }
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

pub fn validate_draw(numbers: &[u8], board: &Board) -> Result<()> {
    if numbers.len() != board.pick_count() {
        bail!(
            "{} numéros au lieu de {}",
            numbers.len(),
            board.pick_count()
        );
    }
    for &n in numbers {
        if !board.contains(n) {
            bail!("Numéro {} hors limites ({}-{})", n, board.start, board.end);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Historique ordonné des tirages. Immuable : un nouvel import construit un nouveau dépôt.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRepository {
    board: Board,
    draws: Vec<Draw>,
}

impl DrawRepository {
    pub fn new(board: Board, draws: Vec<Draw>) -> Result<Self> {
        for draw in &draws {
            validate_draw(&draw.numbers, &board)
                .with_context(|| format!("Tirage {} invalide", draw.index))?;
        }
        log::debug!("Dépôt chargé : {} tirages", draws.len());
        Ok(Self { board, draws })
    }

    pub fn empty(board: Board) -> Self {
        Self { board, draws: Vec::new() }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Les tirages historiques vus comme des combinaisons (corpus du validateur).
    pub fn historical_combinations(&self) -> Vec<Vec<u8>> {
        self.draws.iter().map(|d| d.numbers.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ScoreLevel {
    pub const ALL: [ScoreLevel; 5] = [
        ScoreLevel::VeryHigh,
        ScoreLevel::High,
        ScoreLevel::Medium,
        ScoreLevel::Low,
        ScoreLevel::VeryLow,
    ];

    /// Seuils exclusifs : >0.8, >0.6, >0.4, >0.2.
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            ScoreLevel::VeryHigh
        } else if score > 0.6 {
            ScoreLevel::High
        } else if score > 0.4 {
            ScoreLevel::Medium
        } else if score > 0.2 {
            ScoreLevel::Low
        } else {
            ScoreLevel::VeryLow
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLevel::VeryHigh => write!(f, "TRÈS HAUT"),
            ScoreLevel::High => write!(f, "HAUT"),
            ScoreLevel::Medium => write!(f, "MOYEN"),
            ScoreLevel::Low => write!(f, "BAS"),
            ScoreLevel::VeryLow => write!(f, "TRÈS BAS"),
        }
    }
}

impl FromStr for ScoreLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "very-high" | "tres-haut" | "très-haut" => Ok(ScoreLevel::VeryHigh),
            "high" | "haut" => Ok(ScoreLevel::High),
            "medium" | "moyen" => Ok(ScoreLevel::Medium),
            "low" | "bas" => Ok(ScoreLevel::Low),
            "very-low" | "tres-bas" | "très-bas" => Ok(ScoreLevel::VeryLow),
            other => bail!("Niveau inconnu : '{}'", other),
        }
    }
}

/// Grille candidate : numéros triés, fréquence (pourcentage entier) et probabilité (score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub numbers: Vec<u8>,
    pub frequency: u32,
    pub probability: f64,
}

impl Combination {
    pub fn new(mut numbers: Vec<u8>, frequency: u32, probability: f64) -> Self {
        numbers.sort();
        Self { numbers, frequency, probability }
    }
}

pub(crate) fn sort_by_probability_desc(combinations: &mut [Combination]) {
    combinations.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
pub(crate) fn make_test_repository(n: usize) -> DrawRepository {
    let draws = (0..n)
        .map(|i| {
            let base = (i % 9) as u8;
            Draw::new(
                i as u32 + 1,
                format!("2024-01-{:02}", (i % 28) + 1),
                vec![
                    base * 6 + 1,
                    base * 6 + 3,
                    base * 6 + 4,
                    (base * 6 + 12).min(60),
                    (base * 7 + 2) % 60 + 1,
                    60 - base,
                ]
                .into_iter()
                .fold(Vec::new(), |mut acc, n| {
                    let mut n = n;
                    while acc.contains(&n) {
                        n = n % 60 + 1;
                    }
                    acc.push(n);
                    acc
                }),
            )
        })
        .collect();
    DrawRepository::new(Board::default(), draws).unwrap()
}

#[cfg(test)]
pub(crate) fn repository_from(draws: &[&[u8]]) -> DrawRepository {
    let draws = draws
        .iter()
        .enumerate()
        .map(|(i, numbers)| Draw::new(i as u32 + 1, String::new(), numbers.to_vec()))
        .collect();
    DrawRepository::new(Board::default(), draws).unwrap()
}
