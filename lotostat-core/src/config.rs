use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Board;

const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub frequency: f64,
    pub dormancy: f64,
    pub correlation: f64,
    pub pattern: f64,
    pub trend: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            frequency: 0.30,
            dormancy: 0.25,
            correlation: 0.20,
            pattern: 0.15,
            trend: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.frequency + self.dormancy + self.correlation + self.pattern + self.trend
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("frequency", self.frequency),
            ("dormancy", self.dormancy),
            ("correlation", self.correlation),
            ("pattern", self.pattern),
            ("trend", self.trend),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightsSum(sum));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub number_of_games: usize,
    pub numbers_per_game: usize,
    pub start_number: u8,
    pub end_number: u8,
    /// Seuil du rejet aléatoire, utilisé seulement quand il est activé.
    pub probability_threshold: f64,
    pub weights: ScoreWeights,
    /// Dénominateur de lissage du score de tendance.
    pub trend_smoothing: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            number_of_games: 10,
            numbers_per_game: 6,
            start_number: 1,
            end_number: 60,
            probability_threshold: 0.5,
            weights: ScoreWeights::default(),
            trend_smoothing: 10.0,
        }
    }
}

impl AnalysisConfig {
    pub fn board(&self) -> Board {
        Board::new(self.start_number, self.end_number, self.numbers_per_game)
    }

    /// Validation à la frontière : le cœur suppose une configuration déjà validée.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_number >= self.end_number {
            return Err(ConfigError::InvalidRange {
                start: self.start_number,
                end: self.end_number,
            });
        }
        if self.number_of_games == 0 {
            return Err(ConfigError::NoGames);
        }
        if self.numbers_per_game == 0 {
            return Err(ConfigError::EmptyGame);
        }
        let board_size = self.board().size();
        if self.numbers_per_game > board_size {
            return Err(ConfigError::GameLargerThanBoard {
                per_game: self.numbers_per_game,
                board_size,
            });
        }
        if !(0.0..=1.0).contains(&self.probability_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.probability_threshold));
        }
        if self.trend_smoothing.is_nan() || self.trend_smoothing <= 0.0 {
            return Err(ConfigError::InvalidSmoothing(self.trend_smoothing));
        }
        self.weights.validate()
    }
}

pub fn save_config(config: &AnalysisConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: AnalysisConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    config.validate()?;
    Ok(config)
}
