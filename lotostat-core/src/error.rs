use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("numberOfGames doit être > 0")]
    NoGames,

    #[error("numbersPerGame doit être > 0")]
    EmptyGame,

    #[error("numbersPerGame ({per_game}) dépasse la taille de la plage ({board_size})")]
    GameLargerThanBoard { per_game: usize, board_size: usize },

    #[error("plage invalide : début {start} >= fin {end}")]
    InvalidRange { start: u8, end: u8 },

    #[error("probabilityThreshold hors de [0, 1] : {0}")]
    ThresholdOutOfRange(f64),

    #[error("les poids doivent sommer à 1.0 (somme = {0})")]
    WeightsSum(f64),

    #[error("poids négatif ou non fini : {name} = {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("le lissage de tendance doit être > 0 : {0}")]
    InvalidSmoothing(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("sélection trop grande pour la recherche exhaustive : {pool} numéros (max {max})")]
    PoolTooLarge { pool: usize, max: usize },

    #[error("calcul annulé")]
    Cancelled,
}
