use chrono::Datelike;
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

use crate::cancel::CancelFlag;
use crate::error::CoreError;
use crate::models::{sort_by_probability_desc, Combination, ScoreLevel};
use crate::scoring::NumberScore;
use crate::validator::{validate_combination, ValidationResult};

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Ajoute à chaque étape le numéro qui maximise le score moyen de la grille.
    #[default]
    Greedy,
    /// Tire uniformément parmi les numéros éligibles restants.
    Random,
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions<'a> {
    pub levels: &'a [ScoreLevel],
    pub games: usize,
    pub size: usize,
    pub strategy: SelectionStrategy,
    /// Rejet aléatoire : la grille est écartée si u ~ U[0, 1) < seuil.
    pub rejection_threshold: Option<f64>,
    /// Corpus historique ; si présent, les grilles refusées par le validateur sont écartées.
    pub history: Option<&'a [Vec<u8>]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedGame {
    pub combination: Combination,
    pub validation: Option<ValidationResult>,
}

/// Numéros dont le niveau est sélectionné, du meilleur score au moins bon.
pub fn eligible_numbers<'s>(
    scores: &'s [NumberScore],
    levels: &[ScoreLevel],
) -> Vec<&'s NumberScore> {
    let mut eligible: Vec<&NumberScore> =
        scores.iter().filter(|s| levels.contains(&s.level)).collect();
    eligible.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    eligible
}

pub fn generate_combinations<R: Rng + ?Sized>(
    scores: &[NumberScore],
    options: &GeneratorOptions<'_>,
    rng: &mut R,
    cancel: &CancelFlag,
) -> Result<Vec<GeneratedGame>, CoreError> {
    let eligible = eligible_numbers(scores, options.levels);
    if options.size == 0 || eligible.len() < options.size {
        log::info!(
            "{} numéros éligibles pour des grilles de {} : aucune grille",
            eligible.len(),
            options.size
        );
        return Ok(Vec::new());
    }

    let mut games = Vec::new();
    let mut rejected = 0usize;
    let mut invalid = 0usize;

    for _ in 0..options.games {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        let picked = build_game(eligible.clone(), options.size, options.strategy, rng);
        if picked.len() < options.size {
            continue;
        }

        // Tirage indépendant de la qualité de la grille
        if let Some(threshold) = options.rejection_threshold {
            if rng.random::<f64>() < threshold {
                rejected += 1;
                continue;
            }
        }

        let combination = to_combination(&picked);
        let validation = options
            .history
            .map(|history| validate_combination(&combination.numbers, history));
        if matches!(&validation, Some(v) if !v.is_valid) {
            invalid += 1;
            continue;
        }

        games.push(GeneratedGame { combination, validation });
    }

    log::info!(
        "{} grilles générées ({} rejetées au tirage, {} invalides)",
        games.len(),
        rejected,
        invalid
    );

    games.sort_by(|a, b| {
        b.combination
            .probability
            .partial_cmp(&a.combination.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(games)
}

/// Version sans métadonnées de validation.
pub fn generate_plain<R: Rng + ?Sized>(
    scores: &[NumberScore],
    options: &GeneratorOptions<'_>,
    rng: &mut R,
    cancel: &CancelFlag,
) -> Result<Vec<Combination>, CoreError> {
    let mut combinations: Vec<Combination> = generate_combinations(scores, options, rng, cancel)?
        .into_iter()
        .map(|g| g.combination)
        .collect();
    sort_by_probability_desc(&mut combinations);
    Ok(combinations)
}

fn build_game<'s, R: Rng + ?Sized>(
    mut available: Vec<&'s NumberScore>,
    size: usize,
    strategy: SelectionStrategy,
    rng: &mut R,
) -> Vec<&'s NumberScore> {
    let mut picked: Vec<&NumberScore> = Vec::with_capacity(size);

    while picked.len() < size && !available.is_empty() {
        let idx = match strategy {
            SelectionStrategy::Greedy => best_candidate(&available, &picked),
            SelectionStrategy::Random => rng.random_range(0..available.len()),
        };
        picked.push(available.remove(idx));
    }

    picked
}

/// Indice du candidat maximisant le score moyen ; le premier rencontré gagne en cas d'égalité.
fn best_candidate(available: &[&NumberScore], current: &[&NumberScore]) -> usize {
    let current_sum: f64 = current.iter().map(|s| s.total).sum();
    let len = (current.len() + 1) as f64;

    let mut best_idx = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, candidate) in available.iter().enumerate() {
        let mean = (current_sum + candidate.total) / len;
        if mean > best_score {
            best_score = mean;
            best_idx = i;
        }
    }
    best_idx
}

fn to_combination(picked: &[&NumberScore]) -> Combination {
    let len = picked.len() as f64;
    let frequency = picked.iter().map(|s| s.components.frequency).sum::<f64>() * 100.0 / len;
    let probability = picked.iter().map(|s| s.total).sum::<f64>() / len;
    Combination::new(
        picked.iter().map(|s| s.number).collect(),
        frequency.round() as u32,
        probability,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BoardAnalysis;
    use crate::models::make_test_repository;
    use crate::scoring::{ScoreComponents, Scorer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL_LEVELS: &[ScoreLevel] = &ScoreLevel::ALL;

    fn score(number: u8, total: f64) -> NumberScore {
        NumberScore {
            number,
            total,
            level: ScoreLevel::from_score(total),
            components: ScoreComponents {
                frequency: total,
                dormancy: 0.0,
                correlation: 0.0,
                pattern: 0.0,
                trend: 0.0,
            },
        }
    }

    fn options(games: usize, size: usize) -> GeneratorOptions<'static> {
        GeneratorOptions {
            levels: ALL_LEVELS,
            games,
            size,
            strategy: SelectionStrategy::Greedy,
            rejection_threshold: None,
            history: None,
        }
    }

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        assert_eq!(seed.to_string().len(), 8, "seed devrait avoir 8 chiffres: {seed}");
    }

    #[test]
    fn test_pool_smaller_than_size_is_empty() {
        let scores: Vec<NumberScore> = (1..=5).map(|n| score(n, 0.5)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let games =
            generate_combinations(&scores, &options(10, 6), &mut rng, &CancelFlag::new()).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn test_greedy_picks_highest_scores() {
        let scores: Vec<NumberScore> = (1..=10).map(|n| score(n, n as f64 / 20.0)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let games = generate_plain(&scores, &options(3, 4), &mut rng, &CancelFlag::new()).unwrap();
        assert_eq!(games.len(), 3);
        for g in &games {
            assert_eq!(g.numbers, vec![7, 8, 9, 10]);
            assert!((g.probability - (7.0 + 8.0 + 9.0 + 10.0) / 80.0).abs() < 1e-12);
            assert_eq!(g.frequency, ((0.5 + 0.45 + 0.4 + 0.35) * 100.0 / 4.0_f64).round() as u32);
        }
    }

    #[test]
    fn test_greedy_tie_keeps_first_encountered() {
        let scores = vec![score(3, 0.5), score(1, 0.5), score(2, 0.5)];
        let mut rng = StdRng::seed_from_u64(1);
        let games = generate_plain(&scores, &options(1, 2), &mut rng, &CancelFlag::new()).unwrap();
        assert_eq!(games[0].numbers, vec![1, 3]);
    }

    #[test]
    fn test_level_filter() {
        let scores = vec![score(1, 0.9), score(2, 0.1), score(3, 0.85), score(4, 0.7)];
        let levels = [ScoreLevel::VeryHigh];
        let opts = GeneratorOptions { levels: &levels, ..options(2, 2) };
        let mut rng = StdRng::seed_from_u64(3);
        let games = generate_plain(&scores, &opts, &mut rng, &CancelFlag::new()).unwrap();
        assert!(games.iter().all(|g| g.numbers == vec![1, 3]));

        let opts = GeneratorOptions { levels: &levels, ..options(2, 3) };
        assert!(generate_plain(&scores, &opts, &mut rng, &CancelFlag::new()).unwrap().is_empty());
    }

    #[test]
    fn test_random_strategy_is_seed_deterministic() {
        let repo = make_test_repository(60);
        let analysis = BoardAnalysis::compute(&repo, &Scorer::with_defaults(*repo.board()));
        let opts = GeneratorOptions { strategy: SelectionStrategy::Random, ..options(8, 6) };

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            generate_plain(&analysis.scores, &opts, &mut rng, &CancelFlag::new()).unwrap()
        };
        let a = run(7);
        let b = run(7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        for w in a.windows(2) {
            assert!(w[0].probability >= w[1].probability);
        }
        for g in &a {
            assert!(g.numbers.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_rejection_threshold_bounds() {
        let scores: Vec<NumberScore> = (1..=10).map(|n| score(n, 0.5)).collect();
        let mut rng = StdRng::seed_from_u64(11);

        let all_rejected = GeneratorOptions { rejection_threshold: Some(1.0), ..options(20, 6) };
        let kept = generate_plain(&scores, &all_rejected, &mut rng, &CancelFlag::new()).unwrap();
        assert!(kept.is_empty());

        let none_rejected = GeneratorOptions { rejection_threshold: Some(0.0), ..options(20, 6) };
        let kept = generate_plain(&scores, &none_rejected, &mut rng, &CancelFlag::new()).unwrap();
        assert_eq!(kept.len(), 20);

        let some_rejected = GeneratorOptions { rejection_threshold: Some(0.5), ..options(200, 6) };
        let kept = generate_plain(&scores, &some_rejected, &mut rng, &CancelFlag::new())
            .unwrap()
            .len();
        assert!(kept > 0 && kept < 200, "kept = {kept}");
    }

    #[test]
    fn test_validation_discards_invalid_games() {
        // Les meilleurs numéros sont tous dans la première décennie : grille refusée
        let scores: Vec<NumberScore> = (1..=6).map(|n| score(n, 0.9)).collect();
        let history: Vec<Vec<u8>> = vec![vec![1, 2, 3, 4, 5, 6]];
        let opts = GeneratorOptions { history: Some(history.as_slice()), ..options(3, 6) };
        let mut rng = StdRng::seed_from_u64(5);
        let games = generate_combinations(&scores, &opts, &mut rng, &CancelFlag::new()).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn test_validation_attached_to_games() {
        let scores: Vec<NumberScore> =
            [22, 28, 33, 36, 41, 47].iter().map(|&n| score(n, 0.9)).collect();
        let history: Vec<Vec<u8>> = vec![vec![1, 2, 3, 4, 5, 6]];
        let opts = GeneratorOptions { history: Some(history.as_slice()), ..options(1, 6) };
        let mut rng = StdRng::seed_from_u64(5);
        let games = generate_combinations(&scores, &opts, &mut rng, &CancelFlag::new()).unwrap();
        assert_eq!(games.len(), 1);
        assert!(games[0].validation.as_ref().unwrap().is_valid);
    }

    #[test]
    fn test_huge_game_count_cancelled_without_allocating() {
        let scores: Vec<NumberScore> = (1..=10).map(|n| score(n, 0.5)).collect();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut rng = StdRng::seed_from_u64(5);
        let result = generate_combinations(&scores, &options(usize::MAX, 6), &mut rng, &cancel);
        assert_eq!(result.unwrap_err(), CoreError::Cancelled);
    }

    #[test]
    fn test_cancelled_generation() {
        let scores: Vec<NumberScore> = (1..=10).map(|n| score(n, 0.5)).collect();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            generate_plain(&scores, &options(5, 6), &mut rng, &cancel).unwrap_err(),
            CoreError::Cancelled
        );
    }
}
