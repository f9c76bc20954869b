use std::collections::HashMap;

use crate::analysis::frequency::NumberFrequency;
use crate::cancel::CancelFlag;
use crate::error::CoreError;
use crate::models::{sort_by_probability_desc, Combination};

/// Au-delà, C(n, k) devient trop grand pour une énumération complète.
pub const MAX_SEARCH_POOL: usize = 20;
pub const TOP_COMBINATIONS: usize = 10;
const IDEAL_GAP: f64 = 8.0;

/// Score d'une combinaison : 40 % probabilité moyenne, 20 % équilibre pair/impair,
/// 20 % proximité de la somme moyenne du numéro graine, 20 % écart moyen proche de 8.
pub fn combination_score(
    numbers: &[u8],
    frequencies: &HashMap<u8, &NumberFrequency>,
    seed: u8,
) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    let len = numbers.len() as f64;
    let mut score = 0.0;

    let avg_prob = numbers
        .iter()
        .map(|n| frequencies.get(n).map(|f| f.probability).unwrap_or(0.0))
        .sum::<f64>()
        / len;
    score += avg_prob * 0.4;

    let even_ratio = numbers.iter().filter(|&&n| n % 2 == 0).count() as f64 / len;
    score += (1.0 - (0.5 - even_ratio).abs()) * 0.2;

    let seed_avg_sum = frequencies.get(&seed).map(|f| f.average_sum).unwrap_or(0.0);
    if seed_avg_sum > 0.0 {
        let sum: f64 = numbers.iter().map(|&n| n as f64).sum();
        let sum_score = 1.0 - (sum - seed_avg_sum).abs() / seed_avg_sum;
        score += sum_score.max(0.0) * 0.2;
    }

    if numbers.len() >= 2 {
        let mut sorted = numbers.to_vec();
        sorted.sort();
        let avg_gap = sorted.windows(2).map(|w| (w[1] - w[0]) as f64).sum::<f64>()
            / (sorted.len() - 1) as f64;
        let gap_score = 1.0 - (avg_gap - IDEAL_GAP).abs() / IDEAL_GAP;
        score += gap_score.max(0.0) * 0.2;
    }

    score
}

/// Énumère tous les sous-ensembles de `size` numéros de la sélection et garde les 10 meilleurs.
/// Sélection trop petite : résultat vide, ce n'est pas une erreur.
pub fn find_best_combinations(
    selected: &[u8],
    frequencies: &[NumberFrequency],
    size: usize,
    cancel: &CancelFlag,
) -> Result<Vec<Combination>, CoreError> {
    let mut pool: Vec<u8> = Vec::with_capacity(selected.len());
    for &n in selected {
        if !pool.contains(&n) {
            pool.push(n);
        }
    }

    if size == 0 || pool.len() < size {
        return Ok(Vec::new());
    }
    if pool.len() > MAX_SEARCH_POOL {
        return Err(CoreError::PoolTooLarge { pool: pool.len(), max: MAX_SEARCH_POOL });
    }

    let lookup: HashMap<u8, &NumberFrequency> = frequencies.iter().map(|f| (f.number, f)).collect();

    let mut combinations = Vec::new();
    let mut indices: Vec<usize> = (0..size).collect();
    let mut subset = vec![0u8; size];
    let n = pool.len();

    loop {
        if cancel.is_cancelled() {
            log::info!("Recherche annulée après {} combinaisons", combinations.len());
            return Err(CoreError::Cancelled);
        }

        for (slot, &i) in subset.iter_mut().zip(&indices) {
            *slot = pool[i];
        }
        // La graine est le premier numéro du sous-ensemble, dans l'ordre de la sélection
        let score = combination_score(&subset, &lookup, subset[0]);
        combinations.push(Combination::new(subset.clone(), (score * 100.0).round() as u32, score));

        // Sous-ensemble suivant dans l'ordre lexicographique des indices
        let mut k = size;
        while k > 0 && indices[k - 1] == n - size + k - 1 {
            k -= 1;
        }
        if k == 0 {
            break;
        }
        indices[k - 1] += 1;
        for j in k..size {
            indices[j] = indices[j - 1] + 1;
        }
    }

    log::debug!("{} combinaisons évaluées sur {} numéros", combinations.len(), n);

    sort_by_probability_desc(&mut combinations);
    combinations.truncate(TOP_COMBINATIONS);
    Ok(combinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::frequency::compute_frequencies;
    use crate::models::{make_test_repository, repository_from};

    #[test]
    fn test_full_pool_yields_single_combination() {
        let repo = make_test_repository(30);
        let freqs = compute_frequencies(&repo);
        let result =
            find_best_combinations(&[1, 2, 3, 4, 5, 6], &freqs, 6, &CancelFlag::new()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_pool_smaller_than_size_is_empty() {
        let repo = make_test_repository(10);
        let freqs = compute_frequencies(&repo);
        let result = find_best_combinations(&[1, 2, 3], &freqs, 6, &CancelFlag::new()).unwrap();
        assert!(result.is_empty());
        // les doublons ne comptent pas
        let result =
            find_best_combinations(&[1, 1, 2, 2, 3, 3], &freqs, 6, &CancelFlag::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_keeps_top_ten_sorted() {
        let repo = make_test_repository(30);
        let freqs = compute_frequencies(&repo);
        let pool: Vec<u8> = (1..=9).collect();
        // C(9, 6) = 84
        let result = find_best_combinations(&pool, &freqs, 6, &CancelFlag::new()).unwrap();
        assert_eq!(result.len(), TOP_COMBINATIONS);
        for w in result.windows(2) {
            assert!(w[0].probability >= w[1].probability);
        }
        for c in &result {
            assert_eq!(c.numbers.len(), 6);
            assert_eq!(c.frequency, (c.probability * 100.0).round() as u32);
        }
    }

    #[test]
    fn test_pool_too_large() {
        let freqs = compute_frequencies(&make_test_repository(5));
        let pool: Vec<u8> = (1..=25).collect();
        let err = find_best_combinations(&pool, &freqs, 6, &CancelFlag::new()).unwrap_err();
        assert_eq!(err, CoreError::PoolTooLarge { pool: 25, max: MAX_SEARCH_POOL });
    }

    #[test]
    fn test_cancelled_search() {
        let freqs = compute_frequencies(&make_test_repository(5));
        let cancel = CancelFlag::new();
        cancel.cancel();
        let pool: Vec<u8> = (1..=12).collect();
        assert_eq!(
            find_best_combinations(&pool, &freqs, 6, &cancel).unwrap_err(),
            CoreError::Cancelled
        );
    }

    #[test]
    fn test_combination_score_components() {
        // Un seul tirage : chaque numéro a une probabilité de 1 et une somme moyenne de 21
        let repo = repository_from(&[&[1, 9, 17, 25, 33, 41]]);
        let freqs = compute_frequencies(&repo);
        let lookup: HashMap<u8, &NumberFrequency> = freqs.iter().map(|f| (f.number, f)).collect();
        let numbers = [1, 9, 17, 25, 33, 41];
        let score = combination_score(&numbers, &lookup, 1);
        // prob 1.0, tous impairs (0.5), somme 126 vs 126 (1.0), écart moyen 8 (1.0)
        let expected = 0.4 + 0.5 * 0.2 + 0.2 + 0.2;
        assert!((score - expected).abs() < 1e-12, "score = {}", score);
    }

    #[test]
    fn test_combination_score_unknown_numbers_are_finite() {
        let lookup = HashMap::new();
        let score = combination_score(&[1, 2, 3], &lookup, 1);
        assert!(score.is_finite());
        // pas de probabilité ni de somme de référence : équilibre + écart moyen de 1
        let balance = 1.0 - (0.5 - 1.0 / 3.0f64).abs();
        let gap = 1.0 - 7.0 / 8.0;
        assert!((score - (balance * 0.2 + gap * 0.2)).abs() < 1e-12, "score = {}", score);
    }
}
