use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use lotostat_core::analysis::{BoardAnalysis, NumberStatistics};
use lotostat_core::generator::GeneratedGame;
use lotostat_core::heuristics::clustering::Cluster;
use lotostat_core::heuristics::markov::MarkovChain;
use lotostat_core::heuristics::svm::SvmEstimate;
use lotostat_core::models::{Combination, ScoreLevel};
use lotostat_core::prize::PrizeSummary;
use lotostat_core::scoring::NumberScore;
use lotostat_core::simulation::SimulationResult;
use lotostat_core::statistics::GameStatistics;
use lotostat_core::validator::ValidationResult;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn level_color(level: ScoreLevel) -> Color {
    match level {
        ScoreLevel::VeryHigh => Color::Green,
        ScoreLevel::High => Color::DarkGreen,
        ScoreLevel::Medium => Color::White,
        ScoreLevel::Low => Color::DarkRed,
        ScoreLevel::VeryLow => Color::Red,
    }
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Importées         : {}", result.imported);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_game_statistics(stats: &GameStatistics, analysis: &BoardAnalysis) {
    println!("\n📊 Statistiques sur {} tirages\n", stats.even_odd.total_games);
    println!(
        "Pairs : {}  Impairs : {}",
        stats.even_odd.even, stats.even_odd.odd
    );
    println!(
        "Somme des tirages : min {}  max {}  moyenne {:.1}",
        stats.sums.min, stats.sums.max, stats.sums.average
    );

    println!("\n── Fréquences ──");
    let mut table = new_table(vec!["Numéro", "Sorties", "Fréquence", "Somme moyenne"]);
    let mut sorted = analysis.frequencies.clone();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    for f in &sorted {
        table.add_row(vec![
            format!("{:2}", f.number),
            f.frequency.to_string(),
            format!("{:.4}", f.probability),
            format!("{:.1}", f.average_sum),
        ]);
    }
    println!("{table}");

    let groups = [
        ("Paires", &stats.sequences.doubles),
        ("Triplets", &stats.sequences.triples),
        ("Quadruplets", &stats.sequences.quadruples),
        ("Quintuplets", &stats.sequences.quintuples),
        ("Sextuplets", &stats.sequences.sextuples),
    ];
    for (title, sequences) in groups {
        if sequences.is_empty() {
            continue;
        }
        println!("\n── {} fréquents ──", title);
        let mut table = new_table(vec!["Numéros", "Sorties", "Probabilité"]);
        for seq in sequences.iter() {
            table.add_row(vec![
                format_numbers(&seq.numbers),
                seq.frequency.to_string(),
                format!("{:.4}", seq.probability),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_scores(scores: &[NumberScore]) {
    let mut table = new_table(vec![
        "Numéro", "Score", "Niveau", "Fréq.", "Retard", "Corrél.", "Motif", "Tendance",
    ]);
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    for s in &sorted {
        table.add_row(vec![
            Cell::new(format!("{:2}", s.number)),
            Cell::new(format!("{:.4}", s.total)),
            Cell::new(s.level.to_string()).fg(level_color(s.level)),
            Cell::new(format!("{:.3}", s.components.frequency)),
            Cell::new(format!("{:.3}", s.components.dormancy)),
            Cell::new(format!("{:.3}", s.components.correlation)),
            Cell::new(format!("{:.3}", s.components.pattern)),
            Cell::new(format!("{:.3}", s.components.trend)),
        ]);
    }
    println!("{table}");
}

pub fn display_combinations(combinations: &[Combination], title: &str) {
    println!("\n🎲 {}\n", title);
    if combinations.is_empty() {
        println!("Aucune combinaison.");
        return;
    }
    let mut table = new_table(vec!["#", "Numéros", "Fréquence", "Probabilité"]);
    for (i, c) in combinations.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            format_numbers(&c.numbers),
            c.frequency.to_string(),
            format!("{:.2}%", c.probability * 100.0),
        ]);
    }
    println!("{table}");
}

pub fn display_generated(games: &[GeneratedGame]) {
    println!("\n🎲 Grilles générées\n");
    if games.is_empty() {
        println!("Aucune grille : pas assez de numéros éligibles ou toutes rejetées.");
        return;
    }
    let mut table = new_table(vec!["#", "Numéros", "Fréquence", "Probabilité", "Validation"]);
    for (i, g) in games.iter().enumerate() {
        let validation = match &g.validation {
            Some(v) => format!("{:.3}", v.score),
            None => "—".to_string(),
        };
        table.add_row(vec![
            format!("{}", i + 1),
            format_numbers(&g.combination.numbers),
            g.combination.frequency.to_string(),
            format!("{:.2}%", g.combination.probability * 100.0),
            validation,
        ]);
    }
    println!("{table}");
}

pub fn display_validation(numbers: &[u8], result: &ValidationResult) {
    println!("\nGrille : {}", format_numbers(numbers));
    let (verdict, color) = if result.is_valid {
        ("VALIDE", Color::Green)
    } else {
        ("REJETÉE", Color::Red)
    };
    let mut table = new_table(vec!["Verdict", "Score", "Motifs"]);
    let reasons = if result.reasons.is_empty() {
        "—".to_string()
    } else {
        result.reasons.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n")
    };
    table.add_row(vec![
        Cell::new(verdict).fg(color),
        Cell::new(format!("{:.3}", result.score)),
        Cell::new(reasons),
    ]);
    println!("{table}");
}

pub fn display_summary(analysis: &BoardAnalysis, stats: &GameStatistics) {
    println!(
        "\n📋 Résumé : {} tirages, numéros {}-{}, {} par grille\n",
        analysis.total_draws, analysis.board.start, analysis.board.end, analysis.board.pick
    );

    let mut by_score: Vec<&NumberScore> = analysis.scores.iter().collect();
    by_score.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    let top: Vec<u8> = by_score.iter().take(5).map(|s| s.number).collect();
    let bottom: Vec<u8> = by_score.iter().rev().take(5).map(|s| s.number).collect();

    let mut dormant: Vec<(u8, usize)> = analysis
        .temporal
        .iter()
        .map(|t| (t.number, t.current_gap(analysis.total_draws)))
        .collect();
    dormant.sort_by(|a, b| b.1.cmp(&a.1));
    let dormant: Vec<String> = dormant
        .iter()
        .take(5)
        .map(|(n, gap)| format!("{} ({})", n, gap))
        .collect();

    let mut table = new_table(vec!["Indicateur", "Valeur"]);
    table.add_row(vec!["Meilleurs scores".to_string(), format_numbers(&top)]);
    table.add_row(vec!["Scores les plus bas".to_string(), format_numbers(&bottom)]);
    table.add_row(vec!["Plus longs retards".to_string(), dormant.join(", ")]);
    for level in ScoreLevel::ALL {
        let count = analysis.scores.iter().filter(|s| s.level == level).count();
        table.add_row(vec![format!("Niveau {}", level), count.to_string()]);
    }
    table.add_row(vec![
        "Pairs / impairs".to_string(),
        format!("{} / {}", stats.even_odd.even, stats.even_odd.odd),
    ]);
    table.add_row(vec!["Somme moyenne".to_string(), format!("{:.1}", stats.sums.average)]);
    println!("{table}");
}

pub fn display_number_statistics(stats: &NumberStatistics) {
    println!("\n🔎 Numéro {}\n", stats.number);
    let mut table = new_table(vec!["Indicateur", "Valeur"]);
    table.add_row(vec!["Sorties".to_string(), stats.absolute.to_string()]);
    table.add_row(vec!["Fréquence".to_string(), format!("{:.4}", stats.relative)]);
    table.add_row(vec!["Retard actuel".to_string(), stats.current_dormancy.to_string()]);
    table.add_row(vec!["Retard moyen".to_string(), format!("{:.2}", stats.average_dormancy)]);
    let history = stats
        .dormancy_history
        .iter()
        .rev()
        .take(10)
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec!["Derniers écarts".to_string(), history]);
    table.add_row(vec!["Motifs".to_string(), stats.patterns.join(", ")]);
    println!("{table}");

    if !stats.correlations.is_empty() {
        println!("\n── Corrélations ──");
        let mut table = new_table(vec!["Numéro", "Force"]);
        for c in &stats.correlations {
            table.add_row(vec![format!("{:2}", c.number), format!("{:.3}", c.strength)]);
        }
        println!("{table}");
    }
}

pub fn display_simulation(numbers: &[u8], result: &SimulationResult) {
    println!(
        "\n🎰 Simulation de {} tirages pour {}\n",
        result.iterations,
        format_numbers(numbers)
    );
    let mut table = new_table(vec!["Numéros trouvés", "Tirages", "Part"]);
    for (matches, &count) in result.match_distribution.iter().enumerate() {
        let share = if result.iterations > 0 {
            count as f64 / result.iterations as f64
        } else {
            0.0
        };
        table.add_row(vec![
            matches.to_string(),
            count.to_string(),
            format!("{:.4}%", share * 100.0),
        ]);
    }
    println!("{table}");
    println!("Probabilité de gain : {:.6}%", result.win_probability * 100.0);
    println!(
        "Gain total : {:.2} €  Gain moyen : {:.4} €",
        result.total_prize, result.expected_prize
    );
}

pub fn display_prizes(numbers: &[u8], summary: &PrizeSummary) {
    println!(
        "\n💰 Grille {} sur {} tirages historiques\n",
        format_numbers(numbers),
        summary.games_checked
    );
    if summary.qualifying_games.is_empty() {
        println!("Aucun tirage ne correspond aux critères.");
        return;
    }
    let mut table = new_table(vec!["Tirage", "Date", "Trouvés", "Gain"]);
    for check in &summary.qualifying_games {
        table.add_row(vec![
            check.draw_index.to_string(),
            check.date.clone(),
            check.matches.to_string(),
            format!("{:.2} €", check.prize),
        ]);
    }
    println!("{table}");

    let mut table = new_table(vec!["Trouvés", "Tirages", "Gains"]);
    for (matches, bucket) in &summary.by_matches {
        table.add_row(vec![
            matches.to_string(),
            bucket.count.to_string(),
            format!("{:.2} €", bucket.prize),
        ]);
    }
    println!("{table}");
    println!("Total : {:.2} €", summary.total_prize);
}

pub fn display_heuristics(
    clusters: &[Cluster],
    chain: &MarkovChain,
    estimate: Option<(&[u8], SvmEstimate)>,
) {
    println!("\n⚠️  Heuristiques descriptives, sans valeur prédictive\n");

    println!("── Groupes de tirages ──");
    if clusters.is_empty() {
        println!("Aucun groupe.");
    } else {
        let mut table = new_table(vec!["#", "Centre", "Tirages", "Force"]);
        for (i, c) in clusters.iter().enumerate() {
            let centroid = c
                .centroid
                .iter()
                .map(|v| format!("{:.1}", v))
                .collect::<Vec<_>>()
                .join(" - ");
            table.add_row(vec![
                format!("{}", i + 1),
                centroid,
                c.members.len().to_string(),
                format!("{:.3}", c.strength),
            ]);
        }
        println!("{table}");
    }

    println!("\n── Chaîne de Markov ──");
    let transitions: u32 = chain.transitions.values().flat_map(|m| m.values()).sum();
    println!("{} états, {} transitions", chain.state_count(), transitions);

    if let Some((numbers, estimate)) = estimate {
        println!("\n── Estimation SVM ──");
        let mut table = new_table(vec!["Grille", "Probabilité", "Confiance"]);
        table.add_row(vec![
            format_numbers(numbers),
            format!("{:.4}", estimate.probability),
            format!("{:.4}", estimate.confidence),
        ]);
        println!("{table}");
    }
}
