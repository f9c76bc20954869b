mod display;
mod export;
mod import;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lotostat_core::analysis::BoardAnalysis;
use lotostat_core::cancel::CancelFlag;
use lotostat_core::config::{load_config, save_config, AnalysisConfig};
use lotostat_core::generator::{
    date_seed, generate_combinations, GeneratorOptions, SelectionStrategy,
};
use lotostat_core::heuristics::clustering::{cluster_draws, ClusteringParams};
use lotostat_core::heuristics::markov::MarkovChain;
use lotostat_core::heuristics::svm::SvmModel;
use lotostat_core::models::{validate_draw, Board, DrawRepository, ScoreLevel};
use lotostat_core::prize::{analyze_prizes, PrizeConfig};
use lotostat_core::scoring::Scorer;
use lotostat_core::search::find_best_combinations;
use lotostat_core::simulation::{run_simulation, PrizeTable};
use lotostat_core::statistics::compute_game_statistics;
use lotostat_core::validator::validate_combination;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum Strategy {
    #[default]
    Greedy,
    Random,
}

impl From<Strategy> for SelectionStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Greedy => SelectionStrategy::Greedy,
            Strategy::Random => SelectionStrategy::Random,
        }
    }
}

#[derive(Parser)]
#[command(name = "lotostat", about = "Analyse statistique de tirages de loterie")]
struct Cli {
    /// Fichier CSV des tirages (index;date;n1;…;nk)
    #[arg(short, long, global = true, default_value = "tirages.csv")]
    file: PathBuf,

    /// Fichier de configuration JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Statistiques globales (fréquences, parité, sommes, séquences)
    Stats,

    /// Score de chaque numéro
    Scores {
        /// Niveaux à afficher (very-high,high,medium,low,very-low)
        #[arg(short, long, value_delimiter = ',')]
        levels: Vec<ScoreLevel>,
    },

    /// Recherche exhaustive des meilleures combinaisons d'une sélection
    Search {
        /// Numéros sélectionnés, séparés par des virgules
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,

        /// Taille des combinaisons (défaut : numbersPerGame)
        #[arg(short, long)]
        size: Option<usize>,

        /// Abandon après ce nombre de secondes
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Générer des grilles à partir des niveaux de score
    Generate {
        /// Niveaux éligibles
        #[arg(short, long, value_delimiter = ',', default_value = "very-high,high")]
        levels: Vec<ScoreLevel>,

        /// Nombre de grilles (défaut : numberOfGames)
        #[arg(short, long)]
        games: Option<usize>,

        /// Stratégie de sélection
        #[arg(long, default_value = "greedy")]
        strategy: Strategy,

        /// Rejet aléatoire avec le seuil probabilityThreshold
        #[arg(long)]
        reject: bool,

        /// Écarter les grilles refusées par le validateur
        #[arg(long)]
        validate: bool,

        /// Seed pour la reproductibilité (défaut : date du jour)
        #[arg(long)]
        seed: Option<u64>,

        /// Exporter les grilles dans un fichier texte
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abandon après ce nombre de secondes
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Valider une grille face à l'historique
    Validate {
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,
    },

    /// Résumé de l'analyse
    Summary,

    /// Fiche détaillée d'un numéro
    Number { number: u8 },

    /// Simulation Monte-Carlo d'une grille
    Simulate {
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,

        #[arg(short, long, default_value = "100000")]
        iterations: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Gains qu'aurait rapportés une grille sur l'historique
    Prizes {
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,

        /// Nombre minimal de numéros trouvés
        #[arg(short, long, default_value = "4")]
        min_matches: usize,

        /// Inclure les tirages sans aucun numéro trouvé
        #[arg(long)]
        zero: bool,
    },

    /// Groupes, chaîne de Markov et estimation SVM (heuristiques)
    Heuristics {
        #[arg(long, default_value = "5.0")]
        epsilon: f64,

        #[arg(long, default_value = "3")]
        min_points: usize,

        /// Grille à estimer
        #[arg(long, value_delimiter = ',')]
        numbers: Vec<u8>,
    },

    /// Écrire une configuration par défaut
    InitConfig {
        #[arg(short, long, default_value = "lotostat.json")]
        output: PathBuf,

        /// Écraser un fichier existant
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Command::InitConfig { output, force } = &cli.command {
        return cmd_init_config(output, *force);
    }

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = AnalysisConfig::default();
            config.validate()?;
            config
        }
    };
    let repo = load_repository(&cli.file, &config)?;

    match cli.command {
        Command::Stats => cmd_stats(&repo, &config),
        Command::Scores { levels } => cmd_scores(&repo, &config, &levels),
        Command::Search { numbers, size, timeout } => {
            cmd_search(&repo, &config, &numbers, size, timeout)
        }
        Command::Generate {
            levels,
            games,
            strategy,
            reject,
            validate,
            seed,
            output,
            timeout,
        } => {
            let config = with_games_override(config, games)?;
            let params = GenerateParams {
                levels,
                games: config.number_of_games,
                strategy: strategy.into(),
                reject,
                validate,
                seed: seed.unwrap_or_else(date_seed),
                output,
                timeout,
            };
            cmd_generate(&repo, &config, &params)
        }
        Command::Validate { numbers } => cmd_validate(&repo, &numbers),
        Command::Summary => cmd_summary(&repo, &config),
        Command::Number { number } => cmd_number(&repo, &config, number),
        Command::Simulate { numbers, iterations, seed } => {
            cmd_simulate(&repo, &numbers, iterations, seed.unwrap_or_else(date_seed))
        }
        Command::Prizes { numbers, min_matches, zero } => {
            let prize_config = PrizeConfig { min_matches, consider_zero_matches: zero };
            cmd_prizes(&repo, &numbers, &prize_config)
        }
        Command::Heuristics { epsilon, min_points, numbers } => {
            cmd_heuristics(&repo, ClusteringParams { epsilon, min_points }, &numbers)
        }
        Command::InitConfig { .. } => Ok(()),
    }
}

fn load_repository(path: &Path, config: &AnalysisConfig) -> Result<DrawRepository> {
    let (repo, result) = import::import_csv(path, &config.board())?;
    if result.errors > 0 {
        display::display_import_summary(&result);
    }
    if repo.is_empty() {
        bail!("Aucun tirage valide dans {:?}", path);
    }
    log::info!("{} tirages chargés depuis {:?}", repo.len(), path);
    Ok(repo)
}

fn analyze(repo: &DrawRepository, config: &AnalysisConfig) -> BoardAnalysis {
    let scorer = Scorer::new(config.board(), config.weights, config.trend_smoothing);
    BoardAnalysis::compute(repo, &scorer)
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Annule le calcul en cours une fois le délai écoulé.
fn cancel_after(timeout: Option<u64>) -> CancelFlag {
    let cancel = CancelFlag::new();
    if let Some(secs) = timeout {
        let flag = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            flag.cancel();
        });
    }
    cancel
}

fn cmd_init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{:?} existe déjà (utilisez --force pour l'écraser)", output);
    }
    save_config(&AnalysisConfig::default(), output)?;
    println!("Configuration écrite dans {}", output.display());
    Ok(())
}

fn cmd_stats(repo: &DrawRepository, config: &AnalysisConfig) -> Result<()> {
    let analysis = analyze(repo, config);
    let stats = compute_game_statistics(repo);
    display::display_game_statistics(&stats, &analysis);
    Ok(())
}

fn cmd_scores(repo: &DrawRepository, config: &AnalysisConfig, levels: &[ScoreLevel]) -> Result<()> {
    let analysis = analyze(repo, config);
    let scores: Vec<_> = analysis
        .scores
        .into_iter()
        .filter(|s| levels.is_empty() || levels.contains(&s.level))
        .collect();
    display::display_scores(&scores);
    Ok(())
}

fn cmd_search(
    repo: &DrawRepository,
    config: &AnalysisConfig,
    numbers: &[u8],
    size: Option<usize>,
    timeout: Option<u64>,
) -> Result<()> {
    let board = config.board();
    if let Some(&n) = numbers.iter().find(|&&n| !board.contains(n)) {
        bail!("Numéro {} hors limites ({}-{})", n, board.start, board.end);
    }
    let size = size.unwrap_or(config.numbers_per_game);
    let analysis = analyze(repo, config);

    let pb = spinner("Recherche des meilleures combinaisons...")?;
    let cancel = cancel_after(timeout);
    let result = find_best_combinations(numbers, &analysis.frequencies, size, &cancel);
    pb.finish_and_clear();

    let combinations = result.context("Recherche interrompue")?;
    display::display_combinations(&combinations, "Meilleures combinaisons");
    Ok(())
}

struct GenerateParams {
    levels: Vec<ScoreLevel>,
    games: usize,
    strategy: SelectionStrategy,
    reject: bool,
    validate: bool,
    seed: u64,
    output: Option<PathBuf>,
    timeout: Option<u64>,
}

/// Applique `--games` à la configuration puis la revalide.
fn with_games_override(mut config: AnalysisConfig, games: Option<usize>) -> Result<AnalysisConfig> {
    if let Some(games) = games {
        config.number_of_games = games;
        config.validate().context("Option --games invalide")?;
    }
    Ok(config)
}

fn check_grid(numbers: &[u8], board: &Board) -> Result<()> {
    validate_draw(numbers, board).context("Grille invalide")
}

fn cmd_generate(
    repo: &DrawRepository,
    config: &AnalysisConfig,
    params: &GenerateParams,
) -> Result<()> {
    let analysis = analyze(repo, config);
    let history = repo.historical_combinations();
    let options = GeneratorOptions {
        levels: &params.levels,
        games: params.games,
        size: config.numbers_per_game,
        strategy: params.strategy,
        rejection_threshold: params.reject.then_some(config.probability_threshold),
        history: params.validate.then_some(history.as_slice()),
    };
    log::debug!("Génération avec seed {}", params.seed);

    let pb = spinner("Génération des grilles...")?;
    let cancel = cancel_after(params.timeout);
    let mut rng = StdRng::seed_from_u64(params.seed);
    let result = generate_combinations(&analysis.scores, &options, &mut rng, &cancel);
    pb.finish_and_clear();

    let games = result.context("Génération interrompue")?;
    display::display_generated(&games);

    if let Some(path) = &params.output {
        let combinations: Vec<_> = games.iter().map(|g| g.combination.clone()).collect();
        export::write_export(path, &combinations)?;
        println!("Grilles exportées dans {}", path.display());
    }
    Ok(())
}

fn cmd_validate(repo: &DrawRepository, numbers: &[u8]) -> Result<()> {
    check_grid(numbers, repo.board())?;
    let result = validate_combination(numbers, &repo.historical_combinations());
    display::display_validation(numbers, &result);
    Ok(())
}

fn cmd_summary(repo: &DrawRepository, config: &AnalysisConfig) -> Result<()> {
    let analysis = analyze(repo, config);
    let stats = compute_game_statistics(repo);
    display::display_summary(&analysis, &stats);
    Ok(())
}

fn cmd_number(repo: &DrawRepository, config: &AnalysisConfig, number: u8) -> Result<()> {
    let analysis = analyze(repo, config);
    let stats = analysis.number_statistics(number).with_context(|| {
        format!(
            "Numéro {} hors limites ({}-{})",
            number, analysis.board.start, analysis.board.end
        )
    })?;
    display::display_number_statistics(&stats);
    Ok(())
}

fn cmd_simulate(repo: &DrawRepository, numbers: &[u8], iterations: usize, seed: u64) -> Result<()> {
    check_grid(numbers, repo.board())?;
    let pb = spinner("Simulation en cours...")?;
    let mut rng = StdRng::seed_from_u64(seed);
    let result = run_simulation(
        numbers,
        repo.board(),
        &PrizeTable::default(),
        iterations,
        &mut rng,
        &CancelFlag::new(),
    );
    pb.finish_and_clear();
    display::display_simulation(numbers, &result?);
    Ok(())
}

fn cmd_prizes(repo: &DrawRepository, numbers: &[u8], prize_config: &PrizeConfig) -> Result<()> {
    check_grid(numbers, repo.board())?;
    let summary = analyze_prizes(numbers, repo, &PrizeTable::default(), prize_config);
    display::display_prizes(numbers, &summary);
    Ok(())
}

fn cmd_heuristics(repo: &DrawRepository, params: ClusteringParams, numbers: &[u8]) -> Result<()> {
    let clusters = cluster_draws(repo, &params);
    let chain = MarkovChain::build(repo);
    let estimate = if numbers.is_empty() {
        None
    } else {
        Some((numbers, SvmModel::train(repo).predict(numbers)))
    };
    display::display_heuristics(&clusters, &chain, estimate);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_override_zero_rejected() {
        assert!(with_games_override(AnalysisConfig::default(), Some(0)).is_err());
    }

    #[test]
    fn test_games_override_applied() {
        let config = with_games_override(AnalysisConfig::default(), Some(3)).unwrap();
        assert_eq!(config.number_of_games, 3);
        let config = with_games_override(AnalysisConfig::default(), None).unwrap();
        assert_eq!(config.number_of_games, 10);
    }

    #[test]
    fn test_check_grid() {
        let board = Board::default();
        assert!(check_grid(&[5, 14, 23, 38, 41, 57], &board).is_ok());
        assert!(check_grid(&[0, 14, 23, 38, 41, 57], &board).is_err());
        assert!(check_grid(&[5, 14, 23, 38, 41, 61], &board).is_err());
        assert!(check_grid(&[5, 5, 23, 38, 41, 57], &board).is_err());
        assert!(check_grid(&[5, 14, 23], &board).is_err());
    }
}
