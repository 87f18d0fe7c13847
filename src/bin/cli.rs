//! Wagersim CLI - evaluate a betting strategy from model predictions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wagersim::backtesting::metrics::{analyze_by_odds_range, analyze_by_side};
use wagersim::backtesting::{
    calculate_metrics, calculate_sharpe_ratio, BetRecord, BetRecordBuilder, MonteCarloSimulator,
    DEFAULT_BINS,
};
use wagersim::config::{load_config, read_config, validate_config, AppConfig};
use wagersim::core::{american_to_decimal, implied_probability, StakingPolicy};
use wagersim::data::load_games;

const DEFAULT_CONFIG: &str = "config.toml";

#[derive(Parser)]
#[command(name = "wagersim")]
#[command(author, version, about = "Monte Carlo capital allocation evaluation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build bet records and run the Monte Carlo simulation
    Simulate {
        /// Number of simulated histories (overrides config)
        #[arg(long)]
        runs: Option<usize>,

        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Histogram CSV destination (overrides config)
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Staking strategy: flat or kelly (overrides config)
        #[arg(long)]
        strategy: Option<String>,
    },

    /// Build bet records and print or export them
    Records {
        /// Write all records as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Number of records to print
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Convert American odds to decimal odds
    Odds {
        /// American odds values (e.g., -110 150)
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Simulate {
            runs,
            seed,
            plot,
            strategy,
        } => {
            // Overrides apply before validation so a flag can replace a bad value
            let mut config = read_config(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?;
            if let Some(runs) = runs {
                config.simulation.num_runs = runs;
            }
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            if plot.is_some() {
                config.simulation.plot_path = plot;
            }
            if let Some(strategy) = strategy {
                config.stake.strategy = strategy;
            }
            validate_config(&config).context("Invalid configuration")?;

            run_simulation(&config)?;
        }
        Commands::Records { json, top } => {
            let config = load_config(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?;
            print_records(&config, json.as_deref(), top)?;
        }
        Commands::Odds { values } => {
            print_odds(&values);
        }
    }

    Ok(())
}

/// Load games and build bet records for the configured policy
fn load_records(config: &AppConfig) -> Result<(StakingPolicy, Vec<BetRecord>)> {
    // Resolve the strategy before reading any rows
    let builder = BetRecordBuilder::from_policy(
        config.stake.policy().context("Invalid staking configuration")?,
    );

    let games = load_games(&config.data.path, &config.data.columns)
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;
    let records = builder.build(&games);

    Ok((builder.policy().clone(), records))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

fn run_simulation(config: &AppConfig) -> Result<()> {
    println!("{}", "Running capital allocation evaluation...".green());
    println!("Strategy: {}", config.stake.strategy);
    println!("Flat stake: {:.2}", config.stake.flat_size);
    println!("Initial bankroll: {:.2}", config.stake.bankroll);
    println!("Simulations: {}", config.simulation.num_runs);
    if let Some(seed) = config.simulation.seed {
        println!("Seed: {}", seed);
    }
    println!();

    let pb = spinner("Loading data and building bet records...");
    let (policy, records) = load_records(config)?;
    pb.finish_and_clear();

    print_metrics(&records, policy.initial_bankroll);

    let simulator = MonteCarloSimulator::new(&records);
    let cal = simulator.calibration();
    println!("\n{}", "Calibration:".yellow().bold());
    println!(
        "Bets per history: {} ({} wins / {} losses)",
        simulator.num_bets(),
        cal.wins,
        cal.losses
    );
    println!("Posterior win rate: {:.3}", cal.posterior_mean());
    println!("Win payoff: {:.2} +/- {:.2}", cal.avg_win, cal.std_win);
    println!("Loss payoff: {:.2} +/- {:.2}", cal.avg_loss, cal.std_loss);

    let pb = spinner("Running Monte Carlo simulation...");
    let outcome = simulator
        .run_seeded(config.simulation.num_runs, config.simulation.seed)
        .context("Monte Carlo simulation failed")?;
    pb.finish_and_clear();

    println!("\n{}", "Monte Carlo Summary:".yellow().bold());
    println!("{}", outcome.summary.report());

    if let Some(ref path) = config.simulation.plot_path {
        outcome
            .save_histogram(path, DEFAULT_BINS)
            .with_context(|| format!("Failed to write histogram to {}", path.display()))?;
        info!(path = %path.display(), "Histogram saved");
    }

    Ok(())
}

fn print_metrics(records: &[BetRecord], initial_bankroll: f64) {
    let metrics = calculate_metrics(records, initial_bankroll);

    println!("{}", "=".repeat(60));
    println!("REALIZED RESULTS");
    println!("{}", "=".repeat(60));
    println!("Total bets: {}", metrics.total_bets);
    println!("Bets with stake: {}", metrics.placed_bets);
    println!("Winning bets: {}", metrics.winning_bets);
    println!("Hit rate: {:.1}%", metrics.hit_rate * 100.0);
    println!("{}", "-".repeat(60));
    println!("Total stake: {:.2}", metrics.total_stake);
    println!("Net profit: {:.2}", metrics.net_profit);
    println!("Final bankroll: {:.2}", metrics.final_bankroll);
    println!("ROI: {:.1}%", metrics.roi * 100.0);
    println!("{}", "-".repeat(60));
    println!("Average EV: {:.3}", metrics.avg_ev);
    println!("Average decimal odds: {:.2}", metrics.avg_odds);
    println!("Profit factor: {:.2}", metrics.profit_factor);
    println!(
        "Max drawdown: {:.2} ({:.1}%)",
        metrics.max_drawdown,
        metrics.max_drawdown_pct * 100.0
    );
    println!("Sharpe (per bet): {:.3}", calculate_sharpe_ratio(records, 0.0));
    println!("{}", "=".repeat(60));

    if records.is_empty() {
        return;
    }

    for (title, analysis) in [
        ("Analysis by Side:", analyze_by_side(records)),
        ("Analysis by Odds Range:", analyze_by_odds_range(records)),
    ] {
        println!("\n{}", title.yellow().bold());
        println!(
            "{:>16} {:>8} {:>8} {:>10} {:>12} {:>10}",
            "Group", "Bets", "Wins", "Hit Rate", "Profit", "ROI"
        );
        println!("{}", "-".repeat(69));
        for a in &analysis {
            println!(
                "{:>16} {:>8} {:>8} {:>9.1}% {:>12.2} {:>9.1}%",
                a.key,
                a.bets,
                a.wins,
                a.hit_rate * 100.0,
                a.profit,
                a.roi * 100.0
            );
        }
    }
}

fn print_records(config: &AppConfig, json: Option<&Path>, top: usize) -> Result<()> {
    let (_, records) = load_records(config)?;

    println!(
        "{:>5} {:>9} {:>10} {:>10} {:>6} {:>7} {:>12}",
        "#", "Side", "Stake", "PnL", "Win", "Odds", "Bankroll"
    );
    println!("{}", "-".repeat(65));
    for (i, r) in records.iter().take(top).enumerate() {
        let pnl = format!("{:.2}", r.pnl);
        let pnl = if r.pnl >= 0.0 { pnl.green() } else { pnl.red() };
        println!(
            "{:>5} {:>9} {:>10.2} {:>10} {:>6} {:>7.3} {:>12.2}",
            i + 1,
            r.side.as_str(),
            r.stake,
            pnl,
            if r.win { "yes" } else { "no" },
            r.odds_dec,
            r.bankroll_after
        );
    }
    if records.len() > top {
        println!("... {} more", records.len() - top);
    }

    if let Some(path) = json {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &records).context("Failed to write records")?;
        println!("\nWrote {} records to {}", records.len(), path.display());
    }

    Ok(())
}

fn print_odds(values: &[f64]) {
    println!("{:>10} {:>10} {:>10}", "American", "Decimal", "Implied");
    println!("{}", "-".repeat(32));
    for &odds in values {
        let dec = american_to_decimal(odds);
        println!(
            "{:>+10} {:>10.3} {:>9.1}%",
            odds,
            dec,
            implied_probability(dec) * 100.0
        );
    }
}
