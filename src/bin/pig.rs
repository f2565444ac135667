//! Command-line front end for the Pig solver.
//!
//! ```text
//! pig solve --goal 100 --me 25 --you 32 --pending 8
//! pig play hold_at(20) optimal_win --seed 3
//! pig compare --goal 100 --samples 10
//! pig tournament --config configs/tournament.json --output report.json
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) for solver and tournament logging.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use pig_solver::game::{GameState, Goal, PigConfig, Player, DEFAULT_GOAL};
use pig_solver::simulation::{MatchRunner, RandomDie, Tournament, Victory};
use pig_solver::solver::{PigSolver, UtilityKind};
use pig_solver::strategy::build_strategy;

#[derive(Parser)]
#[command(author, version, about = "Optimal play for the dice game Pig", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Value and best action for a single state")]
    Solve {
        #[arg(long, default_value_t = DEFAULT_GOAL)]
        goal: u32,
        #[arg(long, help = "Banked score of the player to move")]
        me: u32,
        #[arg(long, help = "Banked score of the opponent")]
        you: u32,
        #[arg(long, default_value_t = 0)]
        pending: u32,
        #[arg(long, default_value = "win", help = "win or diff")]
        utility: UtilityKind,
    },
    #[command(about = "Play one match between two strategies")]
    Play {
        #[arg(required = true)]
        first: String,
        #[arg(required = true)]
        second: String,
        #[arg(long, default_value_t = DEFAULT_GOAL)]
        goal: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    #[command(about = "Count states where the two utilities disagree")]
    Compare {
        #[arg(long, default_value_t = DEFAULT_GOAL)]
        goal: u32,
        #[arg(long, default_value_t = 10)]
        samples: usize,
    },
    #[command(about = "Round-robin between a roster of strategies")]
    Tournament {
        #[arg(long, help = "JSON config file; defaults are used otherwise")]
        config: Option<PathBuf>,
        #[arg(long)]
        goal: Option<u32>,
        #[arg(long)]
        games: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, help = "Write the JSON report here")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Solve {
            goal,
            me,
            you,
            pending,
            utility,
        } => solve(goal, me, you, pending, utility),
        Command::Play {
            first,
            second,
            goal,
            seed,
        } => play(&first, &second, goal, seed),
        Command::Compare { goal, samples } => compare(goal, samples),
        Command::Tournament {
            config,
            goal,
            games,
            seed,
            output,
        } => tournament(config, goal, games, seed, output),
    }
}

fn solve(goal: u32, me: u32, you: u32, pending: u32, utility: UtilityKind) -> Result<()> {
    let goal = Goal::new(goal)?;
    let solver = PigSolver::new(goal);
    let state = GameState::new(Player::First, me, you, pending);

    let start = Instant::now();
    let value = solver.solve(&state, utility);
    let elapsed = start.elapsed();

    println!("State: {} (goal {})", state, goal);
    println!("Utility: {}", utility);
    println!("Value: {:.6}", value);
    for (action, q) in solver.action_values(&state, utility) {
        println!("  {:<4} {:.6}", action, q);
    }
    println!("Best action: {}", solver.best_action(&state, utility));

    let stats = solver.cache_stats(utility);
    println!(
        "Solved in {:.3}s ({} cached states, ~{} KiB)",
        elapsed.as_secs_f64(),
        stats.entries,
        solver.cache_memory_usage(utility) / 1024
    );
    Ok(())
}

fn play(first: &str, second: &str, goal: u32, seed: Option<u64>) -> Result<()> {
    let solver = PigSolver::new(Goal::new(goal)?);
    let a = build_strategy(first, &solver, seed)?;
    let b = build_strategy(second, &solver, seed.map(|s| s.wrapping_add(1)))?;

    let runner = MatchRunner::new(solver.goal())
        .with_decision_limit(PigConfig::default().decision_limit);
    let mut dice = RandomDie::new(seed);
    let outcome = runner.play(&*a, &*b, &mut dice)?;

    println!(
        "{} ({}) beats {}",
        outcome.winner.name(),
        outcome.winning_seat,
        outcome.loser.name()
    );
    match &outcome.victory {
        Victory::ReachedGoal => {
            let state = outcome.final_state;
            println!(
                "Final score: {}-{}",
                state.score_of(outcome.winning_seat),
                state.score_of(outcome.winning_seat.other())
            );
        }
        Victory::Forfeit(reason) => println!("By forfeit: {}", reason),
    }
    println!("{} decisions, {} rolls", outcome.decisions, outcome.rolls);
    Ok(())
}

fn compare(goal: u32, samples: usize) -> Result<()> {
    let solver = PigSolver::new(Goal::new(goal)?);
    let comparison = solver.compare_policies(samples);

    println!("Goal: {}", comparison.goal);
    println!("Decision states: {}", comparison.states);
    println!(
        "Disagreements: {} ({:.2}%)",
        comparison.disagreements,
        100.0 * comparison.disagreement_rate()
    );
    for d in &comparison.samples {
        println!(
            "  {}  win: {}  diff: {}",
            d.state, d.win_probability, d.score_differential
        );
    }
    Ok(())
}

fn tournament(
    config: Option<PathBuf>,
    goal: Option<u32>,
    games: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config {
        Some(path) => PigConfig::from_json_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PigConfig::default(),
    };
    if let Some(goal) = goal {
        config = config.with_goal(goal);
    }
    if let Some(games) = games {
        config = config.with_games_per_pair(games);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config.validate()?;

    let solver = PigSolver::new(config.goal()?);
    let warmed = solver.warm_up(UtilityKind::WinProbability);
    info!("Warmed win-probability cache: {} states", warmed.entries);
    if config.roster.iter().any(|s| s.trim() == "optimal_diff") {
        solver.warm_up(UtilityKind::ScoreDifferential);
    }

    let tournament = Tournament::from_config(&config, solver)?;

    let bar = ProgressBar::new(tournament.match_count() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{wide_bar} {pos}/{len} matches [{elapsed_precise}] ETA {eta}")?,
    );
    bar.enable_steady_tick(Duration::from_millis(200));
    let report = tournament.run_with_progress(|| bar.inc(1))?;
    bar.finish_and_clear();

    println!(
        "Goal {}, {} games per pairing, seed {}",
        report.goal, report.games_per_pair, report.seed
    );
    println!(
        "{:<16} {:>8} {:>8} {:>8} {:>10} {:>7}",
        "strategy", "wins", "losses", "forfeits", "stalemates", "win%"
    );
    for s in &report.standings {
        println!(
            "{:<16} {:>8} {:>8} {:>8} {:>10} {:>6.1}%",
            s.name,
            s.wins,
            s.losses,
            s.forfeits,
            s.stalemates,
            100.0 * s.win_rate()
        );
    }

    if let Some(path) = output {
        fs::write(&path, report.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
