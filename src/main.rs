//! Command line interface for the Sudoku pair generator and solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pretty_env_logger::formatted_builder;
use std::path::{Path, PathBuf};
use std::time::Instant;
use sudoku_pair_sat::{
    config::{CliOverrides, OutputFormat, Settings},
    puzzle::{SolutionValidator, SolveOutcome, UniquenessStrategy},
    sudoku::{create_example_puzzles, load_grid_from_file, GridMode, Order},
    utils::{ColorOutput, GridFormatter},
};

#[derive(Parser)]
#[command(name = "sudoku_pair_sat")]
#[command(about = "SAT-based Sudoku pair generator and solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a puzzle with a unique solution
    Generate {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Order k of the puzzle (overrides config)
        #[arg(short = 'k', long)]
        order: Option<i64>,

        /// Output CSV path (overrides config)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,

        /// Generate a single grid instead of a pair
        #[arg(long)]
        single: bool,

        /// Give up seeding after this many unsatisfiable draws
        #[arg(long)]
        max_attempts: Option<usize>,

        /// Check uniqueness on a new oracle per check
        #[arg(long)]
        fresh_oracle: bool,

        /// Write a JSON report of the run to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Solve a puzzle file
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Order k of the puzzle (overrides config)
        #[arg(short = 'k', long)]
        order: Option<i64>,

        /// Puzzle CSV path (overrides config)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Read the file as a stacked pair of grids
        #[arg(long)]
        pair: bool,

        /// Write a JSON report of the solution to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check a puzzle or solution file against the rules
    Validate {
        /// Order k of the puzzle
        #[arg(short = 'k', long, default_value_t = 2)]
        order: i64,

        /// Puzzle CSV path
        #[arg(short, long)]
        path: PathBuf,

        /// Read the file as a stacked pair of grids
        #[arg(long)]
        pair: bool,
    },

    /// Create a default configuration and example puzzles
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            order,
            path,
            seed,
            single,
            max_attempts,
            fresh_oracle,
            json,
            verbose,
        } => {
            init_logger(verbose)?;
            let overrides = CliOverrides {
                generator_order: order,
                generator_mode: single.then_some(GridMode::Single),
                output_file: path,
                seed,
                max_seed_attempts: max_attempts,
                uniqueness: fresh_oracle.then_some(UniquenessStrategy::FreshOracle),
                report_file: json,
                ..Default::default()
            };
            generate_command(&config, &overrides)
        }
        Commands::Solve {
            config,
            order,
            path,
            pair,
            json,
            verbose,
        } => {
            init_logger(verbose)?;
            let overrides = CliOverrides {
                solver_order: order,
                solver_mode: pair.then_some(GridMode::Pair),
                input_file: path,
                report_file: json,
                ..Default::default()
            };
            solve_command(&config, &overrides)
        }
        Commands::Validate { order, path, pair } => {
            init_logger(false)?;
            validate_command(order, &path, pair)
        }
        Commands::Setup { directory, force } => {
            init_logger(false)?;
            setup_command(&directory, force)
        }
    }
}

/// `RUST_LOG` wins; otherwise library logs at info with `--verbose` and warn without
fn init_logger(verbose: bool) -> Result<()> {
    let mut builder = formatted_builder();

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else if verbose {
        builder.parse_filters("sudoku_pair_sat=info");
    } else {
        builder.parse_filters("sudoku_pair_sat=warn");
    }

    builder.try_init().context("Failed to initialize the logger")
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        log::warn!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn generate_command(config_path: &Path, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;

    let generated = sudoku_pair_sat::generate_puzzle(&settings).context("Failed to generate puzzle")?;

    match settings.output.format {
        OutputFormat::Text => println!("{}", GridFormatter::format_generation_summary(&generated)),
        OutputFormat::Json => println!("{}", generated.to_json()?),
    }
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Puzzle written to {}",
            settings.generator.output_file.display()
        ))
    );

    Ok(())
}

fn solve_command(config_path: &Path, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;
    let start_time = Instant::now();

    let outcome = sudoku_pair_sat::solve_puzzle(&settings).context("Failed to solve puzzle")?;

    match outcome {
        SolveOutcome::Solved(solution) => {
            println!("{}", ColorOutput::success("Solved"));
            match settings.output.format {
                OutputFormat::Text => print!("{}", GridFormatter::format_grid(&solution.solved)),
                OutputFormat::Json => println!("{}", solution.to_json()?),
            }
        }
        SolveOutcome::NoSolution => {
            println!("{}", ColorOutput::error("No solution exists"));
        }
    }

    log::info!("Total time {:.3}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn validate_command(order: i64, path: &Path, pair: bool) -> Result<()> {
    let order = Order::new(order)?;
    let mode = if pair { GridMode::Pair } else { GridMode::Single };
    let grid = load_grid_from_file(path, order, mode)
        .with_context(|| format!("Failed to load puzzle from {}", path.display()))?;

    let result = SolutionValidator::new().validate_puzzle(&grid);
    print!("{}", GridFormatter::format_grid(&grid));
    println!();
    print!("{}", result);

    if !result.is_valid {
        println!("{}", ColorOutput::error("Puzzle breaks the rules"));
    } else if grid.is_complete() {
        println!("{}", ColorOutput::success("Grid is a valid solution"));
    } else {
        println!(
            "{}",
            ColorOutput::info(&format!("Clues are consistent ({} empty cells)", grid.empty_count()))
        );
    }

    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let cases_dir = directory.join("TestCases");

    for dir in [&config_dir, &cases_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&cases_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", cases_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: cargo run -- solve -p TestCases/test_case2.csv");
    println!("3. Run: cargo run -- generate -k 3 --seed 1");

    Ok(())
}
