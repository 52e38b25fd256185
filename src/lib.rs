//! SAT-based Sudoku and Sudoku-pair generator and solver
//!
//! Puzzles of order k (k² × k² grids with k × k boxes) are encoded as CNF
//! over one boolean variable per (grid, row, column, value) and handed to
//! CaDiCaL. Pair mode stacks two grids that must also satisfy the diagonal
//! rules and differ at every cell.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod sudoku;
pub mod utils;

pub use config::Settings;
pub use error::SudokuError;
pub use puzzle::{GeneratedPuzzle, PuzzleGenerator, Solution, SolveOutcome, SudokuProblem};

use anyhow::{Context, Result};
use log::info;

/// Generate a puzzle as configured, write it to the configured CSV file and
/// return it
pub fn generate_puzzle(settings: &Settings) -> Result<GeneratedPuzzle> {
    let mut generator = PuzzleGenerator::from_settings(settings)?;
    let generated = generator.generate();
    generator.release();
    let generated = generated?;

    let output_file = &settings.generator.output_file;
    sudoku::save_grid_to_file(&generated.puzzle, output_file)
        .context("Failed to save generated puzzle")?;
    info!("Puzzle written to {}", output_file.display());

    if let Some(report_file) = &settings.output.report_file {
        generated
            .save_to_file(report_file)
            .context("Failed to save generation report")?;
    }

    Ok(generated)
}

/// Solve the configured puzzle file
pub fn solve_puzzle(settings: &Settings) -> Result<SolveOutcome> {
    let mut problem = SudokuProblem::new(settings)?;
    let outcome = problem.solve();
    problem.release();
    let outcome = outcome?;

    if let (Some(report_file), SolveOutcome::Solved(solution)) = (&settings.output.report_file, &outcome) {
        solution
            .save_to_file(report_file)
            .context("Failed to save solution report")?;
    }

    Ok(outcome)
}
