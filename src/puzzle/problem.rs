//! Single-puzzle solving

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::sat::{EncodingStatistics, SudokuEncoder};
use crate::sudoku::{load_grid_from_file, Grid, Order};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Outcome of solving one puzzle
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved(Solution),
    NoSolution,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::NoSolution => None,
        }
    }
}

/// A puzzle loaded for solving
pub struct SudokuProblem {
    grid: Grid,
    encoder: SudokuEncoder,
    validator: SolutionValidator,
}

impl SudokuProblem {
    /// Load the puzzle named in the `solver` section of the settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let config = &settings.solver;
        let order = Order::new(config.order)?;
        let grid = load_grid_from_file(&config.input_file, order, config.mode)
            .context("Failed to load puzzle file")?;

        Self::with_grid(grid)
    }

    /// Create a problem from an in-memory grid
    pub fn with_grid(grid: Grid) -> Result<Self> {
        let encoder = SudokuEncoder::new(grid.order(), grid.mode())?;

        Ok(Self {
            grid,
            encoder,
            validator: SolutionValidator::new(),
        })
    }

    /// Solve with a single oracle call
    pub fn solve(&mut self) -> Result<SolveOutcome> {
        let start_time = Instant::now();
        info!(
            "Solving {}x{} puzzle with {} clues",
            self.grid.rows(),
            self.grid.cols(),
            self.grid.clue_count()
        );

        let Some(solved) = self.encoder.solve(&self.grid).context("SAT solving failed")? else {
            info!("No solution exists");
            return Ok(SolveOutcome::NoSolution);
        };
        let solve_time = start_time.elapsed();

        let validation = self.validator.validate(&self.grid, &solved)?;
        if !validation.is_valid {
            anyhow::bail!(
                "Decoded solution failed validation: {}",
                validation.error_message.unwrap_or_default()
            );
        }

        info!("Solved in {:.3}s", solve_time.as_secs_f64());
        Ok(SolveOutcome::Solved(Solution::new(self.grid.clone(), solved, solve_time)))
    }

    /// Get the puzzle grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoder.statistics()
    }

    /// Release the oracle
    pub fn release(self) {
        self.encoder.release();
    }
}
