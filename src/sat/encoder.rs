//! SAT encoder tying rule constraints, the oracle and model decoding together

use super::constraints::ConstraintStatistics;
use super::{ConstraintGenerator, ModelDecoder, SatSolver, SolverStatistics, VariableEncoder};
use crate::error::SudokuError;
use crate::sudoku::{Grid, GridMode, Order};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;

/// Encoder for one run: the rule set is loaded into the oracle once and
/// every query varies only the assumptions.
pub struct SudokuEncoder {
    constraint_generator: ConstraintGenerator,
    solver: SatSolver,
    decoder: ModelDecoder,
}

impl SudokuEncoder {
    /// Build the rule constraints for `order` and `mode` and load them into a new oracle
    pub fn new(order: Order, mode: GridMode) -> Result<Self> {
        let mut constraint_generator = ConstraintGenerator::new(order, mode);
        let solver = Self::load_rules(&mut constraint_generator)?;
        let stats = constraint_generator.statistics();

        info!(
            "Encoded k={} {:?} rules: {} variables, {} clauses",
            order,
            mode,
            stats.total_variables,
            solver.clause_count()
        );

        Ok(Self {
            decoder: ModelDecoder::new(*constraint_generator.variable_encoder()),
            constraint_generator,
            solver,
        })
    }

    fn load_rules(constraint_generator: &mut ConstraintGenerator) -> Result<SatSolver> {
        let constraints = constraint_generator
            .generate_all_constraints()
            .context("Failed to generate SAT constraints")?;

        let mut solver = SatSolver::new();
        solver
            .add_constraints(&constraints)
            .context("Failed to add constraints to SAT solver")?;
        Ok(solver)
    }

    /// A new oracle seeded with only the base rule constraints
    pub fn fresh_oracle(&self) -> Result<SatSolver> {
        let encoder = self.variable_encoder();
        debug!("Building fresh oracle for k={} {:?}", encoder.order(), encoder.mode());
        Self::load_rules(&mut ConstraintGenerator::new(encoder.order(), encoder.mode()))
    }

    pub fn order(&self) -> Order {
        self.variable_encoder().order()
    }

    pub fn mode(&self) -> GridMode {
        self.variable_encoder().mode()
    }

    pub fn variable_encoder(&self) -> &VariableEncoder {
        self.constraint_generator.variable_encoder()
    }

    pub fn decoder(&self) -> &ModelDecoder {
        &self.decoder
    }

    /// The oracle holding the rule set
    pub fn solver_mut(&mut self) -> &mut SatSolver {
        &mut self.solver
    }

    /// One positive literal per filled cell of the grid
    pub fn assumptions(&self, grid: &Grid) -> Result<Vec<i32>> {
        let encoder = self.variable_encoder();
        if grid.order() != encoder.order() || grid.mode() != encoder.mode() {
            return Err(SudokuError::DimensionMismatch {
                expected: format!("k={} {:?}", encoder.order(), encoder.mode()),
                found: format!("k={} {:?}", grid.order(), grid.mode()),
            }
            .into());
        }

        let n = grid.side();
        grid.clue_positions()
            .into_iter()
            .map(|(row, col)| encoder.literal(row / n, row % n, col, grid.get(row, col)))
            .collect()
    }

    /// Solve under raw assumption literals and decode the model
    pub fn solve_assumptions(&mut self, assumptions: &[i32]) -> Result<Option<Grid>> {
        if !self.solver.solve(assumptions)? {
            return Ok(None);
        }
        let model = self.solver.model()?;
        Ok(Some(self.decoder.decode(&model)?))
    }

    /// Complete a partially filled grid, if any completion exists
    pub fn solve(&mut self, grid: &Grid) -> Result<Option<Grid>> {
        let assumptions = self.assumptions(grid)?;
        self.solve_assumptions(&assumptions)
    }

    /// Count completions of a grid, stopping at `limit`
    pub fn count_solutions(&mut self, grid: &Grid, limit: usize) -> Result<usize> {
        let assumptions = self.assumptions(grid)?;
        self.solver.count_solutions(&assumptions, limit)
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            order: self.order(),
            mode: self.mode(),
            constraints: self.constraint_generator.statistics(),
            solver: self.solver.statistics(),
        }
    }

    /// Release the oracle
    pub fn release(self) {
        self.solver.release();
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub order: Order,
    pub mode: GridMode,
    pub constraints: ConstraintStatistics,
    pub solver: SolverStatistics,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics (k = {}, {:?}):", self.order, self.mode)?;
        write!(f, "{}", self.constraints)?;
        write!(f, "{}", self.solver)?;
        Ok(())
    }
}
