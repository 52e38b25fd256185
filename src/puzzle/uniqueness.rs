//! Solution-uniqueness checks via a blocking cardinality constraint

use crate::sat::{Cardinality, SatSolver, SudokuEncoder};
use crate::sudoku::Grid;
use anyhow::Result;
use log::trace;
use serde::{Deserialize, Serialize};

/// Where the blocking constraint of a check lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquenessStrategy {
    /// Add it inside a retractable scope of the shared oracle
    #[default]
    Scoped,
    /// Add it to a new oracle holding only the rule constraints
    FreshOracle,
}

/// Decides whether a partially filled grid has exactly one completion.
///
/// Solve once for a model M, forbid M with "at most |M|−1 of M's literals
/// are true", and solve again under the same clues. A second model means
/// a different completion exists.
#[derive(Debug, Clone)]
pub struct UniquenessChecker {
    strategy: UniquenessStrategy,
    checks: usize,
}

impl UniquenessChecker {
    pub fn new(strategy: UniquenessStrategy) -> Self {
        Self { strategy, checks: 0 }
    }

    pub fn strategy(&self) -> UniquenessStrategy {
        self.strategy
    }

    /// Number of checks performed so far
    pub fn checks(&self) -> usize {
        self.checks
    }

    /// True when the grid's clues admit exactly one solution
    pub fn has_unique_solution(&mut self, encoder: &mut SudokuEncoder, grid: &Grid) -> Result<bool> {
        self.checks += 1;
        let assumptions = encoder.assumptions(grid)?;

        let unique = match self.strategy {
            UniquenessStrategy::Scoped => Self::check_in_scope(encoder.solver_mut(), &assumptions)?,
            UniquenessStrategy::FreshOracle => {
                let mut oracle = encoder.fresh_oracle()?;
                let unique = Self::check_with_oracle(&mut oracle, &assumptions)?;
                oracle.release();
                unique
            }
        };

        trace!("uniqueness check #{} with {} clues: {}", self.checks, assumptions.len(), unique);
        Ok(unique)
    }

    fn blocking_constraint(model: Vec<i32>) -> Cardinality {
        let bound = model.len() - 1;
        Cardinality::at_most(model, bound)
    }

    fn check_in_scope(solver: &mut SatSolver, assumptions: &[i32]) -> Result<bool> {
        if !solver.solve(assumptions)? {
            return Ok(false);
        }
        let model = solver.model()?;
        if model.is_empty() {
            return Ok(true);
        }

        let scope = solver.open_scope();
        let second = solver
            .add_scoped_cardinality(&scope, &Self::blocking_constraint(model))
            .and_then(|_| solver.solve_in_scope(&scope, assumptions));
        solver.close_scope(scope)?;

        Ok(!second?)
    }

    fn check_with_oracle(oracle: &mut SatSolver, assumptions: &[i32]) -> Result<bool> {
        if !oracle.solve(assumptions)? {
            return Ok(false);
        }
        let model = oracle.model()?;
        if model.is_empty() {
            return Ok(true);
        }

        oracle.add_cardinality(&Self::blocking_constraint(model))?;
        Ok(!oracle.solve(assumptions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::{GridMode, Order, SudokuRules};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const STRATEGIES: [UniquenessStrategy; 2] =
        [UniquenessStrategy::Scoped, UniquenessStrategy::FreshOracle];

    fn order(k: i64) -> Order {
        Order::new(k).unwrap()
    }

    fn grid(rows: Vec<Vec<u32>>) -> Grid {
        Grid::from_rows(order(2), GridMode::Single, rows).unwrap()
    }

    fn solved_4x4() -> Grid {
        grid(vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 1],
        ])
    }

    /// Count completions by backtracking, stopping at `limit`
    fn brute_force_count(grid: &mut Grid, limit: usize) -> usize {
        let Some(idx) = (0..grid.rows() * grid.cols()).find(|&idx| grid.get(idx / grid.cols(), idx % grid.cols()) == 0) else {
            return usize::from(SudokuRules::is_solved(grid));
        };
        let (row, col) = (idx / grid.cols(), idx % grid.cols());

        let mut count = 0;
        for value in SudokuRules::candidates(grid, row, col) {
            grid.set(row, col, value).unwrap();
            count += brute_force_count(grid, limit - count);
            grid.set(row, col, 0).unwrap();
            if count >= limit {
                break;
            }
        }
        count
    }

    #[test]
    fn test_single_blank_is_unique() {
        for strategy in STRATEGIES {
            let mut encoder = SudokuEncoder::new(order(2), GridMode::Single).unwrap();
            let mut checker = UniquenessChecker::new(strategy);

            for (row, col) in solved_4x4().clue_positions() {
                let mut puzzle = solved_4x4();
                puzzle.clear(row, col).unwrap();
                assert!(checker.has_unique_solution(&mut encoder, &puzzle).unwrap());
            }
            assert_eq!(checker.checks(), 16);
        }
    }

    #[test]
    fn test_blank_grid_is_not_unique() {
        for strategy in STRATEGIES {
            let mut encoder = SudokuEncoder::new(order(2), GridMode::Single).unwrap();
            let mut checker = UniquenessChecker::new(strategy);
            let blank = Grid::new(order(2), GridMode::Single);
            assert!(!checker.has_unique_solution(&mut encoder, &blank).unwrap());
        }
    }

    #[test]
    fn test_inconsistent_clues_are_not_unique() {
        let mut encoder = SudokuEncoder::new(order(2), GridMode::Single).unwrap();
        let mut checker = UniquenessChecker::new(UniquenessStrategy::Scoped);
        let mut puzzle = Grid::new(order(2), GridMode::Single);
        puzzle.set(0, 0, 1).unwrap();
        puzzle.set(0, 1, 1).unwrap();
        assert!(!checker.has_unique_solution(&mut encoder, &puzzle).unwrap());
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);

        for (mode, solved) in [
            (GridMode::Single, solved_4x4()),
            (GridMode::Pair, {
                let mut encoder = SudokuEncoder::new(order(2), GridMode::Pair).unwrap();
                encoder.solve(&Grid::new(order(2), GridMode::Pair)).unwrap().unwrap()
            }),
        ] {
            let mut encoder = SudokuEncoder::new(order(2), mode).unwrap();
            let mut checkers = STRATEGIES.map(UniquenessChecker::new);

            for round in 0..40 {
                let mut puzzle = solved.clone();
                let mut positions = puzzle.clue_positions();
                positions.shuffle(&mut rng);
                for &(row, col) in positions.iter().take(4 + round % (positions.len() - 4)) {
                    puzzle.clear(row, col).unwrap();
                }

                let expected = brute_force_count(&mut puzzle.clone(), 2) == 1;
                for checker in checkers.iter_mut() {
                    assert_eq!(
                        checker.has_unique_solution(&mut encoder, &puzzle).unwrap(),
                        expected,
                        "{:?} {:?} round {}:\n{}",
                        checker.strategy(),
                        mode,
                        round,
                        puzzle
                    );
                }
            }
        }
    }

    #[test]
    fn test_blocking_constraints_do_not_leak() {
        // Exactly two completions
        let two_solutions = grid(vec![
            vec![0, 0, 0, 4],
            vec![0, 4, 1, 0],
            vec![2, 0, 0, 0],
            vec![0, 0, 2, 0],
        ]);
        let first = solved_4x4();
        let second = grid(vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 3, 4, 1],
            vec![4, 1, 2, 3],
        ]);

        let mut encoder = SudokuEncoder::new(order(2), GridMode::Single).unwrap();
        let mut checker = UniquenessChecker::new(UniquenessStrategy::Scoped);

        assert!(!checker.has_unique_solution(&mut encoder, &two_solutions).unwrap());
        // Whichever completion was blocked above must still be reachable
        assert!(checker.has_unique_solution(&mut encoder, &first).unwrap());
        assert!(checker.has_unique_solution(&mut encoder, &second).unwrap());
        assert!(!checker.has_unique_solution(&mut encoder, &two_solutions).unwrap());
    }
}
