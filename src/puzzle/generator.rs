//! Random puzzle generation: seed a solved grid, then strip clues while
//! the solution stays unique

use super::solution::{GeneratedPuzzle, GenerationStats};
use super::uniqueness::{UniquenessChecker, UniquenessStrategy};
use super::SolutionValidator;
use crate::config::Settings;
use crate::error::SudokuError;
use crate::sat::SudokuEncoder;
use crate::sudoku::{Grid, GridMode, Order};
use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Knobs for a generator run
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Seed for the generator's random source; drawn from entropy when unset
    pub seed: Option<u64>,
    /// Give up seeding after this many unsatisfiable draws; unbounded when unset
    pub max_seed_attempts: Option<usize>,
    pub uniqueness: UniquenessStrategy,
}

/// A fully solved grid produced by the seeding phase
#[derive(Debug, Clone)]
pub struct SeededGrid {
    pub grid: Grid,
    pub attempts: usize,
}

/// Result of the clue-removal phase
#[derive(Debug, Clone)]
pub struct MinimizedPuzzle {
    pub puzzle: Grid,
    pub removed: usize,
}

/// Generates puzzles with exactly one solution
pub struct PuzzleGenerator {
    encoder: SudokuEncoder,
    checker: UniquenessChecker,
    validator: SolutionValidator,
    rng: StdRng,
    seed: u64,
    max_seed_attempts: Option<usize>,
}

impl PuzzleGenerator {
    /// Build the rule set for `order`/`mode` and seed the random source
    pub fn new(order: Order, mode: GridMode, options: GeneratorOptions) -> Result<Self> {
        let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let encoder = SudokuEncoder::new(order, mode).context("Failed to encode puzzle rules")?;
        debug!("Generator seeded with {}", seed);

        Ok(Self {
            encoder,
            checker: UniquenessChecker::new(options.uniqueness),
            validator: SolutionValidator::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            max_seed_attempts: options.max_seed_attempts,
        })
    }

    /// Create a generator from the `generator` section of the settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let config = &settings.generator;
        let order = Order::new(config.order)?;
        Self::new(
            order,
            config.mode,
            GeneratorOptions {
                seed: config.seed,
                max_seed_attempts: config.max_seed_attempts,
                uniqueness: config.uniqueness,
            },
        )
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw between n and 2n random (row, column, value) clues.
    ///
    /// Draws may repeat a cell or contradict each other; the oracle sorts
    /// that out.
    pub fn random_clues(&mut self) -> Vec<(usize, usize, u32)> {
        let n = self.encoder.order().side();
        let rows = self.encoder.mode().grid_count() * n;
        let count = self.rng.gen_range(n..=2 * n);

        (0..count)
            .map(|_| {
                (
                    self.rng.gen_range(0..rows),
                    self.rng.gen_range(0..n),
                    self.rng.gen_range(1..=n as u32),
                )
            })
            .collect()
    }

    /// Phase 1: find a fully solved grid from random clue assumptions
    pub fn seed_solution(&mut self) -> Result<SeededGrid> {
        let n = self.encoder.order().side();
        let mut attempts = 0;

        loop {
            if let Some(limit) = self.max_seed_attempts {
                if attempts >= limit {
                    return Err(SudokuError::RetryLimitExceeded { attempts }.into());
                }
            }
            attempts += 1;

            let assumptions = self
                .random_clues()
                .into_iter()
                .map(|(row, col, value)| {
                    self.encoder
                        .variable_encoder()
                        .literal(row / n, row % n, col, value)
                })
                .collect::<Result<Vec<_>>>()?;

            if let Some(grid) = self.encoder.solve_assumptions(&assumptions)? {
                let blank = Grid::new(grid.order(), grid.mode());
                let validation = self.validator.validate(&blank, &grid)?;
                if !validation.is_valid {
                    anyhow::bail!(
                        "Seed grid failed validation: {}",
                        validation.error_message.unwrap_or_default()
                    );
                }
                info!("Seeded a solved grid after {} attempt(s)", attempts);
                return Ok(SeededGrid { grid, attempts });
            }

            debug!(
                "Seed attempt {} with {} assumptions was unsatisfiable",
                attempts,
                assumptions.len()
            );
        }
    }

    /// Phase 2: visit clues in random order and drop each one whose removal
    /// keeps the solution unique
    pub fn minimize(&mut self, solved: &Grid) -> Result<MinimizedPuzzle> {
        let mut puzzle = solved.clone();
        let mut positions = puzzle.clue_positions();
        positions.shuffle(&mut self.rng);

        let total = positions.len();
        let mut removed = 0;
        for (visited, (row, col)) in positions.into_iter().enumerate() {
            let value = puzzle.clear(row, col)?;
            if self.checker.has_unique_solution(&mut self.encoder, &puzzle)? {
                removed += 1;
            } else {
                puzzle.set(row, col, value)?;
            }

            if (visited + 1) % puzzle.cols() == 0 {
                debug!("Visited {}/{} clues, removed {}", visited + 1, total, removed);
            }
        }

        info!("Removed {} of {} clues", removed, total);
        Ok(MinimizedPuzzle { puzzle, removed })
    }

    /// Generate a puzzle with a unique solution
    pub fn generate(&mut self) -> Result<GeneratedPuzzle> {
        let start_time = Instant::now();

        let seeded = self.seed_solution().context("Failed to seed a solved grid")?;
        let minimized = self
            .minimize(&seeded.grid)
            .context("Failed to remove clues")?;

        let validation = self.validator.validate(&minimized.puzzle, &seeded.grid)?;
        if !validation.is_valid {
            anyhow::bail!(
                "Generated puzzle failed validation: {}",
                validation.error_message.unwrap_or_default()
            );
        }

        let stats = GenerationStats {
            seed: self.seed,
            seed_attempts: seeded.attempts,
            clues_removed: minimized.removed,
            clues_remaining: minimized.puzzle.clue_count(),
            uniqueness_checks: self.checker.checks(),
            uniqueness: self.checker.strategy(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(GeneratedPuzzle::new(minimized.puzzle, seeded.grid, stats))
    }

    /// Access the encoder (for statistics and follow-up queries)
    pub fn encoder_mut(&mut self) -> &mut SudokuEncoder {
        &mut self.encoder
    }

    /// Release the oracle
    pub fn release(self) {
        self.encoder.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::SudokuRules;

    fn generator(k: i64, mode: GridMode, seed: u64) -> PuzzleGenerator {
        PuzzleGenerator::new(
            Order::new(k).unwrap(),
            mode,
            GeneratorOptions {
                seed: Some(seed),
                max_seed_attempts: Some(10_000),
                uniqueness: UniquenessStrategy::Scoped,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_random_clues_in_range() {
        let mut gen = generator(3, GridMode::Pair, 1);
        for _ in 0..50 {
            let clues = gen.random_clues();
            assert!((9..=18).contains(&clues.len()));
            for (row, col, value) in clues {
                assert!(row < 18);
                assert!(col < 9);
                assert!((1..=9).contains(&value));
            }
        }
    }

    #[test]
    fn test_seed_terminates() {
        for (k, mode) in [
            (2, GridMode::Single),
            (2, GridMode::Pair),
            (3, GridMode::Single),
            (3, GridMode::Pair),
        ] {
            let mut gen = generator(k, mode, 42);
            let seeded = gen.seed_solution().unwrap();
            assert!(seeded.attempts <= 10_000);
            assert!(SudokuRules::is_solved(&seeded.grid), "k={} {:?}", k, mode);
        }
    }

    #[test]
    fn test_same_seed_same_puzzle() {
        let first = generator(2, GridMode::Pair, 99).generate().unwrap();
        let second = generator(2, GridMode::Pair, 99).generate().unwrap();
        assert_eq!(first.puzzle, second.puzzle);
        assert_eq!(first.solution, second.solution);
        assert_eq!(first.stats.seed, 99);
    }

    #[test]
    fn test_retry_limit() {
        let mut gen = PuzzleGenerator::new(
            Order::new(1).unwrap(),
            GridMode::Pair,
            GeneratorOptions {
                seed: Some(3),
                max_seed_attempts: Some(5),
                uniqueness: UniquenessStrategy::Scoped,
            },
        )
        .unwrap();

        // Order 1 pairs cannot be disjoint, so every draw fails
        let err = gen.seed_solution().unwrap_err();
        assert_eq!(
            err.downcast_ref::<SudokuError>(),
            Some(&SudokuError::RetryLimitExceeded { attempts: 5 })
        );
    }

    #[test]
    fn test_minimize_keeps_uniqueness() {
        for mode in [GridMode::Single, GridMode::Pair] {
            let mut gen = generator(2, mode, 5);
            let seeded = gen.seed_solution().unwrap();
            let minimized = gen.minimize(&seeded.grid).unwrap();

            let total = seeded.grid.clue_count();
            assert_eq!(minimized.puzzle.clue_count() + minimized.removed, total);
            assert!(minimized.puzzle.clue_count() < total);

            let mut encoder = SudokuEncoder::new(Order::new(2).unwrap(), mode).unwrap();
            assert_eq!(encoder.count_solutions(&minimized.puzzle, 2).unwrap(), 1);
        }
    }

    #[test]
    fn test_fresh_oracle_strategy_generates() {
        let mut gen = PuzzleGenerator::new(
            Order::new(2).unwrap(),
            GridMode::Single,
            GeneratorOptions {
                seed: Some(11),
                max_seed_attempts: None,
                uniqueness: UniquenessStrategy::FreshOracle,
            },
        )
        .unwrap();

        let generated = gen.generate().unwrap();
        assert_eq!(generated.stats.uniqueness, UniquenessStrategy::FreshOracle);
        assert_eq!(generated.stats.uniqueness_checks, 16);
        gen.release();
    }
}
