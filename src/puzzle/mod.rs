//! Puzzle generation, solving and validation

pub mod generator;
pub mod problem;
pub mod solution;
pub mod uniqueness;
pub mod validator;

pub use generator::{GeneratorOptions, MinimizedPuzzle, PuzzleGenerator, SeededGrid};
pub use problem::{SolveOutcome, SudokuProblem};
pub use solution::{GeneratedPuzzle, GenerationStats, Solution, SolutionMetadata};
pub use uniqueness::{UniquenessChecker, UniquenessStrategy};
pub use validator::{SolutionValidator, ValidationDetails, ValidationResult};
