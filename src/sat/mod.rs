//! SAT encoding, oracle and decoding for Sudoku puzzles

pub mod variables;
pub mod constraints;
pub mod solver;
pub mod decoder;
pub mod encoder;

pub use variables::{CellLiteral, VariableEncoder};
pub use constraints::{Cardinality, CardinalityKind, Clause, Constraint, ConstraintFamily, ConstraintGenerator};
pub use solver::{SatSolver, Scope, SolverStatistics};
pub use decoder::ModelDecoder;
pub use encoder::{EncodingStatistics, SudokuEncoder};
