//! Error taxonomy for puzzle encoding, generation and solving

use thiserror::Error;

/// Errors raised by the core puzzle components
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SudokuError {
    /// The order parameter k must be a positive integer
    #[error("invalid order k = {0}: k must be positive")]
    InvalidOrder(i64),

    /// The literal space 2·k⁶ does not fit in a 32-bit literal
    #[error("order k = {0} is too large to encode as 32-bit literals")]
    OrderTooLarge(i64),

    /// Input grid does not follow the puzzle file format
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    /// Two grids (or a grid and an encoder) disagree on shape
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    /// A cell value outside 0..=n
    #[error("value {value} at ({row}, {col}) is outside 0..={max}")]
    ValueOutOfRange { row: usize, col: usize, value: u32, max: u32 },

    /// A literal that is not produced by the variable encoding
    #[error("literal {0} is outside the variable encoding")]
    LiteralOutOfRange(i32),

    /// Phase-1 seeding gave up after the configured number of attempts
    #[error("no satisfiable seed found after {attempts} attempts")]
    RetryLimitExceeded { attempts: usize },
}
