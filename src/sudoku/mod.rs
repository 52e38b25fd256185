//! Puzzle grids, their file format and legality rules

pub mod grid;
pub mod io;
pub mod rules;

pub use grid::{Grid, GridMode, Order};
pub use io::{create_example_puzzles, grid_to_csv, load_grid_from_file, parse_grid_from_csv, save_grid_to_file};
pub use rules::{RuleViolation, SudokuRules, Unit};
