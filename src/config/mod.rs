//! Configuration management for the Sudoku generator and solver

pub mod settings;

pub use settings::{CliOverrides, GeneratorConfig, OutputConfig, OutputFormat, SolverConfig, Settings};
