//! File I/O for puzzle grids in comma-separated form

use super::{Grid, GridMode, Order};
use crate::error::SudokuError;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a grid from a CSV file
/// Format: one row per line, comma-separated integers, 0 for an empty cell
pub fn load_grid_from_file<P: AsRef<Path>>(path: P, order: Order, mode: GridMode) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.as_ref().display()))?;

    parse_grid_from_csv(&content, order, mode)
        .with_context(|| format!("Failed to parse puzzle from file: {}", path.as_ref().display()))
}

/// Parse a grid from its CSV representation
pub fn parse_grid_from_csv(content: &str, order: Order, mode: GridMode) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SudokuError::MalformedGrid("puzzle file contains no rows".to_string()).into());
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(order.side());
        for (col_idx, field) in line.split(',').enumerate() {
            let field = field.trim();
            let value: u32 = field.parse().map_err(|_| {
                SudokuError::MalformedGrid(format!(
                    "invalid cell '{}' at ({}, {})",
                    field, row_idx, col_idx
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    Grid::from_rows(order, mode, rows)
}

/// Convert a grid to its CSV representation
pub fn grid_to_csv(grid: &Grid) -> String {
    grid.to_string()
}

/// Save a grid to a CSV file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    std::fs::write(&path, grid_to_csv(grid))
        .with_context(|| format!("Failed to write puzzle to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create example puzzle files for trying out the solver
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Order 2, no clues
    let blank = "0,0,0,0\n0,0,0,0\n0,0,0,0\n0,0,0,0\n";
    std::fs::write(dir.join("test_case1.csv"), blank)
        .context("Failed to write test_case1.csv")?;

    // Order 2, unique solution
    let clued = "1,2,0,0\n0,0,0,0\n0,0,4,0\n0,3,0,1\n";
    std::fs::write(dir.join("test_case2.csv"), clued)
        .context("Failed to write test_case2.csv")?;

    // Order 2, two 1s in the first row
    let conflicting = "1,1,0,0\n0,0,0,0\n0,0,0,0\n0,0,0,0\n";
    std::fs::write(dir.join("test_case3.csv"), conflicting)
        .context("Failed to write test_case3.csv")?;

    Ok(())
}
