//! Grid representation for single and paired Sudoku puzzles

use crate::error::SudokuError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The order parameter k of a puzzle; the grid side is k².
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Order(usize);

impl Order {
    /// Validate k; rejects k ≤ 0 and orders whose literals would overflow `i32`
    pub fn new(k: i64) -> Result<Self, SudokuError> {
        if k <= 0 {
            return Err(SudokuError::InvalidOrder(k));
        }

        let max_literal = (k as i128)
            .checked_pow(6)
            .and_then(|k6| k6.checked_mul(2));
        match max_literal {
            Some(limit) if limit <= i32::MAX as i128 => Ok(Self(k as usize)),
            _ => Err(SudokuError::OrderTooLarge(k)),
        }
    }

    /// The order k
    #[inline]
    pub fn k(self) -> usize {
        self.0
    }

    /// Side length n = k² of one grid
    #[inline]
    pub fn side(self) -> usize {
        self.0 * self.0
    }

    /// Number of cells n² in one grid
    #[inline]
    pub fn cells(self) -> usize {
        self.side() * self.side()
    }
}

impl TryFrom<i64> for Order {
    type Error = SudokuError;

    fn try_from(k: i64) -> Result<Self, Self::Error> {
        Order::new(k)
    }
}

impl From<Order> for i64 {
    fn from(order: Order) -> Self {
        order.0 as i64
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a puzzle is a single grid or a Sudoku pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    Single,
    Pair,
}

impl GridMode {
    /// Number of stacked n×n grids
    #[inline]
    pub fn grid_count(self) -> usize {
        match self {
            GridMode::Single => 1,
            GridMode::Pair => 2,
        }
    }
}

/// A puzzle grid: n rows (single) or 2n rows (pair) by n columns.
///
/// Rows `[0, n)` hold grid A and rows `[n, 2n)` hold grid B. A value of 0
/// marks an empty cell; filled cells hold `1..=n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    order: Order,
    mode: GridMode,
    cells: Vec<u32>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(order: Order, mode: GridMode) -> Self {
        Self {
            order,
            mode,
            cells: vec![0; mode.grid_count() * order.cells()],
        }
    }

    /// Create a grid from rows of cell values
    pub fn from_rows(order: Order, mode: GridMode, rows: Vec<Vec<u32>>) -> Result<Self> {
        let n = order.side();
        let expected_rows = mode.grid_count() * n;

        if rows.len() != expected_rows {
            return Err(SudokuError::MalformedGrid(format!(
                "expected {} rows, found {}",
                expected_rows,
                rows.len()
            ))
            .into());
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(SudokuError::MalformedGrid(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                ))
                .into());
            }
            if let Some((j, &value)) = row.iter().enumerate().find(|(_, &v)| v as usize > n) {
                return Err(SudokuError::ValueOutOfRange {
                    row: i,
                    col: j,
                    value,
                    max: n as u32,
                }
                .into());
            }
        }

        Ok(Self {
            order,
            mode,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    /// Side length n of each stacked grid
    pub fn side(&self) -> usize {
        self.order.side()
    }

    /// Total row count (n or 2n)
    pub fn rows(&self) -> usize {
        self.mode.grid_count() * self.order.side()
    }

    pub fn cols(&self) -> usize {
        self.order.side()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    /// Get cell value at coordinates; out of bounds cells read as empty
    pub fn get(&self, row: usize, col: usize) -> u32 {
        if row < self.rows() && col < self.cols() {
            self.cells[self.index(row, col)]
        } else {
            0
        }
    }

    /// Get the value of cell (i, j) in stacked grid `a`
    pub fn cell(&self, a: usize, i: usize, j: usize) -> u32 {
        self.get(i + a * self.side(), j)
    }

    /// Set cell value at coordinates
    pub fn set(&mut self, row: usize, col: usize, value: u32) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            anyhow::bail!(
                "Coordinates ({}, {}) out of bounds for {}x{} grid",
                row,
                col,
                self.rows(),
                self.cols()
            );
        }
        if value as usize > self.side() {
            return Err(SudokuError::ValueOutOfRange {
                row,
                col,
                value,
                max: self.side() as u32,
            }
            .into());
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Empty a cell, returning the value it held
    pub fn clear(&mut self, row: usize, col: usize) -> Result<u32> {
        let previous = self.get(row, col);
        self.set(row, col, 0)?;
        Ok(previous)
    }

    /// Positions of all non-empty cells in row-major order
    pub fn clue_positions(&self) -> Vec<(usize, usize)> {
        let cols = self.cols();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(idx, _)| (idx / cols, idx % cols))
            .collect()
    }

    pub fn clue_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.clue_count()
    }

    /// Every cell holds a value
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// No cell holds a value
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    /// Extract stacked grid `a` as a standalone single grid
    pub fn sub_grid(&self, a: usize) -> Result<Grid> {
        if a >= self.mode.grid_count() {
            anyhow::bail!("Grid index {} out of range for {:?} mode", a, self.mode);
        }
        let n = self.side();
        let start = a * n * n;
        Ok(Grid {
            order: self.order,
            mode: GridMode::Single,
            cells: self.cells[start..start + n * n].to_vec(),
        })
    }

    /// Rows of cell values
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.cols()).map(|row| row.to_vec()).collect()
    }

    /// Same order and mode
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.order == other.order && self.mode == other.mode
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols()) {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(k: i64) -> Order {
        Order::new(k).unwrap()
    }

    #[test]
    fn test_order_validation() {
        assert_eq!(Order::new(0), Err(SudokuError::InvalidOrder(0)));
        assert_eq!(Order::new(-3), Err(SudokuError::InvalidOrder(-3)));
        assert_eq!(Order::new(32), Err(SudokuError::OrderTooLarge(32)));

        let k3 = order(3);
        assert_eq!(k3.k(), 3);
        assert_eq!(k3.side(), 9);
        assert_eq!(k3.cells(), 81);
        assert!(Order::new(31).is_ok());
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(order(2), GridMode::Pair);
        assert_eq!(grid.rows(), 8);
        assert_eq!(grid.cols(), 4);
        assert!(grid.is_empty());
        assert_eq!(grid.empty_count(), 32);
    }

    #[test]
    fn test_grid_from_rows() {
        let rows = vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 0],
        ];
        let grid = Grid::from_rows(order(2), GridMode::Single, rows.clone()).unwrap();
        assert_eq!(grid.clue_count(), 15);
        assert!(!grid.is_complete());
        assert_eq!(grid.get(1, 2), 1);
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn test_grid_from_rows_rejects_bad_shapes() {
        let short = vec![vec![0; 4]; 3];
        assert!(Grid::from_rows(order(2), GridMode::Single, short).is_err());

        let ragged = vec![vec![0; 4], vec![0; 3], vec![0; 4], vec![0; 4]];
        assert!(Grid::from_rows(order(2), GridMode::Single, ragged).is_err());

        let mut too_big = vec![vec![0; 4]; 4];
        too_big[2][1] = 5;
        let err = Grid::from_rows(order(2), GridMode::Single, too_big).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SudokuError>(),
            Some(&SudokuError::ValueOutOfRange { row: 2, col: 1, value: 5, max: 4 })
        );
    }

    #[test]
    fn test_set_and_clear() {
        let mut grid = Grid::new(order(2), GridMode::Pair);
        grid.set(5, 3, 2).unwrap();
        assert_eq!(grid.cell(1, 1, 3), 2);
        assert_eq!(grid.clue_positions(), vec![(5, 3)]);

        assert_eq!(grid.clear(5, 3).unwrap(), 2);
        assert!(grid.is_empty());

        assert!(grid.set(8, 0, 1).is_err());
        assert!(grid.set(0, 0, 5).is_err());
    }

    #[test]
    fn test_sub_grid() {
        let mut grid = Grid::new(order(2), GridMode::Pair);
        grid.set(0, 0, 1).unwrap();
        grid.set(4, 1, 3).unwrap();

        let a = grid.sub_grid(0).unwrap();
        let b = grid.sub_grid(1).unwrap();
        assert_eq!(a.mode(), GridMode::Single);
        assert_eq!(a.get(0, 0), 1);
        assert_eq!(b.get(0, 1), 3);
        assert!(grid.sub_grid(2).is_err());
    }

    #[test]
    fn test_display_is_csv() {
        let mut grid = Grid::new(order(1), GridMode::Pair);
        grid.set(1, 0, 1).unwrap();
        assert_eq!(grid.to_string(), "0\n1\n");
    }
}
