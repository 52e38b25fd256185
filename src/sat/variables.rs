//! Variable encoding between puzzle cells and SAT literals

use crate::error::SudokuError;
use crate::sudoku::{GridMode, Order};
use anyhow::Result;
use std::fmt;

/// The proposition "cell (row, col) of grid `grid` holds `value`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellLiteral {
    pub grid: usize,
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

impl CellLiteral {
    pub fn new(grid: usize, row: usize, col: usize, value: u32) -> Self {
        Self { grid, row, col, value }
    }
}

impl fmt::Display for CellLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}[{},{}]={}", self.grid, self.row, self.col, self.value)
    }
}

/// Bijection between cell propositions and positive literal IDs.
///
/// `id = a·k⁶ + i·k⁴ + j·k² + m`; single grids only use `a = 0`, so their
/// IDs coincide with grid A of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableEncoder {
    order: Order,
    mode: GridMode,
}

impl VariableEncoder {
    pub fn new(order: Order, mode: GridMode) -> Self {
        Self { order, mode }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    /// Number of variables in the encoding; IDs span `1..=variable_count`
    pub fn variable_count(&self) -> usize {
        self.mode.grid_count() * self.order.cells() * self.order.side()
    }

    /// Encode a cell proposition as a literal ID
    pub fn encode(&self, literal: CellLiteral) -> Result<i32> {
        self.validate(&literal)?;

        let k2 = self.order.side();
        let k4 = k2 * k2;
        let k6 = k4 * k2;
        let id = literal.grid * k6 + literal.row * k4 + literal.col * k2 + literal.value as usize;
        Ok(id as i32)
    }

    /// Shorthand for `encode(CellLiteral::new(a, i, j, m))`
    pub fn literal(&self, a: usize, i: usize, j: usize, m: u32) -> Result<i32> {
        self.encode(CellLiteral::new(a, i, j, m))
    }

    /// Decode a positive literal ID back into its cell proposition
    pub fn decode(&self, id: i32) -> Result<CellLiteral> {
        if id <= 0 || id as usize > self.variable_count() {
            return Err(SudokuError::LiteralOutOfRange(id).into());
        }

        let k2 = self.order.side();
        let k4 = k2 * k2;
        let k6 = k4 * k2;
        let rest = id as usize - 1;

        Ok(CellLiteral {
            grid: rest / k6,
            row: rest % k6 / k4,
            col: rest % k4 / k2,
            value: (rest % k2 + 1) as u32,
        })
    }

    /// Literals for every value of one cell
    pub fn cell_literals(&self, a: usize, i: usize, j: usize) -> Result<Vec<i32>> {
        (1..=self.order.side() as u32)
            .map(|m| self.literal(a, i, j, m))
            .collect()
    }

    fn validate(&self, literal: &CellLiteral) -> Result<()> {
        let n = self.order.side();
        if literal.grid >= self.mode.grid_count() {
            anyhow::bail!(
                "Grid index {} out of bounds for {:?} mode",
                literal.grid,
                self.mode
            );
        }
        if literal.row >= n || literal.col >= n {
            anyhow::bail!(
                "Cell ({}, {}) out of bounds for {}x{} grid",
                literal.row,
                literal.col,
                n,
                n
            );
        }
        if literal.value == 0 || literal.value as usize > n {
            return Err(SudokuError::ValueOutOfRange {
                row: literal.row,
                col: literal.col,
                value: literal.value,
                max: n as u32,
            }
            .into());
        }
        Ok(())
    }
}
