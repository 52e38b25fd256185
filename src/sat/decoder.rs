//! Decoding satisfying models back into grids

use super::VariableEncoder;
use crate::error::SudokuError;
use crate::sudoku::Grid;
use anyhow::Result;

/// Inverse of the variable encoding for whole models
#[derive(Debug, Clone, Copy)]
pub struct ModelDecoder {
    encoder: VariableEncoder,
}

impl ModelDecoder {
    pub fn new(encoder: VariableEncoder) -> Self {
        Self { encoder }
    }

    /// Write `grid[i + a·n][j] = m` for every positive literal of the model.
    /// Negative literals are ignored.
    pub fn decode_into(&self, model: &[i32], grid: &mut Grid) -> Result<()> {
        if grid.order() != self.encoder.order() || grid.mode() != self.encoder.mode() {
            return Err(SudokuError::DimensionMismatch {
                expected: format!("k={} {:?}", self.encoder.order(), self.encoder.mode()),
                found: format!("k={} {:?}", grid.order(), grid.mode()),
            }
            .into());
        }

        let n = self.encoder.order().side();
        for &literal in model.iter().filter(|&&lit| lit > 0) {
            let cell = self.encoder.decode(literal)?;
            grid.set(cell.row + cell.grid * n, cell.col, cell.value)?;
        }
        Ok(())
    }

    /// Decode a model into a fresh grid
    pub fn decode(&self, model: &[i32]) -> Result<Grid> {
        let mut grid = Grid::new(self.encoder.order(), self.encoder.mode());
        self.decode_into(model, &mut grid)?;
        Ok(grid)
    }
}
