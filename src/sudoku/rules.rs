//! Legality rules for decoded and partially filled grids

use super::{Grid, GridMode, Order};
use rayon::prelude::*;
use std::fmt;

/// A group of cells that must hold distinct values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Row { grid: usize, row: usize },
    Column { grid: usize, col: usize },
    Block { grid: usize, block: usize },
    Diagonal { grid: usize },
    AntiDiagonal { grid: usize },
}

/// A value repeated where the rules forbid it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// Value appears more than once within a unit
    Duplicate { unit: Unit, value: u32, count: usize },
    /// Value appears at the same coordinates in both grids of a pair
    SharedCell { row: usize, col: usize, value: u32 },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::Duplicate { unit, value, count } => {
                write!(f, "value {} appears {} times in {:?}", value, count, unit)
            }
            RuleViolation::SharedCell { row, col, value } => {
                write!(f, "value {} at ({}, {}) appears in both grids", value, row, col)
            }
        }
    }
}

/// Sudoku legality checks
pub struct SudokuRules;

impl SudokuRules {
    /// Every unit of the given shape with its cells in stacked (row, col) coordinates
    pub fn units(order: Order, mode: GridMode) -> Vec<(Unit, Vec<(usize, usize)>)> {
        let k = order.k();
        let n = order.side();
        let mut units = Vec::new();

        for a in 0..mode.grid_count() {
            let offset = a * n;
            for i in 0..n {
                units.push((
                    Unit::Row { grid: a, row: i },
                    (0..n).map(|j| (offset + i, j)).collect(),
                ));
                units.push((
                    Unit::Column { grid: a, col: i },
                    (0..n).map(|j| (offset + j, i)).collect(),
                ));
            }
            for block in 0..n {
                let (bi, bj) = (block / k, block % k);
                let cells = (0..n)
                    .map(|c| (offset + bi * k + c / k, bj * k + c % k))
                    .collect();
                units.push((Unit::Block { grid: a, block }, cells));
            }
            if mode == GridMode::Pair {
                units.push((
                    Unit::Diagonal { grid: a },
                    (0..n).map(|i| (offset + i, i)).collect(),
                ));
                units.push((
                    Unit::AntiDiagonal { grid: a },
                    (0..n).map(|i| (offset + i, n - 1 - i)).collect(),
                ));
            }
        }

        units
    }

    /// All rule violations among the filled cells of a grid
    pub fn violations(grid: &Grid) -> Vec<RuleViolation> {
        let n = grid.side();
        let units = Self::units(grid.order(), grid.mode());

        let mut violations: Vec<RuleViolation> = units
            .par_iter()
            .flat_map_iter(|(unit, cells)| {
                let mut counts = vec![0usize; n + 1];
                for &(row, col) in cells {
                    counts[grid.get(row, col) as usize] += 1;
                }
                counts
                    .into_iter()
                    .enumerate()
                    .skip(1)
                    .filter(|&(_, count)| count > 1)
                    .map(|(value, count)| RuleViolation::Duplicate {
                        unit: *unit,
                        value: value as u32,
                        count,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        if grid.mode() == GridMode::Pair {
            violations.extend((0..n).into_par_iter().flat_map_iter(|row| {
                (0..n).filter_map(move |col| {
                    let value = grid.get(row, col);
                    (value != 0 && value == grid.get(row + n, col))
                        .then_some(RuleViolation::SharedCell { row, col, value })
                })
            }).collect::<Vec<_>>());
        }

        violations
    }

    /// No rule is broken by the filled cells
    pub fn is_consistent(grid: &Grid) -> bool {
        Self::violations(grid).is_empty()
    }

    /// Complete and consistent
    pub fn is_solved(grid: &Grid) -> bool {
        grid.is_complete() && Self::is_consistent(grid)
    }

    /// Values that could be written at an empty cell without breaking a rule
    pub fn candidates(grid: &Grid, row: usize, col: usize) -> Vec<u32> {
        let n = grid.side();
        let mut used = vec![false; n + 1];

        for (_, cells) in Self::units(grid.order(), grid.mode())
            .iter()
            .filter(|(_, cells)| cells.contains(&(row, col)))
        {
            for &(r, c) in cells {
                used[grid.get(r, c) as usize] = true;
            }
        }
        if grid.mode() == GridMode::Pair {
            let twin = if row < n { row + n } else { row - n };
            used[grid.get(twin, col) as usize] = true;
        }

        (1..=n as u32).filter(|&v| !used[v as usize]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(k: i64) -> Order {
        Order::new(k).unwrap()
    }

    fn solved_4x4() -> Vec<Vec<u32>> {
        vec![
            vec![1, 2, 3, 4],
            vec![3, 4, 1, 2],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 1],
        ]
    }

    #[test]
    fn test_unit_count() {
        // rows + columns + blocks
        assert_eq!(SudokuRules::units(order(3), GridMode::Single).len(), 27);
        // two grids, each with two diagonals
        assert_eq!(SudokuRules::units(order(2), GridMode::Pair).len(), 2 * (12 + 2));
    }

    #[test]
    fn test_solved_grid() {
        let grid = Grid::from_rows(order(2), GridMode::Single, solved_4x4()).unwrap();
        assert!(SudokuRules::is_solved(&grid));
    }

    #[test]
    fn test_duplicate_detection() {
        let mut rows = vec![vec![0; 4]; 4];
        rows[0][0] = 2;
        rows[0][3] = 2;
        let grid = Grid::from_rows(order(2), GridMode::Single, rows).unwrap();

        let violations = SudokuRules::violations(&grid);
        assert_eq!(
            violations,
            vec![RuleViolation::Duplicate {
                unit: Unit::Row { grid: 0, row: 0 },
                value: 2,
                count: 2
            }]
        );
        assert!(!SudokuRules::is_consistent(&grid));
    }

    #[test]
    fn test_block_and_diagonal_detection() {
        let mut grid = Grid::new(order(2), GridMode::Pair);
        grid.set(4, 0, 3).unwrap();
        grid.set(5, 1, 3).unwrap();

        let violations = SudokuRules::violations(&grid);
        assert!(violations.contains(&RuleViolation::Duplicate {
            unit: Unit::Block { grid: 1, block: 0 },
            value: 3,
            count: 2
        }));
        assert!(violations.contains(&RuleViolation::Duplicate {
            unit: Unit::Diagonal { grid: 1 },
            value: 3,
            count: 2
        }));
    }

    #[test]
    fn test_shared_cell_detection() {
        let mut grid = Grid::new(order(2), GridMode::Pair);
        grid.set(1, 2, 4).unwrap();
        grid.set(5, 2, 4).unwrap();

        assert_eq!(
            SudokuRules::violations(&grid),
            vec![RuleViolation::SharedCell { row: 1, col: 2, value: 4 }]
        );
    }

    #[test]
    fn test_candidates() {
        let mut rows = solved_4x4();
        rows[0][0] = 0;
        rows[1][1] = 0;
        let grid = Grid::from_rows(order(2), GridMode::Single, rows).unwrap();

        assert_eq!(SudokuRules::candidates(&grid, 0, 0), vec![1]);
        assert_eq!(SudokuRules::candidates(&grid, 1, 1), vec![4]);
    }
}
