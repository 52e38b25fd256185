//! Constraint generation for Sudoku and Sudoku-pair SAT encodings

use super::VariableEncoder;
use crate::sudoku::{GridMode, Order};
use anyhow::Result;
use itertools::{iproduct, Itertools};
use std::fmt;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Kind of cardinality constraint over a literal set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityKind {
    /// Exactly one literal is true
    ExactlyOne,
    /// At most `bound` literals are true
    AtMost(usize),
}

/// A cardinality constraint over a set of literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cardinality {
    pub kind: CardinalityKind,
    pub literals: Vec<i32>,
}

impl Cardinality {
    pub fn exactly_one(literals: Vec<i32>) -> Self {
        Self { kind: CardinalityKind::ExactlyOne, literals }
    }

    pub fn at_most(literals: Vec<i32>, bound: usize) -> Self {
        Self { kind: CardinalityKind::AtMost(bound), literals }
    }

    /// Equivalent clause set.
    ///
    /// Exactly-one is an at-least-one clause plus pairwise at-most-one
    /// clauses. At-most-b forbids every (b+1)-subset, which is a single
    /// clause when `b = len - 1` and exponential near `len / 2`.
    pub fn to_clauses(&self) -> Vec<Clause> {
        match self.kind {
            CardinalityKind::ExactlyOne => {
                let mut clauses = vec![Clause::new(self.literals.clone())];
                clauses.extend(Self::at_most_one(&self.literals));
                clauses
            }
            CardinalityKind::AtMost(bound) if bound >= self.literals.len() => Vec::new(),
            CardinalityKind::AtMost(1) => Self::at_most_one(&self.literals),
            CardinalityKind::AtMost(bound) => self
                .literals
                .iter()
                .copied()
                .combinations(bound + 1)
                .map(|subset| Clause::new(subset.into_iter().map(|lit| -lit).collect()))
                .collect(),
        }
    }

    fn at_most_one(literals: &[i32]) -> Vec<Clause> {
        literals
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| Clause::binary(-a, -b))
            .collect()
    }
}

/// A constraint accepted by the SAT oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Clause(Clause),
    Cardinality(Cardinality),
}

/// The rule families of a Sudoku (pair) encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// Each cell holds exactly one value
    Cell,
    /// Each value appears exactly once per row
    Row,
    /// Each value appears exactly once per column
    Column,
    /// Each value appears exactly once per k×k block
    Block,
    /// Each value appears exactly once on the main diagonal (pair only)
    Diagonal,
    /// Each value appears exactly once on the anti-diagonal (pair only)
    AntiDiagonal,
    /// No value sits at the same cell of both grids (pair only)
    Disjointness,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 7] = [
        ConstraintFamily::Cell,
        ConstraintFamily::Row,
        ConstraintFamily::Column,
        ConstraintFamily::Block,
        ConstraintFamily::Diagonal,
        ConstraintFamily::AntiDiagonal,
        ConstraintFamily::Disjointness,
    ];

    /// Whether this family is part of the encoding for `mode`
    pub fn applies_to(self, mode: GridMode) -> bool {
        match self {
            ConstraintFamily::Diagonal
            | ConstraintFamily::AntiDiagonal
            | ConstraintFamily::Disjointness => mode == GridMode::Pair,
            _ => true,
        }
    }
}

/// Generates the rule constraints of a puzzle shape
pub struct ConstraintGenerator {
    encoder: VariableEncoder,
    family_counts: Vec<(ConstraintFamily, usize)>,
}

impl ConstraintGenerator {
    /// Create a new constraint generator
    pub fn new(order: Order, mode: GridMode) -> Self {
        Self {
            encoder: VariableEncoder::new(order, mode),
            family_counts: Vec::new(),
        }
    }

    /// Generate every rule constraint for the configured mode
    pub fn generate_all_constraints(&mut self) -> Result<Vec<Constraint>> {
        let mut constraints = Vec::new();
        self.family_counts.clear();

        for family in ConstraintFamily::ALL {
            if !family.applies_to(self.encoder.mode()) {
                continue;
            }
            let generated = self.generate_family(family)?;
            self.family_counts.push((family, generated.len()));
            constraints.extend(generated);
        }

        Ok(constraints)
    }

    /// Generate the constraints of one family
    pub fn generate_family(&self, family: ConstraintFamily) -> Result<Vec<Constraint>> {
        match family {
            ConstraintFamily::Cell => self.generate_cell_constraints(),
            ConstraintFamily::Row => self.generate_row_constraints(),
            ConstraintFamily::Column => self.generate_column_constraints(),
            ConstraintFamily::Block => self.generate_block_constraints(),
            ConstraintFamily::Diagonal => self.generate_diagonal_constraints(false),
            ConstraintFamily::AntiDiagonal => self.generate_diagonal_constraints(true),
            ConstraintFamily::Disjointness => self.generate_disjointness_constraints(),
        }
    }

    fn grids(&self) -> std::ops::Range<usize> {
        0..self.encoder.mode().grid_count()
    }

    fn side(&self) -> usize {
        self.encoder.order().side()
    }

    fn values(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.side() as u32
    }

    fn exactly_one<I>(&self, cells: I) -> Result<Constraint>
    where
        I: IntoIterator<Item = (usize, usize, usize, u32)>,
    {
        let literals = cells
            .into_iter()
            .map(|(a, i, j, m)| self.encoder.literal(a, i, j, m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Constraint::Cardinality(Cardinality::exactly_one(literals)))
    }

    /// Exactly one value per (grid, row, column)
    fn generate_cell_constraints(&self) -> Result<Vec<Constraint>> {
        let n = self.side();
        iproduct!(self.grids(), 0..n, 0..n)
            .map(|(a, i, j)| self.exactly_one(self.values().map(|m| (a, i, j, m))))
            .collect()
    }

    /// Exactly one column per (grid, row, value)
    fn generate_row_constraints(&self) -> Result<Vec<Constraint>> {
        let n = self.side();
        iproduct!(self.grids(), 0..n, self.values())
            .map(|(a, i, m)| self.exactly_one((0..n).map(|j| (a, i, j, m))))
            .collect()
    }

    /// Exactly one row per (grid, column, value)
    fn generate_column_constraints(&self) -> Result<Vec<Constraint>> {
        let n = self.side();
        iproduct!(self.grids(), 0..n, self.values())
            .map(|(a, j, m)| self.exactly_one((0..n).map(|i| (a, i, j, m))))
            .collect()
    }

    /// Exactly one cell per (grid, block, value)
    fn generate_block_constraints(&self) -> Result<Vec<Constraint>> {
        let k = self.encoder.order().k();
        iproduct!(self.grids(), 0..k, 0..k, self.values())
            .map(|(a, bi, bj, m)| {
                self.exactly_one(
                    iproduct!(0..k, 0..k).map(|(i, j)| (a, bi * k + i, bj * k + j, m)),
                )
            })
            .collect()
    }

    /// Exactly one cell per (grid, value) along a diagonal
    fn generate_diagonal_constraints(&self, anti: bool) -> Result<Vec<Constraint>> {
        let n = self.side();
        iproduct!(self.grids(), self.values())
            .map(|(a, m)| {
                self.exactly_one((0..n).map(|i| {
                    let j = if anti { n - 1 - i } else { i };
                    (a, i, j, m)
                }))
            })
            .collect()
    }

    /// The two grids never share a value at the same cell: `(¬L0 ∨ ¬L1)`
    fn generate_disjointness_constraints(&self) -> Result<Vec<Constraint>> {
        let n = self.side();
        iproduct!(0..n, 0..n, self.values())
            .map(|(i, j, m)| {
                let first = self.encoder.literal(0, i, j, m)?;
                let second = self.encoder.literal(1, i, j, m)?;
                Ok(Constraint::Clause(Clause::binary(-first, -second)))
            })
            .collect()
    }

    /// Get the variable encoder (for external access)
    pub fn variable_encoder(&self) -> &VariableEncoder {
        &self.encoder
    }

    /// Get constraint generation statistics
    pub fn statistics(&self) -> ConstraintStatistics {
        ConstraintStatistics {
            side: self.side(),
            mode: self.encoder.mode(),
            total_variables: self.encoder.variable_count(),
            family_counts: self.family_counts.clone(),
        }
    }
}

/// Statistics about constraint generation
#[derive(Debug, Clone)]
pub struct ConstraintStatistics {
    pub side: usize,
    pub mode: GridMode,
    pub total_variables: usize,
    pub family_counts: Vec<(ConstraintFamily, usize)>,
}

impl ConstraintStatistics {
    pub fn total_constraints(&self) -> usize {
        self.family_counts.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Constraint Generation Statistics:")?;
        writeln!(f, "  Grid size: {}x{} ({:?})", self.side, self.side, self.mode)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        for (family, count) in &self.family_counts {
            writeln!(f, "  {:?} constraints: {}", family, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(k: i64, mode: GridMode) -> ConstraintGenerator {
        ConstraintGenerator::new(Order::new(k).unwrap(), mode)
    }

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());

        let unit_clause = Clause::unit(5);
        assert!(unit_clause.is_unit());
        assert_eq!(unit_clause.literals, vec![5]);
    }

    #[test]
    fn test_exactly_one_clauses() {
        let clauses = Cardinality::exactly_one(vec![1, 2, 3]).to_clauses();
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![1, 2, 3]),
                Clause::binary(-1, -2),
                Clause::binary(-1, -3),
                Clause::binary(-2, -3),
            ]
        );
    }

    #[test]
    fn test_at_most_clauses() {
        // Blocking form: at most len-1 true is a single negated clause
        let blocking = Cardinality::at_most(vec![1, -2, 3], 2).to_clauses();
        assert_eq!(blocking, vec![Clause::new(vec![-1, 2, -3])]);

        assert!(Cardinality::at_most(vec![1, 2], 2).to_clauses().is_empty());
        assert_eq!(Cardinality::at_most(vec![1, 2, 3], 1).to_clauses().len(), 3);
        assert_eq!(Cardinality::at_most(vec![1, 2, 3, 4], 2).to_clauses().len(), 4);
        assert_eq!(
            Cardinality::at_most(vec![4, 5], 0).to_clauses(),
            vec![Clause::unit(-4), Clause::unit(-5)]
        );
    }

    #[test]
    fn test_family_sizes_single() {
        let mut cg = generator(2, GridMode::Single);
        let constraints = cg.generate_all_constraints().unwrap();
        assert_eq!(constraints.len(), 64);

        let stats = cg.statistics();
        assert_eq!(
            stats.family_counts,
            vec![
                (ConstraintFamily::Cell, 16),
                (ConstraintFamily::Row, 16),
                (ConstraintFamily::Column, 16),
                (ConstraintFamily::Block, 16),
            ]
        );
        assert!(constraints.iter().all(|c| matches!(
            c,
            Constraint::Cardinality(Cardinality { kind: CardinalityKind::ExactlyOne, literals })
                if literals.len() == 4
        )));
    }

    #[test]
    fn test_family_sizes_pair() {
        let mut cg = generator(3, GridMode::Pair);
        let constraints = cg.generate_all_constraints().unwrap();
        let stats = cg.statistics();

        // 4 families × 2 grids × 81, diagonals 2 × 9 each, 729 disjointness clauses
        assert_eq!(stats.total_constraints(), 4 * 2 * 81 + 2 * 9 + 2 * 9 + 729);
        assert_eq!(constraints.len(), stats.total_constraints());
    }

    #[test]
    fn test_block_literals() {
        let cg = generator(2, GridMode::Single);
        let blocks = cg.generate_family(ConstraintFamily::Block).unwrap();
        let enc = cg.variable_encoder();

        // Block (1, 1), value 2: cells (2,2) (2,3) (3,2) (3,3)
        let expected: Vec<i32> = [(2, 2), (2, 3), (3, 2), (3, 3)]
            .iter()
            .map(|&(i, j)| enc.literal(0, i, j, 2).unwrap())
            .collect();
        assert!(blocks.contains(&Constraint::Cardinality(Cardinality::exactly_one(expected))));
    }

    #[test]
    fn test_diagonal_and_disjointness_literals() {
        let cg = generator(2, GridMode::Pair);
        let enc = *cg.variable_encoder();

        let anti = cg.generate_family(ConstraintFamily::AntiDiagonal).unwrap();
        let expected: Vec<i32> = (0..4).map(|i| enc.literal(1, i, 3 - i, 1).unwrap()).collect();
        assert!(anti.contains(&Constraint::Cardinality(Cardinality::exactly_one(expected))));

        let disjoint = cg.generate_family(ConstraintFamily::Disjointness).unwrap();
        assert_eq!(disjoint.len(), 64);
        assert!(disjoint.contains(&Constraint::Clause(Clause::binary(
            -enc.literal(0, 1, 2, 3).unwrap(),
            -enc.literal(1, 1, 2, 3).unwrap(),
        ))));
    }

    #[test]
    fn test_single_mode_skips_pair_families() {
        assert!(!ConstraintFamily::Diagonal.applies_to(GridMode::Single));
        assert!(!ConstraintFamily::Disjointness.applies_to(GridMode::Single));
        assert!(ConstraintFamily::Block.applies_to(GridMode::Pair));
    }
}
