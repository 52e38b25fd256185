//! Independent checks on puzzles and their completions

use crate::sudoku::{Grid, RuleViolation, SudokuRules};
use anyhow::Result;
use std::fmt;

/// Validates completions against the puzzles they came from
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionValidator;

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub details: ValidationDetails,
}

/// Detailed validation information
#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    /// Every cell of the completion is filled
    pub complete: bool,
    pub rule_violations: Vec<RuleViolation>,
    /// Clue positions whose value the completion changed
    pub clue_mismatches: Vec<(usize, usize)>,
}

impl SolutionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check that `solved` is a legal completion of `puzzle`
    pub fn validate(&self, puzzle: &Grid, solved: &Grid) -> Result<ValidationResult> {
        if !puzzle.same_shape(solved) {
            return Ok(ValidationResult {
                is_valid: false,
                error_message: Some(format!(
                    "Grid shape mismatch: puzzle {}x{}, solution {}x{}",
                    puzzle.rows(),
                    puzzle.cols(),
                    solved.rows(),
                    solved.cols()
                )),
                details: ValidationDetails::default(),
            });
        }

        let clue_mismatches: Vec<_> = puzzle
            .clue_positions()
            .into_iter()
            .filter(|&(row, col)| puzzle.get(row, col) != solved.get(row, col))
            .collect();

        let details = ValidationDetails {
            complete: solved.is_complete(),
            rule_violations: SudokuRules::violations(solved),
            clue_mismatches,
        };

        Ok(Self::finish(details))
    }

    /// Check a partially filled grid for clues that already break the rules
    pub fn validate_puzzle(&self, puzzle: &Grid) -> ValidationResult {
        let details = ValidationDetails {
            // Empty cells are allowed here
            complete: true,
            rule_violations: SudokuRules::violations(puzzle),
            clue_mismatches: Vec::new(),
        };
        Self::finish(details)
    }

    fn finish(details: ValidationDetails) -> ValidationResult {
        let is_valid =
            details.complete && details.rule_violations.is_empty() && details.clue_mismatches.is_empty();
        let error_message = if is_valid {
            None
        } else {
            Some(Self::generate_error_message(&details))
        };

        ValidationResult {
            is_valid,
            error_message,
            details,
        }
    }

    fn generate_error_message(details: &ValidationDetails) -> String {
        let mut problems = Vec::new();
        if !details.complete {
            problems.push("solution has empty cells".to_string());
        }
        if let Some(first) = details.rule_violations.first() {
            problems.push(format!(
                "{} rule violation(s), first: {}",
                details.rule_violations.len(),
                first
            ));
        }
        if let Some((row, col)) = details.clue_mismatches.first() {
            problems.push(format!(
                "{} clue(s) overwritten, first at ({}, {})",
                details.clue_mismatches.len(),
                row,
                col
            ));
        }
        problems.join("; ")
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_message {
            None => writeln!(f, "Valid"),
            Some(message) => {
                writeln!(f, "Invalid: {}", message)?;
                for violation in &self.details.rule_violations {
                    writeln!(f, "  - {}", violation)?;
                }
                Ok(())
            }
        }
    }
}
