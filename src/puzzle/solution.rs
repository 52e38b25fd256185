//! Solved and generated puzzle records

use super::uniqueness::UniquenessStrategy;
use crate::sudoku::{Grid, GridMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A puzzle together with the completion the oracle found for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The puzzle as given (0 = empty)
    pub puzzle: Grid,
    /// The completed grid
    pub solved: Grid,
    /// Time taken to find the completion
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Box side k
    pub order: usize,
    pub mode: GridMode,
    /// Cells filled in the puzzle
    pub clues: usize,
    /// Cells the oracle had to fill
    pub filled_cells: usize,
}

impl Solution {
    /// Create a new solution
    pub fn new(puzzle: Grid, solved: Grid, solve_time: Duration) -> Self {
        let metadata = SolutionMetadata {
            order: puzzle.order().k(),
            mode: puzzle.mode(),
            clues: puzzle.clue_count(),
            filled_cells: puzzle.empty_count(),
        };

        Self {
            puzzle,
            solved,
            solve_time,
            metadata,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(path.as_ref(), &self.to_json()?)
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// A generated puzzle, its unique solution, and how it was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPuzzle {
    pub puzzle: Grid,
    pub solution: Grid,
    pub stats: GenerationStats,
}

/// Bookkeeping from a generator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Seed of the random source; rerunning with it reproduces the puzzle
    pub seed: u64,
    /// Random draws tried before one was satisfiable
    pub seed_attempts: usize,
    pub clues_removed: usize,
    pub clues_remaining: usize,
    pub uniqueness_checks: usize,
    pub uniqueness: UniquenessStrategy,
    pub elapsed_ms: u64,
}

impl GeneratedPuzzle {
    pub fn new(puzzle: Grid, solution: Grid, stats: GenerationStats) -> Self {
        Self {
            puzzle,
            solution,
            stats,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save the JSON record to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_json(path.as_ref(), &self.to_json()?)
    }
}

fn write_json(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
