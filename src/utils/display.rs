//! Display and output formatting utilities

use crate::puzzle::{GeneratedPuzzle, Solution};
use crate::sudoku::Grid;

/// Format grids and run summaries for the console
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid with `|` between box columns and a dashed rule between
    /// box rows. Empty cells print as `.`; pair grids print one after the
    /// other, separated by a blank line.
    pub fn format_grid(grid: &Grid) -> String {
        let k = grid.order().k();
        let n = grid.side();
        let width = n.to_string().len();
        let rule = "-".repeat(n * width + (n - 1) + 2 * (k - 1));

        let mut output = String::new();
        for a in 0..grid.mode().grid_count() {
            if a > 0 {
                output.push('\n');
            }
            for i in 0..n {
                if i > 0 && i % k == 0 {
                    output.push_str(&rule);
                    output.push('\n');
                }
                for j in 0..n {
                    if j > 0 {
                        output.push(' ');
                        if j % k == 0 {
                            output.push_str("| ");
                        }
                    }
                    match grid.cell(a, i, j) {
                        0 => output.push_str(&format!("{:>width$}", ".")),
                        value => output.push_str(&format!("{:>width$}", value)),
                    }
                }
                output.push('\n');
            }
        }
        output
    }

    /// Format a solved puzzle
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Clues: {}, filled: {}, solve time: {:.3}s\n\n",
            solution.metadata.clues,
            solution.metadata.filled_cells,
            solution.solve_time.as_secs_f64()
        ));
        output.push_str(&Self::format_grid(&solution.solved));
        output
    }

    /// Format the outcome of a generator run
    pub fn format_generation_summary(generated: &GeneratedPuzzle) -> String {
        let stats = &generated.stats;
        let mut output = String::new();

        output.push_str(&format!(
            "Generated k={} {:?} puzzle\n",
            generated.puzzle.order(),
            generated.puzzle.mode()
        ));
        output.push_str(&format!("Seed: {} ({} attempt(s))\n", stats.seed, stats.seed_attempts));
        output.push_str(&format!(
            "Clues: {} kept, {} removed\n",
            stats.clues_remaining, stats.clues_removed
        ));
        output.push_str(&format!(
            "Uniqueness checks: {} ({:?})\n",
            stats.uniqueness_checks, stats.uniqueness
        ));
        output.push_str(&format!("Time: {:.3}s\n\n", stats.elapsed_ms as f64 / 1000.0));
        output.push_str(&Self::format_grid(&generated.puzzle));
        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
