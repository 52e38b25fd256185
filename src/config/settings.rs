//! Configuration settings for the Sudoku generator and solver

use crate::puzzle::UniquenessStrategy;
use crate::sudoku::{GridMode, Order};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Box side k
    pub order: i64,
    pub mode: GridMode,
    /// CSV file the generated puzzle is written to
    pub output_file: PathBuf,
    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// Bound on unsatisfiable seeding draws before giving up
    #[serde(default)]
    pub max_seed_attempts: Option<usize>,
    #[serde(default)]
    pub uniqueness: UniquenessStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub order: i64,
    pub mode: GridMode,
    /// CSV puzzle to solve
    pub input_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Where to write a JSON report of the run, if anywhere
    #[serde(default)]
    pub report_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                order: 4,
                mode: GridMode::Pair,
                output_file: PathBuf::from("TestCases/test_case.csv"),
                seed: None,
                max_seed_attempts: None,
                uniqueness: UniquenessStrategy::Scoped,
            },
            solver: SolverConfig {
                order: 2,
                mode: GridMode::Single,
                input_file: PathBuf::from("TestCases/test_case1.csv"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                report_file: None,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings.
    ///
    /// File existence is left to the command that reads the file, so a
    /// config can be written before its puzzles exist.
    pub fn validate(&self) -> Result<()> {
        Order::new(self.generator.order).context("Invalid generator order")?;
        Order::new(self.solver.order).context("Invalid solver order")?;

        if self.generator.max_seed_attempts == Some(0) {
            anyhow::bail!("max_seed_attempts must be positive when set");
        }

        if self.generator.output_file.as_os_str().is_empty() {
            anyhow::bail!("Generator output file must not be empty");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(order) = cli_overrides.generator_order {
            self.generator.order = order;
        }
        if let Some(mode) = cli_overrides.generator_mode {
            self.generator.mode = mode;
        }
        if let Some(ref output_file) = cli_overrides.output_file {
            self.generator.output_file = output_file.clone();
        }
        if cli_overrides.seed.is_some() {
            self.generator.seed = cli_overrides.seed;
        }
        if cli_overrides.max_seed_attempts.is_some() {
            self.generator.max_seed_attempts = cli_overrides.max_seed_attempts;
        }
        if let Some(uniqueness) = cli_overrides.uniqueness {
            self.generator.uniqueness = uniqueness;
        }
        if let Some(order) = cli_overrides.solver_order {
            self.solver.order = order;
        }
        if let Some(mode) = cli_overrides.solver_mode {
            self.solver.mode = mode;
        }
        if let Some(ref input_file) = cli_overrides.input_file {
            self.solver.input_file = input_file.clone();
        }
        if let Some(ref report_file) = cli_overrides.report_file {
            self.output.format = OutputFormat::Json;
            self.output.report_file = Some(report_file.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub generator_order: Option<i64>,
    pub generator_mode: Option<GridMode>,
    pub output_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub max_seed_attempts: Option<usize>,
    pub uniqueness: Option<UniquenessStrategy>,
    pub solver_order: Option<i64>,
    pub solver_mode: Option<GridMode>,
    pub input_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.generator.order, 4);
        assert_eq!(settings.generator.mode, GridMode::Pair);
        assert_eq!(settings.generator.output_file, PathBuf::from("TestCases/test_case.csv"));
        assert_eq!(settings.solver.order, 2);
        assert_eq!(settings.solver.mode, GridMode::Single);
        assert_eq!(settings.solver.input_file, PathBuf::from("TestCases/test_case1.csv"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.generator.seed = Some(7);
        settings.generator.uniqueness = UniquenessStrategy::FreshOracle;
        settings.to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("uniqueness: fresh_oracle"));
        assert!(content.contains("mode: pair"));

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_optional_fields_default() {
        let yaml = "\
generator:
  order: 3
  mode: single
  output_file: out.csv
solver:
  order: 2
  mode: pair
  input_file: in.csv
output:
  format: json
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.generator.seed, None);
        assert_eq!(settings.generator.max_seed_attempts, None);
        assert_eq!(settings.generator.uniqueness, UniquenessStrategy::Scoped);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.output.report_file, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.solver.order = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.generator.max_seed_attempts = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_merge() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            generator_order: Some(3),
            generator_mode: Some(GridMode::Single),
            seed: Some(42),
            input_file: Some(PathBuf::from("puzzle.csv")),
            report_file: Some(PathBuf::from("report.json")),
            ..Default::default()
        });

        assert_eq!(settings.generator.order, 3);
        assert_eq!(settings.generator.mode, GridMode::Single);
        assert_eq!(settings.generator.seed, Some(42));
        assert_eq!(settings.solver.order, 2);
        assert_eq!(settings.solver.input_file, PathBuf::from("puzzle.csv"));
        assert_eq!(settings.output.format, OutputFormat::Json);
    }
}
