//! Configuration management and validation.
//!
//! Provides configuration structures for validation policy, file admission,
//! output and performance settings. Configuration is layered: defaults, then
//! an optional TOML file, then `SPED_*` environment variables, then CLI
//! overrides applied by the command layer.

use crate::constants::{
    DEFAULT_FIELD_DELIMITER, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_OUTPUT_DIR,
    DEFAULT_PARALLEL_WORKERS, DEFAULT_STRICT_MODE, DEFAULT_VALIDATE_CNPJ,
    DEFAULT_VALIDATE_DATES, DEFAULT_VALIDATION_TOLERANCE, MAX_PARALLEL_WORKERS, env_vars,
};
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Top-level configuration
///
/// Unknown keys in the TOML file are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub processing: ProcessingConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Options consumed by the parsing and integrity core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Verify CNPJ check digits
    pub validate_cnpj: bool,

    /// Parse date fields as calendar dates
    pub validate_dates: bool,

    /// Abort consolidation of groups carrying fatal findings
    pub strict_mode: bool,

    /// Absolute tolerance for parent/child total comparisons
    pub validation_tolerance: Decimal,

    /// Field delimiter of the input lines
    pub field_delimiter: char,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_cnpj: DEFAULT_VALIDATE_CNPJ,
            validate_dates: DEFAULT_VALIDATE_DATES,
            strict_mode: DEFAULT_STRICT_MODE,
            validation_tolerance: DEFAULT_VALIDATION_TOLERANCE,
            field_delimiter: DEFAULT_FIELD_DELIMITER,
        }
    }
}

/// Output table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// One CSV file per table
    Csv,
    /// One Snappy-compressed Parquet file per table
    Parquet,
}

impl TableFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }
}

/// File admission and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory receiving the output tables
    pub output_path: PathBuf,

    /// Output table format
    pub output_format: TableFormat,

    /// Largest accepted input file, in megabytes
    pub max_file_size_mb: u64,

    /// Also write one detail table per record type
    pub write_detail_tables: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_format: TableFormat::Csv,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            write_detail_tables: true,
        }
    }
}

/// Performance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of files processed concurrently
    pub parallel_workers: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_workers: num_cpus::get().clamp(1, DEFAULT_PARALLEL_WORKERS),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Create a configuration writing to the given output directory
    pub fn new(output_path: PathBuf) -> Self {
        let mut config = Self::default();
        config.processing.output_path = output_path;
        config
    }

    /// Set strict mode
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.validation.strict_mode = strict;
        self
    }

    /// Set the total comparison tolerance
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.validation.validation_tolerance = tolerance;
        self
    }

    /// Set the number of parallel workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.performance.parallel_workers = workers;
        self
    }

    /// Set the output table format
    pub fn with_output_format(mut self, format: TableFormat) -> Self {
        self.processing.output_format = format;
        self
    }

    /// Default config file location (`<config dir>/sped-processor/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))?;
        Ok(base.join("sped-processor").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;
        let config: Config = toml::from_str(&content)?;
        debug!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Load defaults, then the optional file, then environment overrides
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `SPED_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env_vars::VALIDATE_CNPJ) {
            self.validation.validate_cnpj = parse_bool(env_vars::VALIDATE_CNPJ, &value)?;
        }
        if let Some(value) = lookup(env_vars::VALIDATE_DATES) {
            self.validation.validate_dates = parse_bool(env_vars::VALIDATE_DATES, &value)?;
        }
        if let Some(value) = lookup(env_vars::STRICT_MODE) {
            self.validation.strict_mode = parse_bool(env_vars::STRICT_MODE, &value)?;
        }
        if let Some(value) = lookup(env_vars::VALIDATION_TOLERANCE) {
            self.validation.validation_tolerance =
                Decimal::from_str(value.trim()).map_err(|e| {
                    Error::configuration(format!(
                        "{} must be a decimal number, got '{}': {}",
                        env_vars::VALIDATION_TOLERANCE,
                        value,
                        e
                    ))
                })?;
        }
        if let Some(value) = lookup(env_vars::PARALLEL_WORKERS) {
            self.performance.parallel_workers = value.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    env_vars::PARALLEL_WORKERS,
                    value
                ))
            })?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.validation.validation_tolerance.is_sign_negative() {
            return Err(Error::configuration(format!(
                "Validation tolerance must not be negative, got {}",
                self.validation.validation_tolerance
            )));
        }

        let delimiter = self.validation.field_delimiter;
        if delimiter.is_alphanumeric() || delimiter.is_whitespace() {
            return Err(Error::configuration(format!(
                "Field delimiter '{}' must be a punctuation character",
                delimiter
            )));
        }

        if self.performance.parallel_workers == 0
            || self.performance.parallel_workers > MAX_PARALLEL_WORKERS
        {
            return Err(Error::configuration(format!(
                "Parallel workers must be between 1 and {}, got {}",
                MAX_PARALLEL_WORKERS, self.performance.parallel_workers
            )));
        }

        if self.processing.max_file_size_mb == 0 {
            return Err(Error::configuration(
                "Maximum file size must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Create the output directory if it does not exist
    pub fn ensure_output_directory(&self) -> Result<()> {
        let path = &self.processing.output_path;
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|e| {
                Error::io(
                    format!("Failed to create output directory '{}'", path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::configuration(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.validation.validate_cnpj);
        assert!(!config.validation.strict_mode);
        assert_eq!(config.validation.field_delimiter, '|');
        assert_eq!(config.processing.max_file_size_mb, 100);
    }

    #[test]
    fn test_toml_with_unknown_keys_loads() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
unknown_top_level = "ignored"

[validation]
strict_mode = true
validation_tolerance = 0.05
some_future_option = 42

[performance]
parallel_workers = 2
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.validation.strict_mode);
        assert_eq!(
            config.validation.validation_tolerance,
            Decimal::from_str("0.05").unwrap()
        );
        assert_eq!(config.performance.parallel_workers, 2);
        // Untouched sections keep their defaults
        assert!(config.validation.validate_dates);
        assert_eq!(config.processing.output_format, TableFormat::Csv);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file(Path::new("/nonexistent/sped/config.toml"));
        match result {
            Err(Error::FileNotFound { path }) => assert!(path.contains("config.toml")),
            _ => panic!("Expected FileNotFound error"),
        }
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SPED_STRICT_MODE", "yes"),
            ("SPED_VALIDATE_CNPJ", "0"),
            ("SPED_VALIDATION_TOLERANCE", "0.10"),
            ("SPED_PARALLEL_WORKERS", "3"),
        ]);

        let mut config = Config::default();
        config
            .apply_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert!(config.validation.strict_mode);
        assert!(!config.validation.validate_cnpj);
        assert_eq!(
            config.validation.validation_tolerance,
            Decimal::from_str("0.10").unwrap()
        );
        assert_eq!(config.performance.parallel_workers, 3);
    }

    #[test]
    fn test_invalid_env_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides_from(|key| {
            (key == "SPED_STRICT_MODE").then(|| "maybe".to_string())
        });
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = Config::default().with_tolerance(Decimal::from_str("-0.01").unwrap());
        assert!(config.validate().is_err());

        let config = Config::default().with_workers(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.validation.field_delimiter = 'x';
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.max_file_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = Config::new(PathBuf::from("/tmp/out"))
            .with_strict_mode(true)
            .with_workers(8)
            .with_output_format(TableFormat::Parquet);

        assert_eq!(config.processing.output_path, PathBuf::from("/tmp/out"));
        assert!(config.validation.strict_mode);
        assert_eq!(config.performance.parallel_workers, 8);
        assert_eq!(config.processing.output_format.extension(), "parquet");
    }
}
