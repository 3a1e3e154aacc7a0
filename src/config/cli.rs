use crate::config::{EtlSettings, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR};
use crate::core::ConfigProvider;
use crate::domain::model::RowSchema;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "tweet-etl")]
#[command(about = "Convert gzipped post exports (JSON lines) into CSV tables")]
pub struct CliConfig {
    /// Directory holding the gzip archives
    #[arg(long, default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: PathBuf,

    /// Directory receiving one CSV per archive
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub dest_dir: PathBuf,

    /// Number of archives converted at the same time
    #[arg(long, default_value = "1")]
    pub concurrent_files: usize,

    /// Column set: standard (36 columns) or extended (40 columns)
    #[arg(long, default_value = "standard")]
    pub schema: RowSchema,

    /// TOML configuration file; replaces the directory and schema flags
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write warnings (skipped records, abandoned files) to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Emit JSON log lines instead of the compact console format
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn settings(&self) -> EtlSettings {
        EtlSettings::from_provider(self)
    }
}

impl ConfigProvider for CliConfig {
    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn output_dir(&self) -> &Path {
        &self.dest_dir
    }

    fn concurrent_files(&self) -> usize {
        self.concurrent_files
    }

    fn schema(&self) -> RowSchema {
        self.schema
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        validation::validate_run_settings(&self.source_dir, &self.dest_dir, self.concurrent_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["tweet-etl"]);
        assert_eq!(config.source_dir, PathBuf::from("data/raw"));
        assert_eq!(config.dest_dir, PathBuf::from("data/interim"));
        assert_eq!(config.concurrent_files, 1);
        assert_eq!(config.schema, RowSchema::Standard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::parse_from([
            "tweet-etl",
            "--source-dir",
            "in",
            "--dest-dir",
            "out",
            "--schema",
            "extended",
            "--concurrent-files",
            "4",
        ]);
        let settings = config.settings();
        assert_eq!(settings.source_dir, PathBuf::from("in"));
        assert_eq!(settings.schema, RowSchema::Extended);
        assert_eq!(settings.concurrent_files, 4);
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = CliConfig::parse_from(["tweet-etl", "--concurrent-files", "0"]);
        assert!(config.validate().is_err());
    }
}
