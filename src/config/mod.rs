#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::RowSchema;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_DIR: &str = "data/raw";
pub const DEFAULT_OUTPUT_DIR: &str = "data/interim";

/// Resolved run settings, whichever source they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlSettings {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub concurrent_files: usize,
    pub schema: RowSchema,
}

impl EtlSettings {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            concurrent_files: 1,
            schema: RowSchema::Standard,
        }
    }

    /// Snapshot of whichever source (CLI flags, TOML file) configured the run.
    pub fn from_provider(config: &impl ConfigProvider) -> Self {
        Self::new(config.source_dir(), config.output_dir())
            .with_concurrent_files(config.concurrent_files())
            .with_schema(config.schema())
    }

    pub fn with_concurrent_files(mut self, concurrent_files: usize) -> Self {
        self.concurrent_files = concurrent_files;
        self
    }

    pub fn with_schema(mut self, schema: RowSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl Default for EtlSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_DIR, DEFAULT_OUTPUT_DIR)
    }
}

impl ConfigProvider for EtlSettings {
    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn concurrent_files(&self) -> usize {
        self.concurrent_files
    }

    fn schema(&self) -> RowSchema {
        self.schema
    }
}

impl Validate for EtlSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_run_settings(&self.source_dir, &self.output_dir, self.concurrent_files)
    }
}
