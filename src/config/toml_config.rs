use crate::config::EtlSettings;
use crate::core::ConfigProvider;
use crate::domain::model::RowSchema;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub performance: Option<PerformanceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub schema: Option<RowSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub warnings_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub concurrent_files: Option<usize>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}`; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn concurrent_files(&self) -> usize {
        self.performance
            .as_ref()
            .and_then(|p| p.concurrent_files)
            .unwrap_or(1)
    }

    pub fn schema(&self) -> RowSchema {
        self.extract.schema.unwrap_or_default()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn warnings_log(&self) -> Option<&Path> {
        self.monitoring
            .as_ref()
            .and_then(|m| m.warnings_log.as_deref())
    }

    pub fn settings(&self) -> EtlSettings {
        EtlSettings::from_provider(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_dir(&self) -> &Path {
        &self.source.dir
    }

    fn output_dir(&self) -> &Path {
        &self.load.output_dir
    }

    fn concurrent_files(&self) -> usize {
        TomlConfig::concurrent_files(self)
    }

    fn schema(&self) -> RowSchema {
        TomlConfig::schema(self)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_run_settings(
            &self.source.dir,
            &self.load.output_dir,
            self.concurrent_files(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[pipeline]
name = "daily-export"

[source]
dir = "data/raw"

[extract]
schema = "extended"

[load]
output_dir = "data/interim"

[performance]
concurrent_files = 4
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "daily-export");
        assert_eq!(config.source.dir, PathBuf::from("data/raw"));
        assert_eq!(config.schema(), RowSchema::Extended);
        assert_eq!(config.concurrent_files(), 4);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections_default() {
        let toml_content = r#"
[pipeline]
name = "minimal"

[source]
dir = "in"

[load]
output_dir = "out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.schema(), RowSchema::Standard);
        assert_eq!(config.concurrent_files(), 1);
        assert_eq!(config.settings(), EtlSettings::new("in", "out"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TWEET_ETL_TEST_ROOT", "/srv/corpus");

        let toml_content = r#"
[pipeline]
name = "env"

[source]
dir = "${TWEET_ETL_TEST_ROOT}/raw"

[load]
output_dir = "${TWEET_ETL_TEST_UNSET}/interim"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.dir, PathBuf::from("/srv/corpus/raw"));
        assert_eq!(
            config.load.output_dir,
            PathBuf::from("${TWEET_ETL_TEST_UNSET}/interim")
        );

        std::env::remove_var("TWEET_ETL_TEST_ROOT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "same-dirs"

[source]
dir = "data"

[load]
output_dir = "data"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_schema_is_parse_error() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
dir = "in"

[extract]
schema = "wide"

[load]
output_dir = "out"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
dir = "in"

[load]
output_dir = "out"

[monitoring]
enabled = true
warnings_log = "logs/warnings.txt"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert!(config.monitoring_enabled());
        assert_eq!(config.warnings_log(), Some(Path::new("logs/warnings.txt")));
    }
}
