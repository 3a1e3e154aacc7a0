use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub const MAX_CONCURRENT_FILES: usize = 64;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if text.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Writing CSVs next to the archives would make the next run scan them.
pub fn validate_distinct_dirs(source: &Path, output: &Path) -> Result<()> {
    if source == output {
        return Err(EtlError::ConfigValidationError {
            field: "output_dir".to_string(),
            message: format!(
                "output directory must differ from source directory ({})",
                source.display()
            ),
        });
    }
    Ok(())
}

/// Checks shared by every configuration source.
pub fn validate_run_settings(source: &Path, output: &Path, concurrent_files: usize) -> Result<()> {
    validate_path("source_dir", source)?;
    validate_path("output_dir", output)?;
    validate_distinct_dirs(source, output)?;
    validate_range("concurrent_files", concurrent_files, 1, MAX_CONCURRENT_FILES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("source_dir", Path::new("data/raw")).is_ok());
        assert!(validate_path("source_dir", Path::new("")).is_err());
        assert!(validate_path("source_dir", Path::new("  ")).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("concurrent_files", 4, 1, MAX_CONCURRENT_FILES).is_ok());
        assert!(validate_range("concurrent_files", 0, 1, MAX_CONCURRENT_FILES).is_err());
        assert!(validate_range("concurrent_files", 65, 1, MAX_CONCURRENT_FILES).is_err());
    }

    #[test]
    fn test_validate_run_settings() {
        assert!(validate_run_settings(Path::new("raw"), Path::new("interim"), 1).is_ok());
        assert!(matches!(
            validate_run_settings(Path::new("raw"), Path::new("raw"), 1),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }
}
