//! Configuration: the lint ruleset provider and request limits.
//!
//! The ruleset is loaded once at start-up and shared read-only for the rest
//! of the process. Loading failures are fatal for the caller; there is no
//! fallback to an empty ruleset.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use docgate_rules::{LintConfig, RawLintConfig};

use crate::error::ConfigLoadError;

/// Ruleset compiled into the binary, used when no file is configured.
pub const DEFAULT_LINT_CONFIG: &str = include_str!("../default-lint-config.json");

/// Default TCP port of the validation service.
pub const DEFAULT_PORT: u16 = 6161;

/// Where the ruleset comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// The embedded [`DEFAULT_LINT_CONFIG`].
    #[default]
    Embedded,
    /// A `.json`, `.yaml` or `.yml` file in markdownlint's format.
    File(PathBuf),
}

/// Serialization format of a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(Self::Yaml)
            }
            _ => None,
        }
    }
}

/// Parse and validate a ruleset.
///
/// # Errors
///
/// Returns an error if `content` is not a valid ruleset in `format`.
pub fn parse_lint_config(content: &str, format: ConfigFormat) -> Result<LintConfig, ConfigLoadError> {
    let raw: RawLintConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(ConfigLoadError::Json)?,
        ConfigFormat::Yaml => {
            serde_saphyr::from_str(content).map_err(|e| ConfigLoadError::Yaml(e.to_string()))?
        }
    };
    Ok(LintConfig::from_raw(raw)?)
}

/// Load the ruleset once; the returned value is never mutated.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported
/// extension, or does not contain a valid ruleset.
pub fn load_lint_config(source: &ConfigSource) -> Result<Arc<LintConfig>, ConfigLoadError> {
    let config = match source {
        ConfigSource::Embedded => parse_lint_config(DEFAULT_LINT_CONFIG, ConfigFormat::Json)?,
        ConfigSource::File(path) => {
            let format = ConfigFormat::from_path(path)
                .ok_or_else(|| ConfigLoadError::UnsupportedFormat { path: path.clone() })?;
            let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.clone(),
                source,
            })?;
            parse_lint_config(&content, format)?
        }
    };

    tracing::info!(
        source = ?source,
        rules = config.rules().len(),
        "Loaded lint ruleset"
    );
    Ok(Arc::new(config))
}

/// Per-request resource limits.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ServiceLimits {
    /// Maximum accepted request body in bytes (default: 10 MB).
    pub max_body_bytes: usize,
    /// Maximum processing time per request after the body is read (default: 30 s).
    pub request_timeout: Duration,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: 10_485_760,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServiceLimits {
    #[must_use]
    pub fn new(max_body_bytes: usize, request_timeout: Duration) -> Self {
        Self {
            max_body_bytes,
            request_timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_embedded_config_loads() {
        let config = load_lint_config(&ConfigSource::Embedded).unwrap();
        assert!(config.is_enabled("MD018"));
        assert!(!config.is_enabled("MD013"));
    }

    #[test]
    fn test_json_file_loads() {
        let file = temp_config(".json", r#"{"default": false, "MD047": true}"#);
        let config = load_lint_config(&ConfigSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(config.rules().len(), 1);
    }

    #[test]
    fn test_yaml_file_loads() {
        let file = temp_config(".yml", "default: true\nMD013:\n  line_length: 120\nMD040: false\n");
        let config = load_lint_config(&ConfigSource::File(file.path().to_path_buf())).unwrap();
        assert!(config.is_enabled("MD013"));
        assert!(!config.is_enabled("MD040"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_lint_config(&ConfigSource::File(PathBuf::from("/nonexistent/rules.json")))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }), "got: {err}");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_config(".toml", "default = true");
        let err = load_lint_config(&ConfigSource::File(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = parse_lint_config("{ not json", ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Json(_)));
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let err = parse_lint_config(r#"{"MD404": true}"#, ConfigFormat::Json).unwrap_err();
        assert!(err.to_string().contains("MD404"), "got: {err}");
    }

    #[test]
    fn test_default_limits() {
        let limits = ServiceLimits::default();
        assert_eq!(limits.max_body_bytes, 10_485_760);
        assert_eq!(limits.request_timeout, Duration::from_secs(30));
    }
}
