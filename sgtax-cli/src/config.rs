//! `sgtax.toml` configuration.
//!
//! ```toml
//! [defaults]
//! payer = "EMPLOYEE"
//! citizenship = "RESIDENT"
//!
//! [logging]
//! level = "info"
//! file = "sgtax.log"
//!
//! [export]
//! directory = "reports"
//! ```
//!
//! Every table and key is optional. Command-line flags take precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sgtax_data::SubmissionDefaults;
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sgtax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub defaults: SubmissionDefaults,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory for reports written without an explicit path.
    pub directory: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(
        content: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sgtax_core::{CitizenshipCategory, PayerCategory};

    use super::*;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        Config::from_toml_str(content, Path::new("test.toml"))
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse("").unwrap(), Config::default());
        assert_eq!(Config::default().logging.level, "info");
    }

    #[test]
    fn full_file() {
        let config = parse(
            r#"
[defaults]
payer = "SOLE_PROPRIETOR"
citizenship = "FOREIGNER"

[logging]
level = "debug"
file = "sgtax.log"

[export]
directory = "reports"
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.payer, PayerCategory::SoleProprietor);
        assert_eq!(config.defaults.citizenship, CitizenshipCategory::Foreigner);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("sgtax.log")));
        assert_eq!(config.export.directory, Some(PathBuf::from("reports")));
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = parse("[defaults]\ncitizenship = \"CITIZEN_PR\"\n").unwrap();

        assert_eq!(config.defaults.payer, PayerCategory::Employee);
        assert_eq!(config.defaults.citizenship, CitizenshipCategory::Resident);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn unknown_payer_is_parse_error() {
        let result = parse("[defaults]\npayer = \"PARTNERSHIP\"\n");

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        assert!(parse("[logging]\nverbosity = 3\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("/no/such/dir/sgtax.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_file_is_error_when_required() {
        let result = Config::load(Path::new("/no/such/dir/sgtax.toml"));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
