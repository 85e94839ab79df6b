use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::members::COUNT_PER_PAGE;

/// Environment variable naming the default config file.
pub const CONFIG_ENV: &str = "WORKSPACE_RESOLVER_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// JSON file holding the workspace list. Empty in-memory store when unset.
    pub metadata_path: Option<PathBuf>,
    /// Bound of each event subscriber's channel.
    pub subscriber_capacity: usize,
    pub members: MembersConfig,
    pub sidebar: SidebarConfig,
    pub logging: LoggingConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            metadata_path: None,
            subscriber_capacity: 32,
            members: MembersConfig::default(),
            sidebar: SidebarConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembersConfig {
    pub page_size: usize,
}

impl Default for MembersConfig {
    fn default() -> Self {
        Self {
            page_size: COUNT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    pub enable_new_setting_modal: bool,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            enable_new_setting_modal: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Human,
        }
    }
}

impl ResolverConfig {
    pub fn from_yaml(path: &Path, yaml: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig =
            serde_yaml_ng::from_str(yaml).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &yaml)
    }

    /// Loads `path` if given, else the file named by [`CONFIG_ENV`] if set and
    /// present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subscriber_capacity == 0 {
            return Err(ConfigError::Invalid(
                "subscriber_capacity must be at least 1".into(),
            ));
        }
        if self.members.page_size == 0 {
            return Err(ConfigError::Invalid(
                "members.page_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = ResolverConfig::from_yaml(Path::new("empty.yaml"), "{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.members.page_size, 8);
        assert_eq!(config.subscriber_capacity, 32);
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let yaml = r#"
metadata_path: /var/lib/notes/workspaces.json
logging:
  format: json
sidebar:
  enable_new_setting_modal: false
"#;
        let config = ResolverConfig::from_yaml(Path::new("c.yaml"), yaml).unwrap();

        assert_eq!(
            config.metadata_path.as_deref(),
            Some(Path::new("/var/lib/notes/workspaces.json"))
        );
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert!(!config.sidebar.enable_new_setting_modal);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ResolverConfig::from_yaml(Path::new("c.yaml"), "subscriber_capacity: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        let err = ResolverConfig::from_yaml(Path::new("c.yaml"), "logging: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolver.yaml");
        std::fs::write(&path, "members:\n  page_size: 20\n").unwrap();

        let config = ResolverConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.members.page_size, 20);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ResolverConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
