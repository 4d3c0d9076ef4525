/// Configuration system for pydigest
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, DigestError};
use crate::extract::FilterSpec;
use crate::glob_utils::compile_patterns;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Name-based class and method filtering
    #[serde(default)]
    pub filter: FilterConfig,

    /// Input file selection
    #[serde(default)]
    pub walk: WalkConfig,

    /// Output destinations
    #[serde(default)]
    pub output: OutputConfig,
}

/// Names that admit or reject definitions
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FilterConfig {
    /// When non-empty, only these classes are emitted
    #[serde(default)]
    pub include_classes: Vec<String>,

    /// When non-empty, only these methods and functions are emitted
    #[serde(default)]
    pub include_methods: Vec<String>,

    #[serde(default)]
    pub exclude_classes: Vec<String>,

    #[serde(default)]
    pub exclude_methods: Vec<String>,
}

/// Directory walk configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalkConfig {
    /// File name globs to keep (empty keeps everything)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File name globs to drop
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// File name globs always left out, even when included
    #[serde(default = "default_ignore_files")]
    pub ignore_files: Vec<String>,

    /// Maximum file size to read (in bytes)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Where the digest is written
    #[serde(default = "default_digest_path")]
    pub digest_path: PathBuf,

    /// When set, a notebook is written here as well
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_path: Option<PathBuf>,
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.py".to_string()]
}

fn default_ignore_dirs() -> Vec<String> {
    ["__pycache__", ".pytest_cache", ".git", ".idea", "cache", "logs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ignore_files() -> Vec<String> {
    [
        "*.pyc",
        "__init__.py",
        "*test*",
        "*scratch*",
        "*code_summary.py*",
        "*.json",
        "*.yaml",
        "*.md",
        "*.txt",
        "*.csv",
        "*.png",
        "*.jpg",
        "*.ipynb",
        "*.pkl",
        "*.pickle",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_file_size() -> u64 {
    1_048_576 // 1 MB
}

fn default_digest_path() -> PathBuf {
    PathBuf::from("code_summary.py")
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            ignore_dirs: default_ignore_dirs(),
            ignore_files: default_ignore_files(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            digest_path: default_digest_path(),
            notebook_path: None,
        }
    }
}

impl From<&FilterConfig> for FilterSpec {
    fn from(config: &FilterConfig) -> Self {
        FilterSpec::new()
            .with_include_classes(config.include_classes.iter().cloned())
            .with_include_methods(config.include_methods.iter().cloned())
            .with_exclude_classes(config.exclude_classes.iter().cloned())
            .with_exclude_methods(config.exclude_methods.iter().cloned())
    }
}

/// Comma-separated list from an environment variable, blanks dropped
fn env_list(key: &str) -> Option<Vec<String>> {
    let value = std::env::var(key).ok()?;
    Some(
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn check_names(key: &str, names: &[String]) -> Result<(), ConfigError> {
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "names must not be empty".to_string(),
        });
    }
    Ok(())
}

fn check_patterns(key: &str, patterns: &[String]) -> Result<(), ConfigError> {
    compile_patterns(patterns).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, DigestError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, or defaults when absent
    pub fn load_or_default() -> Result<Self, DigestError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Explicit file if given, else the default location; then env overrides
    pub fn load(path: Option<&Path>) -> Result<Self, DigestError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), DigestError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DigestError> {
        check_names("filter.include_classes", &self.filter.include_classes)?;
        check_names("filter.include_methods", &self.filter.include_methods)?;
        check_names("filter.exclude_classes", &self.filter.exclude_classes)?;
        check_names("filter.exclude_methods", &self.filter.exclude_methods)?;

        check_patterns("walk.include_patterns", &self.walk.include_patterns)?;
        check_patterns("walk.exclude_patterns", &self.walk.exclude_patterns)?;
        check_patterns("walk.ignore_files", &self.walk.ignore_files)?;

        if self.walk.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "walk.max_file_size".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.output.digest_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.digest_path".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Some(names) = env_list("PYDIGEST_INCLUDE_CLASSES") {
            self.filter.include_classes = names;
        }
        if let Some(names) = env_list("PYDIGEST_INCLUDE_METHODS") {
            self.filter.include_methods = names;
        }
        if let Some(names) = env_list("PYDIGEST_EXCLUDE_CLASSES") {
            self.filter.exclude_classes = names;
        }
        if let Some(names) = env_list("PYDIGEST_EXCLUDE_METHODS") {
            self.filter.exclude_methods = names;
        }

        if let Ok(path) = std::env::var("PYDIGEST_DIGEST_PATH")
            && !path.is_empty()
        {
            self.output.digest_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("PYDIGEST_NOTEBOOK_PATH")
            && !path.is_empty()
        {
            self.output.notebook_path = Some(PathBuf::from(path));
        }

        if let Ok(size) = std::env::var("PYDIGEST_MAX_FILE_SIZE")
            && let Ok(size) = size.parse()
        {
            self.walk.max_file_size = size;
        }
    }

    /// Filter built from the `[filter]` section
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::from(&self.filter)
    }
}
