use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "gfrelease.toml";

/// File name looked up in the user config directory.
pub const USER_CONFIG_FILE: &str = ".gfrelease.toml";

/// Represents the complete configuration for gf-release.
///
/// Contains branch names, the files carrying version identifiers, history generation
/// settings, and the optional build and publish commands.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_version_files")]
    pub version_files: Vec<PathBuf>,

    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_version_files() -> Vec<PathBuf> {
    vec![PathBuf::from("package.json")]
}

fn default_production_branch() -> String {
    "master".to_string()
}

fn default_develop_branch() -> String {
    "develop".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_publish_command() -> String {
    "npm publish".to_string()
}

/// Branch names used by the git-flow model and the remote they track.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_production_branch")]
    pub production: String,

    #[serde(default = "default_develop_branch")]
    pub develop: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            production: default_production_branch(),
            develop: default_develop_branch(),
            remote: default_remote(),
        }
    }
}

impl BranchesConfig {
    /// Branches that must match their remote before a release starts.
    pub fn release_branches(&self) -> Vec<&str> {
        vec![self.production.as_str(), self.develop.as_str()]
    }
}

/// Configuration for the history file.
///
/// When `file` is unset the history step is skipped entirely.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HistoryConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Only commits whose message contains one of these strings are listed.
    #[serde(default)]
    pub include: Vec<String>,

    /// Commits whose message contains one of these strings are dropped.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub commit_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublishConfig {
    #[serde(default = "default_publish_command")]
    pub command: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            command: default_publish_command(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version_files: default_version_files(),
            branches: BranchesConfig::default(),
            history: HistoryConfig::default(),
            build: BuildConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text, filling unset keys with defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Build command, ignoring blank strings.
    pub fn build_command(&self) -> Option<&str> {
        self.build
            .command
            .as_deref()
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gfrelease.toml` in current directory
/// 3. `.gfrelease.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        log::debug!("Loading configuration from {}", path.display());
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        log::debug!("Loading configuration from ./{}", LOCAL_CONFIG_FILE);
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            log::debug!("Loading configuration from {}", config_path.display());
            fs::read_to_string(config_path)?
        } else {
            log::debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml(&config_str)
}
