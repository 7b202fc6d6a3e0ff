use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AutotagError, Result};
use crate::repository::github::DEFAULT_API_URL;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "autotag.toml";

/// Represents the file configuration for git-autotag.
///
/// Every field is optional in the file; environment inputs override it.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tag_prefix: String,

    #[serde(default)]
    pub fetch_all_tags: bool,

    #[serde(default)]
    pub changelog: bool,

    #[serde(default)]
    pub github: GitHubConfig,
}

/// Returns the default GitHub API base URL.
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Settings for the GitHub backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: default_api_url(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autotag.toml` in current directory
/// 3. `.autotag.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if !path.exists() {
            return Ok(Config::default());
        }
        path
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path)?;
    toml::from_str(&config_str).map_err(|e| {
        AutotagError::config(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Interpret an action input as a boolean flag (`"true"`, any case)
pub fn parse_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Inputs for a single run, resolved from the environment and file config.
#[derive(Clone, Default, PartialEq)]
pub struct ActionInputs {
    pub tag_prefix: String,
    pub fetch_all_tags: bool,
    pub changelog: bool,
    pub github_token: String,
    /// Ref that triggered the run (`GITHUB_REF`)
    pub git_ref: Option<String>,
    /// Commit that triggered the run (`GITHUB_SHA`)
    pub commit_sha: Option<String>,
    /// `owner/repo` (`GITHUB_REPOSITORY`)
    pub repository: Option<String>,
    pub api_url: String,
    /// File receiving step outputs (`GITHUB_OUTPUT`)
    pub output_path: Option<PathBuf>,
}

impl ActionInputs {
    /// Overlay environment values obtained through `lookup` onto `config`.
    ///
    /// Values are trimmed; empty values count as unset.
    pub fn from_lookup<F>(config: &Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        ActionInputs {
            tag_prefix: get("INPUT_TAG_PREFIX").unwrap_or_else(|| config.tag_prefix.clone()),
            fetch_all_tags: get("INPUT_FETCH_ALL_TAGS")
                .map(|v| parse_truthy(&v))
                .unwrap_or(config.fetch_all_tags),
            changelog: get("INPUT_CHANGELOG")
                .map(|v| parse_truthy(&v))
                .unwrap_or(config.changelog),
            github_token: get("INPUT_GITHUB_TOKEN")
                .or_else(|| get("GITHUB_TOKEN"))
                .unwrap_or_default(),
            git_ref: get("GITHUB_REF"),
            commit_sha: get("GITHUB_SHA"),
            repository: get("GITHUB_REPOSITORY"),
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| config.github.api_url.clone()),
            output_path: get("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    /// Read inputs from the process environment
    pub fn from_env(config: &Config) -> Self {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }
}

impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInputs")
            .field("tag_prefix", &self.tag_prefix)
            .field("fetch_all_tags", &self.fetch_all_tags)
            .field("changelog", &self.changelog)
            .field("github_token", &"<redacted>")
            .field("git_ref", &self.git_ref)
            .field("commit_sha", &self.commit_sha)
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("output_path", &self.output_path)
            .finish()
    }
}
