//! Configuration management for dirnav.
//!
//! Parses `dirnav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `site.document_root` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ## Example
//!
//! ```toml
//! [site]
//! document_root = "${DOCUMENT_ROOT:-public}"
//!
//! [cache]
//! enabled = true
//! max_age = 300
//! file_name = ".cache"
//! max_nodes = 2000
//!
//! [tree]
//! depth_limit = -1
//!
//! [menu]
//! list_type = "ul"
//! style = "list-style: none"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document root.
    pub document_root: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override tree depth limit.
    pub depth_limit: Option<i32>,
    /// Override menu list type.
    pub list_type: Option<String>,
    /// Override menu list style.
    pub style: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dirnav.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (document root as a raw string from TOML).
    site: SiteConfigRaw,
    /// Disk cache configuration.
    pub cache: CacheConfig,
    /// Tree building configuration.
    pub tree: TreeConfig,
    /// Menu rendering configuration.
    pub menu: MenuConfig,

    /// Resolved document root (set after loading).
    #[serde(skip)]
    pub document_root: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    document_root: Option<String>,
}

/// Disk cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether built trees are persisted to disk.
    pub enabled: bool,
    /// Maximum cache file age in seconds.
    pub max_age: u64,
    /// Cache file name inside each base directory.
    pub file_name: String,
    /// Maximum number of nodes written to one cache file.
    pub max_nodes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: 300,
            file_name: ".cache".to_owned(),
            max_nodes: 2000,
        }
    }
}

impl CacheConfig {
    /// Maximum cache file age as a [`Duration`].
    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age)
    }
}

/// Tree building configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Levels to descend below the base; negative means unlimited.
    pub depth_limit: i32,
    /// Index document name inside each content directory.
    pub index_file: String,
    /// Sentinel file marking a directory hidden.
    pub hidden_marker: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth_limit: -1,
            index_file: "index.html".to_owned(),
            hidden_marker: ".hidden".to_owned(),
        }
    }
}

/// Menu rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// List element name (`ol`, `ul`, or anything else for no wrapper).
    pub list_type: String,
    /// Inline style applied to list elements.
    pub style: Option<String>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            list_type: "ol".to_owned(),
            style: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.document_root`").
        field: String,
        /// Error message (e.g., "${`DOCUMENT_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a string field to be a single file name with no directory part.
fn require_file_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if Path::new(value).file_name() != Some(value.as_ref()) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a plain file name, got {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dirnav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(document_root) = &settings.document_root {
            self.document_root.clone_from(document_root);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache.enabled = cache_enabled;
        }
        if let Some(depth_limit) = settings.depth_limit {
            self.tree.depth_limit = depth_limit;
        }
        if let Some(list_type) = &settings.list_type {
            self.menu.list_type.clone_from(list_type);
        }
        if let Some(style) = &settings.style {
            self.menu.style = Some(style.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with the document root at the working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with the document root at `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            cache: CacheConfig::default(),
            tree: TreeConfig::default(),
            menu: MenuConfig::default(),
            document_root: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_cache()?;
        self.validate_tree()?;
        require_non_empty(&self.menu.list_type, "menu.list_type")?;
        Ok(())
    }

    /// Validate cache configuration.
    fn validate_cache(&self) -> Result<(), ConfigError> {
        require_file_name(&self.cache.file_name, "cache.file_name")?;
        if self.cache.max_nodes == 0 {
            return Err(ConfigError::Validation(
                "cache.max_nodes must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate tree configuration.
    fn validate_tree(&self) -> Result<(), ConfigError> {
        require_file_name(&self.tree.index_file, "tree.index_file")?;
        require_file_name(&self.tree.hidden_marker, "tree.hidden_marker")?;
        Ok(())
    }

    /// Expand `${VAR}` and `${VAR:-default}` in `site.document_root`.
    ///
    /// Values without `${` are kept literally, so a bare `$` survives.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let Some(raw) = self.site.document_root.as_deref() else {
            return Ok(());
        };
        if !raw.contains("${") {
            return Ok(());
        }

        let expanded = shellexpand::env_with_context(raw, |var| std::env::var(var).map(Some))
            .map_err(|e| ConfigError::EnvVar {
                field: "site.document_root".to_owned(),
                message: format!("${{{}}} {}", e.var_name, e.cause),
            })?;
        self.site.document_root = Some(expanded.into_owned());
        Ok(())
    }

    /// Resolve the document root against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.document_root = match self.site.document_root.as_deref() {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };
    }
}
