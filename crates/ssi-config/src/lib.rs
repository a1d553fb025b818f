//! Configuration management for the SSI template engine.
//!
//! Parses `ssi.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `templates.dir`
//! - every value in `[vars]`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the templates directory.
    pub templates_dir: Option<PathBuf>,
    /// Override the template language.
    pub language: Option<String>,
    /// Override the include depth limit (0 disables it).
    pub max_include_depth: Option<usize>,
    /// Additional host variables; replace `[vars]` entries with the same name.
    pub vars: Vec<(String, String)>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ssi.toml";

/// Default include depth limit.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 1024;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Templates configuration (paths are relative strings from TOML).
    templates: TemplatesConfigRaw,
    /// Engine limits.
    pub engine: EngineConfig,
    /// Host variables available to `get var=...`.
    pub vars: BTreeMap<String, String>,
    /// Translation table used for attributes flagged for translation.
    pub translations: BTreeMap<String, String>,
    /// Which host variables are flagged for translation.
    pub translate: TranslateConfig,

    /// Resolved templates configuration (set after loading).
    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw templates configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    dir: Option<String>,
    language: Option<String>,
}

/// Resolved templates configuration with absolute paths.
#[derive(Debug, Default)]
pub struct TemplatesConfig {
    /// Base directory include paths are resolved against.
    pub dir: PathBuf,
    /// Language subdirectory tried before the base directory.
    pub language: Option<String>,
}

/// Engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nested inclusions; 0 disables the limit.
    pub max_include_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Include depth limit, or `None` when disabled.
    #[must_use]
    pub fn include_limit(&self) -> Option<usize> {
        (self.max_include_depth > 0).then_some(self.max_include_depth)
    }
}

/// Translation flags.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TranslateConfig {
    /// Names of `[vars]` entries whose values are translated before output.
    pub vars: Vec<String>,
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
        /// Config field path (e.g., "`templates.dir`").
        field: String,
        /// Error message (e.g., "${`TEMPLATES`} not set").
        message: String,
    },
}

/// Require an optional string field to be non-empty when present.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ssi.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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

        Ok(config)
    }

    /// Whether the host variable `name` is flagged for translation.
    #[must_use]
    pub fn is_translated(&self, name: &str) -> bool {
        self.translate.vars.iter().any(|v| v == name)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.templates_dir {
            self.templates_resolved.dir.clone_from(dir);
        }
        if let Some(language) = &settings.language {
            self.templates_resolved.language = Some(language.clone());
        }
        if let Some(depth) = settings.max_include_depth {
            self.engine.max_include_depth = depth;
        }
        for (name, value) in &settings.vars {
            self.vars.insert(name.clone(), value.clone());
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            templates: TemplatesConfigRaw::default(),
            engine: EngineConfig::default(),
            vars: BTreeMap::new(),
            translations: BTreeMap::new(),
            translate: TranslateConfig::default(),
            templates_resolved: TemplatesConfig {
                dir: base.join("templates"),
                language: None,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        // Validate raw values before they are resolved
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(self.templates.dir.as_deref(), "templates.dir")?;
        require_non_empty(self.templates.language.as_deref(), "templates.language")?;
        self.validate_translate()?;
        Ok(())
    }

    /// Every variable flagged for translation must exist in `[vars]`.
    fn validate_translate(&self) -> Result<(), ConfigError> {
        if let Some(missing) = self
            .translate
            .vars
            .iter()
            .find(|name| !self.vars.contains_key(*name))
        {
            return Err(ConfigError::Validation(format!(
                "translate.vars entry {missing} has no matching [vars] entry"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.templates.dir {
            self.templates.dir = Some(expand::expand_env(dir, "templates.dir")?);
        }

        for (name, value) in &mut self.vars {
            *value = expand::expand_env(value, &format!("vars.{name}"))?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.templates_resolved = TemplatesConfig {
            dir: config_dir.join(self.templates.dir.as_deref().unwrap_or("templates")),
            language: self.templates.language.clone(),
        };
    }
}
