//! Script host backed by `ssi.toml` settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ssi_config::Config;
use ssi_engine::{Attribute, ScriptError, ScriptHost};

/// Per-render environment.
#[derive(Debug, Default, Clone)]
pub(crate) struct RenderEnv {
    /// Language subdirectory tried before the templates directory itself.
    pub(crate) language: Option<String>,
}

impl RenderEnv {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            language: config.templates_resolved.language.clone(),
        }
    }
}

/// Host exposing configured variables, translations and a few built-in methods.
///
/// Methods:
/// - `Version`: the CLI version
/// - `Language`: the active language, or empty text
#[derive(Debug)]
pub(crate) struct ConfigHost {
    templates_dir: PathBuf,
    vars: BTreeMap<String, Attribute>,
    translations: BTreeMap<String, String>,
    version: String,
}

impl ConfigHost {
    pub(crate) fn from_config(config: &Config, version: &str) -> Self {
        let vars = config
            .vars
            .iter()
            .map(|(name, value)| {
                let attribute = if config.is_translated(name) {
                    Attribute::translated(value)
                } else {
                    Attribute::new(value)
                };
                (name.clone(), attribute)
            })
            .collect();

        Self {
            templates_dir: config.templates_resolved.dir.clone(),
            vars,
            translations: config.translations.clone(),
            version: version.to_owned(),
        }
    }

    pub(crate) fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

impl ScriptHost for ConfigHost {
    type Env = RenderEnv;

    fn localize_path(&self, env: &RenderEnv, path: &str) -> PathBuf {
        if let Some(language) = &env.language {
            let localized = self.templates_dir.join(language).join(path);
            if localized.is_file() {
                return localized;
            }
        }
        self.templates_dir.join(path)
    }

    fn translate(&self, _env: &RenderEnv, text: &str) -> String {
        self.translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_owned())
    }

    fn property(&self, name: &str) -> Option<Attribute> {
        self.vars.get(name).cloned()
    }

    fn invoke(&self, name: &str, env: &RenderEnv) -> Result<Option<String>, ScriptError> {
        Ok(match name {
            "Version" => Some(self.version.clone()),
            "Language" => Some(env.language.clone().unwrap_or_default()),
            _ => None,
        })
    }
}
