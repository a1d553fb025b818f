//! `ssi render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use ssi_config::{CliSettings, Config};
use ssi_engine::{DataList, Processor, ProcessorConfig, ScriptHost};

use crate::data;
use crate::error::CliError;
use crate::host::{ConfigHost, RenderEnv};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Template to render, relative to the templates directory.
    template: String,

    /// JSON file providing the data list.
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover ssi.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Templates directory (overrides config).
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Template language (overrides config).
    #[arg(short, long)]
    language: Option<String>,

    /// Maximum include depth, 0 for unlimited (overrides config).
    #[arg(long)]
    max_include_depth: Option<usize>,

    /// Host variable as NAME=VALUE (repeatable, overrides config).
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Enable verbose output (debug logs for unresolved names).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or data loading fails, or the
    /// template itself cannot be read.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            templates_dir: self.templates_dir,
            language: self.language,
            max_include_depth: self.max_include_depth,
            vars: self.vars,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let data = match &self.data {
            Some(path) => Some(data::parse_data(&std::fs::read_to_string(path)?)?),
            None => None,
        };

        let html = render_template(&config, version, &self.template, data)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Render `template` with a host built from `config`.
fn render_template(
    config: &Config,
    version: &str,
    template: &str,
    data: Option<DataList>,
) -> Result<String, CliError> {
    let host = ConfigHost::from_config(config, version);
    let env = RenderEnv::from_config(config);
    let extensions = data::extensions();

    let processor_config = match config.engine.include_limit() {
        Some(limit) => ProcessorConfig::new().with_max_include_depth(limit),
        None => ProcessorConfig::new().without_include_limit(),
    };

    let mut processor = Processor::new(&host, &env)
        .with_config(processor_config)
        .with_extensions(&extensions);
    if let Some(data) = data {
        processor = processor.with_data(data);
    }

    let path = host.localize_path(&env, template);
    tracing::debug!(
        templates_dir = %host.templates_dir().display(),
        path = %path.display(),
        "Rendering template"
    );

    processor.process_file(&path).map_err(|e| {
        CliError::Validation(format!("Cannot read template {}: {e}", path.display()))
    })
}

/// Parse a `NAME=VALUE` pair.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}
