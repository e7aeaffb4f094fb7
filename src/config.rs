//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rntree/rntree.toml`
//! 3. Explicit config file passed by the caller
//! 4. Environment variables: `RNTREE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};

const ENV_PREFIX: &str = "RNTREE";

/// Options for [`to_tree_string`](crate::tree_traits::TreeNodeConvert).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RenderSettings {
    /// Append `[gold=N]` to every rendered node
    pub show_gold_label: bool,
    /// Append `[err=X]` to every rendered node
    pub show_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Initial node capacity of a new arena
    pub arena_capacity: usize,
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_capacity: 64,
            render: RenderSettings::default(),
        }
    }
}

/// Get the XDG config directory for rntree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rntree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rntree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `config_file`, when given, must exist; the global file is optional.
    pub fn load(config_file: Option<&Path>) -> TreeResult<Self> {
        Self::load_layers(global_config_path(), config_file, ENV_PREFIX)
    }

    #[instrument(level = "debug")]
    fn load_layers(
        global: Option<PathBuf>,
        config_file: Option<&Path>,
        env_prefix: &str,
    ) -> TreeResult<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("arena_capacity", defaults.arena_capacity as i64)
            .map_err(config_err)?
            .set_default("render.show_gold_label", defaults.render.show_gold_label)
            .map_err(config_err)?
            .set_default("render.show_error", defaults.render.show_error)
            .map_err(config_err)?;

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }
}

fn config_err(e: ConfigError) -> TreeError {
    TreeError::Config {
        message: e.to_string(),
    }
}
