//! Layered configuration for the wordwatch binary.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - `wordwatch.toml` in the working directory
//! - environment variables prefixed `WORDWATCH_`, with `__` separating
//!   nested levels: `WORDWATCH_LOGGING__DEFAULT=debug` sets
//!   `logging.default`.

use std::collections::HashMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "wordwatch.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Lowercase tokens and queries before matching.
    #[serde(default = "default_true")]
    pub case_insensitive: bool,

    /// Paths registered at startup.
    #[serde(default)]
    pub watch: WatchTargets,

    /// Log levels; see [`crate::logging`].
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Watch roots to register before the query loop starts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchTargets {
    /// Individual files.
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Directory trees, watched recursively.
    #[serde(default)]
    pub directories: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level directive (quiet operation wants "warn").
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `wordwatch::watcher = "debug"`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            watch: WatchTargets::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load from all sources, using [`CONFIG_FILE`] as the file layer.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from all sources with an explicit config file path.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("WORDWATCH_").map(|key| {
                // Double underscore separates nesting levels; single
                // underscores stay part of the field name.
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }
}
