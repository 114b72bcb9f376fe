//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `DOI_FILL_<SECTION>__<KEY>` environment variables. Command-line flags are
//! applied on top by the binary.
//!
//! # Configuration File Format
//!
//! ```toml
//! [lookup]
//! base_url = "https://api.crossref.org"
//! max_attempts = 4
//! retry_delay_ms = 1000
//! timeout_secs = 30
//! mailto = "you@example.org"
//! author_query = "raw"        # or "last-names"
//!
//! [output]
//! suffix = "_doi.bib"
//! indent = "    "
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::AuthorQuery;
use crate::sources::CROSSREF_API_BASE;
use crate::utils::RetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DOI_FILL";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Registry lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Registry lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the CrossRef REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Attempts per entry, the first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Contact address for CrossRef's polite pool
    #[serde(default)]
    pub mailto: Option<String>,

    /// How the author part of the query is built
    #[serde(default)]
    pub author_query: AuthorQuery,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            mailto: None,
            author_query: AuthorQuery::default(),
        }
    }
}

impl LookupConfig {
    pub fn retry(&self) -> RetryConfig {
        RetryConfig::default()
            .max_attempts(self.max_attempts)
            .delay(Duration::from_millis(self.retry_delay_ms))
    }
}

fn default_base_url() -> String {
    CROSSREF_API_BASE.to_string()
}

fn default_max_attempts() -> u32 {
    4
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

/// Output file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Appended to the input file name to form the output path
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Indentation in front of each field
    #[serde(default = "default_indent")]
    pub indent: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            indent: default_indent(),
        }
    }
}

fn default_suffix() -> String {
    "_doi.bib".to_string()
}

fn default_indent() -> String {
    "    ".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// First existing config file among `./doi-fill.toml` and
/// `<config dir>/doi-fill/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("doi-fill.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("doi-fill").join("config.toml"))
        .filter(|path| path.is_file())
}
