use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Prefix of every environment variable read by [`StudioConfig::from_env`].
pub const ENV_PREFIX: &str = "THUMBFORGE_";

/// Runtime configuration, loaded from `THUMBFORGE_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// Suggestions endpoint. Unset means suggestions are always empty.
    #[serde(default)]
    pub suggestions_url: Option<String>,

    /// Query parameter carrying the topic.
    #[serde(default = "default_suggestions_param")]
    pub suggestions_param: String,

    /// Response field holding the array of strings.
    #[serde(default = "default_suggestions_field")]
    pub suggestions_field: String,

    #[serde(default = "default_suggestions_timeout_ms")]
    pub suggestions_timeout_ms: u64,

    /// Font file for the title; the system sans-serif bold face when unset.
    #[serde(default)]
    pub title_font: Option<PathBuf>,

    /// Font file for the caption; falls back to `title_font`, then the system face.
    #[serde(default)]
    pub caption_font: Option<PathBuf>,
}

fn default_suggestions_param() -> String {
    "q".to_string()
}

fn default_suggestions_field() -> String {
    "suggestions".to_string()
}

fn default_suggestions_timeout_ms() -> u64 {
    5_000
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            suggestions_url: None,
            suggestions_param: default_suggestions_param(),
            suggestions_field: default_suggestions_field(),
            suggestions_timeout_ms: default_suggestions_timeout_ms(),
            title_font: None,
            caption_font: None,
        }
    }
}

impl StudioConfig {
    /// Load from the process environment, after reading an optional `.env` file.
    pub fn from_env() -> ThumbResult<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX)
            .from_env::<StudioConfig>()
            .map_err(|e| ThumbError::config(format!("failed to load config: {e}")))
    }

    /// Load from explicit `(NAME, value)` pairs, names including the prefix.
    pub fn from_vars<I>(vars: I) -> ThumbResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, StudioConfig>(vars)
            .map_err(|e| ThumbError::config(format!("failed to load config: {e}")))
    }

    pub fn suggestions_timeout(&self) -> Duration {
        Duration::from_millis(self.suggestions_timeout_ms)
    }
}
