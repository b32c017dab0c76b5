//! sable_options: `sable.json` parsing and front-end options.
//!
//! Every field is optional in the file; missing fields take their defaults.
//!
//! ```json
//! { "maxNestingDepth": 64, "maxErrors": 20, "color": false }
//! ```

use std::path::{Path, PathBuf};

use sable_parser::{ParseOptions, DEFAULT_MAX_NESTING_DEPTH, MAX_NESTING_DEPTH_CEILING};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the config file looked up next to an input file.
pub const CONFIG_FILE_NAME: &str = "sable.json";

/// Front-end options, matching the `sable.json` schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrontendConfig {
    /// Recursion limit of the parser. Values above
    /// [`MAX_NESTING_DEPTH_CEILING`] are clamped to it.
    pub max_nesting_depth: u32,
    /// Stop rendering after this many diagnostics.
    pub max_errors: Option<usize>,
    /// Color severity labels in rendered diagnostics.
    pub color: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_errors: None,
            color: true,
        }
    }
}

impl FrontendConfig {
    pub fn parse_options(&self) -> ParseOptions {
        let max_nesting_depth = self.max_nesting_depth.min(MAX_NESTING_DEPTH_CEILING);
        if max_nesting_depth < self.max_nesting_depth {
            tracing::warn!(
                configured = self.max_nesting_depth,
                limit = MAX_NESTING_DEPTH_CEILING,
                "maxNestingDepth clamped"
            );
        }
        ParseOptions { max_nesting_depth }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a `sable.json` document from a string.
pub fn parse_config(content: &str) -> Result<FrontendConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse a `sable.json` file from a path.
pub fn parse_config_file(path: &Path) -> Result<FrontendConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the config for compiling `input`: an explicit path wins, then a
/// `sable.json` beside the input, then the defaults.
pub fn load_config(explicit: Option<&Path>, input: &Path) -> Result<FrontendConfig, ConfigError> {
    if let Some(path) = explicit {
        tracing::debug!(path = %path.display(), "loading config");
        return parse_config_file(path);
    }

    let beside = input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CONFIG_FILE_NAME);
    if beside.is_file() {
        tracing::debug!(path = %beside.display(), "loading config");
        parse_config_file(&beside)
    } else {
        Ok(FrontendConfig::default())
    }
}
