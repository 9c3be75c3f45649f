use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Settings for one processing run.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes:
///
/// ```rust
/// use galley_process::ProcessConfig;
///
/// let config = ProcessConfig::from_json(r#"{"strict": true}"#).unwrap();
/// assert!(config.strict);
/// assert!(config.guard_process_node);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessConfig {
    /// Turn error diagnostics into a failed run once output is complete.
    pub strict: bool,
    /// Detect a node processing itself in the same mode.
    pub guard_process_node: bool,
    /// Close outstanding row spans at the end of a table part with empty
    /// rows. When off, the overflow is only reported.
    pub synthesize_filler_rows: bool,
    /// Name of the processing mode the root is processed in; empty for the
    /// initial mode.
    pub initial_mode: String,
    /// Name of a stylesheet style wrapped around the whole output.
    pub initial_style: Option<String>,
    /// Deliver character data a chunk at a time rather than a character at
    /// a time.
    pub chunk_text: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            strict: false,
            guard_process_node: true,
            synthesize_filler_rows: true,
            initial_mode: String::new(),
            initial_style: None,
            chunk_text: true,
        }
    }
}

impl ProcessConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ProcessConfig = serde_json::from_str(json)?;
        log::debug!("Loaded process configuration: {:?}", config);
        Ok(config)
    }
}
