//! Outliner configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::types::Result;

/// Content-type marker used for drag payloads unless configured otherwise.
pub const DEFAULT_MIME_TYPE: &str = "application/x-outliner-scene-nodes";

/// Number of columns exposed by the tree model (Name, Type).
pub const COLUMN_COUNT: usize = 2;

/// Configuration for the scene outliner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlinerConfig {
    /// Content type under which drag payloads are published and accepted
    pub mime_type: String,
    /// Horizontal header labels, one per column
    pub column_headers: Vec<String>,
    /// Request selection of the dropped nodes once the drop gesture ends
    pub select_after_drop: bool,
    /// Default log filter used by `logging::init_with_filter`
    pub log_filter: String,
}

impl Default for OutlinerConfig {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            column_headers: vec!["Name".to_string(), "Type".to_string()],
            select_after_drop: true,
            log_filter: "info".to_string(),
        }
    }
}

impl OutlinerConfig {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check that the configuration is usable by the model.
    pub fn validate(&self) -> Result<()> {
        if self.mime_type.trim().is_empty() {
            return Err(Error::Config("mime_type must not be empty".to_string()));
        }
        if self.column_headers.len() != COLUMN_COUNT {
            return Err(Error::Config(format!(
                "expected {} column headers, got {}",
                COLUMN_COUNT,
                self.column_headers.len()
            )));
        }
        Ok(())
    }
}
