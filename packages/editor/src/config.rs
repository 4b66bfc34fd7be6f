use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "blockwise.config.json";

/// Editor instance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Instance id; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Type of blocks created by the "plus" action and Enter handlers
    #[serde(default = "default_block_type")]
    pub default_block_type: String,

    /// Reject every mutating command
    #[serde(default)]
    pub read_only: bool,

    /// Focus the first block when the editor is mounted
    #[serde(default)]
    pub auto_focus: bool,

    /// Whether the host UI has an insertion menu
    #[serde(default = "default_true")]
    pub action_menu: bool,
}

fn default_block_type() -> String {
    "paragraph".to_string()
}

fn default_true() -> bool {
    true
}

impl EditorConfig {
    /// Load `blockwise.config.json` from a directory, or defaults if absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            id: None,
            default_block_type: default_block_type(),
            read_only: false,
            auto_focus: false,
            action_menu: true,
        }
    }
}
