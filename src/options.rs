//! Runtime binding options with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// Tunables for paint array storage and upload. `#[serde(default)]` lets a
/// TOML file override any subset of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BindingOptions {
    /// Keep CPU paint arrays after upload so feature-state changes can be
    /// re-evaluated and written into the existing buffers.
    pub retain_paint_arrays: bool,
    /// Prefix of vertex buffer debug labels (`"<prefix> <property>"`).
    pub buffer_label_prefix: String,
    /// Vertices reserved up front in every paint array.
    pub reserve_vertices: usize,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            retain_paint_arrays: false,
            buffer_label_prefix: "paint".to_owned(),
            reserve_vertices: 0,
        }
    }
}

impl BindingOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, BindError> {
        let content = std::fs::read_to_string(path).map_err(BindError::Io)?;
        toml::from_str(&content)
            .map_err(|e| BindError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), BindError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BindError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(BindError::Io)?;
        }
        std::fs::write(path, content).map_err(BindError::Io)
    }
}
