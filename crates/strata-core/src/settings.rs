// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime settings for render-data extraction.

use crate::{asset::AssetUUID, renderer::RenderCategory};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// Key of the built-in prototyping grey material used by grey-box meshes.
pub const PROTOTYPE_GREY_MATERIAL: AssetUUID =
    AssetUUID::from_u128(0x6bd5_e7e6_b7be_9801_e032_1422_6cba_1e96);

/// A collection of settings that affect how render records are extracted.
///
/// Loaded from RON; missing fields take their [`Default`] value.
///
/// ```
/// use strata_core::settings::ExtractionSettings;
///
/// let settings = ExtractionSettings::from_ron_str("(parallel: false)").unwrap();
/// assert!(!settings.parallel);
/// assert!(settings.emit_sort_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Replaces every component's built-in fallback category when set.
    pub default_category: Option<RenderCategory>,
    /// If `false`, records are filed without sort keys.
    pub emit_sort_keys: bool,
    /// Fan extraction out over the rayon pool.
    pub parallel: bool,
    /// Minimum number of objects handed to one rayon task.
    pub min_objects_per_task: usize,
    /// The material assigned to generated grey-box meshes.
    pub grey_box_material: AssetUUID,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            default_category: None,
            emit_sort_keys: true,
            parallel: true,
            min_objects_per_task: 64,
            grey_box_material: PROTOTYPE_GREY_MATERIAL,
        }
    }
}

impl ExtractionSettings {
    /// Parses settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Reads and parses a RON settings file.
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| SettingsError::Io {
            path: path.as_ref().display().to_string(),
            source_error: e.to_string(),
        })?;
        let settings = Self::from_ron_str(&text)?;
        log::info!(
            "Loaded extraction settings from '{}'",
            path.as_ref().display()
        );
        Ok(settings)
    }

    /// Serializes the settings as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).map_err(|e| SettingsError::Parse(e.to_string()))
    }
}

/// An error raised while loading [`ExtractionSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io {
        /// The path that failed to load.
        path: String,
        /// The underlying I/O error.
        source_error: String,
    },
    /// The text is not valid settings RON.
    Parse(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io { path, source_error } => {
                write!(f, "Failed to read settings from '{path}': {source_error}")
            }
            SettingsError::Parse(details) => write!(f, "Invalid settings: {details}"),
        }
    }
}

impl std::error::Error for SettingsError {}
