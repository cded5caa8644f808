//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How an implementing type's base-list entry is matched against a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// The entry is a bare identifier equal to the root's simple name.
    #[default]
    Syntactic,
    /// The entry binds, through the semantic model, to the root's symbol.
    Semantic,
}

/// Settings for one [`Generator`](crate::Generator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GeneratorConfig {
    pub matching: MatchingMode,
    /// Process marked roots on the rayon pool. Output order is unaffected.
    pub parallel: bool,
    /// Artifact file extension, without the leading dot.
    pub extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            matching: MatchingMode::default(),
            parallel: false,
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    "cs".to_owned()
}

impl GeneratorConfig {
    /// # Errors
    /// Returns [`ConfigError::InvalidExtension`] when the extension is empty or
    /// contains dots, whitespace or path separators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.extension;
        let bad_char = ext
            .chars()
            .any(|c| c == '.' || c == '/' || c == '\\' || c.is_whitespace());
        if ext.is_empty() || bad_char {
            return Err(ConfigError::InvalidExtension(ext.clone()));
        }
        Ok(())
    }
}
