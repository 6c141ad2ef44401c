use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{from_io, IntegrityError};
use crate::filter::{DEFAULT_EXACT_NAMES, DEFAULT_SUBSTRINGS};

/// Exclusion data in its on-disk shape.
///
/// ```json
/// { "exactNames": [".DS_Store", "Thumbs.db"], "substrings": [".webapp-nextcloud-"] }
/// ```
///
/// Missing fields are empty lists, not the defaults: a config that names only
/// `exactNames` has no substring rules. [`ExclusionConfig::default`] carries
/// the baseline noise list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExclusionConfig {
    #[serde(default)]
    pub exact_names: Vec<String>,

    #[serde(default)]
    pub substrings: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            exact_names: DEFAULT_EXACT_NAMES.iter().map(|s| s.to_string()).collect(),
            substrings:  DEFAULT_SUBSTRINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionConfig {
    pub fn from_json_str(s: &str) -> Result<Self, IntegrityError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| IntegrityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, IntegrityError> {
        let config: Self = toml::from_str(s).map_err(|e| IntegrityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IntegrityError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self, IntegrityError> = match ext.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => {
                return Err(IntegrityError::Config(format!(
                    "{}: unsupported format, expected .json or .toml",
                    path.display()
                )))
            }
        };

        let text = std::fs::read_to_string(path).map_err(|e| from_io(path.to_path_buf(), e))?;
        let config = parse(&text)?;

        tracing::debug!(
            path = %path.display(),
            exact = config.exact_names.len(),
            substrings = config.substrings.len(),
            "loaded exclusion config"
        );
        Ok(config)
    }

    /// Reject entries that would silently exclude everything.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        if let Some(i) = self.substrings.iter().position(String::is_empty) {
            return Err(IntegrityError::Config(format!(
                "substrings[{i}] is empty and would exclude every file"
            )));
        }
        Ok(())
    }
}
