use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::types::config::normalization::NormalizationConfig;

#[derive(Debug, Deserialize)]
pub struct AppConfigRaw {
    /// IDL file, relative to the config file's directory.
    pub idl_path: String,
    #[serde(default)]
    pub normalization: NormalizationConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub idl_path: PathBuf,
    pub normalization: NormalizationConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::from_json_str(&content, base_dir)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    pub fn from_json_str(content: &str, base_dir: &Path) -> anyhow::Result<Self> {
        let raw: AppConfigRaw = serde_json::from_str(content)?;
        Ok(AppConfig {
            idl_path: base_dir.join(raw.idl_path),
            normalization: raw.normalization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalization::FieldErrorPolicy;
    use crate::schema::DuplicatePolicy;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_json_str(r#"{ "idl_path": "idl.json" }"#, Path::new("config"))
            .unwrap();

        assert_eq!(config.idl_path, PathBuf::from("config/idl.json"));
        assert_eq!(config.normalization.max_depth, 64);
        assert_eq!(config.normalization.duplicate_types, DuplicatePolicy::LastWins);
        assert_eq!(config.normalization.on_field_error, FieldErrorPolicy::Abort);
    }

    #[test]
    fn test_explicit_values() {
        let content = r#"{
            "idl_path": "idl/order_book.json",
            "normalization": {
                "max_depth": 16,
                "duplicate_types": "reject",
                "on_field_error": "skip"
            }
        }"#;
        let config = AppConfig::from_json_str(content, Path::new(".")).unwrap();

        assert_eq!(config.normalization.max_depth, 16);
        assert_eq!(config.normalization.duplicate_types, DuplicatePolicy::Reject);
        let options = config.normalization.options();
        assert_eq!(options.on_field_error, FieldErrorPolicy::Skip);
        assert_eq!(options.max_depth, 16);
    }

    #[test]
    fn test_missing_idl_path() {
        assert!(AppConfig::from_json_str("{}", Path::new(".")).is_err());
    }
}
