//! Configuration for the normalization engine.

use serde::Deserialize;

use crate::normalization::{FieldErrorPolicy, NormalizerOptions, DEFAULT_MAX_DEPTH};
use crate::schema::DuplicatePolicy;

/// `normalization` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizationConfig {
    /// Maximum type nesting before a field fails with `SchemaTooDeep`.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// How repeated type names in the IDL are handled.
    #[serde(default)]
    pub duplicate_types: DuplicatePolicy,

    /// Whether a failing field aborts its event or is skipped.
    #[serde(default)]
    pub on_field_error: FieldErrorPolicy,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            duplicate_types: DuplicatePolicy::default(),
            on_field_error: FieldErrorPolicy::default(),
        }
    }
}

impl NormalizationConfig {
    pub fn options(&self) -> NormalizerOptions {
        NormalizerOptions {
            max_depth: self.max_depth,
            on_field_error: self.on_field_error,
        }
    }
}
