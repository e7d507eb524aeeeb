//! Normalization error types.

use thiserror::Error;

use crate::schema::PrimitiveKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    #[error("Field '{field}': type '{type_name}' is not defined in the schema")]
    UnresolvedTypeReference { field: String, type_name: String },

    #[error("Field '{field}': primitive type '{kind}' cannot be normalized")]
    UnknownPrimitiveType { field: String, kind: PrimitiveKind },

    #[error("Field '{field}': expected {expected}, got {found}")]
    UnsupportedValue {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Field '{field}': enum value must be a single-key mapping, got {found}")]
    MalformedEnumValue { field: String, found: String },

    #[error("Field '{field}': schema nesting exceeds the maximum depth of {max_depth}")]
    SchemaTooDeep { field: String, max_depth: usize },
}

impl NormalizationError {
    pub(crate) fn unsupported(
        field: &str,
        expected: impl Into<String>,
        found: &crate::normalization::RuntimeValue,
    ) -> Self {
        Self::UnsupportedValue {
            field: field.to_string(),
            expected: expected.into(),
            found: found.describe(),
        }
    }

    /// Name of the field the error arose on.
    pub fn field(&self) -> &str {
        match self {
            Self::UnresolvedTypeReference { field, .. }
            | Self::UnknownPrimitiveType { field, .. }
            | Self::UnsupportedValue { field, .. }
            | Self::MalformedEnumValue { field, .. }
            | Self::SchemaTooDeep { field, .. } => field,
        }
    }
}
