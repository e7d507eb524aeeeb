//! Per-event assembly of property lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{EventDefinition, TypeSchemaRegistry};

use super::error::NormalizationError;
use super::normalizer::{Normalizer, DEFAULT_MAX_DEPTH, NULL};
use super::property::PropertyNode;
use super::value::RuntimeValue;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event '{event}': {source}")]
    Field {
        event: String,
        #[source]
        source: NormalizationError,
    },
}

/// Whether a field that fails to normalize aborts its whole event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorPolicy {
    #[default]
    Abort,
    /// Leave the field out, log it, and keep going.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerOptions {
    pub max_depth: usize,
    pub on_field_error: FieldErrorPolicy,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            on_field_error: FieldErrorPolicy::default(),
        }
    }
}

/// A normalized event: its name and the flat list of top-level properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEvent {
    pub name: String,
    pub properties: Vec<PropertyNode>,
    /// Fields left out under [`FieldErrorPolicy::Skip`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_fields: Vec<String>,
}

pub struct EventNormalizer<'a> {
    normalizer: Normalizer<'a>,
    policy: FieldErrorPolicy,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(registry: &'a TypeSchemaRegistry, options: NormalizerOptions) -> Self {
        Self {
            normalizer: Normalizer::new(registry).with_max_depth(options.max_depth),
            policy: options.on_field_error,
        }
    }

    /// Normalize every field of `definition` from the event's decoded data.
    ///
    /// Fields are processed in definition order; a field missing from `data`
    /// is treated as absent.
    pub fn normalize_event(
        &self,
        definition: &EventDefinition,
        data: &RuntimeValue,
    ) -> Result<NormalizedEvent, EventError> {
        let mut properties = Vec::with_capacity(definition.fields.len());
        let mut skipped_fields = Vec::new();

        for field in &definition.fields {
            let value = data.get_field(&field.name).unwrap_or(&NULL);

            match self.normalizer.normalize(&field.name, &field.ty, value) {
                Ok(nodes) => properties.extend(nodes),
                Err(e) => match self.policy {
                    FieldErrorPolicy::Abort => {
                        return Err(EventError::Field {
                            event: definition.name.clone(),
                            source: e,
                        })
                    }
                    FieldErrorPolicy::Skip => {
                        tracing::warn!(
                            "Skipping field '{}' of event '{}': {}",
                            field.name,
                            definition.name,
                            e
                        );
                        skipped_fields.push(field.name.clone());
                    }
                },
            }
        }

        Ok(NormalizedEvent {
            name: definition.name.clone(),
            properties,
            skipped_fields,
        })
    }
}
