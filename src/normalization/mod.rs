//! Normalization of decoded event values into property trees.
//!
//! # Architecture
//!
//! ```text
//! EventDefinition + decoded data ──► EventNormalizer ──► NormalizedEvent
//!                                          │
//!                                          └─► Normalizer (per field)
//!                                               └─ TypeSchemaRegistry lookups
//! ```
//!
//! The normalizer holds no state between calls; one registry can serve any
//! number of concurrent normalizations.

pub mod error;
pub mod event;
pub mod normalizer;
pub mod property;
pub mod value;

pub use error::NormalizationError;
pub use event::{EventError, EventNormalizer, FieldErrorPolicy, NormalizedEvent, NormalizerOptions};
pub use normalizer::{normalize, Normalizer, DEFAULT_MAX_DEPTH};
pub use property::{PropertyKind, PropertyNode, PropertyValue};
pub use value::RuntimeValue;
