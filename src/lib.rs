//! Schema-driven normalization of decoded on-chain program events.
//!
//! Decoded events arrive as loosely-typed value trees. Guided by the
//! program's IDL, they are turned into a uniform tree of tagged property
//! nodes that consumers can walk without knowing the schema.
//!
//! ```text
//! IDL JSON ──► schema::Idl ──► TypeSchemaRegistry + EventDefinitions
//!                                        │
//! decoded data ──► RuntimeValue ──► normalization::EventNormalizer ──► NormalizedEvent
//! ```

pub mod normalization;
pub mod schema;
pub mod types;

pub use normalization::{
    normalize, EventNormalizer, NormalizationError, NormalizedEvent, Normalizer, PropertyKind,
    PropertyNode, PropertyValue, RuntimeValue,
};
pub use schema::{
    EventDefinition, FieldDefinition, Idl, NamedTypeDefinition, PrimitiveKind, TypeDescriptor,
    TypeSchemaRegistry,
};
