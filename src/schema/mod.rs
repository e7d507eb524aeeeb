//! Program interface schema: the type model, the named-type registry, and
//! the IDL loader that fills them.

pub mod idl;
pub mod registry;
pub mod types;

pub use idl::{Idl, IdlError};
pub use registry::{DuplicatePolicy, RegistryError, TypeSchemaRegistry, TypeSchemaRegistryBuilder};
pub use types::{
    EventDefinition, FieldDefinition, NamedTypeDefinition, PrimitiveKind, TypeDescriptor,
};
