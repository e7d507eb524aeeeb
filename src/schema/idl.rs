//! Loader for Anchor-style IDL JSON documents.
//!
//! Accepts both the legacy dialect (`{"defined": "Name"}`, `"publicKey"`,
//! events carrying their own field lists) and the newer one
//! (`{"defined": {"name": "Name"}}`, `"pubkey"`, events whose fields live in
//! a same-named struct under `types`).

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::registry::{
    DuplicatePolicy, RegistryError, TypeSchemaRegistry, TypeSchemaRegistryBuilder,
};
use super::types::{
    EventDefinition, FieldDefinition, NamedTypeDefinition, PrimitiveKind, TypeDescriptor,
};

#[derive(Debug, Error)]
pub enum IdlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid IDL JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown IDL type: {0}")]
    UnknownType(String),

    #[error("Unsupported type kind '{kind}' for type '{name}'")]
    UnsupportedTypeKind { name: String, kind: String },

    #[error("Event '{0}' has no field list and no struct of the same name")]
    MissingEventType(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Deserialize)]
struct IdlRaw {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metadata: Option<IdlMetadataRaw>,
    #[serde(default)]
    accounts: Vec<IdlAccountRaw>,
    #[serde(default)]
    types: Vec<IdlTypeDefRaw>,
    #[serde(default)]
    events: Vec<IdlEventRaw>,
}

#[derive(Debug, Deserialize)]
struct IdlMetadataRaw {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdlTypeDefRaw {
    name: String,
    #[serde(rename = "type")]
    ty: IdlTypeDefTyRaw,
}

#[derive(Debug, Deserialize)]
struct IdlAccountRaw {
    name: String,
    #[serde(rename = "type", default)]
    ty: Option<IdlTypeDefTyRaw>,
}

#[derive(Debug, Deserialize)]
struct IdlTypeDefTyRaw {
    kind: String,
    #[serde(default)]
    fields: Option<IdlFieldsRaw>,
    #[serde(default)]
    variants: Vec<IdlVariantRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdlFieldsRaw {
    Named(Vec<IdlFieldRaw>),
    Tuple(Vec<Value>),
}

#[derive(Debug, Deserialize)]
struct IdlFieldRaw {
    name: String,
    #[serde(rename = "type")]
    ty: Value,
}

#[derive(Debug, Deserialize)]
struct IdlVariantRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IdlEventRaw {
    name: String,
    #[serde(default)]
    fields: Option<Vec<IdlFieldRaw>>,
}

/// A parsed program interface: its named types and its events.
#[derive(Debug, Clone)]
pub struct Idl {
    pub name: Option<String>,
    pub registry: TypeSchemaRegistry,
    pub events: Vec<EventDefinition>,
}

impl Idl {
    pub fn from_path(path: &Path, policy: DuplicatePolicy) -> Result<Self, IdlError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, policy)
    }

    pub fn from_json_str(content: &str, policy: DuplicatePolicy) -> Result<Self, IdlError> {
        let raw: IdlRaw = serde_json::from_str(content)?;
        let name = raw.name.or_else(|| raw.metadata.and_then(|m| m.name));

        let mut builder = TypeSchemaRegistryBuilder::new().duplicate_policy(policy);
        for def in raw.types {
            let definition = parse_type_def(&def.name, def.ty)?;
            builder = builder.insert(def.name, definition);
        }
        // Newer IDLs list accounts by name only; their shape is under `types`.
        for account in raw.accounts {
            if let Some(ty) = account.ty {
                let definition = parse_type_def(&account.name, ty)?;
                builder = builder.insert(account.name, definition);
            }
        }
        let registry = builder.build()?;

        let mut events = Vec::with_capacity(raw.events.len());
        for event in raw.events {
            let fields = match event.fields {
                Some(fields) => parse_named_fields(fields)?,
                None => match registry.lookup(&event.name) {
                    Some(NamedTypeDefinition::Struct(fields)) => fields.clone(),
                    _ => return Err(IdlError::MissingEventType(event.name)),
                },
            };
            events.push(EventDefinition {
                name: event.name,
                fields,
            });
        }

        tracing::debug!(
            "Loaded IDL {:?} with {} types and {} events",
            name,
            registry.len(),
            events.len()
        );

        Ok(Idl {
            name,
            registry,
            events,
        })
    }

    /// Find an event definition by name.
    pub fn event(&self, name: &str) -> Option<&EventDefinition> {
        self.events.iter().find(|e| e.name == name)
    }
}

fn parse_type_def(name: &str, raw: IdlTypeDefTyRaw) -> Result<NamedTypeDefinition, IdlError> {
    match raw.kind.as_str() {
        "struct" => {
            let fields = match raw.fields {
                None => Vec::new(),
                Some(IdlFieldsRaw::Named(fields)) => parse_named_fields(fields)?,
                Some(IdlFieldsRaw::Tuple(types)) => types
                    .iter()
                    .enumerate()
                    .map(|(i, ty)| Ok(FieldDefinition::new(i.to_string(), parse_type(ty)?)))
                    .collect::<Result<Vec<_>, IdlError>>()?,
            };
            Ok(NamedTypeDefinition::Struct(fields))
        }
        // Variant payloads are not part of the model, only the names.
        "enum" => Ok(NamedTypeDefinition::Enum(
            raw.variants.into_iter().map(|v| v.name).collect(),
        )),
        other => Err(IdlError::UnsupportedTypeKind {
            name: name.to_string(),
            kind: other.to_string(),
        }),
    }
}

fn parse_named_fields(fields: Vec<IdlFieldRaw>) -> Result<Vec<FieldDefinition>, IdlError> {
    fields
        .into_iter()
        .map(|f| {
            let ty = parse_type(&f.ty)?;
            Ok(FieldDefinition { name: f.name, ty })
        })
        .collect()
}

/// Parse an IDL type expression into a [`TypeDescriptor`].
pub fn parse_type(value: &Value) -> Result<TypeDescriptor, IdlError> {
    match value {
        Value::String(s) => PrimitiveKind::from_idl_str(s)
            .map(TypeDescriptor::Primitive)
            .ok_or_else(|| IdlError::UnknownType(s.clone())),
        Value::Object(map) if map.len() == 1 => {
            let (key, inner) = map
                .iter()
                .next()
                .ok_or_else(|| IdlError::UnknownType(value.to_string()))?;
            match key.as_str() {
                "defined" => match inner {
                    Value::String(name) => Ok(TypeDescriptor::Defined(name.clone())),
                    Value::Object(obj) => obj
                        .get("name")
                        .and_then(Value::as_str)
                        .map(TypeDescriptor::defined)
                        .ok_or_else(|| IdlError::UnknownType(value.to_string())),
                    _ => Err(IdlError::UnknownType(value.to_string())),
                },
                "option" => Ok(TypeDescriptor::option(parse_type(inner)?)),
                "coption" => Ok(TypeDescriptor::coption(parse_type(inner)?)),
                "vec" => Ok(TypeDescriptor::vector(parse_type(inner)?)),
                "array" => match inner.as_array().map(Vec::as_slice) {
                    Some([elem, len]) => {
                        let len = len
                            .as_u64()
                            .ok_or_else(|| IdlError::UnknownType(value.to_string()))?;
                        Ok(TypeDescriptor::array(parse_type(elem)?, len as usize))
                    }
                    _ => Err(IdlError::UnknownType(value.to_string())),
                },
                _ => Err(IdlError::UnknownType(value.to_string())),
            }
        }
        _ => Err(IdlError::UnknownType(value.to_string())),
    }
}
