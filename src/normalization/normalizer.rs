//! Schema-driven value normalization.
//!
//! [`Normalizer`] walks a field's [`TypeDescriptor`] together with its
//! [`RuntimeValue`] and produces [`PropertyNode`]s. Named types are resolved
//! through the [`TypeSchemaRegistry`] on the way down.
//!
//! Two output conventions are load-bearing for consumers:
//! - elements of vectors/arrays are flattened into the array node and keep
//!   the parent field's name, with no index tagging;
//! - an enum value whose key matches no declared variant produces no node.

use crate::schema::{NamedTypeDefinition, PrimitiveKind, TypeDescriptor, TypeSchemaRegistry};

use super::error::NormalizationError;
use super::property::PropertyNode;
use super::value::RuntimeValue;

/// Default limit on descriptor nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub(crate) static NULL: RuntimeValue = RuntimeValue::Null;

/// Normalize one field with the default depth limit.
pub fn normalize(
    field_name: &str,
    ty: &TypeDescriptor,
    value: &RuntimeValue,
    registry: &TypeSchemaRegistry,
) -> Result<Vec<PropertyNode>, NormalizationError> {
    Normalizer::new(registry).normalize(field_name, ty, value)
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    registry: &'a TypeSchemaRegistry,
    max_depth: usize,
}

impl<'a> Normalizer<'a> {
    pub fn new(registry: &'a TypeSchemaRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn registry(&self) -> &'a TypeSchemaRegistry {
        self.registry
    }

    /// Normalize a `(field name, type, value)` triple into zero or more nodes.
    pub fn normalize(
        &self,
        field_name: &str,
        ty: &TypeDescriptor,
        value: &RuntimeValue,
    ) -> Result<Vec<PropertyNode>, NormalizationError> {
        self.walk(field_name, ty, value, 0)
    }

    fn walk(
        &self,
        name: &str,
        ty: &TypeDescriptor,
        value: &RuntimeValue,
        depth: usize,
    ) -> Result<Vec<PropertyNode>, NormalizationError> {
        if depth >= self.max_depth {
            return Err(NormalizationError::SchemaTooDeep {
                field: name.to_string(),
                max_depth: self.max_depth,
            });
        }

        match ty {
            TypeDescriptor::Primitive(kind) => Ok(vec![primitive(name, *kind, value)?]),
            TypeDescriptor::Defined(type_name) => self.defined(name, type_name, value, depth),
            TypeDescriptor::Option(inner) | TypeDescriptor::COption(inner) => {
                if value.is_null() {
                    Ok(Vec::new())
                } else {
                    self.walk(name, inner, value, depth + 1)
                }
            }
            TypeDescriptor::Vector(inner) | TypeDescriptor::Array(inner, _) => {
                let RuntimeValue::List(items) = value else {
                    return Err(NormalizationError::unsupported(name, "list", value));
                };

                let mut elements = Vec::with_capacity(items.len());
                for item in items {
                    elements.extend(self.walk(name, inner, item, depth + 1)?);
                }
                Ok(vec![PropertyNode::array(name, elements)])
            }
        }
    }

    fn defined(
        &self,
        name: &str,
        type_name: &str,
        value: &RuntimeValue,
        depth: usize,
    ) -> Result<Vec<PropertyNode>, NormalizationError> {
        let definition = self.registry.lookup(type_name).ok_or_else(|| {
            NormalizationError::UnresolvedTypeReference {
                field: name.to_string(),
                type_name: type_name.to_string(),
            }
        })?;

        match definition {
            NamedTypeDefinition::Enum(_) => {
                let key = match value {
                    RuntimeValue::Map(entries) if entries.len() == 1 => entries[0].0.as_str(),
                    other => {
                        return Err(NormalizationError::MalformedEnumValue {
                            field: name.to_string(),
                            found: other.describe(),
                        })
                    }
                };

                match definition.match_variant(key) {
                    Some(variant) => Ok(vec![PropertyNode::enumeration(
                        name,
                        PropertyNode::string(key, variant),
                    )]),
                    None => {
                        tracing::debug!(
                            "Field '{}': no variant of '{}' matches '{}', dropping",
                            name,
                            type_name,
                            key
                        );
                        Ok(Vec::new())
                    }
                }
            }
            NamedTypeDefinition::Struct(fields) => {
                if !matches!(value, RuntimeValue::Map(_)) {
                    return Err(NormalizationError::unsupported(
                        name,
                        format!("mapping for struct '{}'", type_name),
                        value,
                    ));
                }

                let mut children = Vec::with_capacity(fields.len());
                for field in fields {
                    let field_value = value.get_field(&field.name).unwrap_or(&NULL);
                    children.extend(self.walk(&field.name, &field.ty, field_value, depth + 1)?);
                }
                Ok(vec![PropertyNode::object(name, children)])
            }
        }
    }
}

fn primitive(
    name: &str,
    kind: PrimitiveKind,
    value: &RuntimeValue,
) -> Result<PropertyNode, NormalizationError> {
    match kind {
        PrimitiveKind::Bool => match value {
            RuntimeValue::Bool(b) => Ok(PropertyNode::boolean(name, *b)),
            other => Err(NormalizationError::unsupported(name, "bool", other)),
        },
        PrimitiveKind::String => match value {
            RuntimeValue::String(s) => Ok(PropertyNode::string(name, s.clone())),
            other => Err(NormalizationError::unsupported(name, "string", other)),
        },
        PrimitiveKind::Address => value
            .as_address()
            .map(|bytes| PropertyNode::string(name, bs58::encode(bytes).into_string()))
            .ok_or_else(|| NormalizationError::unsupported(name, "32-byte address", value)),
        PrimitiveKind::U64
        | PrimitiveKind::U128
        | PrimitiveKind::I64
        | PrimitiveKind::I128
        | PrimitiveKind::U256
        | PrimitiveKind::I256 => value
            .to_decimal_string()
            .map(|decimal| PropertyNode::bigint(name, decimal))
            .ok_or_else(|| {
                NormalizationError::unsupported(name, format!("integer ({})", kind), value)
            }),
        PrimitiveKind::U8
        | PrimitiveKind::U16
        | PrimitiveKind::U32
        | PrimitiveKind::I8
        | PrimitiveKind::I16
        | PrimitiveKind::I32
        | PrimitiveKind::F32
        | PrimitiveKind::F64 => number(value)
            .map(|n| PropertyNode::number(name, n))
            .ok_or_else(|| {
                NormalizationError::unsupported(name, format!("number ({})", kind), value)
            }),
        PrimitiveKind::Bytes => Err(NormalizationError::UnknownPrimitiveType {
            field: name.to_string(),
            kind,
        }),
    }
}

/// Pass a native number through. Integers outside the 64-bit range and
/// non-finite floats have no JSON number form.
fn number(value: &RuntimeValue) -> Option<serde_json::Number> {
    match value {
        RuntimeValue::Uint(v) => u64::try_from(*v).ok().map(serde_json::Number::from),
        RuntimeValue::Int(v) => i64::try_from(*v).ok().map(serde_json::Number::from),
        RuntimeValue::Float(f) => serde_json::Number::from_f64(*f),
        _ => None,
    }
}
