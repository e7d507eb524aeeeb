//! Type model for a program interface: field descriptors and named definitions.

use std::fmt;

/// Primitive field types a program interface can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    U256,
    I256,
    F32,
    F64,
    String,
    Bytes,
    /// Fixed-length account identifier, rendered as base-58.
    Address,
}

impl PrimitiveKind {
    /// Parse an IDL primitive type string. Both `publicKey` and `pubkey`
    /// spellings map to [`PrimitiveKind::Address`].
    pub fn from_idl_str(s: &str) -> Option<Self> {
        let kind = match s {
            "bool" => Self::Bool,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "u256" => Self::U256,
            "i256" => Self::I256,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "publicKey" | "pubkey" => Self::Address,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::U256 => "u256",
            Self::I256 => "i256",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The declared type of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    /// Reference to a named type, resolved through the registry.
    Defined(String),
    Option(Box<TypeDescriptor>),
    /// Client-option wire convention; normalized exactly like `Option`.
    COption(Box<TypeDescriptor>),
    Vector(Box<TypeDescriptor>),
    /// Fixed-size array. The length is informational and never checked
    /// against the runtime value.
    Array(Box<TypeDescriptor>, usize),
}

impl TypeDescriptor {
    pub fn defined(name: impl Into<String>) -> Self {
        Self::Defined(name.into())
    }

    pub fn option(inner: TypeDescriptor) -> Self {
        Self::Option(Box::new(inner))
    }

    pub fn coption(inner: TypeDescriptor) -> Self {
        Self::COption(Box::new(inner))
    }

    pub fn vector(inner: TypeDescriptor) -> Self {
        Self::Vector(Box::new(inner))
    }

    pub fn array(inner: TypeDescriptor, length: usize) -> Self {
        Self::Array(Box::new(inner), length)
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{}", kind),
            Self::Defined(name) => write!(f, "{}", name),
            Self::Option(inner) => write!(f, "Option<{}>", inner),
            Self::COption(inner) => write!(f, "COption<{}>", inner),
            Self::Vector(inner) => write!(f, "Vec<{}>", inner),
            Self::Array(inner, len) => write!(f, "[{}; {}]", inner, len),
        }
    }
}

/// A named field inside a struct definition or an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Shape of a named type held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedTypeDefinition {
    /// Fields in declaration order.
    Struct(Vec<FieldDefinition>),
    /// Variant names in declaration order.
    Enum(Vec<String>),
}

impl NamedTypeDefinition {
    /// Case-insensitive variant lookup, with Unicode lowercase folding.
    /// Returns the canonically-cased name.
    pub fn match_variant(&self, key: &str) -> Option<&str> {
        match self {
            Self::Enum(variants) => variants
                .iter()
                .find(|v| fold_case(v).eq(fold_case(key)))
                .map(String::as_str),
            Self::Struct(_) => None,
        }
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// An event declared by the program interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDefinition {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_from_idl_str() {
        assert_eq!(PrimitiveKind::from_idl_str("u64"), Some(PrimitiveKind::U64));
        assert_eq!(
            PrimitiveKind::from_idl_str("publicKey"),
            Some(PrimitiveKind::Address)
        );
        assert_eq!(
            PrimitiveKind::from_idl_str("pubkey"),
            Some(PrimitiveKind::Address)
        );
        assert_eq!(PrimitiveKind::from_idl_str("u512"), None);
    }

    #[test]
    fn test_descriptor_display() {
        let ty = TypeDescriptor::vector(TypeDescriptor::option(TypeDescriptor::array(
            PrimitiveKind::U8.into(),
            32,
        )));
        assert_eq!(ty.to_string(), "Vec<Option<[u8; 32]>>");
    }

    #[test]
    fn test_match_variant_case_insensitive() {
        let def = NamedTypeDefinition::Enum(vec!["Buy".to_string(), "Sell".to_string()]);
        assert_eq!(def.match_variant("sell"), Some("Sell"));
        assert_eq!(def.match_variant("BUY"), Some("Buy"));
        assert_eq!(def.match_variant("hold"), None);
        assert_eq!(def.match_variant("Sel"), None);

        let def = NamedTypeDefinition::Enum(vec!["Élan".to_string(), "Ωmega".to_string()]);
        assert_eq!(def.match_variant("élan"), Some("Élan"));
        assert_eq!(def.match_variant("ωMEGA"), Some("Ωmega"));
    }
}
