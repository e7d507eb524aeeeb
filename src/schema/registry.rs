//! Named type registry.
//!
//! The registry maps type names to their struct/enum shape. It is assembled
//! once through [`TypeSchemaRegistryBuilder`] and is read-only afterwards, so
//! a built registry can be shared freely across threads.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use super::types::NamedTypeDefinition;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type definition: {0}")]
    DuplicateType(String),
}

/// What to do when the same type name is supplied twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later definition replaces the earlier one.
    #[default]
    LastWins,
    /// Building the registry fails.
    Reject,
}

/// Registry of the named types of one program interface.
#[derive(Debug, Clone, Default)]
pub struct TypeSchemaRegistry {
    types: HashMap<String, NamedTypeDefinition>,
}

impl TypeSchemaRegistry {
    pub fn builder() -> TypeSchemaRegistryBuilder {
        TypeSchemaRegistryBuilder::new()
    }

    /// Build a registry from `(name, definition)` pairs with the given policy.
    pub fn from_definitions<I, S>(
        definitions: I,
        policy: DuplicatePolicy,
    ) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, NamedTypeDefinition)>,
        S: Into<String>,
    {
        let mut builder = TypeSchemaRegistryBuilder::new().duplicate_policy(policy);
        for (name, definition) in definitions {
            builder = builder.insert(name, definition);
        }
        builder.build()
    }

    /// Look up the shape of a named type.
    pub fn lookup(&self, name: &str) -> Option<&NamedTypeDefinition> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Collects definitions before the registry is frozen.
#[derive(Debug, Default)]
pub struct TypeSchemaRegistryBuilder {
    entries: Vec<(String, NamedTypeDefinition)>,
    policy: DuplicatePolicy,
}

impl TypeSchemaRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn insert(mut self, name: impl Into<String>, definition: NamedTypeDefinition) -> Self {
        self.entries.push((name.into(), definition));
        self
    }

    pub fn build(self) -> Result<TypeSchemaRegistry, RegistryError> {
        let mut types = HashMap::with_capacity(self.entries.len());

        for (name, definition) in self.entries {
            if types.contains_key(&name) {
                match self.policy {
                    DuplicatePolicy::Reject => return Err(RegistryError::DuplicateType(name)),
                    DuplicatePolicy::LastWins => {
                        tracing::debug!("Type '{}' defined more than once, keeping the last", name);
                    }
                }
            }
            types.insert(name, definition);
        }

        Ok(TypeSchemaRegistry { types })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{FieldDefinition, PrimitiveKind};

    fn side() -> NamedTypeDefinition {
        NamedTypeDefinition::Enum(vec!["Bid".to_string(), "Ask".to_string()])
    }

    fn pair() -> NamedTypeDefinition {
        NamedTypeDefinition::Struct(vec![
            FieldDefinition::new("x", PrimitiveKind::U8),
            FieldDefinition::new("y", PrimitiveKind::U8),
        ])
    }

    #[test]
    fn test_lookup() {
        let registry = TypeSchemaRegistry::builder()
            .insert("Side", side())
            .insert("Pair", pair())
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("Side"), Some(&side()));
        assert_eq!(registry.lookup("Pair"), Some(&pair()));
        assert!(registry.lookup("Missing").is_none());
        assert_eq!(registry.names(), vec!["Pair", "Side"]);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let registry = TypeSchemaRegistry::from_definitions(
            [("Thing", side()), ("Thing", pair())],
            DuplicatePolicy::LastWins,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("Thing"), Some(&pair()));
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = TypeSchemaRegistry::from_definitions(
            [("Thing", side()), ("Thing", pair())],
            DuplicatePolicy::Reject,
        )
        .unwrap_err();

        assert!(matches!(err, RegistryError::DuplicateType(name) if name == "Thing"));
    }

    #[test]
    fn test_policy_deserialize() {
        let policy: DuplicatePolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, DuplicatePolicy::Reject);
        let policy: DuplicatePolicy = serde_json::from_str("\"last_wins\"").unwrap();
        assert_eq!(policy, DuplicatePolicy::LastWins);
    }
}
