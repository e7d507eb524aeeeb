//! The uniform property tree produced by normalization.

use std::fmt;

use serde::Serialize;

/// Tag of a [`PropertyNode`]. The serialized strings are stable and are what
/// downstream consumers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PropertyKind {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "bigint-string")]
    BigIntString,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "enum")]
    Enum,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::BigIntString => "bigint-string",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Nodes(Vec<PropertyNode>),
}

/// A normalized `(kind, name, value)` triple.
///
/// Leaf kinds carry a primitive value; `object`, `array` and `enum` carry
/// their children in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub value: PropertyValue,
}

impl PropertyNode {
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(name, PropertyKind::Boolean, PropertyValue::Bool(value))
    }

    pub fn number(name: impl Into<String>, value: serde_json::Number) -> Self {
        Self::new(name, PropertyKind::Number, PropertyValue::Number(value))
    }

    pub fn bigint(name: impl Into<String>, decimal: String) -> Self {
        Self::new(name, PropertyKind::BigIntString, PropertyValue::Text(decimal))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::String, PropertyValue::Text(value.into()))
    }

    pub fn object(name: impl Into<String>, children: Vec<PropertyNode>) -> Self {
        Self::new(name, PropertyKind::Object, PropertyValue::Nodes(children))
    }

    pub fn array(name: impl Into<String>, children: Vec<PropertyNode>) -> Self {
        Self::new(name, PropertyKind::Array, PropertyValue::Nodes(children))
    }

    pub fn enumeration(name: impl Into<String>, variant: PropertyNode) -> Self {
        Self::new(name, PropertyKind::Enum, PropertyValue::Nodes(vec![variant]))
    }

    fn new(name: impl Into<String>, kind: PropertyKind, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }

    /// Child nodes, empty for leaves.
    pub fn children(&self) -> &[PropertyNode] {
        match &self.value {
            PropertyValue::Nodes(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&serde_json::Number> {
        match &self.value {
            PropertyValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_kind_strings() {
        let node = PropertyNode::object(
            "fill",
            vec![
                PropertyNode::boolean("taker", true),
                PropertyNode::number("lots", 3.into()),
                PropertyNode::bigint("price", "18446744073709551616".to_string()),
                PropertyNode::array("makers", vec![PropertyNode::string("makers", "abc")]),
                PropertyNode::enumeration("side", PropertyNode::string("bid", "Bid")),
            ],
        );

        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "name": "fill",
                "type": "object",
                "value": [
                    { "name": "taker", "type": "boolean", "value": true },
                    { "name": "lots", "type": "number", "value": 3 },
                    { "name": "price", "type": "bigint-string", "value": "18446744073709551616" },
                    {
                        "name": "makers",
                        "type": "array",
                        "value": [{ "name": "makers", "type": "string", "value": "abc" }]
                    },
                    {
                        "name": "side",
                        "type": "enum",
                        "value": [{ "name": "bid", "type": "string", "value": "Bid" }]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_accessors() {
        let node = PropertyNode::array("xs", vec![PropertyNode::boolean("xs", false)]);
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].as_bool(), Some(false));
        assert!(node.as_text().is_none());
        assert!(PropertyNode::string("s", "v").children().is_empty());
    }
}
