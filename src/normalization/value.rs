//! Runtime values handed over by the event decoding layer.

use std::str::FromStr;

use alloy_primitives::{I256, U256};
use serde_json::Value;

/// A decoded value of an event field.
///
/// Struct instances and enum instances share the [`RuntimeValue::Map`]
/// shape: decoders present an enum as a single-key mapping from the variant
/// name to its (possibly empty) payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeValue {
    /// No value (an empty option, or a field the decoder did not supply).
    Null,
    Bool(bool),
    Uint(U256),
    Int(I256),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Address([u8; 32]),
    /// Named entries in decoder order.
    Map(Vec<(String, RuntimeValue)>),
    List(Vec<RuntimeValue>),
}

impl RuntimeValue {
    pub fn map<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, RuntimeValue)>,
        S: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Single-key mapping for an enum instance with an empty payload.
    pub fn variant(name: impl Into<String>) -> Self {
        Self::Map(vec![(name.into(), Self::Map(Vec::new()))])
    }

    pub fn list(items: impl IntoIterator<Item = RuntimeValue>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get an entry of a mapping.
    pub fn get_field(&self, name: &str) -> Option<&RuntimeValue> {
        match self {
            Self::Map(entries) => entries.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Canonical base-10 rendering of an integer value. Strings holding a
    /// base-10 integer are parsed and re-rendered, so `"007"` becomes `"7"`
    /// and `"-0"` becomes `"0"`.
    pub fn to_decimal_string(&self) -> Option<String> {
        match self {
            Self::Uint(v) => Some(v.to_string()),
            Self::Int(v) => Some(v.to_string()),
            Self::String(s) => {
                let s = s.trim();
                let (negative, digits) = match s.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, s),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                if negative {
                    I256::from_str(s).ok().map(|v| v.to_string())
                } else {
                    U256::from_str(digits).ok().map(|v| v.to_string())
                }
            }
            _ => None,
        }
    }

    /// Get the 32 address bytes. Accepts address values, 32-byte sequences,
    /// and base-58 strings that decode to 32 bytes.
    pub fn as_address(&self) -> Option<[u8; 32]> {
        match self {
            Self::Address(a) => Some(*a),
            Self::Bytes(b) => b.as_slice().try_into().ok(),
            Self::String(s) => bs58::decode(s)
                .into_vec()
                .ok()
                .and_then(|b| b.as_slice().try_into().ok()),
            _ => None,
        }
    }

    /// Short description of the value's shape, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => format!("bool {}", b),
            Self::Uint(v) => format!("uint {}", v),
            Self::Int(v) => format!("int {}", v),
            Self::Float(v) => format!("float {}", v),
            Self::String(s) => format!("string {:?}", s),
            Self::Bytes(b) => format!("bytes 0x{}", hex::encode(b)),
            Self::Address(a) => format!("address {}", bs58::encode(a).into_string()),
            Self::Map(entries) => format!("map with {} entries", entries.len()),
            Self::List(items) => format!("list of {} items", items.len()),
        }
    }

    /// Convert a JSON value tree, as produced by JSON-speaking decoders.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(u), _, _) => Self::from(u),
                (None, Some(i), _) => Self::from(i),
                (None, None, Some(f)) => Self::Float(f),
                // only reachable with serde_json's arbitrary precision numbers
                (None, None, None) => Self::String(n.to_string()),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from_json(v))).collect())
            }
        }
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for RuntimeValue {
            fn from(v: $t) -> Self {
                Self::Uint(U256::from(v))
            }
        })*
    };
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for RuntimeValue {
            fn from(v: $t) -> Self {
                // sign-extend through i128, which every listed type and I256 hold exactly
                let wide = i128::from(v);
                let magnitude = U256::from(wide.unsigned_abs());
                if wide < 0 {
                    Self::Int(I256::from_raw(magnitude).wrapping_neg())
                } else {
                    Self::Int(I256::from_raw(magnitude))
                }
            }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128);
impl_from_signed!(i8, i16, i32, i64, i128);

impl From<U256> for RuntimeValue {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<I256> for RuntimeValue {
    fn from(v: I256) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for RuntimeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for RuntimeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for RuntimeValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for RuntimeValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for RuntimeValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let value = RuntimeValue::from_json(json!({
            "a": 7,
            "b": -3,
            "c": 1.5,
            "d": "x",
            "e": [true, null]
        }));

        assert_eq!(value.get_field("a"), Some(&RuntimeValue::from(7u8)));
        assert_eq!(value.get_field("b"), Some(&RuntimeValue::from(-3i64)));
        assert_eq!(value.get_field("c"), Some(&RuntimeValue::Float(1.5)));
        assert_eq!(value.get_field("d"), Some(&RuntimeValue::from("x")));
        assert_eq!(
            value.get_field("e"),
            Some(&RuntimeValue::list([RuntimeValue::Bool(true), RuntimeValue::Null]))
        );
        assert!(value.get_field("missing").is_none());
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(
            RuntimeValue::from(u128::MAX).to_decimal_string().as_deref(),
            Some("340282366920938463463374607431768211455")
        );
        assert_eq!(
            RuntimeValue::from(i128::MIN).to_decimal_string().as_deref(),
            Some("-170141183460469231731687303715884105728")
        );
        assert_eq!(
            RuntimeValue::from(" 9007199254740993 ").to_decimal_string().as_deref(),
            Some("9007199254740993")
        );
        assert_eq!(RuntimeValue::from(-1i8).to_decimal_string().as_deref(), Some("-1"));
        assert_eq!(
            RuntimeValue::from(i64::MIN).to_decimal_string().as_deref(),
            Some("-9223372036854775808")
        );
        assert_eq!(RuntimeValue::from("007").to_decimal_string().as_deref(), Some("7"));
        assert_eq!(RuntimeValue::from("-0").to_decimal_string().as_deref(), Some("0"));
        assert_eq!(RuntimeValue::from("-042").to_decimal_string().as_deref(), Some("-42"));
        assert_eq!(
            RuntimeValue::from("007").to_decimal_string(),
            RuntimeValue::from(7u64).to_decimal_string()
        );
        assert_eq!(RuntimeValue::from("12ab").to_decimal_string(), None);
        assert_eq!(RuntimeValue::from("--1").to_decimal_string(), None);
        assert_eq!(RuntimeValue::Float(1.0).to_decimal_string(), None);
    }

    #[test]
    fn test_as_address() {
        let bytes = [7u8; 32];
        let encoded = bs58::encode(bytes).into_string();

        assert_eq!(RuntimeValue::Address(bytes).as_address(), Some(bytes));
        assert_eq!(RuntimeValue::Bytes(bytes.to_vec()).as_address(), Some(bytes));
        assert_eq!(RuntimeValue::from(encoded).as_address(), Some(bytes));
        assert_eq!(RuntimeValue::Bytes(vec![1, 2, 3]).as_address(), None);
        assert_eq!(RuntimeValue::from("not-base58!").as_address(), None);
    }
}
