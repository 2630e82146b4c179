//! Dynamic value representation for backref data.
//!
//! [`Value`] is the unit the codec round-trips: a 32-bit signed integer, a
//! string, or a list of values nested to any depth.
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_backref::{value, Value};
//!
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let list = Value::from(vec![Value::from(1), Value::from("two")]);
//!
//! // Using the value! macro
//! let nested = value!(["bar", 42, [1, 2]]);
//! assert!(nested.is_list());
//! ```
//!
//! ## Extracting Values
//!
//! ```rust
//! use serde_backref::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let n: i32 = i32::try_from(value).unwrap();
//! assert_eq!(n, 42);
//! ```
//!
//! ## Canonical Text
//!
//! `Display` writes the canonical serialized form of a single value, the text
//! the encoder keys its dictionary on:
//!
//! ```rust
//! use serde_backref::value;
//!
//! assert_eq!(value!(["bar", 42]).to_string(), "[\"bar\";42]");
//! ```

use crate::{CodecOptions, Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Any value the backref codec can carry.
///
/// # Examples
///
/// ```rust
/// use serde_backref::Value;
///
/// let num = Value::Integer(42);
/// let text = Value::Text("hello".to_string());
/// let list = Value::List(vec![num.clone(), text.clone()]);
///
/// assert!(num.is_integer());
/// assert!(text.is_text());
/// assert_eq!(list.as_list().map(Vec::len), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i32),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if the value is a list.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_backref::Value;
    ///
    /// assert_eq!(Value::from(7).as_i32(), Some(7));
    /// assert_eq!(Value::from("7").as_i32(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a list, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns a short name for the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Text(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::write_value(&mut out, self, &CodecOptions::unbounded())
            .map_err(|_| fmt::Error)?;
        f.write_str(&out)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Integer(i) => serializer.serialize_i32(*i),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(list) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for element in list {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 32-bit integer, a string, or a sequence of these")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i32::try_from(value)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(format!("integer {} is out of 32-bit range", value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i32::try_from(value)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(format!("integer {} is out of 32-bit range", value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::Text(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            _ => Err(Error::custom(format!(
                "expected integer, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            _ => Err(Error::custom(format!(
                "expected string, found {}",
                value.type_name()
            ))),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::List(list) => Ok(list),
            _ => Err(Error::custom(format!(
                "expected list, found {}",
                value.type_name()
            ))),
        }
    }
}

// Wider integers must fit the 32-bit range
impl TryFrom<i64> for Value {
    type Error = Error;

    fn try_from(value: i64) -> crate::Result<Self> {
        i32::try_from(value)
            .map(Value::Integer)
            .map_err(|_| Error::range(format!("integer {} does not fit in 32 bits", value)))
    }
}

impl TryFrom<u32> for Value {
    type Error = Error;

    fn try_from(value: u32) -> crate::Result<Self> {
        i32::try_from(value)
            .map(Value::Integer)
            .map_err(|_| Error::range(format!("integer {} does not fit in 32 bits", value)))
    }
}

impl TryFrom<u64> for Value {
    type Error = Error;

    fn try_from(value: u64) -> crate::Result<Self> {
        i32::try_from(value)
            .map(Value::Integer)
            .map_err(|_| Error::range(format!("integer {} does not fit in 32 bits", value)))
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Integer(value as i32)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(value as i32)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Integer(value as i32)
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(value as i32)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}
