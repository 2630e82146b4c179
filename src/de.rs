//! Backref deserialization.
//!
//! This module holds the read path:
//!
//! - [`Deserializer`]: splits a payload into top-level tokens and turns each
//!   one back into a [`Value`], resolving `<N>` back-references
//! - `Value` as a serde `Deserializer`, so decoded values convert into any
//!   `T: Deserialize`
//!
//! ## Splitting
//!
//! Tokens are cut on `,` at the top level and on `;` inside a list, but only
//! at bracket depth zero and outside string quotes. Nested lists therefore
//! decode to the same structure they were encoded from. Nesting beyond
//! `max_depth` (256 by default) is a [`Error::MalformedPayload`]:
//!
//! ```rust
//! use serde_backref::{decode, value};
//!
//! let values = decode("[1,<0>,[3;[4;5]],6]").unwrap();
//! assert_eq!(values, vec![value!(1), value!(1), value!([3, [4, 5]]), value!(6)]);
//! ```
//!
//! ## Back-references
//!
//! A pointer may only appear at the top level and must name an earlier slot
//! that holds a serialized value, never another pointer. This is the only scope
//! the encoder deduplicates in, so every payload it writes satisfies it.
//!
//! ```rust
//! use serde_backref::{decode, ErrorKind};
//!
//! assert_eq!(decode("[<0>]").unwrap_err().kind(), ErrorKind::DanglingPointer);
//! assert_eq!(decode("[1,[<0>]]").unwrap_err().kind(), ErrorKind::MalformedPayload);
//! ```

use crate::escape::unescape;
use crate::{CodecOptions, Error, Result, Value, DEFAULT_MAX_DEPTH};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use tracing::debug;

/// A slice of the payload together with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'de> {
    text: &'de str,
    position: usize,
}

/// Splits `input` on `delimiter` at bracket depth zero and outside quotes.
///
/// `base` is the byte offset of `input` within the whole payload. An empty
/// `input` yields no tokens.
fn split(input: &str, base: usize, delimiter: u8) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    if input.is_empty() {
        return Ok(tokens);
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0;

    for (i, byte) in input.bytes().enumerate() {
        match byte {
            b'"' => in_string = !in_string,
            _ if in_string => {}
            b'[' => depth += 1,
            b']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::malformed(base + i, "unmatched ']'"))?;
            }
            b if b == delimiter && depth == 0 => {
                tokens.push(Token {
                    text: &input[start..i],
                    position: base + start,
                });
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_string {
        return Err(Error::malformed(base + input.len(), "unterminated string"));
    }
    if depth != 0 {
        return Err(Error::malformed(base + input.len(), "unclosed '['"));
    }

    tokens.push(Token {
        text: &input[start..],
        position: base + start,
    });
    Ok(tokens)
}

/// Returns the slot named by a `<N>` token, or `None` if `text` is not one.
fn parse_pointer(token: Token<'_>) -> Result<Option<usize>> {
    let Some(rest) = token.text.strip_prefix('<') else {
        return Ok(None);
    };
    let digits = rest
        .strip_suffix('>')
        .ok_or_else(|| Error::malformed(token.position, "back-reference is missing '>'"))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(
            token.position,
            "back-reference must be a decimal slot index",
        ));
    }
    digits
        .parse::<usize>()
        .map(Some)
        .map_err(|_| Error::malformed(token.position, "back-reference index overflows"))
}

/// Converts one serialized token (never a pointer) into a [`Value`].
///
/// `depth` is the number of lists enclosing the token.
fn parse_value(token: Token<'_>, depth: usize, max_depth: usize) -> Result<Value> {
    let text = token.text;
    match text.as_bytes().first() {
        None => Err(Error::malformed(token.position, "empty element")),
        Some(b'"') => {
            let inner = text
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .filter(|s| !s.contains('"'))
                .ok_or_else(|| {
                    Error::malformed(token.position, "string must be a single quoted run")
                })?;
            Ok(Value::Text(unescape(inner)))
        }
        Some(b'[') => {
            let depth = depth + 1;
            if depth > max_depth {
                return Err(Error::malformed(token.position, "nesting too deep"));
            }
            let inner = text
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| Error::malformed(token.position, "list has trailing characters"))?;
            let members = split(inner, token.position + 1, b';')?;
            let mut list = Vec::with_capacity(members.len());
            for member in members {
                if member.text.starts_with('<') {
                    return Err(Error::malformed(
                        member.position,
                        "back-reference inside a nested list",
                    ));
                }
                list.push(parse_value(member, depth, max_depth)?);
            }
            Ok(Value::List(list))
        }
        Some(b'<') => Err(Error::malformed(token.position, "unexpected back-reference")),
        Some(first) => {
            if *first != b'-' && !first.is_ascii_digit() {
                return Err(Error::invalid_integer(token.position, text));
            }
            text.parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| Error::invalid_integer(token.position, text))
        }
    }
}

/// The backref payload reader.
///
/// # Examples
///
/// ```rust
/// use serde_backref::{Deserializer, Value};
///
/// let values = Deserializer::from_str("[\"foo\",<0>]").decode().unwrap();
/// assert_eq!(values, vec![Value::from("foo"), Value::from("foo")]);
/// ```
pub struct Deserializer<'de> {
    input: &'de str,
    max_depth: usize,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer {
            input,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates a reader that enforces `options.max_depth`.
    pub fn with_options(input: &'de str, options: &CodecOptions) -> Self {
        Deserializer {
            input,
            max_depth: options.max_depth,
        }
    }

    /// Reads the whole payload into its top-level sequence.
    pub fn decode(self) -> Result<Vec<Value>> {
        let interior = self
            .input
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| Error::malformed(0, "payload must be wrapped in '[' and ']'"))?;

        let tokens = split(interior, 1, b',')?;
        let mut values: Vec<Value> = Vec::with_capacity(tokens.len());
        let mut is_pointer = Vec::with_capacity(tokens.len());
        let mut pointers = 0usize;

        for (slot, token) in tokens.iter().enumerate() {
            match parse_pointer(*token)? {
                Some(target) => {
                    // Only earlier, fully serialized slots may be named
                    if target >= slot || is_pointer[target] {
                        return Err(Error::dangling_pointer(slot, target));
                    }
                    values.push(values[target].clone());
                    is_pointer.push(true);
                    pointers += 1;
                }
                None => {
                    values.push(parse_value(*token, 0, self.max_depth)?);
                    is_pointer.push(false);
                }
            }
        }

        debug!(
            slots = values.len(),
            pointers,
            bytes = self.input.len(),
            "decoded payload"
        );
        Ok(values)
    }
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Integer(i) => visitor.visit_i32(i),
            Value::Text(s) => visitor.visit_string(s),
            Value::List(list) => visit_list(list, visitor),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self {
            Value::Text(variant) => {
                let variant: de::value::StringDeserializer<Error> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            other => Err(Error::custom(format!(
                "expected a unit variant name for enum {}, found {}",
                name,
                other.type_name()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

fn visit_list<'de, V>(list: Vec<Value>, visitor: V) -> Result<V::Value>
where
    V: de::Visitor<'de>,
{
    let len = list.len();
    let mut seq = SeqDeserializer::new(list);
    let value = visitor.visit_seq(&mut seq)?;
    if seq.iter.len() == 0 {
        Ok(value)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in list"))
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_split_respects_depth_and_quotes() {
        let tokens = split("1,[2;[3;4]],\"a[b\",<0>", 1, b',').unwrap();
        assert_eq!(texts(&tokens), vec!["1", "[2;[3;4]]", "\"a[b\"", "<0>"]);
        assert_eq!(tokens[1].position, 3);

        let members = split("2;[3;4];\"]\"", 0, b';').unwrap();
        assert_eq!(texts(&members), vec!["2", "[3;4]", "\"]\""]);
    }

    #[test]
    fn test_split_empty_and_unbalanced() {
        assert!(split("", 0, b',').unwrap().is_empty());
        assert_eq!(texts(&split(",", 0, b',').unwrap()), vec!["", ""]);

        let err = split("[1;2", 0, b',').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
        let err = split("1]", 0, b',').unwrap_err();
        assert_eq!(err, Error::malformed(1, "unmatched ']'"));
        let err = split("\"abc", 0, b',').unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
    }

    #[test]
    fn test_parse_pointer() {
        let token = |text| Token { text, position: 0 };
        assert_eq!(parse_pointer(token("<12>")).unwrap(), Some(12));
        assert_eq!(parse_pointer(token("12")).unwrap(), None);
        assert!(parse_pointer(token("<12")).is_err());
        assert!(parse_pointer(token("<>")).is_err());
        assert!(parse_pointer(token("<-1>")).is_err());
    }

    #[test]
    fn test_parse_value_dispatch() {
        let parse = |text: &'static str| parse_value(Token { text, position: 0 }, 0, DEFAULT_MAX_DEPTH);
        assert_eq!(parse("-7").unwrap(), Value::Integer(-7));
        assert_eq!(parse("\"a0x2cb\"").unwrap(), Value::from("a,b"));
        assert_eq!(parse("[]").unwrap(), Value::List(vec![]));
        assert_eq!(parse("[[]]").unwrap(), Value::List(vec![Value::List(vec![])]));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let parse = |text: &'static str| parse_value(Token { text, position: 4 }, 0, DEFAULT_MAX_DEPTH);
        assert_eq!(parse("+5").unwrap_err(), Error::invalid_integer(4, "+5"));
        assert_eq!(parse("2147483648").unwrap_err().kind(), ErrorKind::InvalidInteger);
        assert_eq!(parse("abc").unwrap_err().kind(), ErrorKind::InvalidInteger);
        assert_eq!(parse("\"a\"b").unwrap_err().kind(), ErrorKind::MalformedPayload);
        assert_eq!(parse("").unwrap_err().kind(), ErrorKind::MalformedPayload);
    }

    #[test]
    fn test_decode_resolves_pointers() {
        let values = Deserializer::from_str("[1,<0>,2,<2>,3,<4>]").decode().unwrap();
        let expected: Vec<Value> = [1, 1, 2, 2, 3, 3].into_iter().map(Value::from).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_decode_rejects_bad_pointers() {
        let decode = |s| Deserializer::from_str(s).decode().unwrap_err();
        assert_eq!(decode("[1,<1>]"), Error::dangling_pointer(1, 1));
        assert_eq!(decode("[1,<7>]"), Error::dangling_pointer(1, 7));
        assert_eq!(decode("[1,<0>,<1>]"), Error::dangling_pointer(2, 1));
    }

    #[test]
    fn test_decode_requires_brackets() {
        for payload in ["", "1,2", "[1,2", "1,2]", "]"] {
            let err = Deserializer::from_str(payload).decode().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedPayload, "{payload:?}");
        }
        assert!(Deserializer::from_str("[]").decode().unwrap().is_empty());
    }

    #[test]
    fn test_decode_bounds_nesting() {
        let nested = |d: usize| format!("[{}{}]", "[".repeat(d), "]".repeat(d));

        assert!(Deserializer::from_str(&nested(DEFAULT_MAX_DEPTH)).decode().is_ok());

        let err = Deserializer::from_str(&nested(DEFAULT_MAX_DEPTH + 1))
            .decode()
            .unwrap_err();
        assert_eq!(
            err,
            Error::malformed(DEFAULT_MAX_DEPTH + 1, "nesting too deep")
        );

        let options = CodecOptions::new().with_max_depth(2);
        assert!(Deserializer::with_options("[[[]]]", &options).decode().is_ok());
        let err = Deserializer::with_options("[1,[[[]]]]", &options)
            .decode()
            .unwrap_err();
        assert_eq!(err, Error::malformed(5, "nesting too deep"));
    }

    #[test]
    fn test_value_into_rust_types() {
        let value = Value::List(vec![Value::Integer(1), Value::from("a")]);
        let pair: (u8, String) = de::Deserialize::deserialize(value).unwrap();
        assert_eq!(pair, (1, "a".to_string()));

        let value = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        let result: Result<(i32,)> = de::Deserialize::deserialize(value);
        assert!(result.is_err());

        let result: Result<u8> = de::Deserialize::deserialize(Value::Integer(300));
        assert!(result.is_err());
    }
}
