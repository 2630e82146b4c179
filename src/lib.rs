//! # serde_backref
//!
//! A compact text codec for sequences of 32-bit integers, strings, and nested
//! lists of these, with back-reference deduplication of repeated values.
//!
//! ## How it works
//!
//! The payload looks like a JSON array: top-level elements are separated by
//! `,`, list members by `;`, strings are double-quoted. While encoding, every
//! top-level element's serialized text is recorded in a per-call dictionary.
//! When the same text shows up again, the encoder writes a back-reference
//! `<N>` to the slot where it first appeared instead of repeating it.
//!
//! ```rust
//! use serde_backref::{decode, encode, values};
//!
//! let input = values!["foo", "foo", 23, ["bar", 42], 23, ["bar", 42]];
//!
//! let payload = encode(&input).unwrap();
//! assert_eq!(payload, r#"["foo",<0>,23,["bar";42],<2>,<3>]"#);
//!
//! assert_eq!(decode(&payload).unwrap(), input);
//! ```
//!
//! ## Key Features
//!
//! - **Whole-value dedup**: repeated scalars and repeated lists collapse into
//!   a pointer as a unit
//! - **Bounded input**: at most 1000 top-level elements and strings of at most
//!   1,000,000 chars by default, see [`CodecOptions`]
//! - **Typed errors**: both directions report an [`Error`]; decoding never
//!   returns partially-parsed garbage
//! - **Serde Compatible**: any type whose data model is integers, strings and
//!   sequences round-trips through [`to_string`] and [`from_str`]
//!
//! ### Serde Types
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_backref::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Tag(String, u16);
//!
//! let tags = vec![Tag("rust".into(), 1), Tag("rust".into(), 1), Tag("serde".into(), 2)];
//! let payload = to_string(&tags).unwrap();
//! assert_eq!(payload, r#"[["rust";1],<0>,["serde";2]]"#);
//!
//! let back: Vec<Tag> = from_str(&payload).unwrap();
//! assert_eq!(back, tags);
//! ```
//!
//! ## Compatibility Notes
//!
//! - **Nested lists keep their structure.** Splitting tracks bracket depth and
//!   string quotes, so `[1,1,2,2,[3,[4,5]],6]` round-trips. A decoder that
//!   splits list interiors on every `;` loses structure below one level; this
//!   one does not, and a payload that relied on that flattening now errors.
//! - **Back-references are top-level only.** The encoder only deduplicates top
//!   level elements, and the decoder accepts pointers only there. A pointer
//!   inside a list is reported as [`Error::MalformedPayload`].
//! - **Malformed payloads are errors**, not best-effort values.
//!
//! The escape codes are still matched literally when decoding, so a string
//! that itself contains the text `0x2c` comes back as `,`. See [`escape`].
//!
//! ## Payload Format
//!
//! The grammar and escape table are documented in [`format`].

pub mod de;
pub mod dict;
pub mod error;
pub mod escape;
pub mod format;
pub mod macros;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, ErrorKind, Result};
pub use options::{CodecOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEN, DEFAULT_MAX_STRING_LEN};
pub use ser::{encode_with_options, Encoder, SequenceSerializer, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Encode a top-level sequence into a backref payload.
///
/// # Examples
///
/// ```rust
/// use serde_backref::{encode, values};
///
/// let payload = encode(&values![1, 1, 2, 2, 3, 3]).unwrap();
/// assert_eq!(payload, "[1,<0>,2,<2>,3,<4>]");
/// ```
///
/// # Errors
///
/// Returns [`Error::SizeLimit`] for more than 1000 elements and
/// [`Error::Range`] for strings over 1,000,000 chars. No partial payload is
/// returned on failure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(values: &[Value]) -> Result<String> {
    encode_with_options(values, &CodecOptions::default())
}

/// Decode a backref payload into its top-level sequence.
///
/// # Examples
///
/// ```rust
/// use serde_backref::{decode, value};
///
/// let values = decode(r#"["foo",<0>,[1;[2]]]"#).unwrap();
/// assert_eq!(values, vec![value!("foo"), value!("foo"), value!([1, [2]])]);
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] when the text does not follow the
/// grammar, [`Error::DanglingPointer`] for a back-reference that does not name
/// an earlier serialized slot, and [`Error::InvalidInteger`] for bare tokens
/// that are not 32-bit integers.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(payload: &str) -> Result<Vec<Value>> {
    Deserializer::from_str(payload).decode()
}

/// Decode a backref payload with custom options.
///
/// Only `max_depth` applies when decoding.
///
/// # Examples
///
/// ```rust
/// use serde_backref::{decode_with_options, CodecOptions, ErrorKind};
///
/// let options = CodecOptions::new().with_max_depth(1);
/// assert!(decode_with_options("[[1]]", &options).is_ok());
///
/// let err = decode_with_options("[[[1]]]", &options).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::MalformedPayload);
/// ```
///
/// # Errors
///
/// See [`decode`]. Lists nested deeper than `options.max_depth` fail with
/// [`Error::MalformedPayload`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_options(payload: &str, options: &CodecOptions) -> Result<Vec<Value>> {
    Deserializer::with_options(payload, options).decode()
}

/// Serialize any `T: Serialize` to a backref payload.
///
/// `T` must serialize as a sequence; its elements become the top-level slots.
///
/// # Examples
///
/// ```rust
/// use serde_backref::to_string;
///
/// let payload = to_string(&vec!["a", "b", "a"]).unwrap();
/// assert_eq!(payload, r#"["a","b",<0>]"#);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `T` is not a sequence and
/// [`Error::SizeLimit`] if it has too many elements; both are checked before
/// any element is converted. Elements with no backref form (floats, booleans,
/// null, maps, structs) fail with [`Error::UnsupportedType`], and the errors of
/// [`encode`] apply to the rest.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &CodecOptions::default())
}

/// Serialize any `T: Serialize` to a backref payload with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_backref::{to_string_with_options, CodecOptions};
///
/// let options = CodecOptions::new().with_dedup(false);
/// let payload = to_string_with_options(&[7, 7], &options).unwrap();
/// assert_eq!(payload, "[7,7]");
/// ```
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &CodecOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    value.serialize(SequenceSerializer::new(options))
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_backref::{to_value, Value};
///
/// let value = to_value(&("x", 3u8)).unwrap();
/// assert_eq!(value, Value::List(vec![Value::from("x"), Value::from(3)]));
/// ```
///
/// # Errors
///
/// Returns [`Error::Range`] for integers outside the 32-bit signed range and
/// [`Error::UnsupportedType`] for values with no backref form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` to a writer as a backref payload.
///
/// # Examples
///
/// ```rust
/// use serde_backref::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &[1, 1]).unwrap();
/// assert_eq!(buffer, b"[1,<0>]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &CodecOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &CodecOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let payload = to_string_with_options(value, options)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Examples
///
/// ```rust
/// use serde_backref::{from_value, value};
///
/// let pair: (String, i64) = from_value(value!(["x", 3])).unwrap();
/// assert_eq!(pair, ("x".to_string(), 3));
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

/// Deserialize an instance of type `T` from a backref payload.
///
/// The decoded top-level sequence is handed to `T` as a serde sequence.
///
/// # Examples
///
/// ```rust
/// use serde_backref::from_str;
///
/// let numbers: Vec<u32> = from_str("[1,<0>,2]").unwrap();
/// assert_eq!(numbers, vec![1, 1, 2]);
/// ```
///
/// # Errors
///
/// Returns the errors of [`decode`], or an error if the decoded values cannot
/// be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(Value::List(decode(s)?))
}

/// Deserialize an instance of type `T` from an I/O stream of backref text.
///
/// # Examples
///
/// ```rust
/// use serde_backref::from_reader;
/// use std::io::Cursor;
///
/// let words: Vec<String> = from_reader(Cursor::new(br#"["hi",<0>]"#)).unwrap();
/// assert_eq!(words, vec!["hi", "hi"]);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not a
/// valid payload, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of backref text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a valid payload,
/// or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
