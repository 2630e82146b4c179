//! Backref serialization.
//!
//! This module holds the write path:
//!
//! - [`Encoder`]: the dictionary encoder that turns a top-level sequence of
//!   [`Value`]s into a payload, replacing repeats with back-references
//! - [`SequenceSerializer`]: a serde `Serializer` for the top level that
//!   accepts only sequences and feeds each element to an [`Encoder`]
//! - [`ValueSerializer`]: a serde `Serializer` that converts any `T: Serialize`
//!   into a [`Value`], rejecting shapes the codec cannot carry
//!
//! ## Payload Layout
//!
//! Top-level elements are joined with `,`, list members with `;`:
//!
//! ```rust
//! use serde_backref::{encode, value, Value};
//!
//! let values = vec![
//!     value!("foo"),
//!     value!("foo"),
//!     value!(23),
//!     value!(["bar", 42]),
//!     value!(23),
//!     value!(["bar", 42]),
//! ];
//!
//! let payload = encode(&values).unwrap();
//! assert_eq!(payload, "[\"foo\",<0>,23,[\"bar\";42],<2>,<3>]");
//! ```
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use serde_backref::{CodecOptions, Encoder, Value};
//!
//! let options = CodecOptions::new();
//! let mut encoder = Encoder::new(&options);
//! for n in [1, 1, 2] {
//!     encoder.push(&Value::from(n)).unwrap();
//! }
//! assert_eq!(encoder.finish(), "[1,<0>,2]");
//! ```

use crate::dict::Dictionary;
use crate::escape::escape_into;
use crate::{CodecOptions, Error, Result, Value};
use serde::{ser, Serialize};
use tracing::{debug, trace};

/// Appends the canonical serialized form of `value` to `out`.
///
/// Strings longer than `options.max_string_len` chars and lists nested deeper
/// than `options.max_depth` fail with [`Error::Range`].
pub fn write_value(out: &mut String, value: &Value, options: &CodecOptions) -> Result<()> {
    write_nested(out, value, options, 0)
}

fn write_nested(out: &mut String, value: &Value, options: &CodecOptions, depth: usize) -> Result<()> {
    match value {
        Value::Integer(i) => out.push_str(&i.to_string()),
        Value::Text(s) => {
            // Byte length bounds the char count from above
            if s.len() > options.max_string_len {
                let chars = s.chars().count();
                if chars > options.max_string_len {
                    return Err(Error::range(format!(
                        "string of {} chars exceeds the maximum of {}",
                        chars, options.max_string_len
                    )));
                }
            }
            out.push('"');
            escape_into(out, s);
            out.push('"');
        }
        Value::List(list) => {
            let depth = depth + 1;
            if depth > options.max_depth {
                return Err(Error::range(format!(
                    "list nesting exceeds the maximum depth of {}",
                    options.max_depth
                )));
            }
            out.push('[');
            for (i, member) in list.iter().enumerate() {
                if i > 0 {
                    out.push(';');
                }
                write_nested(out, member, options, depth)?;
            }
            out.push(']');
        }
    }
    Ok(())
}

/// Checks the top-level sequence length against `options.max_len`.
pub fn validate(values: &[Value], options: &CodecOptions) -> Result<()> {
    if values.len() > options.max_len {
        return Err(Error::size_limit(values.len(), options.max_len));
    }
    Ok(())
}

/// The dictionary encoder.
///
/// Each pushed value occupies the next top-level slot. A value whose
/// serialized text already occupies an earlier slot is written as `<N>`.
pub struct Encoder<'a> {
    output: String,
    options: &'a CodecOptions,
    dictionary: Dictionary,
    slot: usize,
    pointers: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(options: &'a CodecOptions) -> Self {
        Self::with_dictionary(options, Dictionary::new())
    }

    /// Creates an encoder sized for `capacity` top-level elements.
    pub fn with_capacity(options: &'a CodecOptions, capacity: usize) -> Self {
        let dictionary = if options.dedup {
            Dictionary::with_capacity(capacity)
        } else {
            Dictionary::new()
        };
        Self::with_dictionary(options, dictionary)
    }

    fn with_dictionary(options: &'a CodecOptions, dictionary: Dictionary) -> Self {
        Encoder {
            output: String::from("["),
            options,
            dictionary,
            slot: 0,
            pointers: 0,
        }
    }

    /// Appends `value` at the next slot.
    ///
    /// On error the encoder holds a partial payload and should be dropped.
    pub fn push(&mut self, value: &Value) -> Result<()> {
        if self.slot >= self.options.max_len {
            return Err(Error::size_limit(self.slot + 1, self.options.max_len));
        }

        let mut text = String::new();
        write_value(&mut text, value, self.options)?;

        if self.slot > 0 {
            self.output.push(',');
        }

        match self.dictionary.get(&text).filter(|_| self.options.dedup) {
            Some(first) => {
                trace!(slot = self.slot, first, "back-reference");
                self.output.push('<');
                self.output.push_str(&first.to_string());
                self.output.push('>');
                self.pointers += 1;
            }
            None => {
                self.output.push_str(&text);
                if self.options.dedup {
                    self.dictionary.insert(text, self.slot);
                }
            }
        }

        self.slot += 1;
        Ok(())
    }

    /// Returns the number of slots written so far.
    pub fn len(&self) -> usize {
        self.slot
    }

    pub fn is_empty(&self) -> bool {
        self.slot == 0
    }

    /// Closes the payload and returns it.
    pub fn finish(mut self) -> String {
        self.output.push(']');
        debug!(
            slots = self.slot,
            distinct = self.dictionary.len(),
            pointers = self.pointers,
            bytes = self.output.len(),
            "encoded payload"
        );
        self.output
    }
}

/// Encodes `values` into a payload with the given options.
///
/// The sequence length is checked before any element is serialized.
pub fn encode_with_options(values: &[Value], options: &CodecOptions) -> Result<String> {
    validate(values, options)?;
    let mut encoder = Encoder::with_capacity(options, values.len());
    for value in values {
        encoder.push(value)?;
    }
    Ok(encoder.finish())
}

/// Encodes a top-level `T: Serialize` sequence straight into a payload.
///
/// Only sequences, tuples and tuple structs (optionally wrapped in `Some` or a
/// newtype struct) are accepted; anything else fails with
/// [`Error::InvalidInput`]. A known length is checked against `max_len`
/// before any element is converted, and the element count is checked again
/// before each conversion.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_backref::{CodecOptions, ErrorKind, SequenceSerializer};
///
/// let options = CodecOptions::new();
/// let payload = vec![3, 3].serialize(SequenceSerializer::new(&options)).unwrap();
/// assert_eq!(payload, "[3,<0>]");
///
/// let err = true.serialize(SequenceSerializer::new(&options)).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidInput);
/// ```
pub struct SequenceSerializer<'a> {
    options: &'a CodecOptions,
}

pub struct SerializeSequence<'a> {
    encoder: Encoder<'a>,
}

impl<'a> SequenceSerializer<'a> {
    pub fn new(options: &'a CodecOptions) -> Self {
        SequenceSerializer { options }
    }

    fn begin(self, len: Option<usize>) -> Result<SerializeSequence<'a>> {
        let len = len.unwrap_or(0);
        if len > self.options.max_len {
            return Err(Error::size_limit(len, self.options.max_len));
        }
        Ok(SerializeSequence {
            encoder: Encoder::with_capacity(self.options, len),
        })
    }

    fn reject(found: &str) -> Error {
        Error::invalid_input(&format!(
            "expected a sequence at the top level, found {}",
            found
        ))
    }
}

impl<'a> ser::Serializer for SequenceSerializer<'a> {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = SerializeSequence<'a>;
    type SerializeTuple = SerializeSequence<'a>;
    type SerializeTupleStruct = SerializeSequence<'a>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(Self::reject("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_i128(self, _v: i128) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_u128(self, _v: u128) -> Result<String> {
        Err(Self::reject("integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(Self::reject("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(Self::reject("f64"))
    }

    fn serialize_char(self, _v: char) -> Result<String> {
        Err(Self::reject("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<String> {
        Err(Self::reject("string"))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        let mut seq = self.begin(Some(v.len()))?;
        for byte in v {
            seq.element(byte)?;
        }
        Ok(seq.encoder.finish())
    }

    fn serialize_none(self) -> Result<String> {
        Err(Self::reject("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(Self::reject("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
        Err(Self::reject(&format!("unit struct {}", name)))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Err(Self::reject(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(Self::reject(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeSequence<'a>> {
        self.begin(len)
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeSequence<'a>> {
        self.begin(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeSequence<'a>> {
        self.begin(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Self::reject(&format!("enum variant {}::{}", name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Self::reject("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Self::reject(&format!("struct {}", name)))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Self::reject(&format!("enum variant {}::{}", name, variant)))
    }
}

impl SerializeSequence<'_> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let slot = self.encoder.len();
        let max_len = self.encoder.options.max_len;
        if slot >= max_len {
            return Err(Error::size_limit(slot + 1, max_len));
        }
        let value = value.serialize(ValueSerializer)?;
        self.encoder.push(&value)
    }
}

impl ser::SerializeSeq for SerializeSequence<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<String> {
        Ok(self.encoder.finish())
    }
}

impl ser::SerializeTuple for SerializeSequence<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<String> {
        Ok(self.encoder.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeSequence<'_> {
    type Ok = String;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<String> {
        Ok(self.encoder.finish())
    }
}

/// Converts `T: Serialize` into a [`Value`].
///
/// Integers wider than 32 bits are range-checked; booleans, floats, unit,
/// `None`, maps, structs and data-carrying enum variants have no backref form
/// and fail with [`Error::UnsupportedType`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

impl ValueSerializer {
    fn integer<T>(v: T) -> Result<Value>
    where
        T: Copy + std::fmt::Display,
        i32: TryFrom<T>,
    {
        i32::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::range(format!("integer {} does not fit in 32 bits", v)))
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = ser::Impossible<Value, Error>;
    type SerializeMap = ser::Impossible<Value, Error>;
    type SerializeStruct = ser::Impossible<Value, Error>;
    type SerializeStructVariant = ser::Impossible<Value, Error>;

    fn serialize_bool(self, _v: bool) -> Result<Value> {
        Err(Error::unsupported_type("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Self::integer(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Self::integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Self::integer(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Self::integer(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Self::integer(v)
    }

    fn serialize_f32(self, _v: f32) -> Result<Value> {
        Err(Error::unsupported_type("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Value> {
        Err(Error::unsupported_type("f64"))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(v.iter().map(|&b| Value::from(b)).collect())
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::unsupported_type("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::unsupported_type("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Err(Error::unsupported_type(&format!("unit struct {}", name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("newtype variants"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::unsupported_type("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::unsupported_type(&format!("struct {}", name)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}
