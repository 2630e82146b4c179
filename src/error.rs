//! Error types for backref encoding and decoding.
//!
//! ## Error Categories
//!
//! - **Encode-side**: the input is not a sequence, is too long, carries an
//!   out-of-range integer or an oversized string, or holds a type the codec
//!   cannot represent
//! - **Decode-side**: the payload does not follow the grammar, a back-reference
//!   points somewhere it cannot, or an integer token does not parse
//! - **Plumbing**: I/O failures and custom messages raised through serde
//!
//! Every encode-side error is raised before any output is returned, so a
//! failed `encode` never yields a partial payload.
//!
//! ## Examples
//!
//! ```rust
//! use serde_backref::{decode, ErrorKind};
//!
//! let err = decode("[1,<5>]").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DanglingPointer);
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The top-level value handed to the encoder is not a sequence
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The top-level sequence is longer than the configured limit
    #[error("Sequence of {len} elements exceeds the maximum of {max}")]
    SizeLimit { len: usize, max: usize },

    /// An integer outside the 32-bit signed range, or an oversized string
    #[error("Value out of range: {0}")]
    Range(String),

    /// A value the codec cannot represent (floats, booleans, null, maps)
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// The payload does not follow the backref grammar
    #[error("Malformed payload at byte {position}: {msg}")]
    MalformedPayload { position: usize, msg: String },

    /// A back-reference that does not name an earlier serialized slot
    #[error("Back-reference in slot {slot} points to slot {target}, which is not an earlier value")]
    DanglingPointer { slot: usize, target: usize },

    /// A bare token that is not a 32-bit signed integer
    #[error("Invalid integer {token:?} at byte {position}")]
    InvalidInteger { position: usize, token: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// A fieldless mirror of [`Error`] for matching on the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    SizeLimit,
    Range,
    UnsupportedType,
    MalformedPayload,
    DanglingPointer,
    InvalidInteger,
    Io,
    Custom,
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::SizeLimit { .. } => ErrorKind::SizeLimit,
            Error::Range(_) => ErrorKind::Range,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            Error::DanglingPointer { .. } => ErrorKind::DanglingPointer,
            Error::InvalidInteger { .. } => ErrorKind::InvalidInteger,
            Error::Io(_) => ErrorKind::Io,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Returns `true` for errors produced while reading a payload.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::MalformedPayload { .. }
                | Error::DanglingPointer { .. }
                | Error::InvalidInteger { .. }
        )
    }

    /// Creates an invalid input error for a top-level value that is not a sequence.
    pub fn invalid_input(msg: &str) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Creates a size limit error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_backref::Error;
    ///
    /// let err = Error::size_limit(1001, 1000);
    /// assert!(err.to_string().contains("1001"));
    /// ```
    pub fn size_limit(len: usize, max: usize) -> Self {
        Error::SizeLimit { len, max }
    }

    /// Creates a range error for integers or strings outside their bounds.
    pub fn range<T: fmt::Display>(msg: T) -> Self {
        Error::Range(msg.to_string())
    }

    /// Creates an unsupported type error for types that have no backref form.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a malformed payload error at the given byte offset.
    pub fn malformed(position: usize, msg: &str) -> Self {
        Error::MalformedPayload {
            position,
            msg: msg.to_string(),
        }
    }

    pub fn dangling_pointer(slot: usize, target: usize) -> Self {
        Error::DanglingPointer { slot, target }
    }

    pub fn invalid_integer(position: usize, token: &str) -> Self {
        Error::InvalidInteger {
            position,
            token: token.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_backref::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
