//! Configuration options for backref encoding.
//!
//! [`CodecOptions`] carries the bounds the encoder enforces and whether
//! repeated top-level values are replaced by back-references.
//!
//! ## Examples
//!
//! ```rust
//! use serde_backref::{encode_with_options, CodecOptions, Value};
//!
//! let values = vec![Value::from(7), Value::from(7)];
//!
//! let options = CodecOptions::new().with_dedup(false);
//! assert_eq!(encode_with_options(&values, &options).unwrap(), "[7,7]");
//!
//! let options = CodecOptions::new().with_max_len(1);
//! assert!(encode_with_options(&values, &options).is_err());
//! ```

/// Maximum number of top-level elements accepted by default.
pub const DEFAULT_MAX_LEN: usize = 1000;

/// Maximum string length, in chars, accepted by default.
pub const DEFAULT_MAX_STRING_LEN: usize = 1_000_000;

/// Maximum list nesting accepted by default, on both encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration options for backref encoding.
///
/// # Examples
///
/// ```rust
/// use serde_backref::CodecOptions;
///
/// let options = CodecOptions::new();
/// assert_eq!(options.max_len, 1000);
/// assert_eq!(options.max_string_len, 1_000_000);
/// assert_eq!(options.max_depth, 256);
/// assert!(options.dedup);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    pub max_len: usize,
    pub max_string_len: usize,
    pub max_depth: usize,
    pub dedup: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            max_len: DEFAULT_MAX_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            dedup: true,
        }
    }
}

impl CodecOptions {
    /// Creates default options (1000 elements, 1,000,000-char strings, 256
    /// levels of nesting, dedup on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with no element, string length or nesting bound.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_backref::CodecOptions;
    ///
    /// let options = CodecOptions::unbounded();
    /// assert_eq!(options.max_len, usize::MAX);
    /// ```
    #[must_use]
    pub fn unbounded() -> Self {
        CodecOptions {
            max_len: usize::MAX,
            max_string_len: usize::MAX,
            max_depth: usize::MAX,
            ..Default::default()
        }
    }

    /// Sets the maximum number of top-level elements.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Sets the maximum string length, counted in chars.
    #[must_use]
    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    /// Sets the maximum list nesting depth.
    ///
    /// A top-level list has depth 1. Deeper values fail to encode with
    /// [`Error::Range`](crate::Error::Range) and deeper payloads fail to decode
    /// with [`Error::MalformedPayload`](crate::Error::MalformedPayload).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables back-reference substitution.
    ///
    /// With dedup off every element is written out in full; the payload still
    /// decodes with [`decode`](crate::decode).
    #[must_use]
    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }
}
