//! Backref Payload Format
//!
//! This module documents the payload format as implemented by this library.
//!
//! # Overview
//!
//! A payload is a single line of text holding one top-level sequence. Each
//! element is either a serialized value or a back-reference to an earlier
//! element with byte-identical serialized text.
//!
//! ```text
//! ["foo",<0>,23,["bar";42],<2>,<3>]
//! ```
//!
//! decodes to `["foo", "foo", 23, ["bar", 42], 23, ["bar", 42]]`.
//!
//! # Grammar
//!
//! ```text
//! payload       := "[" [topList] "]"
//! topList       := topElem ("," topElem)*
//! topElem       := serialized | pointer
//! pointer       := "<" digits ">"
//! serialized    := quotedString | bracketedList | integer
//! quotedString  := "\"" escapedChars "\""
//! bracketedList := "[" [nestedList] "]"
//! nestedList    := serialized (";" serialized)*
//! integer       := ["-"] digits
//! ```
//!
//! **Rules**:
//! - The top level separates elements with `,`; every list below it uses `;`
//! - No whitespace is written or accepted between tokens
//! - `[]` is the empty sequence at the top level and the empty list below it
//! - Integers are 32-bit signed, written in decimal with no leading `+`
//!
//! # Strings
//!
//! Strings are always double-quoted. Six characters are reserved and are
//! replaced inside strings by a four-character code:
//!
//! | char | code   |
//! |------|--------|
//! | `,`  | `0x2c` |
//! | `"`  | `0x22` |
//! | `'`  | `0x27` |
//! | `<`  | `0x3c` |
//! | `>`  | `0x3e` |
//! | `;`  | `0x3b` |
//!
//! Brackets are not escaped; the decoder ignores them inside quotes.
//!
//! Decoding replaces codes literally, so the text `0x3c` inside a string is
//! read back as `<` whether or not it was produced by escaping.
//!
//! # Back-references
//!
//! `<N>` stands for the value at top-level slot `N` (0-based).
//!
//! **Rules**:
//! - `N` is strictly less than the pointer's own slot
//! - Slot `N` holds a serialized value, never another pointer; the encoder
//!   always names the first occurrence
//! - Pointers appear only at the top level; lists are deduplicated only as a
//!   whole, never member by member
//!
//! ```text
//! [1,<0>,2,<2>,3,<4>]       # 1,1,2,2,3,3
//! [[1;1],1,<1>]             # [1,1],1,1: list members are not deduplicated
//! [1,<0>,[3;[4;5]],6]       # nested lists keep their structure
//! ```
//!
//! # Limits
//!
//! | Bound | Default | Error |
//! |-------|---------|-------|
//! | Top-level elements | 1000 | `SizeLimit` |
//! | String length (chars) | 1,000,000 | `Range` |
//! | Integer range | `i32::MIN..=i32::MAX` | `Range` |
//! | List nesting | 256 | `Range` on encode, `MalformedPayload` on decode |
//!
//! The nesting bound applies to both directions; the others apply to
//! encoding. All are configured through [`CodecOptions`](crate::CodecOptions).

// This module contains only documentation; no implementation code
