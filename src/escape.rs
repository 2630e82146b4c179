//! Escaping of reserved characters inside string payloads.
//!
//! Six characters carry meaning in the payload grammar. Inside a string each
//! of them is written as a fixed four-character code:
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
//! No code contains a reserved character, and no code overlaps another, so a
//! single left-to-right scan in either direction produces the same bytes as
//! replacing each character one after another.
//!
//! Unescaping matches codes literally. A string that already contains the text
//! `0x2c` therefore decodes to `,`; the wire format has no way to tell the two
//! apart.

/// Reserved characters and their escape codes.
pub const ESCAPES: [(char, &str); 6] = [
    (',', "0x2c"),
    ('"', "0x22"),
    ('\'', "0x27"),
    ('<', "0x3c"),
    ('>', "0x3e"),
    (';', "0x3b"),
];

#[inline]
fn code_for(ch: char) -> Option<&'static str> {
    match ch {
        ',' => Some("0x2c"),
        '"' => Some("0x22"),
        '\'' => Some("0x27"),
        '<' => Some("0x3c"),
        '>' => Some("0x3e"),
        ';' => Some("0x3b"),
        _ => None,
    }
}

#[inline]
fn char_for(code: &[u8]) -> Option<char> {
    match code {
        b"0x2c" => Some(','),
        b"0x22" => Some('"'),
        b"0x27" => Some('\''),
        b"0x3c" => Some('<'),
        b"0x3e" => Some('>'),
        b"0x3b" => Some(';'),
        _ => None,
    }
}

/// Appends `s` to `out` with every reserved character replaced by its code.
pub fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match code_for(ch) {
            Some(code) => out.push_str(code),
            None => out.push(ch),
        }
    }
}

/// Returns `s` with every escape code replaced by its character.
pub fn unescape(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut start = 0;
    let mut i = 0;

    while i + 4 <= bytes.len() {
        match char_for(&bytes[i..i + 4]) {
            Some(ch) => {
                out.push_str(&s[start..i]);
                out.push(ch);
                i += 4;
                start = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&s[start..]);
    out
}
