//! Reversible escaping of resource names into directory names.
//!
//! A character is escaped when it is a control character, outside printable
//! ASCII, a path separator, the escape character itself, or a `.` in first
//! position (so no name can collide with `.` or `..`). Each byte of the
//! character's UTF-8 form becomes `%xx` with two lowercase hex digits.
//! Names without such characters map to themselves.

use std::borrow::Cow;

use crate::{Error, Result};

pub const ESCAPE_CHAR: char = '%';

const HEX: &[u8; 16] = b"0123456789abcdef";

fn needs_escape(index: usize, ch: char) -> bool {
    let code = ch as u32;
    code < 0x20
        || code >= 0x7F
        || std::path::is_separator(ch)
        || ch == ESCAPE_CHAR
        || (index == 0 && ch == '.')
}

/// Map a resource name to a name that is safe as a single path component.
pub fn encode(name: &str) -> Cow<'_, str> {
    let Some(start) = name
        .char_indices()
        .find_map(|(i, ch)| needs_escape(i, ch).then_some(i))
    else {
        return Cow::Borrowed(name);
    };

    let mut out = String::with_capacity(name.len() + 8);
    out.push_str(&name[..start]);
    for (i, ch) in name[start..].char_indices() {
        if !needs_escape(start + i, ch) {
            out.push(ch);
            continue;
        }
        let mut buf = [0u8; 4];
        for byte in ch.encode_utf8(&mut buf).bytes() {
            out.push(ESCAPE_CHAR);
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0f)] as char);
        }
    }
    Cow::Owned(out)
}

/// Inverse of [`encode`].
///
/// # Errors
///
/// [`Error::MalformedEncoding`] if an escape character is not followed by
/// two hex digits, or the decoded bytes are not valid UTF-8.
pub fn decode(name: &str) -> Result<Cow<'_, str>> {
    let Some(start) = name.find(ESCAPE_CHAR) else {
        return Ok(Cow::Borrowed(name));
    };

    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(name.len());
    out.extend_from_slice(&bytes[..start]);

    let mut i = start;
    while i < bytes.len() {
        if bytes[i] != ESCAPE_CHAR as u8 {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let byte = bytes
            .get(i + 1..i + 3)
            .and_then(hex_byte)
            .ok_or_else(|| Error::MalformedEncoding {
                name: name.to_string(),
                position: i,
            })?;
        out.push(byte);
        i += 3;
    }

    String::from_utf8(out)
        .map(Cow::Owned)
        .map_err(|e| Error::MalformedEncoding {
            name: name.to_string(),
            position: e.utf8_error().valid_up_to(),
        })
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let hi = (pair[0] as char).to_digit(16)?;
    let lo = (pair[1] as char).to_digit(16)?;
    u8::try_from(hi << 4 | lo).ok()
}
