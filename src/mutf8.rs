//! Modified UTF-8, the string payload encoding of the wire format.
//!
//! Modified UTF-8 differs from standard UTF-8 in two ways: U+0000 is written
//! as the two-byte sequence `C0 80` so encoded strings never contain a raw
//! NUL, and characters outside the basic multilingual plane are written as a
//! CESU-8 surrogate pair of two three-byte sequences instead of one
//! four-byte sequence.
//!
//! Decoding combines surrogate pairs back into a single character. An
//! unpaired surrogate is an error here: unlike the reference ecosystem's
//! strings, a Rust [`String`] cannot hold one.

use crate::errors::{DecodeError, EncodeError};

/// Decodes a modified UTF-8 byte slice.
///
/// The entire slice must decode; any malformed or truncated sequence fails
/// with [`DecodeError::InvalidString`] carrying the offending byte offset.
///
/// # Example
///
/// ```
/// use bintag::mutf8;
///
/// assert_eq!(mutf8::decode(b"\xC0\x80a").unwrap(), "\0a");
/// assert!(mutf8::decode(b"\xE0\xA4").is_err());
/// ```
pub fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x00..=0x7F => {
                out.push(b as char);
                i += 1;
            }
            0xC0..=0xDF => {
                let b2 = continuation(bytes, i + 1)?;
                let c = (u32::from(b & 0x1F) << 6) | u32::from(b2 & 0x3F);
                // always below 0x800, never a surrogate
                out.push(char_at(c, i)?);
                i += 2;
            }
            0xE0..=0xEF => {
                let b2 = continuation(bytes, i + 1)?;
                let b3 = continuation(bytes, i + 2)?;
                let c = (u32::from(b & 0x0F) << 12)
                    | (u32::from(b2 & 0x3F) << 6)
                    | u32::from(b3 & 0x3F);
                match c {
                    0xD800..=0xDBFF => {
                        let low = trailing_surrogate(bytes, i + 3)?;
                        let c = 0x1_0000 + ((c - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char_at(c, i)?);
                        i += 6;
                    }
                    0xDC00..=0xDFFF => return Err(DecodeError::InvalidString(i)),
                    _ => {
                        out.push(char_at(c, i)?);
                        i += 3;
                    }
                }
            }
            _ => return Err(DecodeError::InvalidString(i)),
        }
    }
    Ok(out)
}

fn continuation(bytes: &[u8], at: usize) -> Result<u8, DecodeError> {
    match bytes.get(at) {
        Some(&b) if b & 0xC0 == 0x80 => Ok(b),
        _ => Err(DecodeError::InvalidString(at)),
    }
}

fn trailing_surrogate(bytes: &[u8], at: usize) -> Result<u32, DecodeError> {
    if bytes.len() < at + 3 || bytes[at] & 0xF0 != 0xE0 {
        return Err(DecodeError::InvalidString(at));
    }
    let b2 = continuation(bytes, at + 1)?;
    let b3 = continuation(bytes, at + 2)?;
    let c = (u32::from(bytes[at] & 0x0F) << 12)
        | (u32::from(b2 & 0x3F) << 6)
        | u32::from(b3 & 0x3F);
    match c {
        0xDC00..=0xDFFF => Ok(c),
        _ => Err(DecodeError::InvalidString(at)),
    }
}

fn char_at(c: u32, at: usize) -> Result<char, DecodeError> {
    std::char::from_u32(c).ok_or(DecodeError::InvalidString(at))
}

/// Encodes a string as modified UTF-8.
///
/// # Example
///
/// ```
/// use bintag::mutf8;
///
/// assert_eq!(mutf8::encode("a\0b"), b"a\xC0\x80b");
/// ```
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        let c = c as u32;
        match c {
            0 => out.extend_from_slice(&[0xC0, 0x80]),
            0x01..=0x7F => out.push(c as u8),
            0x80..=0x7FF => {
                out.push(0xC0 | (c >> 6) as u8);
                out.push(0x80 | (c & 0x3F) as u8);
            }
            0x800..=0xFFFF => push_three(&mut out, c),
            _ => {
                let v = c - 0x1_0000;
                push_three(&mut out, 0xD800 | (v >> 10));
                push_three(&mut out, 0xDC00 | (v & 0x3FF));
            }
        }
    }
    out
}

fn push_three(out: &mut Vec<u8>, c: u32) {
    out.push(0xE0 | (c >> 12) as u8);
    out.push(0x80 | ((c >> 6) & 0x3F) as u8);
    out.push(0x80 | (c & 0x3F) as u8);
}

/// The modified UTF-8 length of a string, checked against the `u16` length
/// prefix the wire format uses.
pub fn encoded_len(s: &str) -> Result<u16, EncodeError> {
    let mut len: usize = 0;
    for c in s.chars() {
        len += match c as u32 {
            0 => 2,
            0x01..=0x7F => 1,
            0x80..=0x7FF => 2,
            0x800..=0xFFFF => 3,
            _ => 6,
        };
    }
    if len > usize::from(u16::max_value()) {
        return Err(EncodeError::StringTooLong(len));
    }
    Ok(len as u16)
}
