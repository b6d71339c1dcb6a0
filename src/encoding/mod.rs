//! Binary encoder and decoder for the tagged tree format.
//!
//! Three framings wrap a top-level node, differing only in what precedes
//! the payload:
//!
//! * **named** — tag, length-prefixed name, payload. The canonical
//!   whole-document format; the top-level name is conventionally empty.
//! * **unnamed** — tag, then a name field that is charged and skipped
//!   without being decoded. Reads named streams while ignoring the name;
//!   under a strict limiter a non-empty name is a hard failure.
//! * **plain** — tag, payload. No name field at all.
//!
//! On all three, the end tag 0 reads as `Ok(None)`: top-level absence is
//! not an error, and is distinct from a present-but-empty container.
//!
//! # Example
//!
//! ```
//! use bintag::prelude::*;
//!
//! let node = Node::from("hello");
//!
//! let mut out = Vec::new();
//! write_plain(&mut out, Some(&node)).unwrap();
//!
//! let mut limiter = Limiter::protocol();
//! let back = read_plain(&mut out.as_slice(), &mut limiter).unwrap();
//! assert_eq!(back, Some(node));
//!
//! // absence round-trips as None
//! let mut out = Vec::new();
//! write_plain(&mut out, None).unwrap();
//! assert_eq!(out, [0]);
//! ```

pub mod de;
pub mod ser;

pub use de::reader;
pub use ser::encode;

use crate::{
    errors::{DecodeError, EncodeError},
    limiter::Limiter,
    Node,
};
use bytes::Buf;

/// End-of-map marker and "no node"; never a materialized value.
pub const TAG_END: u8 = 0;
/// Wire tag of [`Node::Byte`].
pub const TAG_BYTE: u8 = 1;
/// Wire tag of [`Node::Short`].
pub const TAG_SHORT: u8 = 2;
/// Wire tag of [`Node::Int`].
pub const TAG_INT: u8 = 3;
/// Wire tag of [`Node::Long`].
pub const TAG_LONG: u8 = 4;
/// Wire tag of [`Node::Float`].
pub const TAG_FLOAT: u8 = 5;
/// Wire tag of [`Node::Double`].
pub const TAG_DOUBLE: u8 = 6;
/// Wire tag of [`Node::ByteArray`].
pub const TAG_BYTE_ARRAY: u8 = 7;
/// Wire tag of [`Node::String`].
pub const TAG_STRING: u8 = 8;
/// Wire tag of [`Node::List`].
pub const TAG_LIST: u8 = 9;
/// Wire tag of [`Node::Map`].
pub const TAG_MAP: u8 = 10;
/// Wire tag of [`Node::IntArray`].
pub const TAG_INT_ARRAY: u8 = 11;
/// Wire tag of [`Node::LongArray`].
pub const TAG_LONG_ARRAY: u8 = 12;

/// Reads a named node: tag, name, payload.
///
/// Returns `Ok(None)` for the end tag.
pub fn read_named<B: Buf>(
    buf: &mut B,
    limiter: &mut Limiter,
) -> Result<Option<(String, Node)>, DecodeError> {
    limiter.read_unsigned(1)?;
    let tag = de::take_u8(buf)?;
    if tag == TAG_END {
        return Ok(None);
    }
    let name = de::read_limited_string(buf, limiter)?;
    let read = de::reader::<B>(tag)?;
    Ok(Some((name, read(buf, limiter)?)))
}

/// Reads a node from a named stream, discarding the name.
///
/// The name's bytes are still charged to the limiter and skipped, never
/// decoded. Under [`Limiter::is_strict_empty_names`] any non-empty name
/// fails with [`DecodeError::NonEmptyName`].
pub fn read_unnamed<B: Buf>(
    buf: &mut B,
    limiter: &mut Limiter,
) -> Result<Option<Node>, DecodeError> {
    limiter.read_unsigned(1)?;
    let tag = de::take_u8(buf)?;
    if tag == TAG_END {
        return Ok(None);
    }
    limiter.read_unsigned(2)?;
    let skip = usize::from(de::take_u16(buf)?);
    if skip != 0 && limiter.is_strict_empty_names() {
        return Err(DecodeError::NonEmptyName(skip));
    }
    limiter.read_unsigned(skip as u64)?;
    de::skip_bytes(buf, skip)?;
    let read = de::reader::<B>(tag)?;
    Ok(Some(read(buf, limiter)?))
}

/// Reads a plain node: tag, payload, no name field.
pub fn read_plain<B: Buf>(
    buf: &mut B,
    limiter: &mut Limiter,
) -> Result<Option<Node>, DecodeError> {
    limiter.read_unsigned(1)?;
    let tag = de::take_u8(buf)?;
    if tag == TAG_END {
        return Ok(None);
    }
    let read = de::reader::<B>(tag)?;
    Ok(Some(read(buf, limiter)?))
}

/// Writes a named node. `None` writes the single end tag and nothing else.
pub fn write_named(
    out: &mut Vec<u8>,
    name: &str,
    node: Option<&Node>,
) -> Result<(), EncodeError> {
    match node {
        None => out.push(TAG_END),
        Some(node) => {
            out.push(node.tag());
            ser::put_string(out, name)?;
            ser::encode(node, out)?;
        }
    }
    Ok(())
}

/// Writes a node in the named framing with an empty name field.
pub fn write_unnamed(out: &mut Vec<u8>, node: Option<&Node>) -> Result<(), EncodeError> {
    match node {
        None => out.push(TAG_END),
        Some(node) => {
            out.push(node.tag());
            out.extend_from_slice(&0u16.to_be_bytes());
            ser::encode(node, out)?;
        }
    }
    Ok(())
}

/// Writes a plain node: tag, payload.
pub fn write_plain(out: &mut Vec<u8>, node: Option<&Node>) -> Result<(), EncodeError> {
    match node {
        None => out.push(TAG_END),
        Some(node) => {
            out.push(node.tag());
            ser::encode(node, out)?;
        }
    }
    Ok(())
}

/// Encodes a node as a whole document: named framing, empty name.
pub fn encode_full(node: Option<&Node>) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    write_named(&mut out, "", node)?;
    Ok(out)
}

/// Decodes a whole document written by [`encode_full`], returning the
/// top-level name alongside the node.
pub fn decode_full(
    mut bytes: &[u8],
    limiter: &mut Limiter,
) -> Result<Option<(String, Node)>, DecodeError> {
    read_named(&mut bytes, limiter)
}
