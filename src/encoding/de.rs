//! The recursive-descent decoder.
//!
//! Every reader charges the [`Limiter`] for what it is about to consume
//! *before* touching the byte source or allocating, and containers bracket
//! their recursion with `push`/`pop`. [`reader`] is the dispatch table
//! mapping a wire tag to the matching read routine.

use super::*;
use crate::{errors::DecodeError, limiter::Limiter, list::List, mutf8, Node, VecMap};
use bytes::{Buf, Bytes};

/// A decode routine for one node kind.
pub type Reader<B> = fn(&mut B, &mut Limiter) -> Result<Node, DecodeError>;

/// Looks up the decode routine for a wire tag.
///
/// The end tag 0 is not a value and has no reader; callers handle it
/// before dispatching. Anything else outside the registered set fails
/// with [`DecodeError::UnknownType`], which is how corrupt or adversarial
/// streams are rejected at the entry of every recursive read.
pub fn reader<B: Buf>(tag: u8) -> Result<Reader<B>, DecodeError> {
    Ok(match tag {
        TAG_BYTE => read_byte,
        TAG_SHORT => read_short,
        TAG_INT => read_int,
        TAG_LONG => read_long,
        TAG_FLOAT => read_float,
        TAG_DOUBLE => read_double,
        TAG_BYTE_ARRAY => read_byte_array,
        TAG_STRING => read_string,
        TAG_LIST => read_list,
        TAG_MAP => read_map,
        TAG_INT_ARRAY => read_int_array,
        TAG_LONG_ARRAY => read_long_array,
        _ => return Err(DecodeError::UnknownType(tag)),
    })
}

fn need<B: Buf>(buf: &B, wanted: usize) -> Result<(), DecodeError> {
    let had = buf.remaining();
    if had < wanted {
        Err(DecodeError::UnexpectedEof { wanted, had })
    } else {
        Ok(())
    }
}

pub(crate) fn take_u8<B: Buf>(buf: &mut B) -> Result<u8, DecodeError> {
    need(buf, 1)?;
    Ok(buf.get_u8())
}

pub(crate) fn take_u16<B: Buf>(buf: &mut B) -> Result<u16, DecodeError> {
    need(buf, 2)?;
    Ok(buf.get_u16())
}

fn take_i16<B: Buf>(buf: &mut B) -> Result<i16, DecodeError> {
    need(buf, 2)?;
    Ok(buf.get_i16())
}

fn take_i32<B: Buf>(buf: &mut B) -> Result<i32, DecodeError> {
    need(buf, 4)?;
    Ok(buf.get_i32())
}

fn take_i64<B: Buf>(buf: &mut B) -> Result<i64, DecodeError> {
    need(buf, 8)?;
    Ok(buf.get_i64())
}

fn take_bytes<B: Buf>(buf: &mut B, len: usize) -> Result<Bytes, DecodeError> {
    need(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

pub(crate) fn skip_bytes<B: Buf>(buf: &mut B, len: usize) -> Result<(), DecodeError> {
    need(buf, len)?;
    buf.advance(len);
    Ok(())
}

/// Reads a byte node.
pub fn read_byte<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(1)?;
    need(buf, 1)?;
    Ok(Node::Byte(buf.get_i8()))
}

/// Reads a short node.
pub fn read_short<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(2)?;
    Ok(Node::Short(take_i16(buf)?))
}

/// Reads an int node.
pub fn read_int<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(4)?;
    Ok(Node::Int(take_i32(buf)?))
}

/// Reads a long node.
pub fn read_long<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(8)?;
    Ok(Node::Long(take_i64(buf)?))
}

/// Reads a float node.
pub fn read_float<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(4)?;
    need(buf, 4)?;
    Ok(Node::Float(f32::from_bits(buf.get_u32())))
}

/// Reads a double node.
pub fn read_double<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(8)?;
    need(buf, 8)?;
    Ok(Node::Double(f64::from_bits(buf.get_u64())))
}

/// Reads a byte array node.
pub fn read_byte_array<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(4)?;
    let len = take_i32(buf)?;
    if len == 0 {
        return Ok(Node::ByteArray(Bytes::new()));
    }
    limiter.read_signed(i64::from(len))?;
    Ok(Node::ByteArray(take_bytes(buf, len as usize)?))
}

/// Reads a string node.
pub fn read_string<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    Ok(Node::String(read_limited_string(buf, limiter)?))
}

/// Reads a length-prefixed modified UTF-8 string, charging the prefix and
/// the payload before consuming either.
pub(crate) fn read_limited_string<B: Buf>(
    buf: &mut B,
    limiter: &mut Limiter,
) -> Result<String, DecodeError> {
    limiter.read_unsigned(2)?;
    let len = usize::from(take_u16(buf)?);
    limiter.read_unsigned(len as u64)?;
    if len == 0 {
        return Ok(String::new());
    }
    let bytes = take_bytes(buf, len)?;
    mutf8::decode(&bytes)
}

/// Reads an int array node.
pub fn read_int_array<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.read_unsigned(4)?;
    let len = take_i32(buf)?;
    if len == 0 {
        return Ok(Node::IntArray(Vec::new()));
    }
    limiter.read_signed(i64::from(len) * 4)?;
    need(buf, len as usize * 4)?;
    let mut out = Vec::with_capacity(len as usize);
    for _ in 0..len {
        out.push(buf.get_i32());
    }
    Ok(Node::IntArray(out))
}

/// Reads a long array node.
///
/// Consults the limiter's long-array policy first: a gated stream sees
/// this tag exactly as it would see a tag it has never heard of.
pub fn read_long_array<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    if !limiter.allows_long_arrays() {
        return Err(DecodeError::UnknownType(TAG_LONG_ARRAY));
    }
    limiter.read_unsigned(4)?;
    let len = take_i32(buf)?;
    if len == 0 {
        return Ok(Node::LongArray(Vec::new()));
    }
    limiter.read_signed(i64::from(len) * 8)?;
    need(buf, len as usize * 8)?;
    let mut out = Vec::with_capacity(len as usize);
    for _ in 0..len {
        out.push(buf.get_i64());
    }
    Ok(Node::LongArray(out))
}

// A hostile list header can claim up to i32::MAX elements while charging
// only its own five bytes; preallocation is capped so the claim is paid
// for element by element.
const LIST_PREALLOC_CAP: usize = 1024;

/// Reads a list node.
pub fn read_list<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.push()?;
    limiter.read_unsigned(1)?;
    let tag = take_u8(buf)?;
    limiter.read_unsigned(4)?;
    let count = take_i32(buf)?;
    if tag == TAG_END {
        if count != 0 {
            return Err(DecodeError::InvalidLength(count));
        }
        limiter.pop()?;
        return Ok(Node::List(List::new()));
    }
    if count == 0 {
        limiter.pop()?;
        return Ok(Node::List(List::new()));
    }
    if count < 0 {
        return Err(DecodeError::InvalidLength(count));
    }
    let read = reader::<B>(tag)?;
    let mut out = Vec::with_capacity((count as usize).min(LIST_PREALLOC_CAP));
    for _ in 0..count {
        out.push(read(buf, limiter)?);
    }
    limiter.pop()?;
    Ok(Node::List(List::from_vec_unchecked(out)))
}

/// Reads a map node.
///
/// Loops over named entries until the end tag; a stream that never
/// provides one runs the source dry or trips the byte budget, it never
/// yields a truncated map.
pub fn read_map<B: Buf>(buf: &mut B, limiter: &mut Limiter) -> Result<Node, DecodeError> {
    limiter.push()?;
    let mut map = VecMap::new();
    loop {
        limiter.read_unsigned(1)?;
        let tag = take_u8(buf)?;
        if tag == TAG_END {
            break;
        }
        let name = read_limited_string(buf, limiter)?;
        let read = reader::<B>(tag)?;
        // last write wins on duplicate names
        map.insert(name, read(buf, limiter)?);
    }
    limiter.pop()?;
    Ok(Node::Map(map))
}
