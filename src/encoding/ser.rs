//! The recursive encoder.
//!
//! The mirror of [`de`](super::de): the dispatcher writes a node's tag,
//! then its payload writer runs, and containers recurse into children.
//! Nothing is charged to a limiter on this side; budgets are a read-side
//! defense.

use super::*;
use crate::{errors::EncodeError, mutf8, Node};

/// Writes a node's payload (no tag) to `out`.
///
/// Fails only on trees the wire cannot carry: strings past the `u16`
/// length prefix, collections past the `i32` count.
pub fn encode(node: &Node, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match node {
        Node::Byte(v) => out.push(*v as u8),
        Node::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
        Node::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
        Node::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
        Node::Float(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
        Node::Double(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
        Node::ByteArray(b) => {
            put_count(out, b.len())?;
            out.extend_from_slice(b);
        }
        Node::String(s) => put_string(out, s)?,
        Node::List(list) => {
            // one element tag for the whole list; empty lists carry the
            // end tag
            out.push(list.kind().map_or(TAG_END, |k| k.tag()));
            put_count(out, list.len())?;
            for node in list {
                encode(node, out)?;
            }
        }
        Node::Map(map) => {
            for (name, node) in map.iter() {
                out.push(node.tag());
                put_string(out, name)?;
                encode(node, out)?;
            }
            out.push(TAG_END);
        }
        Node::IntArray(v) => {
            put_count(out, v.len())?;
            for i in v {
                out.extend_from_slice(&i.to_be_bytes());
            }
        }
        Node::LongArray(v) => {
            put_count(out, v.len())?;
            for l in v {
                out.extend_from_slice(&l.to_be_bytes());
            }
        }
    }
    Ok(())
}

/// Writes an `i32` length/count field.
fn put_count(out: &mut Vec<u8>, len: usize) -> Result<(), EncodeError> {
    if len > i32::max_value() as usize {
        return Err(EncodeError::CollectionTooLong(len));
    }
    out.extend_from_slice(&(len as i32).to_be_bytes());
    Ok(())
}

/// Writes a `u16`-length-prefixed modified UTF-8 string.
pub(crate) fn put_string(out: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
    let len = mutf8::encoded_len(s)?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&mutf8::encode(s));
    Ok(())
}
