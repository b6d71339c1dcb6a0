//! # bintag
//!
//! `bintag` is a codec for a recursive, self-describing binary tag format:
//! a tagged tree of typed scalars, arrays, strings, lists and keyed maps,
//! as used to serialize game and application state.
//!
//! The decoder is hardened against untrusted input. Every read is charged
//! to a [`Limiter`] *before* any allocation or recursion happens, so
//! oversized strings, absurd array lengths and deeply nested structures are
//! rejected cheaply instead of exhausting memory or the call stack.
//!
//! # Usage
//!
//! ```
//! use bintag::prelude::*;
//!
//! let mut map = VecMap::new();
//! map.insert("a".to_string(), Node::Int(5));
//! map.insert("b".to_string(), Node::from("x"));
//! let node = Node::Map(map);
//!
//! // encode under the canonical named framing
//! let mut out = Vec::new();
//! write_named(&mut out, "", Some(&node)).unwrap();
//!
//! // decode with the reference protocol budgets
//! let mut limiter = Limiter::protocol();
//! let (name, back) = read_named(&mut out.as_slice(), &mut limiter)
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(name, "");
//! assert_eq!(back, node);
//! ```
//!
//! # Wire format
//!
//! Big-endian throughout. Each node is identified by a one-byte tag:
//!
//! | Tag | Variant   | Payload                                        |
//! |-----|-----------|------------------------------------------------|
//! | 0   | end/none  | none                                           |
//! | 1   | Byte      | 1 byte                                         |
//! | 2   | Short     | 2 bytes                                        |
//! | 3   | Int       | 4 bytes                                        |
//! | 4   | Long      | 8 bytes                                        |
//! | 5   | Float     | 4 bytes IEEE-754                               |
//! | 6   | Double    | 8 bytes IEEE-754                               |
//! | 7   | ByteArray | i32 length + N bytes                           |
//! | 8   | String    | u16 length + N bytes modified UTF-8            |
//! | 9   | List      | element tag + i32 count + N payloads           |
//! | 10  | Map       | repeated (tag, name, payload), then tag 0      |
//! | 11  | IntArray  | i32 length + N × 4 bytes                       |
//! | 12  | LongArray | i32 length + N × 8 bytes (feature-gated)       |
//!
//! Three framings wrap a top-level node: *named* (`tag, name, payload`),
//! *unnamed* (`tag, skipped name, payload`) and *plain* (`tag, payload`).
//! Tag 0 at the top level means "no node" and maps to [`None`].
//!
//! # Trust model
//!
//! Decoding is single-threaded, synchronous and call-stack-recursive:
//! nesting depth *is* native stack depth, bounded only by the limiter's
//! depth budget. Size that budget well below the runtime's stack limit;
//! the [`Limiter::protocol`] preset of 512 is comfortably safe on default
//! stacks.

pub mod encoding;
pub mod errors;
pub mod limiter;
pub mod list;
pub mod mutf8;
pub mod prelude;
pub mod vecmap;

use bytes::Bytes;
use std::convert::TryFrom;

pub use crate::{
    errors::{DecodeError, EncodeError, TypeMismatchError},
    limiter::{Limiter, PROTOCOL_MAX_DEPTH, PROTOCOL_MAX_LENGTH},
    list::List,
    vecmap::VecMap,
};

/// One node of the tagged tree.
///
/// The variant set is closed; [`NodeKind`] mirrors it one-to-one and
/// carries the wire tags. There is no null variant: the wire's end tag
/// appears as [`Option::None`] at the API edges instead.
///
/// Container variants own their children outright. Constructing a
/// [`Node::List`] or [`Node::Map`] moves the collection in; the caller
/// keeps no alias.
///
/// # Example
///
/// ```
/// use bintag::Node;
///
/// let node = Node::Short(-5);
/// assert_eq!(node.tag(), 2);
/// assert_eq!(node.as_i64(), Some(-5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A signed 8-bit integer. Also the boolean carrier: zero is false.
    Byte(i8),
    /// A signed 16-bit integer.
    Short(i16),
    /// A signed 32-bit integer.
    Int(i32),
    /// A signed 64-bit integer.
    Long(i64),
    /// A single-precision float.
    Float(f32),
    /// A double-precision float.
    Double(f64),
    /// A raw byte buffer.
    ByteArray(Bytes),
    /// A string, carried as modified UTF-8 on the wire.
    String(String),
    /// An ordered sequence of nodes of one shared kind.
    List(List),
    /// Named nodes in insertion order; equality ignores that order.
    Map(VecMap<String, Node>),
    /// A packed array of 32-bit integers.
    IntArray(Vec<i32>),
    /// A packed array of 64-bit integers. Feature-gated on the wire:
    /// limiters can reject it as unknown.
    LongArray(Vec<i64>),
}

/// The closed set of node kinds, one per [`Node`] variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Map,
    IntArray,
    LongArray,
}

impl NodeKind {
    /// The one-byte wire tag of this kind.
    pub fn tag(self) -> u8 {
        match self {
            NodeKind::Byte => 1,
            NodeKind::Short => 2,
            NodeKind::Int => 3,
            NodeKind::Long => 4,
            NodeKind::Float => 5,
            NodeKind::Double => 6,
            NodeKind::ByteArray => 7,
            NodeKind::String => 8,
            NodeKind::List => 9,
            NodeKind::Map => 10,
            NodeKind::IntArray => 11,
            NodeKind::LongArray => 12,
        }
    }

    /// Looks a wire tag up in the registry.
    ///
    /// Fails with [`DecodeError::UnknownType`] for anything outside the
    /// registered set, including the end tag 0, which is not a kind.
    pub fn from_tag(tag: u8) -> Result<Self, DecodeError> {
        Ok(match tag {
            1 => NodeKind::Byte,
            2 => NodeKind::Short,
            3 => NodeKind::Int,
            4 => NodeKind::Long,
            5 => NodeKind::Float,
            6 => NodeKind::Double,
            7 => NodeKind::ByteArray,
            8 => NodeKind::String,
            9 => NodeKind::List,
            10 => NodeKind::Map,
            11 => NodeKind::IntArray,
            12 => NodeKind::LongArray,
            _ => return Err(DecodeError::UnknownType(tag)),
        })
    }
}

impl Node {
    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Byte(_) => NodeKind::Byte,
            Node::Short(_) => NodeKind::Short,
            Node::Int(_) => NodeKind::Int,
            Node::Long(_) => NodeKind::Long,
            Node::Float(_) => NodeKind::Float,
            Node::Double(_) => NodeKind::Double,
            Node::ByteArray(_) => NodeKind::ByteArray,
            Node::String(_) => NodeKind::String,
            Node::List(_) => NodeKind::List,
            Node::Map(_) => NodeKind::Map,
            Node::IntArray(_) => NodeKind::IntArray,
            Node::LongArray(_) => NodeKind::LongArray,
        }
    }

    /// The one-byte wire tag of this node.
    pub fn tag(&self) -> u8 {
        self.kind().tag()
    }

    /// This node as a boolean, if it is a scalar. Nonzero means true.
    pub fn as_bool(&self) -> Option<bool> {
        Some(match *self {
            Node::Byte(v) => v != 0,
            Node::Short(v) => v != 0,
            Node::Int(v) => v != 0,
            Node::Long(v) => v != 0,
            Node::Float(v) => v != 0.0,
            Node::Double(v) => v != 0.0,
            _ => return None,
        })
    }

    /// This node as an `i8`, if it is a scalar. Integers wrap, floats
    /// truncate toward zero and saturate.
    pub fn as_i8(&self) -> Option<i8> {
        Some(match *self {
            Node::Byte(v) => v,
            Node::Short(v) => v as i8,
            Node::Int(v) => v as i8,
            Node::Long(v) => v as i8,
            Node::Float(v) => v as i8,
            Node::Double(v) => v as i8,
            _ => return None,
        })
    }

    /// This node as an `i16`, if it is a scalar.
    pub fn as_i16(&self) -> Option<i16> {
        Some(match *self {
            Node::Byte(v) => i16::from(v),
            Node::Short(v) => v,
            Node::Int(v) => v as i16,
            Node::Long(v) => v as i16,
            Node::Float(v) => v as i16,
            Node::Double(v) => v as i16,
            _ => return None,
        })
    }

    /// This node as an `i32`, if it is a scalar.
    pub fn as_i32(&self) -> Option<i32> {
        Some(match *self {
            Node::Byte(v) => i32::from(v),
            Node::Short(v) => i32::from(v),
            Node::Int(v) => v,
            Node::Long(v) => v as i32,
            Node::Float(v) => v as i32,
            Node::Double(v) => v as i32,
            _ => return None,
        })
    }

    /// This node as an `i64`, if it is a scalar.
    pub fn as_i64(&self) -> Option<i64> {
        Some(match *self {
            Node::Byte(v) => i64::from(v),
            Node::Short(v) => i64::from(v),
            Node::Int(v) => i64::from(v),
            Node::Long(v) => v,
            Node::Float(v) => v as i64,
            Node::Double(v) => v as i64,
            _ => return None,
        })
    }

    /// This node as an `f32`, if it is a scalar.
    pub fn as_f32(&self) -> Option<f32> {
        Some(match *self {
            Node::Byte(v) => f32::from(v),
            Node::Short(v) => f32::from(v),
            Node::Int(v) => v as f32,
            Node::Long(v) => v as f32,
            Node::Float(v) => v,
            Node::Double(v) => v as f32,
            _ => return None,
        })
    }

    /// This node as an `f64`, if it is a scalar.
    pub fn as_f64(&self) -> Option<f64> {
        Some(match *self {
            Node::Byte(v) => f64::from(v),
            Node::Short(v) => f64::from(v),
            Node::Int(v) => f64::from(v),
            Node::Long(v) => v as f64,
            Node::Float(v) => f64::from(v),
            Node::Double(v) => v,
            _ => return None,
        })
    }

    /// Borrows the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the byte array payload.
    pub fn as_byte_array(&self) -> Option<&Bytes> {
        match self {
            Node::ByteArray(b) => Some(b),
            _ => None,
        }
    }

    /// Borrows the int array payload.
    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Node::IntArray(v) => Some(v),
            _ => None,
        }
    }

    /// Borrows the long array payload.
    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Node::LongArray(v) => Some(v),
            _ => None,
        }
    }

    /// Borrows the list payload.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mutably borrows the list payload.
    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    /// Borrows the map payload.
    pub fn as_map(&self) -> Option<&VecMap<String, Node>> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutably borrows the map payload.
    pub fn as_map_mut(&mut self) -> Option<&mut VecMap<String, Node>> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }
}

macro_rules! from_payload {
    ($typ:ty, $variant:ident) => {
        impl From<$typ> for Node {
            fn from(v: $typ) -> Node {
                Node::$variant(v.into())
            }
        }
    };
}

from_payload!(i8, Byte);
from_payload!(i16, Short);
from_payload!(i32, Int);
from_payload!(i64, Long);
from_payload!(f32, Float);
from_payload!(f64, Double);
from_payload!(Bytes, ByteArray);
from_payload!(Vec<u8>, ByteArray);
from_payload!(String, String);
from_payload!(&str, String);
from_payload!(List, List);
from_payload!(VecMap<String, Node>, Map);
from_payload!(Vec<i32>, IntArray);
from_payload!(Vec<i64>, LongArray);

impl From<bool> for Node {
    fn from(v: bool) -> Node {
        Node::Byte(v as i8)
    }
}

macro_rules! try_from_node {
    ($typ:ty, $variant:ident, $kind:ident) => {
        impl TryFrom<Node> for $typ {
            type Error = TypeMismatchError;

            fn try_from(node: Node) -> Result<$typ, TypeMismatchError> {
                match node {
                    Node::$variant(v) => Ok(v),
                    other => Err(TypeMismatchError {
                        expected: NodeKind::$kind,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

try_from_node!(i8, Byte, Byte);
try_from_node!(i16, Short, Short);
try_from_node!(i32, Int, Int);
try_from_node!(i64, Long, Long);
try_from_node!(f32, Float, Float);
try_from_node!(f64, Double, Double);
try_from_node!(Bytes, ByteArray, ByteArray);
try_from_node!(String, String, String);
try_from_node!(List, List, List);
try_from_node!(VecMap<String, Node>, Map, Map);
try_from_node!(Vec<i32>, IntArray, IntArray);
try_from_node!(Vec<i64>, LongArray, LongArray);

macro_rules! map_get {
    ($name:ident, $typ:ty, $conv:ident, $doc:expr) => {
        #[doc = $doc]
        pub fn $name(&self, key: &str) -> Option<$typ> {
            self.get(key)?.$conv()
        }
    };
}

macro_rules! map_put {
    ($name:ident, $typ:ty, $doc:expr) => {
        #[doc = $doc]
        pub fn $name(&mut self, key: &str, value: $typ) -> Option<Node> {
            self.insert(key.to_string(), Node::from(value))
        }
    };
}

/// Typed convenience accessors for map nodes.
///
/// The getters are lenient over scalars: `get_i32` on a key holding a
/// `Long` converts rather than refusing. Shape accessors (`get_str`,
/// `get_list`, ...) only match their exact variant.
impl VecMap<String, Node> {
    map_get!(get_bool, bool, as_bool, "The value at `key` as a boolean.");
    map_get!(get_i8, i8, as_i8, "The value at `key` as an `i8`.");
    map_get!(get_i16, i16, as_i16, "The value at `key` as an `i16`.");
    map_get!(get_i32, i32, as_i32, "The value at `key` as an `i32`.");
    map_get!(get_i64, i64, as_i64, "The value at `key` as an `i64`.");
    map_get!(get_f32, f32, as_f32, "The value at `key` as an `f32`.");
    map_get!(get_f64, f64, as_f64, "The value at `key` as an `f64`.");

    /// Borrows the string at `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Borrows the byte array at `key`.
    pub fn get_byte_array(&self, key: &str) -> Option<&Bytes> {
        self.get(key)?.as_byte_array()
    }

    /// Borrows the int array at `key`.
    pub fn get_int_array(&self, key: &str) -> Option<&[i32]> {
        self.get(key)?.as_int_array()
    }

    /// Borrows the long array at `key`.
    pub fn get_long_array(&self, key: &str) -> Option<&[i64]> {
        self.get(key)?.as_long_array()
    }

    /// Borrows the list at `key`.
    pub fn get_list(&self, key: &str) -> Option<&List> {
        self.get(key)?.as_list()
    }

    /// Borrows the nested map at `key`.
    pub fn get_map(&self, key: &str) -> Option<&VecMap<String, Node>> {
        self.get(key)?.as_map()
    }

    map_put!(put_bool, bool, "Inserts a boolean, returning the displaced node.");
    map_put!(put_i8, i8, "Inserts a byte node, returning the displaced node.");
    map_put!(put_i16, i16, "Inserts a short node, returning the displaced node.");
    map_put!(put_i32, i32, "Inserts an int node, returning the displaced node.");
    map_put!(put_i64, i64, "Inserts a long node, returning the displaced node.");
    map_put!(put_f32, f32, "Inserts a float node, returning the displaced node.");
    map_put!(put_f64, f64, "Inserts a double node, returning the displaced node.");
    map_put!(put_str, &str, "Inserts a string node, returning the displaced node.");
    map_put!(put_byte_array, Bytes, "Inserts a byte array node, returning the displaced node.");
    map_put!(put_int_array, Vec<i32>, "Inserts an int array node, returning the displaced node.");
    map_put!(put_long_array, Vec<i64>, "Inserts a long array node, returning the displaced node.");
    map_put!(put_list, List, "Inserts a list node, returning the displaced node.");
    map_put!(put_map, VecMap<String, Node>, "Inserts a nested map node, returning the displaced node.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_registry() {
        let nodes = [
            Node::Byte(0),
            Node::Short(0),
            Node::Int(0),
            Node::Long(0),
            Node::Float(0.0),
            Node::Double(0.0),
            Node::ByteArray(Bytes::new()),
            Node::from(""),
            Node::List(List::new()),
            Node::Map(VecMap::new()),
            Node::IntArray(Vec::new()),
            Node::LongArray(Vec::new()),
        ];
        for node in &nodes {
            assert_eq!(NodeKind::from_tag(node.tag()).unwrap(), node.kind());
        }
        assert_eq!(NodeKind::from_tag(0), Err(DecodeError::UnknownType(0)));
        assert_eq!(NodeKind::from_tag(13), Err(DecodeError::UnknownType(13)));
        assert_eq!(NodeKind::from_tag(255), Err(DecodeError::UnknownType(255)));
    }

    #[test]
    fn scalar_conversions_follow_numeric_semantics() {
        assert_eq!(Node::Byte(2).as_bool(), Some(true));
        assert_eq!(Node::Double(0.0).as_bool(), Some(false));
        assert_eq!(Node::Long(0x1_0000_0001).as_i32(), Some(1)); // wraps
        assert_eq!(Node::Float(-3.9).as_i32(), Some(-3)); // toward zero
        assert_eq!(Node::Double(1e300).as_i64(), Some(i64::max_value())); // saturates
        assert_eq!(Node::Double(f64::NAN).as_i64(), Some(0));
        assert_eq!(Node::Short(-5).as_f64(), Some(-5.0));
        assert_eq!(Node::from("x").as_i32(), None);
    }

    #[test]
    fn conversion_errors_name_kinds() {
        let err = i8::try_from(Node::Int(1)).unwrap_err();
        assert_eq!(err.expected, NodeKind::Byte);
        assert_eq!(err.found, NodeKind::Int);
        assert_eq!(String::try_from(Node::from("ok")).unwrap(), "ok");
    }

    #[test]
    fn map_conveniences() {
        let mut map = VecMap::new();
        map.put_i32("n", 7);
        map.put_str("s", "hi");
        map.put_bool("flag", true);

        assert_eq!(map.get_i32("n"), Some(7));
        // lenient widening
        assert_eq!(map.get_i64("n"), Some(7));
        assert_eq!(map.get_f64("n"), Some(7.0));
        assert_eq!(map.get_str("s"), Some("hi"));
        assert_eq!(map.get_bool("flag"), Some(true));
        // shape accessors are exact
        assert_eq!(map.get_str("n"), None);
        assert_eq!(map.get_i32("missing"), None);

        let old = map.put_i32("n", 8).unwrap();
        assert_eq!(old, Node::Int(7));
    }
}
