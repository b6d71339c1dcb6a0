//! A convenience re-export of the types and functions most callers need.

pub use crate::{
    encoding::{
        decode_full, encode_full, read_named, read_plain, read_unnamed, write_named,
        write_plain, write_unnamed,
    },
    errors::{DecodeError, EncodeError, TypeMismatchError},
    limiter::{Limiter, PROTOCOL_MAX_DEPTH, PROTOCOL_MAX_LENGTH},
    list::List,
    vecmap::VecMap,
    Node, NodeKind,
};
pub use bytes::{Buf, Bytes};
