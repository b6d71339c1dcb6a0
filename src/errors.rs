use crate::NodeKind;
use failure::Fail;

/// An error encountered while decoding a tagged tree from bytes.
///
/// Decoding never recovers internally: the first error aborts the whole
/// decode and propagates to the caller unwrapped, discarding any partially
/// built containers. All variants are plain values that are cheap to
/// construct, so rejecting hostile input carries no allocation cost.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Fail)]
pub enum DecodeError {
    /// A length field that is structurally required to be non-negative
    /// was negative.
    #[fail(display = "negative length: {}", _0)]
    NegativeLength(i64),

    /// The limiter byte counter would wrap past `u64::MAX`.
    ///
    /// The counter is left unchanged when this is reported.
    #[fail(display = "byte counter overflow")]
    LengthOverflow,

    /// The limiter byte budget was exhausted.
    #[fail(display = "max length reached ({} > {})", length, max_length)]
    MaxLengthExceeded {
        /// Bytes that would have been read.
        length: u64,
        /// The configured budget.
        max_length: u64,
    },

    /// The limiter nesting budget was exhausted.
    #[fail(display = "max depth reached ({} > {})", depth, max_depth)]
    MaxDepthExceeded {
        /// Depth that would have been entered.
        depth: u32,
        /// The configured budget.
        max_depth: u32,
    },

    /// More container exits than entries. Indicates a decoder bug rather
    /// than bad input.
    #[fail(display = "depth underflow")]
    DepthUnderflow,

    /// A wire tag outside the registered set, or a feature-gated tag the
    /// limiter policy rejects.
    #[fail(display = "unknown node type: {}", _0)]
    UnknownType(u8),

    /// The byte source ran out before the structure was complete.
    #[fail(display = "unexpected end of input: wanted {} bytes, had {}", wanted, had)]
    UnexpectedEof {
        /// Bytes the decoder needed next.
        wanted: usize,
        /// Bytes left in the source.
        had: usize,
    },

    /// A string payload was not valid modified UTF-8, or had leftover
    /// bytes that decoded to nothing.
    #[fail(display = "malformed modified UTF-8 at byte {}", _0)]
    InvalidString(usize),

    /// A non-empty name under the strict-empty-names policy.
    #[fail(display = "non-empty name of {} bytes under strict policy", _0)]
    NonEmptyName(usize),

    /// A list header with an impossible element count: negative, or
    /// non-zero while the element tag is the end tag.
    #[fail(display = "invalid list length: {}", _0)]
    InvalidLength(i32),
}

impl DecodeError {
    /// Whether this error is a limiter budget violation.
    ///
    /// Covers byte-counter overflow, the byte budget, and both depth
    /// conditions, so callers can treat "input was too big" uniformly.
    ///
    /// # Example
    ///
    /// ```
    /// use bintag::DecodeError;
    ///
    /// let err = DecodeError::DepthUnderflow;
    /// assert!(err.is_limit());
    /// assert!(!DecodeError::UnknownType(13).is_limit());
    /// ```
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            DecodeError::LengthOverflow
                | DecodeError::MaxLengthExceeded { .. }
                | DecodeError::MaxDepthExceeded { .. }
                | DecodeError::DepthUnderflow
        )
    }
}

/// An error encountered while encoding a tagged tree to bytes.
///
/// The write path only fails on trees that cannot be represented on the
/// wire at all; the byte sink itself is infallible.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Fail)]
pub enum EncodeError {
    /// A string whose modified UTF-8 form does not fit the `u16` length
    /// prefix.
    #[fail(display = "string of {} encoded bytes exceeds the u16 prefix", _0)]
    StringTooLong(usize),

    /// An array or list with more elements than the `i32` count field
    /// can carry.
    #[fail(display = "collection of {} elements exceeds the i32 count", _0)]
    CollectionTooLong(usize),
}

/// An attempt to mix node kinds inside a homogeneous list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Fail)]
#[fail(display = "cannot insert {:?} into a list of {:?}", found, expected)]
pub struct TypeMismatchError {
    /// The kind the list is locked to.
    pub expected: NodeKind,
    /// The kind of the rejected node.
    pub found: NodeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_family() {
        assert!(DecodeError::LengthOverflow.is_limit());
        assert!(DecodeError::MaxLengthExceeded {
            length: 3,
            max_length: 2
        }
        .is_limit());
        assert!(DecodeError::MaxDepthExceeded {
            depth: 513,
            max_depth: 512
        }
        .is_limit());
        assert!(DecodeError::DepthUnderflow.is_limit());

        assert!(!DecodeError::NegativeLength(-1).is_limit());
        assert!(!DecodeError::UnexpectedEof { wanted: 4, had: 0 }.is_limit());
        assert!(!DecodeError::InvalidString(0).is_limit());
    }
}
