//! Byte and depth budgeting for a single decode pass.
//!
//! Every recursive read charges a [`Limiter`] *before* allocating memory or
//! recursing, so a hostile stream claiming a huge array length or absurd
//! nesting is rejected before any resources are committed.
//!
//! # Example
//!
//! ```
//! use bintag::Limiter;
//!
//! let mut limiter = Limiter::new(16, 4);
//! limiter.read_unsigned(10).unwrap();
//! assert_eq!(limiter.length(), 10);
//!
//! // the 7 bytes that would blow the budget are refused
//! assert!(limiter.read_unsigned(7).is_err());
//! ```

use crate::errors::DecodeError;

/// Byte budget of the reference protocol: 2 MiB.
pub const PROTOCOL_MAX_LENGTH: u64 = 0x20_0000;

/// Depth budget of the reference protocol.
pub const PROTOCOL_MAX_DEPTH: u32 = 512;

/// Tracks cumulative bytes read and current nesting depth during one decode
/// pass, refusing to continue once the configured maxima are exceeded.
///
/// A limiter is mutable single-owner state for exactly one decode call tree.
/// Reuse across decodes requires [`reset`](Limiter::reset) in between;
/// concurrent use is forbidden by contract (`&mut` makes it unrepresentable
/// anyway).
#[derive(Clone, Debug)]
pub struct Limiter {
    max_length: u64,
    max_depth: u32,
    length: u64,
    depth: u32,
    strict_empty_names: bool,
    long_arrays: bool,
    unlimited: bool,
}

impl Limiter {
    /// Creates a limiter with the given byte and depth budgets.
    ///
    /// Policy defaults: names are not required to be empty, long arrays
    /// are allowed.
    pub fn new(max_length: u64, max_depth: u32) -> Self {
        Limiter {
            max_length,
            max_depth,
            length: 0,
            depth: 0,
            strict_empty_names: false,
            long_arrays: true,
            unlimited: false,
        }
    }

    /// Creates a limiter without limits.
    ///
    /// Budgets read as the largest representable values and every mutating
    /// operation is a no-op. Only for input you already trust.
    pub fn unlimited() -> Self {
        Limiter {
            max_length: u64::max_value(),
            max_depth: u32::max_value(),
            length: 0,
            depth: 0,
            strict_empty_names: false,
            long_arrays: true,
            unlimited: true,
        }
    }

    /// Creates a limiter matching the reference protocol:
    /// [`PROTOCOL_MAX_LENGTH`] bytes, [`PROTOCOL_MAX_DEPTH`] nesting.
    ///
    /// # Example
    ///
    /// ```
    /// use bintag::Limiter;
    ///
    /// let limiter = Limiter::protocol();
    /// assert_eq!(limiter.max_length(), 2_097_152);
    /// assert_eq!(limiter.max_depth(), 512);
    /// ```
    pub fn protocol() -> Self {
        Limiter::new(PROTOCOL_MAX_LENGTH, PROTOCOL_MAX_DEPTH)
    }

    /// Sets whether unnamed reads must carry a literal empty name.
    pub fn strict_empty_names(mut self, strict: bool) -> Self {
        self.strict_empty_names = strict;
        self
    }

    /// Sets whether the `LongArray` node kind is accepted.
    ///
    /// Protocol versions predating that kind must reject it exactly as
    /// they reject any unknown tag.
    pub fn long_arrays(mut self, allowed: bool) -> Self {
        self.long_arrays = allowed;
        self
    }

    /// Charges `bytes` against the byte budget, first failing with
    /// [`DecodeError::NegativeLength`] if `bytes` is negative.
    pub fn read_signed(&mut self, bytes: i64) -> Result<(), DecodeError> {
        if bytes < 0 {
            return Err(DecodeError::NegativeLength(bytes));
        }
        self.read_unsigned(bytes as u64)
    }

    /// Charges `bytes` against the byte budget.
    ///
    /// The addition is overflow-checked; on overflow the counter is left
    /// unchanged. Exceeding the budget fails with
    /// [`DecodeError::MaxLengthExceeded`] after the counter is updated, so
    /// [`length`](Limiter::length) reports what the stream claimed.
    pub fn read_unsigned(&mut self, bytes: u64) -> Result<(), DecodeError> {
        if self.unlimited {
            return Ok(());
        }
        let length = self
            .length
            .checked_add(bytes)
            .ok_or(DecodeError::LengthOverflow)?;
        self.length = length;
        if length > self.max_length {
            return Err(DecodeError::MaxLengthExceeded {
                length,
                max_length: self.max_length,
            });
        }
        Ok(())
    }

    /// Enters one level of container nesting.
    pub fn push(&mut self) -> Result<(), DecodeError> {
        if self.unlimited {
            return Ok(());
        }
        if self.depth >= self.max_depth {
            return Err(DecodeError::MaxDepthExceeded {
                depth: self.depth + 1,
                max_depth: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of container nesting.
    pub fn pop(&mut self) -> Result<(), DecodeError> {
        if self.unlimited {
            return Ok(());
        }
        if self.depth == 0 {
            return Err(DecodeError::DepthUnderflow);
        }
        self.depth -= 1;
        Ok(())
    }

    /// Zeroes the running counters so the instance can budget another
    /// decode. Budgets and policy flags are untouched.
    pub fn reset(&mut self) {
        self.length = 0;
        self.depth = 0;
    }

    /// Bytes charged so far.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Current nesting depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The byte budget.
    pub fn max_length(&self) -> u64 {
        self.max_length
    }

    /// The depth budget.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Whether unnamed reads must carry a literal empty name.
    pub fn is_strict_empty_names(&self) -> bool {
        self.strict_empty_names
    }

    /// Whether the `LongArray` node kind is accepted.
    pub fn allows_long_arrays(&self) -> bool {
        self.long_arrays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_monotonic() {
        let mut limiter = Limiter::new(100, 1);
        limiter.read_unsigned(1).unwrap();
        limiter.read_unsigned(9).unwrap();
        limiter.read_unsigned(40).unwrap();
        assert_eq!(limiter.length(), 50);
    }

    #[test]
    fn length_budget_trips() {
        let mut limiter = Limiter::new(8, 1);
        limiter.read_unsigned(8).unwrap();
        assert_eq!(
            limiter.read_unsigned(1),
            Err(DecodeError::MaxLengthExceeded {
                length: 9,
                max_length: 8
            })
        );
    }

    #[test]
    fn negative_charge_is_rejected() {
        let mut limiter = Limiter::new(8, 1);
        assert_eq!(
            limiter.read_signed(-4),
            Err(DecodeError::NegativeLength(-4))
        );
        // nothing was charged
        assert_eq!(limiter.length(), 0);
        limiter.read_signed(4).unwrap();
        assert_eq!(limiter.length(), 4);
    }

    #[test]
    fn counter_overflow_leaves_state() {
        let mut limiter = Limiter::new(u64::max_value(), 1);
        limiter.read_unsigned(u64::max_value() - 1).unwrap();
        assert_eq!(
            limiter.read_unsigned(2),
            Err(DecodeError::LengthOverflow)
        );
        assert_eq!(limiter.length(), u64::max_value() - 1);
    }

    #[test]
    fn depth_push_pop() {
        let mut limiter = Limiter::new(8, 2);
        limiter.push().unwrap();
        limiter.push().unwrap();
        assert_eq!(
            limiter.push(),
            Err(DecodeError::MaxDepthExceeded {
                depth: 3,
                max_depth: 2
            })
        );
        limiter.pop().unwrap();
        limiter.pop().unwrap();
        assert_eq!(limiter.pop(), Err(DecodeError::DepthUnderflow));
    }

    #[test]
    fn reset_allows_reuse() {
        let mut limiter = Limiter::new(4, 1);
        limiter.read_unsigned(4).unwrap();
        limiter.push().unwrap();
        limiter.reset();
        assert_eq!(limiter.length(), 0);
        assert_eq!(limiter.depth(), 0);
        limiter.read_unsigned(4).unwrap();
    }

    #[test]
    fn unlimited_is_noop() {
        let mut limiter = Limiter::unlimited();
        limiter.read_unsigned(u64::max_value()).unwrap();
        limiter.read_unsigned(u64::max_value()).unwrap();
        limiter.read_signed(i64::max_value()).unwrap();
        limiter.pop().unwrap();
        for _ in 0..10_000 {
            limiter.push().unwrap();
        }
        assert_eq!(limiter.length(), 0);
        assert_eq!(limiter.depth(), 0);
        assert_eq!(limiter.max_length(), u64::max_value());
        assert_eq!(limiter.max_depth(), u32::max_value());
    }

    #[test]
    fn protocol_preset() {
        let limiter = Limiter::protocol();
        assert_eq!(limiter.max_length(), 0x20_0000);
        assert_eq!(limiter.max_depth(), 512);
        assert!(!limiter.is_strict_empty_names());
        assert!(limiter.allows_long_arrays());
    }

    #[test]
    fn policy_builders() {
        let limiter = Limiter::protocol()
            .strict_empty_names(true)
            .long_arrays(false);
        assert!(limiter.is_strict_empty_names());
        assert!(!limiter.allows_long_arrays());
    }
}
