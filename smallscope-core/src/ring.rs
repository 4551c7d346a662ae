//! Modular Index Arithmetic for the Sample Ring
//!
//! Every cursor computation in the crate goes through [`RingIndex`]. The
//! ingestion handler advances the write cursor with it, the trigger handler
//! derives the stop position with it, and the readout uses it to translate
//! chronological positions back into physical slots.
//!
//! ```text
//! N = 8, trigger = 5, post = 3
//!
//!   0   1   2   3   4   5   6   7
//! ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! │   │   │   │   │   │ T │   │   │
//! └───┴───┴───┴───┴───┴───┴───┴───┘
//!   ↑                   ↑
//!   stop = (5 + 3) % 8  trigger
//! ```
//!
//! The stop position may be numerically smaller than the trigger position.
//! Callers must only ever compare indices for equality; ordering between two
//! ring indices is meaningless without a reference point, which is what
//! [`RingIndex::distance`] is for.

/// Arithmetic on indices into a ring of capacity `N`
///
/// Zero-sized; all operations are associated functions so the capacity is
/// a compile-time constant and `% N` lowers to a mask when `N` is a power of 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingIndex<const N: usize>;

impl<const N: usize> RingIndex<N> {
    /// Ring capacity
    pub const CAPACITY: usize = N;

    /// Index following `index`
    #[inline(always)]
    pub const fn next(index: usize) -> usize {
        let next = index + 1;
        if next == N {
            0
        } else {
            next
        }
    }

    /// Index `steps` positions after `index`
    ///
    /// `index` must already be a valid ring index; `steps` may be any value.
    #[inline]
    pub const fn offset(index: usize, steps: usize) -> usize {
        (index + steps % N) % N
    }

    /// Number of forward steps needed to go from `from` to `to`
    ///
    /// Always in `[0, N)`.
    #[inline]
    pub const fn distance(from: usize, to: usize) -> usize {
        if to >= from {
            to - from
        } else {
            N - from + to
        }
    }

    /// Check that `index` addresses a slot
    #[inline]
    pub const fn contains(index: usize) -> bool {
        index < N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type R8 = RingIndex<8>;

    #[test]
    fn next_wraps_at_capacity() {
        assert_eq!(R8::next(0), 1);
        assert_eq!(R8::next(6), 7);
        assert_eq!(R8::next(7), 0);
    }

    #[test]
    fn offset_wraps_past_end() {
        assert_eq!(R8::offset(5, 3), 0);
        assert_eq!(R8::offset(5, 2), 7);
        assert_eq!(R8::offset(0, 0), 0);
        assert_eq!(R8::offset(7, 17), 0);
    }

    #[test]
    fn distance_is_forward_only() {
        assert_eq!(R8::distance(5, 0), 3);
        assert_eq!(R8::distance(0, 5), 5);
        assert_eq!(R8::distance(3, 3), 0);
        assert_eq!(R8::distance(7, 6), 7);
    }

    #[test]
    fn distance_undoes_offset() {
        for start in 0..8 {
            for steps in 0..8 {
                let end = R8::offset(start, steps);
                assert_eq!(R8::distance(start, end), steps);
            }
        }
    }

    #[test]
    fn non_power_of_two_capacity() {
        type R5 = RingIndex<5>;
        assert_eq!(R5::offset(4, 1), 0);
        assert_eq!(R5::offset(3, 4), 2);
        assert_eq!(R5::distance(3, 2), 4);
        assert!(R5::contains(4));
        assert!(!R5::contains(5));
    }
}
