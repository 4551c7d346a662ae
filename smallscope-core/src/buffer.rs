//! Fixed-Size Circular Sample Buffer
//!
//! ## Overview
//!
//! Storage for the most recent `N` 8-bit conversions. The buffer is written
//! from the sample-ready interrupt and read from the main loop once a capture
//! has frozen, so it has to be shareable between the two without locks and
//! without `unsafe`.
//!
//! ## Design Rationale
//!
//! ### Why Atomic Slots?
//!
//! Each slot is an `AtomicU8` and the write cursor is an `AtomicUsize`. On
//! every target with native byte and word stores these compile to plain
//! `strb` / `str` instructions, so the hot path costs the same as a `[u8; N]`
//! while letting the buffer live in a `static` behind a shared reference.
//!
//! ### Single Writer
//!
//! Only the ingestion handler calls [`SampleBuffer::write`]. The cursor is
//! therefore advanced with a load/store pair instead of a read-modify-write,
//! which keeps the buffer usable on cores without compare-and-swap.
//!
//! ### Memory Layout
//!
//! ```text
//! SampleBuffer<8>:
//! ┌────┬────┬────┬────┬────┬────┬────┬────┐
//! │ 80 │ 20 │ 30 │ 40 │ 50 │ 60 │ 70 │ 80 │  ← slots (1 byte each)
//! └────┴────┴────┴────┴────┴────┴────┴────┘
//!         ↑
//!         cursor = 1 (next slot to overwrite, also the oldest sample)
//! ```
//!
//! Total size = N + size_of::<usize>() bytes.
//!
//! There is no "full" or "overflow" state. Once the ring has wrapped, the slot
//! under the cursor always holds the oldest sample and is the next one lost.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::ring::RingIndex;

/// Circular storage of the last `N` samples
///
/// ## Internal Invariants
///
/// - `cursor < N` at every observable point
/// - a write stores exactly one slot and advances the cursor by exactly one
pub struct SampleBuffer<const N: usize> {
    slots: [AtomicU8; N],
    cursor: AtomicUsize,
}

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: AtomicU8 = AtomicU8::new(0);

impl<const N: usize> SampleBuffer<N> {
    const NON_EMPTY: () = assert!(N > 0, "sample buffer capacity must be non-zero");

    /// Create a zeroed buffer with the cursor at slot 0
    ///
    /// Usable in static context:
    /// ```rust
    /// use smallscope_core::buffer::SampleBuffer;
    /// static SAMPLES: SampleBuffer<256> = SampleBuffer::new();
    /// ```
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::NON_EMPTY;
        Self {
            slots: [EMPTY_SLOT; N],
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Index of the next slot to be overwritten
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Store `sample` under the cursor and advance it
    ///
    /// Returns the new cursor. Must only be called by the single producer.
    #[inline]
    pub fn write(&self, sample: u8) -> usize {
        let at = self.cursor.load(Ordering::Relaxed);
        self.slots[at].store(sample, Ordering::Relaxed);

        let next = RingIndex::<N>::next(at);
        self.cursor.store(next, Ordering::Release);
        next
    }

    /// Sample at an absolute slot index
    pub fn read(&self, index: usize) -> Option<u8> {
        self.slots
            .get(index)
            .map(|slot| slot.load(Ordering::Relaxed))
    }

    /// Iterate over all `N` slots starting at `start` and wrapping around
    ///
    /// Passing the cursor yields the buffer oldest-to-newest.
    pub fn chronological(&self, start: usize) -> Chronological<'_, N> {
        Chronological {
            buffer: self,
            start: start % N,
            emitted: 0,
        }
    }

    /// Copy the ring into `out` in chronological order starting at `start`
    pub fn copy_chronological(&self, start: usize, out: &mut [u8; N]) {
        for (dst, sample) in out.iter_mut().zip(self.chronological(start)) {
            *dst = sample;
        }
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for SampleBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("capacity", &N)
            .field("cursor", &self.cursor())
            .finish()
    }
}

/// Iterator over the ring in write order
pub struct Chronological<'a, const N: usize> {
    buffer: &'a SampleBuffer<N>,
    start: usize,
    emitted: usize,
}

impl<'a, const N: usize> Iterator for Chronological<'a, N> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= N {
            return None;
        }

        let index = RingIndex::<N>::offset(self.start, self.emitted);
        self.emitted += 1;
        self.buffer.read(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = N - self.emitted;
        (remaining, Some(remaining))
    }
}

impl<'a, const N: usize> ExactSizeIterator for Chronological<'a, N> {}
