//! Frozen Capture Readout
//!
//! A [`CaptureSnapshot`] is a by-value copy of the ring taken once the engine
//! froze, reordered oldest-to-newest. Copying decouples the reader from the
//! engine: the caller can re-arm immediately and still stream the previous
//! capture out over a slow link.
//!
//! ```text
//! physical ring (cursor = stop = 0, trigger = 5):
//!   [10, 20, 30, 40, 50, 60, 70, 80]
//!
//! snapshot (starts at cursor):
//!   [10, 20, 30, 40, 50 | 60, 70, 80]
//!    ─────── pre ──────   ── post ──
//!                         ↑ trigger_index = 5
//! ```

/// Chronological copy of a frozen capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSnapshot<const N: usize> {
    samples: [u8; N],
    trigger_index: usize,
    trigger_position: usize,
}

impl<const N: usize> CaptureSnapshot<N> {
    pub(crate) const fn new(samples: [u8; N], trigger_index: usize, trigger_position: usize) -> Self {
        Self {
            samples,
            trigger_index,
            trigger_position,
        }
    }

    /// All samples, oldest first
    pub fn samples(&self) -> &[u8; N] {
        &self.samples
    }

    /// Position of the first post-trigger sample within [`Self::samples`]
    pub fn trigger_index(&self) -> usize {
        self.trigger_index
    }

    /// Absolute ring slot the trigger was recorded at
    pub fn trigger_position(&self) -> usize {
        self.trigger_position
    }

    /// Samples written before the trigger
    pub fn pre_trigger(&self) -> &[u8] {
        &self.samples[..self.trigger_index]
    }

    /// Samples written at and after the trigger
    pub fn post_trigger(&self) -> &[u8] {
        &self.samples[self.trigger_index..]
    }

    /// Sample recorded in the trigger slot
    pub fn trigger_sample(&self) -> u8 {
        self.samples[self.trigger_index]
    }

    /// Samples paired with their offset from the trigger
    ///
    /// Pre-trigger samples get negative offsets, the trigger slot is 0.
    pub fn relative(&self) -> impl Iterator<Item = (isize, u8)> + '_ {
        let origin = self.trigger_index as isize;
        self.samples
            .iter()
            .enumerate()
            .map(move |(i, &sample)| (i as isize - origin, sample))
    }

    /// Consume into the raw chronological array
    pub fn into_samples(self) -> [u8; N] {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CaptureSnapshot<8> {
        CaptureSnapshot::new([10, 20, 30, 40, 50, 60, 70, 80], 5, 5)
    }

    #[test]
    fn split_at_trigger() {
        let snap = snapshot();
        assert_eq!(snap.pre_trigger(), &[10, 20, 30, 40, 50]);
        assert_eq!(snap.post_trigger(), &[60, 70, 80]);
        assert_eq!(snap.trigger_sample(), 60);
    }

    #[test]
    fn relative_offsets() {
        let offsets: Vec<(isize, u8)> = snapshot().relative().collect();
        assert_eq!(offsets.first(), Some(&(-5, 10)));
        assert_eq!(offsets[5], (0, 60));
        assert_eq!(offsets.last(), Some(&(2, 80)));
    }

    #[test]
    fn trigger_at_oldest_slot() {
        let snap = CaptureSnapshot::new([1, 2, 3, 4], 0, 2);
        assert!(snap.pre_trigger().is_empty());
        assert_eq!(snap.post_trigger().len(), 4);
        assert_eq!(snap.trigger_position(), 2);
        assert_eq!(snap.into_samples(), [1, 2, 3, 4]);
    }
}
