//! Peripheral Boot Defaults

/// Default comparator threshold as an 8-bit PWM duty (0..=255).
///
/// Mid-scale, which puts the reference at about half the supply after the
/// RC filter on the threshold pin.
pub const DEFAULT_THRESHOLD: u8 = 127;
