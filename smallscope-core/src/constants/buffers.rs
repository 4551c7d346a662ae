//! Buffer Sizes and Capture Window Defaults
//!
//! The ring lives in SRAM next to the stack, so capacities are chosen for the
//! 2KB parts first and scaled up from there.

// ===== RING CAPACITIES =====

/// Default sample ring capacity.
///
/// One byte per sample:
/// - 256 samples = 256 bytes, an eighth of a 2KB ATmega328P
/// - power of two so `% N` lowers to a mask
/// - leaves room for the serial receive buffer and the stack
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Large ring for parts with 8KB or more of SRAM.
pub const LARGE_BUFFER_CAPACITY: usize = 1024;

// ===== CAPTURE WINDOW =====

/// Default number of samples kept after the trigger.
///
/// Three quarters of the default ring, so the frozen window shows a quarter
/// of history before the edge and the response after it.
pub const DEFAULT_POST_TRIGGER_SAMPLES: usize = DEFAULT_BUFFER_CAPACITY * 3 / 4;

/// Default accumulation before a trigger is honoured.
///
/// Exactly the part of the ring that sits before the trigger in the frozen
/// window, so a capture never shows stale samples from a previous cycle.
pub const DEFAULT_PRE_TRIGGER_MINIMUM: usize =
    DEFAULT_BUFFER_CAPACITY - DEFAULT_POST_TRIGGER_SAMPLES;

// ===== STATUS =====

/// Capacity of the rendered status block (bytes).
///
/// Eight `Label: value` lines; the worst case with 64-bit counters is just
/// under 280 bytes.
pub const STATUS_TEXT_CAPACITY: usize = 320;
