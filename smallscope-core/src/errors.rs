//! Error Types for Settings and Readout
//!
//! ## Design Philosophy
//!
//! The interrupt handlers have no error path at all. A missed stop comparison
//! delays the freeze by one lap, an early trigger is suppressed, and a trigger
//! that never comes leaves the engine armed. None of that is a failure.
//!
//! Errors only exist at the main-loop boundary:
//!
//! - [`ConfigError`]: settings rejected before they reach the peripherals
//! - [`CaptureError`]: readout requested in a state where the buffer is not
//!   stable, or at an index that does not exist
//!
//! Both are `Copy`, carry no heap data and fit in a few words so they can be
//! returned from the main loop on the smallest targets.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use smallscope_core::{ConfigError, ScopeSettings};
//!
//! let mut settings = ScopeSettings::default();
//! settings.capture.post_trigger_samples = 300;
//!
//! match settings.validate::<256>() {
//!     Ok(()) => { /* apply */ }
//!     Err(ConfigError::PostTriggerTooLarge { capacity, .. }) => {
//!         // clamp to capacity - 1 and retry
//!         let _ = capacity;
//!     }
//!     Err(_) => { /* reject */ }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for capture readout
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Rejected settings
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Post-trigger window does not fit in the ring
    #[error("Post-trigger count {requested} must be below buffer capacity {capacity}")]
    PostTriggerTooLarge {
        /// Requested number of samples after the trigger
        requested: usize,
        /// Ring capacity
        capacity: usize,
    },

    /// Pre-trigger minimum exceeds what the ring can hold
    #[error("Pre-trigger minimum {requested} exceeds buffer capacity {capacity}")]
    PreTriggerTooLarge {
        /// Requested accumulation before triggers are honoured
        requested: usize,
        /// Ring capacity
        capacity: usize,
    },

    /// Division factor not supported by the converter clock
    #[error("Invalid prescaler {0}, expected one of 2, 4, 8, 16, 32, 64, 128")]
    InvalidPrescaler(u8),

    /// Unknown comparator edge code
    #[error("Invalid trigger edge code {0}, expected 0 (toggle), 2 (falling) or 3 (rising)")]
    InvalidTriggerEdge(u8),

    /// Unknown voltage reference code
    #[error("Invalid voltage reference code {0}, expected 0 (AREF), 1 (AVCC) or 3 (internal)")]
    InvalidVoltageReference(u8),
}

/// Readout failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The buffer is still being written
    #[error("Capture not frozen, buffer contents are in flux")]
    NotFrozen,

    /// Slot index beyond the ring
    #[error("Index {index} out of range for capacity {capacity}")]
    IndexOutOfRange {
        /// Requested slot
        index: usize,
        /// Ring capacity
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::PostTriggerTooLarge { requested, capacity } =>
                defmt::write!(fmt, "Post-trigger {} >= capacity {}", requested, capacity),
            Self::PreTriggerTooLarge { requested, capacity } =>
                defmt::write!(fmt, "Pre-trigger {} > capacity {}", requested, capacity),
            Self::InvalidPrescaler(value) =>
                defmt::write!(fmt, "Invalid prescaler {}", value),
            Self::InvalidTriggerEdge(value) =>
                defmt::write!(fmt, "Invalid trigger edge {}", value),
            Self::InvalidVoltageReference(value) =>
                defmt::write!(fmt, "Invalid voltage reference {}", value),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CaptureError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotFrozen => defmt::write!(fmt, "Capture not frozen"),
            Self::IndexOutOfRange { index, capacity } =>
                defmt::write!(fmt, "Index {} out of range ({})", index, capacity),
        }
    }
}
