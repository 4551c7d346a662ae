//! Capture engine for a small microcontroller oscilloscope
//!
//! Samples a signal into a fixed ring, waits for a comparator edge and keeps
//! a configurable number of samples either side of it. Both interrupt
//! handlers are lock-free and run in constant time.
//!
//! Key constraints:
//! - Single core, two interrupt sources sharing one context
//! - No heap allocation anywhere
//! - Trigger interrupt outranks the sample interrupt
//!
//! ```no_run
//! use smallscope_core::{CaptureEngine, SampleOutcome};
//! use smallscope_core::sim::SimPeripherals;
//!
//! static ENGINE: CaptureEngine<256> = CaptureEngine::new();
//! static PERIPHERALS: SimPeripherals = SimPeripherals::new();
//!
//! ENGINE.rearm(&PERIPHERALS);
//!
//! // from the conversion-complete interrupt
//! if let SampleOutcome::Frozen { .. } = ENGINE.on_sample_ready(128, &PERIPHERALS) {
//!     let _capture = ENGINE.snapshot().unwrap();
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod capture;
pub mod config;
pub mod constants;
pub mod errors;
pub mod readout;
pub mod ring;
pub mod scope;
pub mod sim;
pub mod status;
pub mod traits;

// Public API
pub use buffer::SampleBuffer;
pub use capture::{
    CaptureEngine, CaptureState, CaptureStats, SampleOutcome, TriggerOutcome, TriggerRecord,
};
pub use config::{CaptureConfig, Prescaler, ScopeSettings, TriggerEdge, VoltageReference};
pub use errors::{CaptureError, CaptureResult, ConfigError, ConfigResult};
pub use readout::CaptureSnapshot;
pub use ring::RingIndex;
pub use scope::Scope;
pub use status::StatusReport;
pub use traits::{
    ErrorIndicator, NoIndicator, PeripheralConfig, Peripherals, SamplingControl, TriggerControl,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
