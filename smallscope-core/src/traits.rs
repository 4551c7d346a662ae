//! Peripheral Collaborator Traits
//!
//! The capture engine never touches registers. It asks a collaborator to
//! start or stop the converter and to enable or disable the comparator
//! interrupt; everything else about the hardware is configured from the main
//! loop through [`PeripheralConfig`].
//!
//! ## Why `&self` for Control?
//!
//! [`SamplingControl`] and [`TriggerControl`] are called from inside both
//! interrupt handlers as well as from the main loop. Taking `&self` lets one
//! collaborator be shared by all three contexts; implementations write a
//! single control bit, which is idempotent and safe to repeat.
//!
//! ```rust
//! use core::sync::atomic::{AtomicBool, Ordering};
//! use smallscope_core::traits::SamplingControl;
//!
//! struct Converter {
//!     enabled: AtomicBool,
//! }
//!
//! impl SamplingControl for Converter {
//!     fn start_sampling(&self) {
//!         // set ADEN and ADSC
//!         self.enabled.store(true, Ordering::Release);
//!     }
//!
//!     fn stop_sampling(&self) {
//!         // clear ADEN, terminates free-running mode
//!         self.enabled.store(false, Ordering::Release);
//!     }
//! }
//! ```

use crate::config::{Prescaler, TriggerEdge, VoltageReference};

/// Periodic conversion control
pub trait SamplingControl {
    /// Enable the converter and start free-running conversions
    fn start_sampling(&self);

    /// Disable the converter; no further sample-ready interrupts fire
    ///
    /// Idempotent, callable from any context.
    fn stop_sampling(&self);
}

/// Comparator interrupt control
pub trait TriggerControl {
    /// Enable the comparator interrupt
    fn enable_trigger(&self);

    /// Disable the comparator interrupt
    ///
    /// Idempotent, callable from any context.
    fn disable_trigger(&self);
}

/// Main-loop peripheral configuration
///
/// Called only while sampling is stopped.
pub trait PeripheralConfig {
    /// Select the converter clock division
    fn set_prescaler(&mut self, prescaler: Prescaler);

    /// Select the comparator edge that raises the trigger interrupt
    fn set_trigger_edge(&mut self, edge: TriggerEdge);

    /// Select the converter voltage reference
    fn set_voltage_reference(&mut self, reference: VoltageReference);

    /// Set the comparator threshold duty
    fn set_threshold(&mut self, threshold: u8);
}

/// Full peripheral collaborator
pub trait Peripherals: SamplingControl + TriggerControl + PeripheralConfig {}

impl<T: SamplingControl + TriggerControl + PeripheralConfig> Peripherals for T {}

/// Visible fault indicator (an LED on the reference board)
pub trait ErrorIndicator {
    /// Pulse the indicator once
    fn signal(&mut self);
}

/// Indicator that does nothing, for boards without a fault LED
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl ErrorIndicator for NoIndicator {
    fn signal(&mut self) {}
}
