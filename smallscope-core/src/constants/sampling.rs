//! Converter Timing
//!
//! Values for the successive-approximation converter found on AVR-class
//! microcontrollers.

/// Default system clock (Hz).
///
/// 16 MHz crystal on the common 5V boards.
pub const DEFAULT_CPU_CLOCK_HZ: u32 = 16_000_000;

/// Converter clock cycles per conversion in free-running mode.
///
/// The first conversion after enabling takes 25 cycles; every following one
/// takes 13. The steady-state figure is what bounds the handler budget.
pub const ADC_CYCLES_PER_CONVERSION: u32 = 13;
