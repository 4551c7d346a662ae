//! Constants for smallscope Core
//!
//! Centralized numeric values for the capture engine. Every constant states
//! its unit in the name and where the value comes from.
//!
//! ## Organization
//!
//! - **Buffers**: ring capacities and capture window defaults
//! - **Sampling**: converter timing used to turn a prescaler into a rate
//! - **Peripheral**: boot-time peripheral defaults

/// Ring capacities and default capture window sizes.
pub mod buffers;

/// Converter clock and conversion timing.
pub mod sampling;

/// Boot defaults for the comparator and converter.
pub mod peripheral;

pub use buffers::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_POST_TRIGGER_SAMPLES, DEFAULT_PRE_TRIGGER_MINIMUM,
    LARGE_BUFFER_CAPACITY, STATUS_TEXT_CAPACITY,
};

pub use sampling::{ADC_CYCLES_PER_CONVERSION, DEFAULT_CPU_CLOCK_HZ};

pub use peripheral::DEFAULT_THRESHOLD;
