//! Simulated Peripherals and Signals
//!
//! Lets the capture engine run on a host without a converter or comparator:
//!
//! - [`SimPeripherals`]: records what the engine asked the hardware to do
//! - [`SimIndicator`]: counts fault indicator pulses
//! - [`Comparator`]: turns a sample stream into trigger edges the way the
//!   analog comparator does against its threshold
//! - [`Waveform`]: deterministic test signals
//! - [`drive`]: feeds a signal through comparator and engine in interrupt
//!   priority order
//!
//! ```rust
//! use smallscope_core::CaptureEngine;
//! use smallscope_core::config::TriggerEdge;
//! use smallscope_core::sim::{drive, Comparator, SimPeripherals, Waveform};
//!
//! let engine = CaptureEngine::<64>::new();
//! let peripherals = SimPeripherals::new();
//! let mut comparator = Comparator::new(127, TriggerEdge::Rising);
//!
//! engine.rearm(&peripherals);
//! let square = Waveform::Square { period: 40, low: 20, high: 220 };
//! let report = drive(&engine, &peripherals, &mut comparator, square.samples().take(1000));
//!
//! assert!(report.frozen_after.is_some());
//! assert!(engine.is_frozen());
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::capture::{CaptureEngine, SampleOutcome, TriggerOutcome};
use crate::config::{Prescaler, TriggerEdge, VoltageReference};
use crate::constants::DEFAULT_THRESHOLD;
use crate::traits::{ErrorIndicator, PeripheralConfig, SamplingControl, TriggerControl};

/// In-memory stand-in for converter and comparator
///
/// Control bits are atomics so one instance can be shared by the handlers
/// and the main loop, including from a `static`.
#[derive(Debug)]
pub struct SimPeripherals {
    sampling: AtomicBool,
    trigger: AtomicBool,
    sampling_starts: AtomicU32,
    /// Last prescaler written
    pub prescaler: Prescaler,
    /// Last comparator edge written
    pub trigger_edge: TriggerEdge,
    /// Last voltage reference written
    pub voltage_reference: VoltageReference,
    /// Last threshold written
    pub threshold: u8,
}

impl SimPeripherals {
    /// Everything disabled, boot defaults loaded
    pub const fn new() -> Self {
        Self {
            sampling: AtomicBool::new(false),
            trigger: AtomicBool::new(false),
            sampling_starts: AtomicU32::new(0),
            prescaler: Prescaler::Div128,
            trigger_edge: TriggerEdge::Rising,
            voltage_reference: VoltageReference::Avcc,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Converter running
    pub fn sampling_enabled(&self) -> bool {
        self.sampling.load(Ordering::Acquire)
    }

    /// Comparator interrupt enabled
    pub fn trigger_enabled(&self) -> bool {
        self.trigger.load(Ordering::Acquire)
    }

    /// How many times the converter was started
    pub fn sampling_starts(&self) -> u32 {
        self.sampling_starts.load(Ordering::Relaxed)
    }
}

impl Default for SimPeripherals {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingControl for SimPeripherals {
    fn start_sampling(&self) {
        let starts = self.sampling_starts.load(Ordering::Relaxed);
        self.sampling_starts.store(starts + 1, Ordering::Relaxed);
        self.sampling.store(true, Ordering::Release);
    }

    fn stop_sampling(&self) {
        self.sampling.store(false, Ordering::Release);
    }
}

impl TriggerControl for SimPeripherals {
    fn enable_trigger(&self) {
        self.trigger.store(true, Ordering::Release);
    }

    fn disable_trigger(&self) {
        self.trigger.store(false, Ordering::Release);
    }
}

impl PeripheralConfig for SimPeripherals {
    fn set_prescaler(&mut self, prescaler: Prescaler) {
        self.prescaler = prescaler;
    }

    fn set_trigger_edge(&mut self, edge: TriggerEdge) {
        self.trigger_edge = edge;
    }

    fn set_voltage_reference(&mut self, reference: VoltageReference) {
        self.voltage_reference = reference;
    }

    fn set_threshold(&mut self, threshold: u8) {
        self.threshold = threshold;
    }
}

/// Fault indicator that counts pulses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimIndicator {
    /// Pulses so far
    pub pulses: u32,
}

impl ErrorIndicator for SimIndicator {
    fn signal(&mut self) {
        self.pulses += 1;
    }
}

/// Analog comparator model
///
/// Output is high while the input is above the threshold. An edge is
/// reported when the output changes in the configured direction.
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    threshold: u8,
    edge: TriggerEdge,
    output: Option<bool>,
}

impl Comparator {
    /// Comparator with unknown initial output
    pub const fn new(threshold: u8, edge: TriggerEdge) -> Self {
        Self {
            threshold,
            edge,
            output: None,
        }
    }

    /// Feed one input value, returns true when an edge fires
    ///
    /// The very first value only establishes the output level.
    pub fn update(&mut self, input: u8) -> bool {
        let current = input > self.threshold;
        let fired = match self.output {
            Some(previous) => self.edge.matches(previous, current),
            None => false,
        };
        self.output = Some(current);
        fired
    }
}

/// Deterministic test signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    /// Constant level
    Dc(u8),
    /// Half period low, half period high, starting low
    Square {
        /// Samples per cycle
        period: usize,
        /// Low level
        low: u8,
        /// High level
        high: u8,
    },
    /// Linear ramp 0..=255 repeating
    Sawtooth {
        /// Samples per cycle
        period: usize,
    },
    /// Sine around `offset`
    Sine {
        /// Samples per cycle
        period: usize,
        /// Peak deviation from `offset`
        amplitude: f32,
        /// Mid level
        offset: f32,
    },
}

impl Waveform {
    /// Value at sample index `n`
    pub fn sample(&self, n: usize) -> u8 {
        match *self {
            Waveform::Dc(level) => level,
            Waveform::Square { period, low, high } => {
                let period = period.max(2);
                if n % period < period / 2 {
                    low
                } else {
                    high
                }
            }
            Waveform::Sawtooth { period } => {
                let period = period.max(1);
                ((n % period) * 255 / (period - 1).max(1)) as u8
            }
            Waveform::Sine { period, amplitude, offset } => {
                let period = period.max(1);
                let phase = (n % period) as f32 / period as f32;
                let value = offset + amplitude * libm::sinf(2.0 * core::f32::consts::PI * phase);
                libm::roundf(value).clamp(0.0, 255.0) as u8
            }
        }
    }

    /// Endless sample stream starting at index 0
    pub fn samples(self) -> impl Iterator<Item = u8> {
        (0..).map(move |n| self.sample(n))
    }
}

/// What happened while driving a signal through the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveReport {
    /// Input values consumed
    pub consumed: usize,
    /// Conversions the engine stored
    pub stored: usize,
    /// Edges the engine accepted
    pub triggers: usize,
    /// Edges suppressed during accumulation
    pub suppressed: usize,
    /// Number of inputs consumed when capture froze
    pub frozen_after: Option<usize>,
}

/// Feed `input` through the comparator and the engine until it freezes
///
/// For each value the comparator is evaluated first and, if its interrupt is
/// enabled and an edge fired, the trigger handler runs before the conversion
/// of that same value completes.
pub fn drive<const N: usize, I>(
    engine: &CaptureEngine<N>,
    peripherals: &SimPeripherals,
    comparator: &mut Comparator,
    input: I,
) -> DriveReport
where
    I: IntoIterator<Item = u8>,
{
    let mut report = DriveReport::default();

    for value in input {
        report.consumed += 1;

        if comparator.update(value) && peripherals.trigger_enabled() {
            match engine.on_trigger_edge(peripherals) {
                TriggerOutcome::Recorded(_) => report.triggers += 1,
                TriggerOutcome::Suppressed { .. } => report.suppressed += 1,
                TriggerOutcome::Ignored => {}
            }
        }

        if !peripherals.sampling_enabled() {
            continue;
        }

        match engine.on_sample_ready(value, peripherals) {
            SampleOutcome::Stored { .. } => report.stored += 1,
            SampleOutcome::Frozen { .. } => {
                report.stored += 1;
                report.frozen_after = Some(report.consumed);
                break;
            }
            SampleOutcome::Discarded => {}
        }
    }

    report
}
