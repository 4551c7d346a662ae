//! Named signal scenarios
//!
//! Each scenario pairs a waveform with the comparator setup that should
//! produce a capture from it.

use smallscope_core::{sim::Waveform, TriggerEdge};

/// A signal and how to trigger on it
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub waveform: Waveform,
    pub threshold: u8,
    pub edge: TriggerEdge,
}

pub struct Scenarios;

impl Scenarios {
    /// Slow square wave, rising edges
    pub fn square_rising() -> Scenario {
        Scenario {
            name: "square_rising",
            waveform: Waveform::Square { period: 50, low: 30, high: 220 },
            threshold: 127,
            edge: TriggerEdge::Rising,
        }
    }

    /// Sine across the full range, falling edges
    pub fn sine_falling() -> Scenario {
        Scenario {
            name: "sine_falling",
            waveform: Waveform::Sine { period: 64, amplitude: 120.0, offset: 128.0 },
            threshold: 100,
            edge: TriggerEdge::Falling,
        }
    }

    /// Sawtooth with either edge
    pub fn sawtooth_toggle() -> Scenario {
        Scenario {
            name: "sawtooth_toggle",
            waveform: Waveform::Sawtooth { period: 40 },
            threshold: 60,
            edge: TriggerEdge::Toggle,
        }
    }

    /// Flat line that never crosses the threshold
    pub fn flat_line() -> Scenario {
        Scenario {
            name: "flat_line",
            waveform: Waveform::Dc(50),
            threshold: 127,
            edge: TriggerEdge::Rising,
        }
    }

    /// Every scenario expected to trigger
    pub fn triggering() -> [Scenario; 3] {
        [Self::square_rising(), Self::sine_falling(), Self::sawtooth_toggle()]
    }
}
