//! Capture and Peripheral Settings
//!
//! Settings are enumerated so that an illegal register encoding cannot be
//! expressed. Parsing from the raw codes used by the command interface goes
//! through `TryFrom<u8>`; the mapping back to hardware bits lives in `bits()`
//! and is only ever consumed by a [`PeripheralConfig`](crate::traits::PeripheralConfig)
//! implementation. The capture engine itself only reads [`CaptureConfig`].
//!
//! ```rust
//! use smallscope_core::config::{Prescaler, ScopeSettings, TriggerEdge};
//!
//! let mut settings = ScopeSettings::default();
//! settings.prescaler = Prescaler::try_from(16).unwrap();
//! settings.trigger_edge = TriggerEdge::Falling;
//! settings.capture.post_trigger_samples = 100;
//!
//! assert!(settings.validate::<256>().is_ok());
//! assert_eq!(settings.prescaler.sample_rate_hz(16_000_000), 76_923);
//! ```

use crate::constants::{
    ADC_CYCLES_PER_CONVERSION, DEFAULT_POST_TRIGGER_SAMPLES, DEFAULT_PRE_TRIGGER_MINIMUM,
    DEFAULT_THRESHOLD,
};
use crate::errors::{ConfigError, ConfigResult};

/// Capture window configuration
///
/// Read by the handlers, never written by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureConfig {
    /// Samples kept after the trigger, must be below the ring capacity
    pub post_trigger_samples: usize,

    /// Samples that must be written after re-arm before a trigger is honoured
    pub pre_trigger_minimum: usize,
}

impl CaptureConfig {
    /// Window with the given post-trigger count and a pre-trigger minimum
    /// that fills the rest of an `N` slot ring
    pub const fn for_capacity<const N: usize>(post_trigger_samples: usize) -> Self {
        Self {
            post_trigger_samples,
            pre_trigger_minimum: N.saturating_sub(post_trigger_samples),
        }
    }

    /// Check the window against a ring of `N` slots
    pub fn validate<const N: usize>(&self) -> ConfigResult<()> {
        if self.post_trigger_samples >= N {
            return Err(ConfigError::PostTriggerTooLarge {
                requested: self.post_trigger_samples,
                capacity: N,
            });
        }

        if self.pre_trigger_minimum > N {
            return Err(ConfigError::PreTriggerTooLarge {
                requested: self.pre_trigger_minimum,
                capacity: N,
            });
        }

        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            post_trigger_samples: DEFAULT_POST_TRIGGER_SAMPLES,
            pre_trigger_minimum: DEFAULT_PRE_TRIGGER_MINIMUM,
        }
    }
}

/// Converter clock division factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    /// System clock / 2
    Div2,
    /// System clock / 4
    Div4,
    /// System clock / 8
    Div8,
    /// System clock / 16
    Div16,
    /// System clock / 32
    Div32,
    /// System clock / 64
    Div64,
    /// System clock / 128, slowest and most accurate
    #[default]
    Div128,
}

impl Prescaler {
    /// All legal factors, fastest first
    pub const ALL: [Prescaler; 7] = [
        Prescaler::Div2,
        Prescaler::Div4,
        Prescaler::Div8,
        Prescaler::Div16,
        Prescaler::Div32,
        Prescaler::Div64,
        Prescaler::Div128,
    ];

    /// Division factor
    pub const fn divisor(self) -> u8 {
        match self {
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div32 => 32,
            Prescaler::Div64 => 64,
            Prescaler::Div128 => 128,
        }
    }

    /// Three-bit prescaler select field (ADPS2:0)
    pub const fn bits(self) -> u8 {
        match self {
            Prescaler::Div2 => 0b000,
            Prescaler::Div4 => 0b010,
            Prescaler::Div8 => 0b011,
            Prescaler::Div16 => 0b100,
            Prescaler::Div32 => 0b101,
            Prescaler::Div64 => 0b110,
            Prescaler::Div128 => 0b111,
        }
    }

    /// Free-running conversion rate for a given system clock
    pub const fn sample_rate_hz(self, cpu_clock_hz: u32) -> u32 {
        cpu_clock_hz / self.divisor() as u32 / ADC_CYCLES_PER_CONVERSION
    }
}

impl TryFrom<u8> for Prescaler {
    type Error = ConfigError;

    fn try_from(divisor: u8) -> ConfigResult<Self> {
        Prescaler::ALL
            .into_iter()
            .find(|p| p.divisor() == divisor)
            .ok_or(ConfigError::InvalidPrescaler(divisor))
    }
}

/// Comparator edge that raises the trigger interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerEdge {
    /// Either direction
    Toggle,
    /// Output goes from high to low
    Falling,
    /// Output goes from low to high
    #[default]
    Rising,
}

impl TriggerEdge {
    /// Command code, also the interrupt mode select field (ACIS1:0)
    pub const fn code(self) -> u8 {
        match self {
            TriggerEdge::Toggle => 0,
            TriggerEdge::Falling => 2,
            TriggerEdge::Rising => 3,
        }
    }

    /// Interrupt mode select field (ACIS1:0)
    pub const fn bits(self) -> u8 {
        self.code()
    }

    /// Does a transition from `previous` to `current` comparator output match?
    pub const fn matches(self, previous: bool, current: bool) -> bool {
        match self {
            TriggerEdge::Toggle => previous != current,
            TriggerEdge::Falling => previous && !current,
            TriggerEdge::Rising => !previous && current,
        }
    }
}

impl TryFrom<u8> for TriggerEdge {
    type Error = ConfigError;

    fn try_from(code: u8) -> ConfigResult<Self> {
        match code {
            0 => Ok(TriggerEdge::Toggle),
            2 => Ok(TriggerEdge::Falling),
            3 => Ok(TriggerEdge::Rising),
            other => Err(ConfigError::InvalidTriggerEdge(other)),
        }
    }
}

impl core::fmt::Display for TriggerEdge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            TriggerEdge::Toggle => "toggle",
            TriggerEdge::Falling => "falling",
            TriggerEdge::Rising => "rising",
        };
        f.write_str(name)
    }
}

/// Converter voltage reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageReference {
    /// External reference on the AREF pin
    Aref,
    /// Supply voltage with capacitor on AREF
    #[default]
    Avcc,
    /// Internal 1.1V bandgap with capacitor on AREF
    Internal1V1,
}

impl VoltageReference {
    /// Command code, also the reference select field (REFS1:0)
    pub const fn code(self) -> u8 {
        match self {
            VoltageReference::Aref => 0,
            VoltageReference::Avcc => 1,
            VoltageReference::Internal1V1 => 3,
        }
    }

    /// Reference select field (REFS1:0)
    pub const fn bits(self) -> u8 {
        self.code()
    }
}

impl TryFrom<u8> for VoltageReference {
    type Error = ConfigError;

    fn try_from(code: u8) -> ConfigResult<Self> {
        match code {
            0 => Ok(VoltageReference::Aref),
            1 => Ok(VoltageReference::Avcc),
            3 => Ok(VoltageReference::Internal1V1),
            other => Err(ConfigError::InvalidVoltageReference(other)),
        }
    }
}

impl core::fmt::Display for VoltageReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            VoltageReference::Aref => "AREF",
            VoltageReference::Avcc => "AVCC",
            VoltageReference::Internal1V1 => "1.1V",
        };
        f.write_str(name)
    }
}

/// Everything the configuration collaborator can change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeSettings {
    /// Converter clock division
    pub prescaler: Prescaler,
    /// Comparator edge that triggers
    pub trigger_edge: TriggerEdge,
    /// Converter reference
    pub voltage_reference: VoltageReference,
    /// Comparator threshold as PWM duty
    pub threshold: u8,
    /// Capture window
    pub capture: CaptureConfig,
}

impl ScopeSettings {
    /// Same settings with the window rescaled to an `N` slot ring,
    /// keeping three quarters of it after the trigger
    pub const fn with_capacity<const N: usize>(self) -> Self {
        Self {
            capture: CaptureConfig::for_capacity::<N>(N * 3 / 4),
            ..self
        }
    }

    /// Check the settings against a ring of `N` slots
    ///
    /// Enumerated fields are valid by construction; only the window can fail.
    pub fn validate<const N: usize>(&self) -> ConfigResult<()> {
        self.capture.validate::<N>()
    }
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self {
            prescaler: Prescaler::default(),
            trigger_edge: TriggerEdge::default(),
            voltage_reference: VoltageReference::default(),
            threshold: DEFAULT_THRESHOLD,
            capture: CaptureConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prescaler_round_trips_through_divisor() {
        for prescaler in Prescaler::ALL {
            assert_eq!(Prescaler::try_from(prescaler.divisor()), Ok(prescaler));
        }
    }

    #[test]
    fn prescaler_rejects_unknown_divisor() {
        assert_eq!(Prescaler::try_from(3), Err(ConfigError::InvalidPrescaler(3)));
        assert_eq!(Prescaler::try_from(0), Err(ConfigError::InvalidPrescaler(0)));
        assert_eq!(Prescaler::try_from(255), Err(ConfigError::InvalidPrescaler(255)));
    }

    #[test]
    fn prescaler_register_encoding() {
        assert_eq!(Prescaler::Div2.bits(), 0b000);
        assert_eq!(Prescaler::Div8.bits(), 0b011);
        assert_eq!(Prescaler::Div128.bits(), 0b111);
    }

    #[test]
    fn sample_rate_at_16mhz() {
        // 16 MHz / 128 / 13
        assert_eq!(Prescaler::Div128.sample_rate_hz(16_000_000), 9_615);
        assert_eq!(Prescaler::Div2.sample_rate_hz(16_000_000), 615_384);
    }

    #[test]
    fn trigger_edge_codes() {
        assert_eq!(TriggerEdge::try_from(0), Ok(TriggerEdge::Toggle));
        assert_eq!(TriggerEdge::try_from(2), Ok(TriggerEdge::Falling));
        assert_eq!(TriggerEdge::try_from(3), Ok(TriggerEdge::Rising));
        // 1 is reserved by the comparator
        assert_eq!(TriggerEdge::try_from(1), Err(ConfigError::InvalidTriggerEdge(1)));
    }

    #[test]
    fn trigger_edge_matching() {
        assert!(TriggerEdge::Rising.matches(false, true));
        assert!(!TriggerEdge::Rising.matches(true, false));
        assert!(TriggerEdge::Falling.matches(true, false));
        assert!(!TriggerEdge::Falling.matches(false, false));
        assert!(TriggerEdge::Toggle.matches(true, false));
        assert!(TriggerEdge::Toggle.matches(false, true));
        assert!(!TriggerEdge::Toggle.matches(true, true));
    }

    #[test]
    fn voltage_reference_codes() {
        assert_eq!(VoltageReference::try_from(1), Ok(VoltageReference::Avcc));
        assert_eq!(VoltageReference::try_from(3), Ok(VoltageReference::Internal1V1));
        assert_eq!(
            VoltageReference::try_from(2),
            Err(ConfigError::InvalidVoltageReference(2))
        );
    }

    #[test]
    fn defaults_match_boot_configuration() {
        let settings = ScopeSettings::default();
        assert_eq!(settings.prescaler, Prescaler::Div128);
        assert_eq!(settings.trigger_edge, TriggerEdge::Rising);
        assert_eq!(settings.voltage_reference, VoltageReference::Avcc);
        assert_eq!(settings.threshold, 127);
        assert!(settings.validate::<256>().is_ok());
    }

    #[test]
    fn window_limits() {
        let config = CaptureConfig { post_trigger_samples: 7, pre_trigger_minimum: 8 };
        assert!(config.validate::<8>().is_ok());

        let config = CaptureConfig { post_trigger_samples: 8, pre_trigger_minimum: 0 };
        assert_eq!(
            config.validate::<8>(),
            Err(ConfigError::PostTriggerTooLarge { requested: 8, capacity: 8 })
        );

        let config = CaptureConfig { post_trigger_samples: 0, pre_trigger_minimum: 9 };
        assert_eq!(
            config.validate::<8>(),
            Err(ConfigError::PreTriggerTooLarge { requested: 9, capacity: 8 })
        );
    }

    #[test]
    fn window_for_capacity_fills_ring() {
        let config = CaptureConfig::for_capacity::<8>(3);
        assert_eq!(config.pre_trigger_minimum, 5);
    }
}
