//! Main-Loop Scope Controller
//!
//! [`Scope`] is what the command interface talks to. It owns the peripheral
//! collaborator and the fault indicator, borrows the shared
//! [`CaptureEngine`], and turns settings changes, re-arm requests and status
//! queries into engine and peripheral calls.
//!
//! ## Typical Main Loop
//!
//! ```rust
//! use smallscope_core::{CaptureEngine, Scope, ScopeSettings};
//! use smallscope_core::sim::{SimIndicator, SimPeripherals};
//!
//! let engine = CaptureEngine::<128>::new();
//! let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
//! scope.boot(ScopeSettings::default().with_capacity::<128>()).unwrap();
//!
//! // interrupt handlers run here
//! # scope.on_trigger_edge();
//!
//! match scope.poll_capture() {
//!     Ok(capture) => {
//!         let _to_host = capture.samples();
//!         scope.rearm();
//!     }
//!     Err(nb::Error::WouldBlock) => { /* keep serving commands */ }
//!     Err(nb::Error::Other(never)) => match never {},
//! }
//! ```

use core::convert::Infallible;

use crate::capture::{CaptureEngine, SampleOutcome, TriggerOutcome};
use crate::config::ScopeSettings;
use crate::errors::ConfigResult;
use crate::readout::CaptureSnapshot;
use crate::status::StatusReport;
use crate::traits::{ErrorIndicator, NoIndicator, Peripherals};

/// Scope controller for a ring of `N` samples
pub struct Scope<'a, const N: usize, P: Peripherals, E: ErrorIndicator = NoIndicator> {
    engine: &'a CaptureEngine<N>,
    peripherals: P,
    indicator: E,
    settings: ScopeSettings,
}

impl<'a, const N: usize, P: Peripherals, E: ErrorIndicator> Scope<'a, N, P, E> {
    /// Controller with boot defaults recorded but nothing applied yet
    pub fn new(engine: &'a CaptureEngine<N>, peripherals: P, indicator: E) -> Self {
        Self {
            engine,
            peripherals,
            indicator,
            settings: ScopeSettings {
                capture: engine.config(),
                ..ScopeSettings::default()
            },
        }
    }

    /// Apply `settings` and start the first capture
    pub fn boot(&mut self, settings: ScopeSettings) -> ConfigResult<()> {
        self.apply_settings(settings)?;
        self.rearm();
        Ok(())
    }

    /// Validate and apply new settings
    ///
    /// Capture is stopped first and left stopped; call [`Scope::rearm`] to
    /// resume. On rejection the fault indicator pulses and nothing changes.
    pub fn apply_settings(&mut self, settings: ScopeSettings) -> ConfigResult<()> {
        if let Err(err) = settings.validate::<N>() {
            log_warn!("Rejected settings: {}", err);
            self.indicator.signal();
            return Err(err);
        }

        self.engine.configure(settings.capture, &self.peripherals)?;

        self.peripherals.set_prescaler(settings.prescaler);
        self.peripherals.set_trigger_edge(settings.trigger_edge);
        self.peripherals.set_voltage_reference(settings.voltage_reference);
        self.peripherals.set_threshold(settings.threshold);
        self.settings = settings;

        log_info!(
            "Settings applied: prescaler {}, edge {}, threshold {}, post-trigger {}",
            settings.prescaler.divisor(),
            settings.trigger_edge,
            settings.threshold,
            settings.capture.post_trigger_samples
        );
        Ok(())
    }

    /// Begin a new capture, discarding any frozen one
    pub fn rearm(&self) {
        self.engine.rearm(&self.peripherals);
        log_debug!("Capture armed, budget {}", self.engine.pre_trigger_budget());
    }

    /// Stop capturing
    pub fn stop(&self) {
        self.engine.stop(&self.peripherals);
        log_debug!("Capture stopped in state {}", self.engine.state());
    }

    /// Frozen capture, or `WouldBlock` while still sampling
    pub fn poll_capture(&self) -> nb::Result<CaptureSnapshot<N>, Infallible> {
        match self.engine.snapshot() {
            Ok(snapshot) => {
                log_debug!("Capture frozen, trigger at slot {}", snapshot.trigger_position());
                Ok(snapshot)
            }
            Err(_) => Err(nb::Error::WouldBlock),
        }
    }

    /// Sample-ready entry point for boards where the controller is reachable
    /// from the interrupt
    pub fn on_sample_ready(&self, sample: u8) -> SampleOutcome {
        self.engine.on_sample_ready(sample, &self.peripherals)
    }

    /// Trigger-edge entry point, see [`Scope::on_sample_ready`]
    pub fn on_trigger_edge(&self) -> TriggerOutcome {
        self.engine.on_trigger_edge(&self.peripherals)
    }

    /// Current state and settings
    pub fn status(&self) -> StatusReport {
        StatusReport {
            state: self.engine.state(),
            capacity: N,
            cursor: self.engine.cursor(),
            pre_trigger_budget: self.engine.pre_trigger_budget(),
            trigger: self.engine.trigger_record(),
            settings: self.settings,
        }
    }

    /// Settings in effect
    pub fn settings(&self) -> &ScopeSettings {
        &self.settings
    }

    /// Shared engine
    pub fn engine(&self) -> &'a CaptureEngine<N> {
        self.engine
    }

    /// Peripheral collaborator
    pub fn peripherals(&self) -> &P {
        &self.peripherals
    }

    /// Fault indicator
    pub fn indicator(&self) -> &E {
        &self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureState;
    use crate::config::{CaptureConfig, Prescaler, TriggerEdge, VoltageReference};
    use crate::errors::ConfigError;
    use crate::sim::{SimIndicator, SimPeripherals};

    fn settings() -> ScopeSettings {
        ScopeSettings {
            prescaler: Prescaler::Div16,
            trigger_edge: TriggerEdge::Falling,
            voltage_reference: VoltageReference::Internal1V1,
            threshold: 80,
            capture: CaptureConfig { post_trigger_samples: 3, pre_trigger_minimum: 4 },
        }
    }

    #[test]
    fn boot_applies_and_arms() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        let periph = scope.peripherals();
        assert_eq!(periph.prescaler, Prescaler::Div16);
        assert_eq!(periph.trigger_edge, TriggerEdge::Falling);
        assert_eq!(periph.voltage_reference, VoltageReference::Internal1V1);
        assert_eq!(periph.threshold, 80);
        assert!(periph.sampling_enabled());
        assert_eq!(engine.state(), CaptureState::Armed);
        assert_eq!(engine.pre_trigger_budget(), 4);
    }

    #[test]
    fn invalid_settings_pulse_indicator_and_change_nothing() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        let mut bad = settings();
        bad.threshold = 200;
        bad.capture.post_trigger_samples = 8;

        assert_eq!(
            scope.apply_settings(bad),
            Err(ConfigError::PostTriggerTooLarge { requested: 8, capacity: 8 })
        );
        assert_eq!(scope.indicator().pulses, 1);
        assert_eq!(scope.peripherals().threshold, 80);
        assert_eq!(scope.settings(), &settings());
        // running capture untouched
        assert_eq!(engine.state(), CaptureState::Armed);
    }

    #[test]
    fn apply_settings_leaves_capture_stopped() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        scope.apply_settings(settings()).unwrap();
        assert_eq!(engine.state(), CaptureState::Idle);
        assert!(!scope.peripherals().sampling_enabled());
    }

    #[test]
    fn poll_blocks_until_frozen() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        for sample in [10, 20, 30, 40, 50] {
            scope.on_sample_ready(sample);
        }
        assert_eq!(scope.poll_capture(), Err(nb::Error::WouldBlock));

        scope.on_trigger_edge();
        for sample in [60, 70, 80] {
            scope.on_sample_ready(sample);
        }

        let capture = scope.poll_capture().unwrap();
        assert_eq!(capture.samples(), &[10, 20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(capture.trigger_index(), 5);

        scope.rearm();
        assert_eq!(scope.poll_capture(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn status_reflects_engine_and_settings() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        for sample in 0..4 {
            scope.on_sample_ready(sample);
        }
        scope.on_trigger_edge();

        let status = scope.status();
        assert_eq!(status.state, CaptureState::WaitingForStop);
        assert_eq!(status.capacity, 8);
        assert_eq!(status.cursor, 4);
        assert_eq!(status.trigger.unwrap().stop_position, 7);
        assert_eq!(status.settings.prescaler, Prescaler::Div16);

        // querying twice changes nothing
        assert_eq!(scope.status(), status);
    }

    #[test]
    fn stop_from_armed_is_idle() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        scope.stop();
        assert_eq!(scope.status().state, CaptureState::Idle);
        assert_eq!(scope.on_sample_ready(1), SampleOutcome::Discarded);
    }

    #[test]
    fn stop_while_waiting_reports_plain_idle() {
        let engine = CaptureEngine::<8>::new();
        let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());
        scope.boot(settings()).unwrap();

        for sample in 0..4 {
            scope.on_sample_ready(sample);
        }
        scope.on_trigger_edge();
        scope.stop();

        let status = scope.status();
        assert_eq!(status.trigger, None);
        assert!(status.render().ends_with("State: idle\n"));
    }
}
