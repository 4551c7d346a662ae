//! Status Reporting
//!
//! A [`StatusReport`] is a plain copy of everything the status collaborator
//! shows: capture state, ring geometry and the active settings. Building one
//! has no side effects. [`StatusReport::render`] produces the line-oriented
//! text block sent back over the serial link, without allocating.

use core::fmt::{self, Write};

use heapless::String;

use crate::capture::{CaptureState, TriggerRecord};
use crate::config::ScopeSettings;
use crate::constants::STATUS_TEXT_CAPACITY;

/// Point-in-time view of the scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Capture state
    pub state: CaptureState,
    /// Ring capacity
    pub capacity: usize,
    /// Next slot to be written
    pub cursor: usize,
    /// Remaining accumulation before triggers are honoured
    pub pre_trigger_budget: i32,
    /// Trigger record of the current cycle
    pub trigger: Option<TriggerRecord>,
    /// Active settings
    pub settings: ScopeSettings,
}

impl StatusReport {
    /// Render into a fixed-capacity text block
    pub fn render(&self) -> String<STATUS_TEXT_CAPACITY> {
        let mut text = String::new();
        // Sized for the worst case, see STATUS_TEXT_CAPACITY
        let _ = write!(text, "{self}");
        text
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = &self.settings;
        writeln!(f, "Buffer size: {}", self.capacity)?;
        writeln!(f, "Wait duration: {}", settings.capture.post_trigger_samples)?;
        writeln!(f, "Pre-trigger minimum: {}", settings.capture.pre_trigger_minimum)?;
        writeln!(f, "Prescaler: {}", settings.prescaler.divisor())?;
        writeln!(f, "Trigger event: {}", settings.trigger_edge)?;
        writeln!(f, "Voltage reference: {}", settings.voltage_reference)?;
        writeln!(f, "Threshold: {}", settings.threshold)?;
        write!(f, "State: {}", self.state)?;
        if let Some(record) = self.trigger {
            write!(f, " (trigger {}, stop {})", record.trigger_position, record.stop_position)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> StatusReport {
        StatusReport {
            state: CaptureState::Armed,
            capacity: 256,
            cursor: 12,
            pre_trigger_budget: 52,
            trigger: None,
            settings: ScopeSettings::default(),
        }
    }

    #[test]
    fn renders_default_settings() {
        let text = report().render();
        assert!(text.starts_with("Buffer size: 256\n"));
        assert!(text.contains("Wait duration: 192\n"));
        assert!(text.contains("Prescaler: 128\n"));
        assert!(text.contains("Trigger event: rising\n"));
        assert!(text.contains("Threshold: 127\n"));
        assert!(text.ends_with("State: armed\n"));
    }

    #[test]
    fn renders_trigger_record() {
        let mut status = report();
        status.state = CaptureState::WaitingForStop;
        status.trigger = Some(TriggerRecord { trigger_position: 5, stop_position: 0 });

        let text = status.render();
        assert!(text.ends_with("State: waiting for stop (trigger 5, stop 0)\n"));
    }

    #[test]
    fn render_fits_capacity() {
        let mut status = report();
        status.capacity = usize::MAX;
        status.settings.capture.post_trigger_samples = usize::MAX;
        status.settings.capture.pre_trigger_minimum = usize::MAX;
        status.trigger = Some(TriggerRecord {
            trigger_position: usize::MAX,
            stop_position: usize::MAX,
        });
        let text = status.render();
        assert!(text.contains("Buffer size"));
        assert!(text.len() <= STATUS_TEXT_CAPACITY);
    }
}
