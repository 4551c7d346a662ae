//! Settings and Status Example
//!
//! Drives the scope controller the way a command interface would: parse
//! raw setting codes, apply them, show the status block, and watch a bad
//! window get rejected with the fault indicator pulsed.
//!
//! ## What You'll Learn
//!
//! - Converting raw codes into typed settings
//! - Applying settings and re-arming through `Scope`
//! - Polling for a frozen capture without blocking
//! - Rendering the status text
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_settings_and_status
//! ```

use smallscope_core::{
    constants::DEFAULT_CPU_CLOCK_HZ,
    sim::{drive, Comparator, SimIndicator, SimPeripherals, Waveform},
    CaptureEngine, ConfigError, Prescaler, Scope, ScopeSettings, TriggerEdge, VoltageReference,
};

const CAPACITY: usize = 128;

fn parse_settings(prescaler: u8, edge: u8, reference: u8, threshold: u8) -> Result<ScopeSettings, ConfigError> {
    Ok(ScopeSettings {
        prescaler: Prescaler::try_from(prescaler)?,
        trigger_edge: TriggerEdge::try_from(edge)?,
        voltage_reference: VoltageReference::try_from(reference)?,
        threshold,
        ..ScopeSettings::default().with_capacity::<CAPACITY>()
    })
}

fn main() {
    println!("smallscope Settings and Status Example");
    println!("======================================\n");

    let engine = CaptureEngine::<CAPACITY>::new();
    let mut scope = Scope::new(&engine, SimPeripherals::new(), SimIndicator::default());

    // Codes as they arrive over the serial link
    let settings = match parse_settings(32, 2, 1, 90) {
        Ok(settings) => settings,
        Err(err) => {
            println!("Bad command: {}", err);
            return;
        }
    };

    if let Err(err) = scope.boot(settings) {
        println!("Boot failed: {}", err);
        return;
    }
    println!(
        "Sample rate at {} Hz CPU clock: {} Hz\n",
        DEFAULT_CPU_CLOCK_HZ,
        settings.prescaler.sample_rate_hz(DEFAULT_CPU_CLOCK_HZ)
    );

    println!("Unknown codes are refused before reaching the hardware:");
    for (prescaler, edge) in [(3u8, 2u8), (32, 1)] {
        match parse_settings(prescaler, edge, 1, 90) {
            Ok(_) => println!("  prescaler {} edge {}: accepted", prescaler, edge),
            Err(err) => println!("  prescaler {} edge {}: {}", prescaler, edge, err),
        }
    }
    println!();

    let mut comparator = Comparator::new(settings.threshold, settings.trigger_edge);
    let sine = Waveform::Sine { period: 48, amplitude: 100.0, offset: 128.0 };
    let mut signal = sine.samples();

    // Main loop: feed a slice of signal, then poll
    let capture = loop {
        drive(scope.engine(), scope.peripherals(), &mut comparator, signal.by_ref().take(16));
        match scope.poll_capture() {
            Ok(capture) => break capture,
            Err(nb::Error::WouldBlock) => println!("  ... {}", scope.status().state),
            Err(nb::Error::Other(never)) => match never {},
        }
    };

    println!("\nCaptured, trigger sample {}", capture.trigger_sample());
    println!("\n{}", scope.status().render());

    println!("Requesting a post-trigger window as large as the ring:");
    let mut oversized = *scope.settings();
    oversized.capture.post_trigger_samples = CAPACITY;
    match scope.apply_settings(oversized) {
        Ok(()) => println!("  applied"),
        Err(err) => println!("  rejected: {}", err),
    }
    println!("  fault indicator pulses: {}", scope.indicator().pulses);
    println!("  state unchanged: {}", scope.status().state);
}
