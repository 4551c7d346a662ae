//! Single Capture Example
//!
//! Runs one capture cycle against simulated hardware: a square wave goes
//! through the comparator model and the converter, the engine freezes after
//! the trigger, and the frozen ring is printed oldest-first.
//!
//! ## What You'll Learn
//!
//! - Sharing one `CaptureEngine` between both interrupt handlers
//! - Re-arming and waiting for the frozen state
//! - Reading the capture back around the trigger
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_single_capture
//! ```

use smallscope_core::{
    sim::{drive, Comparator, SimPeripherals, Waveform},
    CaptureConfig, CaptureEngine, TriggerEdge,
};

const CAPACITY: usize = 64;

// Both handlers reach the engine through the same static
static ENGINE: CaptureEngine<CAPACITY> = CaptureEngine::with_window(CaptureConfig {
    post_trigger_samples: 40,
    pre_trigger_minimum: 24,
});
static PERIPHERALS: SimPeripherals = SimPeripherals::new();

fn main() {
    println!("smallscope Single Capture Example");
    println!("=================================\n");

    let config = ENGINE.config();
    println!("Ring capacity:       {}", ENGINE.capacity());
    println!("Post-trigger window: {}", config.post_trigger_samples);
    println!("Pre-trigger minimum: {}\n", config.pre_trigger_minimum);

    ENGINE.rearm(&PERIPHERALS);
    println!("State after re-arm: {}", ENGINE.state());

    let mut comparator = Comparator::new(127, TriggerEdge::Rising);
    let signal = Waveform::Square { period: 30, low: 40, high: 200 };
    let report = drive(&ENGINE, &PERIPHERALS, &mut comparator, signal.samples().take(1_000));

    println!("Inputs consumed:     {}", report.consumed);
    println!("Samples stored:      {}", report.stored);
    println!("Edges suppressed:    {}", report.suppressed);
    println!("Edges accepted:      {}", report.triggers);
    println!("State after drive:   {}\n", ENGINE.state());

    let capture = match ENGINE.snapshot() {
        Ok(capture) => capture,
        Err(err) => {
            println!("No capture: {}", err);
            return;
        }
    };

    println!(
        "Trigger at ring slot {} ({} samples before it)",
        capture.trigger_position(),
        capture.trigger_index()
    );
    println!("\n offset  value");
    for (offset, sample) in capture.relative() {
        let marker = if offset == 0 { "<- trigger" } else { "" };
        println!("{:>7}  {:>5}  {}", offset, sample, marker);
    }

    println!("\nStats: {:?}", ENGINE.stats());
}
