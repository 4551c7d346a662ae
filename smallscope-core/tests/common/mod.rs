//! Common test utilities for capture integration tests
//!
//! This module provides:
//! - Engine fixtures wired to simulated peripherals
//! - Deterministic sample sequences
//! - A small PRNG for reproducible noise
//! - Assertion helpers for frozen captures

#![allow(dead_code)]

use smallscope_core::{
    sim::SimPeripherals, CaptureConfig, CaptureEngine, CaptureSnapshot, SampleOutcome,
    TriggerOutcome,
};

pub mod harness;
pub mod scenarios;

pub use harness::TestRng;

/// Armed engine with an explicit window
pub fn armed<const N: usize>(post: usize, pre: usize) -> (CaptureEngine<N>, SimPeripherals) {
    let engine = CaptureEngine::<N>::with_window(CaptureConfig {
        post_trigger_samples: post,
        pre_trigger_minimum: pre,
    });
    let periph = SimPeripherals::new();
    engine.rearm(&periph);
    (engine, periph)
}

/// Feed samples until the engine freezes, returns how many were stored
pub fn feed<const N: usize, I>(engine: &CaptureEngine<N>, periph: &SimPeripherals, samples: I) -> usize
where
    I: IntoIterator<Item = u8>,
{
    let mut stored = 0;
    for sample in samples {
        match engine.on_sample_ready(sample, periph) {
            SampleOutcome::Stored { .. } => stored += 1,
            SampleOutcome::Frozen { .. } => return stored + 1,
            SampleOutcome::Discarded => {}
        }
    }
    stored
}

/// Write `before` counting samples, trigger, then keep writing until frozen
///
/// Sample values are the write index truncated to a byte.
pub fn capture_with_trigger_after<const N: usize>(
    engine: &CaptureEngine<N>,
    periph: &SimPeripherals,
    before: usize,
) -> TriggerOutcome {
    feed(engine, periph, (0..before).map(|i| i as u8));
    let outcome = engine.on_trigger_edge(periph);
    feed(engine, periph, (before..before + 2 * N).map(|i| i as u8));
    outcome
}

/// Frozen snapshot or panic with the engine state
pub fn frozen_snapshot<const N: usize>(engine: &CaptureEngine<N>) -> CaptureSnapshot<N> {
    match engine.snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => panic!("expected frozen capture, engine {:?}: {}", engine.state(), err),
    }
}

/// Each sample is one more than the previous, mod 256
pub fn assert_consecutive(samples: &[u8]) {
    for pair in samples.windows(2) {
        assert_eq!(
            pair[1],
            pair[0].wrapping_add(1),
            "non-consecutive samples {} -> {}",
            pair[0],
            pair[1]
        );
    }
}
