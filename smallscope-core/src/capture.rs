//! Trigger-Aligned Capture Engine
//!
//! ## Overview
//!
//! [`CaptureEngine`] is the state shared by the two interrupt handlers of the
//! scope and the main loop:
//!
//! - [`CaptureEngine::on_sample_ready`] runs once per completed conversion
//! - [`CaptureEngine::on_trigger_edge`] runs once per qualifying comparator edge
//! - [`CaptureEngine::rearm`] / [`CaptureEngine::stop`] run from the main loop
//!
//! ## State Machine
//!
//! ```text
//!            rearm                trigger (budget spent)        cursor == stop
//!   Idle ───────────→ Armed ───────────────────────→ WaitingForStop ──────────→ Frozen
//!    ↑                  │ ↑                                                        │
//!    │      stop        │ └──────────────────────── rearm ─────────────────────────┘
//!    └──────────────────┘
//! ```
//!
//! There is no timeout out of `Armed`. Without a trigger the ring free-runs
//! and keeps overwriting itself.
//!
//! ## Shared State
//!
//! Every shared scalar is its own atomic and is only ever loaded or stored,
//! never read-modified-written, so nothing here needs compare-and-swap and no
//! value can be observed half-written.
//!
//! | Field              | Handler writer    | Main loop writes (interrupts quiesced) |
//! |--------------------|-------------------|----------------------------------------|
//! | buffer, cursor     | sample ready      | -                                      |
//! | pre-trigger budget | sample ready      | rearm                                  |
//! | frozen, sampling   | sample ready      | rearm, stop                            |
//! | trigger, stop      | trigger edge      | -                                      |
//! | recorded, armed    | trigger edge      | rearm, stop, configure                 |
//!
//! The trigger handler publishes the stop position before setting `recorded`
//! with `Release`; the sample handler loads `recorded` with `Acquire` before
//! reading the stop position. The sample handler sets `frozen` with `Release`
//! after its last buffer write; readers load it with `Acquire`.
//!
//! ## Priority
//!
//! The trigger handler is expected to run at strictly higher priority than
//! the sample handler. It reads the cursor and the budget once each and acts
//! on that snapshot. The sample handler reads the trigger record after
//! storing its conversion, so a trigger that preempts the write is counted
//! against that same write:
//!
//! - edge before the cursor advances: the trigger slot is the one being
//!   written, and that write is the first post-trigger sample
//! - edge after the cursor advances: the trigger slot is the next one, and
//!   the stop comparison cannot match until further writes arrive
//!
//! Either way the freeze lands exactly `post` writes after the trigger slot,
//! or one full lap after it when `post` is zero.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicUsize, Ordering};

use crate::buffer::SampleBuffer;
use crate::config::CaptureConfig;
use crate::errors::{CaptureError, CaptureResult, ConfigResult};
use crate::readout::CaptureSnapshot;
use crate::ring::RingIndex;
use crate::traits::{SamplingControl, TriggerControl};

/// Observable capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureState {
    /// Sampling disabled, no trigger detection
    Idle,
    /// Sampling, trigger detection enabled, no stop position yet
    Armed,
    /// Trigger recorded, sampling until the cursor reaches the stop position
    WaitingForStop,
    /// Sampling disabled, buffer and markers stable
    Frozen,
}

impl core::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            CaptureState::Idle => "idle",
            CaptureState::Armed => "armed",
            CaptureState::WaitingForStop => "waiting for stop",
            CaptureState::Frozen => "frozen",
        };
        f.write_str(name)
    }
}

/// Where the trigger landed in the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerRecord {
    /// Cursor at the moment of the trigger
    pub trigger_position: usize,
    /// Cursor value at which capture freezes
    pub stop_position: usize,
}

/// Result of one sample-ready invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Sampling disabled, conversion dropped
    Discarded,
    /// Stored; `cursor` is the new write cursor
    Stored {
        /// Cursor after the write
        cursor: usize,
    },
    /// Stored and capture frozen
    Frozen {
        /// Cursor after the write, equal to the stop position
        cursor: usize,
    },
}

/// Result of one trigger-edge invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Detection disabled or engine not armed
    Ignored,
    /// Accumulation not finished; nothing finalized, detection stays enabled
    Suppressed {
        /// Cursor at the moment of the edge
        position: usize,
    },
    /// Trigger accepted and detection disabled
    Recorded(TriggerRecord),
}

/// Capture health counters
///
/// Each counter has a single writer and is updated with a relaxed
/// load/store pair. Never used for control flow.
pub struct CaptureStats {
    /// Conversions stored in the ring
    pub samples: AtomicU32,
    /// Conversions dropped because sampling was disabled
    pub discarded: AtomicU32,
    /// Edges that finalized a trigger record
    pub triggers_accepted: AtomicU32,
    /// Edges that arrived during accumulation
    pub triggers_suppressed: AtomicU32,
    /// Captures that reached the frozen state
    pub captures: AtomicU32,
}

impl CaptureStats {
    const fn new() -> Self {
        Self {
            samples: AtomicU32::new(0),
            discarded: AtomicU32::new(0),
            triggers_accepted: AtomicU32::new(0),
            triggers_suppressed: AtomicU32::new(0),
            captures: AtomicU32::new(0),
        }
    }

    #[inline(always)]
    fn bump(counter: &AtomicU32) {
        let value = counter.load(Ordering::Relaxed);
        counter.store(value.wrapping_add(1), Ordering::Relaxed);
    }
}

impl core::fmt::Debug for CaptureStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CaptureStats")
            .field("samples", &self.samples.load(Ordering::Relaxed))
            .field("discarded", &self.discarded.load(Ordering::Relaxed))
            .field("triggers_accepted", &self.triggers_accepted.load(Ordering::Relaxed))
            .field("triggers_suppressed", &self.triggers_suppressed.load(Ordering::Relaxed))
            .field("captures", &self.captures.load(Ordering::Relaxed))
            .finish()
    }
}

/// Shared capture context for a ring of `N` samples
///
/// Lives in a `static` so both interrupt handlers can reach it:
///
/// ```rust
/// use smallscope_core::{CaptureEngine, SampleOutcome};
/// use smallscope_core::sim::SimPeripherals;
///
/// static ENGINE: CaptureEngine<256> = CaptureEngine::new();
/// static PERIPHERALS: SimPeripherals = SimPeripherals::new();
///
/// // ADC conversion complete
/// fn adc_isr(sample: u8) {
///     if let SampleOutcome::Frozen { .. } = ENGINE.on_sample_ready(sample, &PERIPHERALS) {
///         // main loop will pick the capture up
///     }
/// }
///
/// // Analog comparator
/// fn comparator_isr() {
///     ENGINE.on_trigger_edge(&PERIPHERALS);
/// }
///
/// ENGINE.rearm(&PERIPHERALS);
/// adc_isr(42);
/// comparator_isr();
/// ```
pub struct CaptureEngine<const N: usize> {
    buffer: SampleBuffer<N>,

    post_trigger_samples: AtomicUsize,
    pre_trigger_minimum: AtomicUsize,

    sampling: AtomicBool,
    armed: AtomicBool,
    frozen: AtomicBool,
    pre_trigger_budget: AtomicI32,

    recorded: AtomicBool,
    trigger_position: AtomicUsize,
    stop_position: AtomicUsize,

    stats: CaptureStats,
}

impl<const N: usize> CaptureEngine<N> {
    /// Idle engine keeping three quarters of the ring after the trigger
    pub const fn new() -> Self {
        Self::with_window(CaptureConfig::for_capacity::<N>(N * 3 / 4))
    }

    /// Idle engine with an explicit window
    ///
    /// The window is not validated here; use [`CaptureEngine::configure`]
    /// for settings that come from outside.
    pub const fn with_window(config: CaptureConfig) -> Self {
        Self {
            buffer: SampleBuffer::new(),
            post_trigger_samples: AtomicUsize::new(config.post_trigger_samples % N),
            pre_trigger_minimum: AtomicUsize::new(config.pre_trigger_minimum),
            sampling: AtomicBool::new(false),
            armed: AtomicBool::new(false),
            frozen: AtomicBool::new(false),
            pre_trigger_budget: AtomicI32::new(0),
            recorded: AtomicBool::new(false),
            trigger_position: AtomicUsize::new(0),
            stop_position: AtomicUsize::new(0),
            stats: CaptureStats::new(),
        }
    }

    // ===== HANDLERS =====

    /// Sample-ready handler
    ///
    /// Stores the conversion, advances the cursor, counts the pre-trigger
    /// budget down and freezes when the cursor reaches the stop position.
    /// Constant time, no branches on buffer contents.
    #[inline]
    pub fn on_sample_ready<S>(&self, sample: u8, sampling: &S) -> SampleOutcome
    where
        S: SamplingControl + ?Sized,
    {
        if !self.sampling.load(Ordering::Acquire) {
            CaptureStats::bump(&self.stats.discarded);
            return SampleOutcome::Discarded;
        }

        let recorded_before = self.recorded.load(Ordering::Acquire);
        let cursor = self.store_sample(sample);
        self.finish_sample(cursor, recorded_before, sampling)
    }

    #[inline(always)]
    fn store_sample(&self, sample: u8) -> usize {
        let cursor = self.buffer.write(sample);
        CaptureStats::bump(&self.stats.samples);

        let budget = self.pre_trigger_budget.load(Ordering::Relaxed);
        if budget > 0 {
            self.pre_trigger_budget.store(budget - 1, Ordering::Release);
        }
        cursor
    }

    // The trigger may land anywhere in this handler, so the record is read
    // after the write. With no post-trigger samples the stop slot equals the
    // trigger slot, and only a record seen before the write can mean a full lap.
    #[inline(always)]
    fn finish_sample<S>(&self, cursor: usize, recorded_before: bool, sampling: &S) -> SampleOutcome
    where
        S: SamplingControl + ?Sized,
    {
        if !self.recorded.load(Ordering::Acquire) {
            return SampleOutcome::Stored { cursor };
        }

        let stop = self.stop_position.load(Ordering::Relaxed);
        let post = self.post_trigger_samples.load(Ordering::Relaxed);
        if cursor != stop || (post == 0 && !recorded_before) {
            return SampleOutcome::Stored { cursor };
        }

        self.sampling.store(false, Ordering::Relaxed);
        sampling.stop_sampling();
        self.frozen.store(true, Ordering::Release);
        CaptureStats::bump(&self.stats.captures);
        SampleOutcome::Frozen { cursor }
    }

    /// Trigger-edge handler
    ///
    /// Honoured at most once per armed cycle, and only after the pre-trigger
    /// budget has run out.
    #[inline]
    pub fn on_trigger_edge<T>(&self, trigger: &T) -> TriggerOutcome
    where
        T: TriggerControl + ?Sized,
    {
        if !self.armed.load(Ordering::Acquire) {
            return TriggerOutcome::Ignored;
        }

        let position = self.buffer.cursor();
        if self.pre_trigger_budget.load(Ordering::Acquire) > 0 {
            CaptureStats::bump(&self.stats.triggers_suppressed);
            return TriggerOutcome::Suppressed { position };
        }

        let post = self.post_trigger_samples.load(Ordering::Relaxed);
        let stop = RingIndex::<N>::offset(position, post);

        self.trigger_position.store(position, Ordering::Relaxed);
        self.stop_position.store(stop, Ordering::Relaxed);
        self.recorded.store(true, Ordering::Release);

        self.armed.store(false, Ordering::Release);
        trigger.disable_trigger();
        CaptureStats::bump(&self.stats.triggers_accepted);

        TriggerOutcome::Recorded(TriggerRecord {
            trigger_position: position,
            stop_position: stop,
        })
    }

    // ===== CONTROLLER =====

    /// Begin a new capture
    ///
    /// Quiesces both handlers, clears the trigger record and the frozen flag,
    /// reloads the budget, then re-enables detection and sampling. Calling it
    /// twice in a row leaves the same state as calling it once. The cursor
    /// and ring contents are left as they are.
    pub fn rearm<P>(&self, peripherals: &P)
    where
        P: SamplingControl + TriggerControl + ?Sized,
    {
        self.halt(peripherals);

        let minimum = self.pre_trigger_minimum.load(Ordering::Relaxed);
        let budget = i32::try_from(minimum).unwrap_or(i32::MAX);

        self.recorded.store(false, Ordering::Relaxed);
        self.frozen.store(false, Ordering::Relaxed);
        self.pre_trigger_budget.store(budget, Ordering::Relaxed);

        self.armed.store(true, Ordering::Release);
        self.sampling.store(true, Ordering::Release);
        peripherals.enable_trigger();
        peripherals.start_sampling();
    }

    /// Stop capturing
    ///
    /// Idempotent. A frozen capture stays frozen and readable; anything else
    /// drops to [`CaptureState::Idle`].
    pub fn stop<P>(&self, peripherals: &P)
    where
        P: SamplingControl + TriggerControl + ?Sized,
    {
        self.halt(peripherals);
    }

    /// Replace the capture window
    ///
    /// Stops capturing first so the handlers never see a window change
    /// mid-cycle. Takes effect at the next [`CaptureEngine::rearm`].
    pub fn configure<P>(&self, config: CaptureConfig, peripherals: &P) -> ConfigResult<()>
    where
        P: SamplingControl + TriggerControl + ?Sized,
    {
        config.validate::<N>()?;
        self.halt(peripherals);

        self.post_trigger_samples
            .store(config.post_trigger_samples, Ordering::Relaxed);
        self.pre_trigger_minimum
            .store(config.pre_trigger_minimum, Ordering::Relaxed);
        Ok(())
    }

    fn halt<P>(&self, peripherals: &P)
    where
        P: SamplingControl + TriggerControl + ?Sized,
    {
        self.sampling.store(false, Ordering::Release);
        peripherals.stop_sampling();
        self.armed.store(false, Ordering::Release);
        peripherals.disable_trigger();

        // A frozen capture keeps its record for readout
        if !self.frozen.load(Ordering::Acquire) {
            self.recorded.store(false, Ordering::Release);
        }
    }

    // ===== QUERIES =====

    /// Current state
    pub fn state(&self) -> CaptureState {
        if self.frozen.load(Ordering::Acquire) {
            CaptureState::Frozen
        } else if !self.sampling.load(Ordering::Acquire) {
            CaptureState::Idle
        } else if self.recorded.load(Ordering::Acquire) {
            CaptureState::WaitingForStop
        } else {
            CaptureState::Armed
        }
    }

    /// Capture complete and buffer stable
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Trigger edges are currently accepted
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Next slot to be written
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Samples still needed before a trigger is honoured
    pub fn pre_trigger_budget(&self) -> i32 {
        self.pre_trigger_budget.load(Ordering::Acquire)
    }

    /// Trigger record of the current cycle, if one was accepted
    pub fn trigger_record(&self) -> Option<TriggerRecord> {
        if !self.recorded.load(Ordering::Acquire) {
            return None;
        }

        Some(TriggerRecord {
            trigger_position: self.trigger_position.load(Ordering::Relaxed),
            stop_position: self.stop_position.load(Ordering::Relaxed),
        })
    }

    /// Capture window in effect
    pub fn config(&self) -> CaptureConfig {
        CaptureConfig {
            post_trigger_samples: self.post_trigger_samples.load(Ordering::Relaxed),
            pre_trigger_minimum: self.pre_trigger_minimum.load(Ordering::Relaxed),
        }
    }

    /// Ring capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Health counters
    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    // ===== READOUT =====

    /// Sample at an absolute slot, only while frozen
    pub fn read(&self, index: usize) -> CaptureResult<u8> {
        if !self.is_frozen() {
            return Err(CaptureError::NotFrozen);
        }

        self.buffer
            .read(index)
            .ok_or(CaptureError::IndexOutOfRange { index, capacity: N })
    }

    /// Copy of the frozen ring, oldest first, with the trigger located
    pub fn snapshot(&self) -> CaptureResult<CaptureSnapshot<N>> {
        if !self.is_frozen() {
            return Err(CaptureError::NotFrozen);
        }

        let start = self.buffer.cursor();
        let trigger_position = self.trigger_position.load(Ordering::Relaxed);

        let mut samples = [0u8; N];
        self.buffer.copy_chronological(start, &mut samples);

        Ok(CaptureSnapshot::new(
            samples,
            RingIndex::<N>::distance(start, trigger_position),
            trigger_position,
        ))
    }
}

impl<const N: usize> Default for CaptureEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for CaptureEngine<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CaptureEngine")
            .field("capacity", &N)
            .field("state", &self.state())
            .field("cursor", &self.cursor())
            .field("pre_trigger_budget", &self.pre_trigger_budget())
            .field("trigger", &self.trigger_record())
            .finish()
    }
}
