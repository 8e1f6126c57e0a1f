//! Frame pacing
//!
//! Caps the loop at a fixed rate. Each frame sleeps for whatever is left of the
//! target interval, corrected by a low-pass filtered estimate of how far the
//! previous sleeps over- or undershot. Work that overruns the interval never
//! sleeps, and the simulation is never stepped more than once per frame to
//! catch up.

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::SLEEP_ADJUST_DECAY;
use crate::error::{SimError, SimResult};

/// Monotonic time source with a blocking sleep
pub trait Clock {
    /// Time since an arbitrary fixed origin
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// How long to sleep after `elapsed` of work, if at all
///
/// `adjustment` is in seconds and may be negative.
pub fn compute_sleep(target: Duration, elapsed: Duration, adjustment: f64) -> Option<Duration> {
    let secs = target.as_secs_f64() - elapsed.as_secs_f64() + adjustment;
    (secs > 0.0).then(|| Duration::from_secs_f64(secs))
}

/// First-order low-pass update of the sleep adjustment
pub fn filter_adjustment(adjustment: f64, target: Duration, frame_time: Duration) -> f64 {
    SLEEP_ADJUST_DECAY * adjustment
        + (1.0 - SLEEP_ADJUST_DECAY) * (target.as_secs_f64() - frame_time.as_secs_f64())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal; no further frames run
    ShuttingDown,
}

/// Timing of one paced frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Time spent in the frame body
    pub elapsed: Duration,
    /// Requested sleep, if any
    pub slept: Option<Duration>,
    /// Full frame time including the sleep
    pub frame_time: Duration,
}

const FPS_WINDOW: usize = 60;

/// Rolling frame statistics
#[derive(Debug, Clone)]
pub struct FrameStats {
    frames: u64,
    window: [Duration; FPS_WINDOW],
    index: usize,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frames: 0,
            window: [Duration::ZERO; FPS_WINDOW],
            index: 0,
        }
    }
}

impl FrameStats {
    fn record(&mut self, frame_time: Duration) {
        self.window[self.index] = frame_time;
        self.index = (self.index + 1) % FPS_WINDOW;
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame_time(&self) -> Duration {
        self.window[(self.index + FPS_WINDOW - 1) % FPS_WINDOW]
    }

    /// Average frames per second over the last 60 frames
    pub fn fps(&self) -> f64 {
        let count = (self.frames as usize).min(FPS_WINDOW);
        let total: Duration = self.window[..count].iter().sum();
        if total.is_zero() {
            0.0
        } else {
            count as f64 / total.as_secs_f64()
        }
    }
}

pub struct FramePacer<C: Clock> {
    clock: C,
    target: Duration,
    /// Seconds added to each sleep; negative when sleeps overshoot
    adjustment: f64,
    state: LoopState,
    stats: FrameStats,
}

impl<C: Clock> FramePacer<C> {
    pub fn new(clock: C, target_fps: f64) -> SimResult<Self> {
        let target = Duration::try_from_secs_f64(1.0 / target_fps)
            .ok()
            .filter(|target| target_fps.is_finite() && !target.is_zero())
            .ok_or_else(|| SimError::invalid("pacing.target_fps", "must be positive"))?;
        Ok(Self {
            clock,
            target,
            adjustment: 0.0,
            state: LoopState::Running,
            stats: FrameStats::default(),
        })
    }

    /// Run `body` once and pace to the target interval
    pub fn run_frame<T>(&mut self, body: impl FnOnce() -> T) -> SimResult<(T, FrameTiming)> {
        if self.state == LoopState::ShuttingDown {
            return Err(SimError::AlreadyShutDown);
        }

        let start = self.clock.now();
        let output = body();
        let elapsed = self.clock.now().saturating_sub(start);

        let slept = compute_sleep(self.target, elapsed, self.adjustment);
        if let Some(duration) = slept {
            self.clock.sleep(duration);
        }

        let frame_time = self.clock.now().saturating_sub(start);
        self.adjustment = filter_adjustment(self.adjustment, self.target, frame_time);
        self.stats.record(frame_time);

        let timing = FrameTiming {
            elapsed,
            slept,
            frame_time,
        };
        log::trace!(
            "frame {}: work {:?}, sleep {:?}, frame {:?}, adjust {:+.3}ms",
            self.stats.frames(),
            elapsed,
            slept,
            frame_time,
            self.adjustment * 1000.0
        );
        Ok((output, timing))
    }

    /// Enter the terminal state. Returns `true` only on the first call.
    pub fn shut_down(&mut self) -> bool {
        let first = self.state == LoopState::Running;
        self.state = LoopState::ShuttingDown;
        first
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn adjustment(&self) -> f64 {
        self.adjustment
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}
