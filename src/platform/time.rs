//! Frame timing
//!
//! The simulation only ever sees a millisecond timestamp and a frame
//! duration. Where they come from is up to the clock.

use std::time::Instant;

/// Monotonic millisecond clock
pub trait FrameClock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl FrameClock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to (tests, headless runs)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    pub now: u64,
}

impl ManualClock {
    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

/// Timestamp and duration of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub now_ms: u64,
    /// Seconds since the previous frame
    pub dt: f32,
    pub frame_number: u64,
}

/// Turns clock readings into frame ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    last_ms: Option<u64>,
    frame_number: u64,
    /// Longest frame passed on to the simulation (seconds)
    pub max_dt: f32,
}

impl FrameTimer {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            frame_number: 0,
            max_dt,
        }
    }

    /// Read the clock once and produce this frame's tick.
    ///
    /// The first frame has `dt == 0`, so it is skipped by the step.
    pub fn tick(&mut self, clock: &impl FrameClock) -> FrameTick {
        let now_ms = clock.now_ms();
        let elapsed = self.last_ms.map_or(0, |last| now_ms.saturating_sub(last));
        self.last_ms = Some(now_ms);
        self.frame_number += 1;

        let mut dt = elapsed as f32 / 1000.0;
        if self.max_dt > 0.0 {
            dt = dt.min(self.max_dt);
        }

        FrameTick {
            now_ms,
            dt,
            frame_number: self.frame_number,
        }
    }
}
