//! Frame timing and delta time.
//!
//! The [`Clock`] is ticked by the engine once per frame. Each tick produces a
//! [`Time`] snapshot that entities read through their context: the delta
//! since the previous frame and the total time since the first frame.
//!
//! Where the clock reads "now" from is a [`TimeSource`]. The engine uses
//! [`WallTime`] by default; tests and headless runs plug in [`ManualTime`]
//! and advance it by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time measured from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`].
pub struct WallTime {
    origin: Instant,
}

impl WallTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A time source that only moves when told to.
///
/// Cloning shares the underlying counter, so a test can keep one handle and
/// give the other to the engine.
#[derive(Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Per-frame timing snapshot handed to entities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    /// Build a snapshot directly. Useful when driving a scene without a clock.
    pub fn new(delta: Duration, elapsed: Duration, frame_count: u64) -> Self {
        Self {
            delta,
            elapsed,
            frame_count,
        }
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since the first frame.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of frames ticked so far, including this one.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

/// Produces delta time from a [`TimeSource`].
pub struct Clock {
    source: Box<dyn TimeSource>,
    first: Option<Duration>,
    last: Option<Duration>,
    time: Time,
}

impl Clock {
    pub fn new(source: impl TimeSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            first: None,
            last: None,
            time: Time::default(),
        }
    }

    /// A clock reading wall time.
    pub fn wall() -> Self {
        Self::new(WallTime::new())
    }

    /// Advance to "now" and return the seconds since the previous tick.
    ///
    /// The first tick has no previous frame and returns `0.0`. A source that
    /// goes backwards yields a zero delta rather than a negative one.
    pub fn tick(&mut self) -> f32 {
        let now = self.source.now();
        let first = *self.first.get_or_insert(now);
        let delta = match self.last {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.time = Time {
            delta,
            elapsed: now.saturating_sub(first),
            frame_count: self.time.frame_count + 1,
        };
        self.time.delta_secs()
    }

    /// The snapshot produced by the most recent tick.
    pub fn time(&self) -> Time {
        self.time
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::wall()
    }
}
