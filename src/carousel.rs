//! Carousel
//!
//! Index bookkeeping for an auto-advancing slide rotation. The host drives the timer by
//! reporting elapsed time through [`Carousel::tick`]; the carousel owns no thread or
//! callback, so tearing it down can never leave a timer behind.

use std::time::Duration;

use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::debug;

/// Default time between automatic advances.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Auto-advance timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autoplay {
    /// Advancing; `elapsed` is the time since the last advance.
    Running {
        /// Time accumulated towards the next advance
        elapsed: Duration,
    },

    /// Stopped by user interaction; can be resumed.
    Paused,

    /// Stopped for good.
    Cancelled,
}

/// Carousel
#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    interval: Duration,
    autoplay: Autoplay,
}

impl Carousel {
    /// Carousel over `len` slides, auto-advancing every [`DEFAULT_INTERVAL`].
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self::with_interval(len, DEFAULT_INTERVAL)
    }

    /// Carousel over `len` slides with a custom interval. A zero interval never fires, and
    /// neither does the timer of an empty carousel.
    #[must_use]
    pub fn with_interval(len: usize, interval: Duration) -> Self {
        debug!(len, interval = %interval.human(Truncate::Nano), "carousel started");

        Self {
            len,
            index: 0,
            interval,
            autoplay: Autoplay::Running {
                elapsed: Duration::ZERO,
            },
        }
    }

    /// Carousel that only moves on user navigation.
    #[must_use]
    pub fn manual(len: usize) -> Self {
        Self {
            autoplay: Autoplay::Cancelled,
            ..Self::new(len)
        }
    }

    /// Index of the visible slide.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there are no slides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Auto-advance interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timer state.
    #[must_use]
    pub fn autoplay(&self) -> Autoplay {
        self.autoplay
    }

    /// Show the next slide, wrapping to the first.
    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }

        self.index
    }

    /// Show the previous slide, wrapping to the last.
    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }

        self.index
    }

    /// Jump to a slide. Out of range indices are ignored.
    ///
    /// Returns `true` if the slide changed.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.index {
            return false;
        }

        self.index = index;

        true
    }

    /// Report elapsed time. Advances once for every full interval while running.
    ///
    /// Returns the number of advances made, saturating at `u32::MAX`.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        let Autoplay::Running { elapsed } = self.autoplay else {
            return 0;
        };

        if self.interval.is_zero() || self.len == 0 {
            return 0;
        }

        let elapsed = elapsed.saturating_add(delta).as_nanos();
        let interval = self.interval.as_nanos();
        let advances = elapsed / interval;
        let remainder = elapsed % interval;

        // Both are below `len`, so the sum cannot overflow.
        let len = u128::try_from(self.len).unwrap_or(u128::MAX);
        let step = usize::try_from(advances % len).unwrap_or_default();
        self.index = (self.index + step) % self.len;

        self.autoplay = Autoplay::Running {
            elapsed: nanos_to_duration(remainder),
        };

        if advances > 0 {
            debug!(index = self.index, advances, "carousel advanced");
        }

        u32::try_from(advances).unwrap_or(u32::MAX)
    }

    /// Stop auto-advancing while the shopper interacts.
    pub fn pause(&mut self) {
        if matches!(self.autoplay, Autoplay::Running { .. }) {
            self.autoplay = Autoplay::Paused;

            debug!(index = self.index, "carousel paused");
        }
    }

    /// Restart auto-advancing with a fresh interval. A cancelled carousel stays cancelled.
    pub fn resume(&mut self) {
        if self.autoplay == Autoplay::Paused {
            self.autoplay = Autoplay::Running {
                elapsed: Duration::ZERO,
            };

            debug!(index = self.index, "carousel resumed");
        }
    }

    /// Stop the timer for good, as when the owning view is torn down.
    pub fn cancel(&mut self) {
        self.autoplay = Autoplay::Cancelled;
    }
}

fn nanos_to_duration(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    let subsec = u32::try_from(nanos % NANOS_PER_SEC).unwrap_or_default();

    Duration::new(secs, subsec)
}
