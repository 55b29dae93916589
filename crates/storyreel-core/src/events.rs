use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sync::Command;
use crate::timer::TimerState;

/// Every state change in the carousel produces an Event.
/// The timer emits the timer variants; the screen adds the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        segment_index: usize,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        segment_index: usize,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        segment_index: usize,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// The timer moved to another segment on its own (completion, rewind, skip).
    SegmentChanged {
        from: usize,
        to: usize,
        at: DateTime<Utc>,
    },
    /// The last segment completed.
    TimerFinished {
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    /// A corrective command was pushed to a surface.
    CommandDispatched {
        command: Command,
        at: DateTime<Utc>,
    },
    /// All segments played; the current index is left where it was.
    CarouselFinished {
        index: usize,
        at: DateTime<Utc>,
    },
    ScreenDismissed {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        segment_index: usize,
        segment_count: usize,
        remaining_ms: u64,
        segment_progress: f64,
        at: DateTime<Utc>,
    },
}
