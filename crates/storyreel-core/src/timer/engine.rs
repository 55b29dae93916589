//! Segmented timer engine.
//!
//! A wall-clock-based state machine driving the story progress bar. It does
//! not use internal threads - the caller is responsible for calling `tick()`
//! periodically from its event loop.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!         Finished -> Running   (rewind, jump)
//!
//! any -> Stopped                (terminal)
//! ```
//!
//! Every command has an `*_at(now_ms)` form taking the clock reading
//! explicitly; the plain form reads the system clock.
//!
//! `jump_to_segment` is how the sync controller re-aligns the timer after a
//! swipe or an indicator tap. It never emits an event, so the timer cannot
//! echo the change back to the controller.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::plan::SegmentPlan;
use crate::config::TimerConfig;
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Last segment completed; progress bar is full.
    Finished,
    /// Torn down with the screen. No further events.
    Stopped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentedTimer {
    plan: SegmentPlan,
    state: TimerState,
    active: usize,
    /// Progress into the active segment, in milliseconds.
    elapsed_ms: u64,
    /// Clock reading at the last flush while running.
    last_tick_epoch_ms: Option<u64>,
    rewind_grace_ms: u64,
}

impl SegmentedTimer {
    /// Starts `Idle` on segment 0.
    pub fn new(plan: SegmentPlan, rewind_grace_ms: u64) -> Self {
        Self {
            plan,
            state: TimerState::Idle,
            active: 0,
            elapsed_ms: 0,
            last_tick_epoch_ms: None,
            rewind_grace_ms,
        }
    }

    pub fn from_config(plan: SegmentPlan, config: &TimerConfig) -> Self {
        Self::new(plan, config.rewind_grace_ms)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn active_segment(&self) -> usize {
        self.active
    }

    pub fn segment_count(&self) -> usize {
        self.plan.len()
    }

    pub fn plan(&self) -> &SegmentPlan {
        &self.plan
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn active_duration_ms(&self) -> u64 {
        self.plan.duration_ms(self.active).unwrap_or(0)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.active_duration_ms().saturating_sub(self.elapsed_ms)
    }

    /// 0.0 .. 1.0 progress within the active segment.
    pub fn segment_progress(&self) -> f64 {
        let total = self.active_duration_ms();
        if total == 0 {
            return 0.0;
        }
        (self.elapsed_ms as f64 / total as f64).min(1.0)
    }

    /// Fill level of each progress bar segment: completed segments are full,
    /// the active one shows its progress, upcoming ones are empty.
    pub fn fill_levels(&self) -> Vec<f64> {
        (0..self.plan.len())
            .map(|i| {
                if i < self.active {
                    1.0
                } else if i == self.active {
                    self.segment_progress()
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// 0.0 .. 1.0 progress across all segments.
    pub fn overall_progress(&self) -> f64 {
        let total = self.plan.total_ms();
        if total == 0 {
            return 0.0;
        }
        let done = self
            .plan
            .cumulative_ms(self.active)
            .saturating_add(self.elapsed_ms.min(self.active_duration_ms()));
        (done as f64 / total as f64).min(1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            segment_index: self.active,
            segment_count: self.plan.len(),
            remaining_ms: self.remaining_ms(),
            segment_progress: self.segment_progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub fn start_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now_ms);
                Some(Event::TimerStarted {
                    segment_index: self.active,
                    duration_ms: self.active_duration_ms(),
                    at: Utc::now(),
                })
            }
            TimerState::Paused => self.resume_at(now_ms),
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Vec<Event> {
        self.pause_at(now_ms())
    }

    /// Flushes elapsed time first, so a pause landing past a segment
    /// boundary still reports the advance.
    pub fn pause_at(&mut self, now_ms: u64) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }
        let mut events = self.advance_clock(now_ms);
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
            self.last_tick_epoch_ms = None;
            events.push(Event::TimerPaused {
                segment_index: self.active,
                remaining_ms: self.remaining_ms(),
                at: Utc::now(),
            });
        }
        events
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.resume_at(now_ms())
    }

    pub fn resume_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        self.state = TimerState::Running;
        self.last_tick_epoch_ms = Some(now_ms);
        Some(Event::TimerResumed {
            segment_index: self.active,
            remaining_ms: self.remaining_ms(),
            at: Utc::now(),
        })
    }

    /// Call periodically. Returns `SegmentChanged` for each completed
    /// segment and `TimerFinished` once the last one completes.
    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Event> {
        match self.state {
            TimerState::Running => self.advance_clock(now_ms),
            _ => Vec::new(),
        }
    }

    pub fn skip(&mut self) -> Vec<Event> {
        self.skip_at(now_ms())
    }

    /// Complete the active segment now. Skipping the last segment finishes
    /// the timer. A paused timer stays paused on the next segment.
    pub fn skip_at(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = match self.state {
            TimerState::Stopped | TimerState::Finished => return Vec::new(),
            TimerState::Running => self.advance_clock(now_ms),
            TimerState::Idle | TimerState::Paused => Vec::new(),
        };
        if self.state == TimerState::Finished {
            return events;
        }

        if self.active + 1 < self.plan.len() {
            let from = self.active;
            self.active += 1;
            self.elapsed_ms = 0;
            if self.state == TimerState::Running {
                self.last_tick_epoch_ms = Some(now_ms);
            }
            events.push(Event::SegmentChanged {
                from,
                to: self.active,
                at: Utc::now(),
            });
        } else {
            self.elapsed_ms = self.active_duration_ms();
            self.finish(&mut events);
        }
        events
    }

    pub fn rewind(&mut self) -> Vec<Event> {
        self.rewind_at(now_ms())
    }

    /// Restart the active segment, or go back one segment when the active
    /// segment is within the rewind grace window of its start. Segment 0
    /// only restarts. A finished timer replays its last segment.
    pub fn rewind_at(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = match self.state {
            TimerState::Stopped => return Vec::new(),
            TimerState::Running => self.advance_clock(now_ms),
            _ => Vec::new(),
        };

        if self.state == TimerState::Finished {
            self.elapsed_ms = 0;
            self.state = TimerState::Running;
            self.last_tick_epoch_ms = Some(now_ms);
            events.push(Event::TimerResumed {
                segment_index: self.active,
                remaining_ms: self.remaining_ms(),
                at: Utc::now(),
            });
            return events;
        }

        if self.elapsed_ms <= self.rewind_grace_ms && self.active > 0 {
            let from = self.active;
            self.active -= 1;
            events.push(Event::SegmentChanged {
                from,
                to: self.active,
                at: Utc::now(),
            });
        }
        self.elapsed_ms = 0;
        if self.state == TimerState::Running {
            self.last_tick_epoch_ms = Some(now_ms);
        }
        events
    }

    pub fn jump_to_segment(&mut self, index: usize) -> Result<(), TimerError> {
        self.jump_to_segment_at(index, now_ms())
    }

    /// Make `index` the active segment from its start. Emits nothing.
    /// A finished timer starts running again.
    pub fn jump_to_segment_at(&mut self, index: usize, now_ms: u64) -> Result<(), TimerError> {
        if self.state == TimerState::Stopped {
            return Err(TimerError::Stopped);
        }
        if index >= self.plan.len() {
            return Err(TimerError::SegmentOutOfBounds {
                index,
                len: self.plan.len(),
            });
        }
        self.active = index;
        self.elapsed_ms = 0;
        match self.state {
            TimerState::Running => self.last_tick_epoch_ms = Some(now_ms),
            TimerState::Finished => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now_ms);
            }
            _ => {}
        }
        Ok(())
    }

    /// Tear down. Pending ticks become no-ops for good.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state == TimerState::Stopped {
            return None;
        }
        self.state = TimerState::Stopped;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerStopped { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Add the time since the last flush, advancing through every segment
    /// it completes. Overshoot carries into the next segment.
    fn advance_clock(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(last) = self.last_tick_epoch_ms else {
            return events;
        };
        self.elapsed_ms = self.elapsed_ms.saturating_add(now_ms.saturating_sub(last));
        self.last_tick_epoch_ms = Some(now_ms);

        loop {
            let duration = self.active_duration_ms();
            if self.elapsed_ms < duration {
                break;
            }
            if self.active + 1 < self.plan.len() {
                let from = self.active;
                self.elapsed_ms -= duration;
                self.active += 1;
                events.push(Event::SegmentChanged {
                    from,
                    to: self.active,
                    at: Utc::now(),
                });
            } else {
                self.elapsed_ms = duration;
                self.finish(&mut events);
                break;
            }
        }
        events
    }

    fn finish(&mut self, events: &mut Vec<Event>) {
        self.state = TimerState::Finished;
        self.last_tick_epoch_ms = None;
        events.push(Event::TimerFinished { at: Utc::now() });
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
