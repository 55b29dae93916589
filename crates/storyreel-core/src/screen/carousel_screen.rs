//! Headless carousel screen.
//!
//! Wires the sync controller to the paging surface, the indicator and the
//! segmented timer. Surface events go to the controller; the commands it
//! returns are pushed to their surfaces; timer events produced by those
//! pushes (rewind, skip) go back through the controller within the same
//! call, so every entry point returns with all three surfaces settled.
//!
//! All entry points take the clock reading explicitly (`now_ms`); the
//! driver feeds them from its event loop.

use chrono::Utc;
use std::collections::VecDeque;
use tracing::{debug, info};

use super::surfaces::{IndicatorControl, PagingSurface};
use super::tap::TapZone;
use crate::carousel::{CarouselItem, ItemId, NavigationDirection};
use crate::config::{Config, FinishPolicy, ScreenConfig};
use crate::error::Result;
use crate::events::Event;
use crate::sync::{Command, IndexSyncController, SyncOutcome};
use crate::timer::{SegmentPlan, SegmentedTimer, TimerState};

pub struct CarouselScreen<P, I> {
    controller: IndexSyncController,
    timer: SegmentedTimer,
    paging: P,
    indicator: I,
    config: ScreenConfig,
    dismissed: bool,
}

impl<P: PagingSurface, I: IndicatorControl> CarouselScreen<P, I> {
    /// Build the screen and put both surfaces on the first item. The timer
    /// stays idle until [`Self::appear_at`].
    ///
    /// # Errors
    ///
    /// Rejects an empty item list, duplicate ids and zero segment durations.
    pub fn new(
        items: Vec<CarouselItem>,
        config: &Config,
        mut paging: P,
        mut indicator: I,
    ) -> Result<Self> {
        let controller = IndexSyncController::new(items, &config.sync)?;
        let plan = SegmentPlan::for_items(
            controller.state().items(),
            config.timer.segment_duration_ms,
        )?;
        let timer = SegmentedTimer::from_config(plan, &config.timer);

        paging.show(
            controller.state().current_item(),
            controller.current_index(),
            NavigationDirection::Forward,
        );
        indicator.set_number_of_pages(controller.len());
        indicator.set_current_page(controller.current_index());

        Ok(Self {
            controller,
            timer,
            paging,
            indicator,
            config: config.screen.clone(),
            dismissed: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_index(&self) -> usize {
        self.controller.current_index()
    }

    pub fn current_item(&self) -> &CarouselItem {
        self.controller.state().current_item()
    }

    pub fn controller(&self) -> &IndexSyncController {
        &self.controller
    }

    pub fn timer(&self) -> &SegmentedTimer {
        &self.timer
    }

    pub fn paging(&self) -> &P {
        &self.paging
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.timer.state() == TimerState::Finished
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Item a backward swipe would reveal (wraps to the last item).
    pub fn preview_before(&self) -> &CarouselItem {
        let state = self.controller.state();
        state.item_before(state.current_index())
    }

    /// Item a forward swipe would reveal (wraps to the first item).
    pub fn preview_after(&self) -> &CarouselItem {
        let state = self.controller.state();
        state.item_after(state.current_index())
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// The screen became visible: start playing.
    pub fn appear_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        Ok(self.timer.start_at(now_ms).into_iter().collect())
    }

    /// Stop the timer for good. Later calls are ignored.
    pub fn dismiss(&mut self) -> Vec<Event> {
        if self.dismissed {
            return Vec::new();
        }
        self.dismissed = true;
        info!(index = self.current_index(), "carousel dismissed");
        let mut events: Vec<Event> = self.timer.stop().into_iter().collect();
        events.push(Event::ScreenDismissed { at: Utc::now() });
        events
    }

    // ── Event loop entry points ──────────────────────────────────────

    pub fn tick_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        let events = self.timer.tick_at(now_ms);
        self.settle_timer_events(events, now_ms)
    }

    pub fn pause_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        let events = self.timer.pause_at(now_ms);
        self.settle_timer_events(events, now_ms)
    }

    pub fn resume_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        Ok(self.timer.resume_at(now_ms).into_iter().collect())
    }

    /// The paging surface settled on `item_id` after a user swipe.
    pub fn swipe_completed_at(&mut self, item_id: &ItemId, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        let outcome = self.controller.on_swipe_completed(item_id)?;
        self.settle(VecDeque::from([outcome]), now_ms, Vec::new())
    }

    /// The user picked page `index` on the indicator.
    pub fn indicator_tapped_at(&mut self, index: usize, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        let outcome = self.controller.on_indicator_changed(index)?;
        self.settle(VecDeque::from([outcome]), now_ms, Vec::new())
    }

    pub fn rewind_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        let outcome = self.controller.rewind();
        self.settle(VecDeque::from([outcome]), now_ms, Vec::new())
    }

    pub fn skip_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        if self.dismissed {
            return Ok(Vec::new());
        }
        let outcome = self.controller.skip();
        self.settle(VecDeque::from([outcome]), now_ms, Vec::new())
    }

    /// Tap at `x` on a surface `width` wide: leading zone rewinds, trailing
    /// zone skips, the middle is ignored.
    pub fn tap_at(&mut self, x: f64, width: f64, now_ms: u64) -> Result<Vec<Event>> {
        match TapZone::locate(x, width, self.config.tap_zone_fraction) {
            TapZone::Rewind => self.rewind_at(now_ms),
            TapZone::Skip => self.skip_at(now_ms),
            TapZone::Content => Ok(Vec::new()),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn settle_timer_events(&mut self, events: Vec<Event>, now_ms: u64) -> Result<Vec<Event>> {
        let mut out = Vec::new();
        let mut outcomes = VecDeque::new();
        self.absorb_timer_events(events, &mut outcomes, &mut out)?;
        self.settle(outcomes, now_ms, out)
    }

    /// Timer events go to the controller; the outcomes are queued.
    fn absorb_timer_events(
        &mut self,
        events: Vec<Event>,
        outcomes: &mut VecDeque<SyncOutcome>,
        out: &mut Vec<Event>,
    ) -> Result<()> {
        for event in events {
            match &event {
                Event::SegmentChanged { to, .. } => {
                    outcomes.push_back(self.controller.on_timer_segment_changed(*to)?);
                }
                Event::TimerFinished { .. } => {
                    outcomes.push_back(self.controller.on_timer_finished());
                }
                _ => {}
            }
            out.push(event);
        }
        Ok(())
    }

    /// Push every queued command until nothing is left to propagate.
    fn settle(
        &mut self,
        mut outcomes: VecDeque<SyncOutcome>,
        now_ms: u64,
        mut out: Vec<Event>,
    ) -> Result<Vec<Event>> {
        while let Some(outcome) = outcomes.pop_front() {
            if self.dismissed {
                break;
            }
            if outcome.index_changed() {
                debug!(
                    source = ?outcome.source,
                    from = outcome.previous_index,
                    to = outcome.current_index,
                    "index changed"
                );
            }
            if outcome.finished {
                self.handle_finished(&mut outcomes, &mut out);
            }
            for command in outcome.commands {
                if self.dismissed {
                    break;
                }
                let timer_events = self.dispatch(&command, now_ms)?;
                out.push(Event::CommandDispatched {
                    command,
                    at: Utc::now(),
                });
                self.absorb_timer_events(timer_events, &mut outcomes, &mut out)?;
            }
        }
        Ok(out)
    }

    fn dispatch(&mut self, command: &Command, now_ms: u64) -> Result<Vec<Event>> {
        debug!(target_surface = ?command.target(), ?command, "dispatch");
        match command {
            Command::Show {
                index, direction, ..
            } => {
                let item = &self.controller.state().items()[*index];
                self.paging.show(item, *index, *direction);
                Ok(Vec::new())
            }
            Command::SetCurrentPage { index } => {
                self.indicator.set_current_page(*index);
                Ok(Vec::new())
            }
            Command::JumpToSegment { index } => {
                self.timer.jump_to_segment_at(*index, now_ms)?;
                Ok(Vec::new())
            }
            Command::RewindSegment => Ok(self.timer.rewind_at(now_ms)),
            Command::SkipSegment => Ok(self.timer.skip_at(now_ms)),
        }
    }

    fn handle_finished(&mut self, outcomes: &mut VecDeque<SyncOutcome>, out: &mut Vec<Event>) {
        let index = self.current_index();
        info!(index, policy = ?self.config.on_finish, "carousel finished");
        out.push(Event::CarouselFinished {
            index,
            at: Utc::now(),
        });
        match self.config.on_finish {
            FinishPolicy::Hold => {}
            FinishPolicy::Dismiss => out.extend(self.dismiss()),
            FinishPolicy::Restart => outcomes.push_back(self.controller.restart()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexPolicy;
    use crate::error::{CarouselError, CoreError, SyncError};
    use crate::screen::surfaces::recording::{RecordingIndicator, RecordingPaging};

    type TestScreen = CarouselScreen<RecordingPaging, RecordingIndicator>;

    fn config() -> Config {
        let mut config = Config::default();
        config.timer.segment_duration_ms = 1_000;
        config.timer.rewind_grace_ms = 200;
        config.sync.index_policy = IndexPolicy::Strict;
        config
    }

    fn items(ids: &[&str]) -> Vec<CarouselItem> {
        ids.iter()
            .map(|id| CarouselItem::new(*id, format!("{id}.png")))
            .collect()
    }

    fn screen_with(ids: &[&str], config: &Config) -> TestScreen {
        CarouselScreen::new(
            items(ids),
            config,
            RecordingPaging::default(),
            RecordingIndicator::default(),
        )
        .unwrap()
    }

    fn screen(ids: &[&str]) -> TestScreen {
        screen_with(ids, &config())
    }

    fn dispatched(events: &[Event]) -> Vec<&Command> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::CommandDispatched { command, .. } => Some(command),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_shows_first_item_everywhere() {
        let s = screen(&["A", "B", "C"]);
        assert_eq!(
            s.paging().shown,
            vec![(ItemId::new("A"), 0, NavigationDirection::Forward)]
        );
        assert_eq!(s.indicator().pages, 3);
        assert_eq!(s.indicator().current, vec![0]);
        assert_eq!(s.timer().state(), TimerState::Idle);
    }

    #[test]
    fn empty_carousel_fails_fast() {
        let result = CarouselScreen::new(
            Vec::new(),
            &config(),
            RecordingPaging::default(),
            RecordingIndicator::default(),
        );
        assert!(matches!(
            result,
            Err(CoreError::Carousel(CarouselError::Empty))
        ));
    }

    #[test]
    fn swipe_leaves_paging_untouched() {
        let mut s = screen(&["A", "B", "C"]);
        s.appear_at(0).unwrap();
        s.swipe_completed_at(&ItemId::new("B"), 100).unwrap();

        assert_eq!(s.current_index(), 1);
        assert_eq!(s.paging().shown.len(), 1);
        assert_eq!(s.indicator().current, vec![0, 1]);
        assert_eq!(s.timer().active_segment(), 1);
        assert_eq!(s.timer().elapsed_ms(), 0);
    }

    #[test]
    fn timer_advance_shows_next_item() {
        let mut s = screen(&["A", "B", "C"]);
        s.appear_at(0).unwrap();
        let events = s.tick_at(1_050).unwrap();

        assert_eq!(s.current_index(), 1);
        assert_eq!(
            s.paging().shown.last(),
            Some(&(ItemId::new("B"), 1, NavigationDirection::Forward))
        );
        assert_eq!(s.indicator().current, vec![0, 1]);
        assert!(dispatched(&events)
            .iter()
            .all(|c| !matches!(c, Command::JumpToSegment { .. })));
    }

    #[test]
    fn indicator_tap_leaves_indicator_untouched() {
        let mut s = screen(&["A", "B", "C"]);
        s.appear_at(0).unwrap();
        s.indicator_tapped_at(2, 10).unwrap();

        assert_eq!(s.current_index(), 2);
        assert_eq!(s.indicator().current, vec![0]);
        assert_eq!(
            s.paging().shown.last(),
            Some(&(ItemId::new("C"), 2, NavigationDirection::Forward))
        );
        assert_eq!(s.timer().active_segment(), 2);
    }

    #[test]
    fn indicator_on_current_page_does_nothing() {
        let mut s = screen(&["A", "B"]);
        let events = s.indicator_tapped_at(0, 0).unwrap();
        assert!(events.is_empty());
        assert_eq!(s.paging().shown.len(), 1);
        assert_eq!(s.indicator().current, vec![0]);
    }

    #[test]
    fn skip_tap_flows_back_through_controller() {
        let mut s = screen(&["A", "B", "C"]);
        s.appear_at(0).unwrap();
        let events = s.tap_at(390.0, 400.0, 300).unwrap();

        assert_eq!(s.current_index(), 1);
        assert_eq!(s.timer().active_segment(), 1);
        assert_eq!(
            s.paging().shown.last(),
            Some(&(ItemId::new("B"), 1, NavigationDirection::Forward))
        );
        assert!(matches!(dispatched(&events)[0], Command::SkipSegment));
    }

    #[test]
    fn rewind_tap_goes_back_within_grace() {
        let mut s = screen(&["A", "B", "C"]);
        s.appear_at(0).unwrap();
        s.skip_at(0).unwrap();
        s.tap_at(5.0, 400.0, 100).unwrap();

        assert_eq!(s.current_index(), 0);
        assert_eq!(
            s.paging().shown.last(),
            Some(&(ItemId::new("A"), 0, NavigationDirection::Reverse))
        );
    }

    #[test]
    fn middle_tap_is_ignored() {
        let mut s = screen(&["A", "B"]);
        s.appear_at(0).unwrap();
        assert!(s.tap_at(200.0, 400.0, 10).unwrap().is_empty());
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn hold_policy_keeps_last_item() {
        let mut s = screen(&["A", "B"]);
        s.appear_at(0).unwrap();
        let events = s.tick_at(10_000).unwrap();

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::CarouselFinished { index: 1, .. })));
        assert_eq!(s.current_index(), 1);
        assert!(s.is_finished());
        assert!(!s.is_dismissed());
    }

    #[test]
    fn dismiss_policy_tears_down() {
        let mut config = config();
        config.screen.on_finish = FinishPolicy::Dismiss;
        let mut s = screen_with(&["A", "B"], &config);
        s.appear_at(0).unwrap();
        s.skip_at(0).unwrap();
        let events = s.skip_at(10).unwrap();

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ScreenDismissed { .. })));
        assert!(s.is_dismissed());
        assert_eq!(s.timer().state(), TimerState::Stopped);
        assert!(s.tick_at(50_000).unwrap().is_empty());
    }

    #[test]
    fn restart_policy_plays_again() {
        let mut config = config();
        config.screen.on_finish = FinishPolicy::Restart;
        let mut s = screen_with(&["A", "B", "C"], &config);
        s.appear_at(0).unwrap();
        s.tick_at(3_000).unwrap();

        assert_eq!(s.current_index(), 0);
        assert_eq!(s.timer().active_segment(), 0);
        assert_eq!(s.timer().state(), TimerState::Running);
        assert_eq!(
            s.paging().shown.last(),
            Some(&(ItemId::new("A"), 0, NavigationDirection::Reverse))
        );
        assert_eq!(s.indicator().current.last(), Some(&0));
    }

    #[test]
    fn swipe_after_finish_resumes_timer() {
        let mut s = screen(&["A", "B"]);
        s.appear_at(0).unwrap();
        s.tick_at(5_000).unwrap();
        s.swipe_completed_at(&ItemId::new("A"), 5_000).unwrap();
        assert_eq!(s.timer().state(), TimerState::Running);
        assert_eq!(s.timer().active_segment(), 0);
    }

    #[test]
    fn dismissed_screen_ignores_everything() {
        let mut s = screen(&["A", "B", "C"]);
        s.appear_at(0).unwrap();
        assert!(!s.dismiss().is_empty());
        assert!(s.dismiss().is_empty());

        assert!(s.tick_at(9_000).unwrap().is_empty());
        assert!(s.swipe_completed_at(&ItemId::new("B"), 9_000).unwrap().is_empty());
        assert!(s.indicator_tapped_at(2, 9_000).unwrap().is_empty());
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn unknown_swipe_target_is_an_error() {
        let mut s = screen(&["A", "B"]);
        let err = s.swipe_completed_at(&ItemId::new("nope"), 0).unwrap_err();
        assert!(matches!(err, CoreError::Sync(SyncError::UnknownItem(_))));
    }

    #[test]
    fn previews_wrap_around() {
        let mut s = screen(&["A", "B", "C", "D"]);
        assert_eq!(s.preview_before().id.as_str(), "D");
        assert_eq!(s.preview_after().id.as_str(), "B");
        s.indicator_tapped_at(3, 0).unwrap();
        assert_eq!(s.preview_after().id.as_str(), "A");
    }

    #[test]
    fn pause_keeps_progress() {
        let mut s = screen(&["A", "B"]);
        s.appear_at(0).unwrap();
        s.pause_at(400).unwrap();
        s.tick_at(5_000).unwrap();
        assert_eq!(s.current_index(), 0);
        s.resume_at(5_000).unwrap();
        s.tick_at(5_700).unwrap();
        assert_eq!(s.current_index(), 1);
    }
}
