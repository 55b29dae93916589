//! Index synchronization controller.
//!
//! Owns the authoritative current index and answers every surface event
//! with the commands the *other two* surfaces need. A surface never gets a
//! command back for an event it produced itself, which is what keeps the
//! paging view, the indicator and the segmented timer from re-triggering
//! each other.
//!
//! ```text
//! swipe      -> indicator.set_current_page, timer.jump_to_segment
//! indicator  -> paging.show,                timer.jump_to_segment
//! timer      -> paging.show,               [indicator.set_current_page]
//! ```
//!
//! Handlers are synchronous: the index update and every derived command are
//! produced together before the caller handles the next event.

use tracing::{debug, warn};

use super::command::{Command, Surface, SyncOutcome};
use crate::carousel::{CarouselItem, CarouselState, ItemId};
use crate::config::{IndexPolicy, SyncConfig};
use crate::error::{CarouselError, SyncError};

#[derive(Debug, Clone)]
pub struct IndexSyncController {
    state: CarouselState,
    index_policy: IndexPolicy,
    push_indicator_on_timer: bool,
}

impl IndexSyncController {
    /// Create a controller with `current_index = 0`.
    ///
    /// # Errors
    ///
    /// Rejects an empty item list and duplicate ids.
    pub fn new(items: Vec<CarouselItem>, config: &SyncConfig) -> Result<Self, CarouselError> {
        Ok(Self {
            state: CarouselState::new(items)?,
            index_policy: config.index_policy,
            push_indicator_on_timer: config.push_indicator_on_timer,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    // ── Surface events ───────────────────────────────────────────────

    /// The paging surface settled on `item_id` after a user swipe.
    pub fn on_swipe_completed(&mut self, item_id: &ItemId) -> Result<SyncOutcome, SyncError> {
        let index = self
            .state
            .index_of(item_id)
            .ok_or_else(|| SyncError::UnknownItem(item_id.to_string()))?;
        self.on_swipe_completed_at(index)
    }

    /// Same as [`Self::on_swipe_completed`] for surfaces that report indices.
    pub fn on_swipe_completed_at(&mut self, index: usize) -> Result<SyncOutcome, SyncError> {
        let index = self.resolve_index(index, Surface::Paging)?;
        let previous = self.state.current_index();
        if index == previous {
            return Ok(SyncOutcome::unchanged(Some(Surface::Paging), previous));
        }

        self.state.set_current(index);
        let outcome = SyncOutcome {
            source: Some(Surface::Paging),
            previous_index: previous,
            current_index: index,
            commands: vec![
                Command::SetCurrentPage { index },
                Command::JumpToSegment { index },
            ],
            finished: false,
        };
        debug!(from = previous, to = index, "swipe completed");
        Ok(outcome)
    }

    /// The user picked a page on the indicator.
    pub fn on_indicator_changed(&mut self, index: usize) -> Result<SyncOutcome, SyncError> {
        let index = self.resolve_index(index, Surface::Indicator)?;
        let previous = self.state.current_index();
        if index == previous {
            return Ok(SyncOutcome::unchanged(Some(Surface::Indicator), previous));
        }

        let commands = vec![self.show(index), Command::JumpToSegment { index }];
        self.state.set_current(index);
        debug!(from = previous, to = index, "indicator changed");
        Ok(SyncOutcome {
            source: Some(Surface::Indicator),
            previous_index: previous,
            current_index: index,
            commands,
            finished: false,
        })
    }

    /// The segmented timer moved to another segment on its own.
    pub fn on_timer_segment_changed(&mut self, index: usize) -> Result<SyncOutcome, SyncError> {
        let index = self.resolve_index(index, Surface::Timer)?;
        let previous = self.state.current_index();
        if index == previous {
            return Ok(SyncOutcome::unchanged(Some(Surface::Timer), previous));
        }

        let mut commands = vec![self.show(index)];
        if self.push_indicator_on_timer {
            commands.push(Command::SetCurrentPage { index });
        }
        self.state.set_current(index);
        debug!(from = previous, to = index, "timer segment changed");
        Ok(SyncOutcome {
            source: Some(Surface::Timer),
            previous_index: previous,
            current_index: index,
            commands,
            finished: false,
        })
    }

    /// The last segment completed. The current index stays put.
    pub fn on_timer_finished(&mut self) -> SyncOutcome {
        let index = self.state.current_index();
        debug!(index, "timer finished");
        SyncOutcome {
            finished: true,
            ..SyncOutcome::unchanged(Some(Surface::Timer), index)
        }
    }

    // ── Screen actions ───────────────────────────────────────────────

    /// Leading tap zone. The timer decides what rewinding means and reports
    /// back through [`Self::on_timer_segment_changed`].
    pub fn rewind(&self) -> SyncOutcome {
        SyncOutcome {
            commands: vec![Command::RewindSegment],
            ..SyncOutcome::unchanged(None, self.state.current_index())
        }
    }

    /// Trailing tap zone.
    pub fn skip(&self) -> SyncOutcome {
        SyncOutcome {
            commands: vec![Command::SkipSegment],
            ..SyncOutcome::unchanged(None, self.state.current_index())
        }
    }

    /// Bring every surface back to the first item. Used by the restart
    /// finish policy; the timer always gets its jump so it replays.
    pub fn restart(&mut self) -> SyncOutcome {
        let previous = self.state.current_index();
        let mut commands = Vec::with_capacity(3);
        if previous != 0 {
            commands.push(self.show(0));
            commands.push(Command::SetCurrentPage { index: 0 });
        }
        commands.push(Command::JumpToSegment { index: 0 });
        self.state.set_current(0);
        SyncOutcome {
            source: None,
            previous_index: previous,
            current_index: 0,
            commands,
            finished: false,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn show(&self, index: usize) -> Command {
        Command::Show {
            index,
            item_id: self.state.items()[index].id.clone(),
            direction: self.state.direction_to(index),
        }
    }

    fn resolve_index(&self, index: usize, source: Surface) -> Result<usize, SyncError> {
        let len = self.state.len();
        if index < len {
            return Ok(index);
        }
        match self.index_policy {
            IndexPolicy::Strict => Err(SyncError::IndexOutOfBounds { index, len }),
            IndexPolicy::Clamp => {
                warn!(?source, index, len, "surface reported out-of-range index, clamping");
                Ok(len - 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::NavigationDirection;
    use proptest::prelude::*;

    fn items(ids: &[&str]) -> Vec<CarouselItem> {
        ids.iter()
            .map(|id| CarouselItem::new(*id, format!("{id}.png")))
            .collect()
    }

    fn strict() -> SyncConfig {
        SyncConfig {
            push_indicator_on_timer: true,
            index_policy: IndexPolicy::Strict,
        }
    }

    fn controller(ids: &[&str]) -> IndexSyncController {
        IndexSyncController::new(items(ids), &strict()).unwrap()
    }

    fn count(outcome: &SyncOutcome, surface: Surface) -> usize {
        outcome.commands_for(surface).count()
    }

    fn at(ids: &[&str], index: usize) -> IndexSyncController {
        let mut ctl = controller(ids);
        ctl.state.set_current(index);
        ctl
    }

    #[test]
    fn empty_carousel_is_rejected() {
        assert_eq!(
            IndexSyncController::new(Vec::new(), &strict()).unwrap_err(),
            CarouselError::Empty
        );
    }

    #[test]
    fn swipe_updates_indicator_and_timer_only() {
        let mut ctl = controller(&["A", "B", "C"]);
        let outcome = ctl.on_swipe_completed(&ItemId::new("B")).unwrap();

        assert_eq!(ctl.current_index(), 1);
        assert_eq!(
            outcome.commands,
            vec![
                Command::SetCurrentPage { index: 1 },
                Command::JumpToSegment { index: 1 },
            ]
        );
        assert_eq!(count(&outcome, Surface::Paging), 0);
    }

    #[test]
    fn timer_change_shows_item_and_leaves_timer_alone() {
        let mut ctl = at(&["A", "B", "C"], 1);
        let outcome = ctl.on_timer_segment_changed(2).unwrap();

        assert_eq!(ctl.current_index(), 2);
        assert_eq!(
            outcome.commands_for(Surface::Paging).collect::<Vec<_>>(),
            vec![&Command::Show {
                index: 2,
                item_id: ItemId::new("C"),
                direction: NavigationDirection::Forward,
            }]
        );
        assert_eq!(count(&outcome, Surface::Timer), 0);
        assert_eq!(count(&outcome, Surface::Indicator), 1);
    }

    #[test]
    fn timer_change_without_indicator_push() {
        let config = SyncConfig {
            push_indicator_on_timer: false,
            index_policy: IndexPolicy::Strict,
        };
        let mut ctl = IndexSyncController::new(items(&["A", "B"]), &config).unwrap();
        let outcome = ctl.on_timer_segment_changed(1).unwrap();
        assert_eq!(outcome.commands.len(), 1);
        assert_eq!(count(&outcome, Surface::Indicator), 0);
    }

    #[test]
    fn indicator_on_current_page_is_noop() {
        let mut ctl = controller(&["A", "B"]);
        let outcome = ctl.on_indicator_changed(0).unwrap();
        assert!(outcome.is_noop());
        assert!(outcome.commands.is_empty());
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn indicator_shows_item_and_jumps_timer() {
        let mut ctl = at(&["A", "B", "C"], 2);
        let outcome = ctl.on_indicator_changed(0).unwrap();
        assert_eq!(
            outcome.commands,
            vec![
                Command::Show {
                    index: 0,
                    item_id: ItemId::new("A"),
                    direction: NavigationDirection::Reverse,
                },
                Command::JumpToSegment { index: 0 },
            ]
        );
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn every_handler_is_noop_on_current_index() {
        let mut ctl = at(&["A", "B", "C"], 1);
        assert!(ctl.on_swipe_completed_at(1).unwrap().is_noop());
        assert!(ctl.on_indicator_changed(1).unwrap().is_noop());
        assert!(ctl.on_timer_segment_changed(1).unwrap().is_noop());
        assert_eq!(ctl.current_index(), 1);
    }

    #[test]
    fn timer_finished_keeps_index() {
        let mut ctl = at(&["A", "B", "C"], 2);
        let outcome = ctl.on_timer_finished();
        assert!(outcome.finished);
        assert!(outcome.commands.is_empty());
        assert_eq!(ctl.current_index(), 2);
    }

    #[test]
    fn rewind_and_skip_delegate_to_timer() {
        let ctl = controller(&["A", "B"]);
        assert_eq!(ctl.rewind().commands, vec![Command::RewindSegment]);
        assert_eq!(ctl.skip().commands, vec![Command::SkipSegment]);
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn restart_resets_all_surfaces() {
        let mut ctl = at(&["A", "B", "C"], 2);
        let outcome = ctl.restart();
        assert_eq!(ctl.current_index(), 0);
        assert_eq!(outcome.commands.len(), 3);
        assert_eq!(count(&outcome, Surface::Timer), 1);

        let again = ctl.restart();
        assert_eq!(again.commands, vec![Command::JumpToSegment { index: 0 }]);
    }

    #[test]
    fn unknown_item_is_rejected() {
        let mut ctl = controller(&["A", "B"]);
        assert_eq!(
            ctl.on_swipe_completed(&ItemId::new("Z")).unwrap_err(),
            SyncError::UnknownItem("Z".into())
        );
    }

    #[test]
    fn strict_policy_rejects_out_of_range() {
        let mut ctl = controller(&["A", "B"]);
        assert_eq!(
            ctl.on_indicator_changed(5).unwrap_err(),
            SyncError::IndexOutOfBounds { index: 5, len: 2 }
        );
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn clamp_policy_clamps_to_last() {
        let config = SyncConfig {
            push_indicator_on_timer: true,
            index_policy: IndexPolicy::Clamp,
        };
        let mut ctl = IndexSyncController::new(items(&["A", "B", "C"]), &config).unwrap();
        let outcome = ctl.on_timer_segment_changed(10).unwrap();
        assert_eq!(outcome.current_index, 2);
        assert_eq!(ctl.current_index(), 2);
    }

    #[test]
    fn direction_table_for_five_items() {
        let ids = ["A", "B", "C", "D", "E"];
        for from in 0..5 {
            for to in 0..5 {
                let expected = if to > from {
                    NavigationDirection::Forward
                } else {
                    NavigationDirection::Reverse
                };

                for via_timer in [false, true] {
                    let mut ctl = at(&ids, from);
                    let outcome = if via_timer {
                        ctl.on_timer_segment_changed(to).unwrap()
                    } else {
                        ctl.on_indicator_changed(to).unwrap()
                    };
                    if from == to {
                        assert!(outcome.is_noop());
                        continue;
                    }
                    assert!(outcome.index_changed());
                    let shown = outcome.commands_for(Surface::Paging).next();
                    match shown {
                        Some(Command::Show { direction, .. }) => {
                            assert_eq!(*direction, expected, "{from} -> {to}")
                        }
                        other => panic!("expected Show for {from} -> {to}, got {other:?}"),
                    }
                }
            }
        }
    }

    proptest! {
        #[test]
        fn handlers_never_command_their_source(
            len in 1usize..8,
            start in 0usize..8,
            target in 0usize..8,
            source in 0u8..3,
        ) {
            let start = start % len;
            let target = target % len;
            let ids: Vec<String> = (0..len).map(|i| format!("item-{i}")).collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            let mut ctl = at(&ids, start);

            let (outcome, origin) = match source {
                0 => (ctl.on_swipe_completed_at(target).unwrap(), Surface::Paging),
                1 => (ctl.on_indicator_changed(target).unwrap(), Surface::Indicator),
                _ => (ctl.on_timer_segment_changed(target).unwrap(), Surface::Timer),
            };

            prop_assert_eq!(ctl.current_index(), target);
            prop_assert_eq!(outcome.commands_for(origin).count(), 0);
            if start == target {
                prop_assert!(outcome.commands.is_empty());
            } else {
                for surface in [Surface::Paging, Surface::Indicator, Surface::Timer] {
                    if surface != origin {
                        prop_assert_eq!(outcome.commands_for(surface).count(), 1);
                    }
                }
            }
        }
    }
}
