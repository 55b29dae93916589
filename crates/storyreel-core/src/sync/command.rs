use serde::{Deserialize, Serialize};

use crate::carousel::{ItemId, NavigationDirection};

/// The three collaborators the controller keeps in agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Paging,
    Indicator,
    Timer,
}

/// Corrective command pushed to one surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Paging surface: transition to `item_id` (at `index`).
    Show {
        index: usize,
        item_id: ItemId,
        direction: NavigationDirection,
    },
    /// Indicator: highlight `index`.
    SetCurrentPage { index: usize },
    /// Timer: make `index` the active segment, from its start.
    JumpToSegment { index: usize },
    /// Timer: rewind one segment.
    RewindSegment,
    /// Timer: complete the active segment now.
    SkipSegment,
}

impl Command {
    pub fn target(&self) -> Surface {
        match self {
            Command::Show { .. } => Surface::Paging,
            Command::SetCurrentPage { .. } => Surface::Indicator,
            Command::JumpToSegment { .. } | Command::RewindSegment | Command::SkipSegment => {
                Surface::Timer
            }
        }
    }
}

/// Result of one controller handler: the index transition and every
/// command the caller must push, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncOutcome {
    /// Surface that reported the event; `None` for screen-initiated actions.
    pub source: Option<Surface>,
    pub previous_index: usize,
    pub current_index: usize,
    pub commands: Vec<Command>,
    /// Set by the timer-finished path.
    pub finished: bool,
}

impl SyncOutcome {
    pub(crate) fn unchanged(source: Option<Surface>, index: usize) -> Self {
        Self {
            source,
            previous_index: index,
            current_index: index,
            commands: Vec::new(),
            finished: false,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.commands.is_empty() && !self.finished
    }

    pub fn index_changed(&self) -> bool {
        self.previous_index != self.current_index
    }

    pub fn commands_for(&self, surface: Surface) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(move |c| c.target() == surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_route_to_their_surface() {
        let show = Command::Show {
            index: 1,
            item_id: ItemId::new("b"),
            direction: NavigationDirection::Forward,
        };
        assert_eq!(show.target(), Surface::Paging);
        assert_eq!(
            Command::SetCurrentPage { index: 0 }.target(),
            Surface::Indicator
        );
        assert_eq!(Command::JumpToSegment { index: 2 }.target(), Surface::Timer);
        assert_eq!(Command::RewindSegment.target(), Surface::Timer);
        assert_eq!(Command::SkipSegment.target(), Surface::Timer);
    }

    #[test]
    fn command_serializes_with_tag() {
        let json = serde_json::to_value(Command::JumpToSegment { index: 3 }).unwrap();
        assert_eq!(json["command"], "jump_to_segment");
        assert_eq!(json["index"], 3);
    }
}
