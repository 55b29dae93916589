mod engine;
mod plan;

pub use engine::{SegmentedTimer, TimerState};
pub use plan::SegmentPlan;
