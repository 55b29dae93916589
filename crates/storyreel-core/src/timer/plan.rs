use serde::{Deserialize, Serialize};

use crate::carousel::CarouselItem;
use crate::error::TimerError;

/// Ordered segment durations, one segment per carousel item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPlan {
    durations_ms: Vec<u64>,
}

impl SegmentPlan {
    /// # Errors
    ///
    /// Rejects an empty plan and zero-length segments.
    pub fn new(durations_ms: Vec<u64>) -> Result<Self, TimerError> {
        if durations_ms.is_empty() {
            return Err(TimerError::EmptyPlan);
        }
        if let Some(index) = durations_ms.iter().position(|d| *d == 0) {
            return Err(TimerError::ZeroDuration { index });
        }
        Ok(Self { durations_ms })
    }

    pub fn uniform(count: usize, duration_ms: u64) -> Result<Self, TimerError> {
        Self::new(vec![duration_ms; count])
    }

    /// One segment per item, using the item's own duration when it has one.
    pub fn for_items(items: &[CarouselItem], default_ms: u64) -> Result<Self, TimerError> {
        Self::new(
            items
                .iter()
                .map(|item| item.duration_ms.unwrap_or(default_ms))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations_ms.is_empty()
    }

    pub fn duration_ms(&self, index: usize) -> Option<u64> {
        self.durations_ms.get(index).copied()
    }

    pub fn total_ms(&self) -> u64 {
        self.durations_ms
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(*d))
    }

    /// Milliseconds completed before `index` starts.
    pub fn cumulative_ms(&self, index: usize) -> u64 {
        self.durations_ms
            .iter()
            .take(index)
            .fold(0u64, |acc, d| acc.saturating_add(*d))
    }
}
