use serde::{Deserialize, Serialize};

/// Horizontal tap zones over the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TapZone {
    /// Leading edge strip.
    Rewind,
    /// Trailing edge strip.
    Skip,
    /// Everything in between; taps here do nothing.
    Content,
}

impl TapZone {
    /// Classify a tap at `x` on a surface `width` wide. Each edge zone
    /// covers `fraction` of the width.
    pub fn locate(x: f64, width: f64, fraction: f64) -> Self {
        if width <= 0.0 || !x.is_finite() || x < 0.0 || x >= width {
            return TapZone::Content;
        }
        let rel = x / width;
        if rel < fraction {
            TapZone::Rewind
        } else if rel >= 1.0 - fraction {
            TapZone::Skip
        } else {
            TapZone::Content
        }
    }
}
