//! Event-loop driver.
//!
//! Ticks a [`CarouselScreen`] from a tokio interval until the carousel is
//! done or the embedding app dismisses it. The screen clock is the tokio
//! clock, measured from the moment the driver starts.

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::FinishPolicy;
use crate::error::Result;
use crate::events::Event;
use crate::screen::{CarouselScreen, IndicatorControl, PagingSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveExit {
    /// All segments played (or the finish policy dismissed the screen).
    Finished,
    /// The dismiss signal fired or its sender was dropped.
    Dismissed,
}

/// Play `screen` until it finishes or `dismiss` resolves, handing every
/// event to `on_event`. The screen is dismissed on every return path,
/// errors included, so no tick can reach it after teardown.
pub async fn drive<P, I, F>(
    screen: &mut CarouselScreen<P, I>,
    tick_interval: Duration,
    dismiss: oneshot::Receiver<()>,
    mut on_event: F,
) -> Result<DriveExit>
where
    P: PagingSurface,
    I: IndicatorControl,
    F: FnMut(&Event),
{
    let result = play(screen, tick_interval, dismiss, &mut on_event).await;
    match &result {
        Ok(exit) => debug!(?exit, "driver stopping"),
        Err(e) => warn!("driver stopping on error: {e}"),
    }
    for event in screen.dismiss() {
        on_event(&event);
    }
    result
}

async fn play<P, I, F>(
    screen: &mut CarouselScreen<P, I>,
    tick_interval: Duration,
    mut dismiss: oneshot::Receiver<()>,
    on_event: &mut F,
) -> Result<DriveExit>
where
    P: PagingSurface,
    I: IndicatorControl,
    F: FnMut(&Event),
{
    let origin = Instant::now();
    let clock = move || origin.elapsed().as_millis() as u64;

    for event in screen.appear_at(clock())? {
        on_event(&event);
    }

    let mut ticker = time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut dismiss => return Ok(DriveExit::Dismissed),
            _ = ticker.tick() => {
                for event in screen.tick_at(clock())? {
                    on_event(&event);
                }
                if screen.is_dismissed() {
                    return Ok(DriveExit::Finished);
                }
                // Under `hold` nothing moves once the last segment is full.
                if screen.is_finished() && screen.config().on_finish == FinishPolicy::Hold {
                    return Ok(DriveExit::Finished);
                }
            }
        }
    }
}
