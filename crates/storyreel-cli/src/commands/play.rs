use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use storyreel_core::{drive, CarouselScreen, Config, DriveExit, FinishPolicy};
use tokio::sync::oneshot;

use super::{load_items, print_event};
use crate::surfaces::{ConsoleIndicator, ConsolePaging};

#[derive(Args)]
pub struct PlayArgs {
    /// Deck file (TOML, or JSON with a .json extension)
    pub deck: PathBuf,
    /// Override the configured segment duration (ms)
    #[arg(long)]
    pub segment_ms: Option<u64>,
    /// Override the configured tick interval (ms)
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Override the finish policy (hold, dismiss, restart)
    #[arg(long)]
    pub on_finish: Option<String>,
    /// Dismiss the screen after this many ms of playback
    #[arg(long)]
    pub for_ms: Option<u64>,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(ms) = args.segment_ms {
        config.timer.segment_duration_ms = ms;
    }
    if let Some(ms) = args.tick_ms {
        config.screen.tick_interval_ms = ms;
    }
    if let Some(policy) = args.on_finish {
        config.set("screen.on_finish", &policy)?;
    }
    config.validate()?;
    if config.screen.on_finish == FinishPolicy::Restart && args.for_ms.is_none() {
        eprintln!("playing in a loop, press Ctrl-C to stop");
    }

    let items = load_items(&args.deck)?;
    let mut screen = CarouselScreen::new(
        items,
        &config,
        ConsolePaging,
        ConsoleIndicator::default(),
    )?;
    let tick = Duration::from_millis(config.screen.tick_interval_ms);
    let for_ms = args.for_ms;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let exit = runtime.block_on(async {
        let (tx, rx) = oneshot::channel();
        // Without a limit the sender is held until playback ends.
        let _held = match for_ms {
            Some(ms) => {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    let _ = tx.send(());
                });
                None
            }
            None => Some(tx),
        };
        drive(&mut screen, tick, rx, print_event).await
    })?;

    if exit == DriveExit::Dismissed {
        tracing::info!("playback stopped after time limit");
    }
    Ok(())
}
