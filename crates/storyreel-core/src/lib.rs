//! # Storyreel Core Library
//!
//! Headless core of a "stories" carousel: a paged item view, a page
//! indicator and an auto-advancing segmented progress bar that must always
//! agree on one current item. Rendering is left to the embedding app, which
//! plugs its views in through the [`PagingSurface`] and [`IndicatorControl`]
//! traits.
//!
//! ## Architecture
//!
//! - **Sync controller**: owns the current index and answers each surface
//!   event with commands for the other two surfaces only
//! - **Segmented timer**: a wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()`
//! - **Screen**: routes commands to surfaces, maps tap zones, applies the
//!   finish policy and tears the timer down on dismiss
//! - **Driver**: tokio event loop ticking a screen
//!
//! ## Key Components
//!
//! - [`IndexSyncController`]: index synchronization state machine
//! - [`SegmentedTimer`]: segment timer state machine
//! - [`CarouselScreen`]: headless screen glue
//! - [`Config`]: configuration management

pub mod carousel;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod screen;
pub mod sync;
pub mod timer;

pub use carousel::{CarouselItem, CarouselState, ContentRef, Deck, ItemId, NavigationDirection};
pub use config::{Config, FinishPolicy, IndexPolicy};
pub use driver::{drive, DriveExit};
pub use error::{CarouselError, ConfigError, CoreError, SyncError, TimerError};
pub use events::Event;
pub use screen::{CarouselScreen, IndicatorControl, PagingSurface, TapZone};
pub use sync::{Command, IndexSyncController, Surface, SyncOutcome};
pub use timer::{SegmentPlan, SegmentedTimer, TimerState};
