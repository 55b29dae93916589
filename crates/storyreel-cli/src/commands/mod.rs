pub mod config;
pub mod play;
pub mod replay;

use std::path::Path;
use storyreel_core::{CarouselItem, Deck, Event};

pub(crate) fn load_items(path: &Path) -> Result<Vec<CarouselItem>, Box<dyn std::error::Error>> {
    Ok(Deck::load(path)?.into_items())
}

pub(crate) fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("could not serialize event: {e}"),
    }
}
