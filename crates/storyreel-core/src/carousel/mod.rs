mod item;
mod state;

pub use item::{CarouselItem, ContentRef, Deck, DeckItem, ItemId};
pub use state::{CarouselState, NavigationDirection};
