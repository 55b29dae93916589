mod carousel_screen;
mod surfaces;
mod tap;

pub use carousel_screen::CarouselScreen;
pub use surfaces::{IndicatorControl, PagingSurface};
pub use tap::TapZone;

#[cfg(test)]
pub(crate) use surfaces::recording;
