//! Console stand-ins for the paging view and the page indicator.

use storyreel_core::{CarouselItem, IndicatorControl, NavigationDirection, PagingSurface};
use tracing::info;

#[derive(Debug, Default)]
pub struct ConsolePaging;

impl PagingSurface for ConsolePaging {
    fn show(&mut self, item: &CarouselItem, index: usize, direction: NavigationDirection) {
        info!(
            index,
            id = %item.id,
            content = item.content.as_str(),
            ?direction,
            "paging: show"
        );
    }
}

#[derive(Debug, Default)]
pub struct ConsoleIndicator {
    pages: usize,
}

impl IndicatorControl for ConsoleIndicator {
    fn set_number_of_pages(&mut self, count: usize) {
        self.pages = count;
    }

    fn set_current_page(&mut self, index: usize) {
        info!("indicator: {}/{}", index + 1, self.pages);
    }
}
