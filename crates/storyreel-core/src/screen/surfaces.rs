use crate::carousel::{CarouselItem, NavigationDirection};

/// The paged item view. The screen drives it; it reports settled swipes
/// back through [`super::CarouselScreen::swipe_completed_at`].
pub trait PagingSurface {
    /// Transition to `item`, which sits at `index`.
    fn show(&mut self, item: &CarouselItem, index: usize, direction: NavigationDirection);
}

/// The page-indicator dots. Taps come back through
/// [`super::CarouselScreen::indicator_tapped_at`].
pub trait IndicatorControl {
    fn set_number_of_pages(&mut self, count: usize);

    fn set_current_page(&mut self, index: usize);
}

impl<T: PagingSurface + ?Sized> PagingSurface for Box<T> {
    fn show(&mut self, item: &CarouselItem, index: usize, direction: NavigationDirection) {
        (**self).show(item, index, direction)
    }
}

impl<T: IndicatorControl + ?Sized> IndicatorControl for Box<T> {
    fn set_number_of_pages(&mut self, count: usize) {
        (**self).set_number_of_pages(count)
    }

    fn set_current_page(&mut self, index: usize) {
        (**self).set_current_page(index)
    }
}
