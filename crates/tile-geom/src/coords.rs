//! Conversion between the two coordinate spaces the tiler straddles.
//!
//! Screens, snapshots handed to the partitioner and all layout arithmetic use
//! the *consumer* space: origin at the bottom-left of the primary display, y
//! growing upward. Frame reads and writes against live windows use the
//! *producer* space: origin at the top-left of the topmost display, y growing
//! downward. Both spaces share the x axis.
//!
//! The flip is anchored on the desktop top, the largest `max_y` across all
//! screen frames. With no screens there is nothing to anchor on and conversion
//! is the identity.

use crate::{rect::Rect, screen::Screen};

/// Largest top edge across the full frames of `screens`.
pub fn desktop_top(screens: &[Screen]) -> Option<f64> {
    screens
        .iter()
        .map(|s| s.frame.max_y())
        .fold(None, |acc, top| Some(acc.map_or(top, |a: f64| a.max(top))))
}

/// Convert a consumer-space rectangle to producer space.
#[must_use]
pub fn to_producer(rect: Rect, desktop_top: f64) -> Rect {
    let r = rect.standardized();
    Rect::new(r.x, desktop_top - r.max_y(), r.w, r.h)
}

/// Convert a producer-space rectangle to consumer space. This is the exact
/// inverse of [`to_producer`] for the same anchor.
#[must_use]
pub fn to_consumer(rect: Rect, desktop_top: f64) -> Rect {
    let r = rect.standardized();
    Rect::new(r.x, desktop_top - r.max_y(), r.w, r.h)
}

/// A captured conversion anchor.
///
/// Build one per tick from the current screen list so every conversion in the
/// tick agrees on the same desktop top.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CoordinateSpace {
    /// Anchor; `None` means conversion is the identity.
    desktop_top: Option<f64>,
}

impl CoordinateSpace {
    /// Capture the anchor from a screen list.
    pub fn from_screens(screens: &[Screen]) -> Self {
        Self {
            desktop_top: desktop_top(screens),
        }
    }

    /// The captured anchor, if any.
    #[must_use]
    pub const fn desktop_top(&self) -> Option<f64> {
        self.desktop_top
    }

    /// Consumer to producer.
    #[must_use]
    pub fn to_producer(&self, rect: Rect) -> Rect {
        match self.desktop_top {
            Some(top) => to_producer(rect, top),
            None => rect,
        }
    }

    /// Producer to consumer.
    #[must_use]
    pub fn to_consumer(&self, rect: Rect) -> Rect {
        match self.desktop_top {
            Some(top) => to_consumer(rect, top),
            None => rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use tile_ids::ScreenId;

    use super::*;

    #[test]
    fn flips_against_tallest_screen() {
        let screens = [
            Screen::full(ScreenId::new(1), Rect::new(0.0, 0.0, 1440.0, 900.0)),
            Screen::full(ScreenId::new(2), Rect::new(1440.0, 0.0, 1920.0, 1080.0)),
        ];
        let space = CoordinateSpace::from_screens(&screens);
        assert_eq!(space.desktop_top(), Some(1080.0));
        let consumer = Rect::new(100.0, 100.0, 400.0, 300.0);
        let producer = space.to_producer(consumer);
        assert_eq!(producer, Rect::new(100.0, 680.0, 400.0, 300.0));
        assert_eq!(space.to_consumer(producer), consumer);
    }

    #[test]
    fn no_screens_means_identity() {
        let space = CoordinateSpace::from_screens(&[]);
        let r = Rect::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(space.desktop_top(), None);
        assert_eq!(space.to_producer(r), r);
        assert_eq!(space.to_consumer(r), r);
    }
}
