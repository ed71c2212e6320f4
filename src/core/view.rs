//! Open/close view state.
//!
//! The console slides down from the top of the screen. Only the state
//! lives here (target chasing, scroll offset, blink counter); drawing
//! belongs to the overlay.

use bevy::prelude::*;

/// Pixels the console moves per frame while opening or closing.
pub const SLIDE_STEP: f32 = 20.0;

/// Animation and scroll state for the console panel.
#[derive(Resource, Debug, Default)]
pub struct ConsoleView {
    /// Whether the console is logically open (sliding toward its target).
    pub open: bool,
    /// How many log lines the view is scrolled back by.
    pub scroll: usize,
    height: f32,
    frame: u32,
}

impl ConsoleView {
    /// Flip open/closed. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Current panel height in pixels.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Advance one frame, sliding the height toward `target`.
    pub fn advance(&mut self, target: f32) {
        self.frame = self.frame.wrapping_add(1);
        if self.height < target {
            self.height = (self.height + SLIDE_STEP).min(target);
        } else if self.height > target {
            self.height = (self.height - SLIDE_STEP).max(target);
        }
    }

    /// Blink phase for the edit caret.
    pub fn caret_visible(&self) -> bool {
        (self.frame % 60) < 30
    }

    /// Whether the panel takes any screen space at all.
    pub fn visible(&self) -> bool {
        self.open || self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut view = ConsoleView::default();
        assert!(view.toggle());
        assert!(view.open);
        assert!(!view.toggle());
    }

    #[test]
    fn test_slide_converges_on_target() {
        let mut view = ConsoleView::default();
        view.open = true;
        for _ in 0..100 {
            view.advance(350.0);
        }
        assert_eq!(view.height(), 350.0);
    }

    #[test]
    fn test_slide_handles_offgrid_target() {
        let mut view = ConsoleView::default();
        for _ in 0..10 {
            view.advance(47.0);
        }
        assert_eq!(view.height(), 47.0);
    }

    #[test]
    fn test_slide_back_to_zero() {
        let mut view = ConsoleView::default();
        view.advance(100.0);
        assert!(view.visible() || view.height() > 0.0);
        for _ in 0..20 {
            view.advance(0.0);
        }
        assert_eq!(view.height(), 0.0);
        assert!(!view.visible());
    }
}
