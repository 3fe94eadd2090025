//! Pull-to-refresh gesture tracking for the transaction list
//!
//! Dragging (or wheel-scrolling) the list downward while it is already at the
//! top accumulates "pull"; once the pull passes the threshold a refresh fires,
//! on pointer release for drags and immediately for the wheel.

use eframe::egui;

/// Pull distance (points) needed to trigger a refresh
pub const DEFAULT_PULL_THRESHOLD: f32 = 80.0;

#[derive(Debug, Clone)]
pub struct PullToRefresh {
    pulled: f32,
    threshold: f32,
    /// Whether the list was scrolled to the top on the last frame
    at_top: bool,
}

impl Default for PullToRefresh {
    fn default() -> Self {
        Self::new(DEFAULT_PULL_THRESHOLD)
    }
}

impl PullToRefresh {
    pub fn new(threshold: f32) -> Self {
        Self {
            pulled: 0.0,
            threshold,
            at_top: true,
        }
    }

    /// Feed one frame of input; returns true when a refresh should start.
    ///
    /// `delta` is the downward pull this frame (negative when pushing back up).
    pub fn update(&mut self, at_top: bool, delta: f32, pointer_down: bool) -> bool {
        if !at_top {
            self.pulled = 0.0;
            return false;
        }
        self.pulled = (self.pulled + delta).max(0.0);

        if self.pulled >= self.threshold && !pointer_down {
            self.pulled = 0.0;
            return true;
        }
        if !pointer_down && delta <= 0.0 {
            // Released short of the threshold
            self.pulled = 0.0;
        }
        false
    }

    /// How far towards the threshold the current pull is (0.0..=1.0)
    pub fn progress(&self) -> f32 {
        if self.threshold <= 0.0 {
            return 0.0;
        }
        (self.pulled / self.threshold).min(1.0)
    }

    pub fn is_pulling(&self) -> bool {
        self.pulled > 0.0
    }

    pub fn set_at_top(&mut self, at_top: bool) {
        self.at_top = at_top;
    }

    /// Read this frame's pointer/wheel input over `rect` and update the gesture
    pub fn interact(&mut self, ui: &egui::Ui, rect: egui::Rect) -> bool {
        let hovered = ui.rect_contains_pointer(rect);
        let input = ui.input(|i| PullInput {
            pointer_down: i.pointer.primary_down(),
            press_origin: i.pointer.press_origin(),
            drag_delta: i.pointer.delta().y,
            // Positive wheel delta means scrolling up, i.e. pulling the list down
            wheel_delta: i.raw_scroll_delta.y,
            hovered,
        });
        let (delta, dragging) = input.pull_delta(rect);
        self.update(self.at_top, delta, dragging)
    }
}

/// One frame of raw input relevant to the pull gesture
#[derive(Debug, Clone, Copy)]
pub(crate) struct PullInput {
    pub pointer_down: bool,
    pub press_origin: Option<egui::Pos2>,
    pub drag_delta: f32,
    pub wheel_delta: f32,
    pub hovered: bool,
}

impl PullInput {
    /// Pull delta and whether a drag of the list is in progress.
    ///
    /// Drags only count when the press started inside `rect`; wheel input
    /// only counts while hovering it.
    pub(crate) fn pull_delta(&self, rect: egui::Rect) -> (f32, bool) {
        let dragging = self.pointer_down && self.press_origin.map_or(false, |p| rect.contains(p));
        let drag = if dragging { self.drag_delta } else { 0.0 };
        let wheel = if self.hovered { self.wheel_delta } else { 0.0 };
        (drag + wheel, dragging)
    }
}
