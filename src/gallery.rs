//! Gallery view coordinator.
//!
//! Owns the Overview view's state: which project is open, whether its media
//! is laid out as a grid or as a fullscreen horizontal strip, and which
//! attachment the strip should scroll to.
//!
//! ```text
//!            open_project              toggle_view / select_attachment
//! Overview ───────────────▶ Grid ───────────────────────────────────▶ Fullscreen
//!    ▲                        ▲  ◀───────────────────────────────────    │
//!    │      close_project     │               toggle_view                │
//!    └────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Scrolling is a side effect, not part of a transition. After every
//! processed event the shell calls [`GalleryCoordinator::settle`], which asks
//! for a smooth scroll when the strip is visible, a target is pending, and
//! either the layout or the target changed since the last settle. A click on
//! an attachment that is already in the strip scrolls right away.

use serde::Serialize;
use tracing::debug;

/// Layout of an open project's media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    Fullscreen,
}

/// Coarse state of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryMode {
    Overview,
    ProjectOpen(Layout),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
}

/// Request to center attachment `index` in the horizontal strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub index: usize,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    fn smooth(index: usize) -> Self {
        Self {
            index,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

/// Horizontal extent of an element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub left: f64,
    pub width: f64,
}

/// Scroll offset that centers `target` inside `container`.
///
/// `current` is the container's present `scrollLeft`.
pub fn centered_scroll_left(current: f64, container: Span, target: Span) -> f64 {
    current + (target.left - container.left) - container.width / 2.0 + target.width / 2.0
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCoordinator {
    selected: Option<usize>,
    grid_view: bool,
    scroll_target: Option<usize>,
    /// `(grid_view, scroll_target)` as of the last settle.
    settled: (bool, Option<usize>),
}

impl Default for GalleryCoordinator {
    fn default() -> Self {
        Self {
            selected: None,
            grid_view: true,
            scroll_target: None,
            settled: (true, None),
        }
    }
}

impl GalleryCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position (in display order) of the open project.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_grid_view(&self) -> bool {
        self.grid_view
    }

    pub fn pending_scroll_target(&self) -> Option<usize> {
        self.scroll_target
    }

    pub fn mode(&self) -> GalleryMode {
        match self.selected {
            None => GalleryMode::Overview,
            Some(_) => GalleryMode::ProjectOpen(self.layout()),
        }
    }

    pub fn layout(&self) -> Layout {
        if self.grid_view {
            Layout::Grid
        } else {
            Layout::Fullscreen
        }
    }

    pub fn open_project(&mut self, position: usize) {
        debug!(position, "gallery: open project");
        self.selected = Some(position);
        self.grid_view = true;
        self.scroll_target = None;
    }

    /// Flip between grid and fullscreen. Ignored when nothing is open.
    pub fn toggle_view(&mut self) {
        if self.selected.is_none() {
            debug!("gallery: toggle ignored, no project open");
            return;
        }
        self.grid_view = !self.grid_view;
        debug!(layout = ?self.layout(), "gallery: toggled view");
    }

    /// Click on attachment `index` of the open project.
    ///
    /// From the grid this switches to fullscreen and leaves the scroll to
    /// [`settle`](Self::settle). In fullscreen it returns the scroll request
    /// immediately.
    pub fn select_attachment(&mut self, index: usize) -> Option<ScrollRequest> {
        if self.selected.is_none() {
            debug!(index, "gallery: attachment click ignored, no project open");
            return None;
        }
        self.scroll_target = Some(index);
        if self.grid_view {
            self.grid_view = false;
            None
        } else {
            // Scrolled here already; settle has nothing left to do.
            self.settled = (false, Some(index));
            Some(ScrollRequest::smooth(index))
        }
    }

    /// Back to the overview. A no-op when nothing is open.
    pub fn close_project(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        debug!("gallery: close project");
        self.reset();
        true
    }

    /// Drop all state, as when the Overview view is torn down.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Post-transition hook; see the module docs.
    pub fn settle(&mut self) -> Option<ScrollRequest> {
        let now = (self.grid_view, self.scroll_target);
        let changed = now != self.settled;
        self.settled = now;
        match (changed, self.selected, self.grid_view, self.scroll_target) {
            (true, Some(_), false, Some(index)) => Some(ScrollRequest::smooth(index)),
            _ => None,
        }
    }
}
