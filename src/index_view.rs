//! Index view coordinator.
//!
//! The Index view is a compact list of project rows. Clicking a row header
//! expands its detail panel (description, counter, horizontal media strip);
//! at most one row is expanded at a time. Inside the expanded row the
//! focused image moves by click or swipe, clamped to the row's attachments.
//!
//! Invariant: when a row is expanded, `current_image < total_images`;
//! otherwise both are 0.

use crate::gesture::SwipeDirection;
use serde::Serialize;
use tracing::debug;

/// Opacity applied to rows that are neither hovered nor expanded while
/// another row is hovered.
pub const DIMMED_OPACITY: f32 = 0.25;

/// Height target for a row's detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelHeight {
    /// The panel's natural content height.
    Content,
    Collapsed,
}

/// Panel animation produced by a row toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelChange {
    pub row: usize,
    pub height: PanelHeight,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexCoordinator {
    expanded: Option<usize>,
    current_image: usize,
    total_images: usize,
    hovered: Option<usize>,
}

impl IndexCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded_row(&self) -> Option<usize> {
        self.expanded
    }

    pub fn current_image(&self) -> usize {
        self.current_image
    }

    pub fn total_images(&self) -> usize {
        self.total_images
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expanded == Some(row)
    }

    /// Focused image of `row`; collapsed rows always report 0.
    pub fn image_index(&self, row: usize) -> usize {
        if self.is_expanded(row) {
            self.current_image
        } else {
            0
        }
    }

    pub fn panel_height(&self, row: usize) -> PanelHeight {
        if self.is_expanded(row) {
            PanelHeight::Content
        } else {
            PanelHeight::Collapsed
        }
    }

    /// Click on the header of `row`, which has `attachment_count` attachments.
    ///
    /// Returns the panel changes in the order they should animate: the
    /// previously expanded row collapses before the new one opens.
    pub fn toggle_row(&mut self, row: usize, attachment_count: usize) -> Vec<PanelChange> {
        if self.expanded == Some(row) {
            debug!(row, "index: collapse row");
            self.expanded = None;
            self.current_image = 0;
            self.total_images = 0;
            self.hovered = None;
            return vec![PanelChange {
                row,
                height: PanelHeight::Collapsed,
            }];
        }
        if attachment_count == 0 {
            debug!(row, "index: row without attachments ignored");
            return Vec::new();
        }

        let mut changes = Vec::with_capacity(2);
        if let Some(previous) = self.expanded {
            changes.push(PanelChange {
                row: previous,
                height: PanelHeight::Collapsed,
            });
        }
        debug!(row, attachment_count, "index: expand row");
        self.expanded = Some(row);
        self.current_image = 0;
        self.total_images = attachment_count;
        changes.push(PanelChange {
            row,
            height: PanelHeight::Content,
        });
        changes
    }

    /// Focus image `index` of the expanded row. Out-of-range requests are
    /// ignored; returns whether the focus was applied.
    pub fn focus_image(&mut self, index: usize) -> bool {
        if self.expanded.is_some() && index < self.total_images {
            self.current_image = index;
            true
        } else {
            debug!(index, total = self.total_images, "index: focus request ignored");
            false
        }
    }

    /// Left shows the next image, right the previous one; both saturate.
    pub fn swipe(&mut self, direction: SwipeDirection) -> bool {
        let requested = match direction {
            SwipeDirection::Left if self.current_image + 1 < self.total_images => {
                self.current_image + 1
            }
            SwipeDirection::Right => self.current_image.saturating_sub(1),
            SwipeDirection::Left => self.current_image,
            SwipeDirection::Up | SwipeDirection::Down => return false,
        };
        self.focus_image(requested)
    }

    /// Pointer entered `Some(row)` or left the list (`None`).
    pub fn hover(&mut self, row: Option<usize>) {
        self.hovered = row;
    }

    pub fn row_opacity(&self, row: usize) -> f32 {
        match self.hovered {
            Some(hovered) if hovered != row && self.expanded != Some(row) => DIMMED_OPACITY,
            _ => 1.0,
        }
    }

    /// `"2 — 5"` for the expanded row, or `None` when nothing is expanded.
    pub fn counter_label(&self) -> Option<String> {
        self.expanded
            .map(|_| format!("{} \u{2014} {}", self.current_image + 1, self.total_images))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expanding_sets_totals() {
        let mut index = IndexCoordinator::new();
        let changes = index.toggle_row(0, 4);
        assert_eq!(
            changes,
            vec![PanelChange {
                row: 0,
                height: PanelHeight::Content
            }]
        );
        assert_eq!(index.expanded_row(), Some(0));
        assert_eq!(index.total_images(), 4);
        assert_eq!(index.current_image(), 0);
    }

    #[test]
    fn expanding_b_collapses_a() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(0, 3);
        index.focus_image(2);

        let changes = index.toggle_row(1, 2);
        assert_eq!(
            changes,
            vec![
                PanelChange {
                    row: 0,
                    height: PanelHeight::Collapsed
                },
                PanelChange {
                    row: 1,
                    height: PanelHeight::Content
                },
            ]
        );
        assert_eq!(index.expanded_row(), Some(1));
        assert_eq!(index.image_index(0), 0);
        assert_eq!(index.image_index(1), 0);
        assert_eq!(index.total_images(), 2);
        assert_eq!(index.panel_height(0), PanelHeight::Collapsed);
    }

    #[test]
    fn toggling_expanded_row_collapses_it() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(2, 3);
        index.focus_image(1);
        index.toggle_row(2, 3);
        assert_eq!(index, IndexCoordinator::new());
    }

    #[test]
    fn focus_out_of_range_is_ignored() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(0, 3);
        assert!(!index.focus_image(3));
        assert_eq!(index.current_image(), 0);
        assert!(index.focus_image(2));
        assert_eq!(index.current_image(), 2);
    }

    #[test]
    fn focus_without_expanded_row_is_ignored() {
        let mut index = IndexCoordinator::new();
        assert!(!index.focus_image(0));
    }

    #[test]
    fn swipe_left_saturates_at_last_image() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(0, 3);
        index.swipe(SwipeDirection::Left);
        index.swipe(SwipeDirection::Left);
        assert_eq!(index.current_image(), 2);
        index.swipe(SwipeDirection::Left);
        assert_eq!(index.current_image(), 2);
    }

    #[test]
    fn swipe_right_saturates_at_zero() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(0, 3);
        index.focus_image(1);
        index.swipe(SwipeDirection::Right);
        assert_eq!(index.current_image(), 0);
        index.swipe(SwipeDirection::Right);
        assert_eq!(index.current_image(), 0);
    }

    #[test]
    fn vertical_swipes_do_nothing() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(0, 3);
        assert!(!index.swipe(SwipeDirection::Up));
        assert!(!index.swipe(SwipeDirection::Down));
        assert_eq!(index.current_image(), 0);
    }

    #[test]
    fn rows_without_attachments_do_not_expand() {
        let mut index = IndexCoordinator::new();
        assert!(index.toggle_row(0, 0).is_empty());
        assert_eq!(index.expanded_row(), None);
    }

    #[test]
    fn hover_dims_other_rows_but_not_expanded() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(1, 2);
        index.hover(Some(0));
        assert_eq!(index.row_opacity(0), 1.0);
        assert_eq!(index.row_opacity(1), 1.0);
        assert_eq!(index.row_opacity(2), DIMMED_OPACITY);

        index.hover(None);
        assert_eq!(index.row_opacity(2), 1.0);
    }

    #[test]
    fn collapsing_clears_dimming() {
        let mut index = IndexCoordinator::new();
        index.toggle_row(1, 2);
        index.hover(Some(1));
        index.toggle_row(1, 2);
        assert_eq!(index.row_opacity(0), 1.0);
    }

    #[test]
    fn counter_label_is_one_based() {
        let mut index = IndexCoordinator::new();
        assert_eq!(index.counter_label(), None);
        index.toggle_row(0, 5);
        index.focus_image(1);
        assert_eq!(index.counter_label().as_deref(), Some("2 \u{2014} 5"));
    }
}
