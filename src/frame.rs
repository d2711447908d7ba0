//! Rendering boundary.
//!
//! A [`Frame`] describes one state of the site: which view is active, which
//! projects, rows and media are visible, and in what visual state (selected,
//! expanded, focused, revealed). It carries no markup. The HTML generator
//! maps frames onto pages, and `folio frame` prints them as JSON.

use crate::content::{AttachmentKind, ContactItem, Experience};
use crate::gallery::Layout;
use crate::index_view::PanelHeight;
use crate::shell::View;
use serde::Serialize;

/// Shown in place of Overview and Index when nothing is displayable.
pub const PLACEHOLDER_MESSAGE: &str =
    "Add at least one project or side project with an image or video.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub view: View,
    /// Owner's display name, shown as the site title.
    pub title: String,
    pub nav: Vec<NavLink>,
    pub body: FrameBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub view: View,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameBody {
    Placeholder {
        message: String,
    },
    Overview {
        cards: Vec<CardFrame>,
    },
    Project(ProjectFrame),
    Index {
        rows: Vec<RowFrame>,
        /// Delay until rows drop their entrance offset, if still pending.
        settle_delay_ms: Option<u64>,
    },
    About(AboutFrame),
}

/// Entrance animation state of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RevealState {
    pub revealed: bool,
    /// Time left until the element fades in, if it is still scheduled.
    pub delay_ms: Option<u64>,
}

impl RevealState {
    /// For elements that are not animated.
    pub const SHOWN: RevealState = RevealState {
        revealed: true,
        delay_ms: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    Eager,
    Lazy,
}

impl Loading {
    pub fn as_str(self) -> &'static str {
        match self {
            Loading::Eager => "eager",
            Loading::Lazy => "lazy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPriority {
    High,
    Auto,
}

impl FetchPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchPriority::High => "high",
            FetchPriority::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFrame {
    /// Position within the project's attachments.
    pub index: usize,
    pub kind: AttachmentKind,
    pub url: String,
    pub alt: String,
    pub loading: Loading,
    pub fetch_priority: FetchPriority,
    pub reveal: RevealState,
}

/// One project cover in the Overview grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardFrame {
    /// Position in display order.
    pub position: usize,
    pub title: String,
    pub year: String,
    pub cover: MediaFrame,
    pub reveal: RevealState,
}

/// The open project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFrame {
    pub position: usize,
    pub title: String,
    pub year: String,
    /// Markdown.
    pub description: Option<String>,
    pub layout: Layout,
    /// Label of the grid/fullscreen toggle: the layout it switches to.
    pub toggle_label: &'static str,
    pub media: Vec<MediaFrame>,
    pub scroll_target: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFrame {
    pub position: usize,
    /// Zero-padded, 1-based (`"01"`).
    pub number: String,
    pub title: String,
    pub year: String,
    pub expanded: bool,
    pub panel: PanelHeight,
    pub opacity: f32,
    pub reveal: RevealState,
    pub settled: bool,
    /// Markdown.
    pub description: Option<String>,
    /// `"2 — 5"`, expanded row only.
    pub counter: Option<String>,
    /// Focused attachment, expanded row only.
    pub focused: Option<usize>,
    /// Attachments of the expanded row; empty when collapsed.
    pub media: Vec<MediaFrame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AboutSection {
    About,
    Contact,
    Experience,
}

impl AboutSection {
    pub const ALL: [AboutSection; 3] = [
        AboutSection::About,
        AboutSection::Contact,
        AboutSection::Experience,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AboutSection::About => "About",
            AboutSection::Contact => "Contact",
            AboutSection::Experience => "Experience",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionFrame {
    pub section: AboutSection,
    pub reveal: RevealState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutFrame {
    /// Markdown.
    pub about: String,
    pub contact: Vec<ContactItem>,
    pub experience: Vec<Experience>,
    pub sections: Vec<SectionFrame>,
}
