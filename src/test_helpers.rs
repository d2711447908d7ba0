//! Shared test utilities for the folio test suite.
//!
//! Builders for content fixtures and a few lookups over rendered frames that
//! panic with a readable message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let content = sample_content();
//! let mut shell = Shell::new(&content, ShellSettings::default());
//! shell.dispatch(Event::Navigate(View::Index));
//! let rows = index_rows(&shell.render());
//! assert_eq!(rows.len(), 3);
//! ```

use crate::content::{Attachment, ContactItem, Content, Experience, General, Project};
use crate::frame::{Frame, FrameBody, ProjectFrame, RowFrame};

// =========================================================================
// Content builders
// =========================================================================

/// A project with `attachments` image attachments named after the title.
pub fn project(title: &str, year: &str, attachments: usize) -> Project {
    let slug = title.to_lowercase().replace(' ', "-");
    Project {
        title: title.to_string(),
        year: year.to_string(),
        description: Some(format!("About **{title}**.")),
        attachments: (0..attachments)
            .map(|i| Attachment::image(format!("/content/media/{slug}-{}.png", i + 1)))
            .collect(),
    }
}

/// Three displayable projects (one ongoing side project, two dated) and one
/// hidden project, plus about/contact/experience entries.
///
/// Display order: `Lab` (Ongoing, 2 images), `Atlas` (2021, 3 images),
/// `Poster` (2019, 1 video).
pub fn sample_content() -> Content {
    let mut poster = project("Poster", "2019", 0);
    poster.attachments.push(Attachment::video("/content/media/poster.mp4"));

    Content {
        general: General {
            display_name: "Ada Example".to_string(),
            about: "Designer working on *maps* and type.".to_string(),
        },
        contact: vec![ContactItem {
            platform: "Email".to_string(),
            url: "mailto:ada@example.com".to_string(),
            handle: "ada@example.com".to_string(),
        }],
        work_experience: vec![
            Experience {
                year: "2021".to_string(),
                heading: "Studio North".to_string(),
                url: Some("https://studio.example".to_string()),
                description: Some("Led the **identity** work.".to_string()),
                attachments: vec![],
            },
            Experience {
                year: "2018".to_string(),
                heading: "Freelance".to_string(),
                url: None,
                description: None,
                attachments: vec![Attachment::image("/content/media/freelance.png")],
            },
        ],
        projects: vec![project("Atlas", "2021", 3), poster, project("Draft", "2022", 0)],
        side_projects: vec![project("Lab", "Ongoing", 2)],
    }
}

// =========================================================================
// Frame lookups
// =========================================================================

/// Rows of an Index frame. Panics on any other frame body.
pub fn index_rows(frame: &Frame) -> &[RowFrame] {
    match &frame.body {
        FrameBody::Index { rows, .. } => rows,
        other => panic!("expected index frame, got {other:?}"),
    }
}

/// The open project of a Project frame. Panics on any other frame body.
pub fn open_project(frame: &Frame) -> &ProjectFrame {
    match &frame.body {
        FrameBody::Project(project) => project,
        other => panic!("expected project frame, got {other:?}"),
    }
}

/// Titles of the cards in an Overview frame. Panics on any other frame body.
pub fn card_titles(frame: &Frame) -> Vec<&str> {
    match &frame.body {
        FrameBody::Overview { cards } => cards.iter().map(|c| c.title.as_str()).collect(),
        other => panic!("expected overview frame, got {other:?}"),
    }
}
