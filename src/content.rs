//! The content store.
//!
//! Everything the site shows comes from a single JSON file in the content
//! root (`cv.json` by default):
//!
//! ```json
//! {
//!   "general": { "displayName": "Ada Example", "about": "Designer in **Lisbon**." },
//!   "contact": [{ "platform": "Email", "url": "mailto:ada@example.com", "handle": "ada@example.com" }],
//!   "workExperience": [{ "year": "2020", "heading": "Studio", "url": "https://studio.example" }],
//!   "projects": [{ "title": "Atlas", "year": "Ongoing", "description": "…",
//!                  "attachments": [{ "type": "image", "url": "/content/media/atlas-1.png" }] }],
//!   "sideProjects": [{ "heading": "Zine", "year": 2019, "attachments": [] }]
//! }
//! ```
//!
//! The store is loaded once and never mutated afterwards; the rest of the crate
//! only ever sees `&Content`. Missing collections and optional fields default
//! to empty rather than failing the load.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid content file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What kind of media an attachment points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
}

impl Attachment {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Image,
            url: url.into(),
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Video,
            url: url.into(),
        }
    }

    pub fn document(url: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Document,
            url: url.into(),
        }
    }
}

/// A project or side project.
///
/// Side projects in the wild use `heading` instead of `title`; both are
/// accepted. `year` is usually a numeric string or the sentinel `"Ongoing"`,
/// but bare JSON numbers are accepted and stringified. Anything else, or no
/// year at all, reads as `""` and sorts as the oldest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(alias = "heading")]
    pub title: String,
    #[serde(default, deserialize_with = "year_string")]
    pub year: String,
    /// Markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Project {
    /// Projects without attachments are excluded from every view.
    pub fn is_displayable(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// The first attachment, used as the overview cover.
    pub fn cover(&self) -> Option<&Attachment> {
        self.attachments.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "year_string")]
    pub year: String,
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactItem {
    pub platform: String,
    pub url: String,
    pub handle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct General {
    #[serde(default)]
    pub display_name: String,
    /// Markdown body of the About section.
    #[serde(default)]
    pub about: String,
}

/// The whole content file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub contact: Vec<ContactItem>,
    #[serde(default)]
    pub work_experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub side_projects: Vec<Project>,
}

impl Content {
    /// Load the content file at `path`.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Projects and side projects that have no attachments and therefore
    /// never show up anywhere.
    pub fn hidden_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .chain(&self.side_projects)
            .filter(|p| !p.is_displayable())
    }
}

/// Accept `"2019"`, `2019` or `"Ongoing"` and keep it as text. Other JSON
/// values (`null`, booleans, objects) become `""`.
fn year_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(serde_json::Number),
        Other(IgnoredAny),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
        Year::Other(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_full_content_file() {
        let json = r#"{
            "general": { "displayName": "Ada", "about": "Hello" },
            "contact": [{ "platform": "Email", "url": "mailto:a@b.c", "handle": "a@b.c" }],
            "workExperience": [{ "year": "2020", "heading": "Studio" }],
            "projects": [{
                "title": "Atlas",
                "year": "Ongoing",
                "description": "A *map*",
                "attachments": [{ "type": "image", "url": "/a.png" }]
            }],
            "sideProjects": []
        }"#;
        let content: Content = serde_json::from_str(json).unwrap();

        assert_eq!(content.general.display_name, "Ada");
        assert_eq!(content.contact[0].handle, "a@b.c");
        assert_eq!(content.work_experience[0].heading, "Studio");
        assert_eq!(content.work_experience[0].url, None);
        assert_eq!(content.projects[0].title, "Atlas");
        assert_eq!(content.projects[0].attachments[0].kind, AttachmentKind::Image);
    }

    #[test]
    fn side_project_heading_is_title() {
        let json = r#"{ "heading": "Zine", "year": "2019", "attachments": [] }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.title, "Zine");
    }

    #[test]
    fn numeric_year_is_stringified() {
        let json = r#"{ "title": "Zine", "year": 2019 }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.year, "2019");
        assert!(project.attachments.is_empty());
        assert_eq!(project.description, None);
    }

    #[test]
    fn malformed_years_read_as_text_instead_of_failing() {
        let cases = [
            (r#""year": null,"#, ""),
            (r#""year": 2019.5,"#, "2019.5"),
            (r#""year": true,"#, ""),
            (r#""year": {"from": 2019},"#, ""),
            ("", ""),
        ];
        for (year, expected) in cases {
            let json = format!(r#"{{ "title": "X", {year} "attachments": [] }}"#);
            let project: Project = serde_json::from_str(&json).unwrap();
            assert_eq!(project.year, expected, "for {json}");
        }
    }

    #[test]
    fn load_keeps_projects_with_malformed_years() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cv.json");
        let json = r#"{
            "projects": [
                { "title": "Nulled", "year": null, "attachments": [{ "type": "image", "url": "/n.png" }] },
                { "title": "Dated", "year": "2020", "attachments": [{ "type": "image", "url": "/d.png" }] }
            ],
            "sideProjects": [
                { "heading": "Undated", "attachments": [{ "type": "image", "url": "/u.png" }] }
            ],
            "workExperience": [{ "year": false, "heading": "Studio" }]
        }"#;
        fs::write(&path, json).unwrap();

        let content = Content::load(&path).unwrap();
        let ordered: Vec<&str> = crate::ordering::order_projects(&content.projects, &content.side_projects)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(ordered, ["Dated", "Nulled", "Undated"]);
        assert_eq!(content.work_experience[0].year, "");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let content: Content = serde_json::from_str("{}").unwrap();
        assert!(content.projects.is_empty());
        assert!(content.side_projects.is_empty());
        assert!(content.contact.is_empty());
        assert_eq!(content.general.display_name, "");
    }

    #[test]
    fn unknown_attachment_type_is_rejected() {
        let json = r#"{ "type": "hologram", "url": "/x" }"#;
        assert!(serde_json::from_str::<Attachment>(json).is_err());
    }

    #[test]
    fn hidden_projects_lists_attachmentless_entries() {
        let content = Content {
            projects: vec![Project {
                title: "Shown".into(),
                year: "2020".into(),
                description: None,
                attachments: vec![Attachment::image("/a.png")],
            }],
            side_projects: vec![Project {
                title: "Hidden".into(),
                year: "2018".into(),
                description: None,
                attachments: vec![],
            }],
            ..Content::default()
        };
        let hidden: Vec<&str> = content.hidden_projects().map(|p| p.title.as_str()).collect();
        assert_eq!(hidden, vec!["Hidden"]);
    }

    #[test]
    fn load_reports_path_on_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cv.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Content::load(&path).unwrap_err();
        assert!(matches!(err, ContentError::Json { .. }));
        assert!(err.to_string().contains("cv.json"));
    }

    #[test]
    fn load_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = Content::load(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
