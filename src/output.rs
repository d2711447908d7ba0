//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Projects lead with
//! their display number and title, the same label the Index view shows;
//! paths and counts follow as indented context.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Projects
//! 01 Lab (Ongoing, 2 attachments)
//!     Side project
//! 02 Atlas (2021, 3 attachments)
//!
//! Hidden
//!     Draft (2022): no attachments
//!
//! Experience
//!     2021 Studio North
//!
//! Contact
//!     Email: ada@example.com
//!
//! Config
//!     content: content/cv.json
//!     assets: content/public/
//! ```
//!
//! ## Build
//!
//! ```text
//! Pages
//!     index.html
//!     projects/01-lab/index.html
//!     ...
//!
//! Generated 12 pages, 4 assets → dist
//! ```
//!
//! ## Compress
//!
//! ```text
//! [1/12] cover.png: 1.20 MB → 820.50 KB (33.2% reduction)
//! [2/12] detail.png: cached (410.00 KB)
//!
//! Compression complete
//!     Files processed: 12/12
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::compress::{CompressEvent, CompressReport, FileOutcome};
use crate::config::SiteConfig;
use crate::content::{Content, Project};
use crate::frame::Frame;
use crate::generate::GenerateReport;
use crate::naming::row_number_label;
use crate::ordering::order_projects;
use crate::shell::Effect;
use serde::Serialize;
use std::path::Path;

/// Progress lines are shown for this many files, then every `PROGRESS_EVERY`th.
const PROGRESS_FIRST: usize = 5;
const PROGRESS_EVERY: usize = 10;

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `512 B`, `1.50 KB`, `2.25 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Like [`format_bytes`], with a leading `-` for growth.
fn format_signed_bytes(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_bytes(bytes.unsigned_abs()))
    } else {
        format_bytes(bytes.unsigned_abs())
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// check
// ============================================================================

/// Content inventory: projects in display order, hidden projects, about
/// entries, and the resolved config locations.
pub fn format_check_output(content: &Content, config: &SiteConfig, source: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let ordered = order_projects(&content.projects, &content.side_projects);

    lines.push("Projects".to_string());
    if ordered.is_empty() {
        lines.push(format!("{}(none displayable)", indent(1)));
    }
    for (position, project) in ordered.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            row_number_label(position),
            project.title,
            project.year,
            plural(project.attachments.len(), "attachment")
        ));
        if is_side_project(content, project) {
            lines.push(format!("{}Side project", indent(1)));
        }
    }

    let hidden: Vec<&Project> = content.hidden_projects().collect();
    if !hidden.is_empty() {
        lines.push(String::new());
        lines.push("Hidden".to_string());
        for project in hidden {
            lines.push(format!(
                "{}{} ({}): no attachments",
                indent(1),
                project.title,
                project.year
            ));
        }
    }

    if !content.work_experience.is_empty() {
        lines.push(String::new());
        lines.push("Experience".to_string());
        for entry in &content.work_experience {
            lines.push(format!("{}{} {}", indent(1), entry.year, entry.heading));
        }
    }

    if !content.contact.is_empty() {
        lines.push(String::new());
        lines.push("Contact".to_string());
        for item in &content.contact {
            lines.push(format!("{}{}: {}", indent(1), item.platform, item.handle));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    lines.push(format!(
        "{}content: {}",
        indent(1),
        source.join(&config.content_file).display()
    ));
    lines.push(format!(
        "{}assets: {}/",
        indent(1),
        source.join(&config.assets_dir).display()
    ));
    lines
}

fn is_side_project(content: &Content, project: &Project) -> bool {
    content
        .side_projects
        .iter()
        .any(|p| std::ptr::eq(p, project))
}

pub fn print_check_output(content: &Content, config: &SiteConfig, source: &Path) {
    for line in format_check_output(content, config, source) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    lines.extend(report.pages.iter().map(|p| format!("{}{}", indent(1), p)));
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} → {}",
        plural(report.pages.len(), "page"),
        plural(report.assets_copied, "asset"),
        report.output_dir.display()
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// compress
// ============================================================================

/// Progress line for one finished file, or `None` when the file falls
/// between progress marks. Failures are always shown.
pub fn format_compress_progress(event: &CompressEvent) -> Option<String> {
    let prefix = format!("[{}/{}] {}", event.done, event.total, event.file.name);
    if let FileOutcome::Failed { message } = &event.file.outcome {
        return Some(format!("{prefix}: failed: {message}"));
    }
    if event.done > PROGRESS_FIRST && event.done % PROGRESS_EVERY != 0 {
        return None;
    }
    match &event.file.outcome {
        FileOutcome::Compressed {
            original,
            compressed,
        } => {
            let reduction = crate::compress::reduction_percent(*original, *compressed)
                .map_or_else(|| "n/a".to_string(), |r| format!("{r:.1}%"));
            Some(format!(
                "{prefix}: {} → {} ({reduction} reduction)",
                format_bytes(*original),
                format_bytes(*compressed)
            ))
        }
        FileOutcome::Cached { size } => Some(format!("{prefix}: cached ({})", format_bytes(*size))),
        FileOutcome::Failed { .. } => None,
    }
}

pub fn format_compress_report(report: &CompressReport) -> Vec<String> {
    if report.total() == 0 {
        return vec!["No PNG files found".to_string()];
    }
    let mut lines = vec![
        String::new(),
        "Compression complete".to_string(),
        format!(
            "{}Files processed: {}/{}",
            indent(1),
            report.processed(),
            report.total()
        ),
        format!("{}Errors: {}", indent(1), report.errors()),
        format!("{}Cache: {}", indent(1), report.cache),
        format!(
            "{}Original total: {}",
            indent(1),
            format_bytes(report.original_total())
        ),
        format!(
            "{}Compressed total: {}",
            indent(1),
            format_bytes(report.compressed_total())
        ),
        format!(
            "{}Space saved: {}",
            indent(1),
            format_signed_bytes(report.saved())
        ),
    ];
    if let Some(reduction) = report.average_reduction() {
        lines.push(format!("{}Average reduction: {:.1}%", indent(1), reduction));
    }
    lines.push(String::new());
    lines.push(format!(
        "Originals backed up to: {}/",
        report.backup_dir.display()
    ));
    lines
}

pub fn print_compress_report(report: &CompressReport) {
    for line in format_compress_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// frame
// ============================================================================

#[derive(Serialize)]
struct FrameOutput<'a> {
    frame: &'a Frame,
    effects: &'a [Effect],
}

/// Pretty JSON of a frame and the effects that led to it.
pub fn format_frame_json(frame: &Frame, effects: &[Effect]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FrameOutput { frame, effects })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::compress::FileReport;
    use crate::shell::{Event, Shell, ShellSettings};
    use crate::test_helpers::*;
    use std::path::PathBuf;

    fn compressed(name: &str, original: u64, compressed: u64) -> FileReport {
        FileReport {
            name: name.to_string(),
            outcome: FileOutcome::Compressed {
                original,
                compressed,
            },
        }
    }

    fn event(done: usize, file: FileReport) -> CompressEvent {
        CompressEvent {
            done,
            total: 40,
            file,
        }
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 / 2), "2.50 MB");
    }

    #[test]
    fn signed_bytes_marks_growth() {
        assert_eq!(format_signed_bytes(-2048), "-2.00 KB");
        assert_eq!(format_signed_bytes(10), "10 B");
    }

    #[test]
    fn check_output_lists_projects_in_display_order() {
        let content = sample_content();
        let lines = format_check_output(&content, &SiteConfig::default(), Path::new("content"));
        assert_eq!(lines[0], "Projects");
        assert_eq!(lines[1], "01 Lab (Ongoing, 2 attachments)");
        assert_eq!(lines[2], "    Side project");
        assert_eq!(lines[3], "02 Atlas (2021, 3 attachments)");
        assert_eq!(lines[4], "03 Poster (2019, 1 attachment)");
    }

    #[test]
    fn check_output_lists_hidden_and_about_entries() {
        let content = sample_content();
        let lines = format_check_output(&content, &SiteConfig::default(), Path::new("content"));
        assert!(lines.contains(&"    Draft (2022): no attachments".to_string()));
        assert!(lines.contains(&"    2021 Studio North".to_string()));
        assert!(lines.contains(&"    Email: ada@example.com".to_string()));
        assert!(lines.contains(&"    assets: content/public/".to_string()));
    }

    #[test]
    fn check_output_without_projects() {
        let content = Content::default();
        let lines = format_check_output(&content, &SiteConfig::default(), Path::new("."));
        assert_eq!(lines[1], "    (none displayable)");
    }

    #[test]
    fn generate_output_summary() {
        let report = GenerateReport {
            output_dir: PathBuf::from("dist"),
            pages: vec!["index.html".into(), "about/index.html".into()],
            assets_copied: 1,
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[1], "    index.html");
        assert_eq!(lines.last().unwrap(), "Generated 2 pages, 1 asset → dist");
    }

    #[test]
    fn progress_shows_first_five_and_every_tenth() {
        let shown: Vec<usize> = (1..=40)
            .filter(|&done| format_compress_progress(&event(done, compressed("a.png", 100, 80))).is_some())
            .collect();
        assert_eq!(shown, [1, 2, 3, 4, 5, 10, 20, 30, 40]);
    }

    #[test]
    fn progress_line_format() {
        let line = format_compress_progress(&event(1, compressed("cover.png", 2048, 1024))).unwrap();
        assert_eq!(line, "[1/40] cover.png: 2.00 KB → 1.00 KB (50.0% reduction)");
    }

    #[test]
    fn failures_always_reported() {
        let file = FileReport {
            name: "bad.png".into(),
            outcome: FileOutcome::Failed {
                message: "decode error".into(),
            },
        };
        assert_eq!(
            format_compress_progress(&event(7, file)).as_deref(),
            Some("[7/40] bad.png: failed: decode error")
        );
    }

    #[test]
    fn compress_report_summary() {
        let report = CompressReport {
            files: vec![
                compressed("a.png", 1000, 800),
                FileReport {
                    name: "b.png".into(),
                    outcome: FileOutcome::Failed {
                        message: "x".into(),
                    },
                },
            ],
            backup_dir: PathBuf::from("image-backups"),
            cache: CacheStats { hits: 0, misses: 1 },
        };
        let lines = format_compress_report(&report);
        assert!(lines.contains(&"    Files processed: 1/2".to_string()));
        assert!(lines.contains(&"    Errors: 1".to_string()));
        assert!(lines.contains(&"    Cache: 1 compressed".to_string()));
        assert!(lines.contains(&"    Space saved: 200 B".to_string()));
        assert!(lines.contains(&"    Average reduction: 20.0%".to_string()));
        assert_eq!(lines.last().unwrap(), "Originals backed up to: image-backups/");
    }

    #[test]
    fn compress_report_empty() {
        let report = CompressReport {
            files: vec![],
            backup_dir: PathBuf::from("image-backups"),
            cache: CacheStats::default(),
        };
        assert_eq!(format_compress_report(&report), ["No PNG files found"]);
    }

    #[test]
    fn frame_json_has_frame_and_effects() {
        let content = sample_content();
        let mut shell = Shell::new(&content, ShellSettings::default());
        shell.dispatch(Event::OpenProject(1));
        let effects = shell.dispatch(Event::ClickAttachment(1));
        let json = format_frame_json(&shell.render(), &effects).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["frame"]["view"], "overview");
        assert_eq!(value["frame"]["body"]["kind"], "project");
        assert_eq!(value["effects"][0]["effect"], "scroll_to");
    }
}
