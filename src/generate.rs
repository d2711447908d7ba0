//! Static site generation.
//!
//! Replays the navigation shell to enumerate every reachable state worth a
//! URL, then renders each [`Frame`] to an HTML page. The pages are plain
//! documents: entrance animations run from CSS (`--reveal-delay`), and a
//! small script handles what needs a pointer (swipes in the Index strip,
//! smooth centering in the fullscreen strip, hover dimming).
//!
//! ## Generated Pages
//!
//! ```text
//! dist/
//! ├── index.html                          # Overview (cards)
//! ├── projects/01-lab/index.html          # Project open, grid layout
//! ├── projects/01-lab/fullscreen.html     # Project open, fullscreen strip
//! ├── index/index.html                    # Index, all rows collapsed
//! ├── index/01.html                       # Index, row 01 expanded
//! ├── about/index.html                    # About
//! ├── _headers                            # Cache-Control for media
//! └── content/media/...                   # Copied from <source>/public
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors and theme injected from config)
//! - `static/nav.js`: Swipe, scroll centering, hover dimming, counter
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Markdown fields (about, descriptions) go through pulldown-cmark.

use crate::config::{self, HeadersConfig, SiteConfig};
use crate::content::{Attachment, AttachmentKind, Content};
use crate::frame::{
    AboutFrame, AboutSection, CardFrame, FetchPriority, Frame, FrameBody, Loading, MediaFrame,
    ProjectFrame, RevealState, RowFrame,
};
use crate::gallery::Layout;
use crate::naming::{project_dir_name, row_number_label};
use crate::shell::{Event, Shell, ShellSettings, View};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("error walking assets: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

/// Files in the assets directory that are never published.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// One page of the site: where it goes and the state it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Path relative to the output directory, `/`-separated.
    pub path: String,
    pub frame: Frame,
}

/// What a build wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// Relative paths, in generation order.
    pub pages: Vec<String>,
    pub assets_copied: usize,
}

/// Every page of the site, in generation order.
///
/// Each page comes from a fresh shell driven to the state it shows, so
/// reveal delays always count from the page load.
pub fn site_pages(content: &Content, settings: &ShellSettings) -> Vec<Page> {
    let fresh = || Shell::new(content, settings.clone());
    let page = |path: String, shell: &Shell<'_>| Page {
        path,
        frame: shell.render(),
    };

    let overview = fresh();
    let projects = overview.projects();
    let mut pages = vec![page("index.html".to_string(), &overview)];

    for (position, project) in projects.iter().enumerate() {
        let dir = format!("projects/{}", project_dir_name(position, &project.title));
        let mut shell = fresh();
        shell.dispatch(Event::OpenProject(position));
        pages.push(page(format!("{dir}/index.html"), &shell));
        shell.dispatch(Event::ToggleView);
        pages.push(page(format!("{dir}/fullscreen.html"), &shell));
    }

    let mut index = fresh();
    index.dispatch(Event::Navigate(View::Index));
    pages.push(page("index/index.html".to_string(), &index));
    for (position, row) in projects.iter().enumerate() {
        let mut shell = fresh();
        shell.post(Event::Navigate(View::Index));
        shell.post(Event::ToggleRow(position));
        shell.run();
        debug!(row = %row.title, "generate: expanded index row");
        pages.push(page(format!("index/{}", row_page(position)), &shell));
    }

    let mut about = fresh();
    about.dispatch(Event::Navigate(View::About));
    pages.push(page("about/index.html".to_string(), &about));

    pages
}

/// Build the site for `content` into `output_dir`.
///
/// Assets under `<source>/<assets_dir>` are copied verbatim first, so a
/// generated page always wins over an asset with the same path.
pub fn generate(
    source: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    content: &Content,
) -> Result<GenerateReport, GenerateError> {
    let css = format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme, &config.animation),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;

    let assets_copied = copy_assets(&source.join(&config.assets_dir), output_dir)?;
    info!(assets_copied, "generate: copied assets");

    let pages = site_pages(content, &ShellSettings::from_config(config));
    let mut written = Vec::with_capacity(pages.len());
    for page in &pages {
        let path = output_dir.join(&page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, render_page(&page.frame, &css, config).into_string())?;
        debug!(page = %page.path, "generate: wrote page");
        written.push(page.path.clone());
    }

    fs::write(output_dir.join("_headers"), headers_file(&config.headers))?;
    info!(pages = written.len(), output = %output_dir.display(), "generate: site generated");

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        pages: written,
        assets_copied,
    })
}

/// Copy every file under `assets` into `output_dir`, keeping relative paths.
/// A missing assets directory copies nothing.
fn copy_assets(assets: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    if !assets.is_dir() {
        debug!(assets = %assets.display(), "generate: no assets directory");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(assets) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(assets) else {
            continue;
        };
        let target = output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

/// Static-host header rules for the media directory.
pub fn headers_file(headers: &HeadersConfig) -> String {
    format!(
        "{}\n  Cache-Control: {}\n",
        headers.media_path, headers.cache_control
    )
}

// ============================================================================
// URLs
// ============================================================================

fn view_href(view: View) -> &'static str {
    match view {
        View::Overview => "/",
        View::Index => "/index/",
        View::About => "/about/",
    }
}

fn project_href(position: usize, title: &str) -> String {
    format!("/projects/{}/", project_dir_name(position, title))
}

fn row_page(position: usize) -> String {
    format!("{}.html", row_number_label(position))
}

// ============================================================================
// HTML Components
// ============================================================================

fn markdown(text: &str) -> PreEscaped<String> {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(text));
    PreEscaped(out)
}

/// Inline style carrying the entrance delay of a scheduled element.
fn reveal_style(reveal: &RevealState) -> Option<String> {
    reveal.delay_ms.map(|ms| format!("--reveal-delay: {ms}ms;"))
}

fn is_scheduled(reveal: &RevealState) -> bool {
    reveal.delay_ms.is_some()
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn video_preload(loading: Loading) -> &'static str {
    match loading {
        Loading::Eager => "auto",
        Loading::Lazy => "metadata",
    }
}

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    config: &SiteConfig,
    css: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let description = (!config.site.description.is_empty()).then_some(&config.site.description);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class]
                data-swipe-delta=(config.swipe.delta)
                data-track-mouse=(flag(config.swipe.track_mouse))
                data-track-touch=(flag(config.swipe.track_touch)) {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Renders the site header: owner name and the three view links.
fn site_header(frame: &Frame) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (frame.title) }
            nav.site-nav {
                ul {
                    @for link in &frame.nav {
                        li {
                            a.active[link.active]
                                href=(view_href(link.view))
                                aria-current=[link.active.then_some("page")] {
                                (link.label)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_media(media: &MediaFrame) -> Markup {
    html! {
        @match media.kind {
            AttachmentKind::Image => {
                img src=(media.url)
                    alt=(media.alt)
                    loading=(media.loading.as_str())
                    fetchpriority=(media.fetch_priority.as_str())
                    decoding="async";
            }
            AttachmentKind::Video => {
                video src=(media.url)
                    aria-label=(media.alt)
                    preload=(video_preload(media.loading))
                    autoplay muted loop playsinline {}
            }
            AttachmentKind::Document => {
                a.document href=(media.url) { (media.alt) }
            }
        }
    }
}

/// Covers sit inside the card link, so a document cover is plain text.
fn render_cover(media: &MediaFrame) -> Markup {
    match media.kind {
        AttachmentKind::Document => html! { span.document { (media.alt) } },
        _ => render_media(media),
    }
}

fn experience_media(index: usize, attachment: &Attachment) -> MediaFrame {
    MediaFrame {
        index,
        kind: attachment.kind,
        url: attachment.url.clone(),
        alt: format!("Attachment {}", index + 1),
        loading: Loading::Lazy,
        fetch_priority: FetchPriority::Auto,
        reveal: RevealState::SHOWN,
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one frame as a complete HTML document.
pub fn render_page(frame: &Frame, css: &str, config: &SiteConfig) -> Markup {
    let site_title = config.page_title(&frame.title);
    let (title, class, body) = match &frame.body {
        FrameBody::Placeholder { message } => (
            site_title.to_string(),
            "placeholder-view",
            html! { main.placeholder { p { (message) } } },
        ),
        FrameBody::Overview { cards } => (
            site_title.to_string(),
            "overview-view",
            render_overview(cards),
        ),
        FrameBody::Project(project) => (
            format!("{} - {}", project.title, site_title),
            "project-view",
            render_project(project),
        ),
        FrameBody::Index {
            rows,
            settle_delay_ms,
        } => (
            format!("Index - {site_title}"),
            "index-view",
            render_index(rows, *settle_delay_ms),
        ),
        FrameBody::About(about) => (
            format!("About - {site_title}"),
            "about-view",
            render_about(about),
        ),
    };

    let content = html! {
        (site_header(frame))
        (body)
    };
    base_document(&title, config, css, Some(class), content)
}

fn render_overview(cards: &[CardFrame]) -> Markup {
    html! {
        main.overview-page {
            div.card-grid {
                @for card in cards {
                    a.card.reveal[is_scheduled(&card.reveal)]
                        href=(project_href(card.position, &card.title))
                        style=[reveal_style(&card.reveal)] {
                        (render_cover(&card.cover))
                        span.card-title { (card.title) }
                        span.card-year { (card.year) }
                    }
                }
            }
        }
    }
}

fn render_project(project: &ProjectFrame) -> Markup {
    let (layout_class, toggle_href) = match project.layout {
        Layout::Grid => ("media-grid", "fullscreen.html"),
        Layout::Fullscreen => ("media-strip", "./"),
    };
    html! {
        main.project-page data-scroll-target=[project.scroll_target] {
            header.project-header {
                a.close href="/" aria-label="Close project" { "×" }
                h1 { (project.title) }
                span.project-year { (project.year) }
                a.layout-toggle href=(toggle_href) { (project.toggle_label) }
            }
            @if let Some(description) = &project.description {
                div.description { (markdown(description)) }
            }
            div class=(layout_class) {
                @for media in &project.media {
                    @let href = match project.layout {
                        Layout::Grid => format!("fullscreen.html#media-{}", media.index),
                        Layout::Fullscreen => format!("#media-{}", media.index),
                    };
                    a.media-item.reveal[is_scheduled(&media.reveal)]
                        id={ "media-" (media.index) }
                        href=(href)
                        style=[reveal_style(&media.reveal)] {
                        (render_media(media))
                    }
                }
            }
        }
    }
}

fn row_style(row: &RowFrame) -> Option<String> {
    let mut style = reveal_style(&row.reveal).unwrap_or_default();
    if row.opacity < 1.0 {
        style.push_str(&format!("opacity: {};", row.opacity));
    }
    (!style.is_empty()).then_some(style)
}

fn render_index(rows: &[RowFrame], settle_delay_ms: Option<u64>) -> Markup {
    let settled = rows.iter().all(|r| r.settled);
    html! {
        main.index-page {
            ol.index-list.settled[settled] data-settle-ms=[settle_delay_ms] {
                @for row in rows {
                    @let href = if row.expanded {
                        "/index/".to_string()
                    } else {
                        format!("/index/{}", row_page(row.position))
                    };
                    li.index-row.expanded[row.expanded].reveal[is_scheduled(&row.reveal)]
                        data-row=(row.position)
                        style=[row_style(row)] {
                        a.row-header href=(href) aria-expanded=(flag(row.expanded)) {
                            span.row-number { (row.number) }
                            span.row-title { (row.title) }
                            span.row-year { (row.year) }
                        }
                        @if row.expanded {
                            div.row-panel {
                                @if let Some(description) = &row.description {
                                    div.description { (markdown(description)) }
                                }
                                div.row-strip data-focused=[row.focused] {
                                    @for media in &row.media {
                                        figure.strip-item.focused[row.focused == Some(media.index)]
                                            data-index=(media.index) {
                                            (render_media(media))
                                        }
                                    }
                                }
                                @if let Some(counter) = &row.counter {
                                    p.counter { (counter) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_about(about: &AboutFrame) -> Markup {
    html! {
        main.about-page {
            @for section in &about.sections {
                section.about-section.reveal[is_scheduled(&section.reveal)]
                    style=[reveal_style(&section.reveal)] {
                    h2 { (section.section.label()) }
                    @match section.section {
                        AboutSection::About => {
                            div.about-body { (markdown(&about.about)) }
                        }
                        AboutSection::Contact => {
                            ul.contact-list {
                                @for item in &about.contact {
                                    li {
                                        span.contact-platform { (item.platform) }
                                        a href=(item.url) { (item.handle) }
                                    }
                                }
                            }
                        }
                        AboutSection::Experience => {
                            ul.experience-list {
                                @for entry in &about.experience {
                                    li.experience {
                                        span.experience-year { (entry.year) }
                                        @if let Some(url) = &entry.url {
                                            a.experience-heading href=(url) { (entry.heading) }
                                        } @else {
                                            span.experience-heading { (entry.heading) }
                                        }
                                        @if let Some(description) = &entry.description {
                                            div.description { (markdown(description)) }
                                        }
                                        @if !entry.attachments.is_empty() {
                                            div.experience-attachments {
                                                @for (i, attachment) in entry.attachments.iter().enumerate() {
                                                    (render_media(&experience_media(i, attachment)))
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
