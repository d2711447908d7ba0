//! Navigation shell.
//!
//! Owns the active view and routes events to it. The view state is a tagged
//! variant: each view carries its own coordinator and reveal schedule, so
//! leaving a view drops everything it owned. The teardown is explicit
//! (coordinators reset, schedules cancelled, gesture in flight dropped)
//! before the next view's state is built.
//!
//! ```text
//! post(event) ──▶ queue ──▶ run(): one event at a time, in order
//!                                │
//!                                ├─ transition on the active view
//!                                └─ settle (gallery scroll) ──▶ effects
//! ```
//!
//! Events that do not apply to the active view are ignored. Time only moves
//! through [`Event::Tick`], which makes reveals deterministic.

use crate::config::{AnimationConfig, LoadingConfig, SiteConfig, SwipeConfig};
use crate::content::{Attachment, Content, Project};
use crate::frame::{
    AboutFrame, AboutSection, CardFrame, FetchPriority, Frame, FrameBody, Loading, MediaFrame,
    NavLink, PLACEHOLDER_MESSAGE, ProjectFrame, RevealState, RowFrame, SectionFrame,
};
use crate::gallery::{GalleryCoordinator, Layout, ScrollRequest};
use crate::gesture::{
    PointerEvent, PointerKind, PointerPhase, SwipeDirection, SwipeRecognizer,
};
use crate::index_view::{IndexCoordinator, PanelChange};
use crate::naming::row_number_label;
use crate::ordering::order_projects;
use crate::reveal::{RevealSchedule, RevealTarget};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// The three mutually exclusive screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Overview,
    Index,
    About,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Index, View::About];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Index => "Index",
            View::About => "About",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::Index => "index",
            View::About => "about",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| EventParseError::Unknown(s.to_string()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventParseError {
    #[error("unknown event '{0}'")]
    Unknown(String),
    #[error("event '{event}' expects a number, got '{value}'")]
    BadNumber { event: String, value: String },
    #[error("malformed pointer event '{0}' (expected pointer:<touch|mouse>:<down|move|up|cancel>:X,Y)")]
    BadPointer(String),
}

/// A state-transition request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Navigate(View),
    /// Select the project at this display position (a cover click).
    OpenProject(usize),
    CloseProject,
    ToggleView,
    /// Click on an attachment of the open project.
    ClickAttachment(usize),
    /// Click on the header of an Index row.
    ToggleRow(usize),
    /// Click on an image of the expanded Index row.
    FocusImage(usize),
    Swipe(SwipeDirection),
    Pointer(PointerEvent),
    /// Pointer over an Index row, or off the list.
    Hover(Option<usize>),
    /// The clock reached this many milliseconds.
    Tick(u64),
}

/// Parses the textual event syntax used by `folio frame`:
///
/// `overview`, `index`, `about`, `open:N`, `close`, `toggle`, `click:N`,
/// `row:N`, `focus:N`, `swipe-left` (also right/up/down), `hover:N`,
/// `unhover`, `tick:MS`, `pointer:touch:down:X,Y`.
impl FromStr for Event {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(view) = s.parse::<View>() {
            return Ok(Event::Navigate(view));
        }
        match s {
            "close" => return Ok(Event::CloseProject),
            "toggle" => return Ok(Event::ToggleView),
            "unhover" => return Ok(Event::Hover(None)),
            _ => {}
        }
        if let Some(direction) = s.strip_prefix("swipe-") {
            return direction
                .parse()
                .map(Event::Swipe)
                .map_err(|_| EventParseError::Unknown(s.to_string()));
        }
        if let Some(rest) = s.strip_prefix("pointer:") {
            return parse_pointer(rest)
                .map(Event::Pointer)
                .ok_or_else(|| EventParseError::BadPointer(s.to_string()));
        }

        let (name, value) = s
            .split_once(':')
            .ok_or_else(|| EventParseError::Unknown(s.to_string()))?;
        let number = value.parse::<u64>().map_err(|_| EventParseError::BadNumber {
            event: name.to_string(),
            value: value.to_string(),
        })?;
        let index = number as usize;
        match name {
            "open" => Ok(Event::OpenProject(index)),
            "click" => Ok(Event::ClickAttachment(index)),
            "row" => Ok(Event::ToggleRow(index)),
            "focus" => Ok(Event::FocusImage(index)),
            "hover" => Ok(Event::Hover(Some(index))),
            "tick" => Ok(Event::Tick(number)),
            _ => Err(EventParseError::Unknown(s.to_string())),
        }
    }
}

fn parse_pointer(s: &str) -> Option<PointerEvent> {
    let mut parts = s.splitn(3, ':');
    let kind = match parts.next()? {
        "touch" => PointerKind::Touch,
        "mouse" => PointerKind::Mouse,
        _ => return None,
    };
    let phase = match parts.next()? {
        "down" => PointerPhase::Down,
        "move" => PointerPhase::Move,
        "up" => PointerPhase::Up,
        "cancel" => PointerPhase::Cancel,
        _ => return None,
    };
    let (x, y) = parts.next()?.split_once(',')?;
    Some(PointerEvent {
        phase,
        kind,
        x: x.trim().parse().ok()?,
        y: y.trim().parse().ok()?,
    })
}

/// Presentation work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "detail", rename_all = "snake_case")]
pub enum Effect {
    /// Center an attachment in the fullscreen strip.
    ScrollTo(ScrollRequest),
    /// Animate an Index row's detail panel.
    PanelHeight(PanelChange),
    /// Fade an element in.
    Reveal(RevealTarget),
    /// Index rows drop their entrance offset.
    SettleRows,
}

/// The parts of the site config the shell reads.
#[derive(Debug, Clone, Default)]
pub struct ShellSettings {
    pub animation: AnimationConfig,
    pub swipe: SwipeConfig,
    pub loading: LoadingConfig,
}

impl ShellSettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            animation: config.animation.clone(),
            swipe: config.swipe.clone(),
            loading: config.loading.clone(),
        }
    }
}

#[derive(Debug)]
enum ViewState {
    Overview {
        gallery: GalleryCoordinator,
        reveals: RevealSchedule,
    },
    Index {
        rows: IndexCoordinator,
        reveals: RevealSchedule,
    },
    About {
        reveals: RevealSchedule,
    },
}

impl ViewState {
    fn view(&self) -> View {
        match self {
            ViewState::Overview { .. } => View::Overview,
            ViewState::Index { .. } => View::Index,
            ViewState::About { .. } => View::About,
        }
    }

    fn reveals_mut(&mut self) -> &mut RevealSchedule {
        match self {
            ViewState::Overview { reveals, .. }
            | ViewState::Index { reveals, .. }
            | ViewState::About { reveals } => reveals,
        }
    }

    fn teardown(&mut self) {
        match self {
            ViewState::Overview { gallery, reveals } => {
                gallery.reset();
                reveals.cancel();
            }
            ViewState::Index { rows, reveals } => {
                rows.reset();
                reveals.cancel();
            }
            ViewState::About { reveals } => reveals.cancel(),
        }
    }
}

pub struct Shell<'a> {
    content: &'a Content,
    settings: ShellSettings,
    state: ViewState,
    swipe: SwipeRecognizer,
    queue: VecDeque<Event>,
    now_ms: u64,
}

impl<'a> Shell<'a> {
    /// A shell showing the Overview at time 0.
    pub fn new(content: &'a Content, settings: ShellSettings) -> Self {
        let swipe = SwipeRecognizer::new(&settings.swipe);
        let mut shell = Self {
            content,
            settings,
            state: ViewState::About {
                reveals: RevealSchedule::new(),
            },
            swipe,
            queue: VecDeque::new(),
            now_ms: 0,
        };
        shell.state = shell.enter(View::Overview);
        shell
    }

    pub fn view(&self) -> View {
        self.state.view()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Displayable projects in display order, recomputed from the content.
    pub fn projects(&self) -> Vec<&'a Project> {
        let content: &'a Content = self.content;
        order_projects(&content.projects, &content.side_projects)
    }

    /// The Overview coordinator, while Overview is active.
    pub fn gallery(&self) -> Option<&GalleryCoordinator> {
        match &self.state {
            ViewState::Overview { gallery, .. } => Some(gallery),
            _ => None,
        }
    }

    /// The Index coordinator, while Index is active.
    pub fn index(&self) -> Option<&IndexCoordinator> {
        match &self.state {
            ViewState::Index { rows, .. } => Some(rows),
            _ => None,
        }
    }

    /// Queue an event for the next [`run`](Self::run).
    pub fn post(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Process every queued event in order, collecting their effects.
    pub fn run(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            effects.extend(self.process(event));
        }
        effects
    }

    /// Queue `event` and run the queue.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        self.post(event);
        self.run()
    }

    fn process(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            Event::Navigate(view) => self.navigate(view),
            Event::OpenProject(position) => self.open_project(position),
            Event::CloseProject => self.close_project(),
            Event::ToggleView => match &mut self.state {
                ViewState::Overview { gallery, .. } => gallery.toggle_view(),
                _ => ignored(&event, self.view()),
            },
            Event::ClickAttachment(index) => {
                effects.extend(self.click_attachment(index).map(Effect::ScrollTo));
            }
            Event::ToggleRow(row) => effects.extend(self.toggle_row(row)),
            Event::FocusImage(index) => match &mut self.state {
                ViewState::Index { rows, .. } => {
                    rows.focus_image(index);
                }
                _ => ignored(&event, self.view()),
            },
            Event::Swipe(direction) => self.swipe(direction),
            Event::Pointer(pointer) => {
                if let Some(direction) = self.swipe.handle(pointer) {
                    debug!(%direction, "shell: swipe recognized");
                    self.swipe(direction);
                }
            }
            Event::Hover(row) => self.hover(row),
            Event::Tick(now_ms) => effects.extend(self.tick(now_ms)),
        }

        if let ViewState::Overview { gallery, .. } = &mut self.state
            && let Some(request) = gallery.settle()
        {
            effects.push(Effect::ScrollTo(request));
        }
        effects
    }

    /// Build the state of `view`, with its entrance animations scheduled
    /// from now.
    fn enter(&self, view: View) -> ViewState {
        let count = self.projects().len();
        let step = self.settings.animation.stagger_ms;
        let mut reveals = RevealSchedule::new();
        match view {
            View::Overview => {
                reveals.stagger((0..count).map(RevealTarget::OverviewCard), self.now_ms, step);
                ViewState::Overview {
                    gallery: GalleryCoordinator::new(),
                    reveals,
                }
            }
            View::Index => {
                reveals.stagger((0..count).map(RevealTarget::IndexRow), self.now_ms, step);
                reveals.settle_at(
                    self.now_ms
                        .saturating_add((count as u64).saturating_mul(step))
                        .saturating_add(self.settings.animation.settle_ms),
                );
                ViewState::Index {
                    rows: IndexCoordinator::new(),
                    reveals,
                }
            }
            View::About => {
                reveals.stagger(
                    (0..AboutSection::ALL.len()).map(RevealTarget::AboutSection),
                    self.now_ms,
                    step,
                );
                ViewState::About { reveals }
            }
        }
    }

    fn navigate(&mut self, view: View) {
        if view == self.view() {
            debug!(%view, "shell: already active");
            return;
        }
        debug!(from = %self.view(), to = %view, "shell: navigate");
        self.state.teardown();
        self.swipe.reset();
        self.state = self.enter(view);
    }

    fn open_project(&mut self, position: usize) {
        let Some(project) = self.projects().get(position).copied() else {
            debug!(position, "shell: open ignored, no such project");
            return;
        };
        let (now, step) = (self.now_ms, self.settings.animation.stagger_ms);
        match &mut self.state {
            ViewState::Overview { gallery, reveals } => {
                gallery.open_project(position);
                reveals.cancel();
                reveals.stagger(
                    (0..project.attachments.len()).map(RevealTarget::GalleryMedia),
                    now,
                    step,
                );
            }
            _ => ignored(&Event::OpenProject(position), self.view()),
        }
    }

    fn close_project(&mut self) {
        let count = self.projects().len();
        let (now, step) = (self.now_ms, self.settings.animation.stagger_ms);
        match &mut self.state {
            ViewState::Overview { gallery, reveals } => {
                if gallery.close_project() {
                    reveals.cancel();
                    reveals.stagger((0..count).map(RevealTarget::OverviewCard), now, step);
                }
            }
            _ => ignored(&Event::CloseProject, self.view()),
        }
    }

    fn click_attachment(&mut self, index: usize) -> Option<ScrollRequest> {
        let projects = self.projects();
        match &mut self.state {
            ViewState::Overview { gallery, .. } => {
                let count = gallery
                    .selected()
                    .and_then(|p| projects.get(p))
                    .map_or(0, |p| p.attachments.len());
                if index >= count {
                    debug!(index, count, "shell: attachment click ignored");
                    return None;
                }
                gallery.select_attachment(index)
            }
            _ => {
                ignored(&Event::ClickAttachment(index), self.view());
                None
            }
        }
    }

    fn toggle_row(&mut self, row: usize) -> Vec<Effect> {
        let projects = self.projects();
        match &mut self.state {
            ViewState::Index { rows, .. } => match projects.get(row) {
                Some(project) => rows
                    .toggle_row(row, project.attachments.len())
                    .into_iter()
                    .map(Effect::PanelHeight)
                    .collect(),
                None => {
                    debug!(row, "shell: toggle ignored, no such row");
                    Vec::new()
                }
            },
            _ => {
                ignored(&Event::ToggleRow(row), self.view());
                Vec::new()
            }
        }
    }

    fn swipe(&mut self, direction: SwipeDirection) {
        match &mut self.state {
            ViewState::Index { rows, .. } => {
                rows.swipe(direction);
            }
            _ => ignored(&Event::Swipe(direction), self.view()),
        }
    }

    fn hover(&mut self, row: Option<usize>) {
        let count = self.projects().len();
        match &mut self.state {
            ViewState::Index { rows, .. } => {
                rows.hover(row.filter(|&r| r < count));
            }
            _ => ignored(&Event::Hover(row), self.view()),
        }
    }

    fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        let mut effects: Vec<Effect> = self
            .state
            .reveals_mut()
            .poll(now)
            .into_iter()
            .map(Effect::Reveal)
            .collect();
        if let ViewState::Index { reveals, .. } = &mut self.state
            && reveals.poll_settle(now)
        {
            effects.push(Effect::SettleRows);
        }
        effects
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Describe the current state.
    pub fn render(&self) -> Frame {
        let projects = self.projects();
        let view = self.view();
        let nav = View::ALL
            .into_iter()
            .map(|v| NavLink {
                view: v,
                label: v.label(),
                active: v == view,
            })
            .collect();

        let body = match &self.state {
            ViewState::Overview { .. } | ViewState::Index { .. } if projects.is_empty() => {
                FrameBody::Placeholder {
                    message: PLACEHOLDER_MESSAGE.to_string(),
                }
            }
            ViewState::Overview { gallery, reveals } => {
                match gallery.selected().and_then(|p| projects.get(p).map(|proj| (p, *proj))) {
                    Some((position, project)) => {
                        FrameBody::Project(self.project_frame(position, project, gallery, reveals))
                    }
                    None => FrameBody::Overview {
                        cards: projects
                            .iter()
                            .enumerate()
                            .filter_map(|(position, project)| {
                                self.card_frame(position, project, reveals)
                            })
                            .collect(),
                    },
                }
            }
            ViewState::Index { rows, reveals } => FrameBody::Index {
                rows: projects
                    .iter()
                    .enumerate()
                    .map(|(position, project)| self.row_frame(position, project, rows, reveals))
                    .collect(),
                settle_delay_ms: reveals
                    .settle_due_ms()
                    .map(|at| at.saturating_sub(self.now_ms)),
            },
            ViewState::About { reveals } => FrameBody::About(AboutFrame {
                about: self.content.general.about.clone(),
                contact: self.content.contact.clone(),
                experience: self.content.work_experience.clone(),
                sections: AboutSection::ALL
                    .into_iter()
                    .enumerate()
                    .map(|(i, section)| SectionFrame {
                        section,
                        reveal: self.reveal_state(reveals, RevealTarget::AboutSection(i)),
                    })
                    .collect(),
            }),
        };

        Frame {
            view,
            title: self.content.general.display_name.clone(),
            nav,
            body,
        }
    }

    fn reveal_state(&self, reveals: &RevealSchedule, target: RevealTarget) -> RevealState {
        RevealState {
            revealed: reveals.is_revealed(target),
            delay_ms: reveals
                .due_ms(target)
                .map(|due| due.saturating_sub(self.now_ms)),
        }
    }

    fn card_frame(
        &self,
        position: usize,
        project: &Project,
        reveals: &RevealSchedule,
    ) -> Option<CardFrame> {
        let loading = &self.settings.loading;
        let cover = project.cover()?;
        Some(CardFrame {
            position,
            title: project.title.clone(),
            year: project.year.clone(),
            cover: media_frame(
                0,
                cover,
                format!("{} cover image", project.title),
                if position < loading.eager_covers {
                    Loading::Eager
                } else {
                    Loading::Lazy
                },
                priority(position < loading.high_priority),
                RevealState::SHOWN,
            ),
            reveal: self.reveal_state(reveals, RevealTarget::OverviewCard(position)),
        })
    }

    fn project_frame(
        &self,
        position: usize,
        project: &Project,
        gallery: &GalleryCoordinator,
        reveals: &RevealSchedule,
    ) -> ProjectFrame {
        let high_priority = self.settings.loading.high_priority;
        let layout = gallery.layout();
        ProjectFrame {
            position,
            title: project.title.clone(),
            year: project.year.clone(),
            description: project.description.clone(),
            layout,
            toggle_label: match layout {
                Layout::Grid => "Fullscreen",
                Layout::Fullscreen => "Grid",
            },
            media: project
                .attachments
                .iter()
                .enumerate()
                .map(|(i, attachment)| {
                    media_frame(
                        i,
                        attachment,
                        format!("{} image {}", project.title, i + 1),
                        Loading::Eager,
                        priority(i < high_priority),
                        self.reveal_state(reveals, RevealTarget::GalleryMedia(i)),
                    )
                })
                .collect(),
            scroll_target: gallery.pending_scroll_target(),
        }
    }

    fn row_frame(
        &self,
        position: usize,
        project: &Project,
        rows: &IndexCoordinator,
        reveals: &RevealSchedule,
    ) -> RowFrame {
        let expanded = rows.is_expanded(position);
        let eager = self.settings.loading.eager_index_images;
        let media = if expanded {
            project
                .attachments
                .iter()
                .enumerate()
                .map(|(i, attachment)| {
                    media_frame(
                        i,
                        attachment,
                        format!("{} image {}", project.title, i + 1),
                        if i < eager { Loading::Eager } else { Loading::Lazy },
                        FetchPriority::Auto,
                        RevealState::SHOWN,
                    )
                })
                .collect()
        } else {
            Vec::new()
        };
        RowFrame {
            position,
            number: row_number_label(position),
            title: project.title.clone(),
            year: project.year.clone(),
            expanded,
            panel: rows.panel_height(position),
            opacity: rows.row_opacity(position),
            reveal: self.reveal_state(reveals, RevealTarget::IndexRow(position)),
            settled: reveals.is_settled(),
            description: project.description.clone(),
            counter: if expanded { rows.counter_label() } else { None },
            focused: expanded.then(|| rows.image_index(position)),
            media,
        }
    }
}

fn media_frame(
    index: usize,
    attachment: &Attachment,
    alt: String,
    loading: Loading,
    fetch_priority: FetchPriority,
    reveal: RevealState,
) -> MediaFrame {
    MediaFrame {
        index,
        kind: attachment.kind,
        url: attachment.url.clone(),
        alt,
        loading,
        fetch_priority,
        reveal,
    }
}

fn priority(high: bool) -> FetchPriority {
    if high {
        FetchPriority::High
    } else {
        FetchPriority::Auto
    }
}

fn ignored(event: &Event, view: View) {
    debug!(?event, %view, "shell: event ignored in this view");
}
