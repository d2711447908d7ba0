//! # Folio
//!
//! A personal portfolio site built from a single content file: an Overview
//! grid of project covers that open into a grid or fullscreen gallery, an
//! Index of numbered rows that expand into swipeable image strips, and an
//! About view with contact details and work experience.
//!
//! # Architecture: State Machine, Then Pages
//!
//! The interactive behavior lives in a small, deterministic core. Events go
//! into the navigation shell, the active view's coordinator transitions, and
//! the shell describes the result as a [`frame::Frame`]:
//!
//! ```text
//! cv.json ─▶ Content ─▶ order_projects ─▶ Shell ─┬─ Overview: GalleryCoordinator
//!                                         ▲      ├─ Index:    IndexCoordinator
//!                              events ────┘      └─ About
//!                                                       │
//!                                                       ▼
//!                                         Frame ─▶ generate (HTML) / frame (JSON)
//! ```
//!
//! The static site is generated by replaying the shell into every state that
//! deserves a URL, so the pages and the state machine can never disagree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Content store: typed, read-only view of `cv.json` |
//! | [`ordering`] | Display order of projects and side projects |
//! | [`gallery`] | Overview coordinator: open project, grid/fullscreen, scroll target |
//! | [`index_view`] | Index coordinator: expanded row, focused image, hover dimming |
//! | [`gesture`] | Pointer-to-swipe recognizer |
//! | [`reveal`] | Staggered entrance animation schedules |
//! | [`shell`] | Navigation shell: view state, event queue, effects, rendering |
//! | [`frame`] | Rendering boundary: serializable description of one state |
//! | [`generate`] | Static HTML site from replayed frames, using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`naming`] | Row labels and project directory names |
//! | [`compress`] | Batch PNG recompression with backups |
//! | [`cache`] | Content-addressed cache for the compression job |
//! | [`imaging`] | Pure-Rust PNG decode/encode behind a backend trait |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Time Is an Event
//!
//! Nothing in the core reads a clock. Entrance animations are schedules of
//! due times advanced by `Tick` events, so a test can say "at 800 ms the
//! Index rows settle" and mean it exactly.
//!
//! ## Views Own Their State
//!
//! The shell keeps one tagged variant per view. Leaving a view tears its
//! coordinator and schedule down before the next view's state exists, so a
//! late timer or a stale scroll target has nowhere to land.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup is
//! a build error and all interpolation is auto-escaped.

pub mod cache;
pub mod compress;
pub mod config;
pub mod content;
pub mod frame;
pub mod gallery;
pub mod generate;
pub mod gesture;
pub mod imaging;
pub mod index_view;
pub mod logging;
pub mod naming;
pub mod ordering;
pub mod output;
pub mod reveal;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_helpers;
