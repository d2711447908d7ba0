//! Swipe recognition.
//!
//! Turns raw pointer events into swipe directions that feed the same
//! transition API as clicks. A gesture starts on pointer-down, and is judged
//! on pointer-up: if the larger of the horizontal and vertical displacements
//! reaches `delta`, it is a swipe along that axis, otherwise a tap.
//!
//! Only one gesture is tracked at a time. A second pointer-down while one is
//! in flight (another finger, a mouse during a touch) is ignored, so two
//! recognitions can never interleave.

use crate::config::SwipeConfig;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
        };
        f.write_str(name)
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(SwipeDirection::Left),
            "right" => Ok(SwipeDirection::Right),
            "up" => Ok(SwipeDirection::Up),
            "down" => Ok(SwipeDirection::Down),
            other => Err(format!("unknown swipe direction '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn touch(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            kind: PointerKind::Touch,
            x,
            y,
        }
    }

    pub fn mouse(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            kind: PointerKind::Mouse,
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    kind: PointerKind,
    start: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    delta: f64,
    track_mouse: bool,
    track_touch: bool,
    active: Option<Gesture>,
}

impl SwipeRecognizer {
    pub fn new(config: &SwipeConfig) -> Self {
        Self {
            delta: f64::from(config.delta),
            track_mouse: config.track_mouse,
            track_touch: config.track_touch,
            active: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Drop any gesture in flight.
    pub fn reset(&mut self) {
        self.active = None;
    }

    fn tracks(&self, kind: PointerKind) -> bool {
        match kind {
            PointerKind::Touch => self.track_touch,
            PointerKind::Mouse => self.track_mouse,
        }
    }

    /// Feed one pointer event. Returns a direction when a swipe completes.
    pub fn handle(&mut self, event: PointerEvent) -> Option<SwipeDirection> {
        match event.phase {
            PointerPhase::Down => {
                if self.active.is_none() && self.tracks(event.kind) {
                    self.active = Some(Gesture {
                        kind: event.kind,
                        start: (event.x, event.y),
                    });
                }
                None
            }
            // Only the release position decides the direction.
            PointerPhase::Move => None,
            PointerPhase::Up => {
                let gesture = self.active.filter(|g| g.kind == event.kind)?;
                self.active = None;
                let dx = event.x - gesture.start.0;
                let dy = event.y - gesture.start.1;
                self.classify(dx, dy)
            }
            PointerPhase::Cancel => {
                if self.active.is_some_and(|g| g.kind == event.kind) {
                    self.active = None;
                }
                None
            }
        }
    }

    fn classify(&self, dx: f64, dy: f64) -> Option<SwipeDirection> {
        let (abs_x, abs_y) = (dx.abs(), dy.abs());
        if abs_x.max(abs_y) < self.delta {
            return None;
        }
        Some(if abs_x > abs_y {
            if dx < 0.0 {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            }
        } else if dy < 0.0 {
            SwipeDirection::Up
        } else {
            SwipeDirection::Down
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> SwipeRecognizer {
        SwipeRecognizer::new(&SwipeConfig::default())
    }

    fn swipe(r: &mut SwipeRecognizer, from: (f64, f64), to: (f64, f64)) -> Option<SwipeDirection> {
        r.handle(PointerEvent::touch(PointerPhase::Down, from.0, from.1));
        r.handle(PointerEvent::touch(PointerPhase::Move, to.0, to.1));
        r.handle(PointerEvent::touch(PointerPhase::Up, to.0, to.1))
    }

    #[test]
    fn horizontal_swipes() {
        let mut r = recognizer();
        assert_eq!(swipe(&mut r, (200.0, 50.0), (100.0, 60.0)), Some(SwipeDirection::Left));
        assert_eq!(swipe(&mut r, (100.0, 50.0), (180.0, 40.0)), Some(SwipeDirection::Right));
    }

    #[test]
    fn vertical_swipes() {
        let mut r = recognizer();
        assert_eq!(swipe(&mut r, (100.0, 200.0), (105.0, 100.0)), Some(SwipeDirection::Up));
        assert_eq!(swipe(&mut r, (100.0, 100.0), (95.0, 200.0)), Some(SwipeDirection::Down));
    }

    #[test]
    fn short_movement_is_a_tap() {
        let mut r = recognizer();
        assert_eq!(swipe(&mut r, (100.0, 100.0), (105.0, 103.0)), None);
        assert!(!r.is_tracking());
    }

    #[test]
    fn second_pointer_down_is_ignored_mid_gesture() {
        let mut r = recognizer();
        r.handle(PointerEvent::touch(PointerPhase::Down, 300.0, 0.0));
        r.handle(PointerEvent::mouse(PointerPhase::Down, 0.0, 0.0));
        // Mouse release does not end the touch gesture.
        assert_eq!(r.handle(PointerEvent::mouse(PointerPhase::Up, 200.0, 0.0)), None);
        assert!(r.is_tracking());
        assert_eq!(
            r.handle(PointerEvent::touch(PointerPhase::Up, 100.0, 0.0)),
            Some(SwipeDirection::Left)
        );
    }

    #[test]
    fn mouse_ignored_when_not_tracked() {
        let config = SwipeConfig {
            track_mouse: false,
            ..SwipeConfig::default()
        };
        let mut r = SwipeRecognizer::new(&config);
        r.handle(PointerEvent::mouse(PointerPhase::Down, 300.0, 0.0));
        assert!(!r.is_tracking());
        assert_eq!(r.handle(PointerEvent::mouse(PointerPhase::Up, 0.0, 0.0)), None);
    }

    #[test]
    fn release_position_decides_direction() {
        let mut r = recognizer();
        r.handle(PointerEvent::touch(PointerPhase::Down, 100.0, 0.0));
        r.handle(PointerEvent::touch(PointerPhase::Move, -200.0, 0.0));
        assert_eq!(r.handle(PointerEvent::touch(PointerPhase::Up, 104.0, 0.0)), None);
        assert!(!r.is_tracking());
    }

    #[test]
    fn cancel_drops_gesture() {
        let mut r = recognizer();
        r.handle(PointerEvent::touch(PointerPhase::Down, 300.0, 0.0));
        r.handle(PointerEvent::touch(PointerPhase::Cancel, 0.0, 0.0));
        assert_eq!(r.handle(PointerEvent::touch(PointerPhase::Up, 0.0, 0.0)), None);
    }

    #[test]
    fn direction_round_trips_through_text() {
        assert_eq!("left".parse::<SwipeDirection>(), Ok(SwipeDirection::Left));
        assert_eq!(SwipeDirection::Right.to_string(), "right");
        assert!("sideways".parse::<SwipeDirection>().is_err());
    }
}
