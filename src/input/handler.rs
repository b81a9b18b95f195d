use serde::Serialize;

/// Navigation direction of a swipe or drag.
///
/// Content follows the finger, so moving right reveals the previous item and moving left the next
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Direction for a signed horizontal displacement.
    pub fn from_displacement(dx: f64) -> Self {
        if dx > 0. {
            Self::Previous
        } else {
            Self::Next
        }
    }

    /// Index step: -1 for previous, +1 for next.
    pub fn step(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Receiver of classified gestures.
///
/// Each method is invoked at most once per resolved gesture, and never re-entrantly.
pub trait GestureHandler {
    /// Accumulated horizontal motion crossed the swipe threshold while the pointer is down.
    fn on_swipe(&mut self, direction: Direction);

    /// The pointer was released far enough from where it went down.
    fn on_drag(&mut self, direction: Direction);

    /// A tap went unanswered for the confirmation delay. `x` is the release coordinate.
    fn on_tap(&mut self, x: f64);

    fn on_double_tap(&mut self);
}

/// A classified gesture, for hosts that would rather collect than react.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gesture {
    Swipe { direction: Direction },
    Drag { direction: Direction },
    Tap { x: f64 },
    DoubleTap,
}

impl GestureHandler for Vec<Gesture> {
    fn on_swipe(&mut self, direction: Direction) {
        self.push(Gesture::Swipe { direction });
    }

    fn on_drag(&mut self, direction: Direction) {
        self.push(Gesture::Drag { direction });
    }

    fn on_tap(&mut self, x: f64) {
        self.push(Gesture::Tap { x });
    }

    fn on_double_tap(&mut self) {
        self.push(Gesture::DoubleTap);
    }
}
