//! Raw pointer events as delivered by the host.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Position in device-independent screen space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Input subsystem that produced an event.
///
/// Platforms emulate mouse events after a touch sequence, so the same physical contact can show up
/// on both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    Touch,
    Mouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Start,
    Move,
    End,
    /// The platform aborted the contact (touchcancel).
    Cancel,
    /// Native double-click notification on the mouse channel.
    DoubleClick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub channel: Channel,
    pub phase: Phase,
    pub position: Point,
    /// Monotonic arrival time.
    pub time: Duration,
    /// Name of the page region under the pointer, if the host knows it.
    pub target: Option<String>,
}

impl PointerEvent {
    pub fn new(channel: Channel, phase: Phase, position: impl Into<Point>, time: Duration) -> Self {
        Self {
            channel,
            phase,
            position: position.into(),
            time,
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}
