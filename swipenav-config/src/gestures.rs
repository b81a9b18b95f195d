use std::time::Duration;

use crate::FloatOrInt;

/// Thresholds used to classify pointer streams into swipes, drags and taps.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Gestures {
    #[knuffel(child, unwrap(argument), default = FloatOrInt(20.))]
    pub swipe_threshold: FloatOrInt<1, 10000>,
    #[knuffel(child, unwrap(argument), default = FloatOrInt(50.))]
    pub drag_threshold: FloatOrInt<0, 10000>,
    #[knuffel(child, unwrap(argument), default = FloatOrInt(5.))]
    pub movement_threshold: FloatOrInt<0, 10000>,
    #[knuffel(child, unwrap(argument), default = 300)]
    pub double_tap_window_ms: u16,
    #[knuffel(child, unwrap(argument), default = 300)]
    pub tap_confirm_delay_ms: u16,
    #[knuffel(child, unwrap(argument), default = 500)]
    pub mouse_suppression_ms: u16,
}

impl Default for Gestures {
    fn default() -> Self {
        Self {
            swipe_threshold: FloatOrInt(20.),
            drag_threshold: FloatOrInt(50.),
            movement_threshold: FloatOrInt(5.),
            double_tap_window_ms: 300,
            tap_confirm_delay_ms: 300,
            mouse_suppression_ms: 500,
        }
    }
}

impl Gestures {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(u64::from(self.double_tap_window_ms))
    }

    pub fn tap_confirm_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.tap_confirm_delay_ms))
    }

    pub fn mouse_suppression(&self) -> Duration {
        Duration::from_millis(u64::from(self.mouse_suppression_ms))
    }
}

/// Named region of the page whose pointer events never reach the recognizer.
#[derive(knuffel::Decode, Debug, Clone, PartialEq, Eq)]
pub struct IgnoreTarget {
    #[knuffel(argument)]
    pub name: String,
}
