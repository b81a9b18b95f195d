//! Pointer input classification.
//!
//! [`PointerSurface`] is the entry point for hosts: it takes raw touch and mouse events for one
//! surface, drops emulated and excluded ones, and feeds the rest to a [`GestureRecognizer`] that
//! reports swipes, drags, taps and double-taps to a [`GestureHandler`].

pub mod event;
pub mod handler;
pub mod recognizer;
pub mod surface;
pub mod tap_timer;

pub use event::{Channel, Phase, Point, PointerEvent};
pub use handler::{Direction, Gesture, GestureHandler};
pub use recognizer::{
    EndOutcome, GestureRecognizer, GestureState, MoveOutcome, PendingTap, Thresholds,
};
pub use surface::{PointerSurface, SurfaceOutcome};
pub use tap_timer::{CalloopTapTimer, SurfaceId, TapTarget, TapTimer, TapToken};
