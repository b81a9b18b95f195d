//! Classification of a single pointer stream into swipe, drag, tap or double-tap.
//!
//! A stream is a start event, any number of moves, and an end event. While the pointer is down,
//! horizontal-dominant motion is accumulated and fires one swipe step every time it crosses the
//! swipe threshold. On release the stream becomes a drag if it moved, a double-tap if it closely
//! follows the previous gesture, or a tap candidate that is confirmed later through [`TapTimer`].

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use swipenav_config::Gestures;

use super::event::Point;
use super::handler::{Direction, GestureHandler};
use super::tap_timer::{TapTimer, TapToken};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Accumulated horizontal distance that fires one swipe step.
    pub swipe: f64,
    /// Net horizontal displacement from start to end that makes a moved stream a drag.
    pub drag: f64,
    /// Displacement in either axis after which a stream is no longer a tap.
    pub movement: f64,
    pub double_tap_window: Duration,
    pub tap_confirm_delay: Duration,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&Gestures::default())
    }
}

impl From<&Gestures> for Thresholds {
    fn from(config: &Gestures) -> Self {
        Self {
            swipe: config.swipe_threshold.0,
            drag: config.drag_threshold.0,
            movement: config.movement_threshold.0,
            double_tap_window: config.double_tap_window(),
            tap_confirm_delay: config.tap_confirm_delay(),
        }
    }
}

/// A tap waiting to see whether a second one turns it into a double-tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTap {
    pub token: TapToken,
    pub x: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GestureState {
    pub start: Point,
    pub last_x: f64,
    /// Signed horizontal travel since the stream started or the last swipe step fired.
    pub accumulated_distance: f64,
    pub is_active: bool,
    pub has_moved: bool,
    pub last_gesture_end_time: Option<Duration>,
    pub pending_tap: Option<PendingTap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A swipe step fired; the host should suppress default scrolling.
    Swipe(Direction),
    /// Horizontal tracking is in progress; the host should suppress default scrolling.
    SuppressDefault,
    /// The move was ignored and the host may scroll as usual.
    NotHandled,
}

impl MoveOutcome {
    pub fn suppresses_default(self) -> bool {
        !matches!(self, Self::NotHandled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// The stream moved. Carries the drag direction if it travelled past the drag threshold.
    Drag(Option<Direction>),
    DoubleTap,
    /// A single tap is waiting for confirmation.
    TapPending(TapToken),
    /// The confirmation could not be scheduled, so the tap was reported right away.
    Tap,
    NotHandled,
}

pub struct GestureRecognizer<H, T> {
    thresholds: Thresholds,
    state: GestureState,
    handler: H,
    timer: T,
    next_token: u64,
}

impl<H: GestureHandler, T: TapTimer> GestureRecognizer<H, T> {
    pub fn new(thresholds: Thresholds, handler: H, timer: T) -> Self {
        Self {
            thresholds,
            state: GestureState::default(),
            handler,
            timer,
            next_token: 0,
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn pending_tap(&self) -> Option<TapToken> {
        self.state.pending_tap.map(|pending| pending.token)
    }

    pub fn handle_start(&mut self, position: Point, time: Duration) {
        if self.state.is_active {
            debug!("gesture restarted without an end event");
        }
        trace!(?time, x = position.x, y = position.y, "gesture start");

        self.cancel_pending_tap();

        let state = &mut self.state;
        state.start = position;
        state.last_x = position.x;
        state.accumulated_distance = 0.;
        state.is_active = true;
        state.has_moved = false;
    }

    pub fn handle_move(&mut self, position: Point) -> MoveOutcome {
        let thresholds = self.thresholds;
        let state = &mut self.state;
        if !state.is_active {
            return MoveOutcome::NotHandled;
        }

        let dx = position.x - state.start.x;
        let dy = position.y - state.start.y;
        if dx.abs() > thresholds.movement || dy.abs() > thresholds.movement {
            state.has_moved = true;
        }

        // Vertical-dominant motion is left to page scrolling.
        if dx.abs() <= dy.abs() {
            return MoveOutcome::NotHandled;
        }

        state.accumulated_distance += position.x - state.last_x;
        state.last_x = position.x;

        if state.accumulated_distance.abs() < thresholds.swipe {
            return MoveOutcome::SuppressDefault;
        }

        let direction = Direction::from_displacement(state.accumulated_distance);
        state.accumulated_distance = 0.;
        debug!("swipe {direction:?}");
        self.dispatch("swipe", |handler| handler.on_swipe(direction));
        MoveOutcome::Swipe(direction)
    }

    pub fn handle_end(&mut self, position: Point, time: Duration) -> EndOutcome {
        if !self.state.is_active {
            return EndOutcome::NotHandled;
        }

        if self.state.has_moved {
            let net_dx = position.x - self.state.start.x;
            let direction =
                (net_dx.abs() > self.thresholds.drag).then(|| Direction::from_displacement(net_dx));

            self.reset();
            self.state.last_gesture_end_time = Some(time);

            if let Some(direction) = direction {
                debug!("drag {direction:?}");
                self.dispatch("drag", |handler| handler.on_drag(direction));
            } else {
                trace!("moved gesture ended short of the drag threshold");
            }
            return EndOutcome::Drag(direction);
        }

        if self.is_within_double_tap_window(time) {
            self.reset();
            self.state.last_gesture_end_time = Some(time);

            debug!("double tap");
            self.dispatch("double tap", |handler| handler.on_double_tap());
            return EndOutcome::DoubleTap;
        }

        self.cancel_pending_tap();

        let token = TapToken(self.next_token);
        self.next_token += 1;
        let armed = self.timer.schedule(token, self.thresholds.tap_confirm_delay);

        self.state.is_active = false;
        self.state.accumulated_distance = 0.;
        self.state.last_gesture_end_time = Some(time);

        if !armed {
            warn!("tap confirmation could not be scheduled, reporting tap immediately");
            let x = position.x;
            self.dispatch("tap", |handler| handler.on_tap(x));
            return EndOutcome::Tap;
        }

        self.state.pending_tap = Some(PendingTap {
            token,
            x: position.x,
        });

        trace!("tap pending as {token:?}");
        EndOutcome::TapPending(token)
    }

    /// Abandons the current stream without classifying it.
    pub fn handle_cancel(&mut self) -> bool {
        if !self.state.is_active {
            return false;
        }

        trace!("gesture cancelled");
        self.reset();
        true
    }

    /// Delivers the tap confirmation for `token`.
    ///
    /// Returns `false` if `token` is no longer the pending tap, in which case nothing fires.
    pub fn confirm_tap(&mut self, token: TapToken) -> bool {
        self.timer.expired(token);

        match self.state.pending_tap {
            Some(pending) if pending.token == token => {
                self.state.pending_tap = None;
                debug!("tap at x={}", pending.x);
                self.dispatch("tap", |handler| handler.on_tap(pending.x));
                true
            }
            _ => {
                trace!("ignoring stale tap confirmation {token:?}");
                false
            }
        }
    }

    fn is_within_double_tap_window(&self, time: Duration) -> bool {
        let Some(last) = self.state.last_gesture_end_time else {
            return false;
        };

        match time.checked_sub(last) {
            Some(elapsed) => !elapsed.is_zero() && elapsed < self.thresholds.double_tap_window,
            None => false,
        }
    }

    fn cancel_pending_tap(&mut self) {
        if let Some(pending) = self.state.pending_tap.take() {
            trace!("cancelling pending tap {:?}", pending.token);
            self.timer.cancel(pending.token);
        }
    }

    fn reset(&mut self) {
        self.cancel_pending_tap();

        let state = &mut self.state;
        state.is_active = false;
        state.has_moved = false;
        state.accumulated_distance = 0.;
    }

    /// Runs a handler callback, containing any panic so that it can't unwind into the event loop.
    ///
    /// State transitions must be complete before this is called.
    fn dispatch(&mut self, name: &str, f: impl FnOnce(&mut H)) {
        let handler = &mut self.handler;
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| f(handler))) {
            let msg = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string panic payload>");
            error!("{name} callback panicked: {msg}");
        }
    }
}
