//! Deferred single-tap confirmation.
//!
//! A tap is only reported once the confirmation delay passes without a second tap arriving. The
//! recognizer keeps the identity of the outstanding confirmation as a [`TapToken`] in its state;
//! the timer merely reports back which token expired, so a late expiry for a token that was
//! already cancelled is harmless.

use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TapToken(pub u64);

/// Schedules tap confirmations on behalf of a recognizer.
pub trait TapTimer {
    /// Arms a confirmation for `token` that should fire after `delay`.
    ///
    /// Returns `false` if the confirmation could not be armed and will never fire.
    fn schedule(&mut self, token: TapToken, delay: Duration) -> bool;

    /// Disarms the confirmation for `token` if it has not fired yet.
    fn cancel(&mut self, token: TapToken);

    /// Called by the recognizer when the confirmation for `token` was delivered.
    fn expired(&mut self, _token: TapToken) {}
}

/// Index of a surface within its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

/// Event loop data that can route an expired tap confirmation to its surface.
pub trait TapTarget {
    fn confirm_tap(&mut self, surface: SurfaceId, token: TapToken);
}

/// [`TapTimer`] backed by a calloop timer source.
pub struct CalloopTapTimer<D: 'static> {
    event_loop: LoopHandle<'static, D>,
    surface: SurfaceId,
    armed: Option<(TapToken, RegistrationToken)>,
}

impl<D: TapTarget + 'static> CalloopTapTimer<D> {
    pub fn new(event_loop: LoopHandle<'static, D>, surface: SurfaceId) -> Self {
        Self {
            event_loop,
            surface,
            armed: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl<D: TapTarget + 'static> TapTimer for CalloopTapTimer<D> {
    fn schedule(&mut self, token: TapToken, delay: Duration) -> bool {
        if let Some((previous, registration)) = self.armed.take() {
            trace!("replacing tap confirmation {previous:?}");
            self.event_loop.remove(registration);
        }

        let surface = self.surface;
        let timer = Timer::from_duration(delay);
        match self
            .event_loop
            .insert_source(timer, move |_, _, data: &mut D| {
                data.confirm_tap(surface, token);
                TimeoutAction::Drop
            }) {
            Ok(registration) => {
                self.armed = Some((token, registration));
                true
            }
            Err(err) => {
                error!("error arming tap confirmation timer: {}", err.error);
                false
            }
        }
    }

    fn cancel(&mut self, token: TapToken) {
        match self.armed {
            Some((armed, registration)) if armed == token => {
                self.event_loop.remove(registration);
                self.armed = None;
            }
            _ => (),
        }
    }

    fn expired(&mut self, token: TapToken) {
        // The source drops itself after firing.
        if matches!(self.armed, Some((armed, _)) if armed == token) {
            self.armed = None;
        }
    }
}
