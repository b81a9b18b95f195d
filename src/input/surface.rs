//! Attaching a recognizer to both the touch and the mouse channel of one surface.

use std::fmt;
use std::time::Duration;

use super::event::{Channel, Phase, PointerEvent};
use super::handler::GestureHandler;
use super::recognizer::{EndOutcome, GestureRecognizer, MoveOutcome};
use super::tap_timer::{TapTimer, TapToken};

/// What became of a pointer event routed through a [`PointerSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOutcome {
    /// The event targets an ignored region.
    Filtered,
    /// Emulated mouse event following a touch, or an event from the other channel while a stream
    /// is active.
    Suppressed,
    Started,
    Moved(MoveOutcome),
    Ended(EndOutcome),
    Cancelled(bool),
    /// Native double-click; the host should prevent its default selection behavior.
    DoubleClick,
}

impl SurfaceOutcome {
    /// Whether the host should prevent the default action for the event.
    pub fn suppresses_default(self) -> bool {
        match self {
            Self::Moved(outcome) => outcome.suppresses_default(),
            Self::DoubleClick => true,
            _ => false,
        }
    }
}

type IgnorePredicate = Box<dyn Fn(&str) -> bool>;

pub struct PointerSurface<H, T> {
    recognizer: GestureRecognizer<H, T>,
    mouse_suppression: Duration,
    last_touch_end: Option<Duration>,
    /// Channel that opened the active stream.
    active_channel: Option<Channel>,
    ignore: Option<IgnorePredicate>,
}

impl<H, T> fmt::Debug for PointerSurface<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerSurface")
            .field("mouse_suppression", &self.mouse_suppression)
            .field("last_touch_end", &self.last_touch_end)
            .field("active_channel", &self.active_channel)
            .field("ignore", &self.ignore.is_some())
            .finish_non_exhaustive()
    }
}

impl<H: GestureHandler, T: TapTimer> PointerSurface<H, T> {
    pub fn new(recognizer: GestureRecognizer<H, T>, mouse_suppression: Duration) -> Self {
        Self {
            recognizer,
            mouse_suppression,
            last_touch_end: None,
            active_channel: None,
            ignore: None,
        }
    }

    /// Drops every event whose target satisfies `predicate`, on both channels.
    pub fn with_ignore(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.ignore = Some(Box::new(predicate));
        self
    }

    pub fn recognizer(&self) -> &GestureRecognizer<H, T> {
        &self.recognizer
    }

    pub fn recognizer_mut(&mut self) -> &mut GestureRecognizer<H, T> {
        &mut self.recognizer
    }

    pub fn last_touch_end(&self) -> Option<Duration> {
        self.last_touch_end
    }

    pub fn active_channel(&self) -> Option<Channel> {
        self.active_channel
    }

    pub fn handle_event(&mut self, event: &PointerEvent) -> SurfaceOutcome {
        if self.is_ignored(event) {
            trace!("ignoring {:?} {:?} on excluded target", event.channel, event.phase);
            return SurfaceOutcome::Filtered;
        }

        if self.is_foreign_to_stream(event) {
            trace!(
                "dropping {:?} {:?} during {:?} stream",
                event.channel,
                event.phase,
                self.active_channel
            );
            return SurfaceOutcome::Suppressed;
        }

        match event.channel {
            Channel::Touch => {
                if event.phase == Phase::End {
                    self.last_touch_end = Some(event.time);
                }
            }
            Channel::Mouse => {
                if self.is_emulated_mouse(event) {
                    trace!("suppressing emulated mouse {:?}", event.phase);
                    return SurfaceOutcome::Suppressed;
                }
            }
        }

        let recognizer = &mut self.recognizer;
        let outcome = match event.phase {
            Phase::Start => {
                recognizer.handle_start(event.position, event.time);
                SurfaceOutcome::Started
            }
            Phase::Move => SurfaceOutcome::Moved(recognizer.handle_move(event.position)),
            Phase::End => SurfaceOutcome::Ended(recognizer.handle_end(event.position, event.time)),
            Phase::Cancel => SurfaceOutcome::Cancelled(recognizer.handle_cancel()),
            Phase::DoubleClick => SurfaceOutcome::DoubleClick,
        };

        if event.phase != Phase::DoubleClick {
            self.active_channel = self.recognizer.is_active().then_some(event.channel);
        }
        outcome
    }

    pub fn confirm_tap(&mut self, token: TapToken) -> bool {
        self.recognizer.confirm_tap(token)
    }

    fn is_ignored(&self, event: &PointerEvent) -> bool {
        match (&self.ignore, &event.target) {
            (Some(ignore), Some(target)) => ignore(target),
            _ => false,
        }
    }

    /// Move, end and cancel only belong to the channel that started the stream.
    fn is_foreign_to_stream(&self, event: &PointerEvent) -> bool {
        if !matches!(event.phase, Phase::Move | Phase::End | Phase::Cancel) {
            return false;
        }

        self.active_channel.is_some_and(|channel| channel != event.channel)
    }

    fn is_emulated_mouse(&self, event: &PointerEvent) -> bool {
        let Some(touch_end) = self.last_touch_end else {
            return false;
        };

        event.time.saturating_sub(touch_end) < self.mouse_suppression
    }
}
