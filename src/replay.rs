//! Replaying recorded pointer traces through the recognizer on a calloop event loop.
//!
//! Events are delivered in file order at their recorded offsets from the first event, so tap
//! confirmations race following events exactly as they would on a live surface.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopHandle};
use serde::{Deserialize, Serialize};
use swipenav_config::Config;

use crate::input::{
    CalloopTapTimer, Channel, Gesture, GestureHandler, GestureRecognizer, Phase, PointerEvent,
    PointerSurface, SurfaceId, TapTarget, TapToken, Thresholds,
};

/// Surface name used for trace events that don't name one.
pub const DEFAULT_SURFACE: &str = "main";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceEvent {
    pub time_ms: u64,
    pub channel: Channel,
    pub phase: Phase,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub surface: Option<String>,
}

impl TraceEvent {
    pub fn surface_name(&self) -> &str {
        self.surface.as_deref().unwrap_or(DEFAULT_SURFACE)
    }

    pub fn to_pointer_event(&self) -> PointerEvent {
        PointerEvent {
            channel: self.channel,
            phase: self.phase,
            position: (self.x, self.y).into(),
            time: Duration::from_millis(self.time_ms),
            target: self.target.clone(),
        }
    }
}

pub fn parse_trace(text: &str) -> anyhow::Result<Vec<TraceEvent>> {
    serde_json::from_str(text).context("error parsing trace")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureRecord {
    pub surface: String,
    pub gesture: Gesture,
}

pub struct ReplayHandler {
    surface: String,
    records: Rc<RefCell<Vec<GestureRecord>>>,
}

impl ReplayHandler {
    fn record(&self, gesture: Gesture) {
        info!("{}: {gesture:?}", self.surface);
        self.records.borrow_mut().push(GestureRecord {
            surface: self.surface.clone(),
            gesture,
        });
    }
}

impl GestureHandler for ReplayHandler {
    fn on_swipe(&mut self, direction: crate::input::Direction) {
        self.record(Gesture::Swipe { direction });
    }

    fn on_drag(&mut self, direction: crate::input::Direction) {
        self.record(Gesture::Drag { direction });
    }

    fn on_tap(&mut self, x: f64) {
        self.record(Gesture::Tap { x });
    }

    fn on_double_tap(&mut self) {
        self.record(Gesture::DoubleTap);
    }
}

type ReplaySurface = PointerSurface<ReplayHandler, CalloopTapTimer<ReplayState>>;

pub struct ReplayState {
    config: Config,
    event_loop: LoopHandle<'static, ReplayState>,
    surfaces: Vec<ReplaySurface>,
    surface_ids: HashMap<String, SurfaceId>,
    queue: VecDeque<TraceEvent>,
    records: Rc<RefCell<Vec<GestureRecord>>>,
}

impl TapTarget for ReplayState {
    fn confirm_tap(&mut self, surface: SurfaceId, token: TapToken) {
        match self.surfaces.get_mut(surface.0) {
            Some(surface) => {
                surface.confirm_tap(token);
            }
            None => error!("tap confirmation for unknown surface {surface:?}"),
        }
    }
}

impl ReplayState {
    fn new(
        config: Config,
        event_loop: LoopHandle<'static, ReplayState>,
        events: Vec<TraceEvent>,
    ) -> Self {
        Self {
            config,
            event_loop,
            surfaces: Vec::new(),
            surface_ids: HashMap::new(),
            queue: events.into(),
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Whether every event was delivered and no tap is still waiting for confirmation.
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
            && self
                .surfaces
                .iter()
                .all(|surface| surface.recognizer().pending_tap().is_none())
    }

    fn surface_id(&mut self, name: &str) -> SurfaceId {
        if let Some(id) = self.surface_ids.get(name) {
            return *id;
        }

        let id = SurfaceId(self.surfaces.len());
        debug!("attaching surface {name:?} as {id:?}");

        let gestures = &self.config.gestures;
        let handler = ReplayHandler {
            surface: name.to_owned(),
            records: self.records.clone(),
        };
        let timer = CalloopTapTimer::new(self.event_loop.clone(), id);
        let recognizer = GestureRecognizer::new(Thresholds::from(gestures), handler, timer);

        let config = self.config.clone();
        let surface = PointerSurface::new(recognizer, gestures.mouse_suppression())
            .with_ignore(move |target| config.is_ignored_target(target));

        self.surfaces.push(surface);
        self.surface_ids.insert(name.to_owned(), id);
        id
    }

    fn deliver(&mut self, event: TraceEvent) {
        let id = self.surface_id(event.surface_name());
        let outcome = self.surfaces[id.0].handle_event(&event.to_pointer_event());
        trace!(
            "{}ms {:?} {:?} -> {outcome:?}",
            event.time_ms,
            event.channel,
            event.phase
        );
    }
}

/// Replays `events` in real time and returns the gestures recognized on every surface.
pub fn replay(config: &Config, events: Vec<TraceEvent>) -> anyhow::Result<Vec<GestureRecord>> {
    let mut event_loop: EventLoop<'static, ReplayState> =
        EventLoop::try_new().context("error creating event loop")?;

    let origin = events.first().map_or(0, |event| event.time_ms);
    let mut state = ReplayState::new(config.clone(), event_loop.handle(), events);
    let records = state.records.clone();

    let start = Instant::now();
    event_loop
        .handle()
        .insert_source(Timer::immediate(), move |_, _, state: &mut ReplayState| {
            while let Some(event) = state.queue.pop_front() {
                let due = start + Duration::from_millis(event.time_ms.saturating_sub(origin));
                if due > Instant::now() {
                    state.queue.push_front(event);
                    return TimeoutAction::ToInstant(due);
                }

                state.deliver(event);
            }

            TimeoutAction::Drop
        })
        .map_err(|err| anyhow!("error inserting replay timer: {}", err.error))?;

    let signal = event_loop.get_signal();
    event_loop
        .run(None, &mut state, |state| {
            if state.is_finished() {
                signal.stop();
            }
        })
        .context("error running event loop")?;

    drop(state);
    let records = records.take();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::*;

    fn fast_config() -> Config {
        Config::parse(
            "test.kdl",
            r#"
            gestures {
                double-tap-window-ms 40
                tap-confirm-delay-ms 30
            }
            ignore-target "alphabet-index"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn parse_trace_events() {
        let events = parse_trace(
            r#"[
                {"time_ms": 0, "channel": "touch", "phase": "start", "x": 10, "y": 20},
                {"time_ms": 16, "channel": "mouse", "phase": "double-click", "x": 10.5, "y": 20,
                 "target": "alphabet-index", "surface": "index"}
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].surface_name(), DEFAULT_SURFACE);
        assert_eq!(events[1].phase, Phase::DoubleClick);
        assert_eq!(events[1].surface_name(), "index");

        let event = events[1].to_pointer_event();
        assert_eq!(event.time, Duration::from_millis(16));
        assert_eq!(event.target.as_deref(), Some("alphabet-index"));
    }

    #[test]
    fn parse_trace_rejects_unknown_phase() {
        let err = parse_trace(r#"[{"time_ms": 0, "channel": "touch", "phase": "hover", "x": 0, "y": 0}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn empty_trace() {
        let records = replay(&Config::default(), Vec::new()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn replay_on_event_loop() {
        let events = parse_trace(
            r#"[
                {"time_ms": 1000, "channel": "touch", "phase": "start", "x": 300, "y": 200},
                {"time_ms": 1005, "channel": "touch", "phase": "move", "x": 275, "y": 201},
                {"time_ms": 1010, "channel": "touch", "phase": "end", "x": 275, "y": 201},
                {"time_ms": 1020, "channel": "mouse", "phase": "start", "x": 275, "y": 201},
                {"time_ms": 1021, "channel": "mouse", "phase": "end", "x": 275, "y": 201},
                {"time_ms": 1100, "channel": "touch", "phase": "start", "x": 90, "y": 90},
                {"time_ms": 1110, "channel": "touch", "phase": "end", "x": 90, "y": 90},
                {"time_ms": 1200, "channel": "touch", "phase": "start", "x": 5, "y": 5,
                 "target": "alphabet-index"},
                {"time_ms": 1210, "channel": "touch", "phase": "end", "x": 5, "y": 5,
                 "target": "alphabet-index"}
            ]"#,
        )
        .unwrap();

        let records = replay(&fast_config(), events).unwrap();
        let gestures: Vec<_> = records.iter().map(|record| record.gesture).collect();
        assert_eq!(
            gestures,
            [
                Gesture::Swipe {
                    direction: Direction::Next
                },
                Gesture::Tap { x: 90. },
            ]
        );
    }

    #[test]
    fn surfaces_are_independent() {
        let events = parse_trace(
            r#"[
                {"time_ms": 0, "channel": "touch", "phase": "start", "x": 10, "y": 10, "surface": "a"},
                {"time_ms": 5, "channel": "touch", "phase": "end", "x": 10, "y": 10, "surface": "a"},
                {"time_ms": 10, "channel": "touch", "phase": "start", "x": 20, "y": 10, "surface": "b"},
                {"time_ms": 15, "channel": "touch", "phase": "end", "x": 20, "y": 10, "surface": "b"}
            ]"#,
        )
        .unwrap();

        let mut records = replay(&fast_config(), events).unwrap();
        records.sort_by(|a, b| a.surface.cmp(&b.surface));
        assert_eq!(
            records,
            [
                GestureRecord {
                    surface: "a".to_owned(),
                    gesture: Gesture::Tap { x: 10. },
                },
                GestureRecord {
                    surface: "b".to_owned(),
                    gesture: Gesture::Tap { x: 20. },
                },
            ]
        );
    }
}
