#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use miette::{Context, IntoDiagnostic};

pub mod gestures;
pub mod utils;

pub use crate::gestures::{Gestures, IgnoreTarget};
pub use crate::utils::FloatOrInt;

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub gestures: Gestures,
    #[knuffel(children(name = "ignore-target"))]
    pub ignore_targets: Vec<IgnoreTarget>,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        knuffel::parse(filename, text)
    }

    /// Whether pointer events aimed at `target` should be dropped before classification.
    pub fn is_ignored_target(&self, target: &str) -> bool {
        self.ignore_targets.iter().any(|t| t.name == target)
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;

    #[track_caller]
    fn do_parse(text: &str) -> Config {
        Config::parse("test.kdl", text)
            .map_err(miette::Report::new)
            .unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(do_parse(""), Config::default());
        assert_eq!(do_parse("gestures {}"), Config::default());
    }

    #[test]
    fn default_config_file_parses() {
        let config = do_parse(include_str!("../../resources/default-config.kdl"));
        assert_eq!(config.gestures, Gestures::default());
        assert!(config.is_ignored_target("alphabet-index"));
    }

    #[test]
    fn parse() {
        let parsed = do_parse(
            r#"
            gestures {
                swipe-threshold 32.5
                drag-threshold 80
                movement-threshold 0
                double-tap-window-ms 250
                tap-confirm-delay-ms 200
                mouse-suppression-ms 700
            }

            ignore-target "alphabet-index"
            ignore-target "chapter-header"
            "#,
        );

        assert_debug_snapshot!(parsed, @r#"
        Config {
            gestures: Gestures {
                swipe_threshold: FloatOrInt(
                    32.5,
                ),
                drag_threshold: FloatOrInt(
                    80.0,
                ),
                movement_threshold: FloatOrInt(
                    0.0,
                ),
                double_tap_window_ms: 250,
                tap_confirm_delay_ms: 200,
                mouse_suppression_ms: 700,
            },
            ignore_targets: [
                IgnoreTarget {
                    name: "alphabet-index",
                },
                IgnoreTarget {
                    name: "chapter-header",
                },
            ],
        }
        "#);

        assert!(parsed.is_ignored_target("chapter-header"));
        assert!(!parsed.is_ignored_target("verse-text"));
    }

    #[test]
    fn partial_gestures_keep_other_defaults() {
        let parsed = do_parse("gestures { swipe-threshold 40; }");
        assert_eq!(parsed.gestures.swipe_threshold, FloatOrInt(40.));
        assert_eq!(parsed.gestures.drag_threshold, FloatOrInt(50.));
        assert_eq!(parsed.gestures.double_tap_window_ms, 300);
    }

    #[test]
    fn zero_swipe_threshold_is_rejected() {
        assert!(Config::parse("test.kdl", "gestures { swipe-threshold 0; }").is_err());
    }

    #[test]
    fn negative_drag_threshold_is_rejected() {
        assert!(Config::parse("test.kdl", "gestures { drag-threshold -3; }").is_err());
    }

    #[test]
    fn string_threshold_is_rejected() {
        assert!(Config::parse("test.kdl", r#"gestures { movement-threshold "5"; }"#).is_err());
    }

    #[test]
    fn durations() {
        let gestures = do_parse("gestures { tap-confirm-delay-ms 120; }").gestures;
        assert_eq!(gestures.tap_confirm_delay().as_millis(), 120);
        assert_eq!(gestures.double_tap_window().as_millis(), 300);
        assert_eq!(gestures.mouse_suppression().as_millis(), 500);
    }
}
