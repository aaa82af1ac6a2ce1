//! Component configuration.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::engine::Marker;

/// What happens to a live animation when a new descriptor replaces it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupersedePolicy {
    /// Drop the old effect; the target reverts to its pre-animation state.
    #[default]
    Cancel,
    /// Jump the old effect to its end state (kept when it fills forwards).
    Finish,
}

/// What a transition trigger does while a transition is already running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetriggerPolicy {
    /// Start another pair of animations on top of the running ones.
    #[default]
    Overlap,
    /// Drop triggers until the running transition finishes.
    IgnoreWhileBusy,
    /// Remember one trigger and run it once the running transition finishes.
    Queue,
}

/// Timing shared by every canned transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTiming {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            easing: Easing::EaseInOut,
        }
    }
}

/// Tag names of the transition markers. Decks whose content is projected
/// by Elm views use `elm-animator-from` / `elm-animator-to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerTags {
    pub from: String,
    pub to: String,
}

impl MarkerTags {
    pub fn tag(&self, marker: Marker) -> &str {
        match marker {
            Marker::From => &self.from,
            Marker::To => &self.to,
        }
    }
}

impl Default for MarkerTags {
    fn default() -> Self {
        Self {
            from: Marker::From.tag_name().to_string(),
            to: Marker::To.tag_name().to_string(),
        }
    }
}

/// Configuration for both components. Hosts usually keep the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub supersede: SupersedePolicy,
    pub retrigger: RetriggerPolicy,
    pub transition: TransitionTiming,
    pub markers: MarkerTags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"supersede":"finish"}"#).unwrap();
        assert_eq!(cfg.supersede, SupersedePolicy::Finish);
        assert_eq!(cfg.retrigger, RetriggerPolicy::Overlap);
        assert_eq!(cfg.transition.duration_ms, 500);
        assert_eq!(cfg.transition.easing, Easing::EaseInOut);

        let cfg: Config =
            serde_json::from_str(r#"{"retrigger":"ignore_while_busy","transition":{"duration_ms":250}}"#)
                .unwrap();
        assert_eq!(cfg.retrigger, RetriggerPolicy::IgnoreWhileBusy);
        assert_eq!(cfg.transition.duration_ms, 250);
        assert_eq!(cfg.transition.easing, Easing::EaseInOut);
        assert_eq!(cfg.markers, MarkerTags::default());
    }

    #[test]
    fn marker_tags_can_be_overridden_one_at_a_time() {
        let cfg: Config =
            serde_json::from_str(r#"{"markers":{"to":"elm-animator-to"}}"#).unwrap();
        assert_eq!(cfg.markers.tag(Marker::From), "transition-from");
        assert_eq!(cfg.markers.tag(Marker::To), "elm-animator-to");
    }
}
