//! TransitionRunner: canned slide/fade transitions between the `from` and
//! `to` markers projected into the component.
//!
//! Triggers are deferred: [`RunnerCommand::Trigger`] answers
//! [`RunnerOutcome::Deferred`] and the host sends [`RunnerCommand::Run`] on
//! the next animation frame, after projected content had a layout pass. The
//! markers and the `kind` attribute are resolved at run time.
//!
//! Only the incoming (`to`) animation's completion counts; the outgoing one is
//! fire-and-forget.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::{self, AttributeChange};
use crate::config::{Config, MarkerTags, RetriggerPolicy, TransitionTiming};
use crate::descriptor::Keyframe;
use crate::engine::{AnimationEngine, AnimationHandle, DomView, Marker, NotReady};
use crate::error::AnimationError;
use crate::ids::AnimationId;
use crate::presets;
use crate::timing::AnimationOptions;
use crate::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    SlideInFromTop,
    SlideInFromLeft,
    Fade,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::SlideInFromTop => "SlideInFromTop",
            TransitionKind::SlideInFromLeft => "SlideInFromLeft",
            TransitionKind::Fade => "Fade",
        }
    }

    /// Keyframes for the (`from`, `to`) elements.
    pub fn keyframes(&self) -> (Vec<Keyframe>, Vec<Keyframe>) {
        match self {
            TransitionKind::SlideInFromLeft => {
                (presets::slide_in_from_left(), presets::slide_in_from_left())
            }
            TransitionKind::SlideInFromTop => {
                (presets::slide_in_from_top(), presets::slide_in_from_top())
            }
            TransitionKind::Fade => (presets::fade_out(), presets::fade_in()),
        }
    }
}

impl FromStr for TransitionKind {
    type Err = AnimationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "SlideInFromTop" => Ok(TransitionKind::SlideInFromTop),
            "SlideInFromLeft" => Ok(TransitionKind::SlideInFromLeft),
            "Fade" => Ok(TransitionKind::Fade),
            other => Err(AnimationError::UnknownTransitionKind {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands accepted by [`TransitionRunner::apply`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunnerCommand {
    /// A transition was requested; answered with `Deferred`.
    Trigger,
    /// Next frame after a trigger: resolve markers and start.
    Run,
    /// The platform reported a natural finish for this animation.
    AnimationFinished(AnimationId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunnerOutcome {
    /// Host schedules `Run` for the next animation frame.
    Deferred,
    Started { from: AnimationId, to: AnimationId },
    NotReady(NotReady),
    /// Remembered; runs after the in-flight transition.
    Queued,
    /// An incoming animation finished; the host dispatches `finish`.
    /// With `queued` set the host also schedules `Run`.
    Finished { id: AnimationId, queued: bool },
    Ignored,
}

impl RunnerOutcome {
    #[inline]
    pub fn emits_finish(&self) -> bool {
        matches!(self, RunnerOutcome::Finished { .. })
    }

    /// Whether the host must schedule `Run` on the next frame.
    #[inline]
    pub fn needs_frame(&self) -> bool {
        matches!(
            self,
            RunnerOutcome::Deferred | RunnerOutcome::Finished { queued: true, .. }
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunnerState {
    Idle,
    Transitioning,
}

pub struct TransitionRunner<V, E>
where
    V: DomView,
    E: AnimationEngine<Target = V::Element>,
{
    view: V,
    engine: E,
    retrigger: RetriggerPolicy,
    timing: TransitionTiming,
    markers: MarkerTags,
    /// Incoming animations still running.
    in_flight: Vec<AnimationId>,
    pending: bool,
}

impl<V, E> TransitionRunner<V, E>
where
    V: DomView,
    E: AnimationEngine<Target = V::Element>,
{
    pub fn new(view: V, engine: E, config: &Config) -> Self {
        Self {
            view,
            engine,
            retrigger: config.retrigger,
            timing: config.transition.clone(),
            markers: config.markers.clone(),
            in_flight: Vec::new(),
            pending: false,
        }
    }

    pub fn apply(&mut self, command: RunnerCommand) -> Result<RunnerOutcome> {
        match command {
            RunnerCommand::Trigger => Ok(self.trigger()),
            RunnerCommand::Run => self.run(),
            RunnerCommand::AnimationFinished(id) => Ok(self.animation_finished(id)),
        }
    }

    pub fn state(&self) -> RunnerState {
        if self.in_flight.is_empty() {
            RunnerState::Idle
        } else {
            RunnerState::Transitioning
        }
    }

    fn busy(&self) -> bool {
        self.state() == RunnerState::Transitioning
    }

    /// Apply the re-trigger policy; `None` means go ahead.
    fn hold_back(&mut self) -> Option<RunnerOutcome> {
        if !self.busy() {
            return None;
        }
        match self.retrigger {
            RetriggerPolicy::Overlap => None,
            RetriggerPolicy::IgnoreWhileBusy => {
                log::debug!("transition trigger ignored while busy");
                Some(RunnerOutcome::Ignored)
            }
            RetriggerPolicy::Queue => {
                self.pending = true;
                Some(RunnerOutcome::Queued)
            }
        }
    }

    fn trigger(&mut self) -> RunnerOutcome {
        self.hold_back().unwrap_or(RunnerOutcome::Deferred)
    }

    fn run(&mut self) -> Result<RunnerOutcome> {
        if let Some(outcome) = self.hold_back() {
            return Ok(outcome);
        }

        let Some(raw_kind) = self.view.attribute(attributes::KIND) else {
            log::debug!("transition has no kind yet");
            return Ok(RunnerOutcome::NotReady(NotReady::MissingKind));
        };
        let kind = match raw_kind.parse::<TransitionKind>() {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("{err}");
                return Ok(RunnerOutcome::Ignored);
            }
        };
        self.run_transition(kind)
    }

    /// Start `kind` between the current markers. Missing markers are a silent no-op.
    pub fn run_transition(&mut self, kind: TransitionKind) -> Result<RunnerOutcome> {
        let Some(from) = self.view.find_tag(self.markers.tag(Marker::From)) else {
            return Ok(RunnerOutcome::NotReady(NotReady::MissingMarker(Marker::From)));
        };
        let Some(to) = self.view.find_tag(self.markers.tag(Marker::To)) else {
            return Ok(RunnerOutcome::NotReady(NotReady::MissingMarker(Marker::To)));
        };

        self.view.reveal(&from);
        self.view.reveal(&to);

        let options = AnimationOptions::transition(self.timing.duration_ms, self.timing.easing);
        let (from_frames, to_frames) = kind.keyframes();
        let outgoing = self.engine.animate(&from, &from_frames, &options)?;
        let incoming = self.engine.animate(&to, &to_frames, &options)?;

        let (from_id, to_id) = (outgoing.id(), incoming.id());
        self.in_flight.push(to_id);
        log::debug!("transition {kind} started ({from_id:?} -> {to_id:?})");
        Ok(RunnerOutcome::Started {
            from: from_id,
            to: to_id,
        })
    }

    fn animation_finished(&mut self, id: AnimationId) -> RunnerOutcome {
        let Some(pos) = self.in_flight.iter().position(|live| *live == id) else {
            return RunnerOutcome::Ignored;
        };
        self.in_flight.remove(pos);
        let queued = self.in_flight.is_empty() && std::mem::take(&mut self.pending);
        RunnerOutcome::Finished { id, queued }
    }

    pub fn attribute_changed(&mut self, change: &AttributeChange) -> Result<RunnerOutcome> {
        match change.to_runner_command() {
            Some(command) => self.apply(command),
            None => Ok(RunnerOutcome::Ignored),
        }
    }

    /// Attach: a truthy `transitioning` attribute defers a run to the next frame.
    pub fn connected(&mut self) -> Result<RunnerOutcome> {
        let value = self.view.attribute(attributes::TRANSITIONING);
        let change = AttributeChange::new(attributes::TRANSITIONING, value);
        self.attribute_changed(&change)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_their_attribute_text() {
        for kind in [
            TransitionKind::SlideInFromTop,
            TransitionKind::SlideInFromLeft,
            TransitionKind::Fade,
        ] {
            assert_eq!(kind.as_str().parse::<TransitionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "Zoom".parse::<TransitionKind>(),
            Err(AnimationError::UnknownTransitionKind { .. })
        ));
    }

    #[test]
    fn fade_is_asymmetric_and_slides_are_not() {
        let (from, to) = TransitionKind::Fade.keyframes();
        assert_eq!(from[0].get("opacity"), Some("1"));
        assert_eq!(to[0].get("opacity"), Some("0"));

        let (from, to) = TransitionKind::SlideInFromTop.keyframes();
        assert_eq!(from, to);
        assert_eq!(from[0].get("transform"), Some("translateY(-100%)"));
        assert_eq!(from[1].get("transform"), Some("translateY(0%)"));
    }
}
