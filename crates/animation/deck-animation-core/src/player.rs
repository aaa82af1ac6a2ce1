//! AnimationPlayer: plays one declarative animation on the component's first
//! child and reports its natural completion.
//!
//! At most one handle is live per player. Applying a new descriptor
//! supersedes the live handle according to [`SupersedePolicy`]; completion
//! notifications for superseded handles are dropped, so `finish` is only ever
//! reported for the animation currently owned by the player.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::{self, AttributeChange};
use crate::config::{Config, SupersedePolicy};
use crate::descriptor::AnimationDescriptor;
use crate::engine::{AnimationEngine, AnimationHandle, DomView, NotReady};
use crate::error::AnimationError;
use crate::ids::AnimationId;
use crate::Result;

/// Playback control written to the `playback` attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Playback {
    Play,
    Pause,
}

impl FromStr for Playback {
    type Err = AnimationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "play" => Ok(Playback::Play),
            "pause" => Ok(Playback::Pause),
            other => Err(AnimationError::UnknownPlayback {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Playback::Play => "play",
            Playback::Pause => "pause",
        })
    }
}

/// Commands accepted by [`AnimationPlayer::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCommand {
    SetAnimation(AnimationDescriptor),
    SetPlayback(Playback),
    /// The platform reported a natural finish for this animation.
    AnimationFinished(AnimationId),
}

/// Result of one command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerOutcome {
    Started(AnimationId),
    NotReady(NotReady),
    Forwarded(Playback),
    /// The live animation finished; the host dispatches `finish`.
    Finished(AnimationId),
    Ignored,
}

impl PlayerOutcome {
    /// Whether the host must dispatch a `finish` event.
    #[inline]
    pub fn emits_finish(&self) -> bool {
        matches!(self, PlayerOutcome::Finished(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    Idle,
    Running,
    Paused,
    Finished,
}

pub struct AnimationPlayer<V, E>
where
    V: DomView,
    E: AnimationEngine<Target = V::Element>,
{
    view: V,
    engine: E,
    supersede: SupersedePolicy,
    live: Option<E::Handle>,
    state: PlayState,
}

impl<V, E> AnimationPlayer<V, E>
where
    V: DomView,
    E: AnimationEngine<Target = V::Element>,
{
    pub fn new(view: V, engine: E, config: &Config) -> Self {
        Self {
            view,
            engine,
            supersede: config.supersede,
            live: None,
            state: PlayState::Idle,
        }
    }

    /// Single entry point for every command.
    pub fn apply(&mut self, command: PlayerCommand) -> Result<PlayerOutcome> {
        match command {
            PlayerCommand::SetAnimation(descriptor) => self.set_animation(descriptor),
            PlayerCommand::SetPlayback(playback) => self.set_playback(playback),
            PlayerCommand::AnimationFinished(id) => Ok(self.animation_finished(id)),
        }
    }

    /// Start `descriptor` on the first child, superseding any live animation.
    pub fn set_animation(&mut self, descriptor: AnimationDescriptor) -> Result<PlayerOutcome> {
        descriptor.validate()?;

        let Some(target) = self.view.first_child() else {
            log::debug!("animation player has no child to animate");
            return Ok(PlayerOutcome::NotReady(NotReady::NoChild));
        };
        if descriptor.is_empty() {
            log::debug!("animation descriptor has no keyframes");
            return Ok(PlayerOutcome::NotReady(NotReady::EmptyKeyframes));
        }

        self.supersede_live();

        let handle = match self
            .engine
            .animate(&target, &descriptor.keyframes, &descriptor.options)
        {
            Ok(handle) => handle,
            Err(err) => {
                self.state = PlayState::Idle;
                return Err(err);
            }
        };
        let id = handle.id();
        self.live = Some(handle);
        self.state = PlayState::Running;
        log::debug!(
            "started animation {:?}: {} keyframes, {}ms x {}",
            id,
            descriptor.keyframes.len(),
            descriptor.options.duration_ms,
            descriptor.options.iterations
        );
        Ok(PlayerOutcome::Started(id))
    }

    /// Forward play/pause to the live animation; no-op without one.
    pub fn set_playback(&mut self, playback: Playback) -> Result<PlayerOutcome> {
        let Some(handle) = self.live.as_mut() else {
            log::debug!("playback {playback} ignored: no animation");
            return Ok(PlayerOutcome::Ignored);
        };
        match playback {
            Playback::Play => {
                handle.play()?;
                self.state = PlayState::Running;
            }
            Playback::Pause => {
                handle.pause()?;
                self.state = PlayState::Paused;
            }
        }
        Ok(PlayerOutcome::Forwarded(playback))
    }

    fn animation_finished(&mut self, id: AnimationId) -> PlayerOutcome {
        match &self.live {
            Some(handle) if handle.id() == id => {
                self.state = PlayState::Finished;
                PlayerOutcome::Finished(id)
            }
            _ => {
                log::debug!("dropping finish of superseded animation {:?}", id);
                PlayerOutcome::Ignored
            }
        }
    }

    /// Release the live handle. An effect with no end state (infinite
    /// iterations) cannot finish and is cancelled instead.
    fn supersede_live(&mut self) {
        let Some(mut old) = self.live.take() else {
            return;
        };
        self.state = PlayState::Idle;
        match self.supersede {
            SupersedePolicy::Cancel => old.cancel(),
            SupersedePolicy::Finish => {
                if let Err(err) = old.finish() {
                    log::debug!("cancelling animation {:?}: {err}", old.id());
                    old.cancel();
                }
            }
        }
    }

    /// Translate an observed attribute write and apply it.
    pub fn attribute_changed(&mut self, change: &AttributeChange) -> Result<PlayerOutcome> {
        match change.to_player_command()? {
            Some(command) => self.apply(command),
            None => Ok(PlayerOutcome::Ignored),
        }
    }

    /// Attach: apply attributes already present, descriptor first.
    pub fn connected(&mut self) -> Result<Vec<PlayerOutcome>> {
        let mut outcomes = Vec::new();
        for name in attributes::PLAYER_ATTRIBUTES {
            if let Some(value) = self.view.attribute(name) {
                let change = AttributeChange::new(name, Some(value));
                outcomes.push(self.attribute_changed(&change)?);
            }
        }
        Ok(outcomes)
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Id of the animation the player currently owns.
    pub fn live_animation(&self) -> Option<AnimationId> {
        self.live.as_ref().map(AnimationHandle::id)
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
    fn playback_parses_known_commands_only() {
        assert_eq!("play".parse::<Playback>().unwrap(), Playback::Play);
        assert_eq!(" pause ".parse::<Playback>().unwrap(), Playback::Pause);
        let err = "stop".parse::<Playback>().unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(Playback::Pause.to_string(), "pause");
    }
}
