//! Attribute adapter: turns observed attribute writes into typed commands.

use crate::descriptor::parse_descriptor_json;
use crate::player::{Playback, PlayerCommand};
use crate::transition::RunnerCommand;
use crate::Result;

pub const ANIMATE: &str = "animate";
pub const PLAYBACK: &str = "playback";
pub const TRANSITIONING: &str = "transitioning";
pub const KIND: &str = "kind";

/// Attributes the player observes, in the order they apply on attach.
pub const PLAYER_ATTRIBUTES: [&str; 2] = [ANIMATE, PLAYBACK];
/// Attributes the runner observes. `kind` is read on demand.
pub const RUNNER_ATTRIBUTES: [&str; 1] = [TRANSITIONING];

/// Non-empty and not the literal `false`.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(v) if !v.is_empty() && v != "false")
}

/// One observed attribute write. `value` is `None` when the attribute was removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeChange {
    pub name: String,
    pub value: Option<String>,
}

impl AttributeChange {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Malformed descriptors fail; unknown playback values log and yield `None`.
    pub fn to_player_command(&self) -> Result<Option<PlayerCommand>> {
        let Some(value) = self.value.as_deref() else {
            return Ok(None);
        };
        match self.name.as_str() {
            ANIMATE => {
                let descriptor = parse_descriptor_json(value)?;
                Ok(Some(PlayerCommand::SetAnimation(descriptor)))
            }
            PLAYBACK => match value.parse::<Playback>() {
                Ok(playback) => Ok(Some(PlayerCommand::SetPlayback(playback))),
                Err(err) => {
                    log::warn!("{err}");
                    Ok(None)
                }
            },
            _ => Ok(None),
        }
    }

    pub fn to_runner_command(&self) -> Option<RunnerCommand> {
        (self.name == TRANSITIONING && is_truthy(self.value.as_deref())).then_some(RunnerCommand::Trigger)
    }
}
