//! Deck Animation Core (engine-agnostic)
//!
//! Declarative keyframe playback for the deck's custom elements. This crate
//! owns the descriptor model and its JSON parser, a small timing/easing model,
//! keyframe sampling, and the two components hosts drive through typed
//! commands:
//!
//! - [`AnimationPlayer`]: plays one JSON-described animation on its first child.
//! - [`TransitionRunner`]: runs a canned slide/fade between `from`/`to` markers.
//!
//! The platform animation engine and the DOM are injected through
//! [`AnimationEngine`] and [`DomView`]; adapters (wasm) implement them for the
//! browser, [`testing`] implements them in memory.

pub mod attributes;
pub mod config;
pub mod descriptor;
pub mod easing;
pub mod engine;
pub mod error;
pub mod ids;
pub mod player;
pub mod presets;
pub mod sampling;
pub mod testing;
pub mod timing;
pub mod transition;

// Re-exports for consumers (adapters)
pub use attributes::{is_truthy, AttributeChange, PLAYER_ATTRIBUTES, RUNNER_ATTRIBUTES};
pub use config::{Config, MarkerTags, RetriggerPolicy, SupersedePolicy, TransitionTiming};
pub use descriptor::{parse_descriptor_json, AnimationDescriptor, Keyframe, KeyframeValue};
pub use easing::Easing;
pub use engine::{AnimationEngine, AnimationHandle, DomView, Marker, NotReady};
pub use error::AnimationError;
pub use ids::{AnimationId, IdAllocator};
pub use player::{AnimationPlayer, PlayState, Playback, PlayerCommand, PlayerOutcome};
pub use sampling::sample_keyframes;
pub use timing::{AnimationOptions, FillMode, Iterations, Phase};
pub use transition::{RunnerCommand, RunnerOutcome, RunnerState, TransitionKind, TransitionRunner};

/// Result type used throughout the core.
pub type Result<T> = core::result::Result<T, AnimationError>;
