//! Seams to the host platform: the animation engine and the DOM.
//!
//! Adapters (wasm) implement these over the browser; `testing` implements
//! them in memory. Completion is never reported through these traits: the
//! adapter observes it and feeds an `AnimationFinished(id)` command back into
//! the component, so a component is never re-entered from inside `animate`.

use serde::{Deserialize, Serialize};

use crate::descriptor::Keyframe;
use crate::ids::AnimationId;
use crate::timing::AnimationOptions;
use crate::Result;

/// Control surface of one started animation.
pub trait AnimationHandle {
    fn id(&self) -> AnimationId;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Drop the effect; the target reverts to its pre-animation state.
    fn cancel(&mut self);
    /// Jump to the end state.
    fn finish(&mut self) -> Result<()>;
}

/// The platform's animation engine.
pub trait AnimationEngine {
    type Target;
    type Handle: AnimationHandle;

    /// Start animating `target` through `keyframes` with `options`.
    fn animate(
        &mut self,
        target: &Self::Target,
        keyframes: &[Keyframe],
        options: &AnimationOptions,
    ) -> Result<Self::Handle>;
}

/// Reserved child roles that delimit a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    From,
    To,
}

impl Marker {
    /// Default tag name of the marker element.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Marker::From => "transition-from",
            Marker::To => "transition-to",
        }
    }
}

/// Live view over the component element and its subtree.
/// Every query hits the current DOM; nothing is cached.
pub trait DomView {
    type Element: Clone;

    /// First child element of the component.
    fn first_child(&self) -> Option<Self::Element>;
    /// First descendant with tag name `tag`.
    fn find_tag(&self, tag: &str) -> Option<Self::Element>;
    /// First descendant carrying the marker's default tag.
    fn find_marker(&self, marker: Marker) -> Option<Self::Element> {
        self.find_tag(marker.tag_name())
    }
    /// Undo any hidden state (sets an inline-block display).
    fn reveal(&mut self, element: &Self::Element);
    /// Current value of an attribute on the component element.
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Why a command found nothing to animate. Never an error: hosts re-trigger
/// once content has been projected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotReady {
    NoChild,
    EmptyKeyframes,
    MissingMarker(Marker),
    MissingKind,
}
