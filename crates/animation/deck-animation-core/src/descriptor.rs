//! Declarative animation descriptors: keyframes plus timing options.
//!
//! JSON form, as written to the `animate` attribute:
//!
//! ```json
//! { "keyframes": [{ "opacity": "1" }, { "opacity": 0 }],
//!   "options": { "durationMs": 500, "iterations": 1, "fill": "forwards", "easing": "ease-in-out" } }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::timing::AnimationOptions;
use crate::Result;

/// One property value inside a keyframe, held as CSS text.
///
/// JSON numbers are accepted and normalized (`0` -> `"0"`, `0.5` -> `"0.5"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "String")]
pub struct KeyframeValue(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<RawValue> for KeyframeValue {
    type Error = AnimationError;

    fn try_from(raw: RawValue) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawValue::Text(s) => Ok(KeyframeValue(s)),
            RawValue::Number(n) => Ok(KeyframeValue(n.to_string())),
        }
    }
}

impl From<KeyframeValue> for String {
    fn from(v: KeyframeValue) -> Self {
        v.0
    }
}

impl KeyframeValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyframeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One point on the animation timeline: property name -> value.
/// Property order is preserved as written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyframe(pub IndexMap<String, KeyframeValue>);

impl Keyframe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(property.into(), KeyframeValue::new(value));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(KeyframeValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keyframes and timing for one animation. Built fresh per attribute write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDescriptor {
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub options: AnimationOptions,
}

impl AnimationDescriptor {
    pub fn new(keyframes: Vec<Keyframe>, options: AnimationOptions) -> Self {
        Self { keyframes, options }
    }

    /// Structural checks serde cannot express.
    pub fn validate(&self) -> Result<()> {
        for (idx, frame) in self.keyframes.iter().enumerate() {
            if frame.is_empty() {
                return Err(AnimationError::invalid(format!(
                    "keyframe {idx} has no properties"
                )));
            }
            if frame.0.keys().any(|name| name.trim().is_empty()) {
                return Err(AnimationError::invalid(format!(
                    "keyframe {idx} has an empty property name"
                )));
            }
        }
        Ok(())
    }

    /// True when there is nothing to animate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

/// Parse and validate a descriptor from its attribute text.
pub fn parse_descriptor_json(text: &str) -> Result<AnimationDescriptor> {
    let descriptor: AnimationDescriptor = serde_json::from_str(text)?;
    descriptor.validate()?;
    Ok(descriptor)
}
