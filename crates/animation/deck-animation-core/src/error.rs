//! Error types for the deck animation components

use serde::{Deserialize, Serialize};

/// Errors surfaced by descriptor parsing and component commands.
///
/// Missing DOM structure is not an error: components report it as a
/// not-ready outcome instead. Everything here indicates bad input from
/// whoever set the attribute.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Descriptor text is not valid JSON or does not match the schema
    #[error("Descriptor parse error: {reason}")]
    DescriptorParse { reason: String },

    /// Descriptor parsed but violates a structural rule
    #[error("Invalid descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    /// Easing string is neither a named curve nor a valid cubic-bezier
    #[error("Invalid easing: {value}")]
    InvalidEasing { value: String },

    /// Iteration count of zero or a non-numeric, non-infinite value
    #[error("Invalid iteration count: {value}")]
    InvalidIterations { value: String },

    /// Unrecognized playback command
    #[error("Unknown playback command: {value}")]
    UnknownPlayback { value: String },

    /// Unrecognized transition kind
    #[error("Unknown transition kind: {value}")]
    UnknownTransitionKind { value: String },

    /// The platform engine refused to start an animation
    #[error("Engine error: {reason}")]
    Engine { reason: String },
}

impl AnimationError {
    /// Shorthand for an [`AnimationError::InvalidDescriptor`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            reason: reason.into(),
        }
    }

    /// Whether the host should log and carry on instead of failing loudly.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownPlayback { .. } | Self::UnknownTransitionKind { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::DescriptorParse { .. } => "parse",
            Self::InvalidDescriptor { .. }
            | Self::InvalidEasing { .. }
            | Self::InvalidIterations { .. } => "validation",
            Self::UnknownPlayback { .. } | Self::UnknownTransitionKind { .. } => "unknown-value",
            Self::Engine { .. } => "engine",
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::DescriptorParse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_are_recoverable() {
        let err = AnimationError::UnknownPlayback {
            value: "rewind".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.category(), "unknown-value");

        let err = AnimationError::invalid("empty keyframe");
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err: AnimationError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AnimationError::DescriptorParse { .. }));
        assert_eq!(err.category(), "parse");
    }
}
