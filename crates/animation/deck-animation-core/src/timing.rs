//! Animation options and the timing model that turns elapsed time into
//! keyframe progress.
//!
//! The model follows the platform's: no start delay, normal direction,
//! iteration start 0. `progress_at` returns `None` when the effect is not in
//! effect (outside the active interval without a matching fill).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::AnimationError;

/// How the effect applies outside its active interval.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    #[inline]
    pub fn fills_forwards(&self) -> bool {
        matches!(self, FillMode::Forwards | FillMode::Both)
    }

    #[inline]
    pub fn fills_backwards(&self) -> bool {
        matches!(self, FillMode::Backwards | FillMode::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FillMode::None => "none",
            FillMode::Forwards => "forwards",
            FillMode::Backwards => "backwards",
            FillMode::Both => "both",
        }
    }
}

/// Iteration count: a positive integer or infinite.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIterations", into = "RawIterations")]
pub enum Iterations {
    Count(u32),
    Infinite,
}

impl Default for Iterations {
    fn default() -> Self {
        Iterations::Count(1)
    }
}

impl Iterations {
    /// Iteration count as the platform expects it (`f64::INFINITY` for infinite).
    pub fn as_f64(&self) -> f64 {
        match self {
            Iterations::Count(n) => f64::from(*n),
            Iterations::Infinite => f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self, Iterations::Infinite)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum RawIterations {
    Count(u32),
    Text(String),
}

impl TryFrom<RawIterations> for Iterations {
    type Error = AnimationError;

    fn try_from(raw: RawIterations) -> Result<Self, Self::Error> {
        match raw {
            RawIterations::Count(0) => Err(AnimationError::InvalidIterations {
                value: "0".into(),
            }),
            RawIterations::Count(n) => Ok(Iterations::Count(n)),
            RawIterations::Text(s) if s == "infinite" || s == "Infinity" => {
                Ok(Iterations::Infinite)
            }
            RawIterations::Text(s) => Err(AnimationError::InvalidIterations { value: s }),
        }
    }
}

impl From<Iterations> for RawIterations {
    fn from(it: Iterations) -> Self {
        match it {
            Iterations::Count(n) => RawIterations::Count(n),
            Iterations::Infinite => RawIterations::Text("infinite".into()),
        }
    }
}

impl fmt::Display for Iterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Iterations::Count(n) => write!(f, "{n}"),
            Iterations::Infinite => f.write_str("infinite"),
        }
    }
}

/// Timing options of an animation descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnimationOptions {
    #[serde(default, alias = "duration")]
    pub duration_ms: u32,
    #[serde(default)]
    pub iterations: Iterations,
    #[serde(default)]
    pub fill: FillMode,
    #[serde(default)]
    pub easing: Easing,
}

/// Where an effect sits relative to its active interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Before,
    Active,
    After,
}

impl AnimationOptions {
    /// Options used by the canned transitions: one eased pass that holds its end state.
    pub fn transition(duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            iterations: Iterations::Count(1),
            fill: FillMode::Forwards,
            easing,
        }
    }

    /// Total active time in milliseconds; infinite for infinite iterations.
    pub fn active_duration_ms(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        f64::from(self.duration_ms) * self.iterations.as_f64()
    }

    /// Time at which the animation finishes naturally, if it ever does.
    pub fn end_time_ms(&self) -> Option<f64> {
        let active = self.active_duration_ms();
        active.is_finite().then_some(active)
    }

    pub fn phase_at(&self, elapsed_ms: f64) -> Phase {
        if elapsed_ms < 0.0 {
            Phase::Before
        } else if elapsed_ms < self.active_duration_ms() {
            Phase::Active
        } else {
            Phase::After
        }
    }

    /// Eased progress through the current iteration, in [0, 1] for the
    /// named curves, or `None` when the effect does not apply.
    pub fn progress_at(&self, elapsed_ms: f64) -> Option<f64> {
        let linear = match self.phase_at(elapsed_ms) {
            Phase::Before => {
                if !self.fill.fills_backwards() {
                    return None;
                }
                0.0
            }
            Phase::Active => {
                let overall = elapsed_ms / f64::from(self.duration_ms);
                overall.fract()
            }
            Phase::After => {
                if !self.fill.fills_forwards() {
                    return None;
                }
                // A whole number of iterations always ends at the end of one.
                1.0
            }
        };
        Some(self.easing.apply(linear))
    }

    /// Zero-based iteration index at `elapsed_ms`, clamped to the last one.
    pub fn current_iteration_at(&self, elapsed_ms: f64) -> u64 {
        if self.duration_ms == 0 || elapsed_ms <= 0.0 {
            return 0;
        }
        let raw = (elapsed_ms / f64::from(self.duration_ms)).floor() as u64;
        match self.iterations {
            Iterations::Count(n) => raw.min(u64::from(n) - 1),
            Iterations::Infinite => raw,
        }
    }
}
