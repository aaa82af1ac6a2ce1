//! Timing functions accepted in descriptor `easing` fields.
//!
//! Named curves map onto their CSS cubic-bezier definitions so the in-memory
//! engine samples exactly what the browser would.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Easing curve: a CSS named curve or an explicit cubic-bezier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    StepStart,
    StepEnd,
    /// Control points (x1, y1, x2, y2); x1 and x2 lie in [0, 1].
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Control points for the curve, when it is bezier-shaped.
    pub fn control_points(&self) -> Option<[f64; 4]> {
        match *self {
            Easing::Linear => Some([0.0, 0.0, 1.0, 1.0]),
            Easing::Ease => Some([0.25, 0.1, 0.25, 1.0]),
            Easing::EaseIn => Some([0.42, 0.0, 1.0, 1.0]),
            Easing::EaseOut => Some([0.0, 0.0, 0.58, 1.0]),
            Easing::EaseInOut => Some([0.42, 0.0, 0.58, 1.0]),
            Easing::CubicBezier(x1, y1, x2, y2) => Some([x1, y1, x2, y2]),
            Easing::StepStart | Easing::StepEnd => None,
        }
    }

    /// Map linear progress in [0, 1] to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::StepStart => 1.0,
            Easing::StepEnd => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            _ => match self.control_points() {
                Some([x1, y1, x2, y2]) => cubic_bezier_ease(t, x1, y1, x2, y2),
                None => t,
            },
        }
    }
}

/// Solve the bezier x(p) = t for p, then return y(p).
///
/// Newton-Raphson first, bisection when the slope flattens out.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..32 {
        let x = bezier_sample(p, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³, in Horner form.
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::StepStart => f.write_str("step-start"),
            Easing::StepEnd => f.write_str("step-end"),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnimationError::InvalidEasing {
            value: s.to_string(),
        };
        let trimmed = s.trim();
        match trimmed {
            "linear" => return Ok(Easing::Linear),
            "ease" => return Ok(Easing::Ease),
            "ease-in" => return Ok(Easing::EaseIn),
            "ease-out" => return Ok(Easing::EaseOut),
            "ease-in-out" => return Ok(Easing::EaseInOut),
            "step-start" => return Ok(Easing::StepStart),
            "step-end" => return Ok(Easing::StepEnd),
            _ => {}
        }

        let args = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let points = args
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        let [x1, y1, x2, y2] = <[f64; 4]>::try_from(points).map_err(|_| invalid())?;
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(invalid());
        }
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(invalid());
        }
        Ok(Easing::CubicBezier(x1, y1, x2, y2))
    }
}

impl TryFrom<String> for Easing {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_curves() {
        assert_eq!("ease-in-out".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!(" linear ".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("step-end".parse::<Easing>().unwrap(), Easing::StepEnd);
    }

    #[test]
    fn parses_cubic_bezier() {
        let e: Easing = "cubic-bezier(0.1, 0.7, 1.0, 0.1)".parse().unwrap();
        assert_eq!(e, Easing::CubicBezier(0.1, 0.7, 1.0, 0.1));
        assert_eq!(e.to_string(), "cubic-bezier(0.1, 0.7, 1, 0.1)");
    }

    #[test]
    fn rejects_out_of_range_x_and_garbage() {
        assert!("cubic-bezier(1.5, 0, 0.5, 1)".parse::<Easing>().is_err());
        assert!("cubic-bezier(0, 0, 1)".parse::<Easing>().is_err());
        assert!("bouncy".parse::<Easing>().is_err());
    }

    #[test]
    fn endpoints_are_exact_and_midpoint_symmetric() {
        for e in [Easing::Ease, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-5, "mid={mid}");
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn steps_jump_at_the_expected_end() {
        assert_eq!(Easing::StepStart.apply(0.0), 1.0);
        assert_eq!(Easing::StepEnd.apply(0.99), 0.0);
        assert_eq!(Easing::StepEnd.apply(1.0), 1.0);
    }
}
