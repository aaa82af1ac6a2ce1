//! Canned keyframe sequences used by transitions and demos.

use crate::descriptor::{AnimationDescriptor, Keyframe};
use crate::easing::Easing;
use crate::timing::{AnimationOptions, FillMode, Iterations};

fn two_step(property: &str, from: &str, to: &str) -> Vec<Keyframe> {
    vec![
        Keyframe::new().with(property, from),
        Keyframe::new().with(property, to),
    ]
}

pub fn slide_in_from_left() -> Vec<Keyframe> {
    two_step("transform", "translateX(-100%)", "translateX(0%)")
}

pub fn slide_in_from_top() -> Vec<Keyframe> {
    two_step("transform", "translateY(-100%)", "translateY(0%)")
}

pub fn fade_out() -> Vec<Keyframe> {
    two_step("opacity", "1", "0")
}

pub fn fade_in() -> Vec<Keyframe> {
    two_step("opacity", "0", "1")
}

/// A full turn repeated forever, as used by the spinning demo element.
pub fn spin(duration_ms: u32) -> AnimationDescriptor {
    AnimationDescriptor::new(
        two_step("transform", "rotate(0deg)", "rotate(360deg)"),
        AnimationOptions {
            duration_ms,
            iterations: Iterations::Infinite,
            fill: FillMode::None,
            easing: Easing::Linear,
        },
    )
}
